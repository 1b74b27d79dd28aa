//! CSV and JSON encoding of preference tables and matchings.
//!
//! ## Preference tables
//!
//! Column-oriented: the header row names each participant, and the column
//! below holds their ranking, most preferred in the first data row.
//!
//! ```text
//! a1,a2
//! b1,b2
//! b2,b1
//! ```
//!
//! Cells are trimmed and empty cells are skipped, so columns of different
//! lengths are accepted here and left for validation to judge. A cell past
//! the last header column is an error. As a consequence of skipping, an
//! empty-string id cannot be ranked through this format.
//!
//! ## Matchings
//!
//! Two columns, `group_b` and `group_a`, one row per group-B participant.
//! An empty `group_a` cell means unmatched, so a partner with an empty id
//! is refused on write. Repeated `group_b` rows are refused on read.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::TableError;
use crate::types::{Matching, ParticipantId, Partner, PreferenceList, PreferenceTable};

/// Header of the group-B column in matching files.
pub const RECEIVER_COLUMN: &str = "group_b";

/// Header of the group-A column in matching files.
pub const PROPOSER_COLUMN: &str = "group_a";

// ============================================================================
// Preference tables
// ============================================================================

/// Read a column-oriented preference table from `path`.
pub fn read_preferences(path: &Path) -> Result<PreferenceTable, TableError> {
    let file = open(path)?;
    parse_preferences(file, path)
}

/// Parse a column-oriented preference table. `origin` labels errors.
pub fn parse_preferences<R: Read>(reader: R, origin: &Path) -> Result<PreferenceTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| csv_error(origin, e))?.clone();
    let mut columns: Vec<Vec<ParticipantId>> = vec![Vec::new(); headers.len()];

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(origin, e))?;
        if let Some(extra) = record.iter().skip(headers.len()).position(|field| !field.is_empty()) {
            return Err(TableError::UnexpectedCell {
                path: origin.to_path_buf(),
                row: record.position().map_or(index + 2, |pos| pos.line() as usize),
                column: headers.len() + extra + 1,
                headers: headers.len(),
            });
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            if !field.is_empty() {
                column.push(field.into());
            }
        }
    }

    let mut table = PreferenceTable::new();
    for (owner, ranking) in headers.iter().zip(columns) {
        table.insert(PreferenceList::new(owner, ranking))?;
    }

    tracing::debug!(
        path = %origin.display(),
        participants = table.len(),
        "read preference table"
    );
    Ok(table)
}

/// Write `table` to `path` in column-oriented form.
pub fn write_preferences(path: &Path, table: &PreferenceTable) -> Result<(), TableError> {
    let file = create(path)?;
    write_preferences_to(file, table, path)
}

/// Write `table` to any writer. `origin` labels errors.
pub fn write_preferences_to<W: Write>(writer: W, table: &PreferenceTable, origin: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer
        .write_record(table.participants().map(ParticipantId::as_str))
        .map_err(|e| csv_error(origin, e))?;

    for row in 0..table.max_list_len() {
        let record = table
            .iter()
            .map(|list| list.ranking.get(row).map_or("", ParticipantId::as_str));
        writer.write_record(record).map_err(|e| csv_error(origin, e))?;
    }

    writer.flush().map_err(|e| io_error(origin, e))
}

// ============================================================================
// Matchings
// ============================================================================

/// Read a two-column matching from `path`.
pub fn read_matching(path: &Path) -> Result<Matching, TableError> {
    let file = open(path)?;
    parse_matching(file, path)
}

/// Parse a two-column matching. `origin` labels errors.
pub fn parse_matching<R: Read>(reader: R, origin: &Path) -> Result<Matching, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| csv_error(origin, e))?.clone();
    let receiver_col = column_index(&headers, RECEIVER_COLUMN, origin)?;
    let proposer_col = column_index(&headers, PROPOSER_COLUMN, origin)?;

    let mut matching = Matching::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(origin, e))?;
        let receiver = record.get(receiver_col).unwrap_or_default();
        let partner = match record.get(proposer_col).unwrap_or_default() {
            "" => Partner::Unmatched,
            proposer => Partner::Matched(proposer.into()),
        };
        if matching.insert(receiver, partner).is_some() {
            return Err(TableError::DuplicateReceiver {
                path: origin.to_path_buf(),
                receiver: receiver.into(),
            });
        }
    }

    Ok(matching)
}

/// Write `matching` to `path`.
pub fn write_matching(path: &Path, matching: &Matching) -> Result<(), TableError> {
    let file = create(path)?;
    write_matching_to(file, matching, path)
}

/// Write `matching` to any writer. `origin` labels errors.
pub fn write_matching_to<W: Write>(writer: W, matching: &Matching, origin: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record([RECEIVER_COLUMN, PROPOSER_COLUMN])
        .map_err(|e| csv_error(origin, e))?;

    for (receiver, partner) in matching.iter() {
        let proposer = partner.id().map_or("", ParticipantId::as_str);
        if partner.is_matched() && proposer.is_empty() {
            return Err(TableError::EmptyPartner {
                path: origin.to_path_buf(),
                receiver: receiver.clone(),
            });
        }
        writer
            .write_record([receiver.as_str(), proposer])
            .map_err(|e| csv_error(origin, e))?;
    }

    writer.flush().map_err(|e| io_error(origin, e))
}

/// Write `matching` as a pretty-printed JSON object.
pub fn write_matching_json<W: Write>(writer: W, matching: &Matching) -> Result<(), TableError> {
    serde_json::to_writer_pretty(writer, matching).map_err(|source| TableError::Json { source })
}

// ============================================================================
// Helpers
// ============================================================================

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|e| io_error(path, e))
}

fn create(path: &Path) -> Result<File, TableError> {
    File::create(path).map_err(|e| io_error(path, e))
}

fn column_index(headers: &csv::StringRecord, column: &str, origin: &Path) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| TableError::MissingColumn {
            path: origin.to_path_buf(),
            column: column.to_owned(),
        })
}

fn csv_error(path: &Path, source: csv::Error) -> TableError {
    TableError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> TableError {
    TableError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInput;

    fn memory() -> &'static Path {
        Path::new("<memory>")
    }

    #[test]
    fn test_parse_column_oriented() {
        let csv = "a1,a2\nb1,b2\nb2,b1\n";
        let table = parse_preferences(csv.as_bytes(), memory()).unwrap();

        assert_eq!(table.len(), 2);
        let a2: Vec<&str> = table.get("a2").unwrap().iter().map(ParticipantId::as_str).collect();
        assert_eq!(a2, ["b2", "b1"]);
    }

    #[test]
    fn test_parse_trims_and_skips_empty_cells() {
        let csv = "a1, a2\n b1 ,b2\nb2,\n";
        let table = parse_preferences(csv.as_bytes(), memory()).unwrap();
        assert_eq!(table.get("a1").unwrap().len(), 2);
        assert_eq!(table.get("a2").unwrap().len(), 1);
        assert_eq!(table.get("a1").unwrap()[0].as_str(), "b1");
    }

    #[test]
    fn test_parse_duplicate_header() {
        let csv = "a1,a1\nb1,b1\n";
        let err = parse_preferences(csv.as_bytes(), memory()).unwrap_err();
        assert!(matches!(
            err,
            TableError::Invalid(InvalidInput::DuplicateParticipant { .. })
        ));
    }

    #[test]
    fn test_write_preferences_pads_short_columns() {
        let table = PreferenceTable::from_lists([
            ("a1", vec!["b1", "b2"]),
            ("a2", vec!["b2"]),
        ])
        .unwrap();

        let mut out = Vec::new();
        write_preferences_to(&mut out, &table, memory()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a1,a2\nb1,b2\nb2,\n");
    }

    #[test]
    fn test_matching_roundtrip_in_memory() {
        let matching = Matching::from_pairs([
            ("b1", Partner::Matched("a1".into())),
            ("b2", Partner::Unmatched),
        ]);

        let mut out = Vec::new();
        write_matching_to(&mut out, &matching, memory()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "group_b,group_a\nb1,a1\nb2,\n");

        let back = parse_matching(text.as_bytes(), memory()).unwrap();
        assert_eq!(back, matching);
    }

    #[test]
    fn test_parse_rejects_cell_past_headers() {
        let csv = "a1\nb1,b2\nb2,b1\n";
        let err = parse_preferences(csv.as_bytes(), memory()).unwrap_err();
        assert!(matches!(
            err,
            TableError::UnexpectedCell { row: 2, column: 2, headers: 1, .. }
        ));
    }

    #[test]
    fn test_parse_allows_trailing_empty_cells() {
        let csv = "a1\nb1,\nb2\n";
        let table = parse_preferences(csv.as_bytes(), memory()).unwrap();
        assert_eq!(table.get("a1").unwrap().len(), 2);
    }

    #[test]
    fn test_matching_duplicate_receiver() {
        let csv = "group_b,group_a\nb1,a2\nb1,a1\nb2,a2\n";
        let err = parse_matching(csv.as_bytes(), memory()).unwrap_err();
        assert!(matches!(err, TableError::DuplicateReceiver { receiver, .. } if receiver.as_str() == "b1"));
    }

    #[test]
    fn test_write_matching_refuses_empty_partner() {
        let matching = Matching::from_pairs([("b1", Partner::Matched("".into()))]);
        let err = write_matching_to(Vec::<u8>::new(), &matching, memory()).unwrap_err();
        assert!(matches!(err, TableError::EmptyPartner { receiver, .. } if receiver.as_str() == "b1"));
    }

    #[test]
    fn test_matching_missing_column() {
        let err = parse_matching("receiver,proposer\nb1,a1\n".as_bytes(), memory()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column, .. } if column == RECEIVER_COLUMN));
    }

    #[test]
    fn test_matching_json() {
        let matching = Matching::from_pairs([("b1", Partner::Unmatched)]);
        let mut out = Vec::new();
        write_matching_json(&mut out, &matching).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!({ "b1": null }));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pref.csv");
        let table = PreferenceTable::from_lists([
            ("x", ["p", "q", "r"]),
            ("y", ["r", "q", "p"]),
        ])
        .unwrap();

        write_preferences(&path, &table).unwrap();
        assert_eq!(read_preferences(&path).unwrap(), table);
    }

    #[test]
    fn test_missing_file() {
        let err = read_preferences(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
