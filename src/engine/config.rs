//! Engine configuration.

/// Tunables for a [`MatchingEngine`](crate::engine::MatchingEngine) run.
///
/// ```
/// use stable_marriage::engine::MatcherConfig;
///
/// let config = MatcherConfig::default()
///     .with_checkpoint_interval(64)
///     .with_reverse_roles(true);
/// assert_eq!(config.checkpoint_interval, 64);
/// assert!(config.reverse_roles);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Poll the cancellation hook every this many proposals. `0` disables polling.
    pub checkpoint_interval: u64,

    /// Let group B propose to group A. The result is still keyed by group B.
    pub reverse_roles: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 1,
            reverse_roles: false,
        }
    }
}

impl MatcherConfig {
    /// Set the checkpoint interval.
    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: u64) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    /// Choose which group proposes.
    #[must_use]
    pub fn with_reverse_roles(mut self, reverse: bool) -> Self {
        self.reverse_roles = reverse;
        self
    }

    /// True if a checkpoint falls before proposal number `proposals`.
    #[inline]
    pub(crate) fn is_checkpoint(&self, proposals: u64) -> bool {
        self.checkpoint_interval != 0 && proposals % self.checkpoint_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatcherConfig::default();
        assert_eq!(config.checkpoint_interval, 1);
        assert!(!config.reverse_roles);
    }

    #[test]
    fn test_checkpoints() {
        let every_third = MatcherConfig::default().with_checkpoint_interval(3);
        assert!(every_third.is_checkpoint(0));
        assert!(!every_third.is_checkpoint(1));
        assert!(every_third.is_checkpoint(6));

        let disabled = MatcherConfig::default().with_checkpoint_interval(0);
        assert!(!disabled.is_checkpoint(0));
    }
}
