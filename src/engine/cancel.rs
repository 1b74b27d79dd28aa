//! Cooperative cancellation hooks.
//!
//! The engine polls a [`Cancellation`] at checkpoints (see
//! [`MatcherConfig::checkpoint_interval`](crate::engine::MatcherConfig)).
//! When the hook reports `true`, the run stops with
//! [`MatchError::Cancelled`](crate::error::MatchError::Cancelled) and no
//! matching is produced.
//!
//! ## Provided hooks
//!
//! | Hook | Fires when |
//! |------|------------|
//! | [`NeverCancel`] | never (default) |
//! | [`AtomicBool`] | the flag is set |
//! | [`CancellationToken`] | any clone calls [`CancellationToken::cancel`] |
//! | [`Deadline`] | the wall clock passes a fixed instant |
//! | [`CancelFn`] | the wrapped closure returns `true` |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Polled by the engine to decide whether to abort.
pub trait Cancellation {
    /// Returns `true` once the run should stop.
    fn is_cancelled(&self) -> bool;
}

impl<T: Cancellation + ?Sized> Cancellation for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: Cancellation + ?Sized> Cancellation for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: Cancellation + ?Sized> Cancellation for Box<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Hook that never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a host can keep one clone and hand
/// another to the engine.
///
/// ```
/// use stable_marriage::engine::{Cancellation, CancellationToken};
///
/// let token = CancellationToken::new();
/// let engine_side = token.clone();
/// assert!(!engine_side.is_cancelled());
///
/// token.cancel();
/// assert!(engine_side.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation for every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Hook that fires once a fixed instant has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Fire at `at`.
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// Fire `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self::at(Instant::now() + limit)
    }

    /// The instant this deadline fires.
    pub fn instant(&self) -> Instant {
        self.at
    }
}

impl Cancellation for Deadline {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.at
    }
}

/// Adapter turning a `Fn() -> bool` closure into a hook.
///
/// ```
/// use std::cell::Cell;
/// use stable_marriage::engine::{CancelFn, Cancellation};
///
/// let polls = Cell::new(0);
/// let hook = CancelFn(|| {
///     polls.set(polls.get() + 1);
///     polls.get() > 2
/// });
/// assert!(!hook.is_cancelled());
/// assert!(!hook.is_cancelled());
/// assert!(hook.is_cancelled());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CancelFn<F>(pub F);

impl<F: Fn() -> bool> Cancellation for CancelFn<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
