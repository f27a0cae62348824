#![forbid(unsafe_code)]

//! Lifecycle logging.
//!
//! Toast code logs through `toastlet_core::{debug, warn, error, trace}!` and
//! opens its per-dispatch span with `toastlet_core::debug_span!`. With the
//! `tracing` feature these are the `tracing` macros. Without it they compile
//! to nothing and the span is a [`NoopSpan`].
//!
//! Conventional fields: `toast_id` on every per-toast event, `cause` on
//! closes, `option` / `fallback` on corrected options.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, trace, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Dropped: lifecycle transitions and resource bookkeeping.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Dropped: per-move gesture detail.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Dropped: corrected options and forced closes.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Dropped: rejected notifications.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Evaluates to a [`NoopSpan`](crate::logging::NoopSpan).
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// The dispatch span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Held for the length of a dispatch; does nothing.
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
