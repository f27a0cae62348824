#![forbid(unsafe_code)]

//! Pause reasons for one toast.
//!
//! Several independent input sources may each hold a toast open: the mouse
//! is over it, keyboard focus is inside it, a finger is on it, the user
//! pressed the pause button, or the tab is in the background. Each source
//! asserts and releases its own reason; the toast is paused while any reason
//! is present.
//!
//! # Invariants
//!
//! 1. `is_paused()` is true iff the reason set is non-empty.
//! 2. Adding a present reason and removing an absent one leave the set
//!    unchanged and report [`PauseChange::Unchanged`].
//! 3. The final set depends only on which reasons were last added or
//!    removed, never on the interleaving between different reasons.
//!
//! The coordinator never touches timers. Callers inspect the returned
//! [`PauseChange`] (or poll [`PauseCoordinator::is_paused`]) and arm or
//! disarm their own timer.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Set of active pause reasons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PauseReasons: u8 {
        const HOVER = 0b0000_0001;
        const FOCUS = 0b0000_0010;
        const TOUCH_HOLD = 0b0000_0100;
        const MANUAL = 0b0000_1000;
        const TAB_HIDDEN = 0b0001_0000;
    }
}

/// A single condition that suspends the auto-close timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseReason {
    /// Pointer is over the toast.
    Hover,
    /// Keyboard focus is inside the toast.
    Focus,
    /// A touch gesture is in progress.
    TouchHold,
    /// The pause button (or a tap/keyboard toggle) paused the toast.
    ManualPause,
    /// The document is hidden.
    TabHidden,
}

impl PauseReason {
    /// Every reason, in flag order.
    pub const ALL: [Self; 5] = [
        Self::Hover,
        Self::Focus,
        Self::TouchHold,
        Self::ManualPause,
        Self::TabHidden,
    ];

    /// The flag representing this reason.
    #[must_use]
    pub const fn flag(self) -> PauseReasons {
        match self {
            Self::Hover => PauseReasons::HOVER,
            Self::Focus => PauseReasons::FOCUS,
            Self::TouchHold => PauseReasons::TOUCH_HOLD,
            Self::ManualPause => PauseReasons::MANUAL,
            Self::TabHidden => PauseReasons::TAB_HIDDEN,
        }
    }

    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::TouchHold => "touch_hold",
            Self::ManualPause => "manual_pause",
            Self::TabHidden => "tab_hidden",
        }
    }
}

impl From<PauseReason> for PauseReasons {
    fn from(reason: PauseReason) -> Self {
        reason.flag()
    }
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of adding or removing a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChange {
    /// The set did not change.
    Unchanged,
    /// The set went from empty to non-empty.
    Paused,
    /// The set went from non-empty to empty.
    Resumed,
    /// The set changed but stayed non-empty.
    Updated,
}

impl PauseChange {
    fn between(before: PauseReasons, after: PauseReasons) -> Self {
        match (before == after, before.is_empty(), after.is_empty()) {
            (true, _, _) => Self::Unchanged,
            (false, true, false) => Self::Paused,
            (false, false, true) => Self::Resumed,
            _ => Self::Updated,
        }
    }
}

/// Tracks the active pause reasons of one toast.
#[derive(Debug, Clone, Default)]
pub struct PauseCoordinator {
    reasons: PauseReasons,
}

impl PauseCoordinator {
    /// Create a coordinator with no active reasons.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reasons: PauseReasons::empty(),
        }
    }

    /// Assert a reason. Idempotent.
    pub fn add_reason(&mut self, reason: PauseReason) -> PauseChange {
        let before = self.reasons;
        self.reasons.insert(reason.flag());
        PauseChange::between(before, self.reasons)
    }

    /// Release a reason. Idempotent.
    pub fn remove_reason(&mut self, reason: PauseReason) -> PauseChange {
        let before = self.reasons;
        self.reasons.remove(reason.flag());
        PauseChange::between(before, self.reasons)
    }

    /// Assert or release a reason depending on `active`.
    pub fn set_reason(&mut self, reason: PauseReason, active: bool) -> PauseChange {
        if active {
            self.add_reason(reason)
        } else {
            self.remove_reason(reason)
        }
    }

    /// Whether any reason is active.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Whether `reason` is active.
    #[must_use]
    pub const fn contains(&self, reason: PauseReason) -> bool {
        self.reasons.contains(reason.flag())
    }

    /// The current reason set.
    #[must_use]
    pub const fn reasons(&self) -> PauseReasons {
        self.reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_not_paused() {
        assert!(!PauseCoordinator::new().is_paused());
    }

    #[test]
    fn add_then_remove_reports_transitions() {
        let mut pause = PauseCoordinator::new();
        assert_eq!(pause.add_reason(PauseReason::Hover), PauseChange::Paused);
        assert_eq!(pause.add_reason(PauseReason::Focus), PauseChange::Updated);
        assert_eq!(pause.remove_reason(PauseReason::Hover), PauseChange::Updated);
        assert!(pause.is_paused());
        assert_eq!(pause.remove_reason(PauseReason::Focus), PauseChange::Resumed);
        assert!(!pause.is_paused());
    }

    #[test]
    fn duplicate_add_is_noop() {
        let mut pause = PauseCoordinator::new();
        pause.add_reason(PauseReason::TabHidden);
        assert_eq!(
            pause.add_reason(PauseReason::TabHidden),
            PauseChange::Unchanged
        );
        assert_eq!(pause.reasons(), PauseReasons::TAB_HIDDEN);
    }

    #[test]
    fn removing_absent_reason_is_noop() {
        let mut pause = PauseCoordinator::new();
        assert_eq!(
            pause.remove_reason(PauseReason::ManualPause),
            PauseChange::Unchanged
        );
        pause.add_reason(PauseReason::Hover);
        assert_eq!(
            pause.remove_reason(PauseReason::TouchHold),
            PauseChange::Unchanged
        );
        assert!(pause.contains(PauseReason::Hover));
    }

    #[test]
    fn one_source_release_does_not_resume_another() {
        let mut pause = PauseCoordinator::new();
        pause.add_reason(PauseReason::Hover);
        pause.add_reason(PauseReason::ManualPause);
        pause.remove_reason(PauseReason::Hover);
        assert!(pause.is_paused());
        assert!(pause.contains(PauseReason::ManualPause));
    }

    #[test]
    fn set_reason_dispatches() {
        let mut pause = PauseCoordinator::new();
        assert_eq!(
            pause.set_reason(PauseReason::Focus, true),
            PauseChange::Paused
        );
        assert_eq!(
            pause.set_reason(PauseReason::Focus, false),
            PauseChange::Resumed
        );
    }

    #[test]
    fn reason_flags_are_distinct() {
        let all = PauseReason::ALL
            .iter()
            .fold(PauseReasons::empty(), |acc, r| acc | r.flag());
        assert_eq!(all, PauseReasons::all());
    }
}
