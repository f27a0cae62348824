//! Property-based invariant tests for the pause coordinator and the gesture
//! recognizer.
//!
//! 1. The final pause set depends only on each reason's last operation.
//! 2. Paused iff the reason set is non-empty.
//! 3. Reported transitions agree with the before/after pause state.
//! 4. A gesture commits only when dismissible and past the dismiss threshold.
//! 5. Small horizontal travel never leaves Idle.
//! 6. No panics on arbitrary drag streams.

use std::time::Duration;

use proptest::prelude::*;
use toastlet_core::geometry::Point;
use toastlet_core::gesture::{GestureRecognizer, GestureState};
use toastlet_core::pause::{PauseChange, PauseCoordinator, PauseReason, PauseReasons};
use toastlet_core::timer::Timestamp;

// ── Helpers ─────────────────────────────────────────────────────────────

fn reason_strategy() -> impl Strategy<Value = PauseReason> {
    prop::sample::select(PauseReason::ALL.to_vec())
}

fn op_strategy() -> impl Strategy<Value = (PauseReason, bool)> {
    (reason_strategy(), any::<bool>())
}

fn apply(ops: &[(PauseReason, bool)]) -> PauseCoordinator {
    let mut pause = PauseCoordinator::new();
    for &(reason, active) in ops {
        pause.set_reason(reason, active);
    }
    pause
}

fn expected(ops: &[(PauseReason, bool)]) -> PauseReasons {
    let mut set = PauseReasons::empty();
    for reason in PauseReason::ALL {
        if let Some(&(_, active)) = ops.iter().rev().find(|(r, _)| *r == reason) {
            set.set(reason.flag(), active);
        }
    }
    set
}

fn drag_strategy() -> impl Strategy<Value = Vec<(f32, f32)>> {
    prop::collection::vec((-400.0f32..400.0, -200.0f32..200.0), 1..12)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Pause set is order independent across reasons
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pause_set_depends_only_on_last_op(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let pause = apply(&ops);
        let want = expected(&ops);
        prop_assert_eq!(pause.reasons(), want, "ops={:?}", ops);
        prop_assert_eq!(pause.is_paused(), !want.is_empty());
    }

    #[test]
    fn reversing_interleaving_of_distinct_reasons_is_equivalent(
        a in reason_strategy(),
        b in reason_strategy(),
        a_on in any::<bool>(),
        b_on in any::<bool>(),
    ) {
        prop_assume!(a != b);
        let forward = apply(&[(a, a_on), (b, b_on)]);
        let backward = apply(&[(b, b_on), (a, a_on)]);
        prop_assert_eq!(forward.reasons(), backward.reasons());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Reported transitions agree with state
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn change_reports_match_state(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut pause = PauseCoordinator::new();
        for (reason, active) in ops {
            let before = pause.reasons();
            let change = pause.set_reason(reason, active);
            let after = pause.reasons();
            match change {
                PauseChange::Unchanged => prop_assert_eq!(before, after),
                PauseChange::Paused => prop_assert!(before.is_empty() && !after.is_empty()),
                PauseChange::Resumed => prop_assert!(!before.is_empty() && after.is_empty()),
                PauseChange::Updated => {
                    prop_assert!(before != after && !before.is_empty() && !after.is_empty());
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Gesture outcomes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn commit_requires_dismissible_and_distance(
        moves in drag_strategy(),
        dismissible in any::<bool>(),
    ) {
        let mut rec = GestureRecognizer::default();
        rec.begin(Point::new(0.0, 0.0), Timestamp::ZERO);
        for (x, y) in &moves {
            rec.update(Point::new(*x, *y));
        }
        let release = rec.end(Timestamp::from_millis(200), dismissible).unwrap();
        if release.state == GestureState::Committed {
            prop_assert!(dismissible);
            prop_assert!(release.dx.abs() > 100.0);
        }
        if !dismissible {
            prop_assert_ne!(release.state, GestureState::Committed);
        }
        prop_assert_eq!(release.duration, Duration::from_millis(200));
    }

    #[test]
    fn small_travel_stays_idle(
        moves in prop::collection::vec((-10.0f32..=10.0, -300.0f32..300.0), 1..12),
    ) {
        let mut rec = GestureRecognizer::default();
        rec.begin(Point::new(50.0, 50.0), Timestamp::ZERO);
        for (dx, dy) in moves {
            rec.update(Point::new(50.0 + dx, 50.0 + dy));
        }
        prop_assert_eq!(rec.state(), GestureState::Idle);
    }

    #[test]
    fn arbitrary_streams_do_not_panic(
        moves in drag_strategy(),
        cancel_at in any::<Option<usize>>(),
    ) {
        let mut rec = GestureRecognizer::default();
        rec.begin(Point::new(0.0, 0.0), Timestamp::ZERO);
        for (i, (x, y)) in moves.iter().enumerate() {
            if cancel_at.is_some_and(|c| c % moves.len() == i) {
                rec.cancel();
            }
            rec.update(Point::new(*x, *y));
        }
        let _ = rec.end(Timestamp::from_millis(1), true);
        prop_assert!(!rec.is_tracking());
    }
}
