//! Property-based invariant tests for the toast lifecycle, driven through
//! the public [`Toaster`] API with arbitrary operation streams.
//!
//! 1. The auto-close timer is armed iff the toast is Active with a duration.
//! 2. Paused iff at least one pause reason is held.
//! 3. At most one non-stackable toast is live outside Closing.
//! 4. Once everything is closed and settled, nothing stays registered or bound.
//! 5. No panics on arbitrary signal interleavings.

use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use toastlet::{
    Bucket, Environment, HeadlessRenderer, Key, Phase, Point, Target, ToastId, ToastSignal,
    Toaster,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Notify { stackable: bool, sticky: bool },
    Signal { slot: usize, signal: ToastSignal },
    Advance(u64),
    Close(Option<usize>),
    CloseAll,
    Detach(usize),
    SwitchEnvironment { mobile: bool },
    SetHidden(bool),
}

fn signal_strategy() -> impl Strategy<Value = ToastSignal> {
    prop_oneof![
        Just(ToastSignal::PointerEnter { emulated_touch: false }),
        Just(ToastSignal::PointerLeave { into_toast: false, emulated_touch: false }),
        Just(ToastSignal::PointerDown),
        Just(ToastSignal::PointerUp),
        any::<bool>().prop_map(|from_pointer| ToastSignal::FocusIn { from_pointer }),
        Just(ToastSignal::FocusOut { focus_within: false }),
        (0.0f32..400.0).prop_map(|x| ToastSignal::TouchStart { position: Point::new(x, 50.0) }),
        (0.0f32..400.0).prop_map(|x| ToastSignal::TouchMove { position: Point::new(x, 55.0) }),
        Just(ToastSignal::TouchEnd { target: Target::Content }),
        Just(ToastSignal::TouchCancel),
        Just(ToastSignal::Click { target: Target::PauseButton }),
        Just(ToastSignal::Click { target: Target::CloseButton }),
        Just(ToastSignal::Key { key: Key::Escape, target: Target::Toast }),
        Just(ToastSignal::Key { key: Key::Enter, target: Target::Toast }),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<bool>(), prop::bool::weighted(0.2))
            .prop_map(|(stackable, sticky)| Op::Notify { stackable, sticky }),
        6 => (0usize..8, signal_strategy()).prop_map(|(slot, signal)| Op::Signal { slot, signal }),
        4 => (0u64..2500).prop_map(Op::Advance),
        1 => prop::option::of(0usize..8).prop_map(Op::Close),
        1 => Just(Op::CloseAll),
        1 => (0usize..8).prop_map(Op::Detach),
        1 => any::<bool>().prop_map(|mobile| Op::SwitchEnvironment { mobile }),
        1 => any::<bool>().prop_map(Op::SetHidden),
    ]
}

struct Harness {
    toaster: Toaster<HeadlessRenderer>,
    dom: HeadlessRenderer,
    created: Vec<ToastId>,
}

impl Harness {
    fn new() -> Self {
        let dom = HeadlessRenderer::new();
        Self {
            toaster: Toaster::new(dom.clone()),
            dom,
            created: Vec::new(),
        }
    }

    fn slot(&self, slot: usize) -> Option<ToastId> {
        if self.created.is_empty() {
            None
        } else {
            Some(self.created[slot % self.created.len()])
        }
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Notify { stackable, sticky } => {
                let options = json!({"stackable": stackable, "sticky": sticky, "duration": 1500});
                let id = self.toaster.notify("info", "x", &options).unwrap().id();
                self.created.push(id);
            }
            Op::Signal { slot, signal } => {
                if let Some(id) = self.slot(slot) {
                    self.toaster.signal(id, signal);
                }
            }
            Op::Advance(ms) => self.toaster.advance_by(Duration::from_millis(ms)),
            Op::Close(slot) => {
                let id = slot.and_then(|slot| self.slot(slot));
                self.toaster.close(id);
            }
            Op::CloseAll => {
                self.toaster.close_all();
            }
            Op::Detach(slot) => {
                if let Some(id) = self.slot(slot) {
                    self.dom.detach(id);
                }
            }
            Op::SwitchEnvironment { mobile } => {
                let env = if mobile {
                    Environment::mobile()
                } else {
                    Environment::desktop()
                };
                self.dom.set_environment(env);
                self.toaster.resize();
            }
            Op::SetHidden(hidden) => {
                self.dom.set_document_hidden(hidden);
                self.toaster.visibility_changed();
            }
        }
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let mut open_non_stackable = 0;
        for id in self.toaster.ids(None) {
            let record = self.toaster.record(id).unwrap();
            let phase = record.phase();
            let armed = record.is_timer_armed();
            prop_assert_eq!(
                armed,
                phase == Phase::Active && !self.toaster.config(id).unwrap().sticky,
                "toast {} phase={} armed={}",
                id.get(),
                phase,
                armed
            );
            match phase {
                Phase::Paused => prop_assert!(!record.pause_reasons().is_empty()),
                Phase::Active => prop_assert!(record.pause_reasons().is_empty()),
                _ => {}
            }
            if !record.is_stackable() && phase != Phase::Closing {
                open_non_stackable += 1;
            }
        }
        prop_assert!(open_non_stackable <= 1, "{} open non-stackables", open_non_stackable);
        Ok(())
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3, 5. Invariants hold after every operation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
            harness.check()?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Closing everything releases every resource
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn close_all_then_settle_leaves_nothing(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut harness = Harness::new();
        for op in &ops {
            harness.apply(op);
        }
        harness.toaster.close_all();
        harness.toaster.advance_by(Duration::from_millis(1000));

        prop_assert!(harness.toaster.is_empty());
        prop_assert!(harness.toaster.ids(Some(Bucket::Stackable)).is_empty());
        prop_assert_eq!(harness.dom.total_live_bindings(), 0);
        for id in &harness.created {
            prop_assert_eq!(harness.dom.live_observers(*id), 0);
            prop_assert_eq!(harness.toaster.pending_timers(*id), 0);
            prop_assert!(harness.dom.element(*id).map_or(true, |e| !e.attached));
        }
        prop_assert_eq!(harness.toaster.next_deadline(), None);
    }
}
