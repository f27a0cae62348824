#![forbid(unsafe_code)]

//! Executes lifecycle commands against one mounted element.
//!
//! [`ToastController`] pairs a [`ToastRecord`] with its element, animation
//! sequencer and resource handles. It feeds inputs to
//! [`lifecycle::dispatch`] and carries out the returned commands on the
//! element and the event loop. Effects that reach beyond this toast
//! (evicting other non-stackables, unregistering) come back to the driver as
//! [`Followups`].

use std::collections::VecDeque;

use toastlet_core::animation::{AnimationSequencer, SETTLE_MARGIN};
use toastlet_core::event::ToastSignal;
use toastlet_core::geometry::Translate;
use toastlet_core::gesture::GestureRecognizer;
use toastlet_core::timer::TimerHandle;

use crate::config::{ClickControl, ToastConfig};
use crate::event_loop::{EventLoop, Task};
use crate::lifecycle::{self, CloseCause, Command, FLAG_RESET_DELAY, Input, Phase, ToastRecord};
use crate::registry::{Closable, ToastId};
use crate::render::{BindingId, Layout, ObserverId, ToastElement};

/// Work the driver must do after a controller handled an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Followups {
    /// Close every other non-stackable toast.
    pub(crate) evict_non_stackable: bool,
    /// Unbind resources and unregister this toast.
    pub(crate) teardown: bool,
}

#[derive(Debug)]
pub(crate) struct ToastController<E> {
    record: ToastRecord,
    element: E,
    sequencer: AnimationSequencer,
    config: ToastConfig,
    bindings: Vec<BindingId>,
    observers: Vec<ObserverId>,
    timer: Option<TimerHandle>,
}

impl<E: ToastElement> ToastController<E> {
    pub(crate) fn new(
        id: ToastId,
        config: ToastConfig,
        element: E,
        gesture: GestureRecognizer,
    ) -> Self {
        Self {
            record: ToastRecord::new(id, &config, gesture),
            element,
            sequencer: AnimationSequencer::new(config.animation_spec()),
            config,
            bindings: Vec::new(),
            observers: Vec::new(),
            timer: None,
        }
    }

    pub(crate) fn id(&self) -> ToastId {
        self.record.id()
    }

    pub(crate) fn record(&self) -> &ToastRecord {
        &self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut ToastRecord {
        &mut self.record
    }

    pub(crate) fn element(&self) -> &E {
        &self.element
    }

    pub(crate) fn config(&self) -> &ToastConfig {
        &self.config
    }

    pub(crate) fn attach_resources(
        &mut self,
        bindings: Vec<BindingId>,
        observers: Vec<ObserverId>,
    ) {
        self.bindings = bindings;
        self.observers = observers;
    }

    /// Hand back every binding and observer for release.
    pub(crate) fn into_resources(self) -> (Vec<BindingId>, Vec<ObserverId>) {
        (self.bindings, self.observers)
    }

    /// Dispatch `input` and execute the resulting commands.
    ///
    /// A click handler asking to close is queued behind the current input,
    /// so it is handled only after the click has fully run.
    pub(crate) fn handle(&mut self, input: Input, events: &mut EventLoop) -> Followups {
        let mut followups = Followups::default();
        let mut queue = VecDeque::from([input]);
        while let Some(input) = queue.pop_front() {
            match input {
                Input::AutoCloseElapsed => self.timer = None,
                Input::Signal(ToastSignal::Detached)
                    if self.element.is_attached() && !events.root_removed =>
                {
                    continue;
                }
                _ => {}
            }
            let commands = lifecycle::dispatch(&mut self.record, input, &events.context());
            for command in commands {
                self.execute(command, events, &mut queue, &mut followups);
            }
        }
        followups
    }

    fn execute(
        &mut self,
        command: Command,
        events: &mut EventLoop,
        queue: &mut VecDeque<Input>,
        followups: &mut Followups,
    ) {
        let id = self.id();
        match command {
            Command::ArmTimer(delay) => {
                if let Some(stale) = self.timer.take() {
                    events.cancel(stale);
                }
                self.timer = Some(events.schedule(id, Task::AutoClose, delay));
                if self.config.has_progress_bar() {
                    self.element.start_progress(delay);
                }
                toastlet_core::debug!(
                    toast_id = id.get(),
                    deadline = %(events.now + delay),
                    "auto-close armed"
                );
            }
            Command::CancelTimer => {
                if let Some(handle) = self.timer.take() {
                    events.cancel(handle);
                    toastlet_core::debug!(toast_id = id.get(), "auto-close cancelled");
                }
                if self.config.has_progress_bar() {
                    self.element.freeze_progress();
                }
            }
            Command::ShowControls(visible) => self.element.show_controls(visible),
            Command::SetPauseIcon(paused) => self.element.set_pause_icon(paused),
            Command::RequestFrame(task) => {
                events.request_frame(id, task);
            }
            Command::PrepareEnter => self.sequencer.prepare_enter(&mut self.element),
            Command::RunEnter => {
                let duration = self.sequencer.run_enter(&mut self.element);
                events.schedule(id, Task::EnterSettled, duration + SETTLE_MARGIN);
            }
            Command::BeginExit => {
                self.sequencer.prepare_exit(&mut self.element);
                let duration = self.sequencer.run_exit(&mut self.element);
                events.schedule(id, Task::ExitSettled, duration + SETTLE_MARGIN);
            }
            Command::ScheduleTeardown(delay) => {
                events.schedule(id, Task::ExitSettled, delay);
            }
            Command::SwipeExit(direction) => self.sequencer.set_swipe_exit(direction),
            Command::DragOffset(dx) => self.element.set_translate(Translate::px(dx, 0.0)),
            Command::SnapBack => self.element.set_translate(Translate::NONE),
            Command::SuspendTransition => self.element.set_transition_enabled(false),
            Command::RestoreTransition => {
                let enabled = self.sequencer.spec().transition_enabled();
                self.element.set_transition_enabled(enabled);
                self.element.force_reflow();
            }
            Command::ApplyLayout(mode) => {
                let layout = Layout::for_mode(&self.config, mode);
                self.sequencer.set_exit_translate(layout.placement.edge().retreat());
                self.element.apply_layout(&layout);
            }
            Command::Blur => self.element.blur(),
            Command::ScheduleFlagReset(kind) => {
                events.schedule(id, Task::FlagReset(kind), FLAG_RESET_DELAY);
            }
            Command::InvokeClick => {
                let Some(handler) = self.config.on_click.clone() else {
                    return;
                };
                let mut control = ClickControl::new(id, self.record.click_disabled());
                handler.call(&mut control);
                self.record.set_click_disabled(control.is_disabled());
                if control.close_requested() {
                    queue.push_back(Input::Close(CloseCause::ClickHandler));
                }
            }
            Command::EvictNonStackable => followups.evict_non_stackable = true,
            Command::Teardown => {
                self.timer = None;
                events.cancel_all(id);
                self.element.remove();
                followups.teardown = true;
            }
        }
    }
}

impl<E: ToastElement> Closable<EventLoop> for ToastController<E> {
    type Cause = CloseCause;

    fn request_close(&mut self, cause: CloseCause, events: &mut EventLoop) -> bool {
        let before = self.record.phase();
        if matches!(before, Phase::Closing | Phase::Removed) {
            return false;
        }
        self.handle(Input::Close(cause), events);
        self.record.phase() == Phase::Closing
    }
}
