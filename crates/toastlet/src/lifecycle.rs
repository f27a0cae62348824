#![forbid(unsafe_code)]

//! Per-toast lifecycle state machine.
//!
//! [`ToastRecord`] is plain data. [`dispatch`] applies one [`Input`] to a
//! record and returns the [`Command`]s the owner must carry out (arm a
//! timer, run an animation, tear down). Nothing here touches an element or
//! a clock directly, so every transition can be tested in isolation.
//!
//! ```text
//! Entering --enter settled--> Active <--pause set--> Paused
//!     \                         |                      |
//!      \------------------------+----- close ----------+--> Closing --exit settled--> Removed
//! ```
//!
//! # Invariants
//!
//! 1. The auto-close timer is armed iff the phase is `Active` and the toast
//!    has an auto-close delay. `Active` vs `Paused` is derived from the pause
//!    set after every dispatch, so re-arming always uses the full delay.
//! 2. Once `Closing`, the only input that does anything is `ExitSettled`;
//!    once `Removed`, nothing does. This guard lives in [`dispatch`] and
//!    nowhere else.
//! 3. Entering `Closing` always emits `CancelTimer`.
//! 4. `Teardown` is emitted exactly once, on `Closing -> Removed`.

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use toastlet_core::event::{Key, Target, ToastSignal};
use toastlet_core::gesture::{GestureRecognizer, GestureState, SwipeDirection};
use toastlet_core::pause::{PauseChange, PauseCoordinator, PauseReason, PauseReasons};
use toastlet_core::timer::Timestamp;

use crate::config::{PauseOptions, ToastConfig};
use crate::registry::ToastId;
use crate::render::{DisplayMode, Environment};

/// Delay before a pointer, touch or click flag is cleared.
pub const FLAG_RESET_DELAY: Duration = Duration::from_millis(10);

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Entering,
    Active,
    Paused,
    Closing,
    Removed,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closing => "closing",
            Self::Removed => "removed",
        }
    }

    /// Active or Paused.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a toast started closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCause {
    Timeout,
    CloseButton,
    Escape,
    Swipe,
    /// `close(id)` or a handle's `close`.
    Api,
    /// `close_all` and the per-bucket variants.
    Bulk,
    /// A newer non-stackable toast replaced this one.
    Evicted,
    ClickHandler,
    /// The element was removed by someone else.
    Detached,
}

impl CloseCause {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::CloseButton => "close-button",
            Self::Escape => "escape",
            Self::Swipe => "swipe",
            Self::Api => "api",
            Self::Bulk => "bulk",
            Self::Evicted => "evicted",
            Self::ClickHandler => "click-handler",
            Self::Detached => "detached",
        }
    }
}

impl fmt::Display for CloseCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Transient interaction state that is not a pause reason.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Interaction: u8 {
        /// A fine pointer is over the toast.
        const HOVERED = 0b0000_0001;
        /// A tap toggled the controls on.
        const TOUCH_TOGGLED = 0b0000_0010;
        /// Keyboard focus is inside the toast.
        const FOCUS_WITHIN = 0b0000_0100;
        /// A mouse press or touch is in progress (cleared shortly after release).
        const POINTER_ACTIVE = 0b0000_1000;
        /// A touch sequence is in progress (cleared shortly after release).
        const TOUCH_ACTIVE = 0b0001_0000;
        /// The click handler ran within the last few milliseconds.
        const CLICK_IN_PROGRESS = 0b0010_0000;
    }
}

/// A delayed flag clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagReset {
    Pointer,
    Touch,
    Click,
}

impl FlagReset {
    #[must_use]
    pub const fn flag(self) -> Interaction {
        match self {
            Self::Pointer => Interaction::POINTER_ACTIVE,
            Self::Touch => Interaction::TOUCH_ACTIVE,
            Self::Click => Interaction::CLICK_IN_PROGRESS,
        }
    }
}

/// Work deferred to the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    /// Start the enter animation.
    Enter,
    /// Re-enable transitions suspended by a layout change.
    RestoreTransition,
}

/// Lifecycle state of one toast.
#[derive(Debug, Clone)]
pub struct ToastRecord {
    id: ToastId,
    phase: Phase,
    stackable: bool,
    sticky: bool,
    dismissible: bool,
    auto_close: Option<Duration>,
    pause_options: PauseOptions,
    has_pause_button: bool,
    has_controls: bool,
    has_click_handler: bool,
    click_disabled: bool,
    mode: DisplayMode,
    pause: PauseCoordinator,
    gesture: GestureRecognizer,
    interaction: Interaction,
    timer_armed: bool,
    controls_visible: bool,
    close_cause: Option<CloseCause>,
}

impl ToastRecord {
    #[must_use]
    pub fn new(id: ToastId, config: &ToastConfig, gesture: GestureRecognizer) -> Self {
        Self {
            id,
            phase: Phase::Entering,
            stackable: config.stackable,
            sticky: config.sticky,
            dismissible: config.dismissible,
            auto_close: config.auto_close(),
            pause_options: config.pause,
            has_pause_button: config.has_pause_button(),
            has_controls: config.has_controls(),
            has_click_handler: config.on_click.is_some(),
            click_disabled: false,
            mode: DisplayMode::Desktop,
            pause: PauseCoordinator::new(),
            gesture,
            interaction: Interaction::empty(),
            timer_armed: false,
            controls_visible: false,
            close_cause: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_stackable(&self) -> bool {
        self.stackable
    }

    #[must_use]
    pub const fn pause_reasons(&self) -> PauseReasons {
        self.pause.reasons()
    }

    #[must_use]
    pub const fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    #[must_use]
    pub const fn interaction(&self) -> Interaction {
        self.interaction
    }

    #[must_use]
    pub const fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    #[must_use]
    pub const fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Why the toast started closing, once it has.
    #[must_use]
    pub const fn close_cause(&self) -> Option<CloseCause> {
        self.close_cause
    }

    #[must_use]
    pub const fn click_disabled(&self) -> bool {
        self.click_disabled
    }

    pub fn set_click_disabled(&mut self, disabled: bool) {
        self.click_disabled = disabled;
    }

    fn pause_allowed(&self, reason: PauseReason) -> bool {
        match reason {
            PauseReason::Hover => self.pause_options.hover,
            PauseReason::Focus => self.pause_options.focus,
            PauseReason::TouchHold => self.pause_options.touch,
            PauseReason::TabHidden => self.pause_options.inactive_tab,
            PauseReason::ManualPause => true,
        }
    }
}

/// Something that happened to a toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// The element was rendered and registered.
    Mount,
    Signal(ToastSignal),
    /// The first animation frame after mounting.
    EnterFrame,
    EnterSettled,
    AutoCloseElapsed,
    FlagReset(FlagReset),
    RestoreTransitionFrame,
    Close(CloseCause),
    ExitSettled,
}

/// Ambient state visible to a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub now: Timestamp,
    pub env: Environment,
}

/// Effect requested by a dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Schedule the auto-close timer for the full delay.
    ArmTimer(Duration),
    CancelTimer,
    ShowControls(bool),
    SetPauseIcon(bool),
    RequestFrame(FrameTask),
    PrepareEnter,
    /// Run the enter animation and schedule `EnterSettled` after it.
    RunEnter,
    /// Run the exit animation and schedule `ExitSettled` after it.
    BeginExit,
    /// Schedule `ExitSettled` without any exit animation.
    ScheduleTeardown(Duration),
    /// Leave toward the swipe instead of the default exit.
    SwipeExit(SwipeDirection),
    /// Follow the finger horizontally.
    DragOffset(f32),
    SnapBack,
    SuspendTransition,
    RestoreTransition,
    ApplyLayout(DisplayMode),
    Blur,
    ScheduleFlagReset(FlagReset),
    InvokeClick,
    EvictNonStackable,
    Teardown,
}

/// Apply `input` to `record` and return the resulting commands.
pub fn dispatch(record: &mut ToastRecord, input: Input, cx: &Context) -> Vec<Command> {
    let span = toastlet_core::debug_span!("toast.dispatch", toast_id = record.id.get());
    let _guard = span.enter();

    match (record.phase, input) {
        (Phase::Removed, _) => return Vec::new(),
        (Phase::Closing, Input::ExitSettled) => {}
        (Phase::Closing, _) => return Vec::new(),
        _ => {}
    }

    let mut step = Step {
        rec: record,
        cx,
        out: Vec::new(),
    };
    step.apply(input);
    step.reconcile();
    step.out
}

struct Step<'a> {
    rec: &'a mut ToastRecord,
    cx: &'a Context,
    out: Vec<Command>,
}

impl Step<'_> {
    fn emit(&mut self, command: Command) {
        self.out.push(command);
    }

    fn apply(&mut self, input: Input) {
        match input {
            Input::Mount => self.mount(),
            Input::Signal(signal) => self.signal(signal),
            Input::EnterFrame => {
                if self.rec.phase == Phase::Entering {
                    self.emit(Command::RunEnter);
                }
            }
            Input::EnterSettled => {
                if self.rec.phase == Phase::Entering {
                    self.set_phase(Phase::Active);
                }
            }
            Input::AutoCloseElapsed => {
                let armed = std::mem::replace(&mut self.rec.timer_armed, false);
                if armed && self.rec.phase == Phase::Active {
                    self.begin_close(CloseCause::Timeout);
                }
            }
            Input::FlagReset(kind) => self.rec.interaction.remove(kind.flag()),
            Input::RestoreTransitionFrame => self.emit(Command::RestoreTransition),
            Input::Close(cause) => self.begin_close(cause),
            Input::ExitSettled => {
                self.set_phase(Phase::Removed);
                self.emit(Command::Teardown);
            }
        }
    }

    fn mount(&mut self) {
        if self.rec.phase != Phase::Entering {
            return;
        }
        let mode = self.cx.env.display_mode();
        self.rec.mode = mode;
        self.emit(Command::ApplyLayout(mode));
        self.emit(Command::PrepareEnter);
        if self.cx.env.document_hidden {
            self.set_reason(PauseReason::TabHidden, true);
        }
        self.update_controls(true);
        if !self.rec.stackable {
            self.emit(Command::EvictNonStackable);
        }
        self.emit(Command::RequestFrame(FrameTask::Enter));
    }

    fn signal(&mut self, signal: ToastSignal) {
        let flags = self.rec.interaction;
        match signal {
            ToastSignal::PointerDown => {
                if !flags.contains(Interaction::TOUCH_ACTIVE) {
                    self.rec.interaction.insert(Interaction::POINTER_ACTIVE);
                }
            }
            ToastSignal::PointerUp => {
                if !flags.contains(Interaction::TOUCH_ACTIVE) {
                    self.emit(Command::ScheduleFlagReset(FlagReset::Pointer));
                }
            }
            ToastSignal::PointerEnter { emulated_touch } => {
                if emulated_touch
                    || !self.cx.env.hover_capable()
                    || flags.intersects(Interaction::HOVERED | Interaction::POINTER_ACTIVE)
                {
                    return;
                }
                self.rec.interaction.insert(Interaction::HOVERED);
                self.update_controls(false);
                self.set_reason(PauseReason::Hover, true);
            }
            ToastSignal::PointerLeave {
                into_toast,
                emulated_touch,
            } => {
                if into_toast
                    || emulated_touch
                    || !flags.contains(Interaction::HOVERED)
                    || flags.contains(Interaction::TOUCH_ACTIVE)
                {
                    return;
                }
                self.rec.interaction.remove(Interaction::HOVERED);
                self.update_controls(false);
                self.set_reason(PauseReason::Hover, false);
                self.emit(Command::ScheduleFlagReset(FlagReset::Pointer));
            }
            ToastSignal::FocusIn { from_pointer } => {
                if from_pointer || flags.contains(Interaction::POINTER_ACTIVE) {
                    self.emit(Command::Blur);
                    return;
                }
                self.rec.interaction.insert(Interaction::FOCUS_WITHIN);
                self.update_controls(false);
                self.set_reason(PauseReason::Focus, true);
            }
            ToastSignal::FocusOut { focus_within } => {
                if focus_within {
                    return;
                }
                self.rec.interaction.remove(Interaction::FOCUS_WITHIN);
                self.update_controls(false);
                self.set_reason(PauseReason::Focus, false);
            }
            ToastSignal::TouchStart { position } => {
                if self.cx.env.display_mode() != DisplayMode::Mobile {
                    return;
                }
                self.rec
                    .interaction
                    .insert(Interaction::POINTER_ACTIVE | Interaction::TOUCH_ACTIVE);
                self.rec.gesture.begin(position, self.cx.now);
                self.set_reason(PauseReason::TouchHold, true);
                self.emit(Command::SuspendTransition);
            }
            ToastSignal::TouchMove { position } => {
                if !flags.contains(Interaction::TOUCH_ACTIVE) {
                    return;
                }
                if let Some(dx) = self.rec.gesture.update(position) {
                    self.emit(Command::DragOffset(dx));
                }
            }
            ToastSignal::TouchEnd { target } => self.touch_end(target),
            ToastSignal::TouchCancel => {
                if !flags.contains(Interaction::TOUCH_ACTIVE) {
                    return;
                }
                self.emit(Command::ScheduleFlagReset(FlagReset::Pointer));
                self.emit(Command::ScheduleFlagReset(FlagReset::Touch));
                self.rec.gesture.cancel();
                self.emit(Command::RestoreTransition);
                self.emit(Command::SnapBack);
                self.set_reason(PauseReason::TouchHold, false);
            }
            ToastSignal::Key { key, target } => self.key(key, target),
            ToastSignal::Click { target } => match target {
                Target::PauseButton => {
                    if !self.rec.has_pause_button {
                        return;
                    }
                    self.rec.interaction.remove(Interaction::TOUCH_TOGGLED);
                    self.update_controls(false);
                    self.toggle_pause();
                }
                Target::CloseButton => {
                    if !self.rec.dismissible {
                        return;
                    }
                    self.rec.interaction.remove(Interaction::TOUCH_TOGGLED);
                    self.update_controls(false);
                    self.begin_close(CloseCause::CloseButton);
                }
                Target::Toast | Target::Content => self.click(),
            },
            ToastSignal::Resize => self.resize(),
            ToastSignal::VisibilityChange { hidden } => {
                self.set_reason(PauseReason::TabHidden, hidden);
            }
            ToastSignal::Detached => self.detach(),
        }
    }

    fn touch_end(&mut self, target: Target) {
        if !self.rec.interaction.contains(Interaction::TOUCH_ACTIVE) {
            return;
        }
        self.emit(Command::ScheduleFlagReset(FlagReset::Pointer));
        self.emit(Command::ScheduleFlagReset(FlagReset::Touch));
        self.emit(Command::RestoreTransition);
        let Some(release) = self.rec.gesture.end(self.cx.now, self.rec.dismissible) else {
            self.set_reason(PauseReason::TouchHold, false);
            return;
        };

        if let Some(direction) = release.direction() {
            self.emit(Command::SwipeExit(direction));
            self.begin_close(CloseCause::Swipe);
            return;
        }

        self.emit(Command::SnapBack);
        if !release.was_drag() && !target.is_control() {
            let tap_window = self.rec.gesture.config().tap_window;
            if release.is_tap(tap_window) {
                self.rec.interaction.toggle(Interaction::TOUCH_TOGGLED);
                self.update_controls(false);
                if self.rec.has_click_handler {
                    self.click();
                } else {
                    self.toggle_pause();
                }
            }
        }
        // Released after toggling so a paused tap does not re-arm in between.
        self.set_reason(PauseReason::TouchHold, false);
    }

    fn key(&mut self, key: Key, target: Target) {
        let dismissible = self.rec.dismissible;
        match target {
            Target::PauseButton => {
                if key.is_activation() {
                    self.toggle_pause();
                } else if key == Key::Escape && dismissible {
                    self.begin_close(CloseCause::Escape);
                }
            }
            Target::CloseButton => {
                if !dismissible {
                    return;
                }
                if key.is_activation() {
                    self.begin_close(CloseCause::CloseButton);
                } else if key == Key::Escape {
                    self.begin_close(CloseCause::Escape);
                }
            }
            Target::Toast => {
                if key.is_activation() {
                    if self.rec.has_click_handler {
                        self.click();
                    } else {
                        self.toggle_pause();
                    }
                } else if key == Key::Escape && dismissible {
                    self.begin_close(CloseCause::Escape);
                }
            }
            Target::Content => {}
        }
    }

    fn click(&mut self) {
        let rec = &mut self.rec;
        if !rec.has_click_handler
            || rec.click_disabled
            || rec.interaction.contains(Interaction::CLICK_IN_PROGRESS)
        {
            return;
        }
        rec.interaction.insert(Interaction::CLICK_IN_PROGRESS);
        self.emit(Command::ScheduleFlagReset(FlagReset::Click));
        self.emit(Command::InvokeClick);
    }

    fn toggle_pause(&mut self) {
        if self.rec.sticky {
            return;
        }
        let paused = !self.rec.pause.contains(PauseReason::ManualPause);
        self.set_reason(PauseReason::ManualPause, paused);
        self.emit(Command::SetPauseIcon(paused));
    }

    fn resize(&mut self) {
        let mode = self.cx.env.display_mode();
        self.rec.mode = mode;
        let flags = self.rec.interaction;
        match mode {
            DisplayMode::Mobile => {
                if self.rec.pause.contains(PauseReason::ManualPause) {
                    self.rec.interaction.insert(Interaction::TOUCH_TOGGLED);
                }
            }
            DisplayMode::Desktop => {
                if !flags.intersects(Interaction::HOVERED | Interaction::FOCUS_WITHIN) {
                    self.rec.interaction.remove(Interaction::TOUCH_TOGGLED);
                }
            }
        }
        self.emit(Command::SuspendTransition);
        self.emit(Command::ApplyLayout(mode));
        self.emit(Command::RequestFrame(FrameTask::RestoreTransition));
        self.update_controls(false);
    }

    fn detach(&mut self) {
        toastlet_core::debug!(toast_id = self.rec.id.get(), "element detached externally");
        self.enter_closing(CloseCause::Detached);
        self.emit(Command::ScheduleTeardown(Duration::ZERO));
    }

    fn begin_close(&mut self, cause: CloseCause) {
        self.enter_closing(cause);
        self.emit(Command::BeginExit);
    }

    fn enter_closing(&mut self, cause: CloseCause) {
        toastlet_core::debug!(toast_id = self.rec.id.get(), cause = cause.as_str(), "closing");
        self.set_phase(Phase::Closing);
        self.rec.close_cause = Some(cause);
        self.rec.timer_armed = false;
        self.rec.gesture.reset();
        self.emit(Command::CancelTimer);
    }

    fn update_controls(&mut self, force: bool) {
        let rec = &mut self.rec;
        if !rec.has_controls {
            return;
        }
        let visible = rec.interaction.intersects(
            Interaction::HOVERED | Interaction::TOUCH_TOGGLED | Interaction::FOCUS_WITHIN,
        ) || (rec.mode == DisplayMode::Mobile && rec.has_click_handler);
        if force || visible != rec.controls_visible {
            rec.controls_visible = visible;
            self.emit(Command::ShowControls(visible));
        }
    }

    fn set_reason(&mut self, reason: PauseReason, active: bool) {
        if active && !self.rec.pause_allowed(reason) {
            return;
        }
        let change = self.rec.pause.set_reason(reason, active);
        if change != PauseChange::Unchanged {
            toastlet_core::trace!(
                toast_id = self.rec.id.get(),
                reason = reason.as_str(),
                active,
                "pause reason changed"
            );
        }
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.rec.phase;
        if from == to {
            return;
        }
        toastlet_core::debug!(
            toast_id = self.rec.id.get(),
            from = from.as_str(),
            to = to.as_str(),
            "phase transition"
        );
        self.rec.phase = to;
    }

    /// Derive Active/Paused from the pause set and bring the timer in line.
    fn reconcile(&mut self) {
        if self.rec.phase.is_live() {
            let next = if self.rec.pause.is_paused() {
                Phase::Paused
            } else {
                Phase::Active
            };
            self.set_phase(next);
        }
        let wanted = match self.rec.auto_close {
            Some(delay) if self.rec.phase == Phase::Active => Some(delay),
            _ => None,
        };
        match (wanted, self.rec.timer_armed) {
            (Some(delay), false) => {
                self.rec.timer_armed = true;
                self.emit(Command::ArmTimer(delay));
            }
            (None, true) => {
                self.rec.timer_armed = false;
                self.emit(Command::CancelTimer);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ToastKind;
    use toastlet_core::geometry::Point;

    const FIVE_SECONDS: Duration = Duration::from_millis(5000);

    fn cx(ms: u64) -> Context {
        Context {
            now: Timestamp::from_millis(ms),
            env: Environment::desktop(),
        }
    }

    fn mobile(ms: u64) -> Context {
        Context {
            now: Timestamp::from_millis(ms),
            env: Environment::mobile(),
        }
    }

    fn record(config: &ToastConfig) -> ToastRecord {
        ToastRecord::new(ToastId::from_raw(1), config, GestureRecognizer::default())
    }

    fn active(config: &ToastConfig) -> ToastRecord {
        let mut rec = record(config);
        dispatch(&mut rec, Input::Mount, &cx(0));
        dispatch(&mut rec, Input::EnterFrame, &cx(0));
        dispatch(&mut rec, Input::EnterSettled, &cx(320));
        rec
    }

    const HOVER: ToastSignal = ToastSignal::PointerEnter {
        emulated_touch: false,
    };

    fn touch_start(x: f32, y: f32) -> ToastSignal {
        ToastSignal::TouchStart {
            position: Point::new(x, y),
        }
    }

    fn touch_move(x: f32, y: f32) -> ToastSignal {
        ToastSignal::TouchMove {
            position: Point::new(x, y),
        }
    }

    fn touch_end(target: Target) -> ToastSignal {
        ToastSignal::TouchEnd { target }
    }

    fn signal(rec: &mut ToastRecord, signal: ToastSignal, cx: &Context) -> Vec<Command> {
        dispatch(rec, Input::Signal(signal), cx)
    }

    #[test]
    fn mount_prepares_and_requests_enter_frame() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = record(&config);
        let out = dispatch(&mut rec, Input::Mount, &cx(0));
        assert_eq!(
            out,
            vec![
                Command::ApplyLayout(DisplayMode::Desktop),
                Command::PrepareEnter,
                Command::ShowControls(false),
                Command::EvictNonStackable,
                Command::RequestFrame(FrameTask::Enter),
            ]
        );
        assert_eq!(rec.phase(), Phase::Entering);
        assert!(!rec.is_timer_armed());
    }

    #[test]
    fn stackable_mount_does_not_evict() {
        let mut config = ToastConfig::defaults(ToastKind::Info);
        config.stackable = true;
        let mut rec = record(&config);
        let out = dispatch(&mut rec, Input::Mount, &cx(0));
        assert!(!out.contains(&Command::EvictNonStackable));
    }

    #[test]
    fn enter_settled_arms_full_duration() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = record(&config);
        dispatch(&mut rec, Input::Mount, &cx(0));
        assert_eq!(dispatch(&mut rec, Input::EnterFrame, &cx(0)), vec![Command::RunEnter]);
        let out = dispatch(&mut rec, Input::EnterSettled, &cx(320));
        assert_eq!(out, vec![Command::ArmTimer(FIVE_SECONDS)]);
        assert_eq!(rec.phase(), Phase::Active);
        assert!(rec.is_timer_armed());
    }

    #[test]
    fn reasons_added_while_entering_hold_the_toast_paused() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = record(&config);
        dispatch(&mut rec, Input::Mount, &cx(0));
        signal(&mut rec, HOVER, &cx(50));
        assert_eq!(rec.phase(), Phase::Entering);
        let out = dispatch(&mut rec, Input::EnterSettled, &cx(320));
        assert!(out.iter().all(|c| !matches!(c, Command::ArmTimer(_))));
        assert_eq!(rec.phase(), Phase::Paused);
    }

    #[test]
    fn hover_pauses_and_leave_rearms_full_duration() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = signal(&mut rec, HOVER, &cx(1000));
        assert_eq!(out, vec![Command::ShowControls(true), Command::CancelTimer]);
        assert_eq!(rec.phase(), Phase::Paused);
        let out = signal(
            &mut rec,
            ToastSignal::PointerLeave {
                into_toast: false,
                emulated_touch: false,
            },
            &cx(3000),
        );
        assert_eq!(
            out,
            vec![
                Command::ShowControls(false),
                Command::ScheduleFlagReset(FlagReset::Pointer),
                Command::ArmTimer(FIVE_SECONDS),
            ]
        );
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn hover_ignored_without_fine_pointer_or_when_disabled() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = signal(&mut rec, HOVER, &mobile(10));
        assert!(out.is_empty());

        let mut no_hover = ToastConfig::defaults(ToastKind::Info);
        no_hover.pause.hover = false;
        let mut rec = active(&no_hover);
        let out = signal(&mut rec, HOVER, &cx(10));
        assert_eq!(out, vec![Command::ShowControls(true)]);
        assert!(rec.is_timer_armed());
    }

    #[test]
    fn pointer_press_suppresses_hover_and_blurs_focus() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, ToastSignal::PointerDown, &cx(10));
        assert!(signal(&mut rec, HOVER, &cx(11)).is_empty());
        assert_eq!(
            signal(&mut rec, ToastSignal::FocusIn { from_pointer: false }, &cx(12)),
            vec![Command::Blur]
        );
        assert_eq!(
            signal(&mut rec, ToastSignal::PointerUp, &cx(13)),
            vec![Command::ScheduleFlagReset(FlagReset::Pointer)]
        );
        dispatch(&mut rec, Input::FlagReset(FlagReset::Pointer), &cx(23));
        assert!(!rec.interaction().contains(Interaction::POINTER_ACTIVE));
    }

    #[test]
    fn keyboard_focus_pauses_until_focus_leaves() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, ToastSignal::FocusIn { from_pointer: false }, &cx(10));
        assert_eq!(rec.phase(), Phase::Paused);
        assert!(signal(&mut rec, ToastSignal::FocusOut { focus_within: true }, &cx(20)).is_empty());
        signal(&mut rec, ToastSignal::FocusOut { focus_within: false }, &cx(30));
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn closing_ignores_everything_but_exit() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = dispatch(&mut rec, Input::Close(CloseCause::Api), &cx(100));
        assert_eq!(out, vec![Command::CancelTimer, Command::BeginExit]);
        assert_eq!(rec.phase(), Phase::Closing);
        assert_eq!(rec.close_cause(), Some(CloseCause::Api));

        assert!(dispatch(&mut rec, Input::Close(CloseCause::Bulk), &cx(101)).is_empty());
        assert!(signal(&mut rec, HOVER, &cx(102)).is_empty());
        assert!(dispatch(&mut rec, Input::AutoCloseElapsed, &cx(103)).is_empty());

        assert_eq!(dispatch(&mut rec, Input::ExitSettled, &cx(420)), vec![Command::Teardown]);
        assert_eq!(rec.phase(), Phase::Removed);
        assert!(dispatch(&mut rec, Input::ExitSettled, &cx(421)).is_empty());
    }

    #[test]
    fn timeout_closes_only_when_armed_and_active() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = dispatch(&mut rec, Input::AutoCloseElapsed, &cx(5320));
        assert_eq!(out, vec![Command::CancelTimer, Command::BeginExit]);

        let mut sticky = ToastConfig::defaults(ToastKind::Info);
        sticky.sticky = true;
        let mut rec = active(&sticky);
        assert!(!rec.is_timer_armed());
        assert!(dispatch(&mut rec, Input::AutoCloseElapsed, &cx(5320)).is_empty());
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn escape_closes_only_dismissible() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let escape = ToastSignal::Key {
            key: Key::Escape,
            target: Target::Toast,
        };
        assert!(signal(&mut rec, escape, &cx(10)).contains(&Command::BeginExit));

        let loading = ToastConfig::defaults(ToastKind::Loading);
        let mut rec = active(&loading);
        assert!(signal(&mut rec, escape, &cx(10)).is_empty());
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn enter_on_toast_toggles_manual_pause() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let enter = ToastSignal::Key {
            key: Key::Enter,
            target: Target::Toast,
        };
        let out = signal(&mut rec, enter, &cx(10));
        assert_eq!(out, vec![Command::SetPauseIcon(true), Command::CancelTimer]);
        let out = signal(&mut rec, enter, &cx(20));
        assert_eq!(out, vec![Command::SetPauseIcon(false), Command::ArmTimer(FIVE_SECONDS)]);
    }

    #[test]
    fn keys_on_content_are_ignored() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let key = ToastSignal::Key {
            key: Key::Escape,
            target: Target::Content,
        };
        assert!(signal(&mut rec, key, &cx(10)).is_empty());
    }

    #[test]
    fn click_handler_is_debounced_and_respects_disable() {
        let config = ToastConfig::defaults(ToastKind::Info).on_click(|_| {});
        let mut rec = active(&config);
        let click = ToastSignal::Click {
            target: Target::Content,
        };
        assert_eq!(
            signal(&mut rec, click, &cx(10)),
            vec![Command::ScheduleFlagReset(FlagReset::Click), Command::InvokeClick]
        );
        assert!(signal(&mut rec, click, &cx(12)).is_empty());
        dispatch(&mut rec, Input::FlagReset(FlagReset::Click), &cx(20));
        rec.set_click_disabled(true);
        assert!(signal(&mut rec, click, &cx(30)).is_empty());
    }

    #[test]
    fn swipe_past_threshold_commits_when_dismissible() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, touch_start(100.0, 50.0), &mobile(1000));
        assert_eq!(rec.phase(), Phase::Paused);
        signal(&mut rec, touch_move(180.0, 52.0), &mobile(1050));
        signal(&mut rec, touch_move(250.0, 55.0), &mobile(1100));
        let out = signal(&mut rec, touch_end(Target::Content), &mobile(1150));
        assert!(out.contains(&Command::SwipeExit(SwipeDirection::Right)));
        assert!(out.contains(&Command::BeginExit));
        assert_eq!(rec.phase(), Phase::Closing);
    }

    #[test]
    fn swipe_on_non_dismissible_snaps_back() {
        let config = ToastConfig::defaults(ToastKind::Loading);
        let mut rec = active(&config);
        signal(&mut rec, touch_start(200.0, 50.0), &mobile(1000));
        signal(&mut rec, touch_move(50.0, 50.0), &mobile(1100));
        let out = signal(&mut rec, touch_end(Target::Content), &mobile(1200));
        assert!(out.contains(&Command::SnapBack));
        assert!(!out.contains(&Command::BeginExit));
        assert_eq!(rec.gesture_state(), GestureState::Cancelled);
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn tap_toggles_controls_and_pause() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, touch_start(10.0, 10.0), &mobile(1000));
        let out = signal(&mut rec, touch_end(Target::Content), &mobile(1100));
        assert!(out.contains(&Command::ShowControls(true)));
        assert!(out.contains(&Command::SetPauseIcon(true)));
        assert!(!out.iter().any(|c| matches!(c, Command::ArmTimer(_))));
        assert!(rec.pause_reasons().contains(PauseReasons::MANUAL));
        assert!(!rec.pause_reasons().contains(PauseReasons::TOUCH_HOLD));
        assert_eq!(rec.phase(), Phase::Paused);
    }

    #[test]
    fn long_press_resumes_without_toggling() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, touch_start(10.0, 10.0), &mobile(1000));
        let out = signal(&mut rec, touch_end(Target::Content), &mobile(1600));
        assert!(out.contains(&Command::ArmTimer(FIVE_SECONDS)));
        assert!(!rec.interaction().contains(Interaction::TOUCH_TOGGLED));
    }

    #[test]
    fn touch_ignored_on_desktop() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = signal(&mut rec, touch_start(0.0, 0.0), &cx(10));
        assert!(out.is_empty());
        assert!(signal(&mut rec, touch_end(Target::Toast), &cx(20)).is_empty());
    }

    #[test]
    fn touch_cancel_releases_hold() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, touch_start(0.0, 0.0), &mobile(10));
        let out = signal(&mut rec, ToastSignal::TouchCancel, &mobile(20));
        assert!(out.contains(&Command::SnapBack));
        assert!(out.contains(&Command::ArmTimer(FIVE_SECONDS)));
    }

    #[test]
    fn visibility_gated_by_option() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(&mut rec, ToastSignal::VisibilityChange { hidden: true }, &cx(10));
        assert_eq!(rec.phase(), Phase::Paused);
        signal(&mut rec, ToastSignal::VisibilityChange { hidden: false }, &cx(20));
        assert_eq!(rec.phase(), Phase::Active);

        let mut ignore = ToastConfig::defaults(ToastKind::Info);
        ignore.pause.inactive_tab = false;
        let mut rec = active(&ignore);
        signal(&mut rec, ToastSignal::VisibilityChange { hidden: true }, &cx(10));
        assert_eq!(rec.phase(), Phase::Active);
    }

    #[test]
    fn detach_skips_exit_animation() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        let out = signal(&mut rec, ToastSignal::Detached, &cx(10));
        assert_eq!(
            out,
            vec![Command::CancelTimer, Command::ScheduleTeardown(Duration::ZERO)]
        );
        assert_eq!(rec.phase(), Phase::Closing);
    }

    #[test]
    fn resize_to_mobile_keeps_controls_for_manual_pause() {
        let config = ToastConfig::defaults(ToastKind::Info);
        let mut rec = active(&config);
        signal(
            &mut rec,
            ToastSignal::Click {
                target: Target::PauseButton,
            },
            &cx(10),
        );
        let out = signal(&mut rec, ToastSignal::Resize, &mobile(20));
        assert_eq!(
            out,
            vec![
                Command::SuspendTransition,
                Command::ApplyLayout(DisplayMode::Mobile),
                Command::RequestFrame(FrameTask::RestoreTransition),
                Command::ShowControls(true),
            ]
        );
        let out = signal(&mut rec, ToastSignal::Resize, &cx(30));
        assert!(out.contains(&Command::ShowControls(false)));
    }
}
