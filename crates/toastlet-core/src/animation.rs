#![forbid(unsafe_code)]

//! Enter and exit sequencing for a toast element.
//!
//! A toast either plays a custom keyframe animation (its `animation.in` /
//! `animation.out` class lists) or falls back to the built-in opacity and
//! translate transition. Either way the real duration is only known once the
//! classes are applied and the element has been reflowed, so the sequencer
//! measures after preparing and before running.
//!
//! # Sequence
//!
//! ```text
//! prepare_enter  -> classes / initial offset, reflow, transition on
//! run_enter      -> measure, play (or set opacity 1 + no offset), reflow
//! prepare_exit   -> swap to exit classes (paused), reflow
//! run_exit       -> measure + play, or opacity 0 + exit offset, reflow, measure
//! ```
//!
//! # Duration resolution
//!
//! Without a named animation the configured transition duration is used.
//! With one, each comma-separated layer contributes `duration + delay` and the
//! longest layer wins; the result is never shorter than the configured
//! transition. Malformed layer values count as zero.

use std::fmt;
use std::time::Duration;

use crate::geometry::Translate;
use crate::gesture::SwipeDirection;

/// Fixed slack added after a measured animation before acting on its end.
pub const SETTLE_MARGIN: Duration = Duration::from_millis(20);

/// Which half of the lifecycle an animation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Enter,
    Exit,
}

/// Custom animation play state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
}

/// Computed animation properties of an element, as CSS strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputedTiming {
    /// `animation-name`, e.g. `"none"` or `"fadeIn, slide"`.
    pub names: String,
    /// `animation-duration`, e.g. `"0.5s, 200ms"`.
    pub durations: String,
    /// `animation-delay`, e.g. `"0s"`.
    pub delays: String,
}

impl ComputedTiming {
    /// Timing of an element without any keyframe animation.
    #[must_use]
    pub fn none() -> Self {
        Self {
            names: "none".to_owned(),
            durations: "0s".to_owned(),
            delays: "0s".to_owned(),
        }
    }

    /// Build a single-layer timing.
    #[must_use]
    pub fn single(name: &str, duration: Duration, delay: Duration) -> Self {
        Self {
            names: name.to_owned(),
            durations: format!("{}ms", duration.as_millis()),
            delays: format!("{}ms", delay.as_millis()),
        }
    }

    /// Whether at least one layer names a real animation.
    #[must_use]
    pub fn has_named_animation(&self) -> bool {
        self.names
            .split(',')
            .map(str::trim)
            .any(|name| !name.is_empty() && name != "none")
    }

    /// Longest `duration + delay` across layers.
    #[must_use]
    pub fn longest_layer(&self) -> Duration {
        let delays = parse_time_list(&self.delays);
        let longest = parse_time_list(&self.durations)
            .into_iter()
            .enumerate()
            .map(|(i, duration)| duration + delays.get(i).copied().unwrap_or(0.0))
            .fold(0.0_f64, f64::max);
        millis_to_duration(longest)
    }
}

/// A CSS time value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimingParseError {
    Empty,
    MissingUnit(String),
    InvalidNumber(String),
}

impl fmt::Display for TimingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty time value"),
            Self::MissingUnit(raw) => write!(f, "time value {raw:?} has no s/ms unit"),
            Self::InvalidNumber(raw) => write!(f, "time value {raw:?} is not a number"),
        }
    }
}

impl std::error::Error for TimingParseError {}

/// Parse one CSS `<time>` into signed milliseconds (`"0.3s"`, `"-50ms"`).
pub fn parse_css_time(raw: &str) -> Result<f64, TimingParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TimingParseError::Empty);
    }
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        return Err(TimingParseError::MissingUnit(value.to_owned()));
    };
    let parsed: f64 = number
        .trim()
        .parse()
        .map_err(|_| TimingParseError::InvalidNumber(value.to_owned()))?;
    if !parsed.is_finite() {
        return Err(TimingParseError::InvalidNumber(value.to_owned()));
    }
    Ok(parsed * scale)
}

/// Parse a comma-separated `<time>` list. Malformed entries become 0.
#[must_use]
pub fn parse_time_list(raw: &str) -> Vec<f64> {
    raw.split(',')
        .map(|layer| parse_css_time(layer).unwrap_or(0.0))
        .collect()
}

fn millis_to_duration(ms: f64) -> Duration {
    if ms <= 0.0 {
        Duration::ZERO
    } else {
        Duration::from_millis(ms.round() as u64)
    }
}

/// Styling surface the sequencer drives.
pub trait AnimatedElement {
    /// Replace the element's animation classes with `classes`.
    fn set_animation_classes(&mut self, classes: &[String]);
    fn set_play_state(&mut self, state: PlayState);
    fn set_opacity(&mut self, opacity: f32);
    fn set_translate(&mut self, translate: Translate);
    /// Enable or suppress the element's CSS transition rule.
    fn set_transition_enabled(&mut self, enabled: bool);
    /// Flush pending style changes so computed values are current.
    fn force_reflow(&mut self);
    fn computed_timing(&self) -> ComputedTiming;
}

/// Animation inputs resolved from a toast's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationSpec {
    pub enter_classes: Vec<String>,
    pub exit_classes: Vec<String>,
    /// Configured transition duration; zero when transitions are disabled.
    pub transition: Duration,
}

impl AnimationSpec {
    #[must_use]
    pub fn transition_enabled(&self) -> bool {
        !self.transition.is_zero()
    }
}

/// Drives enter and exit animations for one element.
#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    spec: AnimationSpec,
    exit_translate: Translate,
    custom_exit: bool,
}

impl AnimationSequencer {
    #[must_use]
    pub fn new(spec: AnimationSpec) -> Self {
        let custom_exit = !spec.exit_classes.is_empty();
        Self {
            spec,
            exit_translate: Translate::RETREAT,
            custom_exit,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Offset the element leaves toward with the built-in transition.
    #[must_use]
    pub fn exit_translate(&self) -> Translate {
        self.exit_translate
    }

    /// Set the retreat offset (depends on the edge the toast is anchored to).
    pub fn set_exit_translate(&mut self, translate: Translate) {
        self.exit_translate = translate;
    }

    /// Whether the exit will play the custom `animation.out` classes.
    #[must_use]
    pub fn custom_exit(&self) -> bool {
        self.custom_exit
    }

    /// Leave fully toward the swipe and skip any custom exit animation.
    pub fn set_swipe_exit(&mut self, direction: SwipeDirection) {
        self.exit_translate = Translate::horizontal_percent(100.0 * direction.sign());
        self.custom_exit = false;
    }

    fn custom_enter(&self) -> bool {
        !self.spec.enter_classes.is_empty()
    }

    /// Put the element in its pre-enter state.
    pub fn prepare_enter<E: AnimatedElement + ?Sized>(&self, element: &mut E) {
        element.set_transition_enabled(false);
        if self.custom_enter() {
            element.set_opacity(1.0);
            element.set_animation_classes(&self.spec.enter_classes);
            element.set_play_state(PlayState::Paused);
        } else {
            element.set_opacity(0.0);
            element.set_translate(self.exit_translate);
        }
        element.force_reflow();
        element.set_transition_enabled(self.spec.transition_enabled());
        element.force_reflow();
    }

    /// Start the enter animation and return how long it takes.
    pub fn run_enter<E: AnimatedElement + ?Sized>(&self, element: &mut E) -> Duration {
        let timing = element.computed_timing();
        let duration = self.resolve(&timing);
        if self.custom_enter() && timing.has_named_animation() {
            element.set_play_state(PlayState::Running);
        } else {
            element.set_opacity(1.0);
            element.set_translate(Translate::NONE);
        }
        element.force_reflow();
        duration
    }

    /// Swap to the exit classes, paused, so their timing can be measured.
    pub fn prepare_exit<E: AnimatedElement + ?Sized>(&self, element: &mut E) {
        if !self.custom_exit {
            return;
        }
        element.set_animation_classes(&self.spec.exit_classes);
        element.set_play_state(PlayState::Paused);
        element.force_reflow();
    }

    /// Start the exit animation and return how long it takes.
    pub fn run_exit<E: AnimatedElement + ?Sized>(&self, element: &mut E) -> Duration {
        let timing = element.computed_timing();
        if self.custom_exit && timing.has_named_animation() {
            let duration = self.resolve(&timing);
            element.set_play_state(PlayState::Running);
            element.force_reflow();
            return duration;
        }
        if !self.custom_exit && !self.spec.exit_classes.is_empty() {
            // A suppressed custom exit must not keep playing the enter keyframes.
            element.set_animation_classes(&[]);
        }
        element.set_opacity(0.0);
        element.set_translate(self.exit_translate);
        element.force_reflow();
        // Lingering enter keyframes still gate removal.
        self.measure(element)
    }

    /// Measure the current animation of `element` without changing it.
    #[must_use]
    pub fn measure<E: AnimatedElement + ?Sized>(&self, element: &E) -> Duration {
        self.resolve(&element.computed_timing())
    }

    fn resolve(&self, timing: &ComputedTiming) -> Duration {
        if timing.has_named_animation() {
            self.spec.transition.max(timing.longest_layer())
        } else {
            self.spec.transition
        }
    }
}
