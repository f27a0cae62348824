#![forbid(unsafe_code)]

//! Swipe-to-dismiss recognition.
//!
//! Interprets a raw drag stream (start, moves, end) into one of four states:
//!
//! ```text
//! Idle --(|dx| > drag threshold and |dx| > |dy|)--> Dragging
//! Dragging --end, |dx| > dismiss threshold, dismissible--> Committed
//! Dragging --end otherwise / cancel--> Cancelled
//! ```
//!
//! A release that never reached `Dragging` stays `Idle`; the caller decides
//! whether it was a tap from the reported [`GestureRelease::duration`].
//!
//! # Invariants
//!
//! 1. Once `Dragging`, a gesture stays `Dragging` until it ends, even if the
//!    pointer later drifts vertically.
//! 2. `Committed` requires both the dismiss threshold and dismissibility.
//! 3. Updates and ends without a preceding start are ignored.

use std::fmt;
use std::time::Duration;

use crate::geometry::Point;
use crate::timer::Timestamp;

/// Horizontal travel (px) before a touch counts as a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 10.0;
/// Horizontal travel (px) at release that dismisses the toast.
pub const DEFAULT_DISMISS_THRESHOLD: f32 = 100.0;
/// Releases shorter than this that never dragged are taps.
pub const DEFAULT_TAP_WINDOW: Duration = Duration::from_millis(300);

/// Thresholds for gesture recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub drag_threshold: f32,
    pub dismiss_threshold: f32,
    pub tap_window: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            dismiss_threshold: DEFAULT_DISMISS_THRESHOLD,
            tap_window: DEFAULT_TAP_WINDOW,
        }
    }
}

impl GestureConfig {
    /// Check that thresholds are positive and ordered.
    pub fn validate(&self) -> Result<(), GestureConfigError> {
        if !(self.drag_threshold.is_finite() && self.drag_threshold > 0.0) {
            return Err(GestureConfigError::InvalidDragThreshold(self.drag_threshold));
        }
        if !(self.dismiss_threshold.is_finite() && self.dismiss_threshold >= self.drag_threshold) {
            return Err(GestureConfigError::DismissBelowDrag {
                drag: self.drag_threshold,
                dismiss: self.dismiss_threshold,
            });
        }
        Ok(())
    }
}

/// Invalid gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureConfigError {
    InvalidDragThreshold(f32),
    DismissBelowDrag { drag: f32, dismiss: f32 },
}

impl fmt::Display for GestureConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDragThreshold(value) => {
                write!(f, "drag threshold must be a positive number (got {value})")
            }
            Self::DismissBelowDrag { drag, dismiss } => write!(
                f,
                "dismiss threshold {dismiss} must be at least the drag threshold {drag}"
            ),
        }
    }
}

impl std::error::Error for GestureConfigError {}

/// Recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    Committed,
    Cancelled,
}

/// Horizontal swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Sign of the horizontal exit translation.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Result of ending a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRelease {
    /// `Committed`, `Cancelled`, or `Idle` when the threshold was never crossed.
    pub state: GestureState,
    /// Horizontal displacement from the start position.
    pub dx: f32,
    /// Vertical displacement from the start position.
    pub dy: f32,
    /// Time between start and end.
    pub duration: Duration,
}

impl GestureRelease {
    /// Direction of a committed swipe.
    #[must_use]
    pub fn direction(&self) -> Option<SwipeDirection> {
        if self.state != GestureState::Committed {
            return None;
        }
        Some(if self.dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        })
    }

    /// Whether the release ever became a drag.
    #[must_use]
    pub fn was_drag(&self) -> bool {
        matches!(self.state, GestureState::Committed | GestureState::Cancelled)
    }

    /// A short release that never dragged.
    #[must_use]
    pub fn is_tap(&self, window: Duration) -> bool {
        self.state == GestureState::Idle && self.duration < window
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    origin: Point,
    current: Point,
    started: Timestamp,
}

/// Drag-stream interpreter for one toast.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    state: GestureState,
    session: Option<Session>,
}

impl GestureRecognizer {
    /// Create a recognizer with explicit thresholds.
    pub fn new(config: GestureConfig) -> Result<Self, GestureConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: GestureState::Idle,
            session: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    /// Whether a start has been seen without a matching end or cancel.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a new gesture, discarding any previous outcome.
    pub fn begin(&mut self, position: Point, now: Timestamp) {
        self.state = GestureState::Idle;
        self.session = Some(Session {
            origin: position,
            current: position,
            started: now,
        });
    }

    /// Feed a move. Returns the horizontal offset from the start, or `None`
    /// when no gesture is being tracked.
    pub fn update(&mut self, position: Point) -> Option<f32> {
        let session = self.session.as_mut()?;
        session.current = position;
        let (dx, dy) = position.delta_from(session.origin);
        if self.state == GestureState::Idle
            && dx.abs() > self.config.drag_threshold
            && dx.abs() > dy.abs()
        {
            self.state = GestureState::Dragging;
            crate::trace!(dx, dy, "gesture crossed drag threshold");
        }
        Some(dx)
    }

    /// End the gesture at the last reported position.
    pub fn end(&mut self, now: Timestamp, dismissible: bool) -> Option<GestureRelease> {
        let session = self.session.take()?;
        let (dx, dy) = session.current.delta_from(session.origin);
        self.state = match self.state {
            GestureState::Dragging if dx.abs() > self.config.dismiss_threshold && dismissible => {
                GestureState::Committed
            }
            GestureState::Dragging => GestureState::Cancelled,
            other => other,
        };
        Some(GestureRelease {
            state: self.state,
            dx,
            dy,
            duration: now.saturating_duration_since(session.started),
        })
    }

    /// Abort the gesture (e.g. the platform cancelled the touch).
    pub fn cancel(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        if self.state == GestureState::Dragging {
            self.state = GestureState::Cancelled;
        }
        true
    }

    /// Return to `Idle` with no session.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.session = None;
    }
}
