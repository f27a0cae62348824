#![forbid(unsafe_code)]

//! Environment signals forwarded into a toast.
//!
//! The host (a DOM binding, a TUI, a test) translates its native events into
//! [`ToastSignal`]s and hands them to the toast that owns the element. The
//! lifecycle never inspects raw platform events.
//!
//! # Design Notes
//!
//! - Signals carry only what the lifecycle needs to disambiguate input
//!   (e.g. whether a focus change came from a pointer, whether a pointer
//!   leave went into a child of the toast).
//! - Touch positions are viewport pixels; the touch end position is the last
//!   reported move, so `TouchEnd` carries only the hit target.

use crate::geometry::Point;

/// Keys the toast reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    /// Any other key; ignored by the lifecycle.
    Other,
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Enter or Space.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Which part of the toast an input landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    /// The toast container itself.
    #[default]
    Toast,
    /// Any descendant other than the control buttons.
    Content,
    PauseButton,
    CloseButton,
}

impl Target {
    /// Returns true for the pause and close buttons.
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(self, Self::PauseButton | Self::CloseButton)
    }
}

/// One environment signal routed to a toast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastSignal {
    /// Pointer entered the toast.
    PointerEnter {
        /// The pointer event was synthesized from a touch.
        emulated_touch: bool,
    },
    /// Pointer left the toast.
    PointerLeave {
        /// The pointer moved onto a descendant of the toast.
        into_toast: bool,
        emulated_touch: bool,
    },
    /// Mouse button pressed over the toast.
    PointerDown,
    /// Mouse button released over the toast.
    PointerUp,
    /// Focus moved into the toast or one of its controls.
    FocusIn {
        /// Focus was caused by a pointer press rather than keyboard navigation.
        from_pointer: bool,
    },
    /// Focus moved away from a focused element inside the toast.
    FocusOut {
        /// The newly focused element is still inside the toast.
        focus_within: bool,
    },
    TouchStart {
        position: Point,
    },
    TouchMove {
        position: Point,
    },
    TouchEnd {
        target: Target,
    },
    TouchCancel,
    Key {
        key: Key,
        target: Target,
    },
    Click {
        target: Target,
    },
    /// The viewport was resized; the host's environment snapshot is re-read.
    Resize,
    /// Page visibility changed.
    VisibilityChange {
        hidden: bool,
    },
    /// The element was removed from the document by code outside the toast.
    Detached,
}

impl ToastSignal {
    /// The listener kind this signal is delivered through.
    #[must_use]
    pub const fn kind(&self) -> SignalKind {
        match self {
            Self::PointerEnter { .. } => SignalKind::PointerEnter,
            Self::PointerLeave { .. } => SignalKind::PointerLeave,
            Self::PointerDown => SignalKind::PointerDown,
            Self::PointerUp => SignalKind::PointerUp,
            Self::FocusIn { .. } => SignalKind::FocusIn,
            Self::FocusOut { .. } => SignalKind::FocusOut,
            Self::TouchStart { .. } => SignalKind::TouchStart,
            Self::TouchMove { .. } => SignalKind::TouchMove,
            Self::TouchEnd { .. } => SignalKind::TouchEnd,
            Self::TouchCancel => SignalKind::TouchCancel,
            Self::Key { .. } => SignalKind::KeyDown,
            Self::Click { .. } => SignalKind::Click,
            Self::Resize => SignalKind::Resize,
            Self::VisibilityChange { .. } => SignalKind::VisibilityChange,
            Self::Detached => SignalKind::Mutation,
        }
    }
}

/// Listener categories a toast binds on its element, window and document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    PointerEnter,
    PointerLeave,
    PointerDown,
    PointerUp,
    FocusIn,
    FocusOut,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    KeyDown,
    Click,
    Resize,
    VisibilityChange,
    Mutation,
}

impl SignalKind {
    /// DOM event name for this listener kind.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::PointerDown => "mousedown",
            Self::PointerUp => "mouseup",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::KeyDown => "keydown",
            Self::Click => "click",
            Self::Resize => "resize",
            Self::VisibilityChange => "visibilitychange",
            Self::Mutation => "mutation",
        }
    }
}
