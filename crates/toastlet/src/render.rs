#![forbid(unsafe_code)]

//! Render-layer contract.
//!
//! Building the visual element, styling, icons and slot arithmetic live
//! outside this crate. The lifecycle reaches them only through
//! [`RenderLayer`] (document-level services) and [`ToastElement`] (one
//! mounted toast).
//!
//! # Design Notes
//!
//! - Listener and observer bindings are opaque handles. The lifecycle keeps
//!   them only so it can release every one of them exactly once at teardown.
//! - [`Environment`] is a snapshot; the driver re-reads it on resize and
//!   visibility changes.

use std::fmt;
use std::time::Duration;

use toastlet_core::animation::AnimatedElement;
use toastlet_core::event::SignalKind;

use crate::config::{DesktopPosition, Edge, MobilePosition, ToastConfig};
use crate::registry::ToastId;

/// Width (CSS px) at or below which the mobile layout is used.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Viewport and device capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub viewport_width: u32,
    /// Some input device can hover.
    pub can_hover: bool,
    /// The primary pointer is precise (a mouse rather than a finger).
    pub pointer_fine: bool,
    pub document_hidden: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self::desktop()
    }
}

impl Environment {
    /// A wide viewport with a mouse.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            viewport_width: 1280,
            can_hover: true,
            pointer_fine: true,
            document_hidden: false,
        }
    }

    /// A phone-sized touch screen.
    #[must_use]
    pub const fn mobile() -> Self {
        Self {
            viewport_width: 390,
            can_hover: false,
            pointer_fine: false,
            document_hidden: false,
        }
    }

    /// Whether hover input is trustworthy on this device.
    #[must_use]
    pub const fn hover_capable(&self) -> bool {
        self.can_hover && self.pointer_fine
    }

    /// Mobile unless the viewport is wide and the device hovers precisely.
    #[must_use]
    pub const fn display_mode(&self) -> DisplayMode {
        if self.viewport_width > MOBILE_BREAKPOINT && self.hover_capable() {
            DisplayMode::Desktop
        } else {
            DisplayMode::Mobile
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Desktop,
    Mobile,
}

impl DisplayMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

/// Resolved placement for the active display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Desktop(DesktopPosition),
    Mobile(MobilePosition),
}

impl Placement {
    #[must_use]
    pub const fn edge(self) -> Edge {
        match self {
            Self::Desktop(p) => p.edge(),
            Self::Mobile(p) => p.edge(),
        }
    }
}

/// Layout applied to an element on mount and on every resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub mode: DisplayMode,
    pub placement: Placement,
    /// Gap to neighbouring stacked toasts, in pixels.
    pub gap: u32,
}

impl Layout {
    #[must_use]
    pub fn for_mode(config: &ToastConfig, mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Desktop => Self {
                mode,
                placement: Placement::Desktop(config.position.desktop),
                gap: config.stackable_gap.desktop,
            },
            DisplayMode::Mobile => Self {
                mode,
                placement: Placement::Mobile(config.position.mobile),
                gap: config.stackable_gap.mobile,
            },
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerSource {
    Toast,
    PauseButton,
    CloseButton,
    Window,
    Document,
}

/// What a mutation observer watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObserverTarget {
    /// The mount root's children (detects removal of the element).
    Body,
    /// The document root (detects removal of the mount root itself).
    Root,
}

/// Handle of a bound listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

/// Handle of a connected observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// The render layer could not build an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError(pub String);

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for RenderError {}

/// One mounted toast element.
pub trait ToastElement: AnimatedElement {
    /// Still connected under the mount root.
    fn is_attached(&self) -> bool;
    /// Detach and discard the element. Idempotent.
    fn remove(&mut self);
    fn show_controls(&mut self, visible: bool);
    /// Show the "resume" icon while manually paused, "pause" otherwise.
    fn set_pause_icon(&mut self, paused: bool);
    /// Reset the progress bar to its start edge and run it over `duration`.
    fn start_progress(&mut self, duration: Duration);
    /// Stop the progress bar where it currently is.
    fn freeze_progress(&mut self);
    fn apply_layout(&mut self, layout: &Layout);
    /// Drop keyboard focus from whatever inside the toast holds it.
    fn blur(&mut self);
}

/// Document-level services.
pub trait RenderLayer {
    type Element: ToastElement;

    fn has_mount_root(&self) -> bool;
    fn environment(&self) -> Environment;
    /// Build and mount the element for `config`.
    fn render(
        &mut self,
        id: ToastId,
        config: &ToastConfig,
        content: &str,
    ) -> Result<Self::Element, RenderError>;
    fn bind(&mut self, id: ToastId, source: ListenerSource, kind: SignalKind) -> BindingId;
    fn unbind(&mut self, binding: BindingId);
    fn observe(&mut self, id: ToastId, target: ObserverTarget) -> ObserverId;
    fn disconnect(&mut self, observer: ObserverId);
}

/// Listeners a toast needs for `config`.
#[must_use]
pub fn listener_plan(config: &ToastConfig) -> Vec<(ListenerSource, SignalKind)> {
    let mut plan: Vec<(ListenerSource, SignalKind)> = [
        SignalKind::PointerEnter,
        SignalKind::PointerLeave,
        SignalKind::PointerDown,
        SignalKind::PointerUp,
        SignalKind::FocusIn,
        SignalKind::FocusOut,
        SignalKind::TouchStart,
        SignalKind::TouchMove,
        SignalKind::TouchEnd,
        SignalKind::TouchCancel,
        SignalKind::KeyDown,
    ]
    .into_iter()
    .map(|kind| (ListenerSource::Toast, kind))
    .collect();
    if config.on_click.is_some() {
        plan.push((ListenerSource::Toast, SignalKind::Click));
    }
    if config.has_pause_button() {
        plan.push((ListenerSource::PauseButton, SignalKind::Click));
        plan.push((ListenerSource::PauseButton, SignalKind::KeyDown));
    }
    if config.dismissible {
        plan.push((ListenerSource::CloseButton, SignalKind::Click));
        plan.push((ListenerSource::CloseButton, SignalKind::KeyDown));
    }
    plan.push((ListenerSource::Window, SignalKind::Resize));
    plan.push((ListenerSource::Document, SignalKind::VisibilityChange));
    plan
}
