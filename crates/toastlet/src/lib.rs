#![forbid(unsafe_code)]

//! Toastlet: toast notification lifecycle controller and instance registry.
//!
//! A [`Toaster`] creates toasts from a type name and JSON-shaped options,
//! drives each one through `Entering -> Active <-> Paused -> Closing ->
//! Removed`, and keeps the registry used for bulk closes and non-stackable
//! eviction. Rendering is delegated to a [`RenderLayer`];
//! [`HeadlessRenderer`] keeps everything in memory.
//!
//! Primitives (pause reasons, gestures, animation timing, timers) live in
//! `toastlet-core` and are re-exported under [`core`].

pub mod config;
mod controller;
pub mod error;
mod event_loop;
pub mod headless;
pub mod kind;
pub mod lifecycle;
pub mod registry;
pub mod render;
pub mod toaster;

pub use toastlet_core as core;

// --- Core re-exports -------------------------------------------------------

pub use toastlet_core::event::{Key, SignalKind, Target, ToastSignal};
pub use toastlet_core::geometry::{Point, Translate};
pub use toastlet_core::gesture::{GestureConfig, GestureConfigError, GestureState};
pub use toastlet_core::pause::{PauseReason, PauseReasons};
pub use toastlet_core::timer::Timestamp;

// --- Crate re-exports ------------------------------------------------------

pub use config::{ClickControl, DesktopPosition, MobilePosition, ToastConfig};
pub use error::{ConfigWarning, NotifyError, WarningReason};
pub use headless::{ElementState, HeadlessElement, HeadlessRenderer, Progress};
pub use kind::ToastKind;
pub use lifecycle::{CloseCause, Phase};
pub use registry::{Bucket, ToastId};
pub use render::{DisplayMode, Environment, RenderLayer, ToastElement};
pub use toaster::{ToastHandle, Toaster};
