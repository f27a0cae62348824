#![forbid(unsafe_code)]

//! Core: pause reasons, gesture recognition, animation sequencing, and the
//! cooperative timer primitives behind each toast's lifecycle.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod pause;
pub mod timer;

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, trace, warn};
