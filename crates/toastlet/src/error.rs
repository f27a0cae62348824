#![forbid(unsafe_code)]

//! Errors returned by [`Toaster::notify`](crate::Toaster::notify) and
//! warnings collected while resolving options.

use std::fmt;

/// Why a notification could not be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The render layer has nowhere to mount toasts.
    NoMountRoot,
    /// The requested notification type does not exist.
    UnknownType(String),
    /// The options value is not a JSON object.
    InvalidOptions(&'static str),
    /// The render layer failed to build the element.
    Render(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMountRoot => write!(f, "no mount root is available"),
            Self::UnknownType(name) => write!(
                f,
                "invalid notification type {name:?} (valid types: {})",
                crate::kind::ToastKind::NAMES.join(", ")
            ),
            Self::InvalidOptions(received) => {
                write!(f, "options must be a plain object (received {received})")
            }
            Self::Render(reason) => write!(f, "failed to render toast: {reason}"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Category of a configuration correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningReason {
    /// The key is not a known option; it was dropped.
    UnknownKey,
    /// The value has the wrong JSON type.
    WrongType { expected: &'static str },
    /// The value has the right type but is not an accepted value.
    InvalidValue,
    /// The option is not available for this notification type; it was dropped.
    NotAllowedForType,
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey => write!(f, "unknown option"),
            Self::WrongType { expected } => write!(f, "must be {expected}"),
            Self::InvalidValue => write!(f, "invalid value"),
            Self::NotAllowedForType => write!(f, "only allowed for the custom type"),
        }
    }
}

/// A correction applied while resolving options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Dotted option path, e.g. `"progressBar.direction"`.
    pub option: String,
    pub reason: WarningReason,
    /// What was used instead; `"removed"` for dropped keys.
    pub fallback: String,
}

impl ConfigWarning {
    pub(crate) fn new(
        option: impl Into<String>,
        reason: WarningReason,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            option: option.into(),
            reason,
            fallback: fallback.into(),
        }
    }

    pub(crate) fn removed(option: impl Into<String>, reason: WarningReason) -> Self {
        Self::new(option, reason, "removed")
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "option '{}': {} (using {})",
            self.option, self.reason, self.fallback
        )
    }
}
