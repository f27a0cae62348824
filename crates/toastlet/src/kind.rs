#![forbid(unsafe_code)]

//! Notification types and their per-type defaults.

use std::fmt;

use serde::Serialize;

/// Accessibility role of the toast element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Status,
    Alert,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Alert => "alert",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "status" => Some(Self::Status),
            "alert" => Some(Self::Alert),
            _ => None,
        }
    }
}

/// Politeness of the live region announcing the toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaLive {
    Polite,
    Assertive,
}

impl AriaLive {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "polite" => Some(Self::Polite),
            "assertive" => Some(Self::Assertive),
            _ => None,
        }
    }
}

/// Notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Warning,
    Info,
    Success,
    Error,
    Notice,
    Loading,
    Custom,
}

impl ToastKind {
    pub const ALL: [Self; 7] = [
        Self::Warning,
        Self::Info,
        Self::Success,
        Self::Error,
        Self::Notice,
        Self::Loading,
        Self::Custom,
    ];

    pub const NAMES: [&'static str; 7] = [
        "warning", "info", "success", "error", "notice", "loading", "custom",
    ];

    /// Look up a type by name. Non-letters are stripped and case is ignored,
    /// so `"Success!"` and `"SUCCESS"` both resolve.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let key = normalize_key(name);
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Notice => "notice",
            Self::Loading => "loading",
            Self::Custom => "custom",
        }
    }

    /// Default title text.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Success => "Success!",
            Self::Error => "Error!",
            Self::Notice => "Notice",
            Self::Loading => "Loading...",
            Self::Custom => "Custom",
        }
    }

    /// Accent (background) color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Warning => "#F39C12",
            Self::Info => "#3498DB",
            Self::Success => "#00bc8c",
            Self::Error => "#E74C3C",
            Self::Notice => "#708090",
            Self::Loading => "#1a6394",
            Self::Custom => "#4A4A4A",
        }
    }

    /// CSS class identifying the type.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Warning => "toastlet-warning",
            Self::Info => "toastlet-info",
            Self::Success => "toastlet-success",
            Self::Error => "toastlet-error",
            Self::Notice => "toastlet-notice",
            Self::Loading => "toastlet-loading",
            Self::Custom => "toastlet-custom",
        }
    }

    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Warning | Self::Error => Role::Alert,
            _ => Role::Status,
        }
    }

    #[must_use]
    pub const fn aria_live(self) -> AriaLive {
        match self {
            Self::Warning | Self::Error => AriaLive::Assertive,
            _ => AriaLive::Polite,
        }
    }

    /// Whether the type stays until closed by default.
    #[must_use]
    pub const fn default_sticky(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether the type can be dismissed by the user by default.
    #[must_use]
    pub const fn default_dismissible(self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Whether options may override the accessibility attributes.
    #[must_use]
    pub const fn allows_a11y_override(self) -> bool {
        matches!(self, Self::Custom)
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip everything but ASCII letters and lower-case the rest.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
