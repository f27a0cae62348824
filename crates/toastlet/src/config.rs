#![forbid(unsafe_code)]

//! Option resolution.
//!
//! [`ToastConfig::resolve`] takes the raw, JSON-shaped options of a
//! `notify` call and produces a fully populated configuration. Nothing in the
//! options is fatal except a non-object value: every other problem is
//! corrected in place and reported as a [`ConfigWarning`].
//!
//! # Rules
//!
//! - Unknown keys (top-level or inside a group) are dropped.
//! - A value of the wrong JSON type falls back to the default.
//! - Groups (`transition`, `pause`, ...) are merged key by key over their
//!   defaults, so `{"pause": {"hover": false}}` keeps the other pause sources.
//! - `a11y` is honored only for the `custom` type.
//! - A disabled transition has a zero duration and a zero duration disables
//!   the transition.
//! - `duration == 0` makes the toast sticky.
//!
//! The click handler is not representable in JSON and is attached with
//! [`ToastConfig::on_click`].

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use toastlet_core::animation::AnimationSpec;
use toastlet_core::geometry::Translate;

use crate::error::{ConfigWarning, NotifyError, WarningReason};
use crate::kind::{AriaLive, Role, ToastKind, normalize_key};
use crate::registry::ToastId;

/// Default auto-close delay.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
/// Default built-in transition length.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Vertical gap between stacked toasts, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StackableGap {
    pub desktop: u32,
    pub mobile: u32,
}

impl Default for StackableGap {
    fn default() -> Self {
        Self {
            desktop: 20,
            mobile: 10,
        }
    }
}

/// Built-in opacity/translate transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionConfig {
    pub enabled: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration: DEFAULT_TRANSITION,
        }
    }
}

/// Custom animation class lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnimationClasses {
    #[serde(rename = "in")]
    pub enter: Vec<String>,
    #[serde(rename = "out")]
    pub exit: Vec<String>,
}

fn split_classes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_owned).collect()
}

/// Which input sources may pause the auto-close timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseOptions {
    pub hover: bool,
    pub focus: bool,
    pub touch: bool,
    pub inactive_tab: bool,
    /// Render a pause button (never for sticky toasts).
    pub button: bool,
}

impl Default for PauseOptions {
    fn default() -> Self {
        Self {
            hover: true,
            focus: true,
            touch: true,
            inactive_tab: true,
            button: true,
        }
    }
}

/// Direction the progress bar drains in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

impl ProgressDirection {
    pub const NAMES: [&'static str; 4] = [
        "left-to-right",
        "right-to-left",
        "top-to-bottom",
        "bottom-to-top",
    ];

    #[must_use]
    pub fn lookup(raw: &str) -> Option<Self> {
        match normalize_key(raw).as_str() {
            "lefttoright" => Some(Self::LeftToRight),
            "righttoleft" => Some(Self::RightToLeft),
            "toptobottom" => Some(Self::TopToBottom),
            "bottomtotop" => Some(Self::BottomToTop),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
        }
    }

    /// Whether the bar runs along the vertical axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressBarConfig {
    pub enabled: bool,
    pub direction: ProgressDirection,
}

/// Viewport edge a toast is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    /// Offset a toast retreats toward when entering or leaving.
    #[must_use]
    pub const fn retreat(self) -> Translate {
        match self {
            Self::Top => Translate::RETREAT,
            Self::Bottom => Translate::px(0.0, 20.0),
        }
    }
}

/// Desktop placement. `top` and `bottom` are aliases of the right corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesktopPosition {
    #[default]
    TopRight,
    TopMiddle,
    TopLeft,
    BottomRight,
    BottomMiddle,
    BottomLeft,
}

impl DesktopPosition {
    pub const NAMES: [&'static str; 8] = [
        "top",
        "top-right",
        "top-middle",
        "top-left",
        "bottom",
        "bottom-right",
        "bottom-middle",
        "bottom-left",
    ];

    #[must_use]
    pub fn lookup(raw: &str) -> Option<Self> {
        match normalize_key(raw).as_str() {
            "top" | "topright" => Some(Self::TopRight),
            "topmiddle" => Some(Self::TopMiddle),
            "topleft" => Some(Self::TopLeft),
            "bottom" | "bottomright" => Some(Self::BottomRight),
            "bottommiddle" => Some(Self::BottomMiddle),
            "bottomleft" => Some(Self::BottomLeft),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopMiddle => "top-middle",
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
            Self::BottomMiddle => "bottom-middle",
            Self::BottomLeft => "bottom-left",
        }
    }

    #[must_use]
    pub const fn edge(self) -> Edge {
        match self {
            Self::TopRight | Self::TopMiddle | Self::TopLeft => Edge::Top,
            Self::BottomRight | Self::BottomMiddle | Self::BottomLeft => Edge::Bottom,
        }
    }

    /// Mobile placement on the same edge.
    #[must_use]
    pub const fn mobile(self) -> MobilePosition {
        match self.edge() {
            Edge::Top => MobilePosition::Top,
            Edge::Bottom => MobilePosition::Bottom,
        }
    }
}

/// Mobile placement: full width along one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MobilePosition {
    Top,
    Bottom,
}

impl MobilePosition {
    pub const NAMES: [&'static str; 2] = ["top", "bottom"];

    #[must_use]
    pub fn lookup(raw: &str) -> Option<Self> {
        match normalize_key(raw).as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    #[must_use]
    pub const fn edge(self) -> Edge {
        match self {
            Self::Top => Edge::Top,
            Self::Bottom => Edge::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionConfig {
    pub desktop: DesktopPosition,
    pub mobile: MobilePosition,
}

impl Default for PositionConfig {
    fn default() -> Self {
        let desktop = DesktopPosition::default();
        Self {
            desktop,
            mobile: desktop.mobile(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct A11yConfig {
    pub role: Role,
    pub aria_live: AriaLive,
}

impl A11yConfig {
    #[must_use]
    pub const fn for_kind(kind: ToastKind) -> Self {
        Self {
            role: kind.role(),
            aria_live: kind.aria_live(),
        }
    }
}

/// Passed to the click handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickControl {
    id: ToastId,
    disabled: bool,
    close_requested: bool,
}

impl ClickControl {
    pub(crate) const fn new(id: ToastId, disabled: bool) -> Self {
        Self {
            id,
            disabled,
            close_requested: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ToastId {
        self.id
    }

    /// Whether further clicks are ignored.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Stop (or resume) delivering clicks to the handler.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Close the toast once the handler returns.
    pub fn close(&mut self) {
        self.close_requested = true;
    }

    #[must_use]
    pub const fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Click callback attached to a toast body.
#[derive(Clone)]
pub struct ClickHandler(Rc<dyn Fn(&mut ClickControl)>);

impl ClickHandler {
    pub fn new(f: impl Fn(&mut ClickControl) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, control: &mut ClickControl) {
        (self.0)(control);
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler(..)")
    }
}

/// Fully resolved configuration of one toast.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastConfig {
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub sticky: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub dismissible: bool,
    pub stackable: bool,
    pub stackable_gap: StackableGap,
    pub html: bool,
    pub icon: bool,
    pub title: bool,
    pub title_text: String,
    pub custom_class: String,
    pub transition: TransitionConfig,
    pub animation: AnimationClasses,
    pub pause: PauseOptions,
    pub progress_bar: ProgressBarConfig,
    pub position: PositionConfig,
    pub a11y: A11yConfig,
    #[serde(skip)]
    pub on_click: Option<ClickHandler>,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

/// A resolved configuration plus every correction applied on the way.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: ToastConfig,
    pub warnings: Vec<ConfigWarning>,
}

impl ToastConfig {
    /// Defaults for `kind` with no options applied.
    #[must_use]
    pub fn defaults(kind: ToastKind) -> Self {
        Self {
            kind,
            sticky: kind.default_sticky(),
            duration: DEFAULT_DURATION,
            dismissible: kind.default_dismissible(),
            stackable: false,
            stackable_gap: StackableGap::default(),
            html: false,
            icon: true,
            title: true,
            title_text: kind.title().to_owned(),
            custom_class: String::new(),
            transition: TransitionConfig::default(),
            animation: AnimationClasses::default(),
            pause: PauseOptions::default(),
            progress_bar: ProgressBarConfig::default(),
            position: PositionConfig::default(),
            a11y: A11yConfig::for_kind(kind),
            on_click: None,
        }
    }

    /// Resolve raw options for `kind`.
    ///
    /// Only a non-object `options` value is an error; every other problem is
    /// corrected and reported in [`Resolved::warnings`].
    pub fn resolve(kind: ToastKind, options: &Value) -> Result<Resolved, NotifyError> {
        let object = options
            .as_object()
            .ok_or_else(|| NotifyError::InvalidOptions(json_type_name(options)))?;
        let mut resolver = Resolver::default();
        let mut config = Self::defaults(kind);
        let mut position_desktop: Option<&Value> = None;
        let mut position_mobile: Option<&Value> = None;

        for (key, value) in object {
            match key.as_str() {
                "sticky" => config.sticky = resolver.boolean(key, value, config.sticky),
                "duration" => {
                    config.duration = resolver.millis(key, value, config.duration);
                }
                "dismissible" => {
                    config.dismissible = resolver.boolean(key, value, config.dismissible);
                }
                "stackable" => config.stackable = resolver.boolean(key, value, config.stackable),
                "stackableGap" => {
                    let gap = &mut config.stackable_gap;
                    resolver.group(key, value, &["desktop", "mobile"], |r, field, v| {
                        let path = format!("stackableGap.{field}");
                        match field {
                            "desktop" => gap.desktop = r.pixels(&path, v, gap.desktop),
                            _ => gap.mobile = r.pixels(&path, v, gap.mobile),
                        }
                    });
                }
                "html" => config.html = resolver.boolean(key, value, config.html),
                "icon" => config.icon = resolver.boolean(key, value, config.icon),
                "title" => config.title = resolver.boolean(key, value, config.title),
                "titleText" => {
                    config.title_text = resolver.string(key, value, &config.title_text);
                }
                "customClass" => {
                    config.custom_class = resolver.string(key, value, &config.custom_class);
                }
                "transition" => {
                    let transition = &mut config.transition;
                    resolver.group(key, value, &["enabled", "duration"], |r, field, v| {
                        let path = format!("transition.{field}");
                        match field {
                            "enabled" => {
                                transition.enabled = r.boolean(&path, v, transition.enabled);
                            }
                            _ => transition.duration = r.millis(&path, v, transition.duration),
                        }
                    });
                }
                "animation" => {
                    let animation = &mut config.animation;
                    resolver.group(key, value, &["in", "out"], |r, field, v| {
                        let path = format!("animation.{field}");
                        let classes = split_classes(&r.string(&path, v, ""));
                        match field {
                            "in" => animation.enter = classes,
                            _ => animation.exit = classes,
                        }
                    });
                }
                "pause" => {
                    let pause = &mut config.pause;
                    resolver.group(
                        key,
                        value,
                        &["hover", "focus", "touch", "inactiveTab", "button"],
                        |r, field, v| {
                            let path = format!("pause.{field}");
                            let slot = match field {
                                "hover" => &mut pause.hover,
                                "focus" => &mut pause.focus,
                                "touch" => &mut pause.touch,
                                "inactiveTab" => &mut pause.inactive_tab,
                                _ => &mut pause.button,
                            };
                            *slot = r.boolean(&path, v, *slot);
                        },
                    );
                }
                "progressBar" => {
                    let bar = &mut config.progress_bar;
                    resolver.group(key, value, &["enabled", "direction"], |r, field, v| {
                        let path = format!("progressBar.{field}");
                        match field {
                            "enabled" => bar.enabled = r.boolean(&path, v, bar.enabled),
                            _ => {
                                bar.direction = r.choice(
                                    &path,
                                    v,
                                    bar.direction,
                                    ProgressDirection::lookup,
                                    ProgressDirection::as_str,
                                );
                            }
                        }
                    });
                }
                "position" => {
                    resolver.group(key, value, &["desktop", "mobile"], |_, field, v| {
                        match field {
                            "desktop" => position_desktop = Some(v),
                            _ => position_mobile = Some(v),
                        }
                    });
                }
                "a11y" => {
                    if !kind.allows_a11y_override() {
                        resolver.push(ConfigWarning::removed(
                            key.as_str(),
                            WarningReason::NotAllowedForType,
                        ));
                        continue;
                    }
                    let a11y = &mut config.a11y;
                    resolver.group(key, value, &["role", "ariaLive"], |r, field, v| {
                        let path = format!("a11y.{field}");
                        match field {
                            "role" => {
                                a11y.role =
                                    r.choice(&path, v, a11y.role, Role::parse, Role::as_str);
                            }
                            _ => {
                                a11y.aria_live = r.choice(
                                    &path,
                                    v,
                                    a11y.aria_live,
                                    AriaLive::parse,
                                    AriaLive::as_str,
                                );
                            }
                        }
                    });
                }
                _ => {
                    resolver.push(ConfigWarning::removed(key.as_str(), WarningReason::UnknownKey));
                }
            }
        }

        if let Some(raw) = position_desktop {
            config.position.desktop = resolver.choice(
                "position.desktop",
                raw,
                config.position.desktop,
                DesktopPosition::lookup,
                DesktopPosition::as_str,
            );
        }
        let derived_mobile = config.position.desktop.mobile();
        config.position.mobile = match position_mobile {
            // An empty string means "derive from desktop".
            Some(Value::String(s)) if s.trim().is_empty() => derived_mobile,
            Some(raw) => resolver.choice(
                "position.mobile",
                raw,
                derived_mobile,
                MobilePosition::lookup,
                MobilePosition::as_str,
            ),
            None => derived_mobile,
        };

        config.normalize();
        Ok(Resolved {
            config,
            warnings: resolver.warnings,
        })
    }

    /// Attach a click handler.
    #[must_use]
    pub fn on_click(mut self, handler: impl Fn(&mut ClickControl) + 'static) -> Self {
        self.on_click = Some(ClickHandler::new(handler));
        self
    }

    /// Enforce the cross-field rules.
    fn normalize(&mut self) {
        if !self.transition.enabled || self.transition.duration.is_zero() {
            self.transition.enabled = false;
            self.transition.duration = Duration::ZERO;
        }
        if self.duration.is_zero() {
            self.sticky = true;
        }
    }

    /// Auto-close delay, or `None` for sticky toasts.
    #[must_use]
    pub fn auto_close(&self) -> Option<Duration> {
        (!self.sticky && !self.duration.is_zero()).then_some(self.duration)
    }

    /// Whether a pause button is rendered.
    #[must_use]
    pub fn has_pause_button(&self) -> bool {
        !self.sticky && self.pause.button
    }

    /// Whether the controls column is ever shown.
    #[must_use]
    pub fn has_controls(&self) -> bool {
        self.has_pause_button() || self.dismissible
    }

    /// Whether the progress bar is rendered.
    #[must_use]
    pub fn has_progress_bar(&self) -> bool {
        self.progress_bar.enabled && self.auto_close().is_some()
    }

    /// Inputs for the animation sequencer.
    #[must_use]
    pub fn animation_spec(&self) -> AnimationSpec {
        AnimationSpec {
            enter_classes: self.animation.enter.clone(),
            exit_classes: self.animation.exit.clone(),
            transition: self.transition.duration,
        }
    }

    /// JSON snapshot of the configuration (without the click handler).
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_unsigned(value: &Value) -> Option<u64> {
    let n = value.as_f64()?;
    (n.is_finite() && n >= 0.0).then(|| n.round() as u64)
}

#[derive(Debug, Default)]
struct Resolver {
    warnings: Vec<ConfigWarning>,
}

impl Resolver {
    fn push(&mut self, warning: ConfigWarning) {
        toastlet_core::warn!(
            option = %warning.option,
            reason = %warning.reason,
            fallback = %warning.fallback,
            "toast option corrected"
        );
        self.warnings.push(warning);
    }

    fn wrong_type(&mut self, path: &str, expected: &'static str, fallback: impl fmt::Display) {
        self.push(ConfigWarning::new(
            path,
            WarningReason::WrongType { expected },
            fallback.to_string(),
        ));
    }

    fn boolean(&mut self, path: &str, value: &Value, default: bool) -> bool {
        match value {
            Value::Bool(b) => *b,
            _ => {
                self.wrong_type(path, "a boolean", default);
                default
            }
        }
    }

    fn millis(&mut self, path: &str, value: &Value, default: Duration) -> Duration {
        match as_unsigned(value) {
            Some(ms) => Duration::from_millis(ms),
            None => {
                self.wrong_type(path, "an unsigned number", default.as_millis());
                default
            }
        }
    }

    fn pixels(&mut self, path: &str, value: &Value, default: u32) -> u32 {
        match as_unsigned(value).and_then(|n| u32::try_from(n).ok()) {
            Some(px) => px,
            None => {
                self.wrong_type(path, "an unsigned number", default);
                default
            }
        }
    }

    fn string(&mut self, path: &str, value: &Value, default: &str) -> String {
        match value {
            Value::String(s) => s.clone(),
            _ => {
                self.wrong_type(path, "a string", format!("{default:?}"));
                default.to_owned()
            }
        }
    }

    fn choice<T: Copy>(
        &mut self,
        path: &str,
        value: &Value,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
        name: impl Fn(T) -> &'static str,
    ) -> T {
        let Some(raw) = value.as_str() else {
            self.wrong_type(path, "a string", name(default));
            return default;
        };
        parse(raw).unwrap_or_else(|| {
            self.push(ConfigWarning::new(
                path,
                WarningReason::InvalidValue,
                name(default),
            ));
            default
        })
    }

    /// Walk a nested group, dropping unknown keys and handing known ones to `apply`.
    fn group<'v>(
        &mut self,
        key: &str,
        value: &'v Value,
        fields: &[&str],
        mut apply: impl FnMut(&mut Self, &str, &'v Value),
    ) {
        let Some(map) = value.as_object() else {
            self.wrong_type(key, "a plain object", "defaults");
            return;
        };
        for (field, v) in map {
            if fields.contains(&field.as_str()) {
                apply(self, field, v);
            } else {
                self.push(ConfigWarning::removed(
                    format!("{key}.{field}"),
                    WarningReason::UnknownKey,
                ));
            }
        }
    }
}
