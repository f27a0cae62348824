#![forbid(unsafe_code)]

//! Pointer positions and element translations.

use std::fmt;

/// A pointer or touch position in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise displacement from `origin` to `self`.
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// A single translate component: absolute pixels or a percentage of the
/// element's own box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    pub const ZERO: Self = Self::Px(0.0);

    /// Returns true for a zero offset in either unit.
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Px(v) | Self::Percent(v) => v == 0.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// A 2D translation applied to the toast element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translate {
    pub x: Length,
    pub y: Length,
}

impl Translate {
    /// No translation.
    pub const NONE: Self = Self {
        x: Length::ZERO,
        y: Length::ZERO,
    };

    /// Default vertical retreat used when a toast enters or leaves.
    pub const RETREAT: Self = Self {
        x: Length::ZERO,
        y: Length::Px(-20.0),
    };

    /// Translation in pixels.
    #[must_use]
    pub const fn px(x: f32, y: f32) -> Self {
        Self {
            x: Length::Px(x),
            y: Length::Px(y),
        }
    }

    /// Horizontal translation by a percentage of the element width.
    #[must_use]
    pub const fn horizontal_percent(x: f32) -> Self {
        Self {
            x: Length::Percent(x),
            y: Length::ZERO,
        }
    }

    /// Returns true if both components are zero.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

impl Default for Translate {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_renders_as_css() {
        assert_eq!(Translate::RETREAT.to_string(), "translate(0px, -20px)");
        assert_eq!(
            Translate::horizontal_percent(-100.0).to_string(),
            "translate(-100%, 0px)"
        );
    }

    #[test]
    fn zero_percent_is_none() {
        assert!(Translate::horizontal_percent(0.0).is_none());
        assert!(!Translate::px(1.0, 0.0).is_none());
    }

    #[test]
    fn delta_is_signed() {
        let origin = Point::new(50.0, 10.0);
        assert_eq!(Point::new(20.0, 15.0).delta_from(origin), (-30.0, 5.0));
    }
}
