//! Box styling and size specification
//!
//! Styles are shared: a box holds an `Arc<Style>`, and builder methods that
//! change style copy-on-write, so the common case of many boxes sharing the
//! context default costs one clone of the `Arc` each.

use std::sync::Arc;

use flick_core::{Axis, Color, CornerRadius};
use flick_paint::FontId;

/// How a box sizes itself along one axis
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SizeSpec {
    /// Size to content: text advance, or children sum/max plus padding
    #[default]
    Fit,
    /// Exactly this many pixels
    Fixed(f32),
    /// Content-sized, then granted a weighted share of the parent's
    /// leftover space
    Flex(f32),
}

impl SizeSpec {
    pub fn is_flex(&self) -> bool {
        matches!(self, SizeSpec::Flex(_))
    }

    /// Weight used for proportional grow/shrink. Non-positive weights
    /// count as 1 so a degenerate weight never zeroes the split.
    pub fn weight(&self) -> f32 {
        match self {
            SizeSpec::Flex(w) if *w > 0.0 => *w,
            _ => 1.0,
        }
    }
}

/// Per-side padding in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub const fn all(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    /// Total padding along an axis (both sides)
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left + self.right,
            Axis::Y => self.top + self.bottom,
        }
    }

    /// Padding on the leading side of an axis
    pub fn start(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Padding on the trailing side of an axis
    pub fn end(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }
}

/// Shared visual and spacing properties of a box
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub background: Option<Color>,
    pub text_color: Color,
    pub corner_radius: CornerRadius,
    pub padding: Padding,
    /// Spacing between adjacent children along the layout axis
    pub gap: f32,
    pub font: FontId,
    pub font_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: None,
            text_color: Color::WHITE,
            corner_radius: CornerRadius::ZERO,
            padding: Padding::default(),
            gap: 0.0,
            font: FontId(0),
            font_size: 14.0,
        }
    }
}

/// Copy-on-write handle to a style
pub type SharedStyle = Arc<Style>;
