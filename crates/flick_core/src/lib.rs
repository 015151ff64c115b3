//! Core types for the Flick immediate-mode UI engine
//!
//! This crate holds the plain value types every other layer speaks:
//! points, sizes, rects, axes, colors, and corner radii. It has no
//! dependencies and no behavior beyond geometry arithmetic.

pub mod color;
pub mod geometry;

pub use color::Color;
pub use geometry::{Axis, CornerRadius, Point, Rect, Size, Vec2};
