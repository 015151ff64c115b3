//! Fluent box specification
//!
//! `BoxSpec` is the argument to [`Context::add_box`]: key, size specs,
//! flags, layout axis, style overrides, and optional text or custom paint.
//! Style mutators copy-on-write, so untouched specs share the context's
//! default style.
//!
//! [`Context::add_box`]: crate::context::Context::add_box

use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

use flick_core::{Axis, Color, CornerRadius, Vec2};
use flick_paint::{DrawList, FontId};
use smallvec::SmallVec;

use crate::flags::BoxFlags;
use crate::key::Key;
use crate::style::{Padding, SharedStyle, SizeSpec, Style};
use crate::tree::{BoxNode, BoxPaint};

/// Everything needed to create one box this frame
#[derive(Clone)]
pub struct BoxSpec {
    pub(crate) key: Key,
    pub(crate) spec: [SizeSpec; 2],
    pub(crate) flags: BoxFlags,
    pub(crate) axis: Axis,
    pub(crate) text: Option<String>,
    pub(crate) float_offset: Vec2,
    pub(crate) style: Option<SharedStyle>,
    pub(crate) paint: BoxPaint,
    pub(crate) data: SmallVec<[Rc<dyn Any>; 2]>,
}

impl BoxSpec {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            spec: [SizeSpec::Fit; 2],
            flags: BoxFlags::empty(),
            axis: Axis::Y,
            text: None,
            float_offset: Vec2::ZERO,
            style: None,
            paint: BoxPaint::Standard,
            data: SmallVec::new(),
        }
    }

    // =========================================================================
    // Sizing
    // =========================================================================

    pub fn width(mut self, spec: SizeSpec) -> Self {
        self.spec[Axis::X as usize] = spec;
        self
    }

    pub fn height(mut self, spec: SizeSpec) -> Self {
        self.spec[Axis::Y as usize] = spec;
        self
    }

    pub fn size(self, width: SizeSpec, height: SizeSpec) -> Self {
        self.width(width).height(height)
    }

    pub fn fixed(self, width: f32, height: f32) -> Self {
        self.size(SizeSpec::Fixed(width), SizeSpec::Fixed(height))
    }

    pub fn fixed_width(self, width: f32) -> Self {
        self.width(SizeSpec::Fixed(width))
    }

    pub fn fixed_height(self, height: f32) -> Self {
        self.height(SizeSpec::Fixed(height))
    }

    pub fn flex_width(self, weight: f32) -> Self {
        self.width(SizeSpec::Flex(weight))
    }

    pub fn flex_height(self, weight: f32) -> Self {
        self.height(SizeSpec::Flex(weight))
    }

    // =========================================================================
    // Layout axis & flags
    // =========================================================================

    /// Lay children out left to right
    pub fn layout_x(mut self) -> Self {
        self.axis = Axis::X;
        self
    }

    /// Lay children out top to bottom (the default)
    pub fn layout_y(mut self) -> Self {
        self.axis = Axis::Y;
        self
    }

    pub fn clickable(mut self) -> Self {
        self.flags |= BoxFlags::CLICKABLE;
        self
    }

    pub fn selectable(mut self) -> Self {
        self.flags |= BoxFlags::SELECTABLE;
        self
    }

    pub fn no_hover(mut self) -> Self {
        self.flags |= BoxFlags::NO_HOVER;
        self
    }

    pub fn no_shrink(mut self) -> Self {
        self.flags |= BoxFlags::NO_SHRINK;
        self
    }

    pub fn layout_from_end(mut self) -> Self {
        self.flags |= BoxFlags::LAYOUT_FROM_END;
        self
    }

    pub fn no_clip(mut self) -> Self {
        self.flags |= BoxFlags::NO_CLIP;
        self
    }

    /// Position explicitly relative to the parent instead of the layout
    /// cursor (scroll content, dragged handles, arrangers)
    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.flags |= BoxFlags::NO_AUTO_OFFSET;
        self.float_offset = Vec2::new(x, y);
        self
    }

    // =========================================================================
    // Content & style
    // =========================================================================

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.style_mut().background = Some(color);
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.style_mut().text_color = color;
        self
    }

    pub fn corner_radius(mut self, radius: impl Into<CornerRadius>) -> Self {
        self.style_mut().corner_radius = radius.into();
        self
    }

    pub fn padding(mut self, value: f32) -> Self {
        self.style_mut().padding = Padding::all(value);
        self
    }

    pub fn padding_sides(mut self, padding: Padding) -> Self {
        self.style_mut().padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.style_mut().gap = gap;
        self
    }

    pub fn font(mut self, font: FontId) -> Self {
        self.style_mut().font = font;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.style_mut().font_size = size;
        self
    }

    /// Replace the standard draw emission with a custom painter
    pub fn paint_with(mut self, painter: impl Fn(&BoxNode, &mut DrawList) + 'static) -> Self {
        self.paint = BoxPaint::Custom(Rc::new(painter));
        self
    }

    /// Attach a frame-local datum, readable through [`BoxNode::data_of`]
    pub fn attach<T: 'static>(mut self, value: T) -> Self {
        self.data.push(Rc::new(value));
        self
    }

    fn style_mut(&mut self) -> &mut Style {
        Arc::make_mut(self.style.get_or_insert_with(|| Arc::new(Style::default())))
    }
}

/// Shorthand for `BoxSpec::new(Key::from_label(label))`
pub fn boxed(label: &str) -> BoxSpec {
    BoxSpec::new(Key::from_label(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_copy_on_write() {
        let spec = BoxSpec::new(Key::from_id(1));
        assert!(spec.style.is_none());
        let styled = spec.background(Color::RED);
        assert_eq!(
            styled.style.as_ref().unwrap().background,
            Some(Color::RED)
        );
    }

    #[test]
    fn test_offset_implies_no_auto_offset() {
        let spec = BoxSpec::new(Key::from_id(1)).offset(4.0, 8.0);
        assert!(spec.flags.contains(BoxFlags::NO_AUTO_OFFSET));
        assert_eq!(spec.float_offset, Vec2::new(4.0, 8.0));
    }

    #[test]
    fn test_attached_data_is_typed() {
        let spec = BoxSpec::new(Key::from_id(1)).attach(5u32).attach("tag");
        assert_eq!(spec.data.len(), 2);
        assert_eq!(spec.data[0].downcast_ref::<u32>(), Some(&5));
    }

    #[test]
    fn test_sizing_sugar() {
        let spec = BoxSpec::new(Key::from_id(1))
            .flex_width(2.0)
            .fixed_height(20.0);
        assert_eq!(spec.spec[0], SizeSpec::Flex(2.0));
        assert_eq!(spec.spec[1], SizeSpec::Fixed(20.0));
    }
}
