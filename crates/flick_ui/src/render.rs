//! Draw emission walk
//!
//! After layout, the tree walks in pre-order emitting each box's standard
//! paint (background rect from style, then text) or its custom painter.
//! Each box draws clipped to its own resolved scissor rect, so fully
//! scissored subtrees cost nothing past the emitter's early-outs.

use flick_core::Point;
use flick_paint::{draw_text, DrawList, RenderBackend};

use crate::tree::{BoxIndex, BoxPaint, Generation};

pub(crate) fn emit(
    generation: &Generation,
    root: BoxIndex,
    list: &mut DrawList,
    backend: &mut dyn RenderBackend,
) {
    emit_box(generation, root, list, backend);
}

fn emit_box(
    generation: &Generation,
    index: BoxIndex,
    list: &mut DrawList,
    backend: &mut dyn RenderBackend,
) {
    let node = generation.get(index);
    match &node.paint {
        BoxPaint::Standard => {
            let clip = Some(node.clipped);
            if let Some(background) = node.style.background {
                list.fill_rounded_rect(node.rect(), node.style.corner_radius, background, clip);
            }
            if let Some(text) = &node.text {
                let style = &node.style;
                // Pen starts at the content box, baseline one ascent down
                let baseline = Point::new(
                    node.position.x + style.padding.left,
                    node.position.y + style.padding.top + style.font_size * 0.8,
                );
                draw_text(
                    list,
                    backend,
                    style.font,
                    style.font_size,
                    baseline,
                    text,
                    style.text_color,
                    clip,
                );
            }
        }
        BoxPaint::Custom(painter) => painter(node, list),
    }
    for child in generation.children(index) {
        emit_box(generation, child, list, backend);
    }
}
