//! Glyph-run measurement and emission
//!
//! Text is measured as the rounded sum of glyph advances and drawn as one
//! atlas sprite per glyph. A codepoint the font cannot supply renders a
//! visible hollow box instead of disappearing.

use flick_core::{Color, Point, Rect, Size};
use tracing::warn;

use crate::backend::{FontId, RenderBackend};
use crate::batch::DrawList;

/// Advance used for codepoints the font has no glyph for
fn placeholder_advance(size: f32) -> f32 {
    size * 0.6
}

/// Measure a single-line run: rounded advance sum by font size
pub fn measure_text(
    backend: &mut dyn RenderBackend,
    font: FontId,
    size: f32,
    text: &str,
) -> Size {
    let mut width = 0.0;
    for c in text.chars() {
        width += match backend.glyph(c, font, size) {
            Some(glyph) => glyph.advance,
            None => placeholder_advance(size),
        };
    }
    Size::new(width.round(), size)
}

/// Emit a single-line run with the pen starting at `baseline`
pub fn draw_text(
    list: &mut DrawList,
    backend: &mut dyn RenderBackend,
    font: FontId,
    size: f32,
    baseline: Point,
    text: &str,
    color: Color,
    clip: Option<Rect>,
) {
    let atlas = backend.atlas_texture();
    let mut pen = baseline;
    for c in text.chars() {
        match backend.glyph(c, font, size) {
            Some(glyph) => {
                let rect = Rect::new(
                    pen.x + glyph.offset.x,
                    pen.y + glyph.offset.y,
                    glyph.size.width,
                    glyph.size.height,
                );
                list.sprite(atlas, rect, glyph.uv, color, clip);
                pen.x += glyph.advance;
            }
            None => {
                warn!(codepoint = %c.escape_unicode(), "missing glyph, drawing placeholder");
                let advance = placeholder_advance(size);
                let rect = Rect::new(pen.x + size * 0.05, pen.y - size * 0.8, advance * 0.8, size * 0.8);
                draw_hollow_rect(list, rect, (size * 0.08).max(1.0), color, clip);
                pen.x += advance;
            }
        }
    }
}

/// Four thin quads forming an unfilled box
fn draw_hollow_rect(list: &mut DrawList, rect: Rect, thickness: f32, color: Color, clip: Option<Rect>) {
    let t = thickness.min(rect.width() / 2.0).min(rect.height() / 2.0);
    list.fill_rect(Rect::new(rect.x(), rect.y(), rect.width(), t), color, clip);
    list.fill_rect(
        Rect::new(rect.x(), rect.max_y() - t, rect.width(), t),
        color,
        clip,
    );
    list.fill_rect(
        Rect::new(rect.x(), rect.y() + t, t, rect.height() - 2.0 * t),
        color,
        clip,
    );
    list.fill_rect(
        Rect::new(rect.max_x() - t, rect.y() + t, t, rect.height() - 2.0 * t),
        color,
        clip,
    );
}
