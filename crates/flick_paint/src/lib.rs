//! Draw batch builder for Flick
//!
//! This crate provides:
//! - The [`RenderBackend`] capability trait (buffers, atlas, glyph lookup)
//! - [`DrawList`]: vertex/index accumulation with texture-coalesced draw calls
//! - Rounded-rect and polyline tessellation (table-driven corner arcs)
//! - Sprite and triangle clipping against the active scissor rect
//! - Glyph-run emission with a visible placeholder for missing glyphs
//!
//! All shape emitters funnel through the same `add_vertex`/`add_index`
//! primitives, so a frame's geometry always lands in one vertex stream and
//! one index stream, split into draw calls only at texture changes.

pub mod backend;
pub mod batch;
pub mod clip;
pub mod tessellate;
pub mod text;

pub use backend::{
    FontId, GlyphMetrics, HeadlessBackend, IndexBufferId, RenderBackend, TextureId,
    VertexBufferId,
};
pub use batch::{DrawCall, DrawList, FrameBuffers, Vertex};
pub use clip::{clip_sprite, clip_triangle};
pub use text::{draw_text, measure_text};
