//! Render backend capability interface
//!
//! The engine never talks to a GPU directly: a backend owns vertex/index
//! buffers and the glyph atlas texture, and exposes them through this trait.
//! Mapping calls are idempotent within a frame (the same call returns the
//! same storage) and the mapping stays valid until the end of the frame.
//!
//! [`HeadlessBackend`] is a complete in-memory implementation with
//! fixed-advance glyph metrics, used by the engine's own tests and by any
//! host that wants deterministic layout without a real font stack.

use flick_core::{Rect, Size, Vec2};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::batch::Vertex;

slotmap::new_key_type! {
    /// Handle to a backend-owned vertex buffer
    pub struct VertexBufferId;
    /// Handle to a backend-owned index buffer
    pub struct IndexBufferId;
    /// Handle to a backend-owned texture
    pub struct TextureId;
}

/// Handle to a font known to the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Cached glyph data returned by the backend
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// UV rect of the glyph bitmap inside the atlas texture
    pub uv: Rect,
    /// Pixel size of the glyph bitmap
    pub size: Size,
    /// Pixel offset from the pen position to the bitmap origin
    pub offset: Vec2,
    /// Horizontal advance to the next pen position
    pub advance: f32,
}

/// Capabilities the engine requires from a rendering backend
pub trait RenderBackend {
    fn create_vertex_buffer(&mut self, len: usize) -> VertexBufferId;
    fn destroy_vertex_buffer(&mut self, id: VertexBufferId);
    fn create_index_buffer(&mut self, len: usize) -> IndexBufferId;
    fn destroy_index_buffer(&mut self, id: IndexBufferId);
    fn create_atlas_texture(&mut self, width: u32, height: u32) -> TextureId;
    fn destroy_atlas_texture(&mut self, id: TextureId);

    /// Map a vertex buffer until frame end. Idempotent within a frame.
    fn map_vertex_buffer(&mut self, id: VertexBufferId) -> &mut [Vertex];

    /// Map an index buffer until frame end. Idempotent within a frame.
    fn map_index_buffer(&mut self, id: IndexBufferId) -> &mut [u32];

    /// The atlas texture glyph sprites sample from
    fn atlas_texture(&self) -> TextureId;

    /// Look up a cached glyph. `None` means the font has no glyph for this
    /// codepoint; the caller must render a visible placeholder.
    fn glyph(&mut self, codepoint: char, font: FontId, size: f32) -> Option<GlyphMetrics>;
}

/// In-memory backend with deterministic fixed-advance glyph metrics
///
/// Every glyph advances by `size * 0.5` and occupies a `0.4 × 0.8`-of-size
/// bitmap, so text measurement in tests is a closed-form expression.
pub struct HeadlessBackend {
    vertex_buffers: SlotMap<VertexBufferId, Vec<Vertex>>,
    index_buffers: SlotMap<IndexBufferId, Vec<u32>>,
    textures: SlotMap<TextureId, (u32, u32)>,
    atlas: TextureId,
    missing: FxHashSet<char>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        let mut textures = SlotMap::with_key();
        let atlas = textures.insert((1024, 1024));
        Self {
            vertex_buffers: SlotMap::with_key(),
            index_buffers: SlotMap::with_key(),
            textures,
            atlas,
            missing: FxHashSet::default(),
        }
    }

    /// Declare a codepoint missing from every font, for placeholder tests
    pub fn set_missing_glyph(&mut self, codepoint: char) {
        self.missing.insert(codepoint);
    }

    pub fn vertex_buffer(&self, id: VertexBufferId) -> &[Vertex] {
        &self.vertex_buffers[id]
    }

    pub fn index_buffer(&self, id: IndexBufferId) -> &[u32] {
        &self.index_buffers[id]
    }

    pub fn vertex_buffer_len(&self, id: VertexBufferId) -> usize {
        self.vertex_buffers[id].len()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_vertex_buffer(&mut self, len: usize) -> VertexBufferId {
        self.vertex_buffers.insert(vec![Vertex::default(); len])
    }

    fn destroy_vertex_buffer(&mut self, id: VertexBufferId) {
        self.vertex_buffers.remove(id);
    }

    fn create_index_buffer(&mut self, len: usize) -> IndexBufferId {
        self.index_buffers.insert(vec![0; len])
    }

    fn destroy_index_buffer(&mut self, id: IndexBufferId) {
        self.index_buffers.remove(id);
    }

    fn create_atlas_texture(&mut self, width: u32, height: u32) -> TextureId {
        self.textures.insert((width, height))
    }

    fn destroy_atlas_texture(&mut self, id: TextureId) {
        self.textures.remove(id);
    }

    fn map_vertex_buffer(&mut self, id: VertexBufferId) -> &mut [Vertex] {
        &mut self.vertex_buffers[id]
    }

    fn map_index_buffer(&mut self, id: IndexBufferId) -> &mut [u32] {
        &mut self.index_buffers[id]
    }

    fn atlas_texture(&self) -> TextureId {
        self.atlas
    }

    fn glyph(&mut self, codepoint: char, _font: FontId, size: f32) -> Option<GlyphMetrics> {
        if self.missing.contains(&codepoint) {
            return None;
        }
        Some(GlyphMetrics {
            uv: Rect::new(0.0, 0.0, 0.01, 0.01),
            size: Size::new(size * 0.4, size * 0.8),
            offset: Vec2::new(0.05 * size, -size * 0.8),
            advance: size * 0.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_lifecycle() {
        let mut backend = HeadlessBackend::new();
        let vb = backend.create_vertex_buffer(16);
        assert_eq!(backend.map_vertex_buffer(vb).len(), 16);
        backend.destroy_vertex_buffer(vb);
    }

    #[test]
    fn test_map_is_idempotent() {
        let mut backend = HeadlessBackend::new();
        let ib = backend.create_index_buffer(8);
        backend.map_index_buffer(ib)[3] = 42;
        assert_eq!(backend.map_index_buffer(ib)[3], 42);
    }

    #[test]
    fn test_glyph_metrics_fixed_advance() {
        let mut backend = HeadlessBackend::new();
        let glyph = backend.glyph('a', FontId(0), 16.0).unwrap();
        assert_eq!(glyph.advance, 8.0);
    }

    #[test]
    fn test_missing_glyph_is_none() {
        let mut backend = HeadlessBackend::new();
        backend.set_missing_glyph('☃');
        assert!(backend.glyph('☃', FontId(0), 16.0).is_none());
        assert!(backend.glyph('a', FontId(0), 16.0).is_some());
    }
}
