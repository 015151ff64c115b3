//! Vertex/index accumulation and draw-call batching
//!
//! A [`DrawList`] accumulates one vertex stream and one index stream per
//! frame. Every emitter funnels through [`DrawList::add_vertex`] and
//! [`DrawList::add_index`]; a draw call is finalized only when the active
//! texture changes or the frame ends, so consecutive same-texture shapes
//! merge into a single indexed draw.
//!
//! [`FrameBuffers`] owns the backend buffer pair the list uploads into,
//! growing them geometrically when a frame outgrows the current capacity.

use flick_core::{Color, Point, Rect};
use tracing::debug;

use crate::backend::{IndexBufferId, RenderBackend, TextureId, VertexBufferId};
use crate::clip::{clip_sprite, clip_triangle};

/// One vertex as the backend sees it
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Point, uv: [f32; 2], color: Color) -> Self {
        Self {
            position: [position.x, position.y],
            uv,
            color: color.to_array(),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.position[0], self.position[1])
    }
}

/// A texture-coalesced run of indexed triangles
///
/// `texture == None` means untextured (solid-color) geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub texture: Option<TextureId>,
    pub first_index: u32,
    pub index_count: u32,
}

/// Per-frame geometry accumulator
#[derive(Default)]
pub struct DrawList {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    calls: Vec<DrawCall>,
    active_texture: Option<TextureId>,
    call_first_index: u32,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new frame, keeping allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.calls.clear();
        self.active_texture = None;
        self.call_first_index = 0;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Switch the active texture, finalizing the open draw call if the
    /// texture actually changes
    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        if texture != self.active_texture {
            self.finalize_call();
            self.active_texture = texture;
        }
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    pub fn add_index(&mut self, index: u32) {
        debug_assert!((index as usize) < self.vertices.len());
        self.indices.push(index);
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.add_index(a);
        self.add_index(b);
        self.add_index(c);
    }

    /// Close the open draw call, if it has any indices
    pub fn finalize_call(&mut self) {
        let pending = self.indices.len() as u32 - self.call_first_index;
        if pending > 0 {
            self.calls.push(DrawCall {
                texture: self.active_texture,
                first_index: self.call_first_index,
                index_count: pending,
            });
            self.call_first_index = self.indices.len() as u32;
        }
    }

    /// Finalize the trailing draw call at frame end
    pub fn finish(&mut self) -> &[DrawCall] {
        self.finalize_call();
        debug!(
            vertices = self.vertices.len(),
            indices = self.indices.len(),
            calls = self.calls.len(),
            "draw list finished"
        );
        &self.calls
    }

    // ------------------------------------------------------------------
    // Shape emitters
    // ------------------------------------------------------------------

    /// Emit an axis-aligned solid quad, clipped against `clip`
    pub fn fill_rect(&mut self, rect: Rect, color: Color, clip: Option<Rect>) {
        let rect = match clip {
            Some(clip) => rect.intersect(&clip),
            None => rect,
        };
        if rect.is_empty() {
            return;
        }
        self.set_texture(None);
        self.quad(rect, Rect::ZERO, color);
    }

    /// Emit a textured quad sampling `uv` from `texture`, clipped with
    /// proportional UV adjustment
    pub fn sprite(
        &mut self,
        texture: TextureId,
        rect: Rect,
        uv: Rect,
        color: Color,
        clip: Option<Rect>,
    ) {
        let (rect, uv) = match clip {
            Some(clip) => match clip_sprite(rect, uv, clip) {
                Some(clipped) => clipped,
                None => return,
            },
            None => (rect, uv),
        };
        self.set_texture(Some(texture));
        self.quad(rect, uv, color);
    }

    /// Emit one solid triangle, clipping against the scissor when any
    /// vertex falls outside it
    pub fn push_triangle_clipped(&mut self, tri: [Vertex; 3], clip: Option<Rect>) {
        let clip = match clip {
            Some(clip) => clip,
            None => {
                let base = self.add_vertex(tri[0]);
                self.add_vertex(tri[1]);
                self.add_vertex(tri[2]);
                self.add_triangle(base, base + 1, base + 2);
                return;
            }
        };
        if tri.iter().all(|v| clip.contains(v.point())) {
            let base = self.add_vertex(tri[0]);
            self.add_vertex(tri[1]);
            self.add_vertex(tri[2]);
            self.add_triangle(base, base + 1, base + 2);
            return;
        }
        let polygon = clip_triangle(tri, clip);
        self.fan(&polygon);
    }

    /// Fan-triangulate a convex polygon
    pub(crate) fn fan(&mut self, polygon: &[Vertex]) {
        if polygon.len() < 3 {
            return;
        }
        let base = self.add_vertex(polygon[0]);
        for v in &polygon[1..] {
            self.add_vertex(*v);
        }
        for i in 1..polygon.len() as u32 - 1 {
            self.add_triangle(base, base + i, base + i + 1);
        }
    }

    fn quad(&mut self, rect: Rect, uv: Rect, color: Color) {
        let base = self.add_vertex(Vertex::new(rect.origin, [uv.x(), uv.y()], color));
        self.add_vertex(Vertex::new(
            Point::new(rect.max_x(), rect.y()),
            [uv.max_x(), uv.y()],
            color,
        ));
        self.add_vertex(Vertex::new(
            Point::new(rect.max_x(), rect.max_y()),
            [uv.max_x(), uv.max_y()],
            color,
        ));
        self.add_vertex(Vertex::new(
            Point::new(rect.x(), rect.max_y()),
            [uv.x(), uv.max_y()],
            color,
        ));
        self.add_triangle(base, base + 1, base + 2);
        self.add_triangle(base, base + 2, base + 3);
    }
}

/// Backend buffer pair a [`DrawList`] uploads into
pub struct FrameBuffers {
    vertex_buffer: VertexBufferId,
    index_buffer: IndexBufferId,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl FrameBuffers {
    pub fn new(
        backend: &mut dyn RenderBackend,
        vertex_capacity: usize,
        index_capacity: usize,
    ) -> Self {
        Self {
            vertex_buffer: backend.create_vertex_buffer(vertex_capacity),
            index_buffer: backend.create_index_buffer(index_capacity),
            vertex_capacity,
            index_capacity,
        }
    }

    pub fn vertex_buffer(&self) -> VertexBufferId {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> IndexBufferId {
        self.index_buffer
    }

    /// Write the frame's geometry through the backend's mapped buffers,
    /// doubling capacity first when the frame outgrew it. Exhaustion is
    /// never surfaced to the caller.
    pub fn upload(&mut self, backend: &mut dyn RenderBackend, list: &DrawList) {
        if list.vertices().len() > self.vertex_capacity {
            let mut capacity = self.vertex_capacity.max(1);
            while capacity < list.vertices().len() {
                capacity *= 2;
            }
            debug!(old = self.vertex_capacity, new = capacity, "growing vertex buffer");
            backend.destroy_vertex_buffer(self.vertex_buffer);
            self.vertex_buffer = backend.create_vertex_buffer(capacity);
            self.vertex_capacity = capacity;
        }
        if list.indices().len() > self.index_capacity {
            let mut capacity = self.index_capacity.max(1);
            while capacity < list.indices().len() {
                capacity *= 2;
            }
            debug!(old = self.index_capacity, new = capacity, "growing index buffer");
            backend.destroy_index_buffer(self.index_buffer);
            self.index_buffer = backend.create_index_buffer(capacity);
            self.index_capacity = capacity;
        }
        backend.map_vertex_buffer(self.vertex_buffer)[..list.vertices().len()]
            .copy_from_slice(list.vertices());
        backend.map_index_buffer(self.index_buffer)[..list.indices().len()]
            .copy_from_slice(list.indices());
    }

    pub fn destroy(self, backend: &mut dyn RenderBackend) {
        backend.destroy_vertex_buffer(self.vertex_buffer);
        backend.destroy_index_buffer(self.index_buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    #[test]
    fn test_same_texture_shapes_merge_into_one_call() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None);
        list.fill_rect(Rect::new(20.0, 0.0, 10.0, 10.0), Color::BLUE, None);
        let calls = list.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].texture, None);
        assert_eq!(calls[0].index_count, 12);
    }

    #[test]
    fn test_texture_change_splits_calls() {
        let mut backend = HeadlessBackend::new();
        let atlas = backend.atlas_texture();
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None);
        list.sprite(
            atlas,
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(0.0, 0.0, 0.1, 0.1),
            Color::WHITE,
            None,
        );
        list.fill_rect(Rect::new(20.0, 0.0, 10.0, 10.0), Color::RED, None);
        let calls = list.finish();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].texture, None);
        assert_eq!(calls[1].texture, Some(atlas));
        assert_eq!(calls[2].texture, None);
        assert_eq!(calls[1].first_index, 6);
    }

    #[test]
    fn test_fill_rect_clips_to_scissor() {
        let mut list = DrawList::new();
        list.fill_rect(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Color::RED,
            Some(Rect::new(50.0, 50.0, 100.0, 100.0)),
        );
        let vertices = list.vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].point(), Point::new(50.0, 50.0));
        assert_eq!(vertices[2].point(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_fill_rect_outside_scissor_emits_nothing() {
        let mut list = DrawList::new();
        list.fill_rect(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Color::RED,
            Some(Rect::new(100.0, 100.0, 10.0, 10.0)),
        );
        assert!(list.finish().is_empty());
    }

    #[test]
    fn test_upload_grows_buffers_geometrically() {
        let mut backend = HeadlessBackend::new();
        let mut buffers = FrameBuffers::new(&mut backend, 4, 6);
        let mut list = DrawList::new();
        for i in 0..10 {
            list.fill_rect(
                Rect::new(i as f32 * 12.0, 0.0, 10.0, 10.0),
                Color::RED,
                None,
            );
        }
        list.finish();
        buffers.upload(&mut backend, &list);
        // 40 vertices need 4 → 64 doubling; 60 indices need 6 → 96
        assert_eq!(backend.vertex_buffer_len(buffers.vertex_buffer()), 64);
        assert_eq!(backend.index_buffer(buffers.index_buffer()).len(), 96);
        assert_eq!(
            &backend.vertex_buffer(buffers.vertex_buffer())[..list.vertices().len()],
            list.vertices()
        );
    }

    #[test]
    fn test_clear_resets_state() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None);
        list.finish();
        list.clear();
        assert!(list.vertices().is_empty());
        assert!(list.calls().is_empty());
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::RED, None);
        assert_eq!(list.finish().len(), 1);
    }
}
