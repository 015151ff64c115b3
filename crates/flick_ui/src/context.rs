//! The engine context
//!
//! One `Context` is one logical UI: it owns both frame generations, the
//! input and interaction state, the retained store, and the frame's draw
//! list. There is no global state; independent contexts are fully
//! independent, which is also what makes the engine testable headlessly.
//!
//! A frame is exactly one `begin_frame … add_box*/push/pop … end_frame`
//! sequence. Tree-construction mistakes (duplicate keys, unbalanced or
//! misordered pops, adding boxes outside a frame) are caller bugs and
//! panic; there is no error channel for them.

use flick_core::{Point, Rect, Size, Vec2};
use flick_paint::{
    DrawCall, DrawList, FrameBuffers, IndexBufferId, RenderBackend, VertexBufferId,
};
use tracing::trace;

use crate::builder::BoxSpec;
use crate::flags::BoxFlags;
use crate::input::{Clipboard, InputId, InputState};
use crate::interaction::{hovered_idle_in, hovered_in, CursorShape, InteractionState};
use crate::key::Key;
use crate::layout;
use crate::render;
use crate::retained::RetainedStore;
use crate::style::SharedStyle;
use crate::tree::{BoxIndex, BoxNode, FrameArena};

/// Initial backend buffer sizes; frames that outgrow them double
const INITIAL_VERTEX_CAPACITY: usize = 4096;
const INITIAL_INDEX_CAPACITY: usize = 8192;

/// Everything the host consumes at the end of a frame
pub struct FrameOutput {
    pub cursor: CursorShape,
    pub lock_cursor: bool,
    /// Ordered draw calls referencing the backend-owned buffers below
    pub draw_calls: Vec<DrawCall>,
    pub vertex_buffer: VertexBufferId,
    pub index_buffer: IndexBufferId,
}

/// One logical UI instance
#[derive(Default)]
pub struct Context {
    arena: FrameArena,
    stack: Vec<BoxIndex>,
    input: InputState,
    interaction: InteractionState,
    retained: RetainedStore,
    draw_list: DrawList,
    buffers: Option<FrameBuffers>,
    default_style: SharedStyle,
    viewport: Size,
    in_frame: bool,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    // ------------------------------------------------------------------
    // Subsystem access
    // ------------------------------------------------------------------

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Feed input events between frames through this
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn retained(&mut self) -> &mut RetainedStore {
        &mut self.retained
    }

    /// Shorthand for the retained value of type `T` under `key`
    pub fn state<T: Default + 'static>(&mut self, key: Key) -> &mut T {
        self.retained.get_or_default(key)
    }

    pub fn clipboard_get(&mut self) -> Option<String> {
        self.clipboard.as_mut().map(|clipboard| clipboard.get())
    }

    pub fn clipboard_set(&mut self, text: &str) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set(text);
        }
    }

    pub(crate) fn arena(&self) -> &FrameArena {
        &self.arena
    }

    // ------------------------------------------------------------------
    // Frame lifecycle
    // ------------------------------------------------------------------

    /// Start a frame: swap generations, run interaction bookkeeping
    /// against last frame's tree, and install the viewport root box
    pub fn begin_frame(&mut self, viewport: Size, dt: f32) {
        assert!(!self.in_frame, "begin_frame inside an open frame");
        self.in_frame = true;
        self.viewport = viewport;
        self.input.set_dt(dt);
        self.arena.begin_frame();
        self.interaction.begin_frame(&self.input, self.arena.previous());
        self.stack.clear();
        trace!(width = viewport.width, height = viewport.height, "frame begin");

        let root = self.insert_box(
            BoxSpec::new(Key::from_label("flick.root"))
                .fixed(viewport.width, viewport.height),
            None,
        );
        self.stack.push(root);
    }

    /// Create a box under the parent currently on top of the stack
    pub fn add_box(&mut self, spec: BoxSpec) -> Key {
        assert!(self.in_frame, "add_box outside a frame");
        let parent = *self
            .stack
            .last()
            .expect("add_box requires a pushed parent box");
        let key = spec.key;
        self.insert_box(spec, Some(parent));
        key
    }

    /// Make the box the parent of subsequent `add_box` calls
    pub fn push(&mut self, key: Key) {
        let index = self
            .arena
            .current()
            .lookup(key)
            .expect("push of a box not created this frame");
        self.stack.push(index);
    }

    /// Pop a pushed box; popping anything but the top is a contract
    /// violation
    pub fn pop(&mut self, key: Key) {
        let top = self.stack.pop().expect("pop with an empty box stack");
        let top_key = self.arena.current().get(top).key;
        assert!(
            top_key == key,
            "popped box {key:?} is not on top of the stack (top is {top_key:?})"
        );
    }

    /// Finish the frame: solve layout, emit and upload geometry, and
    /// return the host-facing outputs
    pub fn end_frame(&mut self, backend: &mut dyn RenderBackend) -> FrameOutput {
        assert!(self.in_frame, "end_frame without begin_frame");
        assert!(
            self.stack.len() == 1,
            "unbalanced push/pop: {} boxes still pushed",
            self.stack.len() - 1
        );
        let root = self.stack.pop().expect("root box on the stack");

        layout::solve(self.arena.current_mut(), root, self.viewport, backend);

        self.draw_list.clear();
        render::emit(self.arena.current(), root, &mut self.draw_list, backend);
        let draw_calls = self.draw_list.finish().to_vec();

        let buffers = self.buffers.get_or_insert_with(|| {
            FrameBuffers::new(backend, INITIAL_VERTEX_CAPACITY, INITIAL_INDEX_CAPACITY)
        });
        buffers.upload(backend, &self.draw_list);

        self.input.end_frame();
        self.in_frame = false;
        trace!(calls = draw_calls.len(), "frame end");

        FrameOutput {
            cursor: self.interaction.cursor,
            lock_cursor: self.interaction.lock_cursor,
            draw_calls,
            vertex_buffer: buffers.vertex_buffer(),
            index_buffer: buffers.index_buffer(),
        }
    }

    fn insert_box(&mut self, spec: BoxSpec, parent: Option<BoxIndex>) -> BoxIndex {
        let mut flags = spec.flags;
        if let Some(parent) = parent {
            // No-hover propagates down the tree
            flags |= self.arena.current().get(parent).flags & BoxFlags::NO_HOVER;
        }
        let prev_frame = self.arena.previous().lookup(spec.key);
        let node = BoxNode {
            key: spec.key,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            prev_frame,
            spec: spec.spec,
            flags,
            axis: spec.axis,
            style: spec
                .style
                .unwrap_or_else(|| self.default_style.clone()),
            text: spec.text,
            float_offset: spec.float_offset,
            paint: spec.paint,
            data: spec.data,
            unexpanded: Size::ZERO,
            size: Size::ZERO,
            position: Point::ZERO,
            clipped: Rect::ZERO,
        };
        let index = self.arena.current_mut().insert(node);
        if let Some(parent) = parent {
            let generation = self.arena.current_mut();
            let prev_sibling = generation.get(parent).last_child;
            generation.get_mut(index).prev_sibling = prev_sibling;
            match prev_sibling {
                Some(prev) => generation.get_mut(prev).next_sibling = Some(index),
                None => generation.get_mut(parent).first_child = Some(index),
            }
            generation.get_mut(parent).last_child = Some(index);
        }
        index
    }

    // ------------------------------------------------------------------
    // Interaction queries (previous-frame geometry)
    // ------------------------------------------------------------------

    /// True iff the key's previous-frame clipped rect contains the
    /// pointer. A box with no previous-frame counterpart is never hovered.
    pub fn hovered(&self, key: Key) -> bool {
        hovered_in(self.arena.previous(), key, self.input.pointer())
    }

    /// Hovered with no clickable descendant under the pointer
    pub fn hovered_idle(&self, key: Key) -> bool {
        hovered_idle_in(self.arena.previous(), key, self.input.pointer())
    }

    /// Click query; also where press-ownership is claimed. Call once per
    /// frame per interactive box.
    pub fn clicked(&mut self, key: Key) -> bool {
        let previous = self.arena.previous();
        let clickable = previous
            .lookup(key)
            .is_some_and(|index| previous.get(index).flags.contains(BoxFlags::CLICKABLE));
        if !clickable {
            return false;
        }
        let hovered = hovered_in(previous, key, self.input.pointer());
        let mut clicked = false;

        if hovered
            && self.input.pressed(InputId::MouseLeft)
            && self.interaction.mouse_owner.is_none()
        {
            self.interaction.mouse_owner = Some(key);
            self.interaction.drag_origin = Some(self.input.pointer());
        }
        if self.interaction.mouse_owner == Some(key)
            && self.input.released(InputId::MouseLeft)
            && hovered
        {
            clicked = true;
        }

        let selected = self.interaction.selection_visible && self.interaction.selected == Some(key);
        if selected
            && self.input.pressed(InputId::Enter)
            && self.interaction.keyboard_owner.is_none()
        {
            self.interaction.keyboard_owner = Some(key);
        }
        if self.interaction.keyboard_owner == Some(key)
            && self.input.released(InputId::Enter)
            && selected
        {
            clicked = true;
        }

        clicked
    }

    /// Ownership held by this key and the pointer still over it
    pub fn is_clicking_down_and_hovered(&self, key: Key) -> bool {
        self.interaction.mouse_owner == Some(key)
            && self.input.is_down(InputId::MouseLeft)
            && self.hovered(key)
    }

    /// Pointer travel since this key claimed the mouse press
    pub fn drag_delta(&self, key: Key) -> Option<Vec2> {
        if self.interaction.mouse_owner != Some(key) {
            return None;
        }
        self.interaction
            .drag_origin
            .map(|origin| self.input.pointer() - origin)
    }

    pub fn selected(&self, key: Key) -> bool {
        self.interaction.selected == Some(key)
    }

    pub fn selection_visible(&self) -> bool {
        self.interaction.selection_visible
    }

    /// Choose the cursor reported in this frame's output
    pub fn set_cursor(&mut self, cursor: CursorShape) {
        self.interaction.cursor = cursor;
    }

    /// Request pointer lock-and-hide for this frame
    pub fn set_lock_cursor(&mut self, lock: bool) {
        self.interaction.lock_cursor = lock;
    }

    /// The key's rect as laid out last frame, for widgets that position
    /// against it (drag handles, popups)
    pub fn previous_rect(&self, key: Key) -> Option<Rect> {
        let previous = self.arena.previous();
        previous.lookup(key).map(|index| previous.get(index).rect())
    }
}
