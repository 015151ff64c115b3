//! Per-frame box tree and the double-buffered frame arena
//!
//! The tree is rebuilt from scratch every frame. Nodes live in a
//! generation-indexed arena: `current` holds the frame being built,
//! `previous` holds last frame's finished tree with its computed geometry.
//! At frame start the generations swap and the new current resets in bulk;
//! nothing is freed per box.
//!
//! A node's `prev_frame` is a plain index into the previous generation,
//! resolved at creation time from the previous frame's key map. It is
//! read-only lookup state, valid for exactly this frame, and is what lets
//! hover and click evaluate against last frame's geometry while this
//! frame's layout does not exist yet.

use std::any::Any;
use std::rc::Rc;

use flick_core::{Axis, Point, Rect, Size, Vec2};
use flick_paint::DrawList;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::flags::BoxFlags;
use crate::key::Key;
use crate::style::{SharedStyle, SizeSpec};

/// Index of a box within one generation of the arena
pub type BoxIndex = u32;

/// How a box paints itself during the draw walk
#[derive(Clone, Default)]
pub enum BoxPaint {
    /// Background rect from style, then text if present
    #[default]
    Standard,
    /// Caller-supplied painter, replacing the standard emission
    Custom(Rc<dyn Fn(&BoxNode, &mut DrawList)>),
}

/// One node of the per-frame UI tree
#[derive(Clone)]
pub struct BoxNode {
    pub key: Key,
    pub parent: Option<BoxIndex>,
    pub first_child: Option<BoxIndex>,
    pub last_child: Option<BoxIndex>,
    pub prev_sibling: Option<BoxIndex>,
    pub next_sibling: Option<BoxIndex>,
    /// Same-key box in the previous generation, if any
    pub prev_frame: Option<BoxIndex>,
    /// Size spec per axis, indexed by `Axis as usize`
    pub spec: [SizeSpec; 2],
    pub flags: BoxFlags,
    /// Layout axis for this box's children
    pub axis: Axis,
    pub style: SharedStyle,
    pub text: Option<String>,
    /// Explicit position relative to the parent, used with NO_AUTO_OFFSET
    pub float_offset: Vec2,
    pub paint: BoxPaint,
    /// Widget-attached frame-local data
    pub data: SmallVec<[Rc<dyn Any>; 2]>,

    // Computed by the layout solver
    pub unexpanded: Size,
    pub size: Size,
    pub position: Point,
    pub clipped: Rect,
}

impl BoxNode {
    pub fn spec_along(&self, axis: Axis) -> SizeSpec {
        self.spec[axis as usize]
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// First attached datum of the given type
    pub fn data_of<T: 'static>(&self) -> Option<&T> {
        self.data.iter().find_map(|d| d.downcast_ref::<T>())
    }
}

/// One generation of the frame arena: nodes plus the key→slot map
#[derive(Default)]
pub struct Generation {
    nodes: Vec<BoxNode>,
    by_key: FxHashMap<Key, BoxIndex>,
}

impl Generation {
    /// Bulk-discard the generation's tree, keeping allocations
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.by_key.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: BoxIndex) -> &BoxNode {
        &self.nodes[index as usize]
    }

    pub fn get_mut(&mut self, index: BoxIndex) -> &mut BoxNode {
        &mut self.nodes[index as usize]
    }

    /// Slot of the box with this key, if one was created this generation
    pub fn lookup(&self, key: Key) -> Option<BoxIndex> {
        self.by_key.get(&key).copied()
    }

    /// Insert a node, panicking on a duplicate key: one box per key per
    /// frame is a hard contract, not a recoverable condition
    pub fn insert(&mut self, node: BoxNode) -> BoxIndex {
        let index = self.nodes.len() as BoxIndex;
        let replaced = self.by_key.insert(node.key, index);
        assert!(
            replaced.is_none(),
            "duplicate box key {:?} within one frame",
            node.key
        );
        self.nodes.push(node);
        index
    }

    /// Child slots of `index` in call order
    pub fn children(&self, index: BoxIndex) -> ChildIter<'_> {
        ChildIter {
            generation: self,
            next: self.get(index).first_child,
        }
    }

    /// Pre-order successor: first child, else next sibling, else the next
    /// sibling of the closest ancestor that has one
    pub fn next_pre_order(&self, index: BoxIndex) -> Option<BoxIndex> {
        let node = self.get(index);
        if let Some(child) = node.first_child {
            return Some(child);
        }
        let mut cursor = index;
        loop {
            let node = self.get(cursor);
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            cursor = node.parent?;
        }
    }

    /// Pre-order predecessor: previous sibling's deepest last descendant,
    /// else the parent
    pub fn prev_pre_order(&self, index: BoxIndex) -> Option<BoxIndex> {
        let node = self.get(index);
        match node.prev_sibling {
            Some(sibling) => {
                let mut cursor = sibling;
                while let Some(last) = self.get(cursor).last_child {
                    cursor = last;
                }
                Some(cursor)
            }
            None => node.parent,
        }
    }

    /// Last box in pre-order: the deepest last descendant of the root
    pub fn last_pre_order(&self, root: BoxIndex) -> BoxIndex {
        let mut cursor = root;
        while let Some(last) = self.get(cursor).last_child {
            cursor = last;
        }
        cursor
    }
}

/// Iterator over a box's children in call order
pub struct ChildIter<'a> {
    generation: &'a Generation,
    next: Option<BoxIndex>,
}

impl Iterator for ChildIter<'_> {
    type Item = BoxIndex;

    fn next(&mut self) -> Option<BoxIndex> {
        let current = self.next?;
        self.next = self.generation.get(current).next_sibling;
        Some(current)
    }
}

/// The double-buffered arena holding both frame generations
#[derive(Default)]
pub struct FrameArena {
    current: Generation,
    previous: Generation,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap generations and reset the new current. Last frame's tree and
    /// geometry stay readable through `previous` for exactly this frame.
    pub fn begin_frame(&mut self) {
        std::mem::swap(&mut self.current, &mut self.previous);
        self.current.reset();
    }

    pub fn current(&self) -> &Generation {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Generation {
        &mut self.current
    }

    pub fn previous(&self) -> &Generation {
        &self.previous
    }
}
