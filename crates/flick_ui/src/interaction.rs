//! Hover, click-ownership, and keyboard-selection state
//!
//! All geometric queries run against the **previous** frame's tree: a box
//! created this frame has no geometry yet, so hover and click evaluate
//! last frame's clipped rects through `prev_frame` lookups. A box that did
//! not exist last frame is never hovered, by construction.
//!
//! Click ownership is global: one key may own the mouse press and one key
//! the keyboard press at a time. Ownership is claimed on press over a
//! clickable box and re-confirmed each frame only while the input stays
//! down; a click reports on release while still hovered (or still
//! selected, for keyboard clicks).

use flick_core::Point;

use crate::flags::BoxFlags;
use crate::input::{InputId, InputState};
use crate::key::Key;
use crate::tree::{BoxIndex, Generation};

/// Cursor chosen by widgets this frame, reported in the frame output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Arrow,
    Hand,
    IBeam,
    ResizeHorizontal,
    ResizeVertical,
    Crosshair,
}

/// Interaction state carried across frames
#[derive(Default)]
pub struct InteractionState {
    pub(crate) mouse_owner: Option<Key>,
    pub(crate) keyboard_owner: Option<Key>,
    pub(crate) selected: Option<Key>,
    pub(crate) selection_visible: bool,
    pub(crate) drag_origin: Option<Point>,
    pub(crate) cursor: CursorShape,
    pub(crate) lock_cursor: bool,
}

impl InteractionState {
    /// Per-frame update: confirm or drop ownership, run keyboard
    /// navigation over the previous frame's tree
    pub(crate) fn begin_frame(&mut self, input: &InputState, previous: &Generation) {
        self.cursor = CursorShape::default();
        self.lock_cursor = false;

        // Ownership holds while the claiming input is down, plus the frame
        // carrying the release event so the click can still be observed
        if !input.is_down(InputId::MouseLeft) && !input.released(InputId::MouseLeft) {
            self.mouse_owner = None;
            self.drag_origin = None;
        }
        if !input.is_down(InputId::Enter) && !input.released(InputId::Enter) {
            self.keyboard_owner = None;
        }

        if input.pressed(InputId::MouseLeft) || input.pressed(InputId::Escape) {
            self.selection_visible = false;
        }

        let shift = input.is_down(InputId::Shift);
        let forward = input.pressed_or_repeat(InputId::ArrowDown)
            || (input.pressed_or_repeat(InputId::Tab) && !shift);
        let backward = input.pressed_or_repeat(InputId::ArrowUp)
            || (input.pressed_or_repeat(InputId::Tab) && shift);
        if forward || backward {
            self.selection_visible = true;
            let from = self.selected.and_then(|key| previous.lookup(key));
            let next = if forward {
                next_selectable(previous, from)
            } else {
                prev_selectable(previous, from)
            };
            if let Some(index) = next {
                self.selected = Some(previous.get(index).key);
            }
        }
    }
}

/// True when the key's previous-frame clipped rect contains the pointer
/// and that box accepts hover
pub(crate) fn hovered_in(generation: &Generation, key: Key, pointer: Point) -> bool {
    match generation.lookup(key) {
        Some(index) => {
            let node = generation.get(index);
            !node.flags.contains(BoxFlags::NO_HOVER) && node.clipped.contains(pointer)
        }
        None => false,
    }
}

/// Hovered, and no clickable descendant also contains the pointer: only
/// the innermost interactive widget claims idle-hover semantics
pub(crate) fn hovered_idle_in(generation: &Generation, key: Key, pointer: Point) -> bool {
    match generation.lookup(key) {
        Some(index) => {
            hovered_in(generation, key, pointer)
                && !subtree_has_clickable_at(generation, index, pointer)
        }
        None => false,
    }
}

fn subtree_has_clickable_at(generation: &Generation, index: BoxIndex, pointer: Point) -> bool {
    for child in generation.children(index) {
        let node = generation.get(child);
        if node.flags.contains(BoxFlags::CLICKABLE) && node.clipped.contains(pointer) {
            return true;
        }
        if subtree_has_clickable_at(generation, child, pointer) {
            return true;
        }
    }
    false
}

/// Next SELECTABLE box in pre-order after `from`, wrapping past the end
pub(crate) fn next_selectable(
    generation: &Generation,
    from: Option<BoxIndex>,
) -> Option<BoxIndex> {
    if generation.is_empty() {
        return None;
    }
    let root: BoxIndex = 0;
    let mut cursor = match from {
        Some(index) => generation.next_pre_order(index),
        None => Some(root),
    };
    for _ in 0..=generation.len() {
        let index = cursor.unwrap_or(root);
        if generation.get(index).flags.contains(BoxFlags::SELECTABLE) {
            return Some(index);
        }
        cursor = generation.next_pre_order(index);
    }
    None
}

/// Previous SELECTABLE box in pre-order before `from`, wrapping past the
/// start
pub(crate) fn prev_selectable(
    generation: &Generation,
    from: Option<BoxIndex>,
) -> Option<BoxIndex> {
    if generation.is_empty() {
        return None;
    }
    let root: BoxIndex = 0;
    let last = generation.last_pre_order(root);
    let mut cursor = match from {
        Some(index) => generation.prev_pre_order(index),
        None => Some(last),
    };
    for _ in 0..=generation.len() {
        let index = cursor.unwrap_or(last);
        if generation.get(index).flags.contains(BoxFlags::SELECTABLE) {
            return Some(index);
        }
        cursor = generation.prev_pre_order(index);
    }
    None
}
