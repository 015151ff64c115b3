//! Per-box behavior flags

use bitflags::bitflags;

bitflags! {
    /// Flags controlling a box's interaction and layout behavior
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BoxFlags: u32 {
        /// Participates in click ownership
        const CLICKABLE = 1 << 0;
        /// Reachable by keyboard navigation
        const SELECTABLE = 1 << 1;
        /// Never reported hovered; inherited by all descendants
        const NO_HOVER = 1 << 2;
        /// Keeps its unexpanded size when the parent over-constrains
        const NO_SHRINK = 1 << 3;
        /// Children are positioned from the trailing edge
        const LAYOUT_FROM_END = 1 << 4;
        /// Ignores the layout cursor and uses its float offset instead
        const NO_AUTO_OFFSET = 1 << 5;
        /// Escapes the parent's scissor rect
        const NO_CLIP = 1 << 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_compose() {
        let flags = BoxFlags::CLICKABLE | BoxFlags::SELECTABLE;
        assert!(flags.contains(BoxFlags::CLICKABLE));
        assert!(!flags.contains(BoxFlags::NO_HOVER));
    }
}
