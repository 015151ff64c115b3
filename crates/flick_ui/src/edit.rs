//! Applying frame input to a text document
//!
//! Text widgets own their `Document` and `Selection`; the engine side of
//! editing is this binding, which drains the frame's text queue and
//! navigation keys into document operations. Modifiers follow the usual
//! conventions: Shift extends the selection, Control switches caret motion
//! to word boundaries and routes clipboard shortcuts.
//!
//! Multi-line paste is rejected by the document layer; the binding drops
//! the paste rather than flattening it.

use flick_text::{Document, Selection};
use tracing::warn;

use crate::context::Context;
use crate::input::InputId;

impl Context {
    /// Apply this frame's queued text and editing keys to a document.
    /// Call once per frame for the focused text widget.
    pub fn edit_document(&mut self, document: &mut Document, selection: &mut Selection) {
        let select = self.input().is_down(InputId::Shift);
        let word = self.input().is_down(InputId::Control);

        if self.input().pressed_or_repeat(InputId::ArrowLeft) {
            if word {
                document.move_word_left(selection, select);
            } else {
                document.move_left(selection, select);
            }
        }
        if self.input().pressed_or_repeat(InputId::ArrowRight) {
            if word {
                document.move_word_right(selection, select);
            } else {
                document.move_right(selection, select);
            }
        }
        if self.input().pressed_or_repeat(InputId::Home) {
            document.move_line_start(selection, select);
        }
        if self.input().pressed_or_repeat(InputId::End) {
            document.move_line_end(selection, select);
        }
        if self.input().pressed_or_repeat(InputId::Backspace) {
            document.delete_backward(selection);
        }
        if self.input().pressed_or_repeat(InputId::Delete) {
            document.delete_forward(selection);
        }

        // Snapshot the queue so clipboard access can borrow the context
        let queued: Vec<char> = self.input().text_queue().to_vec();
        for c in queued {
            if word {
                match c.to_ascii_lowercase() {
                    'a' => document.select_all(selection),
                    'c' => {
                        let text = document.selected_text(selection).to_string();
                        self.clipboard_set(&text);
                    }
                    'x' => {
                        let text = document.selected_text(selection).to_string();
                        self.clipboard_set(&text);
                        document.delete_backward(selection);
                    }
                    'v' => {
                        if let Some(text) = self.clipboard_get() {
                            if document.replace_selection(selection, &text).is_err() {
                                warn!("dropping multi-line paste");
                            }
                        }
                    }
                    _ => {}
                }
            } else if !c.is_control() {
                let mut buffer = [0u8; 4];
                let inserted = document
                    .replace_selection(selection, c.encode_utf8(&mut buffer))
                    .is_ok();
                debug_assert!(inserted, "single codepoints are single-line");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Clipboard, InputEventKind};
    use flick_core::Size;
    use flick_paint::HeadlessBackend;
    use flick_text::Mark;

    #[derive(Default)]
    struct FakeClipboard(std::rc::Rc<std::cell::RefCell<String>>);

    impl Clipboard for FakeClipboard {
        fn get(&mut self) -> String {
            self.0.borrow().clone()
        }
        fn set(&mut self, text: &str) {
            *self.0.borrow_mut() = text.to_string();
        }
    }

    fn edit_frame(
        ctx: &mut Context,
        backend: &mut HeadlessBackend,
        document: &mut Document,
        selection: &mut Selection,
    ) {
        ctx.begin_frame(Size::new(100.0, 100.0), 1.0 / 60.0);
        ctx.edit_document(document, selection);
        ctx.end_frame(backend);
    }

    #[test]
    fn test_typed_text_inserts_at_caret() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let mut document = Document::new();
        let mut selection = Selection::collapsed(Mark::ZERO);

        for c in "hi é".chars() {
            ctx.input_mut().push_text(c);
        }
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(document.text(), "hi é");
        assert_eq!(selection.caret_mark(), Mark::new(0, 4));
    }

    #[test]
    fn test_backspace_and_arrows() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let mut document = Document::from_text("abc");
        let mut selection = Selection::collapsed(Mark::new(0, 3));

        ctx.input_mut()
            .push_event(InputId::Backspace, InputEventKind::Press);
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(document.text(), "ab");
        ctx.input_mut()
            .push_event(InputId::Backspace, InputEventKind::Release);

        ctx.input_mut()
            .push_event(InputId::ArrowLeft, InputEventKind::Press);
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(selection.caret_mark(), Mark::new(0, 1));
    }

    #[test]
    fn test_word_motion_with_control() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let mut document = Document::from_text("one two");
        let mut selection = Selection::collapsed(Mark::ZERO);

        ctx.input_mut()
            .push_event(InputId::Control, InputEventKind::Press);
        ctx.input_mut()
            .push_event(InputId::ArrowRight, InputEventKind::Press);
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(selection.caret_mark(), Mark::new(0, 3));
    }

    #[test]
    fn test_clipboard_copy_paste_round_trip() {
        let mut backend = HeadlessBackend::new();
        let shared = std::rc::Rc::new(std::cell::RefCell::new(String::new()));
        let mut ctx = Context::new().with_clipboard(FakeClipboard(shared.clone()));
        let mut document = Document::from_text("hello");
        let mut selection = Selection::default();

        // Ctrl+A then Ctrl+C
        ctx.input_mut()
            .push_event(InputId::Control, InputEventKind::Press);
        ctx.input_mut().push_text('a');
        ctx.input_mut().push_text('c');
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(shared.borrow().as_str(), "hello");

        // Ctrl+V over the still-full selection replaces it with itself
        ctx.input_mut().push_text('v');
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(document.text(), "hello");
    }

    #[test]
    fn test_multiline_paste_is_dropped() {
        let mut backend = HeadlessBackend::new();
        let shared = std::rc::Rc::new(std::cell::RefCell::new("two\nlines".to_string()));
        let mut ctx = Context::new().with_clipboard(FakeClipboard(shared));
        let mut document = Document::from_text("keep");
        let mut selection = Selection::collapsed(Mark::ZERO);

        ctx.input_mut()
            .push_event(InputId::Control, InputEventKind::Press);
        ctx.input_mut().push_text('v');
        edit_frame(&mut ctx, &mut backend, &mut document, &mut selection);
        assert_eq!(document.text(), "keep");
    }
}
