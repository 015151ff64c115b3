//! Word-boundary navigation
//!
//! Codepoints fall into three classes: whitespace, word (alphanumeric or
//! underscore), and other. A word motion scans codepoints and stops on
//! exactly three transitions:
//!
//! - after consuming at least one word codepoint, on leaving the word run;
//! - after consuming whitespace, on reaching the first non-whitespace;
//! - immediately after a newline when it is the first codepoint scanned.
//!
//! These rules are deliberate edge-case choices, not a generic heuristic:
//! punctuation runs are skipped into a following word, and a newline is a
//! one-codepoint motion of its own. The backward scan mirrors the same
//! table over the reversed codepoint sequence.

use crate::document::Document;
use crate::mark::{Mark, Selection};

/// Classification used by word motion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    /// Alphanumeric or underscore
    Word,
    Other,
}

impl CharClass {
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            CharClass::Whitespace
        } else if c.is_alphanumeric() || c == '_' {
            CharClass::Word
        } else {
            CharClass::Other
        }
    }
}

/// The next word boundary at or after `mark`
pub fn word_forward(doc: &Document, mark: Mark) -> Mark {
    let start = doc.byte_offset(mark);
    let text = doc.text();
    let mut offset = start;
    let mut first = true;
    let mut consumed_word = false;
    let mut consumed_ws = false;
    for c in text[start..].chars() {
        if first && c == '\n' {
            offset += 1;
            break;
        }
        first = false;
        let class = CharClass::of(c);
        if consumed_word && class != CharClass::Word {
            break;
        }
        if consumed_ws && class != CharClass::Whitespace {
            break;
        }
        match class {
            CharClass::Word => consumed_word = true,
            CharClass::Whitespace => consumed_ws = true,
            CharClass::Other => {}
        }
        offset += c.len_utf8();
    }
    doc.mark_at_byte(offset)
}

/// The previous word boundary strictly before `mark` (unless at the start)
pub fn word_backward(doc: &Document, mark: Mark) -> Mark {
    let start = doc.byte_offset(mark);
    let text = doc.text();
    let mut offset = start;
    let mut first = true;
    let mut consumed_word = false;
    let mut consumed_ws = false;
    for c in text[..start].chars().rev() {
        if first && c == '\n' {
            offset -= 1;
            break;
        }
        first = false;
        let class = CharClass::of(c);
        if consumed_word && class != CharClass::Word {
            break;
        }
        if consumed_ws && class != CharClass::Whitespace {
            break;
        }
        match class {
            CharClass::Word => consumed_word = true,
            CharClass::Whitespace => consumed_ws = true,
            CharClass::Other => {}
        }
        offset -= c.len_utf8();
    }
    doc.mark_at_byte(offset)
}

impl Document {
    /// Move the caret to the next word boundary
    pub fn move_word_right(&self, sel: &mut Selection, select: bool) {
        let mark = word_forward(self, sel.caret_mark());
        self.shift_caret(sel, mark, select);
    }

    /// Move the caret to the previous word boundary
    pub fn move_word_left(&self, sel: &mut Selection, select: bool) {
        let mark = word_backward(self, sel.caret_mark());
        self.shift_caret(sel, mark, select);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fwd(text: &str, mark: Mark) -> Mark {
        word_forward(&Document::from_text(text), mark)
    }

    fn back(text: &str, mark: Mark) -> Mark {
        word_backward(&Document::from_text(text), mark)
    }

    #[test]
    fn test_forward_stops_leaving_word_run() {
        assert_eq!(fwd("hello world", Mark::new(0, 0)), Mark::new(0, 5));
        assert_eq!(fwd("a.b", Mark::new(0, 0)), Mark::new(0, 1));
    }

    #[test]
    fn test_forward_stops_entering_nonspace_after_space() {
        assert_eq!(fwd("hello world", Mark::new(0, 5)), Mark::new(0, 6));
        assert_eq!(fwd("   x", Mark::new(0, 0)), Mark::new(0, 3));
    }

    #[test]
    fn test_forward_skips_punctuation_into_word() {
        // Other-class codepoints trigger no stop rule of their own
        assert_eq!(fwd("++foo bar", Mark::new(0, 0)), Mark::new(0, 5));
    }

    #[test]
    fn test_forward_underscore_is_word() {
        assert_eq!(fwd("a_b c", Mark::new(0, 0)), Mark::new(0, 3));
    }

    #[test]
    fn test_forward_leading_newline_stops_immediately() {
        assert_eq!(fwd("ab\ncd", Mark::new(0, 2)), Mark::new(1, 0));
    }

    #[test]
    fn test_forward_newline_ends_word_run() {
        assert_eq!(fwd("ab\ncd", Mark::new(0, 0)), Mark::new(0, 2));
    }

    #[test]
    fn test_forward_at_end_is_identity() {
        assert_eq!(fwd("ab", Mark::new(0, 2)), Mark::new(0, 2));
    }

    #[test]
    fn test_backward_stops_at_word_start() {
        assert_eq!(back("hello world", Mark::new(0, 11)), Mark::new(0, 6));
        assert_eq!(back("hello", Mark::new(0, 3)), Mark::new(0, 0));
    }

    #[test]
    fn test_backward_over_space_stops_at_word_end() {
        assert_eq!(back("foo bar", Mark::new(0, 4)), Mark::new(0, 3));
    }

    #[test]
    fn test_backward_leading_newline_stops_immediately() {
        assert_eq!(back("ab\ncd", Mark::new(1, 0)), Mark::new(0, 2));
    }

    #[test]
    fn test_backward_at_start_is_identity() {
        assert_eq!(back("ab", Mark::new(0, 0)), Mark::new(0, 0));
    }

    #[test]
    fn test_motion_updates_selection() {
        let doc = Document::from_text("one two");
        let mut sel = Selection::collapsed(Mark::ZERO);
        doc.move_word_right(&mut sel, true);
        assert_eq!(sel.range, [Mark::new(0, 0), Mark::new(0, 3)]);
        doc.move_word_right(&mut sel, false);
        assert!(sel.is_empty());
        assert_eq!(sel.caret_mark(), Mark::new(0, 4));
    }
}
