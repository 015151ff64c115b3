//! Line-indexed text documents
//!
//! A document is a byte buffer plus an ordered table of line-start byte
//! offsets, one entry per newline in the buffer. Line `0` starts at byte
//! `0`; line `n > 0` starts at `line_starts[n - 1]`, the byte just past the
//! terminating `\n` of line `n - 1`.
//!
//! All mutation funnels through [`Document::replace_range`], which keeps the
//! offset table consistent with the buffer. Marks with an out-of-range line
//! or column are caller bugs and panic; see the crate docs for the
//! multi-line insertion policy.

use tracing::warn;

use crate::mark::{Mark, Selection};
use crate::{Result, TextError};

/// A text document: byte buffer + line-start offset table
///
/// Invariant: `line_starts.len()` equals the number of `\n` bytes in `text`,
/// and `line_starts` is strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = scan_line_starts(&text);
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len() + 1
    }

    /// Byte offset of the first byte of `line`
    pub fn line_start_byte(&self, line: usize) -> usize {
        assert!(
            line < self.line_count(),
            "line {line} out of range ({} lines)",
            self.line_count()
        );
        if line == 0 {
            0
        } else {
            self.line_starts[line - 1]
        }
    }

    /// Byte offset just past the last character of `line`, excluding the
    /// terminating newline
    pub fn line_end_byte(&self, line: usize) -> usize {
        assert!(
            line < self.line_count(),
            "line {line} out of range ({} lines)",
            self.line_count()
        );
        if line < self.line_starts.len() {
            self.line_starts[line] - 1
        } else {
            self.text.len()
        }
    }

    /// The text of `line`, without its terminating newline
    pub fn line_text(&self, line: usize) -> &str {
        &self.text[self.line_start_byte(line)..self.line_end_byte(line)]
    }

    /// Codepoint count of `line`, the maximum valid mark column
    pub fn line_codepoints(&self, line: usize) -> usize {
        self.line_text(line).chars().count()
    }

    /// Resolve a mark to its byte offset in the buffer
    ///
    /// Walks the line's codepoints counting up to the requested column.
    /// Panics if the column exceeds the line's codepoint count.
    pub fn byte_offset(&self, mark: Mark) -> usize {
        let start = self.line_start_byte(mark.line);
        let line = &self.text[start..self.line_end_byte(mark.line)];
        let mut offset = start;
        let mut column = 0;
        for c in line.chars() {
            if column == mark.column {
                return offset;
            }
            offset += c.len_utf8();
            column += 1;
        }
        assert!(
            column == mark.column,
            "mark column {} out of range for line {} ({} codepoints)",
            mark.column,
            mark.line,
            column
        );
        offset
    }

    /// The mark addressing byte offset `byte` (which must be a char boundary)
    pub fn mark_at_byte(&self, byte: usize) -> Mark {
        let line = self.line_starts.partition_point(|&start| start <= byte);
        let start = self.line_start_byte(line);
        let column = self.text[start..byte].chars().count();
        Mark::new(line, column)
    }

    /// Mark at the very end of the document
    pub fn end_mark(&self) -> Mark {
        let line = self.line_count() - 1;
        Mark::new(line, self.line_codepoints(line))
    }

    /// Replace the byte range `[from, to)` with `text`, returning the mark
    /// just past the insertion (the new caret position).
    ///
    /// The deleted range may span lines; spanned line-start entries are
    /// dropped and later entries shifted. The inserted text must be a single
    /// line: an insertion containing `\n` is rejected with
    /// [`TextError::MultiLineInsert`] rather than silently flattened.
    pub fn replace_range(&mut self, from: Mark, to: Mark, text: &str) -> Result<Mark> {
        assert!(from <= to, "replace_range marks out of order: {from:?} > {to:?}");
        if text.contains('\n') {
            warn!("rejecting multi-line insertion ({} bytes)", text.len());
            return Err(TextError::MultiLineInsert);
        }

        let byte_from = self.byte_offset(from);
        let byte_to = self.byte_offset(to);
        let removed = byte_to - byte_from;
        let inserted = text.len();

        // Entries record the byte just past a newline, so newlines deleted
        // in [byte_from, byte_to) own the entries in (byte_from, byte_to].
        self.line_starts
            .retain(|&start| start <= byte_from || start > byte_to);
        for start in &mut self.line_starts {
            if *start > byte_to {
                *start = *start - removed + inserted;
            }
        }

        self.text.replace_range(byte_from..byte_to, text);

        Ok(Mark::new(from.line, from.column + text.chars().count()))
    }

    /// Replace the current selection, collapsing it onto the new caret
    pub fn replace_selection(&mut self, sel: &mut Selection, text: &str) -> Result<()> {
        sel.fix_order();
        let caret = self.replace_range(sel.range[0], sel.range[1], text)?;
        sel.collapse_to(caret);
        Ok(())
    }

    /// The text covered by the selection, newlines included
    pub fn selected_text(&self, sel: &Selection) -> &str {
        let mut sel = *sel;
        sel.fix_order();
        &self.text[self.byte_offset(sel.range[0])..self.byte_offset(sel.range[1])]
    }

    // ------------------------------------------------------------------
    // Caret editing operations
    // ------------------------------------------------------------------

    /// Delete the selection, or the codepoint before a collapsed caret.
    /// Joins lines when the caret sits at a line start.
    pub fn delete_backward(&mut self, sel: &mut Selection) {
        sel.fix_order();
        if !sel.is_empty() {
            // Deleting never inserts, so the single-line policy cannot trip.
            let caret = self
                .replace_range(sel.range[0], sel.range[1], "")
                .expect("deletion is always single-line");
            sel.collapse_to(caret);
            return;
        }
        let caret = sel.caret_mark();
        let from = if caret.column > 0 {
            Mark::new(caret.line, caret.column - 1)
        } else if caret.line > 0 {
            Mark::new(caret.line - 1, self.line_codepoints(caret.line - 1))
        } else {
            return;
        };
        let caret = self
            .replace_range(from, caret, "")
            .expect("deletion is always single-line");
        sel.collapse_to(caret);
    }

    /// Delete the selection, or the codepoint after a collapsed caret
    pub fn delete_forward(&mut self, sel: &mut Selection) {
        sel.fix_order();
        if !sel.is_empty() {
            let caret = self
                .replace_range(sel.range[0], sel.range[1], "")
                .expect("deletion is always single-line");
            sel.collapse_to(caret);
            return;
        }
        let caret = sel.caret_mark();
        let to = if caret.column < self.line_codepoints(caret.line) {
            Mark::new(caret.line, caret.column + 1)
        } else if caret.line + 1 < self.line_count() {
            Mark::new(caret.line + 1, 0)
        } else {
            return;
        };
        let caret = self
            .replace_range(caret, to, "")
            .expect("deletion is always single-line");
        sel.collapse_to(caret);
    }

    /// Move the caret one codepoint left, wrapping to the previous line end.
    /// Without `select`, a non-empty selection collapses to its start.
    pub fn move_left(&self, sel: &mut Selection, select: bool) {
        sel.fix_order();
        if !select && !sel.is_empty() {
            sel.collapse_to(sel.range[0]);
            return;
        }
        let caret = sel.caret_mark();
        let moved = if caret.column > 0 {
            Mark::new(caret.line, caret.column - 1)
        } else if caret.line > 0 {
            Mark::new(caret.line - 1, self.line_codepoints(caret.line - 1))
        } else {
            caret
        };
        self.shift_caret(sel, moved, select);
    }

    /// Move the caret one codepoint right, wrapping to the next line start
    pub fn move_right(&self, sel: &mut Selection, select: bool) {
        sel.fix_order();
        if !select && !sel.is_empty() {
            sel.collapse_to(sel.range[1]);
            return;
        }
        let caret = sel.caret_mark();
        let moved = if caret.column < self.line_codepoints(caret.line) {
            Mark::new(caret.line, caret.column + 1)
        } else if caret.line + 1 < self.line_count() {
            Mark::new(caret.line + 1, 0)
        } else {
            caret
        };
        self.shift_caret(sel, moved, select);
    }

    /// Move the caret to column 0 of its line
    pub fn move_line_start(&self, sel: &mut Selection, select: bool) {
        let caret = sel.caret_mark();
        self.shift_caret(sel, Mark::new(caret.line, 0), select);
    }

    /// Move the caret past the last codepoint of its line
    pub fn move_line_end(&self, sel: &mut Selection, select: bool) {
        let caret = sel.caret_mark();
        let end = Mark::new(caret.line, self.line_codepoints(caret.line));
        self.shift_caret(sel, end, select);
    }

    /// Select the whole document, caret at the end
    pub fn select_all(&self, sel: &mut Selection) {
        *sel = Selection::new(Mark::ZERO, self.end_mark());
    }

    pub(crate) fn shift_caret(&self, sel: &mut Selection, mark: Mark, select: bool) {
        if select {
            sel.set_caret_mark(mark);
        } else {
            sel.collapse_to(mark);
        }
    }
}

fn scan_line_starts(text: &str) -> Vec<usize> {
    text.bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(|(i, _)| i + 1)
        .collect()
}
