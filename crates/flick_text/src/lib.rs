//! Text editing engine for Flick
//!
//! This crate provides:
//! - Line-indexed documents (byte buffer + line-start offset table)
//! - Mark/Selection positions in (line, codepoint-column) space
//! - Replace-range mutation that keeps the offset table consistent
//! - Word-boundary navigation with explicit class-transition rules
//!
//! Documents are owned by the host application and outlive UI frames; the
//! engine only ever borrows them for the duration of an edit.

pub mod document;
pub mod mark;
pub mod word;

pub use document::Document;
pub use mark::{CaretEnd, Mark, Selection};
pub use word::{word_backward, word_forward, CharClass};

use thiserror::Error;

/// Text editing errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextError {
    /// The line-indexed document cannot absorb an insertion that itself
    /// contains newlines; callers split the text and insert per line.
    #[error("multi-line insertion into a single-line replace range")]
    MultiLineInsert,
}

pub type Result<T> = std::result::Result<T, TextError>;
