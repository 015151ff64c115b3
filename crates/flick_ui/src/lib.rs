//! Flick UI engine
//!
//! An immediate-mode UI core: the host rebuilds the whole box tree every
//! frame from plain calls, and the engine diffs it against the previous
//! frame to derive hover/click/selection state, solves a two-axis fit/flex
//! layout, and emits a batched draw-call list through `flick_paint`.
//!
//! # Example
//!
//! ```ignore
//! use flick_core::{Color, Size};
//! use flick_ui::{BoxSpec, Context, Key};
//!
//! let mut ctx = Context::new();
//! loop {
//!     // feed ctx.input_mut() from the platform event loop, then:
//!     ctx.begin_frame(Size::new(800.0, 600.0), dt);
//!     let button = Key::from_label("save");
//!     ctx.add_box(
//!         BoxSpec::new(button)
//!             .fixed(120.0, 32.0)
//!             .background(Color::from_hex(0x3366ff))
//!             .clickable()
//!             .selectable()
//!             .text("Save"),
//!     );
//!     if ctx.clicked(button) {
//!         // react to the click
//!     }
//!     let output = ctx.end_frame(&mut backend);
//!     // submit output.draw_calls against the backend buffers
//! }
//! ```
//!
//! Everything interaction-related evaluates against the **previous**
//! frame's geometry, which is what makes the single-pass rebuild possible:
//! a box knows last frame's rect before this frame's layout runs.

pub mod builder;
pub mod context;
mod edit;
pub mod flags;
pub mod input;
pub mod interaction;
pub mod key;
mod layout;
mod render;
pub mod retained;
pub mod style;
pub mod tree;

pub use builder::{boxed, BoxSpec};
pub use context::{Context, FrameOutput};
pub use flags::BoxFlags;
pub use input::{Clipboard, InputEventKind, InputEvents, InputId, InputState, TEXT_QUEUE_LIMIT};
pub use interaction::CursorShape;
pub use key::Key;
pub use retained::RetainedStore;
pub use style::{Padding, SharedStyle, SizeSpec, Style};
pub use tree::{BoxIndex, BoxNode, BoxPaint, FrameArena, Generation};
