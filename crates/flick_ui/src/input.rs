//! Frame input state
//!
//! Every logical input carries a persistent is-down boolean plus
//! this-frame event bits (press, release, press-or-repeat). The host feeds
//! events between frames; the engine consumes them during the next
//! `begin_frame … end_frame` and clears the per-frame bits at frame end.

use flick_core::{Point, Vec2};
use bitflags::bitflags;
use smallvec::SmallVec;
use tracing::warn;

/// Upper bound on queued text codepoints per frame
pub const TEXT_QUEUE_LIMIT: usize = 64;

/// Logical inputs the engine reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum InputId {
    MouseLeft,
    MouseRight,
    MouseMiddle,
    Shift,
    Control,
    Alt,
    Enter,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    Home,
    End,
}

impl InputId {
    pub const COUNT: usize = 17;
}

bitflags! {
    /// This-frame event bits for one input
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InputEvents: u8 {
        const PRESS_OR_REPEAT = 1 << 0;
        const PRESS = 1 << 1;
        const RELEASE = 1 << 2;
    }
}

/// One event fed by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEventKind {
    Press,
    Release,
    Repeat,
}

/// Host-supplied clipboard access
pub trait Clipboard {
    fn get(&mut self) -> String;
    fn set(&mut self, text: &str);
}

/// All input state for the current frame
pub struct InputState {
    down: [bool; InputId::COUNT],
    events: [InputEvents; InputId::COUNT],
    pointer: Point,
    raw_delta: Vec2,
    wheel_delta: f32,
    text_queue: SmallVec<[char; TEXT_QUEUE_LIMIT]>,
    dt: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            down: [false; InputId::COUNT],
            events: [InputEvents::empty(); InputId::COUNT],
            pointer: Point::ZERO,
            raw_delta: Vec2::ZERO,
            wheel_delta: 0.0,
            text_queue: SmallVec::new(),
            dt: 0.0,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Host feed
    // ------------------------------------------------------------------

    pub fn push_event(&mut self, id: InputId, kind: InputEventKind) {
        let slot = &mut self.events[id as usize];
        match kind {
            InputEventKind::Press => {
                self.down[id as usize] = true;
                *slot |= InputEvents::PRESS | InputEvents::PRESS_OR_REPEAT;
            }
            InputEventKind::Repeat => {
                *slot |= InputEvents::PRESS_OR_REPEAT;
            }
            InputEventKind::Release => {
                self.down[id as usize] = false;
                *slot |= InputEvents::RELEASE;
            }
        }
    }

    pub fn set_pointer(&mut self, position: Point) {
        self.pointer = position;
    }

    /// Raw relative motion, independent of the absolute pointer position
    pub fn add_raw_delta(&mut self, delta: Vec2) {
        self.raw_delta = self.raw_delta + delta;
    }

    pub fn add_wheel_delta(&mut self, delta: f32) {
        self.wheel_delta += delta;
    }

    /// Queue a text-input codepoint; overflow beyond the bound drops
    pub fn push_text(&mut self, codepoint: char) {
        if self.text_queue.len() >= TEXT_QUEUE_LIMIT {
            warn!("text input queue full, dropping codepoint");
            return;
        }
        self.text_queue.push(codepoint);
    }

    // ------------------------------------------------------------------
    // Engine queries
    // ------------------------------------------------------------------

    pub fn is_down(&self, id: InputId) -> bool {
        self.down[id as usize]
    }

    pub fn pressed(&self, id: InputId) -> bool {
        self.events[id as usize].contains(InputEvents::PRESS)
    }

    pub fn released(&self, id: InputId) -> bool {
        self.events[id as usize].contains(InputEvents::RELEASE)
    }

    pub fn pressed_or_repeat(&self, id: InputId) -> bool {
        self.events[id as usize].contains(InputEvents::PRESS_OR_REPEAT)
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn raw_delta(&self) -> Vec2 {
        self.raw_delta
    }

    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn text_queue(&self) -> &[char] {
        &self.text_queue
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    // ------------------------------------------------------------------
    // Frame lifecycle
    // ------------------------------------------------------------------

    pub(crate) fn set_dt(&mut self, dt: f32) {
        self.dt = dt;
    }

    /// Clear the per-frame bits; persistent is-down state survives
    pub(crate) fn end_frame(&mut self) {
        self.events = [InputEvents::empty(); InputId::COUNT];
        self.raw_delta = Vec2::ZERO;
        self.wheel_delta = 0.0;
        self.text_queue.clear();
    }
}
