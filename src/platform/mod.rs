//! Platform abstraction layer
//!
//! Handles the boundary to whatever owns the window and keyboard:
//! - Raw input events, polled once per frame
//! - Real frame timing
//! - Translation of raw events into game commands (`input`)
//!
//! Implementations own their platform handles and release them on drop, so
//! every exit path out of the main loop gives them back.

pub mod input;
pub mod scripted;

use std::time::Duration;

pub use input::InputAdapter;
pub use scripted::ScriptedPlatform;

use crate::renderer::FrameSnapshot;

/// Keys the game cares about; anything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Up,
    Backspace,
    /// Platform scan code of an unmapped key
    Other(u32),
}

/// Raw platform input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    KeyDown(Key),
    KeyUp(Key),
    WindowClose,
}

/// A source of input events and frame timing
pub trait Platform {
    /// Drain the events received since the previous call
    fn poll_events(&mut self) -> Vec<RawEvent>;

    /// Real time elapsed since the previous frame
    fn frame_delta(&mut self) -> Duration;

    /// Called with each frame after it has been drawn
    fn observe(&mut self, _frame: &FrameSnapshot) {}
}
