//! Rendering seam
//!
//! The simulation never draws. Each frame it hands the renderer an immutable
//! [`FrameSnapshot`]; how pixels (or characters) get produced is up to the
//! implementation.

pub mod snapshot;
pub mod text;

pub use snapshot::{FrameSnapshot, ObstacleView};
pub use text::TextRenderer;

/// Anything that can present a frame
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot);
}
