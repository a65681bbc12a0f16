//! Dino Run - A side-scrolling obstacle-dodging runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, entities, spawning, collisions, game state)
//! - `platform`: Raw input events and their translation into game commands
//! - `renderer`: Read-only frame snapshots and the renderer seam
//! - `app`: Per-frame driver wiring the pieces together
//! - `settings`: Data-driven configuration with validation

pub mod app;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, FrameOutcome};
pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration defaults
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Largest real frame delta fed to the clock (spiral of death guard)
    pub const MAX_FRAME_DELTA: f64 = 0.25;
    /// Shortest configurable step (1 µs); anything finer rounds away in nanoseconds
    pub const MIN_SIM_DT: f64 = 1.0e-6;
    /// Most steps a single capped frame may release
    pub const MAX_SUBSTEPS: u32 = 1000;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Top of the ground strip (the original screen keeps 100px of ground)
    pub const GROUND_Y: f32 = 500.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Upward launch speed (units/s)
    pub const JUMP_SPEED: f32 = 840.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 2160.0;

    /// Score gained per simulation step while playing
    pub const SCORE_PER_STEP: u64 = 1;

    /// Spawner defaults
    pub const BASE_SPAWN_INTERVAL: f64 = 1.6;
    pub const SPAWN_JITTER: f64 = 0.25;
    /// Seconds of play for the difficulty factor to grow by 1.0
    pub const DIFFICULTY_RAMP_SECS: f64 = 30.0;
    pub const MAX_DIFFICULTY: f64 = 3.0;
    /// How far past the right edge obstacles appear
    pub const SPAWN_MARGIN: f32 = 50.0;
    pub const BASE_OBSTACLE_SPEED: f32 = 300.0;
    pub const MAX_OBSTACLE_SPEED: f32 = 700.0;
}
