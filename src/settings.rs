//! Game settings
//!
//! Loaded once at startup from an optional JSON file. Every field has a
//! default, so a settings file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::ObstacleKind;

/// Environment variable that overrides the run seed
pub const SEED_ENV_VAR: &str = "DINO_RUN_SEED";

/// Visible area obstacles scroll through
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldSettings {
    pub width: f32,
    pub height: f32,
    /// Y coordinate of the ground surface (y grows downward)
    pub ground_y: f32,
}

impl Default for PlayfieldSettings {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            ground_y: GROUND_Y,
        }
    }
}

/// Fixed timestep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Simulation step length in seconds
    pub step_secs: f64,
    /// Real frame deltas above this are clamped (seconds)
    pub max_frame_delta: f64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            step_secs: SIM_DT,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Fixed horizontal position of the runner's left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub jump_speed: f32,
    pub gravity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            jump_speed: JUMP_SPEED,
            gravity: GRAVITY,
        }
    }
}

/// Obstacle spawning and difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between spawns at difficulty 1.0
    pub base_interval: f64,
    /// Random interval spread as a fraction of the interval, in [0, 1)
    pub jitter: f64,
    /// Seconds of play for the difficulty factor to grow by 1.0
    pub ramp_secs: f64,
    /// Difficulty factor cap
    pub max_factor: f64,
    /// Distance past the right edge where obstacles appear
    pub margin: f32,
    /// Obstacle speed at difficulty 1.0 (units/s)
    pub base_speed: f32,
    /// Obstacle speed cap (units/s)
    pub max_speed: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            base_interval: BASE_SPAWN_INTERVAL,
            jitter: SPAWN_JITTER,
            ramp_secs: DIFFICULTY_RAMP_SECS,
            max_factor: MAX_DIFFICULTY,
            margin: SPAWN_MARGIN,
            base_speed: BASE_OBSTACLE_SPEED,
            max_speed: MAX_OBSTACLE_SPEED,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every randomized spawn attribute
    pub seed: u64,
    /// Score gained per simulation step while playing
    pub score_per_step: u64,
    /// Simulated seconds the headless demo runs before quitting
    pub demo_seconds: f64,
    pub playfield: PlayfieldSettings,
    pub clock: ClockSettings,
    pub player: PlayerSettings,
    pub spawn: SpawnSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x00D1_0000,
            score_per_step: SCORE_PER_STEP,
            demo_seconds: 30.0,
            playfield: PlayfieldSettings::default(),
            clock: ClockSettings::default(),
            player: PlayerSettings::default(),
            spawn: SpawnSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given.
    ///
    /// The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let settings: Settings =
                    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Apply a seed override (the value of [`SEED_ENV_VAR`], if set)
    pub fn with_seed_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = value {
            self.seed = value.trim().parse().map_err(|_| ConfigError::Seed {
                value: value.to_string(),
            })?;
            log::info!("Seed overridden to {}", self.seed);
        }
        Ok(self)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        positive("playfield.width", pf.width)?;
        positive("playfield.height", pf.height)?;
        positive("playfield.ground_y", pf.ground_y)?;
        if pf.ground_y > pf.height {
            return Err(ConfigError::invalid(
                "playfield.ground_y",
                format!("ground {} lies below playfield height {}", pf.ground_y, pf.height),
            ));
        }

        positive_f64("clock.step_secs", self.clock.step_secs)?;
        positive_f64("clock.max_frame_delta", self.clock.max_frame_delta)?;
        if self.clock.step_secs < MIN_SIM_DT {
            return Err(ConfigError::invalid(
                "clock.step_secs",
                format!("must be at least {MIN_SIM_DT}s, got {}", self.clock.step_secs),
            ));
        }
        if self.clock.max_frame_delta < self.clock.step_secs {
            return Err(ConfigError::invalid(
                "clock.max_frame_delta",
                "must be at least one simulation step",
            ));
        }
        if self.clock.max_frame_delta / self.clock.step_secs > f64::from(MAX_SUBSTEPS) {
            return Err(ConfigError::invalid(
                "clock.max_frame_delta",
                format!("allows more than {MAX_SUBSTEPS} steps per frame"),
            ));
        }

        let player = &self.player;
        positive("player.width", player.width)?;
        positive("player.height", player.height)?;
        positive("player.jump_speed", player.jump_speed)?;
        positive("player.gravity", player.gravity)?;
        if !(player.x >= 0.0 && player.x + player.width <= pf.width) {
            return Err(ConfigError::invalid(
                "player.x",
                "runner must sit inside the playfield",
            ));
        }
        for kind in ObstacleKind::ALL {
            if kind.resting_y(pf.ground_y, player.height) < 0.0 {
                return Err(ConfigError::invalid(
                    "playfield.ground_y",
                    format!("too small to fit {kind:?} obstacles"),
                ));
            }
        }

        let spawn = &self.spawn;
        positive_f64("spawn.base_interval", spawn.base_interval)?;
        positive_f64("spawn.ramp_secs", spawn.ramp_secs)?;
        if !(0.0..1.0).contains(&spawn.jitter) {
            return Err(ConfigError::invalid("spawn.jitter", "must be in [0, 1)"));
        }
        if !(spawn.max_factor >= 1.0 && spawn.max_factor.is_finite()) {
            return Err(ConfigError::invalid("spawn.max_factor", "must be >= 1.0"));
        }
        if !(spawn.margin >= 0.0) {
            return Err(ConfigError::invalid("spawn.margin", "must not be negative"));
        }
        positive("spawn.base_speed", spawn.base_speed)?;
        if !(spawn.max_speed >= spawn.base_speed && spawn.max_speed.is_finite()) {
            return Err(ConfigError::invalid(
                "spawn.max_speed",
                "must be finite and at least spawn.base_speed",
            ));
        }

        if self.score_per_step == 0 {
            return Err(ConfigError::invalid("score_per_step", "must be positive"));
        }
        if !(self.demo_seconds >= 0.0 && self.demo_seconds.is_finite()) {
            return Err(ConfigError::invalid("demo_seconds", "must not be negative"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn positive_f64(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}
