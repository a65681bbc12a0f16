//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{Aabb, check};
pub use entity::{Entity, EntityId, EntityStore, ObstacleKind, Role};
pub use spawner::{ObstacleSpawner, SpawnRequest, SpawnSchedule, difficulty_factor, obstacle_speed};
pub use state::{GamePhase, GameSession, GameState, RunSummary};
pub use tick::{Command, Flow, GameEvent, apply_command, tick};
