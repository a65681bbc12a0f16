//! Read-only per-frame view of the game

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{Aabb, EntityId, GamePhase, GameState, ObstacleKind, RunSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub bounds: Aabb,
    /// Horizontal velocity (units/s, negative is leftward)
    pub speed_x: f32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub obstacles_dodged: u64,
    /// Seconds survived in the current run
    pub elapsed_secs: f64,
    /// Playfield width and height
    pub playfield: Vec2,
    pub ground_y: f32,
    pub player: Option<Aabb>,
    /// Creation order
    pub obstacles: Vec<ObstacleView>,
    pub last_run: Option<RunSummary>,
}

impl FrameSnapshot {
    pub fn capture<R: Rng>(state: &GameState<R>) -> Self {
        let settings = state.settings();
        let obstacles = state
            .entities
            .obstacles()
            .iter()
            .filter_map(|o| {
                o.kind().map(|kind| ObstacleView {
                    id: o.id,
                    kind,
                    bounds: o.aabb(),
                    speed_x: o.vel.x,
                })
            })
            .collect();

        Self {
            phase: state.phase(),
            score: state.session.score,
            obstacles_dodged: state.session.obstacles_dodged,
            elapsed_secs: state.sim_time(),
            playfield: Vec2::new(settings.playfield.width, settings.playfield.height),
            ground_y: settings.playfield.ground_y,
            player: state.entities.player().map(|p| p.aabb()),
            obstacles,
            last_run: state.session.last_run,
        }
    }
}
