//! Game state and session bookkeeping
//!
//! `GameState` owns everything the simulation mutates. Transitions between
//! phases only happen through the methods here, driven by `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityStore, ObstacleKind};
use super::spawner::ObstacleSpawner;
use crate::settings::Settings;

/// Current screen / mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for Start
    Welcome,
    /// Active run
    Playing,
    /// Run ended on a collision
    GameOver,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub obstacles_dodged: u64,
    /// Seconds of simulation survived
    pub survived_secs: f64,
    /// Obstacle that ended the run
    pub hit_by: EntityId,
    pub hit_kind: ObstacleKind,
}

/// Per-run counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Survival score, never decreases during a run
    pub score: u64,
    pub obstacles_dodged: u64,
    /// Simulation ticks elapsed in the current run
    pub elapsed_ticks: u64,
    /// Result of the most recent run that ended in a crash
    pub last_run: Option<RunSummary>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            phase: GamePhase::Welcome,
            score: 0,
            obstacles_dodged: 0,
            elapsed_ticks: 0,
            last_run: None,
        }
    }
}

/// Complete simulation state (deterministic for a given seed and input)
pub struct GameState<R = Pcg32> {
    pub session: GameSession,
    pub entities: EntityStore,
    pub spawner: ObstacleSpawner<R>,
    pub(crate) settings: Settings,
    /// Fixed step length in seconds
    pub(crate) step_secs: f64,
}

impl GameState {
    /// Create a state whose spawner is seeded from `settings.seed`
    pub fn new(settings: &Settings) -> Self {
        Self::with_rng(settings, Pcg32::seed_from_u64(settings.seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a state with an explicit random source for spawn attributes
    pub fn with_rng(settings: &Settings, rng: R) -> Self {
        Self {
            session: GameSession::default(),
            entities: EntityStore::new(),
            spawner: ObstacleSpawner::new(settings, rng),
            settings: settings.clone(),
            step_secs: settings.clock.step_secs,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Simulation seconds elapsed in the current run
    pub fn sim_time(&self) -> f64 {
        self.session.elapsed_ticks as f64 * self.step_secs
    }

    /// Reset counters and entities and enter Playing
    pub fn start_run(&mut self) {
        self.entities.clear();
        let player = &self.settings.player;
        let ground_y = self.settings.playfield.ground_y;
        self.entities.spawn_player(
            Vec2::new(player.x, ground_y - player.height),
            Vec2::new(player.width, player.height),
        );
        self.spawner.reset();
        self.session.score = 0;
        self.session.obstacles_dodged = 0;
        self.session.elapsed_ticks = 0;
        self.session.phase = GamePhase::Playing;
        log::info!("Run started");
    }

    /// Freeze the score and enter GameOver after hitting `obstacle`
    ///
    /// # Panics
    ///
    /// Panics if `obstacle` is not a live obstacle in the store.
    pub fn end_run(&mut self, obstacle: EntityId) {
        let hit_kind = self
            .entities
            .obstacles()
            .iter()
            .find(|o| o.id == obstacle)
            .and_then(|o| o.kind())
            .unwrap_or_else(|| panic!("run ended by unknown obstacle {obstacle}"));

        let summary = RunSummary {
            score: self.session.score,
            obstacles_dodged: self.session.obstacles_dodged,
            survived_secs: self.sim_time(),
            hit_by: obstacle,
            hit_kind,
        };
        self.session.last_run = Some(summary);
        self.session.phase = GamePhase::GameOver;

        // The run's entities go away with it; applied at end of tick
        let mut ids = Vec::with_capacity(self.entities.obstacle_count() + 1);
        self.entities.for_each(|e| ids.push(e.id));
        for id in ids {
            self.entities.remove_entity(id);
        }

        log::info!(
            "Run over: hit {:?} #{} after {:.1}s, score {}, dodged {}",
            hit_kind,
            obstacle,
            summary.survived_secs,
            summary.score,
            summary.obstacles_dodged
        );
    }

    /// Abandon whatever is on screen and show the welcome screen
    pub fn return_to_menu(&mut self) {
        self.entities.clear();
        self.session.phase = GamePhase::Welcome;
        log::info!("Returned to menu");
    }

    /// Whether the runner is standing on the ground
    pub fn player_grounded(&self) -> bool {
        let ground_y = self.settings.playfield.ground_y;
        self.entities
            .player()
            .is_some_and(|p| p.bottom() >= ground_y - GROUND_EPSILON && p.vel.y >= 0.0)
    }
}

/// Tolerance for treating the runner as standing
const GROUND_EPSILON: f32 = 0.01;
