//! Obstacle spawning and the difficulty curve
//!
//! Spawn timing is driven purely by simulation time and the injected RNG,
//! so identical seeds and time sequences produce identical obstacles.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::ObstacleKind;
use crate::settings::{Settings, SpawnSettings};

/// Difficulty multiplier at `sim_time` seconds into a run.
///
/// Grows linearly by 1.0 every `ramp_secs` and stops at `max_factor`.
pub fn difficulty_factor(sim_time: f64, spawn: &SpawnSettings) -> f64 {
    (1.0 + sim_time.max(0.0) / spawn.ramp_secs).min(spawn.max_factor)
}

/// Obstacle speed (units/s) at a given difficulty, capped at `max_speed`
pub fn obstacle_speed(factor: f64, spawn: &SpawnSettings) -> f32 {
    (spawn.base_speed * factor as f32).min(spawn.max_speed)
}

/// Where the spawner is in the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Simulation time (seconds) at which the next obstacle appears
    pub next_deadline: f64,
    /// Difficulty factor as of the last spawn
    pub difficulty: f64,
}

/// A new obstacle for the entity store to materialize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ObstacleKind,
}

pub struct ObstacleSpawner<R = Pcg32> {
    spawn: SpawnSettings,
    spawn_x: f32,
    ground_y: f32,
    player_height: f32,
    schedule: SpawnSchedule,
    rng: R,
}

impl<R: Rng> ObstacleSpawner<R> {
    pub fn new(settings: &Settings, rng: R) -> Self {
        let spawn = settings.spawn.clone();
        let schedule = Self::fresh_schedule(&spawn);
        Self {
            spawn_x: settings.playfield.width + spawn.margin,
            ground_y: settings.playfield.ground_y,
            player_height: settings.player.height,
            spawn,
            schedule,
            rng,
        }
    }

    fn fresh_schedule(spawn: &SpawnSettings) -> SpawnSchedule {
        SpawnSchedule {
            next_deadline: spawn.base_interval,
            difficulty: 1.0,
        }
    }

    /// Restart the schedule for a new run. The RNG stream continues.
    pub fn reset(&mut self) {
        self.schedule = Self::fresh_schedule(&self.spawn);
    }

    pub fn schedule(&self) -> SpawnSchedule {
        self.schedule
    }

    /// Emit every spawn whose deadline is at or before `sim_time`
    pub fn advance(&mut self, sim_time: f64) -> Vec<SpawnRequest> {
        let mut requests = Vec::new();
        while sim_time >= self.schedule.next_deadline {
            let deadline = self.schedule.next_deadline;
            let factor = difficulty_factor(deadline, &self.spawn);
            let kind = self.pick_kind();
            let speed = obstacle_speed(factor, &self.spawn);

            requests.push(SpawnRequest {
                pos: Vec2::new(
                    self.spawn_x,
                    kind.resting_y(self.ground_y, self.player_height),
                ),
                vel: Vec2::new(-speed, 0.0),
                kind,
            });

            let jitter = self.rng.random_range(-1.0f64..=1.0) * self.spawn.jitter;
            let interval = self.spawn.base_interval / factor * (1.0 + jitter);
            self.schedule.next_deadline = deadline + interval;
            self.schedule.difficulty = factor;
        }
        requests
    }

    fn pick_kind(&mut self) -> ObstacleKind {
        match self.rng.random_range(0..100u32) {
            0..45 => ObstacleKind::Stump,
            45..80 => ObstacleKind::Log,
            _ => ObstacleKind::Branch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn spawner(seed: u64) -> ObstacleSpawner {
        ObstacleSpawner::new(&Settings::default(), Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_difficulty_starts_at_one_and_reaches_cap() {
        let spawn = SpawnSettings::default();
        assert_eq!(difficulty_factor(0.0, &spawn), 1.0);
        assert_eq!(difficulty_factor(1.0e9, &spawn), spawn.max_factor);
    }

    proptest! {
        #[test]
        fn test_difficulty_monotonic_and_capped(
            t1 in 0.0f64..1.0e6,
            dt in 0.0f64..1.0e6,
            ramp_secs in 0.1f64..600.0,
            max_factor in 1.0f64..20.0,
        ) {
            let spawn = SpawnSettings {
                ramp_secs,
                max_factor,
                ..SpawnSettings::default()
            };
            let t2 = t1 + dt;
            let (f1, f2) = (difficulty_factor(t1, &spawn), difficulty_factor(t2, &spawn));
            prop_assert!(f1 <= f2, "factor dropped: {} at {}s, {} at {}s", f1, t1, f2, t2);
            prop_assert!(f2 <= max_factor);
            prop_assert!(f1 >= 1.0);
        }

        #[test]
        fn test_speed_never_exceeds_cap(factor in 1.0f64..1000.0) {
            let spawn = SpawnSettings::default();
            prop_assert!(obstacle_speed(factor, &spawn) <= spawn.max_speed);
        }
    }

    #[test]
    fn test_speed_capped() {
        let spawn = SpawnSettings::default();
        assert_eq!(obstacle_speed(1.0, &spawn), spawn.base_speed);
        assert_eq!(obstacle_speed(spawn.max_factor, &spawn), spawn.max_speed);
    }

    #[test]
    fn test_first_spawn_after_base_interval() {
        let mut spawner = spawner(1);
        let base = SpawnSettings::default().base_interval;
        assert!(spawner.advance(0.0).is_empty());
        assert!(spawner.advance(base - 0.001).is_empty());
        let requests = spawner.advance(base);
        assert_eq!(requests.len(), 1);
        assert!(spawner.schedule().next_deadline > base);
    }

    #[test]
    fn test_spawns_beyond_right_edge_moving_left() {
        let settings = Settings::default();
        let mut spawner = spawner(3);
        let requests = spawner.advance(60.0);
        assert!(!requests.is_empty());
        for request in &requests {
            assert!(request.pos.x >= settings.playfield.width);
            assert!(request.vel.x < 0.0);
            assert_eq!(request.vel.y, 0.0);
            assert!(-request.vel.x <= settings.spawn.max_speed);
        }
    }

    #[test]
    fn test_spawn_rate_is_bounded() {
        let spawn = SpawnSettings::default();
        let min_interval = spawn.base_interval / spawn.max_factor * (1.0 - spawn.jitter);
        let mut spawner = spawner(11);
        let mut last = spawner.schedule().next_deadline;
        for _ in 0..500 {
            let now = spawner.schedule().next_deadline;
            spawner.advance(now);
            let next = spawner.schedule().next_deadline;
            assert!(next - last >= min_interval - 1e-9);
            last = next;
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = spawner(42);
        let mut b = spawner(42);
        for step in 0..3600 {
            let t = step as f64 / 60.0;
            assert_eq!(a.advance(t), b.advance(t));
        }
        assert_eq!(a.schedule(), b.schedule());
    }

    #[test]
    fn test_reset_restarts_schedule() {
        let mut spawner = spawner(5);
        spawner.advance(100.0);
        assert!(spawner.schedule().difficulty > 1.0);
        spawner.reset();
        assert_eq!(
            spawner.schedule(),
            SpawnSchedule {
                next_deadline: SpawnSettings::default().base_interval,
                difficulty: 1.0,
            }
        );
    }
}
