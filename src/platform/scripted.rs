//! Headless platform with a built-in autopilot
//!
//! Stands in for a window and keyboard: frame times are simulated with
//! seeded jitter, and key presses come from a simple bot that reads each
//! drawn frame. It starts runs, jumps ground obstacles, restarts after a
//! crash and closes the "window" once its time budget is spent, or as soon
//! as its shutdown flag is raised (the binary wires it to SIGINT/SIGTERM).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Key, Platform, RawEvent};
use crate::renderer::{FrameSnapshot, ObstacleView};
use crate::sim::{Aabb, GamePhase};

/// Nominal frame time the jitter is applied around
const FRAME_SECS: f64 = 1.0 / 60.0;
/// Max jitter either side of the nominal frame time
const FRAME_JITTER_SECS: f64 = 0.005;
/// One frame in this many stalls (debugger pause, window drag)
const STALL_ONE_IN: u32 = 900;
const STALL_SECS: f64 = 0.4;

/// Seconds before contact at which the bot jumps
const JUMP_LEAD_SECS: f32 = 0.15;
/// Rough air time of a jump, used to avoid jumping into a branch
const AIR_TIME_SECS: f32 = 0.8;
/// Frames to linger on the welcome / crash screens
const MENU_FRAMES: u32 = 45;

pub struct ScriptedPlatform {
    rng: Pcg32,
    /// Frame-time budget left before the window closes. Counts the
    /// generated (uncapped) frame deltas, stalls included.
    remaining_secs: f64,
    shutdown: Arc<AtomicBool>,
    pending: Vec<RawEvent>,
    idle_frames: u32,
    closed: bool,
}

impl ScriptedPlatform {
    pub fn new(seed: u64, run_secs: f64) -> Self {
        log::info!("Acquired headless platform ({:.0}s budget)", run_secs);
        Self {
            // Separate stream from the spawner so bot timing can't perturb it
            rng: Pcg32::seed_from_u64(seed ^ 0x5EED_F00D),
            remaining_secs: run_secs,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending: Vec::new(),
            idle_frames: 0,
            closed: false,
        }
    }

    /// Flag that closes the window on the next poll once set
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn press(&mut self, key: Key) {
        self.pending.push(RawEvent::KeyDown(key));
        self.pending.push(RawEvent::KeyUp(key));
    }

    /// Decide whether the runner should jump this frame
    fn should_jump(player: &Aabb, obstacles: &[ObstacleView]) -> bool {
        let player_right = player.max().x;
        let mut ground_threat = false;
        for obstacle in obstacles {
            let speed = -obstacle.speed_x;
            if speed <= 0.0 || obstacle.bounds.max().x <= player.min.x {
                continue;
            }
            let time_to_contact = (obstacle.bounds.min.x - player_right) / speed;
            if obstacle.kind.is_grounded() {
                if (0.0..=JUMP_LEAD_SECS).contains(&time_to_contact) {
                    ground_threat = true;
                }
            } else if time_to_contact < AIR_TIME_SECS {
                // A branch overhead during the jump is worse than the stump
                return false;
            }
        }
        ground_threat
    }
}

impl Platform for ScriptedPlatform {
    fn poll_events(&mut self) -> Vec<RawEvent> {
        if self.closed {
            return std::mem::take(&mut self.pending);
        }
        if self.shutdown.load(Ordering::SeqCst) {
            log::info!("Shutdown requested, closing window");
            self.closed = true;
            // Drop queued bot input so nothing runs after the close
            self.pending.clear();
            self.pending.push(RawEvent::WindowClose);
        } else if self.remaining_secs <= 0.0 {
            self.closed = true;
            self.pending.push(RawEvent::WindowClose);
        }
        std::mem::take(&mut self.pending)
    }

    fn frame_delta(&mut self) -> Duration {
        let secs = if self.rng.random_range(0..STALL_ONE_IN) == 0 {
            STALL_SECS
        } else {
            FRAME_SECS + self.rng.random_range(-FRAME_JITTER_SECS..=FRAME_JITTER_SECS)
        };
        self.remaining_secs -= secs;
        Duration::from_secs_f64(secs)
    }

    fn observe(&mut self, frame: &FrameSnapshot) {
        match frame.phase {
            GamePhase::Welcome | GamePhase::GameOver => {
                self.idle_frames += 1;
                if self.idle_frames >= MENU_FRAMES {
                    self.idle_frames = 0;
                    self.press(Key::Space);
                }
            }
            GamePhase::Playing => {
                self.idle_frames = 0;
                let jump = frame
                    .player
                    .is_some_and(|player| Self::should_jump(&player, &frame.obstacles));
                if jump {
                    self.press(Key::Up);
                }
            }
        }
    }
}

impl Drop for ScriptedPlatform {
    fn drop(&mut self) {
        log::info!("Released headless platform");
    }
}
