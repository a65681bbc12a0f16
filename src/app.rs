//! Per-frame driver
//!
//! Wires the input adapter, state machine, clock and renderer together in
//! the fixed order the simulation relies on:
//! input → commands → clock → simulation steps → draw.

use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::platform::{InputAdapter, Platform, RawEvent};
use crate::renderer::{FrameSnapshot, Renderer};
use crate::settings::Settings;
use crate::sim::{Clock, Flow, GameEvent, GamePhase, GameState, apply_command, tick};

/// What happened during one frame
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub flow: Flow,
    /// Simulation steps the clock released this frame
    pub steps: u32,
    pub events: Vec<GameEvent>,
    /// The frame as handed to the renderer
    pub snapshot: FrameSnapshot,
}

pub struct App<R = Pcg32> {
    state: GameState<R>,
    clock: Clock,
    input: InputAdapter,
    frames: u64,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self::with_state(settings, GameState::new(settings))
    }
}

impl<R: Rng> App<R> {
    /// Build around an existing state (e.g. one with an injected RNG)
    pub fn with_state(settings: &Settings, state: GameState<R>) -> Self {
        Self {
            state,
            clock: Clock::from_settings(&settings.clock),
            input: InputAdapter::new(),
            frames: 0,
        }
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one full frame. Always draws, even when the frame asks to exit.
    pub fn frame(
        &mut self,
        raw_events: &[RawEvent],
        real_delta: Duration,
        renderer: &mut impl Renderer,
    ) -> FrameOutcome {
        let mut flow = Flow::Continue;
        for event in raw_events {
            let Some(command) = self.input.translate(event, self.state.phase()) else {
                continue;
            };
            log::debug!("{:?} -> {:?}", event, command);
            if apply_command(&mut self.state, command) == Flow::Exit {
                flow = Flow::Exit;
                break;
            }
        }

        let steps = self.clock.tick(real_delta);
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(tick(&mut self.state));
        }

        let snapshot = FrameSnapshot::capture(&self.state);
        renderer.draw(&snapshot);
        self.frames += 1;

        FrameOutcome {
            flow,
            steps,
            events,
            snapshot,
        }
    }

    /// Drive frames from `platform` until a Quit command arrives.
    ///
    /// Returns the number of frames run.
    pub fn run(&mut self, platform: &mut impl Platform, renderer: &mut impl Renderer) -> u64 {
        let first_frame = self.frames;
        loop {
            let events = platform.poll_events();
            let delta = platform.frame_delta();
            let outcome = self.frame(&events, delta, &mut *renderer);
            platform.observe(&outcome.snapshot);
            if outcome.flow == Flow::Exit {
                break;
            }
        }
        let frames = self.frames - first_frame;
        log::info!("Main loop exited after {} frames", frames);
        frames
    }
}
