//! Character-cell renderer for headless runs
//!
//! Rasterizes the snapshot onto a small grid and writes it to the log,
//! throttled so a 60 Hz loop doesn't flood the output.

use std::fmt::Write;

use super::{FrameSnapshot, Renderer};
use crate::sim::{Aabb, GamePhase, ObstacleKind};

const PLAYER_CELL: char = '@';
const GROUND_CELL: char = '#';
const EMPTY_CELL: char = ' ';

fn obstacle_cell(kind: ObstacleKind) -> char {
    match kind {
        ObstacleKind::Stump => '|',
        ObstacleKind::Log => '=',
        ObstacleKind::Branch => '~',
    }
}

pub struct TextRenderer {
    columns: usize,
    rows: usize,
    /// Log every n-th frame (phase changes are always logged)
    log_every: u64,
    frames: u64,
    last_phase: Option<GamePhase>,
    last_frame: String,
}

impl TextRenderer {
    pub fn new(columns: usize, rows: usize, log_every: u64) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            log_every: log_every.max(1),
            frames: 0,
            last_phase: None,
            last_frame: String::new(),
        }
    }

    /// The most recently drawn frame
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Produce the text for one frame
    pub fn render(&self, frame: &FrameSnapshot) -> String {
        let mut out = String::new();
        match frame.phase {
            GamePhase::Welcome => {
                let _ = writeln!(out, "DINO RUN - Jungle Adventure");
                let _ = writeln!(out, "A dinosaur is chasing you through the jungle!");
                let _ = writeln!(out, "Press SPACE to start, ESC to quit");
            }
            GamePhase::Playing => {
                let _ = writeln!(
                    out,
                    "Score: {} | Obstacles Dodged: {} | Time: {:.1}s",
                    frame.score, frame.obstacles_dodged, frame.elapsed_secs
                );
                out.push_str(&self.rasterize(frame));
            }
            GamePhase::GameOver => {
                let _ = writeln!(out, "CRASHED!");
                if let Some(run) = frame.last_run {
                    let _ = writeln!(
                        out,
                        "Score: {} | Obstacles Dodged: {} | Survived: {:.1}s | Hit: {:?}",
                        run.score, run.obstacles_dodged, run.survived_secs, run.hit_kind
                    );
                }
                let _ = writeln!(out, "SPACE to run again, BACKSPACE for menu, ESC to quit");
            }
        }
        out
    }

    fn rasterize(&self, frame: &FrameSnapshot) -> String {
        let mut grid = vec![vec![EMPTY_CELL; self.columns]; self.rows];
        let scale_x = self.columns as f32 / frame.playfield.x;
        let scale_y = self.rows as f32 / frame.playfield.y;

        let ground_row = (frame.ground_y * scale_y).floor().max(0.0) as usize;
        for row in grid.iter_mut().skip(ground_row) {
            row.fill(GROUND_CELL);
        }
        for obstacle in &frame.obstacles {
            self.fill(&mut grid, &obstacle.bounds, scale_x, scale_y, obstacle_cell(obstacle.kind));
        }
        if let Some(player) = &frame.player {
            self.fill(&mut grid, player, scale_x, scale_y, PLAYER_CELL);
        }

        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        out
    }

    fn fill(&self, grid: &mut [Vec<char>], bounds: &Aabb, scale_x: f32, scale_y: f32, cell: char) {
        let max = bounds.max();
        let col_start = (bounds.min.x * scale_x).floor().max(0.0) as usize;
        let col_end = ((max.x * scale_x).ceil().max(0.0) as usize).min(self.columns);
        let row_start = (bounds.min.y * scale_y).floor().max(0.0) as usize;
        let row_end = ((max.y * scale_y).ceil().max(0.0) as usize).min(self.rows);
        for row in grid.iter_mut().take(row_end).skip(row_start) {
            for c in row.iter_mut().take(col_end).skip(col_start) {
                *c = cell;
            }
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &FrameSnapshot) {
        let text = self.render(frame);
        let phase_changed = self.last_phase != Some(frame.phase);
        if phase_changed || self.frames % self.log_every == 0 {
            log::info!("\n{}", text);
        }
        self.frames += 1;
        self.last_phase = Some(frame.phase);
        self.last_frame = text;
    }
}
