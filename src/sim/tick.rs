//! Per-frame simulation tick
//!
//! Advances bird physics and the pipe timeline on the same clock, then runs
//! the boundary checks and collision checks against the fresh values.

use super::collision::detect_collision;
use super::state::{GameEvent, GameMode, GameState};
use super::timeline::speed_multiplier;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump/tap signal. Restarts the run when in game over.
    pub jump: bool,
    /// Demo mode - the autopilot decides when to jump
    pub autopilot: bool,
}

/// Boundary crossings of the pipe x between two observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crossings {
    /// Pipe moved from right of `exit_x` to left of it
    pub exited: bool,
    /// Pipe moved from right of the bird to at-or-left of it
    pub passed: bool,
}

/// Compare two consecutive pipe positions against both boundaries.
///
/// Each boundary fires only on the tick the pipe moves across it, so a pipe
/// sitting past a boundary never fires twice and motion to the right never
/// fires at all.
pub fn detect_crossings(prev: f32, current: f32, bird_x: f32, exit_x: f32) -> Crossings {
    Crossings {
        exited: current < exit_x && prev > exit_x,
        passed: current != prev && current <= bird_x && prev > bird_x,
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let jump = if input.autopilot {
        autopilot_wants_jump(state)
    } else {
        input.jump
    };

    if jump {
        state.jump();
    }
    state.step(dt);
}

/// Demo pilot: restart after a crash, otherwise flap whenever the bird is
/// below the middle of the gap. Jumps set velocity, so flapping every frame
/// climbs at a steady `|JUMP_FORCE|`.
fn autopilot_wants_jump(state: &GameState) -> bool {
    if state.is_game_over() {
        return true;
    }
    let target = state.pipes().gap_center_y(state.viewport());
    state.bird().center().y > target
}

impl GameState {
    /// Jump/tap signal: impulse while playing, restart while game over
    pub fn jump(&mut self) {
        match self.mode {
            GameMode::Playing => {
                self.bird.jump();
                self.push_event(GameEvent::Jumped);
            }
            GameMode::GameOver => self.restart(),
        }
    }

    /// Advance physics, pipes, scoring and collisions by `dt` seconds.
    /// Skipped entirely for non-positive or non-finite `dt` and in game over.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.mode == GameMode::GameOver {
            return;
        }
        self.time_ticks += 1;

        self.bird.step(dt);

        let prev_x = self.pipes.x;
        let advance = self.cycle.advance(dt, speed_multiplier(self.score));
        self.pipes.x = advance.value;

        let crossings = detect_crossings(
            prev_x,
            advance.swept,
            self.bird.pos.x,
            self.tuning.pipe_exit_x,
        );
        if crossings.passed {
            self.score += 1;
            self.push_event(GameEvent::Scored { score: self.score });
            log::debug!("Scored: {}", self.score);
        }
        if crossings.exited {
            self.reshuffle_gap();
            self.cycle.restart(speed_multiplier(self.score));
            self.pipes.x = self.cycle.value();
        }

        if let Some(cause) = detect_collision(&self.bird, &self.pipes, &self.viewport) {
            self.end_run(cause);
        }
    }
}
