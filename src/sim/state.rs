//! Game state and core simulation types
//!
//! Everything the renderer samples lives here. Entities are created once per
//! session and reset in place on restart.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionCause, Rect};
use super::timeline::{PipeCycle, speed_multiplier};
use crate::consts::*;
use crate::interpolate_clamped;
use crate::settings::{Settings, SettingsError, Tuning};

/// Visible area in world units, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Current mode of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Physics and pipes advance
    #[default]
    Playing,
    /// Everything frozen until restart
    GameOver,
}

/// Maximum number of undrained events kept; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 256;

/// Notable things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Jump impulse applied
    Jumped,
    /// Bird passed the pipe pair
    Scored { score: u32 },
    /// Pipe pair left the screen and got a new gap
    GapReshuffled { offset: f32 },
    /// Run ended
    GameOver { cause: CollisionCause, score: u32 },
    /// Fresh run started from game over
    Restarted,
}

/// The player-controlled falling body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner. x is fixed for the session.
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bird {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            pos: Vec2::new(viewport.width / 4.0, viewport.height / 3.0),
            vel_y: 0.0,
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
        }
    }

    /// Explicit Euler step: position moves with the old velocity, then
    /// gravity updates the velocity
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.pos.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
    }

    /// Set (not add) the upward impulse
    #[inline]
    pub fn jump(&mut self) {
        self.vel_y = JUMP_FORCE;
    }

    /// Center point, used for pipe collision and as the rotation pivot
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Visual tilt in radians derived from vertical velocity
    pub fn rotation(&self) -> f32 {
        interpolate_clamped(
            self.vel_y,
            (JUMP_FORCE, JUMP_FORCE.abs()),
            (-BIRD_MAX_TILT, BIRD_MAX_TILT),
        )
    }

    fn reset(&mut self, viewport: &Viewport) {
        *self = Self::new(viewport);
    }
}

/// The top/bottom pipe pair sharing one x and one gap offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    /// Left edge of both segments
    pub x: f32,
    /// Vertical shift applied to both segments
    pub gap_offset: f32,
    pub width: f32,
    /// Height of each segment
    pub height: f32,
}

impl PipePair {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            x: viewport.width,
            gap_offset: 0.0,
            width: PIPE_WIDTH,
            height: PIPE_HEIGHT,
        }
    }

    /// Top edge of the upper segment
    #[inline]
    pub fn top_y(&self) -> f32 {
        self.gap_offset - self.height / 2.0
    }

    /// Top edge of the lower segment
    #[inline]
    pub fn bottom_y(&self, viewport: &Viewport) -> f32 {
        viewport.height - self.height / 2.0 + self.gap_offset
    }

    /// Center of the passable gap
    pub fn gap_center_y(&self, viewport: &Viewport) -> f32 {
        (self.top_y() + self.height + self.bottom_y(viewport)) / 2.0
    }

    /// Segment rectangles as `[top, bottom]`
    pub fn rects(&self, viewport: &Viewport) -> [Rect; 2] {
        [
            Rect::new(self.x, self.top_y(), self.width, self.height),
            Rect::new(self.x, self.bottom_y(viewport), self.width, self.height),
        ]
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the gap RNG started from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) viewport: Viewport,
    pub(crate) tuning: Tuning,
    pub(crate) bird: Bird,
    pub(crate) pipes: PipePair,
    pub(crate) score: u32,
    pub(crate) mode: GameMode,
    /// Drives `pipes.x`
    pub(crate) cycle: PipeCycle,
    /// Ticks that actually advanced the simulation, across every run of the
    /// session. Not reset by `restart`.
    pub(crate) time_ticks: u64,
    /// Newest last, capped at `MAX_PENDING_EVENTS`
    pub(crate) events: VecDeque<GameEvent>,
}

impl GameState {
    /// Start a session. Fails on a degenerate viewport or tuning.
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let viewport = settings.viewport()?;
        let tuning = settings.tuning.clone();
        let cycle = PipeCycle::new(viewport.width, &tuning, speed_multiplier(0));

        log::info!(
            "Session started: viewport {}x{}, seed {}",
            viewport.width,
            viewport.height,
            settings.seed
        );

        Ok(Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            viewport,
            bird: Bird::new(&viewport),
            pipes: PipePair::new(&viewport),
            tuning,
            score: 0,
            mode: GameMode::Playing,
            cycle,
            time_ticks: 0,
            events: VecDeque::with_capacity(MAX_PENDING_EVENTS),
        })
    }

    /// Reset every entity to its starting values and resume play.
    /// The gap RNG keeps its stream so the next run gets fresh gaps.
    pub fn restart(&mut self) {
        self.bird.reset(&self.viewport);
        self.pipes = PipePair::new(&self.viewport);
        self.score = 0;
        self.cycle.restart(speed_multiplier(0));
        self.pipes.x = self.cycle.value();
        self.mode = GameMode::Playing;
        self.push_event(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    /// Record an event, dropping the oldest once the buffer is full
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Draw a new gap offset, uniform over the configured range
    pub(crate) fn reshuffle_gap(&mut self) {
        let range = self.tuning.gap_range;
        let offset = self.rng.random::<f32>() * range - range / 2.0;
        self.pipes.gap_offset = offset;
        self.push_event(GameEvent::GapReshuffled { offset });
        log::debug!("Gap reshuffled to {:.1}", offset);
    }

    /// Enter game over and freeze the pipes
    pub(crate) fn end_run(&mut self, cause: CollisionCause) {
        if self.mode == GameMode::GameOver {
            return;
        }
        self.mode = GameMode::GameOver;
        self.cycle.cancel();
        self.push_event(GameEvent::GameOver {
            cause,
            score: self.score,
        });
        log::info!("Game over ({:?}) with score {}", cause, self.score);
    }

    #[inline]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[inline]
    pub fn bird_rotation(&self) -> f32 {
        self.bird.rotation()
    }

    #[inline]
    pub fn pipes(&self) -> &PipePair {
        &self.pipes
    }

    /// Top and bottom pipe placements for the renderer
    #[inline]
    pub fn pipe_rects(&self) -> [Rect; 2] {
        self.pipes.rects(&self.viewport)
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.mode == GameMode::GameOver
    }

    /// Multiplier derived from the current score
    #[inline]
    pub fn speed_multiplier(&self) -> f32 {
        speed_multiplier(self.score)
    }

    /// Multiplier the pipe sweep in flight was started with
    #[inline]
    pub fn cycle_speed(&self) -> f32 {
        self.cycle.speed()
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Session-wide count of ticks that advanced the simulation
    #[inline]
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Take the events raised since the last call. Hosts that never drain
    /// only lose the oldest events beyond `MAX_PENDING_EVENTS`.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}
