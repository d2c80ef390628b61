//! Flappy Core - simulation core of a side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipe cycle, collisions, game state)
//! - `settings`: Session settings and tuning, loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 1000.0;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_FORCE: f32 = -300.0;

    /// Bird sprite dimensions
    pub const BIRD_WIDTH: f32 = 64.0;
    pub const BIRD_HEIGHT: f32 = 48.0;
    /// Max visual tilt (radians) at either end of the velocity range
    pub const BIRD_MAX_TILT: f32 = 0.3;

    /// Pipe segment dimensions (each of top/bottom)
    pub const PIPE_WIDTH: f32 = 104.0;
    pub const PIPE_HEIGHT: f32 = 640.0;

    /// Height of the ground strip at the bottom of the viewport
    pub const BASE_HEIGHT: f32 = 75.0;

    /// Score at which the pipe speed multiplier reaches its nominal maximum
    pub const SPEED_SCORE_CAP: f32 = 20.0;
    /// Speed multiplier at score 0 and at `SPEED_SCORE_CAP`
    pub const MIN_SPEED: f32 = 1.0;
    pub const MAX_SPEED: f32 = 2.0;

    /// Native runner frame step (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Map `value` from `input` range onto `output` range, extrapolating linearly
/// outside of it
#[inline]
pub fn interpolate(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span == 0.0 {
        return output.0;
    }
    let t = (value - input.0) / span;
    output.0 + (output.1 - output.0) * t
}

/// Same as [`interpolate`] but clamps the result to the output range
#[inline]
pub fn interpolate_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let lo = output.0.min(output.1);
    let hi = output.0.max(output.1);
    interpolate(value, input, output).clamp(lo, hi)
}
