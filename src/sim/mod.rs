//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the `dt` handed to `step`/`tick`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod timeline;

pub use collision::{
    CollisionCause, Rect, bird_bounds_collision, bird_pipe_collision, detect_collision,
    ground_limit,
};
pub use state::{Bird, GameEvent, GameMode, GameState, MAX_PENDING_EVENTS, PipePair, Viewport};
pub use tick::{Crossings, TickInput, detect_crossings, tick};
pub use timeline::{Advance, Keyframe, PipeCycle, Timeline, speed_multiplier};
