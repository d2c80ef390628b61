//! Collision detection between the bird, the pipes, and the screen bounds
//!
//! The bird is reduced to its center point; pipes are axis-aligned
//! rectangles. All edges are inclusive, so touching counts as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bird, PipePair, Viewport};
use crate::consts::BASE_HEIGHT;

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive point containment on all four edges
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    /// Bird center inside a pipe segment
    Pipe,
    /// Bird sank into the ground strip
    Ground,
    /// Bird flew above the top of the viewport
    Ceiling,
}

/// Largest bird y that still clears the ground strip
#[inline]
pub fn ground_limit(viewport: &Viewport, bird_height: f32) -> f32 {
    viewport.height - BASE_HEIGHT - bird_height
}

/// Check the bird against the ground and the ceiling
pub fn bird_bounds_collision(bird: &Bird, viewport: &Viewport) -> Option<CollisionCause> {
    if bird.pos.y > ground_limit(viewport, bird.height) {
        Some(CollisionCause::Ground)
    } else if bird.pos.y < 0.0 {
        Some(CollisionCause::Ceiling)
    } else {
        None
    }
}

/// Check the bird's center against both pipe segments
pub fn bird_pipe_collision(bird: &Bird, pipes: &PipePair, viewport: &Viewport) -> bool {
    let center = bird.center();
    pipes.rects(viewport).iter().any(|rect| rect.contains(center))
}

/// Full per-tick check. Bounds are reported ahead of pipes when both hit.
pub fn detect_collision(
    bird: &Bird,
    pipes: &PipePair,
    viewport: &Viewport,
) -> Option<CollisionCause> {
    bird_bounds_collision(bird, viewport).or_else(|| {
        bird_pipe_collision(bird, pipes, viewport).then_some(CollisionCause::Pipe)
    })
}
