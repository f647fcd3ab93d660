//! Arena bounds and static obstacles
//!
//! Screen convention: origin top-left, +x right, +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// An axis-aligned rectangular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Check if a point lies inside the rectangle (edges count as inside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Closest point on (or in) the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Default cover layout
pub const DEFAULT_OBSTACLES: [Obstacle; 5] = [
    Obstacle::new(280.0, 200.0, 130.0, 90.0),
    Obstacle::new(600.0, 330.0, 150.0, 70.0),
    Obstacle::new(140.0, 60.0, 90.0, 60.0),
    Obstacle::new(720.0, 90.0, 120.0, 60.0),
    Obstacle::new(110.0, 410.0, 110.0, 80.0),
];

/// The playfield. Immutable for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            obstacles: DEFAULT_OBSTACLES.to_vec(),
        }
    }
}

impl Arena {
    /// Empty arena of the given size
    pub fn open(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Whether a point lies within the visible bounds
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Whether a point lies inside any obstacle
    pub fn blocked(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.contains_point(p))
    }
}
