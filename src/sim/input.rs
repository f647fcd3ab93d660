//! Per-tick input record
//!
//! Event listeners write into a `TickInput`; every tick works from a clone of
//! it so aim, buttons and keys stay consistent for the whole step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in arena coordinates, if a pointer is over the arena
    pub pointer: Option<Vec2>,
    /// Fire held
    pub attack: bool,
    /// Dash held (edge-triggered)
    pub dash: bool,
    /// Special ability held (edge-triggered)
    pub special: bool,
    /// Gem pull held
    pub pull: bool,
}

impl TickInput {
    /// Unit movement direction from held keys (zero when idle or cancelled out)
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Rising-edge detector for held buttons
///
/// Reports `true` only on the tick a button goes from released to held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLatch {
    held: bool,
}

impl EdgeLatch {
    /// Feed this tick's button state; returns true on a press
    pub fn rising(&mut self, held: bool) -> bool {
        let pressed = held && !self.held;
        self.held = held;
        pressed
    }
}
