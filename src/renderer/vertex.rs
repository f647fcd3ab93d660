//! Vertex types for 2D rendering

/// Simple 2D vertex with position and color
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.04, 0.04, 0.08, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const OBSTACLE_HIGH_CONTRAST: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GEM: [f32; 4] = [0.3, 1.0, 0.55, 1.0];
    pub const DASH_RING: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const BAR_BACK: [f32; 4] = [0.1, 0.1, 0.12, 0.85];
    pub const HEALTH: [f32; 4] = [0.3, 0.9, 0.4, 1.0];
    pub const CHARGE: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
    pub const CHARGE_FULL: [f32; 4] = [1.0, 0.85, 0.3, 1.0];
    pub const DAMAGE_FLASH: [f32; 4] = [1.0, 0.1, 0.1, 0.35];
}

/// RGBA from an RGB triple
#[inline]
pub fn rgba(rgb: [f32; 3], alpha: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha]
}
