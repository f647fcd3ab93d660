//! Collision detection and response against static rectangles
//!
//! Circles (player, enemies, shots, gems) against axis-aligned obstacles.
//! Resolution pushes the circle out along the minimum-penetration axis so
//! it ends tangent to the rectangle.

use glam::Vec2;

use super::arena::Obstacle;

/// Result of a circle/rectangle check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the circle overlaps the rectangle
    pub hit: bool,
    /// Unit normal pointing from the rectangle toward the circle
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle against a rectangle
///
/// When the center is outside the rectangle the normal is taken from the
/// closest point on the rectangle. When the center is inside (or exactly on
/// an edge) the normal points through the nearest edge.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Obstacle) -> CollisionResult {
    let closest = rect.closest_point(center);
    let delta = center - closest;
    let dist = delta.length();

    if dist > 0.0 {
        if dist >= radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center inside: escape through the nearest edge
    let to_left = center.x - rect.x;
    let to_right = rect.x + rect.w - center.x;
    let to_top = center.y - rect.y;
    let to_bottom = rect.y + rect.h - center.y;

    let (normal, depth) = [
        (Vec2::NEG_X, to_left),
        (Vec2::X, to_right),
        (Vec2::NEG_Y, to_top),
        (Vec2::Y, to_bottom),
    ]
    .into_iter()
    .fold((Vec2::NEG_X, f32::MAX), |best, candidate| {
        if candidate.1 < best.1 { candidate } else { best }
    });

    CollisionResult {
        hit: true,
        normal,
        penetration: depth + radius,
    }
}

/// Push a circle out of a rectangle; returns the corrected center
pub fn resolve_circle_rect(center: Vec2, radius: f32, rect: &Obstacle) -> Vec2 {
    let result = circle_rect_collision(center, radius, rect);
    if !result.hit {
        return center;
    }
    center + result.normal * result.penetration
}

/// Resolve a circle against every obstacle in turn
pub fn resolve_against_obstacles(mut center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    for rect in obstacles {
        center = resolve_circle_rect(center, radius, rect);
    }
    center
}

/// Distance from a point to the rectangle (0 when inside)
#[inline]
pub fn point_rect_distance(p: Vec2, rect: &Obstacle) -> f32 {
    (p - rect.closest_point(p)).length()
}
