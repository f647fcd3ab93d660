//! Arena Brawl - A fixed-timestep 2D arena battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, collisions, spawning, rewards)
//! - `catalog`: Playable character archetypes and level scaling
//! - `profile`: Player profile shape, sanitization and shop actions
//! - `session`: Match state machine and frame accumulator
//! - `renderer`: Read-only render adapter producing vertex data
//! - `platform`: Browser host

pub mod catalog;
pub mod platform;
pub mod profile;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use catalog::{Archetype, CharacterStats, archetype, scaled_stats};
pub use profile::{Profile, ProfileError, ShopError};
pub use session::Session;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest wall-clock delta accepted per frame (avoids catch-up bursts after a hidden tab)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Arena dimensions (origin top-left, +y down)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const DASH_DURATION: f32 = 0.18;
    pub const DASH_COOLDOWN: f32 = 1.1;
    pub const DASH_SPEED_MULT: f32 = 2.4;
    /// Distance ahead of the player's edge where shots appear
    pub const MUZZLE_OFFSET: f32 = 6.0;
    pub const PLAYER_PROJECTILE_RADIUS: f32 = 5.0;

    /// Charge meter
    pub const CHARGE_MAX: f32 = 100.0;
    pub const CHARGE_PER_HIT: f32 = 6.0;
    pub const CHARGE_PER_GEM: f32 = 10.0;
    pub const SPECIAL_RADIUS: f32 = 170.0;

    /// Enemy behaviour
    pub const ENEMY_FIRE_BUFFER: f32 = 40.0;
    pub const ENEMY_FIRE_JITTER: f32 = 0.4;
    pub const ENEMY_CONTACT_BUFFER: f32 = 4.0;
    pub const ENEMY_PROJECTILE_RADIUS: f32 = 6.0;
    pub const ENEMY_PROJECTILE_TTL: f32 = 2.6;
    /// How far outside the bounds new enemies appear
    pub const SPAWN_MARGIN: f32 = 24.0;

    /// Spawn pacing (seconds)
    pub const SPAWN_FIRST_DELAY: f32 = 1.0;
    pub const SPAWN_BASE_INTERVAL: f32 = 1.6;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.012;
    pub const SPAWN_MIN_INTERVAL: f32 = 0.45;
    pub const SPAWN_JITTER: f32 = 0.35;
    /// Seconds per difficulty wave
    pub const WAVE_SECONDS: f32 = 20.0;
    pub const WAVE_SCALE_STEP: f32 = 0.18;

    /// Gems
    pub const GEM_RADIUS: f32 = 8.0;
    pub const GEM_TTL: f32 = 12.0;
    pub const GEM_MAGNET_RADIUS: f32 = 110.0;
    pub const GEM_PULL_RADIUS: f32 = 260.0;
    pub const GEM_MAGNET_SPEED: f32 = 220.0;
    pub const GEM_PULL_SPEED: f32 = 420.0;
    pub const GEM_HEAL: f32 = 6.0;

    /// Scoring
    pub const KILL_SCORE: f32 = 40.0;
    pub const GEM_SCORE: f32 = 15.0;
    pub const SCORE_PER_SECOND: f32 = 2.0;

    /// Rewards
    pub const REWARD_MIN_COINS: u64 = 20;
    pub const REWARD_SCORE_DIVISOR: f64 = 18.0;
    pub const REWARD_COINS_PER_KILL: u64 = 12;
    /// Final score that counts a match as a win
    pub const WIN_SCORE_THRESHOLD: u64 = 1200;
}

/// Clamp a circle center so the whole circle stays inside `[0, size]`
#[inline]
pub fn clamp_to_bounds(pos: Vec2, radius: f32, size: Vec2) -> Vec2 {
    // An oversized circle pins to the center instead of panicking in f32::clamp
    let min = Vec2::splat(radius).min(size * 0.5);
    let max = (size - Vec2::splat(radius)).max(size * 0.5);
    pos.clamp(min, max)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True if two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) <= ra + rb
}
