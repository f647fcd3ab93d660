//! Enemy spawning policy
//!
//! Picks an edge, a position along it and a variant, then scales the
//! variant's stats by the current wave.

use glam::Vec2;
use rand::Rng;

use super::state::{Battle, Enemy, EnemyKind};
use crate::consts::*;

/// Base numbers for an enemy variant before wave scaling
struct EnemyTemplate {
    radius: f32,
    health: f32,
    speed: f32,
    contact_damage: f32,
    ranged_damage: f32,
    projectile_speed: f32,
    fire_cooldown: f32,
    preferred_range: f32,
}

fn template(kind: EnemyKind) -> EnemyTemplate {
    match kind {
        EnemyKind::Basic => EnemyTemplate {
            radius: 14.0,
            health: 60.0,
            speed: 95.0,
            contact_damage: 18.0,
            ranged_damage: 6.0,
            projectile_speed: 300.0,
            fire_cooldown: 1.8,
            preferred_range: 30.0,
        },
        EnemyKind::Heavy => EnemyTemplate {
            radius: 22.0,
            health: 160.0,
            speed: 62.0,
            contact_damage: 30.0,
            ranged_damage: 10.0,
            projectile_speed: 260.0,
            fire_cooldown: 2.4,
            preferred_range: 40.0,
        },
        EnemyKind::Sniper => EnemyTemplate {
            radius: 13.0,
            health: 45.0,
            speed: 80.0,
            contact_damage: 10.0,
            ranged_damage: 12.0,
            projectile_speed: 420.0,
            fire_cooldown: 1.5,
            preferred_range: 260.0,
        },
    }
}

/// Difficulty tier for an elapsed match time
#[inline]
pub fn wave_index(elapsed: f32) -> u32 {
    (elapsed.max(0.0) / WAVE_SECONDS).floor() as u32
}

/// Stat multiplier for a wave
#[inline]
pub fn wave_scale(wave: u32) -> f32 {
    1.0 + wave as f32 * WAVE_SCALE_STEP
}

/// Map a uniform roll in `[0, 1)` to a variant
pub fn kind_for_roll(roll: f32) -> EnemyKind {
    if roll < 0.25 {
        EnemyKind::Heavy
    } else if roll < 0.48 {
        EnemyKind::Sniper
    } else {
        EnemyKind::Basic
    }
}

/// Seconds until the next spawn, before jitter
pub fn spawn_interval(elapsed: f32) -> f32 {
    (SPAWN_BASE_INTERVAL - elapsed * SPAWN_INTERVAL_DECAY).max(SPAWN_MIN_INTERVAL)
}

/// Random point just outside one of the four arena edges
fn edge_position(battle: &mut Battle) -> Vec2 {
    let (w, h) = (battle.arena.width, battle.arena.height);
    let edge = battle.rng.random_range(0..4u32);
    let t: f32 = battle.rng.random();
    match edge {
        0 => Vec2::new(t * w, -SPAWN_MARGIN),
        1 => Vec2::new(w + SPAWN_MARGIN, t * h),
        2 => Vec2::new(t * w, h + SPAWN_MARGIN),
        _ => Vec2::new(-SPAWN_MARGIN, t * h),
    }
}

/// Create one enemy and add it to the battle
pub fn spawn_enemy(battle: &mut Battle) {
    let pos = edge_position(battle);
    let roll: f32 = battle.rng.random();
    let kind = kind_for_roll(roll);
    let wave = wave_index(battle.elapsed);
    let scale = wave_scale(wave);
    let t = template(kind);
    let first_shot: f32 = battle.rng.random();

    let id = battle.next_enemy_id();
    let health = t.health * scale;
    battle.enemies.push(Enemy {
        id,
        kind,
        pos,
        radius: t.radius,
        health,
        max_health: health,
        speed: t.speed * scale,
        contact_damage: t.contact_damage * scale,
        ranged_damage: t.ranged_damage * scale,
        projectile_speed: t.projectile_speed,
        fire_cooldown: t.fire_cooldown,
        fire_timer: t.fire_cooldown * (0.5 + first_shot * 0.5),
        preferred_range: t.preferred_range,
    });

    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}) wave {}",
        kind.as_str(),
        id,
        pos.x,
        pos.y,
        wave
    );
}

/// Spawn when the countdown runs out, then schedule the next one
pub fn update_spawner(battle: &mut Battle, dt: f32) {
    battle.spawn_timer -= dt;
    if battle.spawn_timer <= 0.0 {
        spawn_enemy(battle);
        let jitter: f32 = battle.rng.random();
        battle.spawn_timer = spawn_interval(battle.elapsed) + jitter * SPAWN_JITTER;
    }
}
