//! Playable character archetypes
//!
//! Static roster data shared by the menu and the battle. `scaled_stats` turns
//! an archetype's base stats into the effective stats for a level.

use serde::{Deserialize, Serialize};

/// Highest purchasable level
pub const MAX_LEVEL: u32 = 10;

/// The character every profile owns
pub const STARTER_ID: &str = "ember";

/// Per-level growth
const HEALTH_GROWTH: f32 = 0.12;
const DAMAGE_GROWTH: f32 = 0.10;
const SPEED_PER_LEVEL: f32 = 4.0;
const PROJECTILE_SPEED_PER_LEVEL: f32 = 10.0;
const RANGE_PER_LEVEL: f32 = 8.0;
const COOLDOWN_PER_LEVEL: f32 = 0.006;
/// Cooldown never drops below this fraction of the base value
const COOLDOWN_FLOOR: f32 = 0.5;

/// Combat stats of a character (base or level-scaled)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub max_health: f32,
    /// Pixels per second
    pub move_speed: f32,
    /// Damage per projectile
    pub damage: f32,
    /// Pixels per second
    pub projectile_speed: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    /// Projectile travel distance
    pub range: f32,
    pub special_damage: f32,
}

/// Roster rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// A playable character template
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Archetype {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub rarity: Rarity,
    pub unlock_cost: u64,
    /// Body color (RGB)
    pub color: [f32; 3],
    pub base: CharacterStats,
}

/// The roster, starter first
pub const ARCHETYPES: [Archetype; 4] = [
    Archetype {
        id: STARTER_ID,
        name: "Ember",
        role: "Assault",
        rarity: Rarity::Common,
        unlock_cost: 0,
        color: [1.0, 0.45, 0.2],
        base: CharacterStats {
            max_health: 120.0,
            move_speed: 260.0,
            damage: 18.0,
            projectile_speed: 620.0,
            fire_cooldown: 0.28,
            range: 420.0,
            special_damage: 90.0,
        },
    },
    Archetype {
        id: "bolt",
        name: "Bolt",
        role: "Skirmisher",
        rarity: Rarity::Rare,
        unlock_cost: 640,
        color: [0.95, 0.9, 0.25],
        base: CharacterStats {
            max_health: 95.0,
            move_speed: 300.0,
            damage: 12.0,
            projectile_speed: 820.0,
            fire_cooldown: 0.16,
            range: 380.0,
            special_damage: 70.0,
        },
    },
    Archetype {
        id: "bastion",
        name: "Bastion",
        role: "Tank",
        rarity: Rarity::Epic,
        unlock_cost: 1100,
        color: [0.35, 0.6, 1.0],
        base: CharacterStats {
            max_health: 190.0,
            move_speed: 215.0,
            damage: 26.0,
            projectile_speed: 520.0,
            fire_cooldown: 0.42,
            range: 340.0,
            special_damage: 140.0,
        },
    },
    Archetype {
        id: "wisp",
        name: "Wisp",
        role: "Sniper",
        rarity: Rarity::Legendary,
        unlock_cost: 1600,
        color: [0.75, 0.45, 1.0],
        base: CharacterStats {
            max_health: 85.0,
            move_speed: 245.0,
            damage: 40.0,
            projectile_speed: 980.0,
            fire_cooldown: 0.6,
            range: 620.0,
            special_damage: 110.0,
        },
    },
];

/// Look up an archetype by id
pub fn archetype(id: &str) -> Option<&'static Archetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

/// The starter archetype
pub fn starter() -> &'static Archetype {
    &ARCHETYPES[0]
}

/// Clamp a level into `[1, MAX_LEVEL]`
#[inline]
pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, MAX_LEVEL)
}

/// Cost of going from `level` to `level + 1`
#[inline]
pub fn upgrade_cost(level: u32) -> u64 {
    70 + u64::from(level) * 55
}

/// Effective stats for an archetype at a level (level is clamped first)
pub fn scaled_stats(archetype: &Archetype, level: u32) -> CharacterStats {
    let steps = (clamp_level(level) - 1) as f32;
    let base = &archetype.base;

    CharacterStats {
        max_health: base.max_health * (1.0 + HEALTH_GROWTH * steps),
        move_speed: base.move_speed + SPEED_PER_LEVEL * steps,
        damage: base.damage * (1.0 + DAMAGE_GROWTH * steps),
        projectile_speed: base.projectile_speed + PROJECTILE_SPEED_PER_LEVEL * steps,
        fire_cooldown: (base.fire_cooldown - COOLDOWN_PER_LEVEL * steps)
            .max(base.fire_cooldown * COOLDOWN_FLOOR),
        range: base.range + RANGE_PER_LEVEL * steps,
        special_damage: base.special_damage * (1.0 + DAMAGE_GROWTH * steps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_is_base() {
        for arch in &ARCHETYPES {
            assert_eq!(scaled_stats(arch, 1), arch.base);
        }
    }

    #[test]
    fn test_scaling_is_monotonic() {
        let arch = archetype("bastion").unwrap();
        let mut prev = scaled_stats(arch, 1);
        for level in 2..=MAX_LEVEL {
            let next = scaled_stats(arch, level);
            assert!(next.max_health > prev.max_health);
            assert!(next.damage > prev.damage);
            assert!(next.move_speed > prev.move_speed);
            assert!(next.range > prev.range);
            assert!(next.fire_cooldown <= prev.fire_cooldown);
            prev = next;
        }
    }

    #[test]
    fn test_level_is_clamped() {
        let arch = starter();
        assert_eq!(scaled_stats(arch, 0), scaled_stats(arch, 1));
        assert_eq!(scaled_stats(arch, 99), scaled_stats(arch, MAX_LEVEL));
    }

    #[test]
    fn test_upgrade_cost_grows() {
        assert_eq!(upgrade_cost(1), 125);
        assert_eq!(upgrade_cost(9), 565);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(archetype("bolt").map(|a| a.unlock_cost), Some(640));
        assert!(archetype("nobody").is_none());
        assert_eq!(starter().id, STARTER_ID);
        assert_eq!(starter().unlock_cost, 0);
    }
}
