//! Battle state and core simulation types
//!
//! A `Battle` owns everything one match needs. Cloning it (RNG included)
//! gives an independent copy that replays identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::input::EdgeLatch;
use super::reward::MatchReward;
use crate::catalog::{self, Archetype, CharacterStats};
use crate::consts::*;

/// Current mode of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Active gameplay
    Battle,
    /// Match is paused
    Paused,
    /// Player died; terminal until a new battle is built
    GameOver,
}

/// The player's fighter
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub character_id: &'static str,
    pub level: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Effective stats, fixed for the whole match
    pub stats: CharacterStats,
    pub attack_cooldown: f32,
    pub dash_cooldown: f32,
    /// Remaining dash boost time
    pub dash_timer: f32,
    /// Special meter, 0-100
    pub charge: f32,
    pub last_aim: Vec2,
    pub last_move: Vec2,
    pub dash_latch: EdgeLatch,
    pub special_latch: EdgeLatch,
    pub color: [f32; 3],
}

impl Player {
    pub fn new(archetype: &'static Archetype, level: u32, pos: Vec2) -> Self {
        let level = catalog::clamp_level(level);
        let stats = catalog::scaled_stats(archetype, level);
        Self {
            character_id: archetype.id,
            level,
            pos,
            radius: PLAYER_RADIUS,
            health: stats.max_health,
            max_health: stats.max_health,
            stats,
            attack_cooldown: 0.0,
            dash_cooldown: 0.0,
            dash_timer: 0.0,
            charge: 0.0,
            last_aim: Vec2::X,
            last_move: Vec2::X,
            dash_latch: EdgeLatch::default(),
            special_latch: EdgeLatch::default(),
            color: archetype.color,
        }
    }

    /// Health for display (never negative)
    pub fn display_health(&self) -> f32 {
        self.health.max(0.0)
    }

    pub fn add_charge(&mut self, amount: f32) {
        self.charge = (self.charge + amount).min(CHARGE_MAX);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Melee chaser
    Basic,
    /// Slow, tanky, hits hard up close
    Heavy,
    /// Holds distance and shoots
    Sniper,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Heavy => "heavy",
            EnemyKind::Sniper => "sniper",
        }
    }

    pub fn color(&self) -> [f32; 3] {
        match self {
            EnemyKind::Basic => [0.95, 0.3, 0.35],
            EnemyKind::Heavy => [0.65, 0.2, 0.75],
            EnemyKind::Sniper => [0.2, 0.85, 0.75],
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Damage per second while touching the player
    pub contact_damage: f32,
    /// Damage per shot
    pub ranged_damage: f32,
    pub projectile_speed: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    /// Stops approaching inside this distance
    pub preferred_range: f32,
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub owner: Owner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Seconds left
    pub ttl: f32,
    pub color: [f32; 3],
}

/// A gem dropped by a defeated enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Gem {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub ttl: f32,
}

/// Complete state of one match
#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: Arena,
    pub mode: Mode,
    /// Seconds of simulated play
    pub elapsed: f32,
    /// Real-valued; floored for display and rewards
    pub score: f32,
    pub kills: u32,
    pub spawn_timer: f32,
    pub player: Player,
    /// Active enemies (iteration order = spawn order)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub gems: Vec<Gem>,
    /// Coins earned by this match (set at game over)
    pub reward_coins: u64,
    /// One-shot guard for reward settlement
    pub reward_applied: bool,
    /// Settled reward waiting for the shell to bank it
    pub pending_reward: Option<MatchReward>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_gem_id: u32,
}

impl Battle {
    /// Create a fresh battle on the default arena
    pub fn new(archetype: &'static Archetype, level: u32, seed: u64) -> Self {
        Self::with_arena(Arena::default(), archetype, level, seed)
    }

    /// Create a fresh battle on a custom arena, player at its center
    pub fn with_arena(arena: Arena, archetype: &'static Archetype, level: u32, seed: u64) -> Self {
        let player = Player::new(archetype, level, arena.center());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            mode: Mode::Battle,
            elapsed: 0.0,
            score: 0.0,
            kills: 0,
            spawn_timer: SPAWN_FIRST_DELAY,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            gems: Vec::new(),
            reward_coins: 0,
            reward_applied: false,
            pending_reward: None,
            next_enemy_id: 1,
            next_projectile_id: 1,
            next_gem_id: 1,
        }
    }

    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        id
    }

    /// Allocate a new projectile ID
    pub fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Allocate a new gem ID
    pub fn next_gem_id(&mut self) -> u32 {
        let id = self.next_gem_id;
        self.next_gem_id += 1;
        id
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Flip between battle and paused; other modes are left alone
    pub fn toggle_pause(&mut self) {
        self.mode = match self.mode {
            Mode::Battle => Mode::Paused,
            Mode::Paused => Mode::Battle,
            Mode::GameOver => Mode::GameOver,
        };
    }

    /// Add an enemy-owned or player-owned shot
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_projectile(
        &mut self,
        owner: Owner,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        damage: f32,
        ttl: f32,
        color: [f32; 3],
    ) {
        let id = self.next_projectile_id();
        self.projectiles.push(Projectile {
            id,
            owner,
            pos,
            vel,
            radius,
            damage,
            ttl,
            color,
        });
    }

    /// Drop a gem at a position
    pub fn spawn_gem(&mut self, pos: Vec2) {
        let id = self.next_gem_id();
        self.gems.push(Gem {
            id,
            pos,
            radius: GEM_RADIUS,
            ttl: GEM_TTL,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::starter;

    #[test]
    fn test_new_battle_starts_at_center() {
        let battle = Battle::new(starter(), 1, 7);
        assert_eq!(battle.mode, Mode::Battle);
        assert_eq!(battle.player.pos, battle.arena.center());
        assert_eq!(battle.player.health, starter().base.max_health);
        assert!(battle.enemies.is_empty());
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut battle = Battle::new(starter(), 1, 7);
        let a = battle.next_enemy_id();
        let b = battle.next_enemy_id();
        assert!(b > a);
        battle.spawn_gem(Vec2::ZERO);
        battle.gems.clear();
        battle.spawn_gem(Vec2::ZERO);
        assert_eq!(battle.gems[0].id, 2);
    }

    #[test]
    fn test_toggle_pause() {
        let mut battle = Battle::new(starter(), 1, 7);
        battle.toggle_pause();
        assert_eq!(battle.mode, Mode::Paused);
        battle.toggle_pause();
        assert_eq!(battle.mode, Mode::Battle);
        battle.mode = Mode::GameOver;
        battle.toggle_pause();
        assert_eq!(battle.mode, Mode::GameOver);
    }

    #[test]
    fn test_level_clamped_on_player() {
        let battle = Battle::new(starter(), 42, 1);
        assert_eq!(battle.player.level, catalog::MAX_LEVEL);
    }
}
