//! Fixed timestep simulation tick
//!
//! Core game loop that advances a battle deterministically. Step order
//! decides which entity wins simultaneous interactions, so keep it stable.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_against_obstacles;
use super::input::TickInput;
use super::reward;
use super::spawn::update_spawner;
use super::state::{Battle, Enemy, Gem, Mode, Owner, Projectile};
use crate::consts::*;
use crate::{circles_overlap, clamp_to_bounds, distance};

const PLAYER_SHOT_COLOR: [f32; 3] = [1.0, 0.95, 0.6];
const ENEMY_SHOT_COLOR: [f32; 3] = [1.0, 0.35, 0.3];

/// Advance the battle by one fixed timestep
///
/// Paused and finished battles are left untouched.
pub fn advance(state: &mut Battle, input: &TickInput, dt: f32) {
    if state.mode != Mode::Battle {
        return;
    }

    state.elapsed += dt;
    update_spawner(state, dt);

    move_player(state, input, dt);
    fire_player(state, input);
    trigger_special(state, input);
    update_projectiles(state, dt);
    update_enemies(state, dt);
    update_gems(state, input, dt);

    state.score += SCORE_PER_SECOND * dt;

    if state.player.health <= 0.0 {
        state.player.health = 0.0;
        state.mode = Mode::GameOver;
        log::info!(
            "Game over at {:.1}s: score {} kills {}",
            state.elapsed,
            state.display_score(),
            state.kills
        );
        reward::settle(state);
    }
}

/// Apply movement intent, cooldowns, dash and obstacle resolution
fn move_player(state: &mut Battle, input: &TickInput, dt: f32) {
    let arena_size = state.arena.size();
    let player = &mut state.player;

    let dir = input.move_dir();
    if dir != Vec2::ZERO {
        player.last_move = dir;
    }

    player.attack_cooldown = (player.attack_cooldown - dt).max(0.0);
    player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
    player.dash_timer = (player.dash_timer - dt).max(0.0);

    if player.dash_latch.rising(input.dash) && player.dash_cooldown <= 0.0 {
        player.dash_timer = DASH_DURATION;
        player.dash_cooldown = DASH_COOLDOWN;
    }

    let speed = if player.is_dashing() {
        player.stats.move_speed * DASH_SPEED_MULT
    } else {
        player.stats.move_speed
    };

    let pos = clamp_to_bounds(player.pos + dir * speed * dt, player.radius, arena_size);
    player.pos = resolve_against_obstacles(pos, player.radius, &state.arena.obstacles);
}

/// Aim and shoot when the attack is held and off cooldown
fn fire_player(state: &mut Battle, input: &TickInput) {
    let player = &mut state.player;

    let aim = input
        .pointer
        .map(|p| p - player.pos)
        .filter(|v| v.length_squared() > 0.0)
        .map(|v| v.normalize())
        .unwrap_or(player.last_move);
    player.last_aim = aim;

    if !input.attack || player.attack_cooldown > 0.0 {
        return;
    }

    let stats = player.stats;
    let origin = player.pos + aim * (player.radius + MUZZLE_OFFSET);
    player.attack_cooldown = stats.fire_cooldown;

    state.spawn_projectile(
        Owner::Player,
        origin,
        aim * stats.projectile_speed,
        PLAYER_PROJECTILE_RADIUS,
        stats.damage,
        stats.range / stats.projectile_speed,
        PLAYER_SHOT_COLOR,
    );
}

/// Area blast around the player, gated by a full charge meter
fn trigger_special(state: &mut Battle, input: &TickInput) {
    let player = &mut state.player;
    if !player.special_latch.rising(input.special) || player.charge < CHARGE_MAX {
        return;
    }

    player.charge = 0.0;
    let center = player.pos;
    let damage = player.stats.special_damage;
    let mut struck = 0;
    for enemy in state
        .enemies
        .iter_mut()
        .filter(|e| distance(e.pos, center) <= SPECIAL_RADIUS)
    {
        enemy.health -= damage;
        struck += 1;
    }
    log::debug!("Special blast hit {} enemies", struck);
}

/// Integrate shots and resolve hits
fn update_projectiles(state: &mut Battle, dt: f32) {
    let projectiles = std::mem::take(&mut state.projectiles);
    let mut survivors: Vec<Projectile> = Vec::with_capacity(projectiles.len());

    for mut shot in projectiles {
        shot.pos += shot.vel * dt;
        shot.ttl -= dt;

        let off_arena = !state.arena.contains_point(shot.pos);
        if shot.ttl <= 0.0 || off_arena || state.arena.blocked(shot.pos) {
            continue;
        }

        match shot.owner {
            Owner::Enemy => {
                let player = &mut state.player;
                if circles_overlap(shot.pos, shot.radius, player.pos, player.radius) {
                    player.health -= shot.damage;
                    continue;
                }
            }
            Owner::Player => {
                // First overlapping enemy in iteration order takes the hit,
                // even one already dropped to zero earlier this tick
                let target = state
                    .enemies
                    .iter_mut()
                    .find(|e| circles_overlap(shot.pos, shot.radius, e.pos, e.radius));
                if let Some(enemy) = target {
                    enemy.health -= shot.damage;
                    state.player.add_charge(CHARGE_PER_HIT);
                    continue;
                }
            }
        }

        survivors.push(shot);
    }

    state.projectiles = survivors;
}

/// Chase, shoot, contact damage and death
fn update_enemies(state: &mut Battle, dt: f32) {
    let enemies = std::mem::take(&mut state.enemies);
    let mut survivors: Vec<Enemy> = Vec::with_capacity(enemies.len());
    let arena_size = state.arena.size();

    for mut enemy in enemies {
        let player_pos = state.player.pos;

        let to_player = player_pos - enemy.pos;
        if to_player.length() > enemy.preferred_range {
            enemy.pos += to_player.normalize_or_zero() * enemy.speed * dt;
        }
        enemy.pos = clamp_to_bounds(enemy.pos, enemy.radius, arena_size);

        let to_player = player_pos - enemy.pos;
        let dist = to_player.length();
        let dir = to_player.normalize_or_zero();

        enemy.fire_timer -= dt;
        if enemy.fire_timer <= 0.0 && dist <= enemy.preferred_range + ENEMY_FIRE_BUFFER {
            state.spawn_projectile(
                Owner::Enemy,
                enemy.pos + dir * (enemy.radius + MUZZLE_OFFSET),
                dir * enemy.projectile_speed,
                ENEMY_PROJECTILE_RADIUS,
                enemy.ranged_damage,
                ENEMY_PROJECTILE_TTL,
                ENEMY_SHOT_COLOR,
            );
            let jitter: f32 = state.rng.random();
            enemy.fire_timer = enemy.fire_cooldown + jitter * ENEMY_FIRE_JITTER;
        }

        if dist <= enemy.radius + state.player.radius + ENEMY_CONTACT_BUFFER {
            state.player.health -= enemy.contact_damage * dt;
        }

        if enemy.health <= 0.0 {
            state.kills += 1;
            state.score += KILL_SCORE;
            state.spawn_gem(enemy.pos);
            continue;
        }

        survivors.push(enemy);
    }

    state.enemies = survivors;
}

/// Magnetize and collect gems
fn update_gems(state: &mut Battle, input: &TickInput, dt: f32) {
    let gems = std::mem::take(&mut state.gems);
    let mut survivors: Vec<Gem> = Vec::with_capacity(gems.len());

    let (attract_radius, magnet_speed) = if input.pull {
        (GEM_PULL_RADIUS, GEM_PULL_SPEED)
    } else {
        (GEM_MAGNET_RADIUS, GEM_MAGNET_SPEED)
    };

    for mut gem in gems {
        gem.ttl -= dt;
        if gem.ttl <= 0.0 {
            continue;
        }

        let player = &mut state.player;
        let dist = distance(gem.pos, player.pos);
        let touching = dist <= gem.radius + player.radius;
        if dist <= attract_radius && !touching {
            let step = (magnet_speed * dt).min(dist);
            gem.pos += (player.pos - gem.pos).normalize_or_zero() * step;
        }

        if circles_overlap(gem.pos, gem.radius, player.pos, player.radius) {
            state.score += GEM_SCORE;
            player.add_charge(CHARGE_PER_GEM);
            player.heal(GEM_HEAL);
            continue;
        }

        survivors.push(gem);
    }

    state.gems = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{archetype, starter};
    use crate::sim::arena::{Arena, Obstacle};
    use crate::sim::collision::point_rect_distance;
    use crate::sim::state::EnemyKind;

    const EPS: f32 = 1e-3;

    /// Battle on an open arena with spawning pushed far out
    fn quiet_battle() -> Battle {
        let mut battle = Battle::with_arena(Arena::open(960.0, 540.0), starter(), 1, 42);
        battle.spawn_timer = 1.0e6;
        battle
    }

    fn dummy_enemy(battle: &mut Battle, pos: Vec2, health: f32) -> u32 {
        let id = battle.next_enemy_id();
        battle.enemies.push(Enemy {
            id,
            kind: EnemyKind::Heavy,
            pos,
            radius: 22.0,
            health,
            max_health: health,
            speed: 0.0,
            contact_damage: 0.0,
            ranged_damage: 0.0,
            projectile_speed: 0.0,
            fire_cooldown: 100.0,
            fire_timer: 100.0,
            preferred_range: 1.0e6,
        });
        id
    }

    fn player_shot(battle: &mut Battle, pos: Vec2, damage: f32) {
        battle.spawn_projectile(
            Owner::Player,
            pos,
            Vec2::ZERO,
            PLAYER_PROJECTILE_RADIUS,
            damage,
            5.0,
            PLAYER_SHOT_COLOR,
        );
    }

    #[test]
    fn test_paused_and_game_over_are_frozen() {
        for mode in [Mode::Paused, Mode::GameOver] {
            let mut battle = Battle::new(starter(), 3, 9);
            let input = TickInput {
                right: true,
                attack: true,
                ..Default::default()
            };
            for _ in 0..30 {
                advance(&mut battle, &input, SIM_DT);
            }
            battle.mode = mode;
            let frozen = battle.clone();
            for _ in 0..120 {
                advance(&mut battle, &input, SIM_DT);
            }
            assert_eq!(battle, frozen);
        }
    }

    #[test]
    fn test_player_stops_on_obstacle_boundary() {
        let mut battle = Battle::new(starter(), 1, 1);
        let block = Obstacle::new(280.0, 200.0, 130.0, 90.0);
        assert_eq!(battle.player.pos, Vec2::new(480.0, 270.0));

        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..60 {
            advance(&mut battle, &input, SIM_DT);
        }

        let dist = point_rect_distance(battle.player.pos, &block);
        assert!((dist - battle.player.radius).abs() < EPS);
        assert!((battle.player.pos.x - 430.0).abs() < EPS);
        assert!((battle.player.pos.y - 270.0).abs() < EPS);
    }

    #[test]
    fn test_last_move_persists_when_idle() {
        let mut battle = quiet_battle();
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        advance(&mut battle, &up, SIM_DT);
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert_eq!(battle.player.last_move, Vec2::NEG_Y);
    }

    #[test]
    fn test_dash_is_edge_triggered() {
        let mut battle = quiet_battle();
        let input = TickInput {
            right: true,
            dash: true,
            ..Default::default()
        };
        let start = battle.player.pos.x;
        advance(&mut battle, &input, SIM_DT);
        assert!(battle.player.is_dashing());
        let dashed = battle.player.pos.x - start;
        let expected = battle.player.stats.move_speed * DASH_SPEED_MULT * SIM_DT;
        assert!((dashed - expected).abs() < EPS);

        // Holding the button through the cooldown never re-triggers
        for _ in 0..120 {
            advance(&mut battle, &input, SIM_DT);
        }
        assert!(!battle.player.is_dashing());

        advance(&mut battle, &TickInput::default(), SIM_DT);
        advance(&mut battle, &input, SIM_DT);
        assert!(battle.player.is_dashing());
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut battle = quiet_battle();
        let input = TickInput {
            attack: true,
            pointer: Some(battle.player.pos + Vec2::new(0.0, -100.0)),
            ..Default::default()
        };
        advance(&mut battle, &input, SIM_DT);
        assert_eq!(battle.projectiles.len(), 1);
        let shot = &battle.projectiles[0];
        assert!(shot.vel.y < 0.0 && shot.vel.x.abs() < EPS);
        assert_eq!(shot.owner, Owner::Player);

        // 0.28s cooldown: no new shot on the next few ticks
        for _ in 0..10 {
            advance(&mut battle, &input, SIM_DT);
        }
        assert_eq!(battle.projectiles.len(), 1);
        for _ in 0..10 {
            advance(&mut battle, &input, SIM_DT);
        }
        assert_eq!(battle.projectiles.len(), 2);
    }

    #[test]
    fn test_degenerate_pointer_falls_back_to_last_move() {
        let mut battle = quiet_battle();
        battle.player.last_move = Vec2::NEG_X;
        let input = TickInput {
            attack: true,
            pointer: Some(battle.player.pos),
            ..Default::default()
        };
        advance(&mut battle, &input, SIM_DT);
        assert_eq!(battle.player.last_aim, Vec2::NEG_X);
        assert!(battle.projectiles[0].vel.x < 0.0);
    }

    #[test]
    fn test_projectile_kills_at_most_one_enemy() {
        let mut battle = quiet_battle();
        let spot = Vec2::new(200.0, 100.0);
        let first = dummy_enemy(&mut battle, spot, 760.0);
        dummy_enemy(&mut battle, spot, 760.0);

        for _ in 0..3 {
            player_shot(&mut battle, spot, 440.0);
        }
        advance(&mut battle, &TickInput::default(), SIM_DT);

        // All three land on the first enemy; the one behind it is untouched
        assert_eq!(battle.kills, 1);
        assert_eq!(battle.gems.len(), 1);
        assert_eq!(battle.gems[0].pos, spot);
        assert_eq!(battle.enemies.len(), 1);
        assert_ne!(battle.enemies[0].id, first);
        assert_eq!(battle.enemies[0].health, 760.0);
        assert!(battle.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_dies_on_second_hit() {
        let mut battle = quiet_battle();
        let spot = Vec2::new(200.0, 100.0);
        dummy_enemy(&mut battle, spot, 760.0);

        for _ in 0..3 {
            player_shot(&mut battle, spot, 440.0);
        }
        advance(&mut battle, &TickInput::default(), SIM_DT);

        assert!(battle.enemies.is_empty());
        assert_eq!(battle.kills, 1);
        assert_eq!(battle.gems.len(), 1);
        assert_eq!(battle.gems[0].pos, spot);
        // The third shot still lands on the enemy it overlaps first
        assert!(battle.projectiles.is_empty());
        assert!((battle.player.charge - 3.0 * CHARGE_PER_HIT).abs() < EPS);
        assert!(battle.score >= KILL_SCORE);
    }

    #[test]
    fn test_shot_lands_on_enemy_killed_by_special() {
        let mut battle = quiet_battle();
        let origin = battle.player.pos;
        let doomed = dummy_enemy(&mut battle, origin + Vec2::new(150.0, 0.0), 1.0);
        let behind = dummy_enemy(&mut battle, origin + Vec2::new(185.0, 0.0), 500.0);
        player_shot(&mut battle, origin + Vec2::new(167.0, 0.0), 440.0);

        battle.player.charge = CHARGE_MAX;
        let special = TickInput {
            special: true,
            ..Default::default()
        };
        advance(&mut battle, &special, SIM_DT);

        assert_eq!(battle.kills, 1);
        assert_eq!(battle.enemies.len(), 1);
        assert_eq!(battle.enemies[0].id, behind);
        assert_ne!(battle.enemies[0].id, doomed);
        assert_eq!(battle.enemies[0].health, 500.0);
        assert!(battle.projectiles.is_empty());
        assert!((battle.player.charge - CHARGE_PER_HIT).abs() < EPS);
    }

    #[test]
    fn test_projectiles_blocked_by_obstacles() {
        let mut battle = Battle::new(starter(), 1, 1);
        battle.spawn_timer = 1.0e6;
        battle.spawn_projectile(
            Owner::Player,
            Vec2::new(275.0, 245.0),
            Vec2::new(600.0, 0.0),
            5.0,
            1.0,
            5.0,
            PLAYER_SHOT_COLOR,
        );
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!(battle.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_expires_and_leaves_arena() {
        let mut battle = quiet_battle();
        battle.spawn_projectile(
            Owner::Player,
            Vec2::new(5.0, 5.0),
            Vec2::new(-600.0, 0.0),
            5.0,
            1.0,
            5.0,
            PLAYER_SHOT_COLOR,
        );
        battle.spawn_projectile(
            Owner::Player,
            Vec2::new(500.0, 50.0),
            Vec2::ZERO,
            5.0,
            1.0,
            0.01,
            PLAYER_SHOT_COLOR,
        );
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!(battle.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_shot_damages_player() {
        let mut battle = quiet_battle();
        let hp = battle.player.health;
        let pos = battle.player.pos;
        battle.spawn_projectile(Owner::Enemy, pos, Vec2::ZERO, 6.0, 9.0, 2.0, ENEMY_SHOT_COLOR);
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!((battle.player.health - (hp - 9.0)).abs() < EPS);
        assert!(battle.projectiles.is_empty());
    }

    #[test]
    fn test_sniper_holds_distance() {
        let mut battle = quiet_battle();
        let id = battle.next_enemy_id();
        let start = battle.player.pos + Vec2::new(250.0, 0.0);
        battle.enemies.push(Enemy {
            id,
            kind: EnemyKind::Sniper,
            pos: start,
            radius: 13.0,
            health: 45.0,
            max_health: 45.0,
            speed: 80.0,
            contact_damage: 10.0,
            ranged_damage: 12.0,
            projectile_speed: 420.0,
            fire_cooldown: 1.5,
            fire_timer: 0.0,
            preferred_range: 260.0,
        });
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert_eq!(battle.enemies[0].pos, start);
        // In range, so it fired
        assert_eq!(battle.projectiles.len(), 1);
        assert_eq!(battle.projectiles[0].owner, Owner::Enemy);
        assert!(battle.enemies[0].fire_timer >= 1.5);
    }

    #[test]
    fn test_contact_damage_is_monotonic() {
        let mut battle = quiet_battle();
        let id = battle.next_enemy_id();
        let pos = battle.player.pos + Vec2::new(30.0, 0.0);
        battle.enemies.push(Enemy {
            id,
            kind: EnemyKind::Basic,
            pos,
            radius: 14.0,
            health: 60.0,
            max_health: 60.0,
            speed: 95.0,
            contact_damage: 18.0,
            ranged_damage: 6.0,
            projectile_speed: 300.0,
            fire_cooldown: 1.8,
            fire_timer: 0.5,
            preferred_range: 30.0,
        });

        let mut last = battle.player.health;
        for _ in 0..60 {
            advance(&mut battle, &TickInput::default(), SIM_DT);
            assert!(battle.player.health <= last);
            last = battle.player.health;
        }
        assert!(last < battle.player.max_health);
    }

    #[test]
    fn test_special_requires_full_charge() {
        let mut battle = quiet_battle();
        let near = battle.player.pos + Vec2::new(100.0, 0.0);
        let far = battle.player.pos + Vec2::new(300.0, 0.0);
        dummy_enemy(&mut battle, near, 500.0);
        dummy_enemy(&mut battle, far, 500.0);
        let special = TickInput {
            special: true,
            ..Default::default()
        };

        battle.player.charge = 99.0;
        advance(&mut battle, &special, SIM_DT);
        assert_eq!(battle.enemies[0].health, 500.0);

        advance(&mut battle, &TickInput::default(), SIM_DT);
        battle.player.charge = CHARGE_MAX;
        advance(&mut battle, &special, SIM_DT);
        let blast = battle.player.stats.special_damage;
        assert!((battle.enemies[0].health - (500.0 - blast)).abs() < EPS);
        assert_eq!(battle.enemies[1].health, 500.0);
        assert_eq!(battle.player.charge, 0.0);
    }

    #[test]
    fn test_gem_pickup_heals_and_scores() {
        let mut battle = quiet_battle();
        battle.player.health = 50.0;
        let gem_pos = battle.player.pos + Vec2::new(60.0, 0.0);
        battle.spawn_gem(gem_pos);

        for _ in 0..30 {
            advance(&mut battle, &TickInput::default(), SIM_DT);
        }
        assert!(battle.gems.is_empty());
        assert!((battle.player.health - (50.0 + GEM_HEAL)).abs() < EPS);
        assert!((battle.player.charge - CHARGE_PER_GEM).abs() < EPS);
        assert!(battle.score >= GEM_SCORE);
    }

    #[test]
    fn test_pull_widens_attraction() {
        let gem_offset = Vec2::new(200.0, 0.0);

        let mut idle = quiet_battle();
        let start = idle.player.pos + gem_offset;
        idle.spawn_gem(start);
        advance(&mut idle, &TickInput::default(), SIM_DT);
        assert_eq!(idle.gems[0].pos, start);

        let mut pulling = quiet_battle();
        pulling.spawn_gem(start);
        let pull = TickInput {
            pull: true,
            ..Default::default()
        };
        advance(&mut pulling, &pull, SIM_DT);
        assert!(pulling.gems[0].pos.x < start.x);
    }

    #[test]
    fn test_enemy_out_of_range_holds_fire() {
        let mut battle = quiet_battle();
        let pos = battle.player.pos + Vec2::new(400.0, 0.0);
        dummy_enemy(&mut battle, pos, 100.0);
        battle.enemies[0].preferred_range = 100.0;
        battle.enemies[0].fire_timer = 0.0;

        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!(battle.projectiles.is_empty());
        assert!(battle.enemies[0].fire_timer <= 0.0);

        // Once inside range + buffer the overdue shot goes out
        battle.enemies[0].pos = battle.player.pos + Vec2::new(100.0 + ENEMY_FIRE_BUFFER, 0.0);
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert_eq!(battle.projectiles.len(), 1);
        assert_eq!(battle.projectiles[0].owner, Owner::Enemy);
    }

    #[test]
    fn test_enemies_walk_through_obstacles() {
        let mut battle = Battle::new(starter(), 1, 1);
        battle.spawn_timer = 1.0e6;
        let inside = Vec2::new(345.0, 245.0);
        assert!(battle.arena.blocked(inside));
        dummy_enemy(&mut battle, inside, 100.0);
        battle.enemies[0].speed = 95.0;
        battle.enemies[0].preferred_range = 30.0;

        advance(&mut battle, &TickInput::default(), SIM_DT);
        let enemy = &battle.enemies[0];
        let step = (battle.player.pos - inside).normalize() * 95.0 * SIM_DT;
        assert!((enemy.pos - (inside + step)).length() < EPS);
        assert!(battle.arena.blocked(enemy.pos));
    }

    #[test]
    fn test_spawned_enemy_clamped_on_first_tick() {
        let mut battle = quiet_battle();
        crate::sim::spawn_enemy(&mut battle);
        let start = battle.enemies[0].pos;
        assert!(!battle.arena.contains_point(start));

        advance(&mut battle, &TickInput::default(), SIM_DT);
        let enemy = &battle.enemies[0];
        let (w, h) = (battle.arena.width, battle.arena.height);
        assert!(enemy.pos.x >= enemy.radius - EPS && enemy.pos.x <= w - enemy.radius + EPS);
        assert!(enemy.pos.y >= enemy.radius - EPS && enemy.pos.y <= h - enemy.radius + EPS);
    }

    #[test]
    fn test_gem_heal_capped_at_max_health() {
        let mut battle = quiet_battle();
        let max = battle.player.max_health;
        battle.player.health = max - 1.0;
        battle.spawn_gem(battle.player.pos);

        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!(battle.gems.is_empty());
        assert_eq!(battle.player.health, max);
    }

    #[test]
    fn test_held_special_fires_once() {
        let mut battle = quiet_battle();
        let near = battle.player.pos + Vec2::new(100.0, 0.0);
        dummy_enemy(&mut battle, near, 100_000.0);
        let special = TickInput {
            special: true,
            ..Default::default()
        };

        battle.player.charge = CHARGE_MAX;
        advance(&mut battle, &special, SIM_DT);
        let after_blast = battle.enemies[0].health;
        assert!(after_blast < 100_000.0);

        // Still held: a refilled meter does not trigger another blast
        battle.player.charge = CHARGE_MAX;
        for _ in 0..10 {
            advance(&mut battle, &special, SIM_DT);
        }
        assert_eq!(battle.enemies[0].health, after_blast);
        assert_eq!(battle.player.charge, CHARGE_MAX);
    }

    #[test]
    fn test_gem_expires() {
        let mut battle = quiet_battle();
        battle.spawn_gem(Vec2::new(20.0, 20.0));
        battle.gems[0].ttl = 0.01;
        advance(&mut battle, &TickInput::default(), SIM_DT);
        assert!(battle.gems.is_empty());
    }

    #[test]
    fn test_death_settles_reward_once() {
        let mut battle = quiet_battle();
        battle.score = 900.0;
        battle.kills = 3;
        battle.player.health = 1.0;
        let pos = battle.player.pos;
        battle.spawn_projectile(Owner::Enemy, pos, Vec2::ZERO, 6.0, 50.0, 2.0, ENEMY_SHOT_COLOR);
        advance(&mut battle, &TickInput::default(), SIM_DT);

        assert_eq!(battle.mode, Mode::GameOver);
        assert_eq!(battle.player.health, 0.0);
        assert!(battle.reward_applied);
        let coins = battle.reward_coins;
        assert_eq!(coins, reward::payout(battle.score, 3));
        let pending = battle.pending_reward;
        assert!(pending.is_some());

        for _ in 0..200 {
            advance(&mut battle, &TickInput::default(), SIM_DT);
        }
        assert_eq!(battle.reward_coins, coins);
        assert_eq!(battle.pending_reward, pending);
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let mut battle = Battle::new(archetype("bastion").unwrap(), 10, 77);
        for _ in 0..(60 * 10) {
            advance(&mut battle, &TickInput::default(), SIM_DT);
        }
        assert!(battle.kills + battle.enemies.len() as u32 >= 3);
        let mut ids: Vec<u32> = battle.enemies.iter().map(|e| e.id).collect();
        let before = ids.clone();
        ids.sort_unstable();
        assert_eq!(ids, before);
    }

    #[test]
    fn test_determinism() {
        // Two clones with the same inputs produce identical results
        let mut a = Battle::new(starter(), 4, 99999);
        let inputs = [
            TickInput {
                right: true,
                attack: true,
                pointer: Some(Vec2::new(900.0, 100.0)),
                ..Default::default()
            },
            TickInput {
                down: true,
                dash: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                special: true,
                pull: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        let mut b = a.clone();
        for i in 0..600 {
            let input = &inputs[(i / 50) % inputs.len()];
            advance(&mut a, input, SIM_DT);
            advance(&mut b, input, SIM_DT);
        }
        assert_eq!(a, b);
    }
}
