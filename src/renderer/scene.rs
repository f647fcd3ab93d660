//! Builds a frame's vertex list from a read-only battle view

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, rgba};
use crate::consts::CHARGE_MAX;
use crate::settings::Settings;
use crate::sim::{Arena, Battle, Enemy, Gem, Mode, Player, Projectile};

/// Immutable window onto the parts of a battle the painter needs
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub arena: &'a Arena,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub gems: &'a [Gem],
    pub mode: Mode,
    pub score: u64,
    pub kills: u32,
    pub elapsed: f32,
}

impl<'a> RenderView<'a> {
    pub fn new(battle: &'a Battle) -> Self {
        Self {
            arena: &battle.arena,
            player: &battle.player,
            enemies: &battle.enemies,
            projectiles: &battle.projectiles,
            gems: &battle.gems,
            mode: battle.mode,
            score: battle.display_score(),
            kills: battle.kills,
            elapsed: battle.elapsed,
        }
    }
}

/// Paint order: floor, obstacles, gems, enemies, shots, player, HUD, flash
pub fn build_scene(view: &RenderView<'_>, settings: &Settings, damage_flash: f32) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut out = Vec::new();

    out.extend(shapes::rect(Vec2::ZERO, view.arena.size(), colors::BACKGROUND));

    let obstacle_color = if settings.high_contrast {
        colors::OBSTACLE_HIGH_CONTRAST
    } else {
        colors::OBSTACLE
    };
    for o in &view.arena.obstacles {
        out.extend(shapes::obstacle(o, obstacle_color));
    }

    for gem in view.gems {
        // Fade out over the last two seconds
        let alpha = (gem.ttl / 2.0).clamp(0.25, 1.0);
        let mut color = colors::GEM;
        color[3] = alpha;
        out.extend(shapes::circle(gem.pos, gem.radius, color, 6));
    }

    for enemy in view.enemies {
        let color = rgba(enemy.kind.color(), 1.0);
        out.extend(shapes::circle(enemy.pos, enemy.radius, color, segments));
        if enemy.health < enemy.max_health {
            out.extend(shapes::bar(
                enemy.pos - Vec2::new(0.0, enemy.radius + 6.0),
                enemy.radius * 2.0,
                3.0,
                enemy.health / enemy.max_health,
                colors::BAR_BACK,
                colors::HEALTH,
            ));
        }
    }

    for shot in view.projectiles {
        out.extend(shapes::circle(shot.pos, shot.radius, rgba(shot.color, 1.0), 8));
    }

    let player = view.player;
    out.extend(shapes::circle(player.pos, player.radius, rgba(player.color, 1.0), segments));
    if player.is_dashing() {
        out.extend(shapes::ring(
            player.pos,
            player.radius + 2.0,
            player.radius + 5.0,
            colors::DASH_RING,
            segments,
        ));
    }

    if settings.show_hud {
        let width = player.radius * 2.6;
        out.extend(shapes::bar(
            player.pos - Vec2::new(0.0, player.radius + 10.0),
            width,
            4.0,
            player.display_health() / player.max_health,
            colors::BAR_BACK,
            colors::HEALTH,
        ));
        let charge_color = if player.charge >= CHARGE_MAX {
            colors::CHARGE_FULL
        } else {
            colors::CHARGE
        };
        out.extend(shapes::bar(
            player.pos - Vec2::new(0.0, player.radius + 5.0),
            width,
            3.0,
            player.charge / CHARGE_MAX,
            colors::BAR_BACK,
            charge_color,
        ));
    }

    if damage_flash > 0.0 && settings.effective_damage_flash() {
        let mut color = colors::DAMAGE_FLASH;
        color[3] *= damage_flash;
        out.extend(shapes::rect(Vec2::ZERO, view.arena.size(), color));
    }

    out
}
