//! Structured text snapshot of a battle for automation and debugging
//!
//! Coordinates: origin top-left, +x right, +y down.

use serde::Serialize;

use super::state::{Battle, Mode, Owner};

#[derive(Debug, Serialize)]
struct PlayerView {
    character: &'static str,
    level: u32,
    x: f32,
    y: f32,
    r: f32,
    hp: f32,
    max_hp: f32,
    charge: f32,
    dashing: bool,
}

#[derive(Debug, Serialize)]
struct EnemyView {
    id: u32,
    kind: &'static str,
    x: f32,
    y: f32,
    r: f32,
    hp: f32,
}

#[derive(Debug, Serialize)]
struct ProjectileView {
    id: u32,
    owner: Owner,
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct GemView {
    id: u32,
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct SnapshotView {
    coordinates: &'static str,
    mode: Mode,
    elapsed: f32,
    score: u64,
    kills: u32,
    reward_coins: u64,
    player: PlayerView,
    enemies: Vec<EnemyView>,
    projectiles: Vec<ProjectileView>,
    gems: Vec<GemView>,
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

fn build(battle: &Battle) -> SnapshotView {
    let p = &battle.player;
    SnapshotView {
        coordinates: "origin top-left, +x right, +y down",
        mode: battle.mode,
        elapsed: round1(battle.elapsed),
        score: battle.display_score(),
        kills: battle.kills,
        reward_coins: battle.reward_coins,
        player: PlayerView {
            character: p.character_id,
            level: p.level,
            x: round1(p.pos.x),
            y: round1(p.pos.y),
            r: p.radius,
            hp: round1(p.display_health()),
            max_hp: round1(p.max_health),
            charge: round1(p.charge),
            dashing: p.is_dashing(),
        },
        enemies: battle
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                kind: e.kind.as_str(),
                x: round1(e.pos.x),
                y: round1(e.pos.y),
                r: e.radius,
                hp: round1(e.health.max(0.0)),
            })
            .collect(),
        projectiles: battle
            .projectiles
            .iter()
            .map(|s| ProjectileView {
                id: s.id,
                owner: s.owner,
                x: round1(s.pos.x),
                y: round1(s.pos.y),
            })
            .collect(),
        gems: battle
            .gems
            .iter()
            .map(|g| GemView {
                id: g.id,
                x: round1(g.pos.x),
                y: round1(g.pos.y),
            })
            .collect(),
    }
}

/// Serialize mode and entity positions/health/ids to JSON
pub fn render_game_to_text(battle: &Battle) -> String {
    match serde_json::to_string(&build(battle)) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Snapshot serialization failed: {}", e);
            String::from("{}")
        }
    }
}
