//! Deterministic simulation module
//!
//! All battle logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by the battle)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod input;
pub mod reward;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arena::{Arena, Obstacle};
pub use collision::{CollisionResult, circle_rect_collision, resolve_circle_rect};
pub use input::{EdgeLatch, TickInput};
pub use reward::{MatchReward, payout, settle};
pub use snapshot::render_game_to_text;
pub use spawn::spawn_enemy;
pub use state::{Battle, Enemy, EnemyKind, Gem, Mode, Owner, Player, Projectile};
pub use tick::advance;
