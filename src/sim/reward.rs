//! End-of-match payout
//!
//! `settle` runs at most once per battle; the resulting `MatchReward` waits in
//! `Battle::pending_reward` until the shell banks it into the profile.

use serde::{Deserialize, Serialize};

use super::state::Battle;
use crate::consts::{
    REWARD_COINS_PER_KILL, REWARD_MIN_COINS, REWARD_SCORE_DIVISOR, WIN_SCORE_THRESHOLD,
};

/// Final tally of one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReward {
    pub coins: u64,
    /// Floored final score
    pub score: u64,
    pub kills: u32,
    /// Final score reached the win threshold
    pub won: bool,
}

/// Coins for a final score and kill count
pub fn payout(score: f32, kills: u32) -> u64 {
    let from_score = (f64::from(score.max(0.0)) / REWARD_SCORE_DIVISOR).floor() as u64;
    (from_score + u64::from(kills) * REWARD_COINS_PER_KILL).max(REWARD_MIN_COINS)
}

/// Compute the reward from the battle's final state, exactly once
///
/// Returns `None` if the battle was already settled.
pub fn settle(battle: &mut Battle) -> Option<MatchReward> {
    if battle.reward_applied {
        return None;
    }
    battle.reward_applied = true;

    let score = battle.display_score();
    let reward = MatchReward {
        coins: payout(battle.score, battle.kills),
        score,
        kills: battle.kills,
        won: score >= WIN_SCORE_THRESHOLD,
    };
    battle.reward_coins = reward.coins;
    battle.pending_reward = Some(reward);

    log::info!(
        "Match settled: score={} kills={} coins={} won={}",
        reward.score,
        reward.kills,
        reward.coins,
        reward.won
    );
    Some(reward)
}
