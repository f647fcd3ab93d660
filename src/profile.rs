//! Player profile: coins, roster ownership and character levels
//!
//! Persisted as JSON (LocalStorage on web, a file on native). Whatever comes
//! back from storage is sanitized into a valid profile instead of rejected.

use std::collections::{BTreeMap, BTreeSet};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{self, ARCHETYPES, MAX_LEVEL, STARTER_ID};
use crate::sim::MatchReward;

/// Why a shop action was refused. The profile is untouched in every case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("unknown character '{0}'")]
    UnknownCharacter(String),
    #[error("'{0}' is already unlocked")]
    AlreadyUnlocked(String),
    #[error("'{0}' is locked")]
    Locked(String),
    #[error("not enough coins (need {needed}, have {available})")]
    InsufficientCoins { needed: u64, available: u64 },
    #[error("'{0}' is already at max level")]
    MaxLevel(String),
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile io: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile encode: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable player record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub coins: u64,
    pub selected_character: String,
    pub unlocked: BTreeSet<String>,
    /// Level per catalog character, always in `[1, MAX_LEVEL]`
    pub levels: BTreeMap<String, u32>,
    pub matches_played: u32,
    pub wins: u32,
    pub high_score: u64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            coins: 0,
            selected_character: STARTER_ID.to_string(),
            unlocked: BTreeSet::from([STARTER_ID.to_string()]),
            levels: ARCHETYPES.iter().map(|a| (a.id.to_string(), 1)).collect(),
            matches_played: 0,
            wins: 0,
            high_score: 0,
        }
    }
}

/// Non-negative integer from any JSON number (floats floored, negatives zeroed)
fn count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| match n.as_f64() {
            Some(f) if f.is_finite() && f > 0.0 => f.floor() as u64,
            _ => 0,
        }),
        _ => 0,
    }
}

impl Profile {
    /// Parse stored JSON, repairing anything malformed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::sanitize(&value),
            Err(e) => {
                log::warn!("Profile JSON unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Coerce an arbitrary JSON value into a valid profile
    ///
    /// Unknown character ids are dropped, missing or out-of-range levels
    /// become valid levels, the starter is always unlocked and an invalid
    /// selection falls back to the starter.
    pub fn sanitize(value: &Value) -> Self {
        let mut profile = Self::default();
        let Some(obj) = value.as_object() else {
            log::warn!("Profile is not an object, using defaults");
            return profile;
        };

        profile.coins = count(obj.get("coins"));
        profile.matches_played = count(obj.get("matches_played")).min(u64::from(u32::MAX)) as u32;
        profile.wins = count(obj.get("wins")).min(u64::from(u32::MAX)) as u32;
        profile.high_score = count(obj.get("high_score"));

        if let Some(list) = obj.get("unlocked").and_then(Value::as_array) {
            for id in list.iter().filter_map(Value::as_str) {
                if catalog::archetype(id).is_some() {
                    profile.unlocked.insert(id.to_string());
                } else {
                    log::warn!("Dropping unknown unlocked character '{}'", id);
                }
            }
        }

        if let Some(levels) = obj.get("levels").and_then(Value::as_object) {
            for (id, level) in levels {
                if let Some(slot) = profile.levels.get_mut(id.as_str()) {
                    let raw = count(Some(level)).min(u64::from(MAX_LEVEL)) as u32;
                    *slot = catalog::clamp_level(raw);
                }
            }
        }

        if let Some(selected) = obj.get("selected_character").and_then(Value::as_str)
            && profile.unlocked.contains(selected)
        {
            profile.selected_character = selected.to_string();
        }

        profile
    }

    /// Serialize for storage
    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Level of a character (1 for anything unknown)
    pub fn level_of(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(1)
    }

    /// Archetype and level the next battle should use
    pub fn loadout(&self) -> (&'static catalog::Archetype, u32) {
        let arch = catalog::archetype(&self.selected_character).unwrap_or_else(catalog::starter);
        (arch, self.level_of(arch.id))
    }

    /// Buy a character
    pub fn unlock(&mut self, id: &str) -> Result<(), ShopError> {
        let arch =
            catalog::archetype(id).ok_or_else(|| ShopError::UnknownCharacter(id.to_string()))?;
        if self.is_unlocked(id) {
            return Err(ShopError::AlreadyUnlocked(id.to_string()));
        }
        if self.coins < arch.unlock_cost {
            return Err(ShopError::InsufficientCoins {
                needed: arch.unlock_cost,
                available: self.coins,
            });
        }

        self.coins -= arch.unlock_cost;
        self.unlocked.insert(id.to_string());
        log::info!("Unlocked {} for {} coins", arch.name, arch.unlock_cost);
        Ok(())
    }

    /// Raise a character's level by one; returns the new level
    pub fn upgrade_level(&mut self, id: &str) -> Result<u32, ShopError> {
        let arch =
            catalog::archetype(id).ok_or_else(|| ShopError::UnknownCharacter(id.to_string()))?;
        let level = self.level_of(id);
        if level >= MAX_LEVEL {
            return Err(ShopError::MaxLevel(id.to_string()));
        }
        let cost = catalog::upgrade_cost(level);
        if self.coins < cost {
            return Err(ShopError::InsufficientCoins {
                needed: cost,
                available: self.coins,
            });
        }

        self.coins -= cost;
        self.levels.insert(id.to_string(), level + 1);
        log::info!("{} upgraded to level {} for {} coins", arch.name, level + 1, cost);
        Ok(level + 1)
    }

    /// Choose the character for the next battle
    pub fn select_character(&mut self, id: &str) -> Result<(), ShopError> {
        if catalog::archetype(id).is_none() {
            return Err(ShopError::UnknownCharacter(id.to_string()));
        }
        if !self.is_unlocked(id) {
            return Err(ShopError::Locked(id.to_string()));
        }
        self.selected_character = id.to_string();
        Ok(())
    }

    /// Bank a settled match
    pub fn apply_reward(&mut self, reward: &MatchReward) {
        self.coins = self.coins.saturating_add(reward.coins);
        self.matches_played = self.matches_played.saturating_add(1);
        if reward.won {
            self.wins = self.wins.saturating_add(1);
        }
        self.high_score = self.high_score.max(reward.score);
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arena_brawl_profile";

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
        {
            log::info!("Loaded profile from LocalStorage");
            return Self::from_json(&json);
        }

        log::info!("No profile found, starting fresh");
        Self::default()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Profile saved ({} coins)", self.coins);
                }
                Err(e) => log::warn!("Profile not saved: {}", e),
            }
        }
    }

    /// Load the profile from a JSON file; a missing file yields a fresh profile
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self, ProfileError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(Self::from_json(&json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No profile at {}, starting fresh", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the profile to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<(), ProfileError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Profile saved to {} ({} coins)", path.display(), self.coins);
        Ok(())
    }
}
