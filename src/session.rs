//! Match state machine and frame pacing
//!
//! A `Session` is the single owner of the live battle, the input record and
//! the profile. Hosts call `frame` once per display refresh; the accumulator
//! turns variable wall-clock deltas into whole fixed ticks.

use crate::consts::{MAX_FRAME_DT, SIM_DT};
use crate::profile::{Profile, ShopError};
use crate::settings::Settings;
use crate::sim::{self, Battle, EdgeLatch, Mode, TickInput};

/// Damage flash decay per frame
const FLASH_DECAY: f32 = 0.85;

/// Most ticks one `advance_time` call will run (one hour of play)
pub const MAX_ADVANCE_STEPS: u32 = 60 * 60 * 60;

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Battle(Mode),
}

/// Owns everything one player session needs
#[derive(Debug)]
pub struct Session {
    pub profile: Profile,
    pub settings: Settings,
    /// Latest input; each tick reads a copy
    pub input: TickInput,
    battle: Option<Battle>,
    accumulator: f32,
    base_seed: u64,
    matches_started: u64,
    pull_latch: EdgeLatch,
    /// Presentation only: 1.0 right after the player is hurt, decays to 0
    damage_flash: f32,
    profile_dirty: bool,
}

impl Session {
    pub fn new(profile: Profile, settings: Settings, seed: u64) -> Self {
        Self {
            profile,
            settings,
            input: TickInput::default(),
            battle: None,
            accumulator: 0.0,
            base_seed: seed,
            matches_started: 0,
            pull_latch: EdgeLatch::default(),
            damage_flash: 0.0,
            profile_dirty: false,
        }
    }

    pub fn screen(&self) -> Screen {
        match &self.battle {
            Some(battle) => Screen::Battle(battle.mode),
            None => Screen::Menu,
        }
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn damage_flash(&self) -> f32 {
        self.damage_flash
    }

    /// True once after the profile changed and should be persisted
    pub fn take_profile_dirty(&mut self) -> bool {
        std::mem::take(&mut self.profile_dirty)
    }

    /// Build a fresh battle from the profile's current selection and level
    pub fn start_battle(&mut self) {
        let (archetype, level) = self.profile.loadout();
        let seed = self
            .base_seed
            .wrapping_add(self.matches_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.matches_started += 1;

        self.battle = Some(Battle::new(archetype, level, seed));
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.pull_latch = EdgeLatch::default();
        self.damage_flash = 0.0;
        log::info!("Battle started: {} lv{} seed {}", archetype.name, level, seed);
    }

    /// Game over -> new battle. Ignored in any other state.
    pub fn restart(&mut self) -> bool {
        if self.screen() != Screen::Battle(Mode::GameOver) {
            return false;
        }
        self.start_battle();
        true
    }

    /// Leave the battle (if any) and return to the menu
    pub fn exit_to_menu(&mut self) {
        if let Some(mut battle) = self.battle.take() {
            self.bank_reward(&mut battle);
            log::info!("Returned to menu after {:.1}s", battle.elapsed);
        }
        self.accumulator = 0.0;
    }

    /// Battle <-> paused
    pub fn toggle_pause(&mut self) {
        if let Some(battle) = self.battle.as_mut() {
            battle.toggle_pause();
            self.accumulator = 0.0;
            log::info!("Mode: {:?}", battle.mode);
        }
    }

    /// Feed the gem pull button; honors the toggle setting
    pub fn set_pull(&mut self, held: bool) {
        let pressed = self.pull_latch.rising(held);
        if self.settings.toggle_pull {
            if pressed {
                self.input.pull = !self.input.pull;
            }
        } else {
            self.input.pull = held;
        }
    }

    /// Run as many fixed ticks as the clamped wall-clock delta allows
    ///
    /// Returns the number of ticks taken.
    pub fn frame(&mut self, wall_dt: f32) -> u32 {
        self.damage_flash *= FLASH_DECAY;
        if self.damage_flash < 0.01 {
            self.damage_flash = 0.0;
        }

        let Some(mode) = self.battle.as_ref().map(|b| b.mode) else {
            return 0;
        };
        if mode != Mode::Battle {
            return 0;
        }

        let wall_dt = if wall_dt.is_finite() { wall_dt } else { 0.0 };
        self.accumulator += wall_dt.clamp(0.0, MAX_FRAME_DT);
        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            self.step();
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        steps
    }

    /// Advance simulated time by `ms` milliseconds in fixed ticks
    ///
    /// Equivalent to calling `sim::advance` once per tick with the current
    /// input held constant. Non-finite `ms` runs nothing and the tick count
    /// is capped at `MAX_ADVANCE_STEPS`. Returns the number of ticks taken.
    pub fn advance_time(&mut self, ms: f64) -> u32 {
        if !ms.is_finite() {
            return 0;
        }
        let steps = (ms.max(0.0) / (f64::from(SIM_DT) * 1000.0))
            .round()
            .min(f64::from(MAX_ADVANCE_STEPS)) as u32;
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// JSON snapshot of the current screen for automation
    pub fn render_game_to_text(&self) -> String {
        match &self.battle {
            Some(battle) => sim::render_game_to_text(battle),
            None => serde_json::json!({
                "mode": "Menu",
                "coins": self.profile.coins,
                "selected": self.profile.selected_character,
            })
            .to_string(),
        }
    }

    pub fn unlock(&mut self, id: &str) -> Result<(), ShopError> {
        self.profile.unlock(id)?;
        self.profile_dirty = true;
        Ok(())
    }

    pub fn upgrade_level(&mut self, id: &str) -> Result<u32, ShopError> {
        let level = self.profile.upgrade_level(id)?;
        self.profile_dirty = true;
        Ok(level)
    }

    pub fn select_character(&mut self, id: &str) -> Result<(), ShopError> {
        self.profile.select_character(id)?;
        self.profile_dirty = true;
        Ok(())
    }

    /// One fixed tick on a snapshot of the input record
    fn step(&mut self) {
        let input = self.input.clone();
        let Some(mut battle) = self.battle.take() else {
            return;
        };

        let health_before = battle.player.health;
        sim::advance(&mut battle, &input, SIM_DT);
        if battle.player.health < health_before && self.settings.effective_damage_flash() {
            self.damage_flash = 1.0;
        }

        self.bank_reward(&mut battle);
        self.battle = Some(battle);
    }

    fn bank_reward(&mut self, battle: &mut Battle) {
        if let Some(reward) = battle.pending_reward.take() {
            self.profile.apply_reward(&reward);
            self.profile_dirty = true;
            log::info!(
                "Banked {} coins (total {}, high score {})",
                reward.coins,
                self.profile.coins,
                self.profile.high_score
            );
        }
    }
}
