//! Arena Brawl entry point
//!
//! On the web this boots the browser host. Natively it runs a scripted
//! headless match and prints the final snapshot:
//!
//! ```text
//! arena-brawl [character] [ms]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use arena_brawl::consts::{ARENA_HEIGHT, ARENA_WIDTH};
    use arena_brawl::sim::TickInput;
    use arena_brawl::{Profile, Session, Settings};
    use glam::Vec2;

    const PROFILE_PATH: &str = "arena_brawl_profile.json";
    const SETTINGS_PATH: &str = "arena_brawl_settings.json";
    const DEFAULT_MS: f64 = 30_000.0;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let character = args.next();
        let ms = args
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(DEFAULT_MS);

        let profile = match Profile::load_from(Path::new(PROFILE_PATH)) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("Profile unreadable ({}), starting fresh", e);
                Profile::default()
            }
        };
        let settings = Settings::load_from(Path::new(SETTINGS_PATH));

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut session = Session::new(profile, settings, seed);

        if let Some(id) = character.as_deref()
            && let Err(e) = session.select_character(id)
        {
            log::warn!("Cannot select {}: {}", id, e);
        }

        session.start_battle();
        // Strafe right while firing at the arena's upper-left corner
        session.input = TickInput {
            right: true,
            attack: true,
            pointer: Some(Vec2::new(ARENA_WIDTH * 0.1, ARENA_HEIGHT * 0.1)),
            ..Default::default()
        };
        let steps = session.advance_time(ms);
        log::info!("Simulated {} ticks", steps);

        println!("{}", session.render_game_to_text());

        session.exit_to_menu();
        if session.take_profile_dirty()
            && let Err(e) = session.profile.save_to(Path::new(PROFILE_PATH))
        {
            log::warn!("Profile not saved: {}", e);
        }
        println!(
            "coins: {}  matches: {}  high score: {}",
            session.profile.coins, session.profile.matches_played, session.profile.high_score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Brawl (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(e) = arena_brawl::platform::web::run() {
        web_sys::console::error_1(&e);
    }
}
