//! Dino Run entry point
//!
//! Runs the game headless: a scripted platform plays the game while the text
//! renderer logs frames. Usage: `dino-run [settings.json]`.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use dino_run::platform::ScriptedPlatform;
use dino_run::renderer::TextRenderer;
use dino_run::settings::SEED_ENV_VAR;
use dino_run::{App, ConfigError, Settings};

/// Text grid size and how often a frame is logged
const TEXT_COLUMNS: usize = 80;
const TEXT_ROWS: usize = 24;
const LOG_EVERY_FRAMES: u64 = 120;

fn main() {
    env_logger::init();
    log::info!("Dino Run (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("dino-run: {err}");
        std::process::exit(1);
    }

    println!("Thanks for playing Dino Run!");
}

fn run() -> Result<(), ConfigError> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let seed_override = std::env::var(SEED_ENV_VAR).ok();
    let settings = Settings::load(path.as_deref())?.with_seed_override(seed_override.as_deref())?;
    log::info!(
        "Seed {}, playfield {}x{}, {:.0}s demo",
        settings.seed,
        settings.playfield.width,
        settings.playfield.height,
        settings.demo_seconds
    );

    let mut platform = ScriptedPlatform::new(settings.seed, settings.demo_seconds);
    let shutdown = platform.shutdown_flag();
    // SIGINT/SIGTERM close the window, so the loop ends through Quit and the
    // platform is released on the way out
    if let Err(err) = ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst)) {
        log::warn!("Could not install signal handler: {err}");
    }
    let mut renderer = TextRenderer::new(TEXT_COLUMNS, TEXT_ROWS, LOG_EVERY_FRAMES);
    let mut app = App::new(&settings);
    app.run(&mut platform, &mut renderer);

    let session = &app.state().session;
    match session.last_run {
        Some(last) => println!(
            "Last run: score {}, {} obstacles dodged, survived {:.1}s",
            last.score, last.obstacles_dodged, last.survived_secs
        ),
        None => println!(
            "Score {}, {} obstacles dodged, no crashes",
            session.score, session.obstacles_dodged
        ),
    }
    Ok(())
}
