//! Scratch: Sk8er Kat
//!
//! A tile-based side-scrolling platformer. Skratch runs and jumps through
//! block levels, picks up a blaster and shoots his way past blue-collar suits
//! to the right edge of the world.
//!
//! Keys: arrows to run, Space to jump, Ctrl to fire, P to pause,
//! F for the FPS overlay, E to dump entities to the log, Esc or Q to quit.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod input;
mod math;
mod platform;
mod world;

use clap::Parser;
use macroquad::prelude::*;

use config::{Cli, GameConfig};
use game::{hud, variants, GameSession, Outcome};
use input::{Action, Controls};
use platform::{Clock, FrameClock, MacroquadAudio, MacroquadRenderer, Media};
use world::LevelSettings;

fn window_conf(config: &GameConfig) -> Conf {
    Conf {
        window_title: format!("Scratch: Sk8er Kat v{}", VERSION),
        window_width: config.width as i32,
        window_height: config.height as i32,
        window_resizable: false,
        fullscreen: config.fullscreen,
        ..Default::default()
    }
}

fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match GameConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}, using defaults", e);
            GameConfig::default()
        }
    };
    config.apply(&cli);

    macroquad::Window::from_config(window_conf(&config), run(config));
}

async fn run(config: GameConfig) {
    log::info!("=== Scratch: Sk8er Kat v{} ===", VERSION);

    let scale = config.video_scale();
    let settings = LevelSettings::new(scale, config.width as i32, config.height as i32);

    let sound_paths: Vec<String> = variants::SOUND_PATHS
        .iter()
        .map(|p| config.data_dir.join(p).to_string_lossy().into_owned())
        .collect();
    let mut audio = MacroquadAudio::preload(&sound_paths, config.sounds).await;
    let mut renderer = MacroquadRenderer::new();

    let started = {
        let mut media = Media::new(&mut renderer, &mut audio, scale, &config.data_dir);
        GameSession::start(&config.start_level, settings, config.lives, &mut media)
    };
    let mut session = match started {
        Ok(session) => session,
        Err(e) => {
            log::error!("Can't start: {}", e);
            return;
        }
    };

    let mut controls = Controls::new();
    if controls.has_gamepad() {
        log::info!("Gamepad connected");
    }
    let mut clock = FrameClock::new(get_time());
    let mut show_fps = config.show_fps;

    loop {
        clock.update(get_time());
        controls.poll();

        if controls.action_pressed(Action::Quit) {
            break;
        }
        if controls.action_pressed(Action::Pause) {
            session.toggle_pause();
        }
        if controls.action_pressed(Action::ToggleFps) {
            show_fps = !show_fps;
        }
        if controls.action_pressed(Action::DumpEntities) {
            log::debug!("{}", session.describe());
        }

        let outcome = {
            let mut media = Media::new(&mut renderer, &mut audio, scale, &config.data_dir);
            session.step(clock.elapsed_seconds(), &mut controls.snapshot, &mut media)
        };

        clear_background(BLACK);
        session.render(&mut renderer);
        hud::draw(&hud::HudState {
            lives: session.lives(),
            fps: show_fps.then(|| clock.fps()),
            paused: session.is_paused(),
        });
        session.end_frame();

        match outcome {
            Outcome::GameOver => {
                log::info!("Game over on {}", session.level_name());
                break;
            }
            Outcome::Won => {
                log::info!("You win!");
                break;
            }
            Outcome::Playing | Outcome::Restarted => {}
        }

        next_frame().await;
    }
}
