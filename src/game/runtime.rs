//! Game session
//!
//! One level being played: the world, its entities, the player's handle and
//! the lives left. Each frame the caller runs `step` (sort, think, animate),
//! then `render`, then `end_frame` so removals land after drawing.
//!
//! Dying (falling off the world or being flagged removable) costs a life and
//! reloads the level; with no lives left the game is over. Reaching the right
//! edge of the world wins.

use super::variants::Player;
use super::{EntityId, EntityRegistry};
use crate::input::InputSnapshot;
use crate::platform::{Media, Renderer};
use crate::world::{CollisionFlags, Level, LevelError, LevelSettings, TileGrid};

pub const DEFAULT_LIVES: u32 = 9;

/// What a frame step decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    /// The player died and the level was reloaded
    Restarted,
    GameOver,
    Won,
}

pub struct GameSession {
    name: String,
    settings: LevelSettings,
    level: Level,
    registry: EntityRegistry,
    player: EntityId,
    lives: u32,
    paused: bool,
}

/// Load a level into a fresh registry and put the player at the camera's
/// bottom-left corner.
fn build(
    name: &str,
    settings: &LevelSettings,
    media: &mut Media<'_>,
) -> Result<(Level, EntityRegistry, EntityId), LevelError> {
    let mut registry = EntityRegistry::new();
    let level = Level::load(name, settings, media, &mut registry).map_err(|e| {
        log::error!("Couldn't load level {}: {}", name, e);
        e
    })?;

    let mut player = Player::spawn(0.0, level.grid.camera.offset.y() as f32);
    player.load_media(media);
    let player = registry.register(player);
    Ok((level, registry, player))
}

impl GameSession {
    pub fn start(
        name: &str,
        settings: LevelSettings,
        lives: u32,
        media: &mut Media<'_>,
    ) -> Result<Self, LevelError> {
        let (level, registry, player) = build(name, &settings, media)?;
        Ok(Self {
            name: name.to_string(),
            settings,
            level,
            registry,
            player,
            lives,
            paused: false,
        })
    }

    /// Reload the current level from disk. On failure nothing changes.
    pub fn restart(&mut self, media: &mut Media<'_>) -> Result<(), LevelError> {
        let (level, registry, player) = build(&self.name, &self.settings, media)?;
        self.level = level;
        self.registry = registry;
        self.player = player;
        Ok(())
    }

    pub fn step(&mut self, dt: f32, input: &mut InputSnapshot, media: &mut Media<'_>) -> Outcome {
        if self.paused {
            return Outcome::Playing;
        }

        self.registry.sort();
        self.registry.all_think(&self.level.grid, input, &mut *media.audio);
        let flags = self
            .registry
            .all_animate(dt, &self.level.grid)
            .into_iter()
            .find(|(id, _)| *id == self.player)
            .map(|(_, flags)| flags)
            .unwrap_or_default();

        let position = match self.registry.get(self.player) {
            Some(player) if !player.is_removable() => player.position(),
            _ => return self.player_died(media),
        };
        if flags.contains(CollisionFlags::FELL_OFF_WORLD) {
            return self.player_died(media);
        }
        if flags.contains(CollisionFlags::END_OF_WORLD) {
            log::info!("Level {} complete", self.name);
            return Outcome::Won;
        }

        self.level.grid.scroll_to(position);
        Outcome::Playing
    }

    fn player_died(&mut self, media: &mut Media<'_>) -> Outcome {
        if self.lives == 0 {
            log::info!("Game over");
            return Outcome::GameOver;
        }
        self.lives -= 1;
        log::info!("Skratch died, {} lives left", self.lives);
        match self.restart(media) {
            Ok(()) => Outcome::Restarted,
            Err(_) => Outcome::GameOver,
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        self.level.render(renderer);
        self.registry.render_all(&self.level.grid, renderer);
    }

    /// Drop removable entities and admit the ones spawned this frame.
    pub fn end_frame(&mut self) -> usize {
        self.registry.cleanup()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level_name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn grid(&self) -> &TileGrid {
        &self.level.grid
    }

    pub fn describe(&self) -> String {
        self.registry.describe()
    }
}
