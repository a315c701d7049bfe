//! Game configuration
//!
//! Settings live in a RON file (`config.ron` by default). A missing file means
//! defaults; command-line switches override whatever the file says.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::DEFAULT_LIVES;
use crate::platform::VideoScale;

pub const DEFAULT_CONFIG_PATH: &str = "config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window size in pixels
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub sounds: bool,
    /// Root for levels, characters and items
    pub data_dir: PathBuf,
    pub start_level: String,
    pub lives: u32,
    pub show_fps: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: VideoScale::BASE_WIDTH,
            height: VideoScale::BASE_HEIGHT,
            fullscreen: false,
            sounds: true,
            data_dir: PathBuf::from("data"),
            start_level: "level01".to_string(),
            lives: DEFAULT_LIVES,
            show_fps: false,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when the file does not exist; any other failure is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Command-line switches win over the file.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if cli.fullscreen {
            self.fullscreen = true;
        }
        if cli.window {
            self.fullscreen = false;
        }
        if cli.nosound {
            self.sounds = false;
        }
        if let Some(level) = &cli.level {
            self.start_level = level.clone();
        }
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
    }

    pub fn video_scale(&self) -> VideoScale {
        VideoScale::for_window(self.width, self.height)
    }
}

#[derive(Debug, Parser)]
#[command(name = "skratch", version, about = "Scratch: Sk8er Kat")]
pub struct Cli {
    /// Config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Window width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long, conflicts_with = "window")]
    pub fullscreen: bool,

    #[arg(long)]
    pub window: bool,

    /// Disable sound
    #[arg(long)]
    pub nosound: bool,

    /// Level to start on
    #[arg(long)]
    pub level: Option<String>,

    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = GameConfig::load_or_default(&tmp.path().join("config.ron")).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.lives, 9);
        assert_eq!(config.video_scale(), VideoScale::IDENTITY);
    }

    #[test]
    fn test_pretty_file_loads() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.ron");
        let config = GameConfig {
            width: 1280,
            height: 960,
            start_level: "level02".to_string(),
            ..Default::default()
        };
        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        std::fs::write(&path, ron::ser::to_string_pretty(&config, pretty).unwrap()).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.ron");
        std::fs::write(&path, "(sounds: false, lives: 3)").unwrap();
        let config = GameConfig::load_or_default(&path).unwrap();
        assert!(!config.sounds);
        assert_eq!(config.lives, 3);
        assert_eq!(config.width, 640);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.ron");
        std::fs::write(&path, "(width: \"wide\")").unwrap();
        assert!(matches!(GameConfig::load_or_default(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["skratch", "--width", "1280", "--nosound", "--level", "level03", "--fullscreen"]);
        let mut config = GameConfig::default();
        config.apply(&cli);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 480);
        assert!(!config.sounds);
        assert!(config.fullscreen);
        assert_eq!(config.start_level, "level03");
        assert_eq!(config.video_scale().width, 2.0);

        let cli = Cli::parse_from(["skratch", "--window"]);
        config.apply(&cli);
        assert!(!config.fullscreen);
        assert_eq!(cli.config, PathBuf::from("config.ron"));
    }

    #[test]
    fn test_fullscreen_and_window_conflict() {
        assert!(Cli::try_parse_from(["skratch", "--fullscreen", "--window"]).is_err());
    }
}
