//! Game settings
//!
//! Data-driven rules for maze size, wall scaling and the preview timer.
//! Natively they can be loaded from a JSON file; the browser build receives
//! them as a JSON string from the page.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::MazeRules;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Preview ===
    /// Countdown ticks before the maze is hidden
    pub preview_ticks: u32,
    /// Milliseconds per countdown tick
    pub tick_ms: u64,

    // === Maze scaling ===
    /// Edge length at level 1 and after a game over
    pub initial_maze_size: usize,
    /// Walls added per level
    pub walls_per_level: usize,
    /// Wall cap as a percentage of all cells
    pub wall_density_percent: usize,
    /// Grow the maze when the new level is a multiple of this
    pub size_growth_interval: u32,
    /// Collectibles placed per maze
    pub collectibles: usize,

    // === Generation ===
    /// Rejection-sampling draws per placement
    pub max_placement_attempts: u32,
    /// Stop the repair pass from erasing collectibles it walks over
    pub preserve_collectibles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview_ticks: PREVIEW_TICKS,
            tick_ms: TICK_MS,

            initial_maze_size: DEFAULT_MAZE_SIZE,
            walls_per_level: WALLS_PER_LEVEL,
            wall_density_percent: WALL_DENSITY_PERCENT,
            size_growth_interval: SIZE_GROWTH_INTERVAL,
            collectibles: COLLECTIBLES_PER_MAZE,

            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            preserve_collectibles: false,
        }
    }
}

impl Settings {
    /// Environment variable naming a JSON settings file
    pub const PATH_ENV: &'static str = "MAZE_MEMORY_SETTINGS";
    /// Environment variable fixing the RNG seed
    pub const SEED_ENV: &'static str = "MAZE_MEMORY_SEED";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the game cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MAZE_SIZE..=MAX_MAZE_SIZE).contains(&self.initial_maze_size) {
            return Err(Error::InvalidSettings(format!(
                "initial_maze_size must be between {} and {}, got {}",
                MIN_MAZE_SIZE, MAX_MAZE_SIZE, self.initial_maze_size
            )));
        }
        if self.wall_density_percent > 100 {
            return Err(Error::InvalidSettings(format!(
                "wall_density_percent must be at most 100, got {}",
                self.wall_density_percent
            )));
        }
        if self.size_growth_interval == 0 {
            return Err(Error::InvalidSettings(
                "size_growth_interval must be non-zero".to_string(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(Error::InvalidSettings("tick_ms must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Generator rules derived from these settings
    pub fn rules(&self) -> MazeRules {
        MazeRules {
            walls_per_level: self.walls_per_level,
            wall_density_percent: self.wall_density_percent,
            collectibles: self.collectibles,
            max_placement_attempts: self.max_placement_attempts,
            preserve_collectibles: self.preserve_collectibles,
        }
    }

    /// Load settings from the file named by `MAZE_MEMORY_SETTINGS`, or defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        match std::env::var(Self::PATH_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)?;
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path);
                Ok(settings)
            }
            Err(_) => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Seed from `MAZE_MEMORY_SEED`, if set and numeric
    #[cfg(not(target_arch = "wasm32"))]
    pub fn seed_from_env() -> Option<u64> {
        std::env::var(Self::SEED_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_rules() {
        let settings = Settings::default();
        assert_eq!(settings.preview_ticks, 5);
        assert_eq!(settings.initial_maze_size, 6);
        assert_eq!(settings.size_growth_interval, 3);
        assert!(settings.validate().is_ok());

        let rules = settings.rules();
        assert_eq!(rules.wall_count(6, 1), 2);
        assert!(!rules.preserve_collectibles);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "preview_ticks": 3, "preserve_collectibles": true }"#)
            .unwrap();
        assert_eq!(settings.preview_ticks, 3);
        assert!(settings.preserve_collectibles);
        assert_eq!(settings.initial_maze_size, DEFAULT_MAZE_SIZE);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            initial_maze_size: 9,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = Settings::from_json(r#"{ "initial_maze_size": 1 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let err = Settings::from_json(r#"{ "initial_maze_size": 5000000000 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let settings = Settings {
            initial_maze_size: MAX_MAZE_SIZE + 1,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(Error::InvalidSettings(_))));

        let err = Settings::from_json(r#"{ "size_growth_interval": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));

        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::SettingsParse(_)));
    }
}
