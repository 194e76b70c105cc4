//! Engine configuration.
//!
//! Read from TOML. Every key is optional and missing ones fall back to the defaults below, so an
//! empty document is a valid configuration.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::coord::{Grid, DEFAULT_DIFFICULTY, PRESETS};
use crate::error::{PuzzleError, Result};
use crate::scatter::{MAX_OFFSET_RANGE, MAX_ROTATION_RANGE};

/// Top level configuration.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Which difficulties may be started.
    #[serde(default)]
    pub game: GameConfig,
    /// Ranges for the staging area layout.
    #[serde(default)]
    pub scatter: ScatterConfig,
    /// Limits for player supplied images.
    #[serde(default)]
    pub upload: UploadLimits,
}

/// Difficulty settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Difficulties a session may be started with. Empty means any perfect square is allowed.
    #[serde(default = "default_difficulties")]
    pub difficulties: Vec<u32>,
    /// Difficulty used when the caller does not pick one.
    #[serde(default = "default_difficulty")]
    pub default_difficulty: u32,
}

/// Staging area layout ranges.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScatterConfig {
    /// Offsets are drawn from `[-offset_range, offset_range]`, in percent of the staging area.
    #[serde(default = "default_offset_range")]
    pub offset_range: f32,
    /// Rotations are drawn from `[-rotation_range, rotation_range]` degrees.
    #[serde(default = "default_rotation_range")]
    pub rotation_range: f32,
}

/// Limits applied to uploaded images.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted payload in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Shortest accepted side in pixels.
    #[serde(default = "default_min_dimension")]
    pub min_dimension: u32,
    /// Longer sides are scaled down to this.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

fn default_difficulties() -> Vec<u32> { PRESETS.iter().map(|p| p.difficulty).collect() }
fn default_difficulty() -> u32 { DEFAULT_DIFFICULTY }
fn default_offset_range() -> f32 { 40.0 }
fn default_rotation_range() -> f32 { 20.0 }
fn default_max_bytes() -> usize { 5 * 1024 * 1024 }
fn default_min_dimension() -> u32 { 300 }
fn default_max_dimension() -> u32 { 1200 }

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            difficulties: default_difficulties(),
            default_difficulty: default_difficulty(),
        }
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        ScatterConfig {
            offset_range: default_offset_range(),
            rotation_range: default_rotation_range(),
        }
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        UploadLimits {
            max_bytes: default_max_bytes(),
            min_dimension: default_min_dimension(),
            max_dimension: default_max_dimension(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(PuzzleError::Config(format!("{}: {err}", path.display()))),
        }
    }

    /// The grid for `difficulty`, checking it against the allowed list.
    pub fn grid_for(&self, difficulty: u32) -> Result<Grid> {
        let grid = Grid::from_difficulty(difficulty)?;
        let allowed = &self.game.difficulties;
        if !allowed.is_empty() && !allowed.contains(&difficulty) {
            return Err(PuzzleError::InvalidDifficulty(difficulty));
        }
        Ok(grid)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        for &d in &self.game.difficulties {
            Grid::from_difficulty(d)?;
        }
        self.grid_for(self.game.default_difficulty)?;
        let scatter = &self.scatter;
        if !(0.0..=MAX_OFFSET_RANGE).contains(&scatter.offset_range) {
            return Err(PuzzleError::Config(format!(
                "scatter.offset_range must be within 0..={MAX_OFFSET_RANGE}"
            )));
        }
        if !(0.0..=MAX_ROTATION_RANGE).contains(&scatter.rotation_range) {
            return Err(PuzzleError::Config(format!(
                "scatter.rotation_range must be within 0..={MAX_ROTATION_RANGE}"
            )));
        }
        if self.upload.min_dimension > self.upload.max_dimension {
            return Err(PuzzleError::Config(
                "upload.min_dimension exceeds upload.max_dimension".into(),
            ));
        }
        Ok(())
    }
}
