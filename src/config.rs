use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;
use crate::model::COLOR_NAMES;

pub const MIN_CAPACITY: usize = 2;
pub const MIN_COLORS: usize = 2;
pub const MIN_EXTRA_CONTAINERS: usize = 1;
pub const MAX_EXTRA_CONTAINERS: usize = 4;

/// Game setup and engine options, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Units per container.
    pub capacity: usize,
    /// Number of colors, one filled container each.
    pub colors: usize,
    /// Empty containers dealt on top of the filled ones.
    pub extra_containers: usize,
    pub undo: bool,
    pub seed: Option<u64>,
    pub solver_max_states: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            capacity: 4,
            colors: 6,
            extra_containers: 2,
            undo: true,
            seed: None,
            solver_max_states: 200_000,
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GameConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Rejects settings that could only ever deal a finished game: a single
    /// color or single-slot containers are won on the deal, and without a
    /// spare container a full board has no legal pour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MIN_CAPACITY {
            return Err(ConfigError::Validation(format!(
                "capacity must be >= {MIN_CAPACITY}"
            )));
        }
        if !(MIN_COLORS..=COLOR_NAMES.len()).contains(&self.colors) {
            return Err(ConfigError::Validation(format!(
                "colors must be in {MIN_COLORS}..={}",
                COLOR_NAMES.len()
            )));
        }
        if !(MIN_EXTRA_CONTAINERS..=MAX_EXTRA_CONTAINERS).contains(&self.extra_containers) {
            return Err(ConfigError::Validation(format!(
                "extra_containers must be in {MIN_EXTRA_CONTAINERS}..={MAX_EXTRA_CONTAINERS}"
            )));
        }
        if self.solver_max_states == 0 {
            return Err(ConfigError::Validation(
                "solver_max_states must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Difficulty is named after the number of spare containers.
    pub fn difficulty_name(&self) -> &'static str {
        match self.extra_containers {
            1 => "Easy",
            2 => "Medium",
            3 => "Hard",
            4 => "Expert",
            _ => "Custom",
        }
    }

    pub fn difficulty_text(&self) -> String {
        format!(
            "Difficulty: {} ({} colors, {} extra containers)",
            self.difficulty_name(),
            self.colors,
            self.extra_containers
        )
    }

    pub fn container_count(&self) -> usize {
        self.colors + self.extra_containers
    }
}
