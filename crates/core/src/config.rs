//! Training configuration loading.
//!
//! Loads the table setup, abstraction tables, and training parameters
//! from YAML and validates them before the solver starts.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::abstraction::AbstractionConfig;
use crate::game::MAX_PLAYERS;

/// Top-level training configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    pub game: GameConfig,
    /// Action abstraction tables. Omit for the stock sizing scheme.
    #[serde(default)]
    pub abstraction: AbstractionConfig,
    pub training: TrainingParams,
}

/// Table setup for the initial state template.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub initial_stack: u32,
    #[serde(default)]
    pub ante: u32,
    #[serde(default)]
    pub button_pos: usize,
    #[serde(default = "default_big_blind")]
    pub big_blind: u32,
}

/// Iteration count, determinism, and persistence parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingParams {
    pub iterations: u64,
    /// RNG seed for the deck. Omit for an entropy seed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Infoset table file, loaded before training and saved after.
    #[serde(default = "default_infoset_path")]
    pub infoset_path: PathBuf,
}

fn default_big_blind() -> u32 {
    2
}

fn default_infoset_path() -> PathBuf {
    PathBuf::from("infoset_map.tsv")
}

impl TrainingConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if !(2..=MAX_PLAYERS).contains(&game.num_players) {
            return Err(ConfigError::InvalidPlayerCount(game.num_players));
        }
        if game.button_pos >= game.num_players {
            return Err(ConfigError::InvalidButton {
                button_pos: game.button_pos,
                num_players: game.num_players,
            });
        }
        if game.big_blind == 0 {
            return Err(ConfigError::InvalidBigBlind);
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    /// Heads-up 200-chip stacks, no ante, BB 2, a short training run.
    fn default() -> Self {
        Self {
            game: GameConfig {
                num_players: 2,
                initial_stack: 200,
                ante: 0,
                button_pos: 0,
                big_blind: 2,
            },
            abstraction: AbstractionConfig::default(),
            training: TrainingParams {
                iterations: 4,
                seed: None,
                infoset_path: default_infoset_path(),
            },
        }
    }
}

/// Errors from loading or validating a training configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Player count outside [2, 6]
    #[error("num_players must be in [2, {MAX_PLAYERS}], got {0}")]
    InvalidPlayerCount(usize),

    /// Button seat outside the table
    #[error("button_pos {button_pos} outside [0, {num_players})")]
    InvalidButton {
        button_pos: usize,
        num_players: usize,
    },

    /// Zero big blind
    #[error("big_blind must be > 0")]
    InvalidBigBlind,
}
