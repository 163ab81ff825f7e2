//! Game configuration, loadable from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// The scorecard has a column for at most this many players.
pub const MAX_PLAYERS: usize = 6;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("A game needs at least one player")]
    NoPlayers,
    #[error("At most {max} players fit on the scorecard, got {got}")]
    TooManyPlayers { max: usize, got: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    /// How long between re-rolls of the unlocked dice while rolling.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Player names, in turn order.
    #[serde(default = "default_players")]
    pub players: Vec<String>,
    /// Seed for the dice. Unset means seeded from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_players() -> Vec<String> {
    vec!["Player 0".to_string()]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            players: default_players(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.players.len() {
            0 => Err(ConfigError::NoPlayers),
            n if n > MAX_PLAYERS => Err(ConfigError::TooManyPlayers {
                max: MAX_PLAYERS,
                got: n,
            }),
            _ => Ok(()),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_single_player_game() {
        let config = GameConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.players, vec!["Player 0".to_string()]);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = GameConfig::from_yaml("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn yaml_overrides() {
        let yaml = r#"
tick_interval_ms: 40
players: ["Ann", "Bo"]
seed: 9
"#;
        let config = GameConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tick_interval_ms, 40);
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn roster_bounds() {
        assert!(matches!(
            GameConfig::from_yaml("players: []"),
            Err(ConfigError::NoPlayers)
        ));
        let yaml = "players: [a, b, c, d, e, f, g]";
        assert!(matches!(
            GameConfig::from_yaml(yaml),
            Err(ConfigError::TooManyPlayers { max: 6, got: 7 })
        ));
    }

    #[test]
    fn bad_yaml_is_reported() {
        assert!(matches!(
            GameConfig::from_yaml("tick_interval_ms: soon"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
