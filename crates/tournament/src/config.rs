//! Session configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) gives the
//! standard ladder: 100-duel seasons, one division unlocked out of three and
//! a ten-floor tower.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::season::SeasonSettings;

/// Range of synthetic opponents met in world duels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldDuelSettings {
    pub min_level: u32,
    pub max_level: u32,
    pub max_skills: u32,
}

impl Default for WorldDuelSettings {
    fn default() -> Self {
        Self {
            min_level: 2,
            max_level: 13,
            max_skills: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub season: SeasonSettings,
    /// Divisions open when the session starts
    pub initial_divisions: u32,
    pub max_divisions: u32,
    pub tower_floors: u32,
    pub world_duel: WorldDuelSettings,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            season: SeasonSettings::default(),
            initial_divisions: 1,
            max_divisions: 3,
            tower_floors: 10,
            world_duel: WorldDuelSettings::default(),
        }
    }
}

impl ArenaConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.season.duel_threshold == 0 {
            return Err(ConfigError::Invalid(
                "season.duel_threshold must be at least 1".into(),
            ));
        }
        if self.max_divisions == 0 {
            return Err(ConfigError::Invalid("max_divisions must be at least 1".into()));
        }
        if !(1..=self.max_divisions).contains(&self.initial_divisions) {
            return Err(ConfigError::Invalid(format!(
                "initial_divisions must be between 1 and {}",
                self.max_divisions
            )));
        }
        if self.tower_floors == 0 {
            return Err(ConfigError::Invalid("tower_floors must be at least 1".into()));
        }
        if self.world_duel.min_level == 0 || self.world_duel.min_level > self.world_duel.max_level {
            return Err(ConfigError::Invalid(
                "world_duel levels must satisfy 1 <= min_level <= max_level".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ArenaConfig::from_toml("").unwrap();
        assert_eq!(config, ArenaConfig::default());
        assert_eq!(config.season.duel_threshold, 100);
        assert_eq!(config.season.top_flight_relegate, 1);
    }

    #[test]
    fn test_partial_override() {
        let config = ArenaConfig::from_toml(
            r#"
            initial_divisions = 3

            [season]
            duel_threshold = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_divisions, 3);
        assert_eq!(config.season.duel_threshold, 20);
        assert_eq!(config.season.promote, 2);
        assert_eq!(config.tower_floors, 10);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ArenaConfig::from_toml("initial_divisions = 4"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ArenaConfig::from_toml("[season]\nduel_threshold = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ArenaConfig::from_toml("tower_floors = \"ten\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_divisions = 5\ninitial_divisions = 2").unwrap();
        let config = ArenaConfig::load(file.path()).unwrap();
        assert_eq!(config.max_divisions, 5);
        assert_eq!(config.initial_divisions, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("arena.toml");
        assert!(matches!(
            ArenaConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
