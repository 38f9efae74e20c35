use markdom_engine::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key} in {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        key: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Options for every document parsed by the host.
    #[serde(default)]
    pub parser: ParseOptions,
}

impl Config {
    /// Loads and validates the config at `config_path`. A missing file is `None`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate(config_path)?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdom");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Rejects values no parse could run with. `config_path` only labels the error.
    pub fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        if self.parser.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                key: "parser.max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdom/config.toml"));
    }

    #[test]
    fn test_defaults_match_the_engine() {
        let config = Config::default();
        assert_eq!(config.parse_options(), ParseOptions::default());
        assert_eq!(config.parser.max_depth, 128);
        assert_eq!(config.parser.latex_cache_capacity, 100);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: Config = toml::from_str("[parser]\nmax_depth = 16\n").unwrap();
        assert_eq!(config.parser.max_depth, 16);
        assert_eq!(
            config.parser.latex_cache_capacity,
            ParseOptions::DEFAULT_LATEX_CACHE_CAPACITY
        );

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            parser: ParseOptions {
                max_depth: 32,
                latex_cache_capacity: 0,
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_unparseable_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_depth = \"deep\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_depth = 0\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "parser.max_depth"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_loaded_options_drive_the_parser() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_depth = 1\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let result = markdom_engine::parse_with_options("- a\n  - b", config.parse_options());
        assert!(result.is_err());
    }
}
