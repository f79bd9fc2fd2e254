//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Parse TOML configuration with defaults for every field.
//! - Apply `TODOAPP_*` environment overrides.
//!
//! # Invariants
//! - A validated config always carries a supported log level.

use crate::logging::{default_log_level, LogLevel};
use crate::source::remote::InMemoryRemoteDataSource;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "TODOAPP_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TODOAPP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TODOAPP_LOG_DIR";
pub const ENV_REMOTE_ENABLED: &str = "TODOAPP_REMOTE_ENABLED";
const DEFAULT_DB_FILE_NAME: &str = "todoapp.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidLevel(String),
    InvalidFlag { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidLevel(message) => write!(f, "{message}"),
            Self::InvalidFlag { key, value } => {
                write!(f, "`{key}` must be true or false, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidLevel(_) | Self::InvalidFlag { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for the in-process remote source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub latency_ms: u64,
    /// Start the remote with the bundled sample tasks.
    pub seed: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            latency_ms: 0,
            seed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub remote: RemoteConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            remote: RemoteConfig::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Applies `TODOAPP_*` variables from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_REMOTE_ENABLED) {
            self.remote.enabled = parse_flag(ENV_REMOTE_ENABLED, value)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        LogLevel::parse(&self.log_level).map_err(ConfigError::InvalidLevel)?;
        Ok(())
    }

    /// Builds the remote source described by `remote`, if enabled.
    pub fn remote_source(&self) -> Option<InMemoryRemoteDataSource> {
        if !self.remote.enabled {
            return None;
        }
        let remote = if self.remote.seed {
            InMemoryRemoteDataSource::seeded()
        } else {
            InMemoryRemoteDataSource::new()
        };
        Some(remote.with_latency(Duration::from_millis(self.remote.latency_ms)))
    }
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_REMOTE_ENABLED};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.remote_source().is_none());
    }

    #[test]
    fn nested_remote_table_is_parsed() {
        let config = CoreConfig::from_toml_str(
            r#"
            db_path = "/data/tasks.sqlite3"
            log_level = "warn"

            [remote]
            enabled = true
            latency_ms = 25
            seed = false
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.sqlite3"));
        assert!(config.remote.enabled);
        assert_eq!(config.remote.latency_ms, 25);
        assert!(config.remote_source().is_some());
    }

    #[test]
    fn unknown_keys_and_bad_levels_are_rejected() {
        assert!(matches!(
            CoreConfig::from_toml_str("colour = \"blue\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            CoreConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::InvalidLevel(_))
        ));
    }

    #[test]
    fn overrides_replace_values_and_skip_blanks() {
        let config = CoreConfig::default()
            .with_overrides(|key| match key {
                ENV_DB_PATH => Some("/tmp/override.sqlite3".to_string()),
                ENV_LOG_LEVEL => Some("  ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/override.sqlite3"));
        assert_eq!(config.log_level, CoreConfig::default().log_level);
    }

    #[test]
    fn remote_switch_override_is_parsed() {
        let enabled = CoreConfig::default()
            .with_overrides(|key| (key == ENV_REMOTE_ENABLED).then(|| "TRUE".to_string()))
            .unwrap();
        assert!(enabled.remote.enabled);
        assert!(enabled.remote_source().is_some());

        let err = CoreConfig::default()
            .with_overrides(|key| (key == ENV_REMOTE_ENABLED).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidFlag { key: ENV_REMOTE_ENABLED, .. }
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = CoreConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
