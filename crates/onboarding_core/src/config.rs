//! Core configuration.
//!
//! # Responsibility
//! - Describe store, activity log, notification and logging settings.
//! - Load settings from TOML, falling back to defaults per field.
//!
//! # Invariants
//! - A missing file yields `CoreConfig::default()`.
//! - `validate` runs on every successful load.

use crate::logging::normalize_level;
use crate::model::activity::DEFAULT_ACTIVITY_LOG_CAP;
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE: &str = "onboarding_";
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 10;
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Prefix prepended to every persisted key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// SQLite file; `None` keeps the store in memory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityConfig {
    #[serde(default = "default_activity_cap")]
    pub log_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_limit")]
    pub limit: usize,
    /// Joining dates at most this many days ahead raise an upcoming notice.
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            db_path: None,
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            log_cap: default_activity_cap(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            limit: default_notification_limit(),
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level_string(),
            dir: None,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_activity_cap() -> usize {
    DEFAULT_ACTIVITY_LOG_CAP
}

fn default_notification_limit() -> usize {
    DEFAULT_NOTIFICATION_LIMIT
}

fn default_upcoming_window_days() -> i64 {
    DEFAULT_UPCOMING_WINDOW_DAYS
}

fn default_log_level_string() -> String {
    crate::logging::default_log_level().to_string()
}

impl CoreConfig {
    /// Loads configuration from `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "event=config_load module=config status=default path={}",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(
            "event=config_load module=config status=ok path={}",
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.activity.log_cap == 0 {
            return Err(ConfigError::Invalid(
                "activity.log_cap must be at least 1".to_string(),
            ));
        }
        if self.notifications.upcoming_window_days < 0 {
            return Err(ConfigError::Invalid(
                "notifications.upcoming_window_days must not be negative".to_string(),
            ));
        }
        normalize_level(&self.logging.level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.store.namespace, "onboarding_");
        assert_eq!(config.activity.log_cap, 100);
        assert_eq!(config.notifications.limit, 10);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [store]
            namespace = "demo_"

            [activity]
            log_cap = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.store.namespace, "demo_");
        assert_eq!(config.store.db_path, None);
        assert_eq!(config.activity.log_cap, 25);
        assert_eq!(config.notifications.upcoming_window_days, 7);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = CoreConfig::from_toml_str("[activity]\nlog_cap = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_toml_str("[logging]\ndir = \"logs\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onboarding.toml");
        std::fs::write(&path, "[notifications]\nlimit = 3\n").unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert_eq!(config.notifications.limit, 3);
    }
}
