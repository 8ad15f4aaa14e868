//! Configuration
//!
//! Explicit configuration passed down to every operation; nothing global.
//! Layering: built-in defaults, then an optional TOML file, then environment
//! overrides, then validation. Defaults point at the glftpd install paths a
//! site runs with out of the box.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub retention: RetentionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// glftpd site log to scan for NUKE lines.
    pub log_file: PathBuf,
    /// CSV store accumulating nuke records.
    pub store_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Rolling window, in days, that store rows are kept for.
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            retention: RetentionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("/mnt/glftpd/ftp-data/logs/glftpd.log"),
            store_file: PathBuf::from("/mnt/glftpd/bin/nukes_stats.csv"),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { days: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("nuketrack.toml"),
            PathBuf::from(".nuketrack.toml"),
            dirs::config_dir()
                .map(|d| d.join("nuketrack").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("NUKETRACK_LOG_FILE") {
            self.paths.log_file = PathBuf::from(val);
        }
        if let Ok(val) = env::var("NUKETRACK_STORE_FILE") {
            self.paths.store_file = PathBuf::from(val);
        }
        if let Ok(val) = env::var("NUKETRACK_RETENTION_DAYS") {
            self.retention.days = val.parse().context("Invalid NUKETRACK_RETENTION_DAYS")?;
        }
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retention.days <= 0 {
            return Err(anyhow::anyhow!(
                "Retention must be at least one day, got {}",
                self.retention.days
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.paths.log_file,
            PathBuf::from("/mnt/glftpd/ftp-data/logs/glftpd.log")
        );
        assert_eq!(
            config.paths.store_file,
            PathBuf::from("/mnt/glftpd/bin/nukes_stats.csv")
        );
        assert_eq!(config.retention.days, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            log_file = "/tmp/site.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.log_file, PathBuf::from("/tmp/site.log"));
        assert_eq!(
            config.paths.store_file,
            PathBuf::from("/mnt/glftpd/bin/nukes_stats.csv")
        );
        assert_eq!(config.retention.days, 30);
    }

    #[test]
    fn test_env_override() {
        env::set_var("NUKETRACK_RETENTION_DAYS", "7");
        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.retention.days, 7);
        env::remove_var("NUKETRACK_RETENTION_DAYS");
    }

    #[test]
    fn test_validation_rejects_zero_retention() {
        let mut config = Config::default();
        config.retention.days = 0;
        assert!(config.validate().is_err());
    }
}
