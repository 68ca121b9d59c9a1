//! Configuration management for the logging system
//!
//! Logging settings live in the `[logging]` table of the authorization
//! config file and can be overridden through `SURVEY_AUTHZ_LOG_*`
//! environment variables.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::config::error::{ConfigError, ConfigResult};
use crate::logging::features::LogFeature;

/// Parse a configured level name (case-insensitive).
///
/// `OFF` is not a level here: outputs are switched off with their `enabled`
/// flag, and a feature set to `OFF` would also hide its denials.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match LevelFilter::from_str(level) {
        Ok(LevelFilter::Off) | Err(_) => None,
        Ok(level) => Some(level),
    }
}

/// Main logging configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// General logging settings
    pub general: GeneralConfig,
    /// Console echo of log lines
    pub console: ConsoleConfig,
    /// In-memory audit buffer
    pub audit: AuditConfig,
    /// Feature-specific log levels, keyed by feature name
    pub features: HashMap<String, String>,
}

/// General logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default log level for targets without a feature level
    pub default_level: String,
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Echo log lines to stderr
    pub enabled: bool,
    /// Log level for console output
    pub level: String,
    /// ANSI colors on console lines
    pub colors: bool,
}

/// Audit buffer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Keep log lines in memory and broadcast them to subscribers
    pub enabled: bool,
    /// Log level for the audit buffer
    pub level: String,
    /// Maximum number of lines kept in memory
    pub buffer_size: usize,
    /// Emit JSON lines instead of plain text
    pub structured: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            console: ConsoleConfig::default(),
            audit: AuditConfig::default(),
            features: Self::default_features(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_level: "INFO".to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "INFO".to_string(),
            colors: false,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "DEBUG".to_string(),
            buffer_size: 1000,
            structured: false,
        }
    }
}

impl LogConfig {
    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("SURVEY_AUTHZ_LOG_LEVEL") {
            self.general.default_level = level;
        }

        if let Ok(enabled) = std::env::var("SURVEY_AUTHZ_LOG_CONSOLE_ENABLED") {
            self.console.enabled = enabled.parse().unwrap_or(false);
        }
        if let Ok(level) = std::env::var("SURVEY_AUTHZ_LOG_CONSOLE_LEVEL") {
            self.console.level = level;
        }

        if let Ok(enabled) = std::env::var("SURVEY_AUTHZ_LOG_AUDIT_ENABLED") {
            self.audit.enabled = enabled.parse().unwrap_or(true);
        }
        if let Ok(structured) = std::env::var("SURVEY_AUTHZ_LOG_AUDIT_STRUCTURED") {
            self.audit.structured = structured.parse().unwrap_or(false);
        }

        // Feature-specific overrides
        for (key, value) in std::env::vars() {
            if let Some(feature) = key.strip_prefix("SURVEY_AUTHZ_LOG_FEATURE_") {
                self.features.insert(feature.to_lowercase(), value);
            }
        }
    }

    /// Get default feature-specific log levels
    fn default_features() -> HashMap<String, String> {
        let mut features = HashMap::new();
        features.insert(LogFeature::Permissions.name().to_string(), "INFO".to_string());
        features.insert(LogFeature::Claims.name().to_string(), "INFO".to_string());
        features.insert(LogFeature::Store.name().to_string(), "WARN".to_string());
        features.insert(LogFeature::Config.name().to_string(), "INFO".to_string());
        features
    }

    /// Level for a log target: the matching feature's level, or the default.
    pub fn level_for_target(&self, target: &str) -> LevelFilter {
        let default = parse_level(&self.general.default_level).unwrap_or(LevelFilter::Info);
        LogFeature::from_target(target)
            .and_then(|feature| self.features.get(feature.name()))
            .and_then(|level| parse_level(level))
            .unwrap_or(default)
    }

    /// The most verbose level any target can log at.
    pub fn max_level(&self) -> LevelFilter {
        self.features
            .values()
            .filter_map(|level| parse_level(level))
            .chain(parse_level(&self.general.default_level))
            .max()
            .unwrap_or(LevelFilter::Info)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for level in [
            &self.general.default_level,
            &self.console.level,
            &self.audit.level,
        ] {
            if parse_level(level).is_none() {
                return Err(ConfigError::InvalidLevel(level.clone()));
            }
        }

        for (feature, level) in &self.features {
            if parse_level(level).is_none() {
                return Err(ConfigError::InvalidFeatureLevel(
                    feature.clone(),
                    level.clone(),
                ));
            }
        }

        if self.audit.buffer_size == 0 {
            return Err(ConfigError::validation(
                "logging.audit.buffer_size must be greater than 0",
            ));
        }

        Ok(())
    }
}
