//! # Logging System
//!
//! Process-wide logging for the authorization core. Configuration comes from
//! the `[logging]` table of [`AuthzConfig`](crate::config::AuthzConfig) and
//! records are handled by the [`audit_logger`](crate::audit_logger) backend.

pub mod config;
pub mod features;
pub mod outputs;

use config::{parse_level, LogConfig};
use features::LogFeature;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::audit_logger;
use crate::config::{AuthzConfig, ConfigError};
use crate::{log_config_info, log_config_warn};

/// Global logging configuration instance
static LOGGING_CONFIG: OnceCell<Arc<RwLock<LogConfig>>> = OnceCell::new();

pub struct LoggingSystem;

impl LoggingSystem {
    /// Initialize the logging system with default configuration
    pub fn init_default() -> Result<(), LoggingError> {
        Self::init_with_config(LogConfig::default())
    }

    /// Initialize the logging system with a custom configuration
    pub fn init_with_config(config: LogConfig) -> Result<(), LoggingError> {
        config.validate()?;
        if LOGGING_CONFIG.get().is_some() {
            return Err(LoggingError::AlreadyInitialized);
        }

        // The config is only published once the logger is actually installed
        audit_logger::init(config.clone())?;
        LOGGING_CONFIG
            .set(Arc::new(RwLock::new(config)))
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        log_config_info!("Logging initialized at max level {}", log::max_level());
        Ok(())
    }

    /// Get the global logging configuration
    pub fn get_config() -> Option<LogConfig> {
        LOGGING_CONFIG.get().map(|config| {
            config
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        })
    }

    /// Update feature-specific log level
    pub fn update_feature_level(feature: &str, level: &str) -> Result<(), LoggingError> {
        let Some(feature) = LogFeature::from_name(feature) else {
            log_config_warn!("Ignoring level change for unknown feature '{feature}'");
            return Err(LoggingError::Config(format!("Unknown feature: {}", feature)));
        };
        if parse_level(level).is_none() {
            return Err(ConfigError::InvalidFeatureLevel(
                feature.name().to_string(),
                level.to_string(),
            )
            .into());
        }

        Self::update(|config| {
            config
                .features
                .insert(feature.name().to_string(), level.to_ascii_uppercase());
        })
    }

    /// Get available features and their current levels
    pub fn get_features() -> Option<HashMap<String, String>> {
        Self::get_config().map(|config| config.features)
    }

    /// Reload the `[logging]` table from a configuration file
    pub fn reload_config_from_file<P: AsRef<Path>>(path: P) -> Result<(), LoggingError> {
        let new_config = AuthzConfig::from_file(path)?.logging;
        Self::update(|config| *config = new_config)
    }

    fn update(apply: impl FnOnce(&mut LogConfig)) -> Result<(), LoggingError> {
        let shared = LOGGING_CONFIG
            .get()
            .ok_or_else(|| LoggingError::Config("Logging system not initialized".to_string()))?;

        let mut config = shared.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = config.clone();
        apply(&mut updated);
        audit_logger::update_config(updated.clone())?;
        *config = updated;
        Ok(())
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Failed to install logger: {0}")]
    SetLogger(String),
}

/// Recent log lines kept by the audit logger
pub fn get_logs() -> Vec<String> {
    audit_logger::get_logs()
}

/// Subscribe to log lines as they are written
pub fn subscribe() -> Option<tokio::sync::broadcast::Receiver<String>> {
    audit_logger::subscribe()
}
