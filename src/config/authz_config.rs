//! Authorization configuration
//!
//! Maps the identity layer's claim types and role names onto the roles the
//! authorization core understands, and carries the logging configuration.
//! The operation policy table is fixed in code and has no configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use crate::log_config_info;
use crate::logging::config::LogConfig;
use crate::permissions::types::Role;

/// Claim type names used to read a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimTypes {
    /// Claim carrying the tenant identifier
    pub tenant_id: String,
    /// Claim carrying the user identifier
    pub user_id: String,
    /// Claim carrying role names, one claim per role
    pub role: String,
}

impl Default for ClaimTypes {
    fn default() -> Self {
        Self {
            tenant_id: "http://schemas.microsoft.com/identity/claims/tenantid".to_string(),
            user_id: "http://schemas.microsoft.com/identity/claims/objectidentifier".to_string(),
            role: "http://schemas.microsoft.com/ws/2008/06/identity/claims/role".to_string(),
        }
    }
}

/// Role claim values recognized for each [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleNames {
    pub admin: String,
    pub creator: String,
    pub reader: String,
}

impl RoleNames {
    pub fn name_for(&self, role: Role) -> &str {
        match role {
            Role::Admin => &self.admin,
            Role::Creator => &self.creator,
            Role::Reader => &self.reader,
        }
    }
}

impl Default for RoleNames {
    fn default() -> Self {
        Self {
            admin: "SurveyAdmin".to_string(),
            creator: "SurveyCreator".to_string(),
            reader: "SurveyReader".to_string(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthzConfig {
    pub claim_types: ClaimTypes,
    pub role_names: RoleNames,
    pub logging: LogConfig,
}

impl AuthzConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        log_config_info!("Loaded authorization config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse configuration from TOML text without environment overrides
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: AuthzConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.logging.apply_env_overrides();
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let claim_types = [
            ("claim_types.tenant_id", &self.claim_types.tenant_id),
            ("claim_types.user_id", &self.claim_types.user_id),
            ("claim_types.role", &self.claim_types.role),
        ];
        for (field, value) in claim_types {
            if value.trim().is_empty() {
                return Err(ConfigError::validation(format!("{} must not be empty", field)));
            }
        }

        let mut seen = HashSet::new();
        for role in Role::ALL {
            let name = self.role_names.name_for(role);
            if name.trim().is_empty() {
                return Err(ConfigError::validation(format!(
                    "role name for {:?} must not be empty",
                    role
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::validation(format!(
                    "role name '{}' is assigned to more than one role",
                    name
                )));
            }
        }

        self.logging.validate()
    }
}
