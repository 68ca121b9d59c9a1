//! Configuration module for the authorization core
//!
//! This module provides the TOML configuration read at startup: claim type
//! names, role names and logging settings.

pub mod authz_config;
pub mod error;

pub use authz_config::{AuthzConfig, ClaimTypes, RoleNames};
pub use error::{ConfigError, ConfigResult};
