//! Feature-specific logging macros and utilities
//!
//! Each feature logs under its own target so that levels can be tuned per
//! feature in the `[logging.features]` table.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Permissions,
    Claims,
    Store,
    Config,
}

impl LogFeature {
    pub const ALL: [LogFeature; 4] = [
        LogFeature::Permissions,
        LogFeature::Claims,
        LogFeature::Store,
        LogFeature::Config,
    ];

    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Permissions => "survey_authz::permissions",
            LogFeature::Claims => "survey_authz::claims",
            LogFeature::Store => "survey_authz::store",
            LogFeature::Config => "survey_authz::config",
        }
    }

    /// Key used in the `[logging.features]` table
    pub fn name(&self) -> &'static str {
        match self {
            LogFeature::Permissions => "permissions",
            LogFeature::Claims => "claims",
            LogFeature::Store => "store",
            LogFeature::Config => "config",
        }
    }

    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.target() == target)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

// Permission-check logging macros
#[macro_export]
macro_rules! log_permissions_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "survey_authz::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_info {
    ($($arg:tt)*) => {
        log::info!(target: "survey_authz::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "survey_authz::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_error {
    ($($arg:tt)*) => {
        log::error!(target: "survey_authz::permissions", $($arg)*)
    };
}

// Claims logging macros
#[macro_export]
macro_rules! log_claims_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "survey_authz::claims", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_claims_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "survey_authz::claims", $($arg)*)
    };
}

// Store logging macros
#[macro_export]
macro_rules! log_store_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "survey_authz::store", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_store_info {
    ($($arg:tt)*) => {
        log::info!(target: "survey_authz::store", $($arg)*)
    };
}

// Config logging macros
#[macro_export]
macro_rules! log_config_info {
    ($($arg:tt)*) => {
        log::info!(target: "survey_authz::config", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_config_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "survey_authz::config", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_and_names_resolve_back() {
        for feature in LogFeature::ALL {
            assert_eq!(LogFeature::from_target(feature.target()), Some(feature));
            assert_eq!(LogFeature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(LogFeature::from_target("survey_authz"), None);
    }
}
