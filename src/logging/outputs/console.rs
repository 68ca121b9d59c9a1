//! Console output handler

use std::io;
use tracing_log::AsTrace;
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::Layer;

use super::BoxedLayer;
use crate::config::ConfigError;
use crate::logging::config::{parse_level, ConsoleConfig};

/// Create a stderr layer for console output
pub fn create_layer(config: &ConsoleConfig) -> Result<BoxedLayer, ConfigError> {
    let level = parse_level(&config.level)
        .ok_or_else(|| ConfigError::InvalidLevel(config.level.clone()))?;

    Ok(fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.colors)
        .with_timer(ChronoUtc::rfc_3339())
        .with_target(true)
        .with_filter(level.as_trace())
        .boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_level() {
        let config = ConsoleConfig {
            level: "SHOUT".to_string(),
            ..ConsoleConfig::default()
        };
        assert!(matches!(
            create_layer(&config),
            Err(ConfigError::InvalidLevel(level)) if level == "SHOUT"
        ));
    }
}
