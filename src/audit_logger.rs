use log::{Metadata, Record};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tokio::sync::broadcast;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::config::ConfigError;
use crate::logging::config::{parse_level, LogConfig};
use crate::logging::outputs::audit::AuditBuffer;
use crate::logging::outputs::{audit, console, BoxedLayer};
use crate::logging::LoggingError;

/// `log` backend that keeps recent lines in memory and broadcasts them.
///
/// Records are filtered by the per-feature levels of the active
/// [`LogConfig`], then handed to a `tracing` dispatcher whose fmt layers
/// write to stderr and/or the audit buffer.
pub struct AuditLogger {
    config: RwLock<LogConfig>,
    buffer: Arc<AuditBuffer>,
    dispatch: RwLock<Dispatch>,
}

impl AuditLogger {
    pub fn new(config: LogConfig) -> Result<Self, ConfigError> {
        let buffer = Arc::new(AuditBuffer::new(config.audit.buffer_size));
        let dispatch = build_dispatch(&config, &buffer)?;
        Ok(Self {
            config: RwLock::new(config),
            buffer,
            dispatch: RwLock::new(dispatch),
        })
    }

    fn config(&self) -> RwLockReadGuard<'_, LogConfig> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update_config(&self, config: LogConfig) -> Result<(), ConfigError> {
        let dispatch = build_dispatch(&config, &self.buffer)?;
        self.buffer.set_capacity(config.audit.buffer_size);
        *self.dispatch.write().unwrap_or_else(PoisonError::into_inner) = dispatch;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn logs(&self) -> Vec<String> {
        self.buffer.lines()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.buffer.subscribe()
    }
}

fn build_dispatch(config: &LogConfig, buffer: &Arc<AuditBuffer>) -> Result<Dispatch, ConfigError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console.enabled {
        layers.push(console::create_layer(&config.console)?);
    }
    if config.audit.enabled {
        layers.push(audit::create_layer(&config.audit, buffer)?);
    }
    Ok(Dispatch::new(Registry::default().with(layers)))
}

impl log::Log for AuditLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let config = self.config();
        if metadata.level() > config.level_for_target(metadata.target()) {
            return false;
        }
        let to_console = config.console.enabled
            && parse_level(&config.console.level).is_some_and(|l| metadata.level() <= l);
        let to_audit = config.audit.enabled
            && parse_level(&config.audit.level).is_some_and(|l| metadata.level() <= l);
        to_console || to_audit
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let dispatch = self
            .dispatch
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::dispatcher::with_default(&dispatch, || {
            // A failed write has nowhere to be reported
            let _ = tracing_log::format_trace(record);
        });
    }

    fn flush(&self) {}
}

static LOGGER: OnceCell<AuditLogger> = OnceCell::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide audit logger.
///
/// Fails with [`LoggingError::SetLogger`] if another `log` backend is
/// already installed; nothing is reported as installed in that case.
pub fn init(config: LogConfig) -> Result<(), LoggingError> {
    let max_level = config.max_level();
    let logger = LOGGER.get_or_try_init(|| AuditLogger::new(config.clone()))?;
    logger.update_config(config)?;

    log::set_logger(logger).map_err(|e| LoggingError::SetLogger(e.to_string()))?;
    INSTALLED.store(true, Ordering::Release);
    log::set_max_level(max_level);
    Ok(())
}

fn installed() -> Option<&'static AuditLogger> {
    LOGGER.get().filter(|_| INSTALLED.load(Ordering::Acquire))
}

/// Replace the installed logger's configuration, if one is installed.
pub fn update_config(config: LogConfig) -> Result<(), ConfigError> {
    if let Some(logger) = installed() {
        log::set_max_level(config.max_level());
        logger.update_config(config)?;
    }
    Ok(())
}

pub fn get_logs() -> Vec<String> {
    installed().map(AuditLogger::logs).unwrap_or_default()
}

pub fn subscribe() -> Option<broadcast::Receiver<String>> {
    installed().map(AuditLogger::subscribe)
}
