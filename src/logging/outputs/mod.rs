//! Output handlers for the logging system
//!
//! Each output turns the active [`LogConfig`](super::config::LogConfig)
//! section into a `tracing-subscriber` fmt layer with its own level filter.

pub mod audit;
pub mod console;

use tracing_subscriber::{Layer, Registry};

/// Type-erased output layer, so console and audit layers share one stack
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;
