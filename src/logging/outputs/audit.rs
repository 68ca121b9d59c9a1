//! Audit buffer output
//!
//! Formatted lines are kept in a bounded in-memory buffer and broadcast to
//! subscribers as they are written. Lines are plain text or, when
//! `structured` is set, one JSON object per line.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing_log::AsTrace;
use tracing_subscriber::fmt::{self, time::ChronoUtc, MakeWriter};
use tracing_subscriber::Layer;

use super::BoxedLayer;
use crate::config::ConfigError;
use crate::logging::config::{parse_level, AuditConfig};

/// Bounded line buffer with a broadcast channel for live subscribers
pub struct AuditBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: AtomicUsize,
    sender: broadcast::Sender<String>,
}

impl AuditBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: AtomicUsize::new(capacity),
            sender,
        }
    }

    /// Change the number of lines kept; older lines are dropped on the next push
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity.max(1), Ordering::Relaxed);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    fn push(&self, line: String) {
        let capacity = self.capacity.load(Ordering::Relaxed);
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.push_back(line.clone());
        while lines.len() > capacity {
            lines.pop_front();
        }
        // No receivers is fine
        let _ = self.sender.send(line);
    }
}

/// `MakeWriter` that hands each formatted event to an [`AuditBuffer`]
#[derive(Clone)]
pub struct AuditWriter {
    buffer: Arc<AuditBuffer>,
}

impl AuditWriter {
    pub fn new(buffer: Arc<AuditBuffer>) -> Self {
        Self { buffer }
    }
}

impl<'a> MakeWriter<'a> for AuditWriter {
    type Writer = AuditLine;

    fn make_writer(&'a self) -> Self::Writer {
        AuditLine {
            buffer: Arc::clone(&self.buffer),
            bytes: Vec::new(),
        }
    }
}

/// One formatted event; pushed to the buffer when dropped
pub struct AuditLine {
    buffer: Arc<AuditBuffer>,
    bytes: Vec<u8>,
}

impl io::Write for AuditLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for AuditLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.bytes);
        let line = line.trim_end();
        if !line.is_empty() {
            self.buffer.push(line.to_string());
        }
    }
}

/// Create a layer writing plain or JSON lines into `buffer`
pub fn create_layer(
    config: &AuditConfig,
    buffer: &Arc<AuditBuffer>,
) -> Result<BoxedLayer, ConfigError> {
    let level = parse_level(&config.level)
        .ok_or_else(|| ConfigError::InvalidLevel(config.level.clone()))?;

    let layer = fmt::layer()
        .with_writer(AuditWriter::new(Arc::clone(buffer)))
        .with_ansi(false)
        .with_timer(ChronoUtc::rfc_3339())
        .with_target(true);

    if config.structured {
        Ok(layer.json().with_filter(level.as_trace()).boxed())
    } else {
        Ok(layer.with_filter(level.as_trace()).boxed())
    }
}
