//! Telemetry sinks: destinations the scheduler delivers events to
//!
//! A sink is append-only and is called sequentially by a single replay.
//! Failures are per event; the scheduler logs them and moves on.

pub mod envelope;
pub mod json_lines;
pub mod memory;
pub mod tracing_sink;

pub use envelope::{EnvelopeDefaults, TelemetryEnvelope};
pub use json_lines::JsonLinesSink;
pub use memory::MemorySink;
pub use tracing_sink::TracingSink;

use crate::domain::event::TelemetryEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("event rejected: {0}")]
    Rejected(String),
}

/// Capability to deliver one event to a telemetry backend
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError>;

    /// Push out anything buffered; called once after a replay
    async fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Structured log records through `tracing`
    #[default]
    Log,
    /// One JSON envelope per line on stdout
    Json,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Log => "log",
            SinkKind::Json => "json",
        }
    }

    /// Fresh sink instance; one is created per run
    pub fn create(&self, defaults: &EnvelopeDefaults) -> Box<dyn TelemetrySink> {
        match self {
            SinkKind::Log => Box::new(TracingSink::new()),
            SinkKind::Json => Box::new(JsonLinesSink::stdout(defaults.clone())),
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
