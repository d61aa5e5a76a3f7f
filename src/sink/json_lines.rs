//! Sink writing one JSON envelope per line

use super::envelope::{EnvelopeDefaults, TelemetryEnvelope};
use super::{SinkError, TelemetrySink};
use crate::domain::event::TelemetryEvent;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::io::Write;

pub struct JsonLinesSink {
    writer: Mutex<Box<dyn Write + Send>>,
    defaults: EnvelopeDefaults,
}

impl JsonLinesSink {
    pub fn new(writer: impl Write + Send + 'static, defaults: EnvelopeDefaults) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            defaults,
        }
    }

    pub fn stdout(defaults: EnvelopeDefaults) -> Self {
        Self::new(std::io::stdout(), defaults)
    }
}

#[async_trait]
impl TelemetrySink for JsonLinesSink {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        let envelope = TelemetryEnvelope::from_event(event, &self.defaults, Utc::now());
        let line = serde_json::to_string(&envelope)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), SinkError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
