//! In-process sink that keeps every delivered event, for dry runs and tests

use super::{SinkError, TelemetrySink};
use crate::domain::event::TelemetryEvent;
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in delivery order
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
