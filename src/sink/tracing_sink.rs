//! Sink emitting every event as a structured log record

use super::{SinkError, TelemetrySink};
use crate::domain::event::{EventKind, TelemetryEvent};
use async_trait::async_trait;
use tracing::info;

/// Delivers events to the process log under the `telemetry` target
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TelemetrySink for TracingSink {
    async fn send(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        let (kind, name) = match event.kind() {
            EventKind::PageView { page_name, .. } => ("page_view", page_name.as_ref()),
            EventKind::Dependency {
                dependency_name, ..
            } => ("dependency", dependency_name.as_ref()),
        };
        info!(
            target: "telemetry",
            kind,
            name = %name,
            delay_ms = event.delay_millis(),
            operation_id = %event.operation_id(),
            session_id = %event.session_id(),
            tenant_id = %event.tenant_id(),
            user_id = %event.user_id(),
            user_ip = %event.user_ip(),
            node_id = %event.node_id(),
            duration_ms = event.operation_duration().as_ref().as_millis() as u64,
            "telemetry event"
        );
        Ok(())
    }
}
