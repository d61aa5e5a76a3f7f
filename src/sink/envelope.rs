//! Wire shape of an event as delivered to an ingestion endpoint

use crate::domain::event::{EventKind, TelemetryEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

const PAGE_URL: &str = "/GetPage";
const PAGE_OPERATION_NAME: &str = "OpenForm";
const SERVER: &str = "Server";
const SUCCESS_CODE: &str = "200";

/// Values stamped on every envelope, taken from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeDefaults {
    pub instrumentation_key: String,
    pub deployment_type: String,
    pub platform_version: String,
}

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        Self {
            instrumentation_key: String::new(),
            deployment_type: "Prod".to_string(),
            platform_version: "1.0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEnvelope {
    pub name: &'static str,
    pub time: DateTime<Utc>,
    pub instrumentation_key: String,
    pub tags: BTreeMap<&'static str, String>,
    pub data: EnvelopeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "baseType")]
pub enum EnvelopeData {
    #[serde(rename = "PageViewData", rename_all = "camelCase")]
    PageView {
        name: String,
        url: &'static str,
        duration: String,
        properties: BTreeMap<&'static str, String>,
    },
    #[serde(rename = "RemoteDependencyData", rename_all = "camelCase")]
    Dependency {
        id: String,
        name: String,
        #[serde(rename = "type")]
        dependency_type: &'static str,
        target: &'static str,
        data: String,
        duration: String,
        result_code: &'static str,
        success: bool,
        properties: BTreeMap<&'static str, String>,
    },
}

impl TelemetryEnvelope {
    /// Wrap `event` as sent at `time`
    pub fn from_event(
        event: &TelemetryEvent,
        defaults: &EnvelopeDefaults,
        time: DateTime<Utc>,
    ) -> Self {
        let ctx = event.context();
        let mut tags = BTreeMap::from([
            ("ai.cloud.roleInstance", ctx.node_id.to_string()),
            ("ai.session.id", ctx.session_id.to_string()),
            ("ai.location.ip", ctx.user_ip.to_string()),
            ("ai.operation.id", ctx.operation_id.to_string()),
            ("ai.user.id", ctx.user_id.to_string()),
            ("ai.user.accountId", ctx.user_id.to_string()),
        ]);
        let mut properties = BTreeMap::from([
            ("DeploymentType", defaults.deployment_type.clone()),
            ("PlatformVersion", defaults.platform_version.clone()),
            ("TenantId", ctx.tenant_id.to_string()),
        ]);
        let duration = format_duration(*event.operation_duration().as_ref());

        let (name, data) = match event.kind() {
            EventKind::PageView {
                page_name,
                page_type,
            } => {
                tags.insert("ai.operation.name", PAGE_OPERATION_NAME.to_string());
                properties.insert("Type", page_type.to_string());
                (
                    "PageView",
                    EnvelopeData::PageView {
                        name: page_name.to_string(),
                        url: PAGE_URL,
                        duration,
                        properties,
                    },
                )
            }
            EventKind::Dependency {
                dependency_name,
                dependency_data,
            } => {
                tags.insert("ai.operation.parentId", ctx.operation_id.to_string());
                (
                    "RemoteDependency",
                    EnvelopeData::Dependency {
                        id: Uuid::now_v7().to_string(),
                        name: dependency_name.to_string(),
                        dependency_type: SERVER,
                        target: SERVER,
                        data: dependency_data.to_string(),
                        duration,
                        result_code: SUCCESS_CODE,
                        success: true,
                        properties,
                    },
                )
            }
        };

        Self {
            name,
            time,
            instrumentation_key: defaults.instrumentation_key.clone(),
            tags,
            data,
        }
    }
}

/// `d.hh:mm:ss.fff`
fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    let days = total_secs / 86_400;
    format!("{days}.{hours:02}:{mins:02}:{secs:02}.{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::page_view_at;
    use crate::domain::identifiers::{
        DelayMillis, DependencyData, DependencyName, OperationDuration,
    };
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(Duration::from_millis(400)), "0.00:00:00.400");
        assert_eq!(format_duration(Duration::from_secs(3)), "0.00:00:03.000");
        assert_eq!(
            format_duration(Duration::from_secs(90_061)),
            "1.01:01:01.000"
        );
    }

    #[test]
    fn page_view_envelope_carries_identity() {
        let event = page_view_at(100);
        let envelope =
            TelemetryEnvelope::from_event(&event, &EnvelopeDefaults::default(), fixed_time());

        assert_eq!(envelope.name, "PageView");
        assert_eq!(envelope.tags["ai.operation.id"], "op-1");
        assert_eq!(envelope.tags["ai.operation.name"], "OpenForm");
        assert_eq!(envelope.tags["ai.cloud.roleInstance"], "AS0001_2");
        assert_eq!(envelope.tags["ai.location.ip"], "5.184.0.3");
        match &envelope.data {
            EnvelopeData::PageView {
                name, properties, ..
            } => {
                assert_eq!(name, "Item card");
                assert_eq!(properties["Type"], "Card");
                assert_eq!(properties["TenantId"], "Tenant_1");
                assert_eq!(properties["DeploymentType"], "Prod");
            }
            other => panic!("expected page view data, got {other:?}"),
        }
    }

    #[test]
    fn dependency_envelope_points_at_parent_operation() {
        let parent = page_view_at(100);
        let dependency = TelemetryEvent::dependency_of(
            &parent,
            DelayMillis::try_new(280).unwrap(),
            DependencyName::try_new("OpenForm".to_string()).unwrap(),
            DependencyData::try_new("Form: Item card - Type: Card".to_string()).unwrap(),
            OperationDuration::from_secs_f64(0.4).unwrap(),
        );
        let envelope =
            TelemetryEnvelope::from_event(&dependency, &EnvelopeDefaults::default(), fixed_time());

        assert_eq!(envelope.name, "RemoteDependency");
        assert_eq!(envelope.tags["ai.operation.parentId"], "op-1");
        assert_eq!(envelope.tags["ai.location.ip"], "127.0.0.1");

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["baseType"], "RemoteDependencyData");
        assert_eq!(json["data"]["type"], "Server");
        assert_eq!(json["data"]["resultCode"], "200");
        assert_eq!(json["data"]["duration"], "0.00:00:00.400");
        assert_eq!(json["instrumentationKey"], "");
    }
}
