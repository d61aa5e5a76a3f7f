use crate::domain::config_types::{
    DrawBound, IntervalSeconds, LogFormat, LogLevel, NodeCount, RunWindowMillis, UsersPerTenant,
};
use crate::sink::{EnvelopeDefaults, SinkKind};
use crate::workload::WorkloadProfile;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub run: RunSettings,
    pub workload: WorkloadSettings,
    pub schedule: ScheduleSettings,
    pub sink: SinkSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunSettings {
    pub window_ms: RunWindowMillis,
    pub grace_ms: u64,
    pub number_of_nodes: NodeCount,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkloadSettings {
    pub max_tenants: DrawBound,
    pub max_operations: DrawBound,
    pub users_per_tenant: UsersPerTenant,
    pub max_operation_seed: DrawBound,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSettings {
    pub interval_secs: IntervalSeconds,
    pub run_on_startup: bool,
    pub run_once: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinkSettings {
    pub kind: SinkKind,
    pub instrumentation_key: String,
    pub deployment_type: String,
    pub platform_version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("run.window_ms", 180_000)?
            .set_default("run.grace_ms", 5_000)?
            .set_default("run.number_of_nodes", 5)?
            .set_default("workload.max_tenants", 9)?
            .set_default("workload.max_operations", 49)?
            .set_default("workload.users_per_tenant", 2)?
            .set_default("workload.max_operation_seed", 99)?
            .set_default("schedule.interval_secs", 420)?
            .set_default("schedule.run_on_startup", false)?
            .set_default("schedule.run_once", false)?
            .set_default("sink.kind", "log")?
            .set_default("sink.instrumentation_key", "")?
            .set_default("sink.deployment_type", "Prod")?
            .set_default("sink.platform_version", "1.0.0.0")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Add configuration file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("TELEMETRY_PULSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Random draw bounds for the workload generator
    pub fn workload_profile(&self) -> WorkloadProfile {
        WorkloadProfile {
            max_delay: self.run.window_ms,
            number_of_nodes: self.run.number_of_nodes,
            max_tenants: self.workload.max_tenants,
            max_operations: self.workload.max_operations,
            users_per_tenant: self.workload.users_per_tenant,
            max_operation_seed: self.workload.max_operation_seed,
        }
    }

    pub fn envelope_defaults(&self) -> EnvelopeDefaults {
        EnvelopeDefaults {
            instrumentation_key: self.sink.instrumentation_key.clone(),
            deployment_type: self.sink.deployment_type.clone(),
            platform_version: self.sink.platform_version.clone(),
        }
    }

    /// Time the host grants a run before cancelling its replay
    pub fn run_budget(&self) -> Duration {
        self.run.window_ms.as_duration() + Duration::from_millis(self.run.grace_ms)
    }
}
