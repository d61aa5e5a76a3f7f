//! Validated configuration values
//!
//! Everything read from settings files or the environment lands in one of
//! these types, so out-of-range draws and windows are rejected at load time.

use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::Level;

/// Length of one run window in milliseconds
///
/// Every generated event is scheduled within `[1, window]`. Capped at one hour.
#[nutype(
    validate(predicate = |ms| *ms > 0 && *ms <= 3_600_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct RunWindowMillis(u64);

impl RunWindowMillis {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.into_inner())
    }
}

impl Default for RunWindowMillis {
    fn default() -> Self {
        // three minutes
        Self::try_new(180_000).expect("Default run window is valid")
    }
}

/// Number of simulated serving nodes
#[nutype(
    validate(predicate = |count| *count > 0 && *count <= 1000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct NodeCount(u32);

impl Default for NodeCount {
    fn default() -> Self {
        Self::try_new(5).expect("Default node count is valid")
    }
}

/// Seconds between two scheduled runs
#[nutype(
    validate(greater = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct IntervalSeconds(u64);

impl IntervalSeconds {
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.into_inner())
    }
}

impl Default for IntervalSeconds {
    fn default() -> Self {
        Self::try_new(420).expect("Default interval is valid")
    }
}

/// Upper bound of a `[1, n]` random draw (tenants, operations, seeds)
#[nutype(
    validate(predicate = |n| *n > 0 && *n <= 100_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct DrawBound(u32);

/// Simulated users per tenant id unit (`maxUserId = tenantId * n`)
#[nutype(
    validate(predicate = |n| *n > 0 && *n <= 1000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct UsersPerTenant(u32);

impl Default for UsersPerTenant {
    fn default() -> Self {
        Self::try_new(2).expect("Default users per tenant is valid")
    }
}

/// Default verbosity when `RUST_LOG` is not set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl LogLevel {
    /// Filter directive understood by `EnvFilter`
    pub fn directive(self) -> String {
        Level::from(self).as_str().to_lowercase()
    }
}

/// Shape of the log lines written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_window_validation() {
        assert!(RunWindowMillis::try_new(1).is_ok());
        assert!(RunWindowMillis::try_new(180_000).is_ok());
        assert!(RunWindowMillis::try_new(3_600_000).is_ok());
        assert!(RunWindowMillis::try_new(0).is_err());
        assert!(RunWindowMillis::try_new(3_600_001).is_err());
    }

    #[test]
    fn test_node_count_validation() {
        assert!(NodeCount::try_new(1).is_ok());
        assert!(NodeCount::try_new(1000).is_ok());
        assert!(NodeCount::try_new(0).is_err());
        assert!(NodeCount::try_new(1001).is_err());
    }

    #[test]
    fn test_draw_bound_validation() {
        assert!(DrawBound::try_new(1).is_ok());
        assert!(DrawBound::try_new(99).is_ok());
        assert!(DrawBound::try_new(0).is_err());
        assert!(DrawBound::try_new(100_001).is_err());
    }

    #[test]
    fn test_users_per_tenant_validation() {
        assert!(UsersPerTenant::try_new(2).is_ok());
        assert!(UsersPerTenant::try_new(0).is_err());
    }

    #[test]
    fn log_level_deserializes_and_maps_to_tracing() {
        let level: LogLevel = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(Level::from(level), Level::WARN);
        assert_eq!(LogLevel::Debug.directive(), "debug");
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert!(serde_json::from_str::<LogLevel>("\"loud\"").is_err());
    }

    #[test]
    fn log_format_deserializes() {
        let format: LogFormat = serde_json::from_str("\"compact\"").unwrap();
        assert_eq!(format, LogFormat::Compact);
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
        assert!(serde_json::from_str::<LogFormat>("\"xml\"").is_err());
    }
}
