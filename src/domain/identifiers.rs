//! Identifier and measurement types carried by every telemetry event
//!
//! Each value is a validated newtype so that an event can only be assembled
//! from non-empty identifiers and strictly positive delays and durations.

use crate::domain::errors::ValidationError;
use nutype::nutype;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Correlates the events of one logical operation (trace)
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct OperationId(String);

impl OperationId {
    pub fn generate() -> Self {
        Self::try_new(Uuid::now_v7().to_string()).expect("UUID strings are never empty")
    }
}

/// Groups the events of one simulated user session
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self::try_new(Uuid::now_v7().to_string()).expect("UUID strings are never empty")
    }
}

/// Simulated customer organisation
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct TenantId(String);

/// Simulated user within a tenant
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct UserId(String);

/// Simulated client network origin (v4 or v6)
#[nutype(
    validate(predicate = |s| std::net::IpAddr::from_str(s).is_ok()),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct UserIp(String);

impl UserIp {
    /// Address used by server-side events, which run next to the node
    pub fn loopback() -> Self {
        Self::try_new("127.0.0.1".to_string()).expect("loopback address is valid")
    }
}

/// Simulated serving node
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct NodeId(String);

#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct PageName(String);

/// Page family, e.g. `List` or `Card`
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct PageType(String);

#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct DependencyName(String);

/// Free-form payload describing the downstream call (command text, form name)
#[nutype(
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct DependencyData(String);

/// Offset from run start, in milliseconds, at which an event is emitted
///
/// The sole ordering key of the replay.
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
pub struct DelayMillis(u64);

impl DelayMillis {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.into_inner())
    }
}

/// Modelled duration of an occurrence; never zero
#[nutype(
    validate(predicate = |d| !d.is_zero()),
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
        AsRef
    )
)]
pub struct OperationDuration(Duration);

impl OperationDuration {
    /// Build from fractional seconds, rejecting zero, negative and non-finite input
    pub fn from_secs_f64(secs: f64) -> Result<Self, ValidationError> {
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(ValidationError::for_field("operation_duration"))?;
        Self::try_new(duration).map_err(ValidationError::for_field("operation_duration"))
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.as_ref().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_operation_ids_are_unique() {
        let id1 = OperationId::generate();
        let id2 = OperationId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        assert!(OperationId::try_new(String::new()).is_err());
        assert!(SessionId::try_new(String::new()).is_err());
        assert!(TenantId::try_new(String::new()).is_err());
        assert!(UserId::try_new(String::new()).is_err());
        assert!(NodeId::try_new(String::new()).is_err());
        assert!(PageName::try_new(String::new()).is_err());
        assert!(PageType::try_new(String::new()).is_err());
        assert!(DependencyName::try_new(String::new()).is_err());
        assert!(DependencyData::try_new(String::new()).is_err());
    }

    #[test]
    fn user_ip_must_parse() {
        assert!(UserIp::try_new("5.184.0.1".to_string()).is_ok());
        assert!(UserIp::try_new("::1".to_string()).is_ok());
        assert!(UserIp::try_new(String::new()).is_err());
        assert!(UserIp::try_new("not-an-ip".to_string()).is_err());
        assert_eq!(UserIp::loopback().as_ref(), "127.0.0.1");
    }

    #[test]
    fn delay_must_be_positive() {
        assert!(DelayMillis::try_new(0).is_err());
        let delay = DelayMillis::try_new(1500).unwrap();
        assert_eq!(delay.as_duration(), Duration::from_millis(1500));
    }

    #[test]
    fn duration_must_be_positive_and_finite() {
        assert!(OperationDuration::from_secs_f64(0.0).is_err());
        assert!(OperationDuration::from_secs_f64(-1.0).is_err());
        assert!(OperationDuration::from_secs_f64(f64::NAN).is_err());
        assert!(OperationDuration::try_new(Duration::ZERO).is_err());

        let duration = OperationDuration::from_secs_f64(0.4).unwrap();
        assert!((duration.as_secs_f64() - 0.4).abs() < 1e-9);
    }
}
