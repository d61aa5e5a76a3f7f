//! Item builders: generators of causally linked event groups
//!
//! A builder turns one randomised operation request into one or more
//! telemetry events that are appended verbatim to the run's dataset.
//! New scenario families plug in by implementing [`ItemBuilder`].

pub mod page_view;

pub use page_view::{PageViewBuilder, ScenarioTemplate, DEFAULT_CATALOG};

use crate::domain::errors::ValidationError;
use crate::domain::event::{EventContext, TelemetryEvent};
use crate::domain::identifiers::{NodeId, OperationId, SessionId, TenantId, UserId, UserIp};
use thiserror::Error;

/// Client addresses handed out to simulated users, indexed by user id
const USER_IPS: [&str; 12] = [
    // Poland
    "5.184.0.1",
    "5.184.0.2",
    "5.184.0.3",
    // Luxembourg
    "87.254.96.1",
    "87.254.96.2",
    "87.254.96.3",
    // Denmark
    "2.56.0.1",
    "2.56.0.2",
    "2.56.0.3",
    // France
    "5.135.0.1",
    "5.135.0.2",
    "5.135.0.3",
];

const NODE_PREFIX: &str = "AS0001_";

/// Randomised parameters of one simulated operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    /// Emission offset of the primary event, in `[1, maxDelay]`
    pub delay: u64,
    /// Selects a scenario template by modulo indexing
    pub operation_seed: u32,
    pub tenant_id: u32,
    pub user_id: u32,
    pub node_id: u32,
    /// Drives both the primary and the dependency durations
    pub duration_seed: u64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("inconsistent durations for {page}: page {page_duration}s must exceed server {server_duration}s")]
    Consistency {
        page: String,
        page_duration: f64,
        server_duration: f64,
    },

    #[error("dependency of {page} ends at {dependency_end_ms}ms, after its page view ends at {page_end_ms}ms")]
    DependencyOutlastsPage {
        page: String,
        dependency_end_ms: f64,
        page_end_ms: f64,
    },

    #[error("scenario catalog is empty")]
    EmptyCatalog,

    #[error("invalid scenario template {page}: {reason}")]
    InvalidTemplate { page: String, reason: String },
}

impl BuildError {
    /// Whether the error stems from catalog numbers rather than bad identifiers
    pub fn is_consistency_fault(&self) -> bool {
        matches!(
            self,
            BuildError::Consistency { .. } | BuildError::DependencyOutlastsPage { .. }
        )
    }
}

/// Capability shared by every scenario family
pub trait ItemBuilder: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Produce the causally linked events of one operation, primary first
    fn build(&self, request: &BuildRequest) -> Result<Vec<TelemetryEvent>, BuildError>;
}

pub fn tenant_id(tenant: u32) -> Result<TenantId, ValidationError> {
    TenantId::try_new(format!("Tenant_{tenant}")).map_err(ValidationError::for_field("tenant_id"))
}

pub fn user_id(user: u32) -> Result<UserId, ValidationError> {
    UserId::try_new(format!("User_{user}")).map_err(ValidationError::for_field("user_id"))
}

pub fn node_id(node: u32) -> Result<NodeId, ValidationError> {
    NodeId::try_new(format!("{NODE_PREFIX}{node}")).map_err(ValidationError::for_field("node_id"))
}

/// A user always connects from the same address
pub fn user_ip(user: u32) -> Result<UserIp, ValidationError> {
    let ip = USER_IPS[user as usize % USER_IPS.len()];
    UserIp::try_new(ip.to_string()).map_err(ValidationError::for_field("user_ip"))
}

/// Identity of a fresh operation issued by the requested actor
pub fn fresh_context(request: &BuildRequest) -> Result<EventContext, ValidationError> {
    Ok(EventContext {
        operation_id: OperationId::generate(),
        session_id: SessionId::generate(),
        tenant_id: tenant_id(request.tenant_id)?,
        user_id: user_id(request.user_id)?,
        user_ip: user_ip(request.user_id)?,
        node_id: node_id(request.node_id)?,
    })
}
