//! Telemetry events: one timed occurrence to be emitted to the sink
//!
//! An event is a common header (delay, identity, duration) plus a closed set
//! of kind-specific fields. Causality between events is expressed only by
//! copied identifiers: a dependency shares its parent's operation and session
//! ids, never a reference to the parent itself.

use crate::domain::identifiers::{
    DelayMillis, DependencyData, DependencyName, NodeId, OperationDuration, OperationId, PageName,
    PageType, SessionId, TenantId, UserId, UserIp,
};
use std::fmt;

/// Identity shared by causally linked events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventContext {
    pub operation_id: OperationId,
    pub session_id: SessionId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub user_ip: UserIp,
    pub node_id: NodeId,
}

/// Kind-specific payload of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A UI page opened by a user
    PageView {
        page_name: PageName,
        page_type: PageType,
    },
    /// A server-side call caused by a parent event
    Dependency {
        dependency_name: DependencyName,
        dependency_data: DependencyData,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    delay: DelayMillis,
    context: EventContext,
    operation_duration: OperationDuration,
    kind: EventKind,
}

impl TelemetryEvent {
    pub fn page_view(
        delay: DelayMillis,
        page_name: PageName,
        page_type: PageType,
        context: EventContext,
        operation_duration: OperationDuration,
    ) -> Self {
        Self {
            delay,
            context,
            operation_duration,
            kind: EventKind::PageView {
                page_name,
                page_type,
            },
        }
    }

    pub fn dependency(
        delay: DelayMillis,
        dependency_name: DependencyName,
        dependency_data: DependencyData,
        context: EventContext,
        operation_duration: OperationDuration,
    ) -> Self {
        Self {
            delay,
            context,
            operation_duration,
            kind: EventKind::Dependency {
                dependency_name,
                dependency_data,
            },
        }
    }

    /// Dependency inheriting the identity of `parent`
    ///
    /// The user IP is replaced by the loopback address since the dependency
    /// runs on the serving node.
    pub fn dependency_of(
        parent: &TelemetryEvent,
        delay: DelayMillis,
        dependency_name: DependencyName,
        dependency_data: DependencyData,
        operation_duration: OperationDuration,
    ) -> Self {
        let context = EventContext {
            user_ip: UserIp::loopback(),
            ..parent.context.clone()
        };
        Self::dependency(
            delay,
            dependency_name,
            dependency_data,
            context,
            operation_duration,
        )
    }

    pub fn delay(&self) -> DelayMillis {
        self.delay
    }

    pub fn delay_millis(&self) -> u64 {
        self.delay.into_inner()
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    pub fn operation_id(&self) -> &OperationId {
        &self.context.operation_id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.context.session_id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.context.tenant_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.context.user_id
    }

    pub fn user_ip(&self) -> &UserIp {
        &self.context.user_ip
    }

    pub fn node_id(&self) -> &NodeId {
        &self.context.node_id
    }

    pub fn operation_duration(&self) -> OperationDuration {
        self.operation_duration
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn is_page_view(&self) -> bool {
        matches!(self.kind, EventKind::PageView { .. })
    }

    pub fn is_dependency(&self) -> bool {
        matches!(self.kind, EventKind::Dependency { .. })
    }
}

/// Textual description used for the debug trace before each send
impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::PageView {
                page_name,
                page_type,
            } => write!(f, "Page, {} - {page_name} - {page_type} - ", self.delay)?,
            EventKind::Dependency {
                dependency_name,
                dependency_data,
            } => write!(
                f,
                "Dependency, {} - {dependency_name} - {dependency_data} - ",
                self.delay
            )?,
        }
        let ctx = &self.context;
        write!(
            f,
            "{} - {} {} - {} - {} - {}",
            ctx.operation_id,
            ctx.session_id,
            ctx.tenant_id,
            ctx.user_id,
            ctx.node_id,
            self.operation_duration.as_secs_f64()
        )
    }
}
