//! Domain types for telemetry pulse
//!
//! This module contains the event entity model and the validated value
//! types it is built from.

pub mod config_types;
pub mod errors;
pub mod event;
pub mod identifiers;

pub use errors::ValidationError;
pub use event::{EventContext, EventKind, TelemetryEvent};
pub use identifiers::*;
