//! Infrastructure layer for telemetry pulse
//!
//! This module contains cross-cutting concerns shared by the application
//! and the scheduler.

pub mod log_messages;
