//! Telemetry Pulse - a synthetic telemetry load generator
//!
//! Each run fabricates a random, internally consistent batch of page views
//! and the server-side dependencies they trigger, then replays the batch
//! against a telemetry sink with realistic spacing inside a bounded window.

pub mod application;
pub mod builders;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod scheduler;
pub mod sink;
pub mod workload;

pub use application::Application;
pub use error::{Error, Result};
