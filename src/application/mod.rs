//! Application services: the run driver and the timer host
//!
//! This module wires the workload generator, the emission scheduler and a
//! sink into scheduled, time-bounded runs.

pub mod app;
pub mod run;

pub use app::Application;
pub use run::{RunPhase, RunReport, TelemetryRun};
