//! Workload generation: simulates a random multi-tenant user population and
//! collects every event its operations produce into one run's dataset

pub mod generator;

pub use generator::{GenerationError, Workload, WorkloadGenerator, WorkloadProfile};
