use crate::workload::GenerationError;
use thiserror::Error;

/// Telemetry pulse error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl Error {
    /// Catalog or builder defect rather than an environmental failure
    pub fn is_consistency_fault(&self) -> bool {
        match self {
            Error::Generation(e) => e.is_consistency_fault(),
            Error::Config(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
