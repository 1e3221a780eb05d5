//! Pipeline error type

use crate::backend::traits::HostError;
use thiserror::Error;

/// Errors surfaced by building or rendering with the pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Host error: {0}")]
    Host(#[from] HostError),
    #[error("Shadow rendering failed: {0}")]
    Shadow(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
