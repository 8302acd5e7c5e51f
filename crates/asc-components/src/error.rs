//! Error types for component construction and graph evaluation.

use asc_models::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComponentError {
    /// Build-time configuration problem; fatal for the run being assembled.
    #[error("Invalid configuration: {what}")]
    Config { what: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;
