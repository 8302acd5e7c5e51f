//! Error types for behavior model evaluation.

use asc_env::EnvError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Field '{field}' not found in state or parameters")]
    MissingField { field: String },

    #[error("Lookup input out of table domain: {axis} = {value} (table spans {min}..{max})")]
    OutOfDomain {
        axis: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid table: {what}")]
    InvalidTable { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },

    #[error(transparent)]
    Env(#[from] EnvError),
}

pub type ModelResult<T> = Result<T, ModelError>;
