//! Error types for flight simulation.

use thiserror::Error;

/// Errors encountered during trajectory integration.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Step size underflow at t={t_s} s")]
    StepUnderflow { t_s: f64 },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<asc_components::ComponentError> for SimError {
    fn from(e: asc_components::ComponentError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<asc_models::ModelError> for SimError {
    fn from(e: asc_models::ModelError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<asc_env::EnvError> for SimError {
    fn from(e: asc_env::EnvError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<asc_core::error::CoreError> for SimError {
    fn from(e: asc_core::error::CoreError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
