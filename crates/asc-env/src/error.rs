//! Error types for provider contracts.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    /// Query outside the provider's modeled domain. Callers are expected to
    /// recover from this with a fixed fallback, never to abort a run on it.
    #[error("Out of modeled domain: {what} = {value}")]
    OutOfDomain { what: &'static str, value: f64 },

    #[error("Unknown propellant: {name}")]
    UnknownPropellant { name: String },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type EnvResult<T> = Result<T, EnvError>;
