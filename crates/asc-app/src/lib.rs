//! asc-app: flight execution services over projects and the run store.

pub mod error;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use run_service::{ensure_run, run_batch, RunOptions, RunResponse};
