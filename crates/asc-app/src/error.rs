//! Application-level error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(#[from] asc_project::ProjectError),

    #[error("Simulation error: {0}")]
    Sim(#[from] asc_sim::SimError),

    #[error("Results error: {0}")]
    Results(#[from] asc_results::ResultsError),
}

pub type AppResult<T> = Result<T, AppError>;
