//! asc-sim: point-mass flight dynamics and trajectory integration.

pub mod error;
pub mod integrator;
pub mod model;
pub mod trajectory;
pub mod vehicle;

pub use error::{SimError, SimResult};
pub use integrator::{Rk45, Step};
pub use model::{State, TransientModel, VX, VY, X, Y};
pub use trajectory::{fly, FlightOptions, FlightSummary, Termination};
pub use vehicle::{FlightPhase, FlightSample, Vehicle, VehicleConfig};
