//! asc-env: contracts for the external physics providers.
//!
//! The flight core consumes two collaborators it does not implement itself:
//! - an atmosphere model (pressure, density, speed of sound by altitude)
//! - a thermochemical performance solver (specific impulse per propellant pair)
//!
//! Both are narrow trait contracts here; concrete backends plug in from the
//! outside. A table-backed atmosphere adapter is provided for data-driven use.

pub mod atmosphere;
pub mod error;
pub mod thermochem;

pub use atmosphere::{Atmosphere, AtmosphereSample, TableAtmosphere};
pub use error::{EnvError, EnvResult};
pub use thermochem::{FixedIspFactory, IspSolver, IspSolverFactory};
