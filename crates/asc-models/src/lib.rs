//! asc-models: behavior models for fluid components and vehicle aerodynamics.
//!
//! A behavior model is a pure function of a state (and optionally static
//! parameters). Variants:
//! - scalar: constant, linear, 1-D lookup (extrapolating), 2-D lookup
//!   (range-checked by default, fill-value opt-in)
//! - fluid: constant or per-field affine transform of a fluid state record
//! - Isp: thermochemistry-backed specific impulse with a lazily cached solver
//!
//! Models never mutate their inputs; the Isp solver handle is the single
//! deliberate piece of lazy internal state.

pub mod error;
pub mod field;
pub mod fluid;
pub mod isp;
pub mod lut;
pub mod scalar;

pub use error::{ModelError, ModelResult};
pub use field::{lookup, FieldMap, NoParams};
pub use fluid::{Affine, FluidModel, FluidState};
pub use isp::{IspModel, Propellants};
pub use lut::{Lut1d, Lut2d, OutOfDomainPolicy};
pub use scalar::ScalarModel;
