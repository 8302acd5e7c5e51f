//! asc-components: vehicle hardware models.
//!
//! Structural parts contribute inert mass; fluid nodes (tanks and
//! pass-through parts) form the pull-based propellant feed graph; the engine
//! terminates two feed chains and turns them into thrust.

pub mod engine;
pub mod error;
pub mod node;
pub mod part;
pub mod passthrough;
pub mod tank;

pub use engine::{Engine, EngineState};
pub use error::{ComponentError, ComponentResult};
pub use node::{share, FluidNode, SharedNode};
pub use part::StructuralPart;
pub use passthrough::Passthrough;
pub use tank::{PressurantPolicy, Tank};
