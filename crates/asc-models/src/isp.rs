//! Thermochemistry-backed specific impulse model.

use std::cell::RefCell;
use std::sync::Arc;

use asc_env::{IspSolver, IspSolverFactory};

use crate::error::{ModelError, ModelResult};

/// Propellant identity the solver is keyed by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Propellants {
    Bipropellant { fuel: String, oxidizer: String },
    Monopropellant { propellant: String },
}

/// Isp model with a lazily constructed, per-model solver cache.
///
/// The solver is built from the factory on the first evaluation with positive
/// chamber pressure and reused for the model's lifetime. This is the single
/// deliberately stateful part of the model layer; the cache lives on the
/// model instance, never in a global.
pub struct IspModel {
    efficiency: f64,
    propellants: Propellants,
    factory: Arc<dyn IspSolverFactory>,
    solver: RefCell<Option<Box<dyn IspSolver>>>,
}

impl IspModel {
    pub fn bipropellant(
        efficiency: f64,
        fuel: impl Into<String>,
        oxidizer: impl Into<String>,
        factory: Arc<dyn IspSolverFactory>,
    ) -> Self {
        Self {
            efficiency,
            propellants: Propellants::Bipropellant {
                fuel: fuel.into(),
                oxidizer: oxidizer.into(),
            },
            factory,
            solver: RefCell::new(None),
        }
    }

    pub fn monopropellant(propellant: impl Into<String>, factory: Arc<dyn IspSolverFactory>) -> Self {
        Self {
            efficiency: 1.0,
            propellants: Propellants::Monopropellant {
                propellant: propellant.into(),
            },
            factory,
            solver: RefCell::new(None),
        }
    }

    pub fn propellants(&self) -> &Propellants {
        &self.propellants
    }

    /// Isp in seconds. Exactly 0 at non-positive chamber pressure, in which
    /// case the solver is neither constructed nor invoked.
    pub fn apply(
        &self,
        chamber_pressure_pa: f64,
        mixture_ratio: f64,
        expansion_ratio: f64,
        ambient_pressure_pa: f64,
    ) -> ModelResult<f64> {
        if chamber_pressure_pa <= 0.0 {
            return Ok(0.0);
        }

        let mut slot = self.solver.borrow_mut();
        if slot.is_none() {
            let solver = match &self.propellants {
                Propellants::Bipropellant { fuel, oxidizer } => {
                    self.factory.bipropellant(fuel, oxidizer)?
                }
                Propellants::Monopropellant { propellant } => {
                    self.factory.monopropellant(propellant)?
                }
            };
            *slot = Some(solver);
        }
        let solver = slot.as_deref().ok_or(ModelError::Invariant {
            what: "Isp solver cache empty after initialization",
        })?;

        let isp = solver.estimate_isp_s(
            chamber_pressure_pa,
            mixture_ratio,
            expansion_ratio,
            ambient_pressure_pa,
        )?;
        Ok(self.efficiency * isp)
    }
}

impl std::fmt::Debug for IspModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IspModel")
            .field("efficiency", &self.efficiency)
            .field("propellants", &self.propellants)
            .field("solver_cached", &self.solver.borrow().is_some())
            .finish()
    }
}
