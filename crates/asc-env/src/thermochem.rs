//! Thermochemical performance solver contract.

use crate::error::EnvResult;

/// Specific-impulse estimator for one fixed propellant combination.
///
/// The core guarantees it only calls this with `chamber_pressure_pa > 0`;
/// zero-chamber-pressure cases are short-circuited before the solver.
pub trait IspSolver {
    fn estimate_isp_s(
        &self,
        chamber_pressure_pa: f64,
        mixture_ratio: f64,
        expansion_ratio: f64,
        ambient_pressure_pa: f64,
    ) -> EnvResult<f64>;
}

/// Constructs solvers per propellant identity.
///
/// Solver construction is expensive; callers cache the returned solver for
/// the lifetime of their run. The factory itself is shared read-only across
/// runs, so it must be thread safe.
pub trait IspSolverFactory: Send + Sync {
    fn bipropellant(&self, fuel: &str, oxidizer: &str) -> EnvResult<Box<dyn IspSolver>>;

    fn monopropellant(&self, propellant: &str) -> EnvResult<Box<dyn IspSolver>>;
}

/// Data-driven adapter: a fixed Isp per propellant identity, keyed as
/// `"fuel/oxidizer"` for bipropellants and `"propellant"` for monopropellants.
///
/// Useful where no thermochemistry backend is wired in; a real backend
/// replaces this without touching the callers.
#[derive(Clone, Debug, Default)]
pub struct FixedIspFactory {
    entries: Vec<(String, f64)>,
    fallback_isp_s: Option<f64>,
}

impl FixedIspFactory {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self {
            entries,
            fallback_isp_s: None,
        }
    }

    /// Serve `isp_s` for any propellant identity not in the table.
    pub fn with_fallback(mut self, isp_s: f64) -> Self {
        self.fallback_isp_s = Some(isp_s);
        self
    }

    fn solver_for(&self, key: &str) -> EnvResult<Box<dyn IspSolver>> {
        let isp_s = self
            .entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, isp)| *isp)
            .or(self.fallback_isp_s)
            .ok_or_else(|| crate::error::EnvError::UnknownPropellant {
                name: key.to_string(),
            })?;
        Ok(Box::new(FixedIsp { isp_s }))
    }
}

impl IspSolverFactory for FixedIspFactory {
    fn bipropellant(&self, fuel: &str, oxidizer: &str) -> EnvResult<Box<dyn IspSolver>> {
        self.solver_for(&format!("{fuel}/{oxidizer}"))
    }

    fn monopropellant(&self, propellant: &str) -> EnvResult<Box<dyn IspSolver>> {
        self.solver_for(propellant)
    }
}

struct FixedIsp {
    isp_s: f64,
}

impl IspSolver for FixedIsp {
    fn estimate_isp_s(
        &self,
        _chamber_pressure_pa: f64,
        _mixture_ratio: f64,
        _expansion_ratio: f64,
        _ambient_pressure_pa: f64,
    ) -> EnvResult<f64> {
        Ok(self.isp_s)
    }
}
