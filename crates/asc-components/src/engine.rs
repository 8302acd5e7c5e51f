//! Bipropellant engine: terminates the two feed chains and produces thrust.

use asc_core::units::constants::G0_MPS2;
use asc_models::IspModel;

use crate::error::{ComponentError, ComponentResult};
use crate::node::SharedNode;

/// Engine operating point after one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineState {
    pub time_s: f64,
    pub massflow_fuel_kg_s: f64,
    pub temperature_fuel_k: f64,
    pub pressure_fuel_pa: f64,
    pub massflow_ox_kg_s: f64,
    pub temperature_ox_k: f64,
    pub pressure_ox_pa: f64,
    pub massflow_kg_s: f64,
    pub mixture_ratio: f64,
    pub chamber_pressure_pa: f64,
    pub ambient_pressure_pa: f64,
    pub isp_s: f64,
    pub thrust_n: f64,
}

impl EngineState {
    const IDLE: Self = Self {
        time_s: 0.0,
        massflow_fuel_kg_s: 0.0,
        temperature_fuel_k: 0.0,
        pressure_fuel_pa: 0.0,
        massflow_ox_kg_s: 0.0,
        temperature_ox_k: 0.0,
        pressure_ox_pa: 0.0,
        massflow_kg_s: 0.0,
        mixture_ratio: 0.0,
        chamber_pressure_pa: 0.0,
        ambient_pressure_pa: 0.0,
        isp_s: 0.0,
        thrust_n: 0.0,
    };
}

/// The engine pulls its fuel and oxidizer injectors, forms the chamber
/// operating point, and evaluates Isp against ambient pressure.
///
/// Chamber pressure is taken as the weaker of the two injector feed
/// pressures: the chamber cannot run hotter than its starved side. Once
/// either side runs dry the total massflow goes to zero and thrust with it.
pub struct Engine {
    name: String,
    dry_mass_kg: f64,
    length_m: f64,
    expansion_ratio: f64,
    isp_model: IspModel,
    fuel: SharedNode,
    oxidizer: SharedNode,
    state: EngineState,
    memo_time: Option<f64>,
}

impl Engine {
    pub fn new(
        name: impl Into<String>,
        dry_mass_kg: f64,
        length_m: f64,
        expansion_ratio: f64,
        isp_model: IspModel,
        fuel: SharedNode,
        oxidizer: SharedNode,
    ) -> ComponentResult<Self> {
        if !(dry_mass_kg.is_finite() && dry_mass_kg >= 0.0) {
            return Err(ComponentError::Config {
                what: "engine dry mass must be finite and non-negative".to_string(),
            });
        }
        if !(expansion_ratio.is_finite() && expansion_ratio >= 1.0) {
            return Err(ComponentError::Config {
                what: "engine expansion ratio must be at least 1".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            dry_mass_kg,
            length_m,
            expansion_ratio,
            isp_model,
            fuel,
            oxidizer,
            state: EngineState::IDLE,
            memo_time: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dry_mass_kg(&self) -> f64 {
        self.dry_mass_kg
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn thrust_n(&self) -> f64 {
        self.state.thrust_n
    }

    /// Pull both feed chains at `time_s` and recompute the operating point.
    ///
    /// Re-evaluation at the identical time returns the stored state, matching
    /// the feed nodes' same-tick behavior.
    pub fn update_state(
        &mut self,
        time_s: f64,
        ambient_pressure_pa: f64,
    ) -> ComponentResult<EngineState> {
        if self.memo_time == Some(time_s) {
            return Ok(self.state);
        }

        let fuel = self.fuel.borrow_mut().pull(time_s)?;
        let ox = self.oxidizer.borrow_mut().pull(time_s)?;

        let massflow = fuel.massflow_kg_s + ox.massflow_kg_s;
        let mixture_ratio = if fuel.massflow_kg_s == 0.0 {
            0.0
        } else {
            ox.massflow_kg_s / fuel.massflow_kg_s
        };
        let chamber_pressure_pa = fuel.pressure_pa.min(ox.pressure_pa);

        let isp_s = self.isp_model.apply(
            chamber_pressure_pa,
            mixture_ratio,
            self.expansion_ratio,
            ambient_pressure_pa,
        )?;

        let thrust_n = if massflow <= 0.0 || chamber_pressure_pa <= 0.0 {
            0.0
        } else {
            massflow * isp_s * G0_MPS2
        };

        self.state = EngineState {
            time_s,
            massflow_fuel_kg_s: fuel.massflow_kg_s,
            temperature_fuel_k: fuel.temperature_k,
            pressure_fuel_pa: fuel.pressure_pa,
            massflow_ox_kg_s: ox.massflow_kg_s,
            temperature_ox_k: ox.temperature_k,
            pressure_ox_pa: ox.pressure_pa,
            massflow_kg_s: massflow,
            mixture_ratio,
            chamber_pressure_pa,
            ambient_pressure_pa,
            isp_s,
            thrust_n,
        };
        self.memo_time = Some(time_s);
        Ok(self.state)
    }

    pub fn sample(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("time", self.state.time_s),
            ("massflow_fuel", self.state.massflow_fuel_kg_s),
            ("temperature_fuel", self.state.temperature_fuel_k),
            ("pressure_fuel", self.state.pressure_fuel_pa),
            ("massflow_ox", self.state.massflow_ox_kg_s),
            ("temperature_ox", self.state.temperature_ox_k),
            ("pressure_ox", self.state.pressure_ox_pa),
            ("massflow", self.state.massflow_kg_s),
            ("O/F", self.state.mixture_ratio),
            ("P_cc", self.state.chamber_pressure_pa),
            ("P_amb", self.state.ambient_pressure_pa),
            ("Isp", self.state.isp_s),
            ("thrust", self.state.thrust_n),
        ]
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("dry_mass_kg", &self.dry_mass_kg)
            .field("expansion_ratio", &self.expansion_ratio)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{share, FluidNode};
    use crate::tank::Tank;
    use asc_env::{EnvResult, IspSolver, IspSolverFactory};
    use asc_models::{FluidModel, FluidState};
    use std::sync::Arc;

    struct FixedIsp(f64);

    impl IspSolver for FixedIsp {
        fn estimate_isp_s(&self, _pcc: f64, _of: f64, _eps: f64, _pamb: f64) -> EnvResult<f64> {
            Ok(self.0)
        }
    }

    struct FixedFactory(f64);

    impl IspSolverFactory for FixedFactory {
        fn bipropellant(&self, _fuel: &str, _oxidizer: &str) -> EnvResult<Box<dyn IspSolver>> {
            Ok(Box::new(FixedIsp(self.0)))
        }

        fn monopropellant(&self, _propellant: &str) -> EnvResult<Box<dyn IspSolver>> {
            Ok(Box::new(FixedIsp(self.0)))
        }
    }

    fn tank(fluid: &str, fluid_mass: f64, massflow: f64, pressure: f64) -> Tank {
        Tank::new(
            format!("{fluid} tank"),
            4.0,
            0.05,
            fluid,
            fluid_mass,
            pressure,
            290.0,
            0.8,
            FluidModel::Constant(FluidState::new(massflow, 290.0, pressure)),
            None,
        )
        .unwrap()
    }

    fn engine(fuel: Tank, ox: Tank, isp: f64) -> Engine {
        let model = IspModel::bipropellant(1.0, "ethanol", "n2o", Arc::new(FixedFactory(isp)));
        Engine::new("engine", 5.0, 0.4, 4.5, model, share(fuel), share(ox)).unwrap()
    }

    #[test]
    fn nominal_operating_point() {
        let mut engine = engine(
            tank("ethanol", 100.0, 1.0, 3.5e6),
            tank("n2o", 100.0, 2.5, 4.0e6),
            210.0,
        );
        let state = engine.update_state(0.0, 101_325.0).unwrap();
        assert!((state.massflow_kg_s - 3.5).abs() < 1e-12);
        assert!((state.mixture_ratio - 2.5).abs() < 1e-12);
        assert!((state.chamber_pressure_pa - 3.5e6).abs() < 1e-6);
        assert!((state.thrust_n - 3.5 * 210.0 * G0_MPS2).abs() < 1e-9);
    }

    #[test]
    fn dry_fuel_side_zeroes_mixture_ratio_and_thrust() {
        let mut engine = engine(
            tank("ethanol", 0.5, 1.0, 3.5e6),
            tank("n2o", 100.0, 2.5, 4.0e6),
            210.0,
        );
        engine.update_state(0.0, 101_325.0).unwrap();
        let state = engine.update_state(1.0, 101_325.0).unwrap();
        // Chamber pressure is the min of the sides, so a dry fuel side kills it.
        assert_eq!(state.mixture_ratio, 0.0);
        assert_eq!(state.chamber_pressure_pa, 0.0);
        assert_eq!(state.thrust_n, 0.0);
        // Oxidizer keeps flowing; only thrust is gone.
        assert!((state.massflow_kg_s - 2.5).abs() < 1e-12);
    }

    #[test]
    fn both_sides_dry_is_fully_idle() {
        let mut engine = engine(
            tank("ethanol", 0.5, 1.0, 3.5e6),
            tank("n2o", 0.5, 2.5, 4.0e6),
            210.0,
        );
        engine.update_state(0.0, 101_325.0).unwrap();
        let state = engine.update_state(1.0, 101_325.0).unwrap();
        assert_eq!(state.massflow_kg_s, 0.0);
        assert_eq!(state.thrust_n, 0.0);
        assert_eq!(state.isp_s, 0.0);
    }

    #[test]
    fn same_tick_update_is_idempotent() {
        let mut engine = engine(
            tank("ethanol", 100.0, 1.0, 3.5e6),
            tank("n2o", 100.0, 2.5, 4.0e6),
            210.0,
        );
        engine.update_state(0.0, 101_325.0).unwrap();
        let first = engine.update_state(1.0, 101_325.0).unwrap();
        let second = engine.update_state(1.0, 50_000.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn shared_pressurant_is_drained_once_per_step() {
        // One pressurant tank feeds both propellant tanks; with the drain
        // policy its inventory must drop once per step, not once per branch.
        let pressurant = share(tank("n2", 10.0, 0.05, 2e7));
        let fuel = Tank::new(
            "fuel tank",
            3.0,
            0.04,
            "ethanol",
            0.5,
            3.5e6,
            290.0,
            0.6,
            FluidModel::Constant(FluidState::new(1.0, 290.0, 3.5e6)),
            Some(pressurant.clone()),
        )
        .unwrap()
        .with_policy(crate::tank::PressurantPolicy::DrainWhileDepleted);
        let ox = Tank::new(
            "ox tank",
            3.0,
            0.04,
            "n2o",
            0.5,
            4.0e6,
            290.0,
            0.6,
            FluidModel::Constant(FluidState::new(2.5, 290.0, 4.0e6)),
            Some(pressurant.clone()),
        )
        .unwrap()
        .with_policy(crate::tank::PressurantPolicy::DrainWhileDepleted);

        let model = IspModel::bipropellant(1.0, "ethanol", "n2o", Arc::new(FixedFactory(210.0)));
        let mut engine =
            Engine::new("engine", 5.0, 0.4, 4.5, model, share(fuel), share(ox)).unwrap();

        engine.update_state(0.0, 101_325.0).unwrap();
        engine.update_state(1.0, 101_325.0).unwrap();
        // Both propellant tanks went dry at t=1 and forwarded the pull; the
        // shared pressurant still only loses 0.05 kg for the step.
        assert!((pressurant.borrow().fluid_mass_kg() - 9.95).abs() < 1e-12);
    }
}
