//! Full feed-system topology: one pressurant tank feeding two propellant
//! branches, lines and injectors chaining into the engine.

use std::sync::Arc;

use asc_components::{share, Engine, Passthrough, SharedNode, Tank};
use asc_env::{EnvResult, IspSolver, IspSolverFactory};
use asc_models::{FluidModel, FluidState, IspModel};

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

struct FeedSystem {
    pressurant: SharedNode,
    fuel_tank: SharedNode,
    ox_tank: SharedNode,
    engine: Engine,
}

/// Small bipropellant stage: 4 kg ethanol at 1 kg/s, 10 kg N2O at 2.5 kg/s,
/// shared nitrogen pressurant. Fuel goes dry after 4 s, oxidizer exactly at
/// the same time.
fn build() -> FeedSystem {
    let pressurant = share(
        Tank::new(
            "n2 tank",
            2.0,
            0.01,
            "n2",
            1.0,
            2e7,
            290.0,
            0.3,
            FluidModel::Constant(FluidState::new(0.02, 290.0, 2e7)),
            None,
        )
        .unwrap(),
    );

    let fuel_tank = share(
        Tank::new(
            "fuel tank",
            3.0,
            0.01,
            "ethanol",
            4.0,
            4.0e6,
            290.0,
            0.6,
            FluidModel::Constant(FluidState::new(1.0, 290.0, 4.0e6)),
            Some(pressurant.clone()),
        )
        .unwrap(),
    );
    let fuel_line = share(
        Passthrough::new(
            "fuel line",
            0.3,
            0.8,
            FluidModel::pressure_loss(0.05),
            fuel_tank.clone(),
        )
        .unwrap(),
    );
    let regen = share(
        Passthrough::new(
            "regen jacket",
            0.5,
            0.2,
            FluidModel::pressure_loss(0.10),
            fuel_line,
        )
        .unwrap(),
    );
    let fuel_injector = share(
        Passthrough::new(
            "fuel injector",
            0.2,
            0.05,
            FluidModel::pressure_loss(0.20),
            regen,
        )
        .unwrap(),
    );

    let ox_tank = share(
        Tank::new(
            "ox tank",
            4.0,
            0.02,
            "n2o",
            10.0,
            5.0e6,
            285.0,
            0.9,
            FluidModel::Constant(FluidState::new(2.5, 285.0, 5.0e6)),
            Some(pressurant.clone()),
        )
        .unwrap(),
    );
    let ox_line = share(
        Passthrough::new(
            "ox line",
            0.3,
            0.8,
            FluidModel::pressure_loss(0.05),
            ox_tank.clone(),
        )
        .unwrap(),
    );
    let ox_injector = share(
        Passthrough::new(
            "ox injector",
            0.2,
            0.05,
            FluidModel::pressure_loss(0.20),
            ox_line,
        )
        .unwrap(),
    );

    let isp = IspModel::bipropellant(0.92, "ethanol", "n2o", Arc::new(FixedFactory(220.0)));
    let engine = Engine::new("engine", 6.0, 0.5, 4.5, isp, fuel_injector, ox_injector).unwrap();

    FeedSystem {
        pressurant,
        fuel_tank,
        ox_tank,
        engine,
    }
}

#[test]
fn steady_burn_then_simultaneous_dryout() {
    let mut sys = build();

    // Priming step: last-applied massflows become the design-point values.
    let state = sys.engine.update_state(0.0, 101_325.0).unwrap();
    assert!((state.massflow_kg_s - 3.5).abs() < 1e-12);
    assert!((state.mixture_ratio - 2.5).abs() < 1e-12);
    // Fuel side sets the chamber: 4 MPa derated through line, regen, injector.
    let expected_pcc = 4.0e6 * 0.95 * 0.90 * 0.80;
    assert!((state.chamber_pressure_pa - expected_pcc).abs() < 1e-3);
    assert!((state.isp_s - 0.92 * 220.0).abs() < 1e-12);
    assert!(state.thrust_n > 0.0);

    for step in 1..=3 {
        let t = step as f64;
        let state = sys.engine.update_state(t, 101_325.0).unwrap();
        assert!(state.thrust_n > 0.0, "still burning at t={t}");
        assert!((sys.fuel_tank.borrow().fluid_mass_kg() - (4.0 - t)).abs() < 1e-9);
        assert!((sys.ox_tank.borrow().fluid_mass_kg() - (10.0 - 2.5 * t)).abs() < 1e-9);
    }

    // t=4: both branches would need exactly their remaining inventory, which
    // counts as dry. Thrust collapses in the same step on both sides.
    let state = sys.engine.update_state(4.0, 101_325.0).unwrap();
    assert_eq!(state.massflow_kg_s, 0.0);
    assert_eq!(state.thrust_n, 0.0);
    assert_eq!(sys.fuel_tank.borrow().fluid_mass_kg(), 0.0);
    assert_eq!(sys.ox_tank.borrow().fluid_mass_kg(), 0.0);

    // Default pressurant policy: the shared tank never gets pulled.
    assert_eq!(sys.pressurant.borrow().fluid_mass_kg(), 1.0);
}

#[test]
fn repeated_evaluation_at_one_time_is_stable() {
    let mut sys = build();
    sys.engine.update_state(0.0, 101_325.0).unwrap();

    let first = sys.engine.update_state(0.5, 101_325.0).unwrap();
    let fuel_mass = sys.fuel_tank.borrow().fluid_mass_kg();
    let ox_mass = sys.ox_tank.borrow().fluid_mass_kg();

    for _ in 0..4 {
        let again = sys.engine.update_state(0.5, 101_325.0).unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(sys.fuel_tank.borrow().fluid_mass_kg(), fuel_mass);
    assert_eq!(sys.ox_tank.borrow().fluid_mass_kg(), ox_mass);
}

#[test]
fn inventory_totals_track_consumed_flow() {
    let mut sys = build();
    sys.engine.update_state(0.0, 101_325.0).unwrap();

    let dt = 0.25;
    for step in 1..=8 {
        sys.engine.update_state(step as f64 * dt, 101_325.0).unwrap();
    }
    // 2 s of burn at 3.5 kg/s total.
    let consumed = (4.0 - sys.fuel_tank.borrow().fluid_mass_kg())
        + (10.0 - sys.ox_tank.borrow().fluid_mass_kg());
    assert!((consumed - 3.5 * 2.0).abs() < 1e-9);
}
