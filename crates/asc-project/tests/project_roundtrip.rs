//! Project schema round-trip, validation, and vehicle assembly.

use std::sync::Arc;

use asc_env::{EnvResult, IspSolver, IspSolverFactory};
use asc_project::*;

struct FixedIsp;

impl IspSolver for FixedIsp {
    fn estimate_isp_s(&self, _pcc: f64, _of: f64, _eps: f64, _pamb: f64) -> EnvResult<f64> {
        Ok(200.0)
    }
}

struct StubFactory;

impl IspSolverFactory for StubFactory {
    fn bipropellant(&self, _fuel: &str, _oxidizer: &str) -> EnvResult<Box<dyn IspSolver>> {
        Ok(Box::new(FixedIsp))
    }

    fn monopropellant(&self, _propellant: &str) -> EnvResult<Box<dyn IspSolver>> {
        Ok(Box::new(FixedIsp))
    }
}

fn sample_project() -> Project {
    let yaml = r#"
version: 1
name: demo project
atmosphere:
  type: Table
  samples:
    - { altitude_m: 0.0, pressure_pa: 101325.0, density_kg_m3: 1.225, speed_of_sound_m_s: 340.0 }
    - { altitude_m: 90000.0, pressure_pa: 0.18, density_kg_m3: 3.4e-6, speed_of_sound_m_s: 270.0 }
vehicles:
  - id: demo
    name: demo vehicle
    reference_area_m2: 0.01
    rail_height_m: 9.0
    rail_angle_deg: 87.0
    parts:
      - { id: airframe, mass_kg: 10.0, length_m: 2.0 }
    tanks:
      - id: n2_tank
        fluid: n2
        dry_mass_kg: 2.0
        volume_m3: 0.01
        fluid_mass_kg: 1.0
        pressure_pa: 2.0e7
        temperature_k: 290.0
        length_m: 0.3
        model:
          type: Constant
          massflow_kg_s: 0.02
          temperature_k: 290.0
          pressure_pa: 2.0e7
      - id: fuel_tank
        fluid: ethanol
        dry_mass_kg: 3.0
        volume_m3: 0.01
        fluid_mass_kg: 4.0
        pressure_pa: 4.0e6
        temperature_k: 290.0
        length_m: 0.6
        pressurant: n2_tank
        model:
          type: Constant
          massflow_kg_s: 1.0
          temperature_k: 290.0
          pressure_pa: 4.0e6
      - id: ox_tank
        fluid: n2o
        dry_mass_kg: 4.0
        volume_m3: 0.02
        fluid_mass_kg: 10.0
        pressure_pa: 5.0e6
        temperature_k: 285.0
        length_m: 0.9
        pressurant: n2_tank
        model:
          type: Constant
          massflow_kg_s: 2.5
          temperature_k: 285.0
          pressure_pa: 5.0e6
    lines:
      - id: fuel_injector
        dry_mass_kg: 0.2
        length_m: 0.05
        upstream: fuel_tank
        model: { type: PressureLoss, fraction: 0.2 }
      - id: ox_injector
        dry_mass_kg: 0.2
        length_m: 0.05
        upstream: ox_tank
        model: { type: PressureLoss, fraction: 0.2 }
    engine:
      id: engine
      dry_mass_kg: 5.0
      length_m: 0.4
      expansion_ratio: 4.5
      efficiency: 0.9
      fuel_feed: fuel_injector
      ox_feed: ox_injector
    drag:
      type: Constant
      value: 0.5
flights:
  - id: nominal
    vehicle_id: demo
"#;
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn yaml_round_trip_preserves_project() {
    let project = sample_project();
    validate_project(&project).unwrap();

    let serialized = serde_yaml::to_string(&project).unwrap();
    let reparsed: Project = serde_yaml::from_str(&serialized).unwrap();
    assert_eq!(project, reparsed);
}

#[test]
fn flight_defaults_apply() {
    let project = sample_project();
    let (flight, vehicle) = flight_setup(&project, "nominal").unwrap();
    assert_eq!(vehicle.id, "demo");
    assert_eq!(flight.max_step_s, 0.1);
    assert_eq!(flight.t_bound_s, 400.0);

    let options = build_flight_options(flight);
    assert_eq!(options.max_step_s, 0.1);
    assert_eq!(options.t_bound_s, 400.0);
}

#[test]
fn build_produces_a_runnable_vehicle() {
    let project = sample_project();
    let (_, vehicle_def) = flight_setup(&project, "nominal").unwrap();
    let vehicle = build_vehicle(vehicle_def, &project.atmosphere, Arc::new(StubFactory)).unwrap();

    // 10 + 2 + 3 + 4 + 0.2 + 0.2 + 5 dry, 1 + 4 + 10 fluid.
    assert!((vehicle.dry_mass_kg() - 24.4).abs() < 1e-9);
    assert!((vehicle.total_mass_kg() - 39.4).abs() < 1e-9);
}

#[test]
fn duplicate_tank_id_is_rejected() {
    let mut project = sample_project();
    let dup = project.vehicles[0].tanks[1].clone();
    project.vehicles[0].tanks.push(dup);
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn dangling_upstream_is_rejected() {
    let mut project = sample_project();
    project.vehicles[0].lines[0].upstream = "missing_tank".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn chained_pressurant_is_rejected() {
    let mut project = sample_project();
    // Make the pressurant itself pressurized by the fuel tank.
    project.vehicles[0].tanks[0].pressurant = Some("fuel_tank".to_string());
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn line_cycle_is_rejected() {
    let mut project = sample_project();
    project.vehicles[0].lines[0].upstream = "ox_injector".to_string();
    project.vehicles[0].lines[1].upstream = "fuel_injector".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn ragged_drag_grid_is_rejected() {
    let mut project = sample_project();
    project.vehicles[0].drag = ScalarModelDef::Lut2d {
        x_input: "Ma".to_string(),
        y_input: "L/D".to_string(),
        x: vec![0.0, 1.0],
        y: vec![10.0, 20.0],
        values: vec![0.4, 0.5, 0.6],
        fill: None,
    };
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn unknown_flight_vehicle_is_rejected() {
    let mut project = sample_project();
    project.flights[0].vehicle_id = "missing".to_string();
    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::MissingReference { .. })
    ));
}
