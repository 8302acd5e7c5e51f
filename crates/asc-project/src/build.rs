//! Assemble runtime vehicles from project definitions.

use std::collections::HashMap;
use std::sync::Arc;

use asc_components::{
    share, Engine, Passthrough, PressurantPolicy, SharedNode, StructuralPart, Tank,
};
use asc_env::{Atmosphere, AtmosphereSample, IspSolverFactory, TableAtmosphere};
use asc_models::{
    Affine, FluidModel, FluidState, IspModel, Lut1d, Lut2d, OutOfDomainPolicy, ScalarModel,
};
use asc_sim::{FlightOptions, Vehicle, VehicleConfig};

use crate::schema::{
    AtmosphereDef, FlightDef, FluidModelDef, PressurantPolicyDef, Project, ScalarModelDef,
    VehicleDef,
};
use crate::ProjectError;

pub fn build_atmosphere(def: &AtmosphereDef) -> Result<Box<dyn Atmosphere>, ProjectError> {
    let AtmosphereDef::Table { samples } = def;
    let samples = samples
        .iter()
        .map(|s| AtmosphereSample {
            altitude_m: s.altitude_m,
            pressure_pa: s.pressure_pa,
            density_kg_m3: s.density_kg_m3,
            speed_of_sound_m_s: s.speed_of_sound_m_s,
        })
        .collect();
    let table = TableAtmosphere::new(samples).map_err(|e| ProjectError::Build {
        what: e.to_string(),
    })?;
    Ok(Box::new(table))
}

pub fn build_flight_options(def: &FlightDef) -> FlightOptions {
    FlightOptions {
        max_step_s: def.max_step_s,
        t_bound_s: def.t_bound_s,
        ..FlightOptions::default()
    }
}

fn build_fluid_model(def: &FluidModelDef) -> FluidModel {
    match def {
        FluidModelDef::Constant {
            massflow_kg_s,
            temperature_k,
            pressure_pa,
        } => FluidModel::Constant(FluidState::new(*massflow_kg_s, *temperature_k, *pressure_pa)),
        FluidModelDef::PressureLoss { fraction } => FluidModel::pressure_loss(*fraction),
        FluidModelDef::Linear {
            massflow_gain,
            massflow_offset,
            temperature_gain,
            temperature_offset,
            pressure_gain,
            pressure_offset,
        } => FluidModel::Linear {
            massflow: Affine {
                gain: *massflow_gain,
                offset: *massflow_offset,
            },
            temperature: Affine {
                gain: *temperature_gain,
                offset: *temperature_offset,
            },
            pressure: Affine {
                gain: *pressure_gain,
                offset: *pressure_offset,
            },
        },
    }
}

fn build_scalar_model(def: &ScalarModelDef) -> Result<ScalarModel, ProjectError> {
    let model = match def {
        ScalarModelDef::Constant { value } => ScalarModel::Constant(*value),
        ScalarModelDef::Linear {
            gain,
            offset,
            input,
        } => ScalarModel::Linear {
            gain: *gain,
            offset: *offset,
            input: input.clone(),
        },
        ScalarModelDef::Lut1d { input, x, y } => ScalarModel::Lut1d {
            input: input.clone(),
            table: Lut1d::new(x.clone(), y.clone()).map_err(|e| ProjectError::Build {
                what: e.to_string(),
            })?,
        },
        ScalarModelDef::Lut2d {
            x_input,
            y_input,
            x,
            y,
            values,
            fill,
        } => {
            let policy = match fill {
                Some(value) => OutOfDomainPolicy::Fill(*value),
                None => OutOfDomainPolicy::Error,
            };
            ScalarModel::Lut2d {
                x_input: x_input.clone(),
                y_input: y_input.clone(),
                table: Lut2d::new(x.clone(), y.clone(), values.clone(), policy).map_err(|e| {
                    ProjectError::Build {
                        what: e.to_string(),
                    }
                })?,
            }
        }
    };
    Ok(model)
}

/// Build a runnable vehicle from its definition.
///
/// The Isp backend is supplied by the caller; definitions only carry
/// propellant identities (taken from the feed chains' working fluids).
pub fn build_vehicle(
    def: &VehicleDef,
    atmosphere_def: &AtmosphereDef,
    isp_factory: Arc<dyn IspSolverFactory>,
) -> Result<Vehicle, ProjectError> {
    let mut nodes: HashMap<String, SharedNode> = HashMap::new();
    let mut feed_nodes: Vec<SharedNode> = Vec::new();

    // Pressurant tanks carry no upstream and must exist before the tanks
    // they feed; validation guarantees no deeper chains.
    for tank_def in def.tanks.iter().filter(|t| t.pressurant.is_none()) {
        let tank: SharedNode = share(build_tank(tank_def, None)?);
        nodes.insert(tank_def.id.clone(), tank.clone());
        feed_nodes.push(tank);
    }
    for tank_def in def.tanks.iter().filter(|t| t.pressurant.is_some()) {
        let upstream = tank_def
            .pressurant
            .as_ref()
            .and_then(|id| nodes.get(id))
            .cloned()
            .ok_or_else(|| ProjectError::Build {
                what: format!("tank '{}' references an unknown pressurant", tank_def.id),
            })?;
        let tank: SharedNode = share(build_tank(tank_def, Some(upstream))?);
        nodes.insert(tank_def.id.clone(), tank.clone());
        feed_nodes.push(tank);
    }

    // Lines resolve in dependency order; a pass with no progress means an
    // upstream cycle survived validation somehow.
    let mut pending: Vec<_> = def.lines.iter().collect();
    while !pending.is_empty() {
        let mut progressed = false;
        let mut remaining = Vec::new();
        for line_def in pending {
            match nodes.get(&line_def.upstream).cloned() {
                Some(upstream) => {
                    let line: SharedNode = share(Passthrough::new(
                        line_def.id.clone(),
                        line_def.dry_mass_kg,
                        line_def.length_m,
                        build_fluid_model(&line_def.model),
                        upstream,
                    )?);
                    nodes.insert(line_def.id.clone(), line.clone());
                    feed_nodes.push(line);
                    progressed = true;
                }
                None => remaining.push(line_def),
            }
        }
        if !progressed && !remaining.is_empty() {
            return Err(ProjectError::Build {
                what: format!(
                    "could not resolve feed lines: {}",
                    remaining
                        .iter()
                        .map(|l| l.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }
        pending = remaining;
    }

    let fuel = resolve(&nodes, &def.engine.fuel_feed, &def.id)?;
    let ox = resolve(&nodes, &def.engine.ox_feed, &def.id)?;

    let fuel_name = fuel.borrow().fluid();
    let ox_name = ox.borrow().fluid();
    let isp_model = IspModel::bipropellant(def.engine.efficiency, fuel_name, ox_name, isp_factory);

    let engine = Engine::new(
        def.engine.id.clone(),
        def.engine.dry_mass_kg,
        def.engine.length_m,
        def.engine.expansion_ratio,
        isp_model,
        fuel,
        ox,
    )?;

    let parts = def
        .parts
        .iter()
        .map(|p| StructuralPart::new(p.id.clone(), p.mass_kg, p.length_m))
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = Vehicle::new(
        VehicleConfig {
            name: def.name.clone(),
            reference_area_m2: def.reference_area_m2,
            rail_height_m: def.rail_height_m,
            rail_angle_deg: def.rail_angle_deg,
            base_altitude_m: def.base_altitude_m,
        },
        parts,
        feed_nodes,
        engine,
        build_atmosphere(atmosphere_def)?,
        build_scalar_model(&def.drag)?,
    )
    .map_err(|e| ProjectError::Build {
        what: e.to_string(),
    })?;

    Ok(vehicle)
}

fn build_tank(
    def: &crate::schema::TankDef,
    upstream: Option<SharedNode>,
) -> Result<Tank, ProjectError> {
    let policy = match def.pressurant_policy {
        PressurantPolicyDef::Idle => PressurantPolicy::Idle,
        PressurantPolicyDef::DrainWhileDepleted => PressurantPolicy::DrainWhileDepleted,
    };
    let tank = Tank::new(
        def.id.clone(),
        def.dry_mass_kg,
        def.volume_m3,
        def.fluid.clone(),
        def.fluid_mass_kg,
        def.pressure_pa,
        def.temperature_k,
        def.length_m,
        build_fluid_model(&def.model),
        upstream,
    )?
    .with_policy(policy);
    Ok(tank)
}

fn resolve(
    nodes: &HashMap<String, SharedNode>,
    id: &str,
    vehicle_id: &str,
) -> Result<SharedNode, ProjectError> {
    nodes.get(id).cloned().ok_or_else(|| ProjectError::Build {
        what: format!("vehicle '{vehicle_id}': unknown feed node '{id}'"),
    })
}

/// Convenience: the flight and vehicle pair named by a flight id.
pub fn flight_setup<'p>(
    project: &'p Project,
    flight_id: &str,
) -> Result<(&'p FlightDef, &'p VehicleDef), ProjectError> {
    let flight = project
        .flights
        .iter()
        .find(|f| f.id == flight_id)
        .ok_or_else(|| ProjectError::Build {
            what: format!("unknown flight '{flight_id}'"),
        })?;
    let vehicle = project
        .vehicles
        .iter()
        .find(|v| v.id == flight.vehicle_id)
        .ok_or_else(|| ProjectError::Build {
            what: format!("flight '{flight_id}' references unknown vehicle"),
        })?;
    Ok((flight, vehicle))
}
