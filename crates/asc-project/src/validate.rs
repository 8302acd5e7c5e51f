//! Project validation logic.

use std::collections::HashSet;

use crate::schema::{AtmosphereDef, Project, ScalarModelDef, VehicleDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_atmosphere(&project.atmosphere)?;

    let mut vehicle_ids = HashSet::new();
    for vehicle in &project.vehicles {
        if !vehicle_ids.insert(&vehicle.id) {
            return Err(ValidationError::DuplicateId {
                id: vehicle.id.clone(),
                context: "vehicles".to_string(),
            });
        }
        validate_vehicle(vehicle)?;
    }

    let mut flight_ids = HashSet::new();
    for flight in &project.flights {
        if !flight_ids.insert(&flight.id) {
            return Err(ValidationError::DuplicateId {
                id: flight.id.clone(),
                context: "flights".to_string(),
            });
        }
        if !vehicle_ids.contains(&flight.vehicle_id) {
            return Err(ValidationError::MissingReference {
                id: flight.vehicle_id.clone(),
                context: format!("flight '{}' vehicle_id", flight.id),
            });
        }
        if flight.max_step_s <= 0.0 {
            return Err(invalid("max_step_s", flight.max_step_s, "must be positive"));
        }
        if flight.t_bound_s <= 0.0 {
            return Err(invalid("t_bound_s", flight.t_bound_s, "must be positive"));
        }
    }

    Ok(())
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_atmosphere(atmosphere: &AtmosphereDef) -> Result<(), ValidationError> {
    let AtmosphereDef::Table { samples } = atmosphere;
    if samples.len() < 2 {
        return Err(ValidationError::InvalidValue {
            field: "atmosphere.samples".to_string(),
            value: samples.len().to_string(),
            reason: "needs at least two samples".to_string(),
        });
    }
    if samples
        .windows(2)
        .any(|w| w[1].altitude_m <= w[0].altitude_m)
    {
        return Err(ValidationError::InvalidValue {
            field: "atmosphere.samples".to_string(),
            value: "altitude_m".to_string(),
            reason: "altitudes must be strictly increasing".to_string(),
        });
    }
    Ok(())
}

fn validate_vehicle(vehicle: &VehicleDef) -> Result<(), ValidationError> {
    if vehicle.reference_area_m2 <= 0.0 {
        return Err(invalid(
            "reference_area_m2",
            vehicle.reference_area_m2,
            "must be positive",
        ));
    }
    if vehicle.rail_height_m <= 0.0 {
        return Err(invalid(
            "rail_height_m",
            vehicle.rail_height_m,
            "must be positive",
        ));
    }
    if !(vehicle.rail_angle_deg > 0.0 && vehicle.rail_angle_deg <= 90.0) {
        return Err(invalid(
            "rail_angle_deg",
            vehicle.rail_angle_deg,
            "must be in (0, 90]",
        ));
    }
    if !(vehicle.engine.efficiency > 0.0 && vehicle.engine.efficiency <= 1.0) {
        return Err(invalid(
            "engine.efficiency",
            vehicle.engine.efficiency,
            "must be in (0, 1]",
        ));
    }

    let context = format!("vehicle '{}'", vehicle.id);

    let mut part_ids = HashSet::new();
    for part in &vehicle.parts {
        if !part_ids.insert(&part.id) {
            return Err(ValidationError::DuplicateId {
                id: part.id.clone(),
                context: format!("{context} parts"),
            });
        }
    }

    let mut tank_ids = HashSet::new();
    for tank in &vehicle.tanks {
        if !tank_ids.insert(&tank.id) {
            return Err(ValidationError::DuplicateId {
                id: tank.id.clone(),
                context: format!("{context} tanks"),
            });
        }
    }

    // Pressurant references must name a tank that is itself unpressurized:
    // one level of feed, no pressurant chains.
    for tank in &vehicle.tanks {
        if let Some(pressurant_id) = &tank.pressurant {
            let pressurant = vehicle.tanks.iter().find(|t| &t.id == pressurant_id);
            match pressurant {
                None => {
                    return Err(ValidationError::MissingReference {
                        id: pressurant_id.clone(),
                        context: format!("{context} tank '{}' pressurant", tank.id),
                    });
                }
                Some(p) if p.pressurant.is_some() => {
                    return Err(ValidationError::InvalidValue {
                        field: format!("tank '{}' pressurant", tank.id),
                        value: pressurant_id.clone(),
                        reason: "pressurant tanks cannot themselves be pressurized".to_string(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    let mut line_ids = HashSet::new();
    for line in &vehicle.lines {
        if !line_ids.insert(&line.id) {
            return Err(ValidationError::DuplicateId {
                id: line.id.clone(),
                context: format!("{context} lines"),
            });
        }
    }
    for line in &vehicle.lines {
        if !tank_ids.contains(&line.upstream) && !line_ids.contains(&line.upstream) {
            return Err(ValidationError::MissingReference {
                id: line.upstream.clone(),
                context: format!("{context} line '{}' upstream", line.id),
            });
        }
        if line.upstream == line.id {
            return Err(ValidationError::InvalidValue {
                field: format!("line '{}' upstream", line.id),
                value: line.upstream.clone(),
                reason: "a line cannot feed itself".to_string(),
            });
        }
    }

    // Walk each upstream chain to a tank; revisiting a line means a cycle.
    for line in &vehicle.lines {
        let mut visited = HashSet::new();
        let mut current = line;
        while visited.insert(&current.id) {
            match vehicle.lines.iter().find(|l| l.id == current.upstream) {
                Some(next) => current = next,
                None => break,
            }
        }
        if !visited.contains(&current.upstream) || tank_ids.contains(&current.upstream) {
            continue;
        }
        return Err(ValidationError::InvalidValue {
            field: format!("line '{}' upstream", line.id),
            value: current.upstream.clone(),
            reason: "feed lines form a cycle".to_string(),
        });
    }

    for (field, feed) in [
        ("fuel_feed", &vehicle.engine.fuel_feed),
        ("ox_feed", &vehicle.engine.ox_feed),
    ] {
        if !tank_ids.contains(feed) && !line_ids.contains(feed) {
            return Err(ValidationError::MissingReference {
                id: feed.clone(),
                context: format!("{context} engine {field}"),
            });
        }
    }

    validate_drag(&vehicle.drag)?;

    Ok(())
}

fn validate_drag(drag: &ScalarModelDef) -> Result<(), ValidationError> {
    match drag {
        ScalarModelDef::Constant { .. } | ScalarModelDef::Linear { .. } => Ok(()),
        ScalarModelDef::Lut1d { x, y, .. } => {
            if x.len() != y.len() || x.len() < 2 {
                return Err(ValidationError::InvalidValue {
                    field: "drag.Lut1d".to_string(),
                    value: format!("{}x{}", x.len(), y.len()),
                    reason: "axes must match and hold at least two points".to_string(),
                });
            }
            Ok(())
        }
        ScalarModelDef::Lut2d { x, y, values, .. } => {
            if x.len() < 2 || y.len() < 2 || values.len() != x.len() * y.len() {
                return Err(ValidationError::InvalidValue {
                    field: "drag.Lut2d".to_string(),
                    value: format!("{}x{} vs {}", x.len(), y.len(), values.len()),
                    reason: "values must be a full row-major grid over both axes".to_string(),
                });
            }
            Ok(())
        }
    }
}
