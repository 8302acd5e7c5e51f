//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub atmosphere: AtmosphereDef,
    #[serde(default)]
    pub vehicles: Vec<VehicleDef>,
    #[serde(default)]
    pub flights: Vec<FlightDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AtmosphereDef {
    Table { samples: Vec<AtmosphereSampleDef> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AtmosphereSampleDef {
    pub altitude_m: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub speed_of_sound_m_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleDef {
    pub id: String,
    pub name: String,
    pub reference_area_m2: f64,
    pub rail_height_m: f64,
    pub rail_angle_deg: f64,
    #[serde(default)]
    pub base_altitude_m: f64,
    #[serde(default)]
    pub parts: Vec<PartDef>,
    #[serde(default)]
    pub tanks: Vec<TankDef>,
    #[serde(default)]
    pub lines: Vec<LineDef>,
    pub engine: EngineDef,
    pub drag: ScalarModelDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartDef {
    pub id: String,
    pub mass_kg: f64,
    pub length_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TankDef {
    pub id: String,
    pub fluid: String,
    pub dry_mass_kg: f64,
    pub volume_m3: f64,
    pub fluid_mass_kg: f64,
    pub pressure_pa: f64,
    pub temperature_k: f64,
    pub length_m: f64,
    pub model: FluidModelDef,
    /// Tank id of the pressurant feeding this tank, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressurant: Option<String>,
    #[serde(default)]
    pub pressurant_policy: PressurantPolicyDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PressurantPolicyDef {
    #[default]
    Idle,
    DrainWhileDepleted,
}

/// A wetted pass-through part: feed line, regen cooling jacket, injector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineDef {
    pub id: String,
    pub dry_mass_kg: f64,
    pub length_m: f64,
    pub model: FluidModelDef,
    /// Tank or line id this part draws from.
    pub upstream: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    pub id: String,
    pub dry_mass_kg: f64,
    pub length_m: f64,
    pub expansion_ratio: f64,
    pub efficiency: f64,
    /// Terminal node of the fuel feed chain.
    pub fuel_feed: String,
    /// Terminal node of the oxidizer feed chain.
    pub ox_feed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FluidModelDef {
    Constant {
        massflow_kg_s: f64,
        temperature_k: f64,
        pressure_pa: f64,
    },
    PressureLoss {
        fraction: f64,
    },
    Linear {
        massflow_gain: f64,
        massflow_offset: f64,
        temperature_gain: f64,
        temperature_offset: f64,
        pressure_gain: f64,
        pressure_offset: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ScalarModelDef {
    Constant {
        value: f64,
    },
    Linear {
        gain: f64,
        offset: f64,
        input: String,
    },
    Lut1d {
        input: String,
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Lut2d {
        x_input: String,
        y_input: String,
        x: Vec<f64>,
        y: Vec<f64>,
        /// Row-major: `values[i * y.len() + j]`.
        values: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightDef {
    pub id: String,
    pub vehicle_id: String,
    #[serde(default = "default_max_step_s")]
    pub max_step_s: f64,
    #[serde(default = "default_t_bound_s")]
    pub t_bound_s: f64,
}

fn default_max_step_s() -> f64 {
    0.1
}

fn default_t_bound_s() -> f64 {
    400.0
}
