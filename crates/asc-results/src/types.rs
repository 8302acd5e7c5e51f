//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub vehicle_id: String,
    pub timestamp: String,
    pub run_type: RunType,
    pub solver_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunType {
    Flight {
        max_step_s: f64,
        t_bound_s: f64,
        steps: usize,
    },
}

/// One accepted integrator step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub time_s: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub vx_m_s: f64,
    pub vy_m_s: f64,
    pub ax_m_s2: f64,
    pub ay_m_s2: f64,
    pub mass_kg: f64,
    pub thrust_n: f64,
    pub drag_n: f64,
    pub mach: f64,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentSnapshot>,
}

impl TrajectoryRecord {
    pub fn speed_m_s(&self) -> f64 {
        (self.vx_m_s * self.vx_m_s + self.vy_m_s * self.vy_m_s).sqrt()
    }
}

/// Flat scalar fields sampled from one component at the record's time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub component_id: String,
    pub fields: Vec<FieldSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSample {
    pub name: String,
    pub value: f64,
}
