//! The flight vehicle: mass roll-up, aerodynamics, and the point-mass
//! equations of motion.

use asc_components::{Engine, SharedNode, StructuralPart};
use asc_core::numeric::ensure_finite;
use asc_core::units::constants::G0_MPS2;
use asc_env::atmosphere::{
    Atmosphere, AIR_DENSITY_FALLBACK_KG_M3, AMBIENT_PRESSURE_FALLBACK_PA,
    FALLBACK_REFERENCE_ALTITUDE_M, SPEED_OF_SOUND_FALLBACK_M_S,
};
use asc_env::EnvError;
use asc_models::ScalarModel;
use asc_results::{ComponentSnapshot, FieldSample};

use std::cell::Cell;

use tracing::warn;

use crate::error::{SimError, SimResult};
use crate::model::{State, TransientModel, VX, VY, X, Y};

/// Launch rail then unconstrained flight. The transition is one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightPhase {
    OnRail,
    FreeFlight,
}

impl FlightPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnRail => "OnRail",
            Self::FreeFlight => "FreeFlight",
        }
    }
}

/// Geometry and launch-site configuration.
#[derive(Clone, Debug)]
pub struct VehicleConfig {
    pub name: String,
    pub reference_area_m2: f64,
    pub rail_height_m: f64,
    pub rail_angle_deg: f64,
    pub base_altitude_m: f64,
}

/// Auxiliary quantities from the most recent dynamics evaluation, kept for
/// recording alongside the integrated state.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlightSample {
    pub thrust_n: f64,
    pub drag_n: f64,
    pub mach: f64,
    pub mass_kg: f64,
    pub ax_m_s2: f64,
    pub ay_m_s2: f64,
}

pub struct Vehicle {
    name: String,
    parts: Vec<StructuralPart>,
    feed_nodes: Vec<SharedNode>,
    engine: Engine,
    atmosphere: Box<dyn Atmosphere>,
    drag_model: ScalarModel,
    aero_params: Vec<(&'static str, f64)>,
    reference_area_m2: f64,
    rail_height_m: f64,
    rail_angle_rad: f64,
    base_altitude_m: f64,
    phase: FlightPhase,
    last: FlightSample,
    // One warning per flight when the table span is exceeded, not one per
    // derivative evaluation.
    out_of_domain_warned: Cell<bool>,
}

impl Vehicle {
    /// `feed_nodes` lists every fluid node for mass roll-up and sampling;
    /// shared upstream tanks must appear exactly once.
    pub fn new(
        config: VehicleConfig,
        parts: Vec<StructuralPart>,
        feed_nodes: Vec<SharedNode>,
        engine: Engine,
        atmosphere: Box<dyn Atmosphere>,
        drag_model: ScalarModel,
    ) -> SimResult<Self> {
        if !(config.reference_area_m2.is_finite() && config.reference_area_m2 > 0.0) {
            return Err(SimError::InvalidArg {
                what: "reference area must be positive",
            });
        }
        if !(config.rail_height_m.is_finite() && config.rail_height_m > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rail height must be positive",
            });
        }
        if !(config.rail_angle_deg > 0.0 && config.rail_angle_deg <= 90.0) {
            return Err(SimError::InvalidArg {
                what: "rail angle must be in (0, 90] degrees",
            });
        }

        let rail_angle_rad = config.rail_angle_deg.to_radians();

        let mut vehicle = Self {
            name: config.name,
            parts,
            feed_nodes,
            engine,
            atmosphere,
            drag_model,
            aero_params: Vec::new(),
            reference_area_m2: config.reference_area_m2,
            rail_height_m: config.rail_height_m,
            rail_angle_rad,
            base_altitude_m: config.base_altitude_m,
            phase: FlightPhase::OnRail,
            last: FlightSample::default(),
            out_of_domain_warned: Cell::new(false),
        };

        // Fineness ratio is fixed by geometry, so it lives in the static
        // parameter map the drag model resolves against.
        let diameter_m = (4.0 * vehicle.reference_area_m2 / std::f64::consts::PI).sqrt();
        let fineness = vehicle.total_length_m() / diameter_m;
        vehicle.aero_params = vec![("L/D", fineness)];

        Ok(vehicle)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn rail_height_m(&self) -> f64 {
        self.rail_height_m
    }

    pub fn last_sample(&self) -> FlightSample {
        self.last
    }

    pub fn total_length_m(&self) -> f64 {
        let parts: f64 = self.parts.iter().map(|p| p.length_m()).sum();
        let nodes: f64 = self.feed_nodes.iter().map(|n| n.borrow().length_m()).sum();
        parts + nodes + self.engine.length_m()
    }

    /// Current total mass: structure, hardware, and live tank inventory.
    pub fn total_mass_kg(&self) -> f64 {
        self.dry_mass_kg()
            + self
                .feed_nodes
                .iter()
                .map(|n| n.borrow().fluid_mass_kg())
                .sum::<f64>()
    }

    pub fn dry_mass_kg(&self) -> f64 {
        let parts: f64 = self.parts.iter().map(|p| p.mass_kg()).sum();
        let nodes: f64 = self.feed_nodes.iter().map(|n| n.borrow().dry_mass_kg()).sum();
        parts + nodes + self.engine.dry_mass_kg()
    }

    /// Promote to free flight once altitude clears the top of the rail.
    /// Called before each integration step.
    pub fn update_phase(&mut self, state: &State) {
        if self.phase == FlightPhase::OnRail && state[Y] > self.rail_height_m {
            self.phase = FlightPhase::FreeFlight;
        }
    }

    fn note_out_of_domain(&self, altitude_m: f64) {
        if !self.out_of_domain_warned.replace(true) {
            warn!(
                vehicle = %self.name,
                altitude_m,
                "altitude above atmosphere table span, using near-vacuum fallbacks"
            );
        }
    }

    fn ambient_pressure_pa(&self, altitude_m: f64) -> SimResult<f64> {
        match self.atmosphere.pressure_pa(altitude_m) {
            Ok(p) => Ok(p),
            Err(EnvError::OutOfDomain { .. }) => {
                self.note_out_of_domain(altitude_m);
                Ok(AMBIENT_PRESSURE_FALLBACK_PA)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn air_density_kg_m3(&self, altitude_m: f64) -> SimResult<f64> {
        match self.atmosphere.density_kg_m3(altitude_m) {
            Ok(rho) => Ok(rho),
            Err(EnvError::OutOfDomain { .. }) => {
                self.note_out_of_domain(altitude_m);
                Ok(AIR_DENSITY_FALLBACK_KG_M3)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn speed_of_sound_m_s(&self, altitude_m: f64) -> SimResult<f64> {
        match self.atmosphere.speed_of_sound_m_s(altitude_m) {
            Ok(a) => Ok(a),
            Err(EnvError::OutOfDomain { .. }) => {
                self.note_out_of_domain(altitude_m);
                // The recovery itself must not fail: tables that stop short
                // of the reference altitude fall back to the fixed constant.
                match self
                    .atmosphere
                    .speed_of_sound_m_s(FALLBACK_REFERENCE_ALTITUDE_M)
                {
                    Ok(a) => Ok(a),
                    Err(EnvError::OutOfDomain { .. }) => Ok(SPEED_OF_SOUND_FALLBACK_M_S),
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sample every component at its current state for row recording.
    pub fn component_snapshots(&self) -> Vec<ComponentSnapshot> {
        let mut snapshots: Vec<ComponentSnapshot> = self
            .feed_nodes
            .iter()
            .map(|node| {
                let node = node.borrow();
                ComponentSnapshot {
                    component_id: node.name().to_string(),
                    fields: node
                        .sample()
                        .into_iter()
                        .map(|(name, value)| FieldSample {
                            name: name.to_string(),
                            value,
                        })
                        .collect(),
                }
            })
            .collect();
        snapshots.push(ComponentSnapshot {
            component_id: self.engine.name().to_string(),
            fields: self
                .engine
                .sample()
                .into_iter()
                .map(|(name, value)| FieldSample {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        });
        snapshots
    }
}

impl TransientModel for Vehicle {
    fn initial_state(&self) -> State {
        [0.0; 4]
    }

    fn rhs(&mut self, t: f64, x: &State) -> SimResult<State> {
        let altitude_m = self.base_altitude_m + x[Y];

        let ambient_pa = self.ambient_pressure_pa(altitude_m)?;
        let engine_state = self.engine.update_state(t, ambient_pa)?;
        let thrust_n = engine_state.thrust_n;

        let speed = (x[VX] * x[VX] + x[VY] * x[VY]).sqrt();
        let mach = speed / self.speed_of_sound_m_s(altitude_m)?;
        let rho = self.air_density_kg_m3(altitude_m)?;

        let flight_fields = vec![("Ma", mach)];
        let cd = self.drag_model.apply(&flight_fields, &self.aero_params)?;
        let drag_n = cd * self.reference_area_m2 * 0.5 * rho * speed * speed;

        let mass_kg = self.total_mass_kg();
        if mass_kg <= 0.0 {
            return Err(SimError::NonPhysical {
                what: "vehicle mass must stay positive",
            });
        }
        let accel = (thrust_n - drag_n) / mass_kg;

        let (ax, ay) = match self.phase {
            FlightPhase::OnRail => {
                let ay = self.rail_angle_rad.sin() * accel - G0_MPS2;
                let ax = ay / self.rail_angle_rad.tan();
                (ax, ay)
            }
            FlightPhase::FreeFlight => {
                let heading = x[VY].atan2(x[VX]);
                let ax = heading.cos() * accel;
                let ay = heading.sin() * accel - G0_MPS2;
                (ax, ay)
            }
        };

        // A bad table or model surfaces here as NaN; fail the run instead of
        // feeding it to the integrator.
        let ax = ensure_finite(ax, "ax_m_s2")?;
        let ay = ensure_finite(ay, "ay_m_s2")?;

        self.last = FlightSample {
            thrust_n,
            drag_n,
            mach,
            mass_kg,
            ax_m_s2: ax,
            ay_m_s2: ay,
        };

        Ok([x[VX], x[VY], ax, ay])
    }
}
