//! Flight runner: adaptive integration with phase handling, ground-impact
//! location, and step recording.

use tracing::{debug, info};

use asc_results::{Recorder, TrajectoryRecord};

use crate::error::{SimError, SimResult};
use crate::integrator::Rk45;
use crate::model::{State, TransientModel, VX, VY, X, Y};
use crate::vehicle::{FlightPhase, Vehicle};

/// Why the run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    GroundImpact,
    TimeBound,
    StepLimit,
}

#[derive(Clone, Copy, Debug)]
pub struct FlightOptions {
    pub max_step_s: f64,
    pub t_bound_s: f64,
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

impl Default for FlightOptions {
    fn default() -> Self {
        Self {
            max_step_s: 0.1,
            t_bound_s: 400.0,
            rtol: 1e-3,
            atol: 1e-6,
            max_steps: 200_000,
        }
    }
}

/// Outcome of one flight.
#[derive(Clone, Copy, Debug)]
pub struct FlightSummary {
    pub termination: Termination,
    pub t_end_s: f64,
    pub steps: usize,
    /// Total mass at ignition, before any inventory is consumed.
    pub wet_mass_kg: f64,
    pub dry_mass_kg: f64,
}

const IMPACT_TIME_TOL_S: f64 = 1e-6;

/// Fly the vehicle from rest on the rail until ground impact, the time
/// bound, or the step limit.
pub fn fly(
    vehicle: &mut Vehicle,
    options: &FlightOptions,
    recorder: &mut dyn Recorder,
) -> SimResult<FlightSummary> {
    if options.max_step_s <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "max_step_s must be positive",
        });
    }
    if options.t_bound_s <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_bound_s must be positive",
        });
    }
    if options.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    let rk = Rk45 {
        max_step: options.max_step_s,
        rtol: options.rtol,
        atol: options.atol,
    };

    let wet_mass_kg = vehicle.total_mass_kg();
    let dry_mass_kg = vehicle.dry_mass_kg();

    let mut t = 0.0;
    let mut y = vehicle.initial_state();
    let mut h = options.max_step_s;
    let mut steps = 0usize;

    info!(
        vehicle = vehicle.name(),
        wet_mass_kg,
        rail_height_m = vehicle.rail_height_m(),
        "starting flight"
    );

    // Initial row: evaluate dynamics once at rest so thrust and mass are live.
    vehicle.rhs(t, &y)?;
    record_row(vehicle, recorder, t, &y);

    while t < options.t_bound_s {
        if steps >= options.max_steps {
            info!(t_s = t, steps, "step limit reached");
            return Ok(FlightSummary {
                termination: Termination::StepLimit,
                t_end_s: t,
                steps,
                wet_mass_kg,
                dry_mass_kg,
            });
        }

        let was_on_rail = vehicle.phase() == FlightPhase::OnRail;
        vehicle.update_phase(&y);
        if was_on_rail && vehicle.phase() == FlightPhase::FreeFlight {
            info!(t_s = t, vy_m_s = y[VY], "rail departure");
        }

        let step = rk.advance(vehicle, t, &y, h.min(options.t_bound_s - t))?;

        // Ground impact: only meaningful once airborne and descending.
        let airborne = vehicle.phase() == FlightPhase::FreeFlight || t > 0.0;
        if airborne && step.y[Y] < 0.0 && step.y[VY] < 0.0 {
            let (t_hit, y_hit) = locate_impact(vehicle, &rk, t, &y, step.h_used)?;
            vehicle.rhs(t_hit, &y_hit)?;
            record_row(vehicle, recorder, t_hit, &y_hit);
            info!(t_s = t_hit, x_m = y_hit[X], "ground impact");
            return Ok(FlightSummary {
                termination: Termination::GroundImpact,
                t_end_s: t_hit,
                steps: steps + 1,
                wet_mass_kg,
                dry_mass_kg,
            });
        }

        t += step.h_used;
        y = step.y;
        h = step.h_next;
        steps += 1;

        record_row(vehicle, recorder, t, &y);
        debug!(t_s = t, y_m = y[Y], vy_m_s = y[VY], "step accepted");
    }

    info!(t_s = t, steps, "time bound reached");
    Ok(FlightSummary {
        termination: Termination::TimeBound,
        t_end_s: t,
        steps,
        wet_mass_kg,
        dry_mass_kg,
    })
}

/// Bisect the step size until the altitude sign change is pinned down.
///
/// The feed system is long dry by the time anything comes back down, so the
/// repeated trial evaluations inside the bracket do not disturb component
/// state that still matters.
fn locate_impact(
    vehicle: &mut Vehicle,
    rk: &Rk45,
    t: f64,
    y: &State,
    h: f64,
) -> SimResult<(f64, State)> {
    let mut lo = 0.0;
    let mut hi = h;
    let mut y_hit = *y;

    while hi - lo > IMPACT_TIME_TOL_S {
        let mid = 0.5 * (lo + hi);
        if mid == lo || mid == hi {
            break;
        }
        let (y_mid, _) = rk.try_step(vehicle, t, y, mid)?;
        if y_mid[Y] < 0.0 {
            hi = mid;
            y_hit = y_mid;
        } else {
            lo = mid;
        }
    }

    let (y_end, _) = rk.try_step(vehicle, t, y, hi)?;
    if y_end[Y] < 0.0 {
        y_hit = y_end;
    }
    // Clamp the terminal row onto the ground.
    y_hit[Y] = 0.0;
    Ok((t + hi, y_hit))
}

fn record_row(vehicle: &Vehicle, recorder: &mut dyn Recorder, t: f64, y: &State) {
    let sample = vehicle.last_sample();
    recorder.record(TrajectoryRecord {
        time_s: t,
        x_m: y[X],
        y_m: y[Y],
        vx_m_s: y[VX],
        vy_m_s: y[VY],
        ax_m_s2: sample.ax_m_s2,
        ay_m_s2: sample.ay_m_s2,
        mass_kg: sample.mass_kg,
        thrust_n: sample.thrust_n,
        drag_n: sample.drag_n,
        mach: sample.mach,
        phase: vehicle.phase().as_str().to_string(),
        components: vehicle.component_snapshots(),
    });
}
