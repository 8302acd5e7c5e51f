//! Run execution and caching service.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info};

use asc_env::IspSolverFactory;
use asc_project::{build_flight_options, build_vehicle, flight_setup, Project};
use asc_results::{
    compute_run_id, FlightMetrics, MemoryRecorder, RunManifest, RunStore, RunType,
};
use asc_sim::fly;

use crate::error::AppResult;

/// Options for running flights.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub metrics: FlightMetrics,
    pub loaded_from_cache: bool,
}

/// Execute the named flight, or reuse the stored run with the same identity.
///
/// Run identity covers the vehicle definition, the flight parameters, and the
/// solver version; the step count in the stored manifest is an outcome, so it
/// is pinned to zero for hashing.
pub fn ensure_run(
    project: &Project,
    flight_id: &str,
    store: &RunStore,
    isp_factory: Arc<dyn IspSolverFactory>,
    options: &RunOptions,
) -> AppResult<RunResponse> {
    let (flight, vehicle_def) = flight_setup(project, flight_id)?;

    let identity = RunType::Flight {
        max_step_s: flight.max_step_s,
        t_bound_s: flight.t_bound_s,
        steps: 0,
    };
    let run_id = compute_run_id(vehicle_def, &identity, &options.solver_version);

    if options.use_cache && store.has_run(&run_id) {
        let manifest = store.load_manifest(&run_id)?;
        let metrics = store.load_metrics(&run_id)?;
        info!(flight_id, run_id = %run_id, "run loaded from cache");
        return Ok(RunResponse {
            run_id,
            manifest,
            metrics,
            loaded_from_cache: true,
        });
    }

    let mut vehicle = build_vehicle(vehicle_def, &project.atmosphere, isp_factory)?;
    let mut recorder = MemoryRecorder::new();
    let summary = fly(&mut vehicle, &build_flight_options(flight), &mut recorder)?;

    let records = recorder.into_records();
    let metrics = FlightMetrics::from_records(&records, summary.wet_mass_kg, summary.dry_mass_kg);

    let manifest = RunManifest {
        run_id: run_id.clone(),
        vehicle_id: vehicle_def.id.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        run_type: RunType::Flight {
            max_step_s: flight.max_step_s,
            t_bound_s: flight.t_bound_s,
            steps: summary.steps,
        },
        solver_version: options.solver_version.clone(),
    };
    store.save_run(&manifest, &records, &metrics)?;

    info!(
        flight_id,
        run_id = %run_id,
        termination = ?summary.termination,
        apogee_m = metrics.apogee_m,
        "flight complete"
    );

    Ok(RunResponse {
        run_id,
        manifest,
        metrics,
        loaded_from_cache: false,
    })
}

/// Run several flights in parallel. Each flight builds its own vehicle graph
/// inside its worker, so failures stay isolated per flight.
pub fn run_batch(
    project: &Project,
    flight_ids: &[String],
    store: &RunStore,
    isp_factory: Arc<dyn IspSolverFactory>,
    options: &RunOptions,
) -> Vec<(String, AppResult<RunResponse>)> {
    flight_ids
        .par_iter()
        .map(|flight_id| {
            let result = ensure_run(project, flight_id, store, isp_factory.clone(), options);
            if let Err(e) = &result {
                error!(flight_id, error = %e, "flight failed");
            }
            (flight_id.clone(), result)
        })
        .collect()
}
