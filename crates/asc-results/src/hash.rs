//! Content-based hashing for run IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::RunType;

/// Run identity: hash of the vehicle definition, the run parameters, and the
/// solver version. Identical inputs always map to the same run directory.
pub fn compute_run_id<V: Serialize>(
    vehicle: &V,
    run_type: &RunType,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let vehicle_json = serde_json::to_string(vehicle).unwrap_or_default();
    hasher.update(vehicle_json.as_bytes());

    let run_type_json = serde_json::to_string(run_type).unwrap_or_default();
    hasher.update(run_type_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
