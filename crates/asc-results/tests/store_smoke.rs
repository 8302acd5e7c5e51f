use asc_results::{
    ComponentSnapshot, FieldSample, FlightMetrics, RunManifest, RunStore, RunType, TrajectoryRecord,
};

fn manifest(run_id: &str, vehicle_id: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        vehicle_id: vehicle_id.to_string(),
        timestamp: "2026-08-27T00:00:00Z".to_string(),
        run_type: RunType::Flight {
            max_step_s: 0.1,
            t_bound_s: 400.0,
            steps: 2,
        },
        solver_version: "v1".to_string(),
    }
}

fn records() -> Vec<TrajectoryRecord> {
    vec![
        TrajectoryRecord {
            time_s: 0.0,
            x_m: 0.0,
            y_m: 0.0,
            vx_m_s: 0.0,
            vy_m_s: 0.0,
            ax_m_s2: 0.0,
            ay_m_s2: 15.0,
            mass_kg: 34.0,
            thrust_n: 800.0,
            drag_n: 0.0,
            mach: 0.0,
            phase: "OnRail".to_string(),
            components: vec![ComponentSnapshot {
                component_id: "fuel tank".to_string(),
                fields: vec![FieldSample {
                    name: "fluid_mass".to_string(),
                    value: 4.0,
                }],
            }],
        },
        TrajectoryRecord {
            time_s: 0.1,
            x_m: 0.01,
            y_m: 0.08,
            vx_m_s: 0.2,
            vy_m_s: 1.5,
            ax_m_s2: 2.0,
            ay_m_s2: 15.0,
            mass_kg: 33.9,
            thrust_n: 800.0,
            drag_n: 0.1,
            mach: 0.004,
            phase: "OnRail".to_string(),
            components: vec![],
        },
    ]
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = std::env::temp_dir().join("asc_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let manifest = manifest("run-a", "demo");
    let records = records();
    let metrics = FlightMetrics::from_records(&records, 34.0, 28.0);

    assert!(!store.has_run("run-a"));
    store.save_run(&manifest, &records, &metrics).unwrap();
    assert!(store.has_run("run-a"));

    let loaded = store.load_manifest("run-a").unwrap();
    assert_eq!(loaded.vehicle_id, "demo");

    let series = store.load_timeseries("run-a").unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].phase, "OnRail");
    assert_eq!(series[0].components[0].component_id, "fuel tank");

    let loaded_metrics = store.load_metrics("run-a").unwrap();
    assert_eq!(loaded_metrics.apogee_m, 0.08);

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn list_runs_filters_by_vehicle() {
    let temp_dir = std::env::temp_dir().join("asc_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    let metrics = FlightMetrics::default();
    store
        .save_run(&manifest("run-a", "demo"), &[], &metrics)
        .unwrap();
    store
        .save_run(&manifest("run-b", "demo"), &[], &metrics)
        .unwrap();
    store
        .save_run(&manifest("run-c", "other"), &[], &metrics)
        .unwrap();

    let runs = store.list_runs("demo").unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|m| m.vehicle_id == "demo"));

    store.delete_run("run-a").unwrap();
    assert_eq!(store.list_runs("demo").unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn missing_run_is_an_error() {
    let temp_dir = std::env::temp_dir().join("asc_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();
    assert!(store.load_manifest("nope").is_err());
    assert!(store.load_timeseries("nope").is_err());
    assert!(store.load_metrics("nope").is_err());

    let _ = std::fs::remove_dir_all(&temp_dir);
}
