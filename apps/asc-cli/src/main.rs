use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use asc_app::{ensure_run, run_batch, AppResult, RunOptions};
use asc_env::FixedIspFactory;
use asc_project::load_yaml;
use asc_results::RunStore;

#[derive(Parser)]
#[command(name = "asc-cli")]
#[command(about = "Ascent CLI - rocket flight simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// List vehicles and flights in a project
    Vehicles {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Fly one flight from the project
    Fly {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Flight ID to run
        flight_id: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Isp entries as fuel/oxidizer=seconds (repeatable)
        #[arg(long = "isp", value_parser = parse_isp_entry)]
        isp: Vec<(String, f64)>,
        /// Fallback Isp in seconds for unlisted propellant pairs
        #[arg(long, default_value_t = 220.0)]
        default_isp: f64,
    },
    /// Fly every flight in the project
    FlyAll {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Isp entries as fuel/oxidizer=seconds (repeatable)
        #[arg(long = "isp", value_parser = parse_isp_entry)]
        isp: Vec<(String, f64)>,
        /// Fallback Isp in seconds for unlisted propellant pairs
        #[arg(long, default_value_t = 220.0)]
        default_isp: f64,
    },
    /// List cached runs for a vehicle
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Vehicle ID to list runs for
        vehicle_id: String,
    },
    /// Show metrics of a cached run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
}

fn parse_isp_entry(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=SECONDS, got '{raw}'"))?;
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("invalid Isp value '{value}'"))?;
    Ok((key.to_string(), seconds))
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Vehicles { project_path } => cmd_vehicles(&project_path),
        Commands::Fly {
            project_path,
            flight_id,
            no_cache,
            isp,
            default_isp,
        } => cmd_fly(&project_path, &flight_id, !no_cache, isp, default_isp),
        Commands::FlyAll {
            project_path,
            no_cache,
            isp,
            default_isp,
        } => cmd_fly_all(&project_path, !no_cache, isp, default_isp),
        Commands::Runs {
            project_path,
            vehicle_id,
        } => cmd_runs(&project_path, &vehicle_id),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
    }
}

fn isp_factory(entries: Vec<(String, f64)>, default_isp: f64) -> Arc<FixedIspFactory> {
    Arc::new(FixedIspFactory::new(entries).with_fallback(default_isp))
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    let project = load_yaml(project_path)?;
    println!(
        "OK: '{}' ({} vehicles, {} flights)",
        project.name,
        project.vehicles.len(),
        project.flights.len()
    );
    Ok(())
}

fn cmd_vehicles(project_path: &Path) -> AppResult<()> {
    let project = load_yaml(project_path)?;
    for vehicle in &project.vehicles {
        println!("{}  {}", vehicle.id, vehicle.name);
        for flight in project.flights.iter().filter(|f| f.vehicle_id == vehicle.id) {
            println!(
                "  flight {}  max_step={}s  t_bound={}s",
                flight.id, flight.max_step_s, flight.t_bound_s
            );
        }
    }
    Ok(())
}

fn cmd_fly(
    project_path: &Path,
    flight_id: &str,
    use_cache: bool,
    isp: Vec<(String, f64)>,
    default_isp: f64,
) -> AppResult<()> {
    let project = load_yaml(project_path)?;
    let store = RunStore::for_project(project_path)?;
    let options = RunOptions {
        use_cache,
        ..RunOptions::default()
    };

    let response = ensure_run(
        &project,
        flight_id,
        &store,
        isp_factory(isp, default_isp),
        &options,
    )?;
    print_metrics(&response);
    Ok(())
}

fn cmd_fly_all(
    project_path: &Path,
    use_cache: bool,
    isp: Vec<(String, f64)>,
    default_isp: f64,
) -> AppResult<()> {
    let project = load_yaml(project_path)?;
    let store = RunStore::for_project(project_path)?;
    let options = RunOptions {
        use_cache,
        ..RunOptions::default()
    };

    let flight_ids: Vec<String> = project.flights.iter().map(|f| f.id.clone()).collect();
    let results = run_batch(
        &project,
        &flight_ids,
        &store,
        isp_factory(isp, default_isp),
        &options,
    );

    let mut failures = 0;
    for (flight_id, result) in results {
        match result {
            Ok(response) => {
                println!("== {flight_id} ==");
                print_metrics(&response);
            }
            Err(e) => {
                failures += 1;
                eprintln!("== {flight_id} == FAILED: {e}");
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_runs(project_path: &Path, vehicle_id: &str) -> AppResult<()> {
    let store = RunStore::for_project(project_path)?;
    let runs = store.list_runs(vehicle_id)?;
    if runs.is_empty() {
        println!("No cached runs for vehicle '{vehicle_id}'");
        return Ok(());
    }
    for manifest in runs {
        println!(
            "{}  {}  solver={}",
            manifest.run_id, manifest.timestamp, manifest.solver_version
        );
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_project(project_path)?;
    let manifest = store.load_manifest(run_id)?;
    let metrics = store.load_metrics(run_id)?;
    println!("run {}  vehicle {}", manifest.run_id, manifest.vehicle_id);
    println!("  timestamp     {}", manifest.timestamp);
    println!("  apogee        {:.1} m at t={:.2} s", metrics.apogee_m, metrics.apogee_time_s);
    println!("  peak speed    {:.1} m/s (Mach {:.2})", metrics.peak_speed_m_s, metrics.peak_mach);
    println!("  flight time   {:.2} s", metrics.flight_time_s);
    println!(
        "  mass          {:.2} kg wet / {:.2} kg dry",
        metrics.wet_mass_kg, metrics.dry_mass_kg
    );
    Ok(())
}

fn print_metrics(response: &asc_app::RunResponse) {
    let metrics = &response.metrics;
    let source = if response.loaded_from_cache {
        "cache"
    } else {
        "fresh"
    };
    println!("run {} ({source})", response.run_id);
    println!("  apogee        {:.1} m at t={:.2} s", metrics.apogee_m, metrics.apogee_time_s);
    println!("  peak speed    {:.1} m/s (Mach {:.2})", metrics.peak_speed_m_s, metrics.peak_mach);
    println!("  flight time   {:.2} s", metrics.flight_time_s);
    println!(
        "  mass          {:.2} kg wet / {:.2} kg dry",
        metrics.wet_mass_kg, metrics.dry_mass_kg
    );
}
