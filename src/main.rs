//! uced-sim entry point: CLI wiring and config-driven plan assembly.

use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use uced_sim::config::ScenarioConfig;
use uced_sim::io::export::{export_hourly_csv, export_series_csv};
use uced_sim::pipeline::prepare_plan;
use uced_sim::timeseries::HourlyStatistic;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    stat_override: Option<HourlyStatistic>,
    out_dir: Option<PathBuf>,
}

fn print_help() {
    eprintln!("uced-sim — two-stage UC/ED market-study configuration tool");
    eprintln!();
    eprintln!("Usage: uced-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Load scenario from TOML config file");
    eprintln!("  --preset <name>     Use a built-in preset (demo, year_run)");
    eprintln!("  --seed <u64>        Override random seed for synthetic data");
    eprintln!("  --stat <name>       Override hourly statistic (first, mean)");
    eprintln!("  --out-dir <path>    Export aligned series and plan report");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the demo preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        stat_override: None,
        out_dir: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--stat" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --stat requires a statistic name");
                    process::exit(1);
                }
                match args[i].parse::<HourlyStatistic>() {
                    Ok(stat) => cli.stat_override = Some(stat),
                    Err(e) => {
                        eprintln!("error: {e}");
                        process::exit(1);
                    }
                }
            }
            "--out-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out-dir requires a path argument");
                    process::exit(1);
                }
                cli.out_dir = Some(PathBuf::from(&args[i]));
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn export_outputs(
    out_dir: &Path,
    series: &uced_sim::pipeline::PreparedSeries,
    plan: &uced_sim::sequence::SimulationPlan,
) -> std::io::Result<()> {
    std::fs::create_dir_all(out_dir)?;
    export_series_csv(&series.demand_fine, &out_dir.join("demand_5min.csv"))?;
    export_hourly_csv(&series.demand_hourly, &out_dir.join("demand_hourly.csv"))?;
    export_series_csv(&series.renewable_fine, &out_dir.join("renewable_5min.csv"))?;
    export_hourly_csv(&series.renewable_hourly, &out_dir.join("renewable_hourly.csv"))?;
    std::fs::write(out_dir.join("plan.txt"), format!("{plan}\n"))?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then demo.
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::demo()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(stat) = cli.stat_override {
        scenario.simulation.hourly_statistic = stat;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (system, series, plan) = match prepare_plan(&scenario) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!(
        "System \"{}\": {} thermal units ({:.1} MW), reserve requirement {:.1} MW",
        system.name,
        system.thermal.len(),
        system.thermal_capacity_mw(),
        system.reserve_requirement_mw()
    );
    println!("\n{plan}");

    if let Some(ref out_dir) = cli.out_dir {
        if let Err(e) = export_outputs(out_dir, &series, &plan) {
            eprintln!("error: failed to write outputs: {e}");
            process::exit(1);
        }
        eprintln!("Outputs written to {}", out_dir.display());
    }
}
