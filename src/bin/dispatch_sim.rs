//! Emergency dispatch simulation
//!
//! Runs one seeded simulation from an optional scenario file plus flag
//! overrides, prints a one-line summary and optionally writes metrics and
//! trace JSON for plotting/export tools.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emsim_rs::dispatch::StrategyKind;
use emsim_rs::scenario::{ArrivalSpec, FleetSpec};
use emsim_rs::{ScenarioSpec, SimError, Simulation};

#[derive(Debug, Parser)]
#[command(
    name = "dispatch-sim",
    about = "Discrete-event simulation of emergency-response dispatch"
)]
struct Args {
    /// Path to a scenario JSON file
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// fifo | nearest (closest) | random | highest-priority-first (hpf)
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// Fleet size
    #[arg(long)]
    units: Option<usize>,

    /// HQ district (repeat for several HQs; units are spread round-robin)
    #[arg(long = "hq", allow_hyphen_values = true)]
    hqs: Vec<i64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Simulated horizon in hours
    #[arg(long, allow_negative_numbers = true)]
    hours: Option<f64>,

    #[arg(long)]
    mean_interarrival_mins: Option<f64>,

    #[arg(long)]
    critical_prob: Option<f64>,

    /// Only injected cases from the scenario arrive
    #[arg(long)]
    no_stochastic: bool,

    /// Never reroute units to new critical cases
    #[arg(long)]
    no_preemption: bool,

    /// Let homeward-bound units take new cases
    #[arg(long)]
    recall_homeward: bool,

    /// Write the metrics record as JSON
    #[arg(long)]
    metrics_json: Option<PathBuf>,

    /// Write the event trace as JSON
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

fn apply_overrides(spec: &mut ScenarioSpec, args: &Args) {
    if args.strategy.is_some() {
        spec.strategy = args.strategy;
    }
    if args.seed.is_some() {
        spec.seed = args.seed;
    }
    if args.hours.is_some() {
        spec.horizon_hours = args.hours;
    }
    if args.no_preemption {
        spec.preemption = Some(false);
    }
    if args.recall_homeward {
        spec.recall_homeward = Some(true);
    }
    if args.trace_json.is_some() {
        spec.trace = Some(true);
    }

    let fleet = spec.fleet.get_or_insert(FleetSpec {
        hqs: None,
        units: None,
    });
    if !args.hqs.is_empty() {
        fleet.hqs = Some(args.hqs.clone());
    }
    if args.units.is_some() {
        fleet.units = args.units;
    }

    let arrivals = spec.arrivals.get_or_insert(ArrivalSpec {
        stochastic: true,
        mean_interarrival_mins: None,
        critical_probability: None,
        critical_treatment_mins: None,
        routine_treatment_mins: None,
    });
    if args.no_stochastic {
        arrivals.stochastic = false;
    }
    if args.mean_interarrival_mins.is_some() {
        arrivals.mean_interarrival_mins = args.mean_interarrival_mins;
    }
    if args.critical_prob.is_some() {
        arrivals.critical_probability = args.critical_prob;
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut spec = match &args.scenario {
        Some(path) => ScenarioSpec::load(path)?,
        None => ScenarioSpec::default(),
    };
    apply_overrides(&mut spec, &args);
    let config = spec.into_config()?;
    let strategy = config.strategy;
    let units = config.units;

    let mut sim = Simulation::new(config)?;
    let metrics = sim.run()?;

    println!(
        "summary strategy={} units={} hours={:.2} utilization={:.4} hq_fraction={:.4} avg_wait_min={:.2} critical={} routine={} redirections={}",
        strategy,
        units,
        metrics.elapsed_secs as f64 / 3600.0,
        metrics.utilization,
        metrics.hq_fraction,
        metrics.average_wait_minutes,
        metrics.critical_case_count,
        metrics.routine_case_count,
        metrics.redirections,
    );

    if let Some(path) = &args.metrics_json {
        fs::write(path, serde_json::to_string_pretty(&metrics)?)?;
        eprintln!("wrote metrics to {}", path.display());
    }
    if let Some(path) = &args.trace_json {
        if let Some(trace) = sim.take_trace() {
            fs::write(path, serde_json::to_string_pretty(&trace)?)?;
            eprintln!("wrote trace to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
