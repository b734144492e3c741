//! timetable-cli: command-line driver for the bus line simulator.
//!
//! ```text
//! timetable-cli analyze  --stops data/stops.txt --timetable data/timetable.txt --runs 20
//! timetable-cli optimize --stops data/stops.txt --constraints 0,0,0,0,0,x,x,...,0 --generations 50
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every
//! simulation run, `RUST_LOG=bl_sim=trace` to follow a single-run analysis
//! visit by visit.

mod cli;

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use bl_genetic::{
    Constraints, GenerationReport, GeneticOptimizer, OptimizerConfig, ProgressObserver,
};
use bl_line::{load_bus_stops, load_time_table};
use bl_sim::{SimBuilder, SimConfig, Simulation, TraceObserver, VehicleConfig};

use cli::{AnalyzeArgs, Cli, Command, LineArgs, OptimizeArgs};

// ── Progress printing ─────────────────────────────────────────────────────────

struct PrintProgress;

impl ProgressObserver for PrintProgress {
    fn on_generation(&mut self, report: &GenerationReport<'_>) {
        println!(
            "gen {:>4}  best {}  cost {:>10.2}  satisfaction {:.4}  front {:>3}  feasible {:>3}  streak {}",
            report.generation,
            report.best.chromosome,
            report.best.cost(),
            report.best.satisfaction(),
            report.front_size,
            report.feasible,
            report.streak,
        );
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn build_simulation(line: &LineArgs) -> Result<Simulation> {
    let stops = load_bus_stops(&line.stops)
        .with_context(|| format!("loading bus stops from {}", line.stops.display()))?;
    info!(stops = stops.len(), path = %line.stops.display(), "bus stops loaded");
    for stop in &stops {
        debug!(
            stop = %stop.name,
            travel_minutes = stop.travel_minutes,
            expected_daily = stop.arrival_rates.daily_total(),
            "stop demand"
        );
    }
    if stops.iter().all(|s| s.arrival_rates.is_idle()) {
        warn!(path = %line.stops.display(), "no stop has any passenger arrivals");
    }

    let sim = SimBuilder::new(stops)
        .vehicle(VehicleConfig { capacity: line.capacity, seats: line.seats })
        .config(SimConfig { start: line.start, end: line.end, seed: line.seed })
        .build()?;
    Ok(sim)
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }
    let sim = build_simulation(&args.line)?;
    let timetable = load_time_table(&args.timetable)
        .with_context(|| format!("loading timetable from {}", args.timetable.display()))?;
    info!(departures = timetable.len(), runs = args.runs, "timetable loaded");

    let started = Instant::now();
    let mut rng = sim.config().make_rng();
    let stats = if args.runs == 1 {
        sim.run_observed(&timetable, &mut rng, &mut TraceObserver)?
    } else {
        sim.run_multiple_then_average(&timetable, &mut rng, args.runs)?
    };
    info!(elapsed_ms = started.elapsed().as_millis(), "analysis finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{stats}");
    }
    Ok(())
}

fn optimize(args: OptimizeArgs) -> Result<()> {
    let sim = build_simulation(&args.line)?;

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading optimizer config {}", path.display()))?;
            serde_json::from_str::<OptimizerConfig>(&text)
                .with_context(|| format!("parsing optimizer config {}", path.display()))?
        }
        None => OptimizerConfig::default(),
    };
    if args.line.seed.is_some() {
        config.seed = args.line.seed;
    }
    if args.threads.is_some() {
        config.num_threads = args.threads;
    }
    let constraints = args.constraints.unwrap_or_else(Constraints::free);
    info!(
        population = config.population_size,
        free_hours = constraints.free_hours(),
        max_generations = args.generations,
        "starting optimizer"
    );

    let started = Instant::now();
    let mut optimizer = GeneticOptimizer::new(config, sim, constraints)?;
    let outcome = optimizer.run(args.generations, &mut PrintProgress)?;
    info!(
        generations = outcome.generations,
        reason = ?outcome.reason,
        elapsed_ms = started.elapsed().as_millis(),
        "optimization finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.pareto_front)?);
        return Ok(());
    }

    println!();
    println!("best  {}", outcome.best);
    println!();
    println!("Pareto front:");
    for individual in &outcome.pareto_front {
        println!("  {individual}");
    }
    println!();
    println!("timetable:");
    print!("{}", outcome.timetable());
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    match Cli::parse().command {
        Command::Analyze(args) => analyze(args),
        Command::Optimize(args) => optimize(args),
    }
}
