use std::path::PathBuf;

use bl_core::Minute;
use bl_genetic::Constraints;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "timetable-cli")]
#[command(author, version, about = "Simulate and optimize a bus line timetable")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate a timetable and print the averaged statistics
    Analyze(AnalyzeArgs),
    /// Search for a timetable balancing operating cost and passenger satisfaction
    Optimize(OptimizeArgs),
}

/// Options shared by both subcommands.
#[derive(Args)]
pub struct LineArgs {
    /// Bus-stop definition file
    #[arg(short, long, value_name = "FILE")]
    pub stops: PathBuf,

    /// Vehicle capacity (standing and seated)
    #[arg(long, default_value_t = 80)]
    pub capacity: u32,

    /// Seated places per vehicle
    #[arg(long, default_value_t = 30)]
    pub seats: u32,

    /// Opening time, HH:MM
    #[arg(long, default_value = "00:00")]
    pub start: Minute,

    /// Closing time, HH:MM
    #[arg(long, default_value = "24:00")]
    pub end: Minute,

    /// Master seed; omitted means a fresh random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// Timetable file
    #[arg(short, long, value_name = "FILE")]
    pub timetable: PathBuf,

    /// Independent runs to average
    #[arg(short, long, default_value_t = 1)]
    pub runs: usize,

    /// Print statistics as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub line: LineArgs,

    /// Optimizer configuration (JSON); missing fields take their defaults
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 24 comma-separated departure counts, `x` for hours left to the optimizer
    #[arg(long, value_name = "LIST")]
    pub constraints: Option<Constraints>,

    /// Upper bound on generations
    #[arg(short, long, default_value_t = 100)]
    pub generations: usize,

    /// Worker threads for fitness evaluation; overrides the config file
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print the final Pareto front as JSON
    #[arg(long)]
    pub json: bool,
}
