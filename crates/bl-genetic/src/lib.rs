//! `bl-genetic`: genetic search for a bus line timetable.
//!
//! A candidate timetable is a [`Chromosome`][bl_line::Chromosome]: 24
//! departure counts, one per hour.  Each candidate is scored by simulating
//! a day with [`bl_sim::Simulation`], then ranked either by NSGA-II on
//! (operating cost, passenger satisfaction) or by a single weighted fitness.
//! Candidates that leave passengers behind are infeasible and lose to every
//! feasible one.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`config`]      | `OptimizerConfig`, `RankingMode`, `CostModel`, weights     |
//! | [`constraints`] | `Constraints`, `HourConstraint` (pinned or free hours)     |
//! | [`individual`]  | `Individual`, `Objectives`, dominance and comparisons      |
//! | [`nsga`]        | non-dominated sort, crowding distance                      |
//! | [`operators`]   | random init, mutation, uniform crossover, tournaments      |
//! | [`evaluate`]    | `Evaluator` (parallel with the `parallel` feature)         |
//! | [`convergence`] | `ConvergenceTracker`                                       |
//! | [`optimizer`]   | `GeneticOptimizer`, `StopHandle`, progress reporting       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bl_genetic::{Constraints, GeneticOptimizer, NoopProgress, OptimizerConfig};
//!
//! let sim = bl_sim::SimBuilder::new(stops).build()?;
//! let config = OptimizerConfig { seed: Some(1), ..Default::default() };
//! let mut ga = GeneticOptimizer::new(config, sim, Constraints::free())?;
//! let outcome = ga.run(50, &mut NoopProgress)?;
//! println!("{}", outcome.timetable());
//! ```

pub mod config;
pub mod constraints;
pub mod convergence;
pub mod error;
pub mod evaluate;
pub mod individual;
pub mod nsga;
pub mod operators;
pub mod optimizer;

#[cfg(test)]
mod tests;

pub use config::{CostModel, OptimizerConfig, RankingMode, ScalarWeights};
pub use constraints::{Constraints, HourConstraint};
pub use convergence::ConvergenceTracker;
pub use error::{GeneticError, GeneticResult};
pub use evaluate::Evaluator;
pub use individual::{INFEASIBLE_FITNESS, Individual, Objectives, load_deviation, scalar_fitness};
pub use operators::GeneBounds;
pub use optimizer::{
    GenerationReport, GeneticOptimizer, NoopProgress, OptimizationOutcome, ProgressObserver,
    StopHandle, StopReason,
};
