//! Fitness evaluation: one simulated day (or the average of several) per
//! chromosome.
//!
//! # Parallelism
//!
//! A generation's evaluations share nothing mutable, so with the `parallel`
//! feature they run on Rayon's thread pool.  Each evaluation gets its own
//! `SimRng` child stream, derived sequentially from the optimizer's master
//! stream *before* the fan-out, so results are identical for any thread
//! count.  The batch completes before selection continues.

use bl_core::SimRng;
use bl_line::{Chromosome, TimeTable};
use bl_sim::Simulation;

use crate::{CostModel, GeneticResult, Individual, Objectives, OptimizerConfig, RankingMode, ScalarWeights};

pub struct Evaluator {
    simulation: Simulation,
    runs:       usize,
    cost:       CostModel,
    weights:    ScalarWeights,
    #[cfg(feature = "parallel")]
    pool:       Option<rayon::ThreadPool>,
}

impl Evaluator {
    pub fn new(simulation: Simulation, config: &OptimizerConfig) -> GeneticResult<Self> {
        let weights = match config.ranking {
            RankingMode::Scalar { weights, .. } => weights,
            RankingMode::Pareto => ScalarWeights::default(),
        };

        #[cfg(feature = "parallel")]
        let pool = match config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::GeneticError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            simulation,
            runs: config.runs_per_evaluation,
            cost: config.cost,
            weights,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Evaluate a single chromosome with the given stream.
    pub fn evaluate_one(&self, chromosome: Chromosome, rng: &mut SimRng) -> GeneticResult<Individual> {
        let timetable = TimeTable::from_chromosome(&chromosome);
        let stats = if self.runs == 1 {
            self.simulation.run(&timetable, rng)?
        } else {
            self.simulation.run_multiple_then_average(&timetable, rng, self.runs)?
        };
        let capacity = self.simulation.vehicle().capacity;
        let objectives = Objectives::from_statistics(&stats, capacity, &self.cost, &self.weights);
        Ok(Individual::new(chromosome, objectives))
    }

    /// Evaluate a batch, preserving input order.
    pub fn evaluate(&self, chromosomes: Vec<Chromosome>, rng: &mut SimRng) -> GeneticResult<Vec<Individual>> {
        let jobs: Vec<(Chromosome, SimRng)> = chromosomes
            .into_iter()
            .enumerate()
            .map(|(i, c)| (c, rng.child(i as u64)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        {
            jobs.into_iter().map(|(c, mut r)| self.evaluate_one(c, &mut r)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let run = || {
                jobs.into_par_iter()
                    .map(|(c, mut r)| self.evaluate_one(c, &mut r))
                    .collect::<GeneticResult<Vec<_>>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}
