//! The generational optimizer loop.
//!
//! # Pareto mode (NSGA-II)
//!
//! ```text
//! combined = population ∪ offspring
//! fronts   = non_dominated_sort(combined)
//! next     = whole fronts while they fit, then the best of the next front
//!            by crowded comparison
//! offspring = N/2 × (tournament, tournament → uniform crossover → mutate)
//! ```
//!
//! # Scalar mode
//!
//! The `elitism` fittest individuals survive unchanged; the rest of the
//! next generation is bred by fitness tournaments, crossover and mutation.
//!
//! Stop requests are honoured only between generations, so an in-flight
//! batch of evaluations always completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bl_core::SimRng;
use bl_line::{Chromosome, TimeTable};
use bl_sim::Simulation;
use tracing::{debug, info};

use crate::convergence::ConvergenceTracker;
use crate::evaluate::Evaluator;
use crate::nsga::{assign_crowding_distance, non_dominated_sort, rank_population};
use crate::operators::{GeneBounds, mutate, random_chromosome, tournament, uniform_crossover};
use crate::{Constraints, GeneticError, GeneticResult, Individual, OptimizerConfig, RankingMode};

// ── Stop handle ───────────────────────────────────────────────────────────────

/// Cooperative stop request, checked between generations.
///
/// Cloning shares the flag, so a handle can be moved to another thread
/// (e.g. a Ctrl-C handler) while the optimizer runs.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Progress reporting ───────────────────────────────────────────────────────

/// Summary of one completed generation.
#[derive(Clone, Copy, Debug)]
pub struct GenerationReport<'a> {
    pub generation: usize,
    pub best:       &'a Individual,
    /// Individuals in the first Pareto front of the population.
    pub front_size: usize,
    /// Individuals that left nobody behind.
    pub feasible:   usize,
    /// Consecutive generations the best chromosome has held.
    pub streak:     usize,
}

/// Callbacks invoked by [`GeneticOptimizer::run`].
pub trait ProgressObserver {
    fn on_generation(&mut self, _report: &GenerationReport<'_>) {}
}

/// A [`ProgressObserver`] that does nothing.
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The best chromosome held for the whole convergence window.
    Converged,
    MaxGenerations,
    /// A [`StopHandle`] asked the loop to stop.
    Stopped,
}

#[derive(Clone, Debug)]
pub struct OptimizationOutcome {
    pub best:         Individual,
    pub pareto_front: Vec<Individual>,
    pub generations:  usize,
    pub reason:       StopReason,
}

impl OptimizationOutcome {
    /// The best individual decoded into a timetable.
    pub fn timetable(&self) -> TimeTable {
        TimeTable::from_chromosome(&self.best.chromosome)
    }
}

// ── GeneticOptimizer ─────────────────────────────────────────────────────────

pub struct GeneticOptimizer {
    config:      OptimizerConfig,
    constraints: Constraints,
    bounds:      GeneBounds,
    evaluator:   Evaluator,
    rng:         SimRng,
    population:  Vec<Individual>,
    /// Pareto mode only: children bred from `population`, already
    /// evaluated, waiting to compete in the next generation.
    offspring:   Vec<Individual>,
    generation:  usize,
    convergence: ConvergenceTracker,
    stop:        StopHandle,
}

impl GeneticOptimizer {
    /// Validate the configuration, then create and evaluate the initial
    /// population.
    pub fn new(
        config:      OptimizerConfig,
        simulation:  Simulation,
        constraints: Constraints,
    ) -> GeneticResult<Self> {
        config.validate()?;
        let bounds = GeneBounds { min: config.min_departures, max: config.max_departures };
        let rng = match config.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_entropy(),
        };
        let evaluator = Evaluator::new(simulation, &config)?;

        let mut optimizer = Self {
            convergence: ConvergenceTracker::new(config.convergence_window),
            config,
            constraints,
            bounds,
            evaluator,
            rng,
            population: Vec::new(),
            offspring: Vec::new(),
            generation: 0,
            stop: StopHandle::new(),
        };
        optimizer.init_population()?;
        Ok(optimizer)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Generations completed since construction.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// A handle that stops [`run`][Self::run] at the next generation boundary.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The preferred individual of the current population.
    pub fn best(&self) -> &Individual {
        let best = match self.config.ranking {
            RankingMode::Pareto => self.population.iter().min_by(|a, b| a.best_cmp(b)),
            RankingMode::Scalar { .. } => {
                self.population.iter().max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
            }
        };
        // The population is never empty after construction.
        best.unwrap_or(&self.population[0])
    }

    /// Non-dominated individuals of the current population.
    pub fn pareto_front(&self) -> Vec<Individual> {
        let mut scratch = self.population.clone();
        let fronts = non_dominated_sort(&mut scratch);
        let Some(first) = fronts.first() else { return Vec::new() };
        let mut front: Vec<Individual> = first.iter().map(|&i| scratch[i].clone()).collect();
        front.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
        front
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Advance one generation.
    pub fn update_generation(&mut self) -> GeneticResult<()> {
        match self.config.ranking {
            RankingMode::Pareto => self.pareto_generation()?,
            RankingMode::Scalar { elitism, .. } => self.scalar_generation(elitism)?,
        }
        self.generation += 1;

        let best = self.best();
        info!(
            generation = self.generation,
            best = %best.chromosome,
            cost = best.cost(),
            satisfaction = best.satisfaction(),
            unboarded = best.objectives.left_unboarded,
            feasible = self.population.iter().filter(|i| i.is_feasible()).count(),
            "generation complete"
        );
        Ok(())
    }

    /// Run until converged, `max_generations` generations have completed,
    /// or a stop is requested.
    pub fn run<O: ProgressObserver>(
        &mut self,
        max_generations: usize,
        observer:        &mut O,
    ) -> GeneticResult<OptimizationOutcome> {
        let reason = loop {
            if self.stop.is_stop_requested() {
                break StopReason::Stopped;
            }
            if self.generation >= max_generations {
                break StopReason::MaxGenerations;
            }

            self.update_generation()?;
            let best_chromosome = self.best().chromosome;
            let converged = self.convergence.observe(&best_chromosome);

            let front_size = self.pareto_front().len();
            let feasible = self.population.iter().filter(|i| i.is_feasible()).count();
            observer.on_generation(&GenerationReport {
                generation: self.generation,
                best: self.best(),
                front_size,
                feasible,
                streak: self.convergence.streak(),
            });

            if converged {
                break StopReason::Converged;
            }
        };

        debug!(?reason, generations = self.generation, "optimization finished");
        Ok(OptimizationOutcome {
            best:         self.best().clone(),
            pareto_front: self.pareto_front(),
            generations:  self.generation,
            reason,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn init_population(&mut self) -> GeneticResult<()> {
        let chromosomes: Vec<Chromosome> = (0..self.config.population_size)
            .map(|_| random_chromosome(&self.constraints, self.bounds, &mut self.rng))
            .collect();
        self.population = self.evaluator.evaluate(chromosomes, &mut self.rng)?;
        if self.population.is_empty() {
            return Err(GeneticError::Config("initial population is empty".into()));
        }

        match self.config.ranking {
            RankingMode::Pareto => {
                rank_population(&mut self.population);
                self.offspring = self.breed_offspring()?;
            }
            RankingMode::Scalar { .. } => self.sort_by_fitness(),
        }
        let best_chromosome = self.best().chromosome;
        self.convergence.observe(&best_chromosome);
        Ok(())
    }

    fn pareto_generation(&mut self) -> GeneticResult<()> {
        let size = self.config.population_size;
        let mut combined = std::mem::take(&mut self.population);
        combined.append(&mut self.offspring);

        let fronts = non_dominated_sort(&mut combined);
        let mut selected: Vec<usize> = Vec::with_capacity(size);
        for front in &fronts {
            assign_crowding_distance(&mut combined, front);
            if selected.len() + front.len() <= size {
                selected.extend_from_slice(front);
                continue;
            }
            let mut partial = front.clone();
            partial.sort_by(|&a, &b| combined[a].crowded_cmp(&combined[b]));
            selected.extend(partial.into_iter().take(size - selected.len()));
            break;
        }

        let mut slots: Vec<Option<Individual>> = combined.into_iter().map(Some).collect();
        self.population = selected.into_iter().filter_map(|i| slots[i].take()).collect();
        debug!(fronts = fronts.len(), survivors = self.population.len(), "environmental selection");

        self.offspring = self.breed_offspring()?;
        Ok(())
    }

    fn scalar_generation(&mut self, elitism: usize) -> GeneticResult<()> {
        let size = self.config.population_size;
        let wanted = size - elitism;
        let mut children: Vec<Chromosome> = Vec::with_capacity(wanted + 1);
        while children.len() < wanted {
            let (a, b) = self.breed_pair(|pop, i, j| pop[i].fitness() > pop[j].fitness());
            children.push(a);
            if children.len() < wanted {
                children.push(b);
            }
        }

        let mut next: Vec<Individual> = self.population[..elitism].to_vec();
        next.extend(self.evaluator.evaluate(children, &mut self.rng)?);
        self.population = next;
        self.sort_by_fitness();
        Ok(())
    }

    /// Breed and evaluate `population_size / 2` pairs of children using
    /// crowded-comparison tournaments.
    fn breed_offspring(&mut self) -> GeneticResult<Vec<Individual>> {
        let pairs = self.config.population_size / 2;
        let mut children = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let (a, b) = self.breed_pair(|pop, i, j| pop[i].crowded_cmp(&pop[j]).is_lt());
            children.push(a);
            children.push(b);
        }
        self.evaluator.evaluate(children, &mut self.rng)
    }

    /// Two tournaments, uniform crossover, then mutation of both children.
    fn breed_pair<F>(&mut self, better: F) -> (Chromosome, Chromosome)
    where
        F: Fn(&[Individual], usize, usize) -> bool,
    {
        let population = &self.population;
        let rng = &mut self.rng;
        let len = population.len();
        let p1 = tournament(len, rng, |i, j| better(population, i, j));
        let p2 = tournament(len, rng, |i, j| better(population, i, j));

        let (mut a, mut b) =
            uniform_crossover(&population[p1].chromosome, &population[p2].chromosome, rng);
        let rate = self.config.mutation_rate;
        mutate(&mut a, &self.constraints, rate, self.bounds, rng);
        mutate(&mut b, &self.constraints, rate, self.bounds, rng);
        (a, b)
    }

    fn sort_by_fitness(&mut self) {
        self.population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }
}
