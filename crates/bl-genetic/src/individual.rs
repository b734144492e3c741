//! Candidate timetables and the objectives read back from simulation.

use std::cmp::Ordering;
use std::fmt;

use bl_line::Chromosome;
use bl_stats::Statistics;

use crate::{CostModel, ScalarWeights};

/// Sentinel base for the scalar fitness of a timetable that leaves
/// passengers behind.  The shortfall is subtracted so the GA can still
/// climb towards feasibility.
pub const INFEASIBLE_FITNESS: f64 = -1e9;

// ── Objectives ────────────────────────────────────────────────────────────────

/// Everything the optimizer ranks on, extracted from one evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objectives {
    /// Operating (or net) cost.  Minimised.
    pub cost: f64,
    /// Average passenger satisfaction in `[0, 1]`.  Maximised.
    pub satisfaction: f64,
    /// Passengers left behind by full buses.  Zero means feasible.
    pub left_unboarded: f64,
    /// Weighted single-number fitness.  Maximised.
    pub fitness: f64,
    pub buses: f64,
}

impl Objectives {
    pub fn from_statistics(
        stats:    &Statistics,
        capacity: u32,
        cost:     &CostModel,
        weights:  &ScalarWeights,
    ) -> Self {
        let buses = stats.total_buses();
        Self {
            cost: cost.objective(buses, capacity, stats.total_passengers_transported()),
            satisfaction: stats.average_passenger_satisfaction(),
            left_unboarded: stats.total_passengers_left_unboarded(),
            fitness: scalar_fitness(stats, weights),
            buses,
        }
    }
}

/// Penalty for an average load factor `p` away from `target`:
/// `1 − p/target` below it, `(p − target)/(1 − target)` above it.
pub fn load_deviation(p: f64, target: f64) -> f64 {
    if p < target { 1.0 - p / target } else { (p - target) / (1.0 - target) }
}

/// Weighted fitness, higher is better.  Any unboarded passenger gives
/// [`INFEASIBLE_FITNESS`] minus the shortfall.
pub fn scalar_fitness(stats: &Statistics, weights: &ScalarWeights) -> f64 {
    let left = stats.total_passengers_left_unboarded();
    if left > 0.0 {
        return INFEASIBLE_FITNESS - left;
    }

    let arrived = stats.total_passengers_arrived();
    let transported_share =
        if arrived == 0.0 { 0.0 } else { stats.total_passengers_transported() / arrived };
    let load_factor = stats.fleet.average_load_percent / 100.0;

    -weights.buses * stats.total_buses() + weights.transported * transported_share
        - weights.wait * stats.average_wait_time()
        - weights.load_deviation * load_deviation(load_factor, weights.target_load)
}

// ── Individual ────────────────────────────────────────────────────────────────

/// One evaluated chromosome plus its NSGA-II bookkeeping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    pub chromosome: Chromosome,
    pub objectives: Objectives,
    /// Pareto front index, 0 = non-dominated.
    pub rank: usize,
    pub crowding: f64,
}

impl Individual {
    pub fn new(chromosome: Chromosome, objectives: Objectives) -> Self {
        Self { chromosome, objectives, rank: 0, crowding: 0.0 }
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.objectives.cost
    }

    #[inline]
    pub fn satisfaction(&self) -> f64 {
        self.objectives.satisfaction
    }

    #[inline]
    pub fn fitness(&self) -> f64 {
        self.objectives.fitness
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.objectives.left_unboarded == 0.0
    }

    /// Plain Pareto dominance: no worse on cost and satisfaction, strictly
    /// better on at least one.
    pub fn dominates(&self, other: &Individual) -> bool {
        let (a, b) = (&self.objectives, &other.objectives);
        a.cost <= b.cost
            && a.satisfaction >= b.satisfaction
            && (a.cost < b.cost || a.satisfaction > b.satisfaction)
    }

    /// Feasibility-first dominance.  Between two feasible individuals this
    /// is [`dominates`][Self::dominates]; otherwise fewer unboarded
    /// passengers wins.
    pub fn constraint_dominates(&self, other: &Individual) -> bool {
        if self.is_feasible() && other.is_feasible() {
            self.dominates(other)
        } else {
            self.objectives.left_unboarded < other.objectives.left_unboarded
        }
    }

    /// Crowded-comparison order: lower rank first, then larger crowding
    /// distance.
    pub fn crowded_cmp(&self, other: &Individual) -> Ordering {
        self.rank.cmp(&other.rank).then_with(|| other.crowding.total_cmp(&self.crowding))
    }

    /// Preference used to pick the reported best individual: lowest rank,
    /// then lowest cost, then highest satisfaction.
    pub fn best_cmp(&self, other: &Individual) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.cost().total_cmp(&other.cost()))
            .then_with(|| other.satisfaction().total_cmp(&self.satisfaction()))
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: cost {:.2}, satisfaction {:.4}, unboarded {:.1}, rank {}",
            self.chromosome,
            self.cost(),
            self.satisfaction(),
            self.objectives.left_unboarded,
            self.rank
        )
    }
}
