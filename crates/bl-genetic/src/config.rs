//! Optimizer configuration.
//!
//! Defaults: a population of 10, mutation rate 0.3, one or two departures
//! per free hour, Pareto ranking on cost and satisfaction, and a
//! five-generation convergence window.

use bl_line::MAX_DEPARTURES_PER_HOUR;

use crate::{GeneticError, GeneticResult};

// ── Cost model ────────────────────────────────────────────────────────────────

/// Operating cost of a timetable.
///
/// ```text
/// cost = route_length_km × buses × capacity / 100 × cost_per_100_seat_km
/// ```
///
/// With a `fare_per_passenger` the objective becomes net cost, i.e. cost
/// minus fare revenue (negated profit).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostModel {
    pub route_length_km:      f64,
    pub cost_per_100_seat_km: f64,
    pub fare_per_passenger:   Option<f64>,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { route_length_km: 3.8, cost_per_100_seat_km: 99.82, fare_per_passenger: None }
    }
}

impl CostModel {
    /// Cost of running `buses` vehicles of `capacity` places.
    pub fn operating_cost(&self, buses: f64, capacity: u32) -> f64 {
        self.route_length_km * buses * f64::from(capacity) / 100.0 * self.cost_per_100_seat_km
    }

    /// Objective value: operating cost, less fares if a fare is configured.
    pub fn objective(&self, buses: f64, capacity: u32, transported: f64) -> f64 {
        let cost = self.operating_cost(buses, capacity);
        match self.fare_per_passenger {
            Some(fare) => cost - fare * transported,
            None => cost,
        }
    }
}

// ── Scalar weights ────────────────────────────────────────────────────────────

/// Weights of the single-number fitness used by [`RankingMode::Scalar`].
/// Higher fitness is better.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScalarWeights {
    /// Penalty per dispatched bus.
    pub buses: f64,
    /// Reward for the transported share of arrived passengers.
    pub transported: f64,
    /// Penalty per minute of average waiting.
    pub wait: f64,
    /// Penalty for deviating from `target_load`.
    pub load_deviation: f64,
    /// Desired average load factor, in `(0, 1)`.
    pub target_load: f64,
}

impl Default for ScalarWeights {
    fn default() -> Self {
        Self { buses: 1.0, transported: 1.0, wait: 1.0, load_deviation: 1.0, target_load: 0.7 }
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum RankingMode {
    /// NSGA-II on (cost, satisfaction) with feasibility first.
    #[default]
    Pareto,
    /// Elitist GA on one weighted fitness value.
    Scalar {
        /// Best individuals copied unchanged into the next generation.
        #[cfg_attr(feature = "serde", serde(default))]
        elitism: usize,
        #[cfg_attr(feature = "serde", serde(default))]
        weights: ScalarWeights,
    },
}

// ── OptimizerConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizerConfig {
    /// Individuals kept per generation.  At least 2.
    pub population_size: usize,

    /// Per-gene probability that a free hour is re-drawn.
    pub mutation_rate: f64,

    /// Smallest departure count drawn for a free hour.
    pub min_departures: u32,

    /// Largest departure count drawn for a free hour.
    pub max_departures: u32,

    pub ranking: RankingMode,

    pub cost: CostModel,

    /// Stop once the best chromosome is unchanged for this many consecutive
    /// generations.
    pub convergence_window: usize,

    /// Simulation runs averaged per fitness evaluation.
    pub runs_per_evaluation: usize,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Master seed.  `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size:     10,
            mutation_rate:       0.3,
            min_departures:      1,
            max_departures:      2,
            ranking:             RankingMode::Pareto,
            cost:                CostModel::default(),
            convergence_window:  5,
            runs_per_evaluation: 1,
            num_threads:         None,
            seed:                None,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> GeneticResult<()> {
        let fail = |msg: String| Err(GeneticError::Config(msg));

        if self.population_size < 2 {
            return fail(format!("population size {} must be at least 2", self.population_size));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail(format!("mutation rate {} is outside [0, 1]", self.mutation_rate));
        }
        if self.min_departures > self.max_departures {
            return fail(format!(
                "departure bounds {}..={} are empty",
                self.min_departures, self.max_departures
            ));
        }
        if self.max_departures > MAX_DEPARTURES_PER_HOUR {
            return fail(format!(
                "at most {MAX_DEPARTURES_PER_HOUR} departures per hour, got {}",
                self.max_departures
            ));
        }
        if self.convergence_window == 0 {
            return fail("convergence window must be positive".into());
        }
        if self.runs_per_evaluation == 0 {
            return fail("runs per evaluation must be positive".into());
        }
        if self.num_threads == Some(0) {
            return fail("thread count must be positive".into());
        }
        if let RankingMode::Scalar { elitism, weights } = self.ranking {
            if elitism >= self.population_size {
                return fail(format!(
                    "elitism {elitism} leaves no room for offspring in a population of {}",
                    self.population_size
                ));
            }
            if !(weights.target_load > 0.0 && weights.target_load < 1.0) {
                return fail(format!("target load {} is outside (0, 1)", weights.target_load));
            }
        }
        Ok(())
    }
}
