//! Unit and scenario tests for bl-genetic.

use bl_core::SimRng;
use bl_line::{Chromosome, parse_bus_stops};
use bl_sim::{SimBuilder, Simulation};
use bl_stats::{BusStopStatistics, Statistics};

use crate::nsga::{assign_crowding_distance, non_dominated_sort, rank_population};
use crate::operators::{mutate, random_chromosome, tournament, uniform_crossover};
use crate::{
    ConvergenceTracker, Constraints, CostModel, Evaluator, GeneBounds, GeneticError,
    GeneticOptimizer, HourConstraint, INFEASIBLE_FITNESS, Individual, NoopProgress, Objectives,
    OptimizerConfig, ProgressObserver, RankingMode, ScalarWeights, StopReason, load_deviation,
    scalar_fitness,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn ind(cost: f64, satisfaction: f64, left_unboarded: f64) -> Individual {
    let objectives = Objectives { cost, satisfaction, left_unboarded, ..Objectives::default() };
    Individual::new(Chromosome::default(), objectives)
}

/// Two-stop line with light morning demand.
fn small_line() -> Simulation {
    let stops = parse_bus_stops(
        "Depot:0:[(6,20),(7,30),(8,20)]:0.0\n\
         Square:4:[(7,10)]:0.5\n\
         Terminus:9:[]:1.0\n",
    )
    .unwrap();
    SimBuilder::new(stops).seed(3).build().unwrap()
}

fn config(seed: u64) -> OptimizerConfig {
    OptimizerConfig {
        population_size: 6,
        seed: Some(seed),
        convergence_window: 100,
        ..OptimizerConfig::default()
    }
}

fn scalar_config(seed: u64) -> OptimizerConfig {
    OptimizerConfig {
        ranking: RankingMode::Scalar { elitism: 2, weights: ScalarWeights::default() },
        ..config(seed)
    }
}

/// Counts generation callbacks.
#[derive(Default)]
struct Generations(Vec<usize>);

impl ProgressObserver for Generations {
    fn on_generation(&mut self, report: &crate::GenerationReport<'_>) {
        self.0.push(report.generation);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = OptimizerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.population_size, 10);
        assert_eq!(cfg.ranking, RankingMode::Pareto);
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            OptimizerConfig { population_size: 1, ..Default::default() },
            OptimizerConfig { mutation_rate: 1.5, ..Default::default() },
            OptimizerConfig { min_departures: 3, max_departures: 2, ..Default::default() },
            OptimizerConfig { max_departures: 61, ..Default::default() },
            OptimizerConfig { convergence_window: 0, ..Default::default() },
            OptimizerConfig { runs_per_evaluation: 0, ..Default::default() },
            OptimizerConfig { num_threads: Some(0), ..Default::default() },
            OptimizerConfig {
                ranking: RankingMode::Scalar { elitism: 10, weights: ScalarWeights::default() },
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(GeneticError::Config(_))), "{cfg:?}");
        }
    }

    #[test]
    fn operating_cost_matches_route_model() {
        let cost = CostModel::default();
        // 3.8 km × 10 buses × 80 places / 100 × 99.82
        assert!(approx(cost.operating_cost(10.0, 80), 3034.528));
        assert!(approx(cost.objective(10.0, 80, 500.0), 3034.528));

        let with_fare = CostModel { fare_per_passenger: Some(1.5), ..cost };
        assert!(approx(with_fare.objective(10.0, 80, 100.0), 2884.528));
    }
}

// ── Constraints ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use super::*;

    const TEXT: &str = "0,0,0,0,0,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x,2,1,0";

    #[test]
    fn parses_pinned_and_free_hours() {
        let c: Constraints = TEXT.parse().unwrap();
        assert_eq!(c.get(0), HourConstraint::Fixed(0));
        assert_eq!(c.get(21), HourConstraint::Fixed(2));
        assert!(c.is_free(5));
        assert_eq!(c.free_hours(), 16);
        assert_eq!(c.to_string(), TEXT);
    }

    #[test]
    fn accepts_upper_case_and_spaces() {
        let text = TEXT.replace('x', " X ");
        let c: Constraints = text.parse().unwrap();
        assert_eq!(c.free_hours(), 16);
    }

    #[test]
    fn rejects_wrong_length_and_garbage() {
        assert!(matches!("x,x,x".parse::<Constraints>(), Err(GeneticError::Constraints(_))));
        let garbage = TEXT.replacen("x", "many", 1);
        assert!(matches!(garbage.parse::<Constraints>(), Err(GeneticError::Constraints(_))));
    }

    #[test]
    fn rejects_counts_beyond_one_per_minute() {
        let too_many = TEXT.replacen("x", "61", 1);
        assert!(matches!(too_many.parse::<Constraints>(), Err(GeneticError::Constraints(_))));
        let huge = TEXT.replacen("x", "4294967295", 1);
        assert!(matches!(huge.parse::<Constraints>(), Err(GeneticError::Constraints(_))));
        let full = TEXT.replacen("x", "60", 1);
        assert_eq!(full.parse::<Constraints>().unwrap().get(5), HourConstraint::Fixed(60));
    }

    #[test]
    fn apply_overwrites_only_pinned_genes() {
        let c: Constraints = TEXT.parse().unwrap();
        let mut chrom = Chromosome([7; 24]);
        assert!(!c.admits(&chrom));
        c.apply(&mut chrom);
        assert!(c.admits(&chrom));
        assert_eq!(chrom.0[0], 0);
        assert_eq!(chrom.0[10], 7);
        assert_eq!(chrom.0[22], 1);
    }
}

// ── Individuals and fitness ───────────────────────────────────────────────────

#[cfg(test)]
mod individual {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn dominance_needs_one_strict_improvement() {
        let a = ind(10.0, 0.9, 0.0);
        assert!(a.dominates(&ind(12.0, 0.9, 0.0)));
        assert!(a.dominates(&ind(10.0, 0.8, 0.0)));
        assert!(!a.dominates(&ind(10.0, 0.9, 0.0)));
        assert!(!a.dominates(&ind(5.0, 0.5, 0.0)));
    }

    #[test]
    fn feasible_beats_any_infeasible() {
        let feasible = ind(1000.0, 0.1, 0.0);
        let cheap_but_full = ind(1.0, 1.0, 3.0);
        assert!(feasible.constraint_dominates(&cheap_but_full));
        assert!(!cheap_but_full.constraint_dominates(&feasible));
        // Between infeasible individuals, fewer unboarded wins.
        assert!(ind(1.0, 0.0, 2.0).constraint_dominates(&cheap_but_full));
    }

    #[test]
    fn crowded_and_best_orderings() {
        let mut a = ind(5.0, 0.5, 0.0);
        let mut b = ind(4.0, 0.5, 0.0);
        a.crowding = 2.0;
        b.crowding = 1.0;
        assert_eq!(a.crowded_cmp(&b), Ordering::Less);
        assert_eq!(b.best_cmp(&a), Ordering::Less);

        b.rank = 1;
        assert_eq!(a.best_cmp(&b), Ordering::Less);
        assert_eq!(a.crowded_cmp(&b), Ordering::Less);
    }

    #[test]
    fn load_deviation_is_zero_at_target() {
        assert!(approx(load_deviation(0.7, 0.7), 0.0));
        assert!(approx(load_deviation(0.35, 0.7), 0.5));
        assert!(approx(load_deviation(1.0, 0.7), 1.0));
    }

    #[test]
    fn unboarded_passengers_give_penalty_fitness() {
        let mut stop = BusStopStatistics::new("A");
        for _ in 0..5 {
            stop.record_arrival(8);
        }
        stop.record_left_unboarded(2, 8);
        let stats = Statistics::from_run(80, vec![stop], &[]);
        assert_eq!(scalar_fitness(&stats, &ScalarWeights::default()), INFEASIBLE_FITNESS - 2.0);

        let obj = Objectives::from_statistics(&stats, 80, &CostModel::default(), &ScalarWeights::default());
        assert_eq!(obj.left_unboarded, 2.0);
        assert_eq!(obj.buses, 0.0);
        assert_eq!(obj.cost, 0.0);
    }
}

// ── NSGA-II ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod nsga {
    use super::*;

    #[test]
    fn sorts_into_fronts() {
        let mut pop = vec![
            ind(1.0, 0.5, 0.0), // front 0
            ind(2.0, 0.4, 0.0), // dominated by 0
            ind(0.5, 0.3, 0.0), // front 0
            ind(3.0, 0.1, 0.0), // dominated by 1
        ];
        let fronts = non_dominated_sort(&mut pop);
        assert_eq!(fronts, vec![vec![0, 2], vec![1], vec![3]]);
        let ranks: Vec<usize> = pop.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![0, 1, 0, 2]);
    }

    #[test]
    fn infeasible_ranked_after_feasible() {
        let mut pop = vec![ind(1.0, 1.0, 4.0), ind(100.0, 0.0, 0.0), ind(1.0, 1.0, 1.0)];
        let fronts = non_dominated_sort(&mut pop);
        assert_eq!(fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn every_index_in_exactly_one_front() {
        let mut pop: Vec<Individual> =
            (0..12).map(|i| ind(f64::from(i % 5), f64::from(i % 3) / 3.0, 0.0)).collect();
        let fronts = non_dominated_sort(&mut pop);
        let mut all: Vec<usize> = fronts.concat();
        all.sort_unstable();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn crowding_boundaries_are_infinite() {
        let mut pop = vec![
            ind(0.0, 0.0, 0.0),
            ind(1.0, 0.25, 0.0),
            ind(2.0, 0.5, 0.0),
            ind(4.0, 1.0, 0.0),
        ];
        assign_crowding_distance(&mut pop, &[0, 1, 2, 3]);
        assert!(pop[0].crowding.is_infinite());
        assert!(pop[3].crowding.is_infinite());
        // cost gap 2/4 + satisfaction gap 0.5/1
        assert!(approx(pop[1].crowding, 1.0));
        // cost gap 3/4 + satisfaction gap 0.75/1
        assert!(approx(pop[2].crowding, 1.5));
    }

    #[test]
    fn small_fronts_are_all_infinite() {
        let mut pop = vec![ind(1.0, 0.2, 0.0), ind(2.0, 0.9, 0.0)];
        assign_crowding_distance(&mut pop, &[0, 1]);
        assert!(pop.iter().all(|i| i.crowding.is_infinite()));
    }

    #[test]
    fn zero_spread_adds_nothing() {
        let mut pop = vec![ind(1.0, 0.5, 0.0); 4];
        assign_crowding_distance(&mut pop, &[0, 1, 2, 3]);
        let finite: Vec<f64> = pop.iter().map(|i| i.crowding).filter(|c| c.is_finite()).collect();
        assert!(finite.iter().all(|&c| c == 0.0));
        assert!(!finite.is_empty());
    }

    #[test]
    fn rank_population_covers_every_front() {
        let mut pop = vec![ind(1.0, 0.5, 0.0), ind(2.0, 0.4, 0.0), ind(0.5, 0.3, 0.0)];
        let fronts = rank_population(&mut pop);
        assert_eq!(fronts.len(), 2);
        assert!(pop[1].crowding.is_infinite());
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod operators {
    use super::*;

    const BOUNDS: GeneBounds = GeneBounds { min: 1, max: 3 };

    #[test]
    fn random_chromosome_respects_bounds_and_pins() {
        let mut c = Constraints::free();
        c.set(0, HourConstraint::Fixed(0));
        c.set(23, HourConstraint::Fixed(9));
        let mut rng = SimRng::new(1);
        for _ in 0..50 {
            let chrom = random_chromosome(&c, BOUNDS, &mut rng);
            assert_eq!(chrom.0[0], 0);
            assert_eq!(chrom.0[23], 9);
            assert!(chrom.0[1..23].iter().all(|g| (1..=3).contains(g)));
        }
    }

    #[test]
    fn mutation_never_touches_pinned_genes() {
        let chrom = Chromosome([2; 24]);
        let pinned = Constraints::pinned(&chrom);
        let mut rng = SimRng::new(2);
        let mut mutated = chrom;
        assert_eq!(mutate(&mut mutated, &pinned, 1.0, BOUNDS, &mut rng), 0);
        assert_eq!(mutated, chrom);
    }

    #[test]
    fn zero_rate_mutation_is_identity() {
        let chrom = Chromosome([2; 24]);
        let mut mutated = chrom;
        let mut rng = SimRng::new(3);
        assert_eq!(mutate(&mut mutated, &Constraints::free(), 0.0, BOUNDS, &mut rng), 0);
        assert_eq!(mutated, chrom);
    }

    #[test]
    fn full_rate_mutation_redraws_every_free_gene() {
        let mut chrom = Chromosome([0; 24]);
        let mut rng = SimRng::new(4);
        assert_eq!(mutate(&mut chrom, &Constraints::free(), 1.0, BOUNDS, &mut rng), 24);
        assert!(chrom.0.iter().all(|g| (1..=3).contains(g)));
    }

    #[test]
    fn crossover_swaps_genes_between_children() {
        let a = Chromosome([1; 24]);
        let b = Chromosome([5; 24]);
        let mut rng = SimRng::new(5);
        let (x, y) = uniform_crossover(&a, &b, &mut rng);
        for hour in 0..24 {
            assert_eq!(x.0[hour] + y.0[hour], 6);
            assert!(x.0[hour] == 1 || x.0[hour] == 5);
        }
    }

    #[test]
    fn tournament_prefers_the_better_index() {
        let mut rng = SimRng::new(6);
        for _ in 0..100 {
            let winner = tournament(8, &mut rng, |i, j| i >= j);
            assert!(winner < 8);
        }
        assert_eq!(tournament(1, &mut rng, |_, _| false), 0);
    }
}

// ── Convergence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod convergence {
    use super::*;

    #[test]
    fn converges_after_window_repeats() {
        let mut t = ConvergenceTracker::new(3);
        let a = Chromosome([1; 24]);
        let b = Chromosome([2; 24]);
        assert!(!t.observe(&a));
        assert!(!t.observe(&a));
        assert!(!t.observe(&b));
        assert_eq!(t.streak(), 1);
        assert!(!t.observe(&b));
        assert!(t.observe(&b));
        assert!(t.is_converged());
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod evaluate {
    use super::*;

    #[test]
    fn preserves_input_order() {
        let evaluator = Evaluator::new(small_line(), &config(1)).unwrap();
        let chromosomes: Vec<Chromosome> = (0..5).map(|g| Chromosome([g; 24])).collect();
        let out = evaluator.evaluate(chromosomes.clone(), &mut SimRng::new(9)).unwrap();
        let order: Vec<Chromosome> = out.iter().map(|i| i.chromosome).collect();
        assert_eq!(order, chromosomes);
    }

    #[test]
    fn more_buses_cost_more() {
        let evaluator = Evaluator::new(small_line(), &config(1)).unwrap();
        let out = evaluator
            .evaluate(vec![Chromosome([1; 24]), Chromosome([2; 24])], &mut SimRng::new(9))
            .unwrap();
        assert_eq!(out[0].objectives.buses, 24.0);
        assert_eq!(out[1].objectives.buses, 48.0);
        assert!(out[0].cost() < out[1].cost());
    }

    #[test]
    fn results_do_not_depend_on_thread_count() {
        let chromosomes: Vec<Chromosome> = (1..7).map(|g| Chromosome([g % 3; 24])).collect();
        let one = Evaluator::new(small_line(), &OptimizerConfig { num_threads: Some(1), ..config(1) })
            .unwrap()
            .evaluate(chromosomes.clone(), &mut SimRng::new(21))
            .unwrap();
        let many = Evaluator::new(small_line(), &OptimizerConfig { num_threads: Some(4), ..config(1) })
            .unwrap()
            .evaluate(chromosomes, &mut SimRng::new(21))
            .unwrap();
        assert_eq!(one, many);
    }
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod optimizer {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = OptimizerConfig { population_size: 1, ..config(1) };
        let result = GeneticOptimizer::new(cfg, small_line(), Constraints::free());
        assert!(matches!(result, Err(GeneticError::Config(_))));
    }

    #[test]
    fn population_size_is_kept() {
        for cfg in [config(4), scalar_config(4)] {
            let mut ga = GeneticOptimizer::new(cfg, small_line(), Constraints::free()).unwrap();
            assert_eq!(ga.population().len(), 6);
            for _ in 0..3 {
                ga.update_generation().unwrap();
                assert_eq!(ga.population().len(), 6);
            }
            assert_eq!(ga.generation(), 3);
        }
    }

    #[test]
    fn pinned_hours_survive_every_generation() {
        let chrom = Chromosome([0, 0, 0, 0, 0, 1, 2, 3, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0]);
        let mut ga =
            GeneticOptimizer::new(config(8), small_line(), Constraints::pinned(&chrom)).unwrap();
        let outcome = ga.run(4, &mut NoopProgress).unwrap();
        assert!(ga.population().iter().all(|i| i.chromosome == chrom));
        assert_eq!(outcome.best.chromosome, chrom);
    }

    #[test]
    fn partially_pinned_hours_stay_fixed() {
        let text = "0,0,0,0,0,x,x,x,x,x,0,0,0,0,0,0,0,0,0,0,0,0,0,0";
        let constraints: Constraints = text.parse().unwrap();
        let mut ga = GeneticOptimizer::new(config(12), small_line(), constraints).unwrap();
        ga.run(3, &mut NoopProgress).unwrap();
        assert!(ga.population().iter().all(|i| constraints.admits(&i.chromosome)));
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |cfg: OptimizerConfig| {
            let mut ga = GeneticOptimizer::new(cfg, small_line(), Constraints::free()).unwrap();
            let outcome = ga.run(3, &mut NoopProgress).unwrap();
            (outcome.best.chromosome, outcome.best.objectives, outcome.generations)
        };
        assert_eq!(run(config(17)), run(config(17)));
        assert_eq!(run(scalar_config(17)), run(scalar_config(17)));
    }

    #[test]
    fn stop_before_run_returns_immediately() {
        let mut ga = GeneticOptimizer::new(config(2), small_line(), Constraints::free()).unwrap();
        ga.stop_handle().request_stop();
        let mut seen = Generations::default();
        let outcome = ga.run(10, &mut seen).unwrap();
        assert_eq!(outcome.reason, StopReason::Stopped);
        assert_eq!(outcome.generations, 0);
        assert!(seen.0.is_empty());
    }

    #[test]
    fn stops_at_max_generations() {
        let mut ga = GeneticOptimizer::new(config(5), small_line(), Constraints::free()).unwrap();
        let mut seen = Generations::default();
        let outcome = ga.run(3, &mut seen).unwrap();
        assert_eq!(outcome.reason, StopReason::MaxGenerations);
        assert_eq!(outcome.generations, 3);
        assert_eq!(seen.0, vec![1, 2, 3]);
    }

    #[test]
    fn unchanging_best_converges() {
        let chrom = Chromosome([1; 24]);
        let cfg = OptimizerConfig { convergence_window: 2, ..config(6) };
        let mut ga = GeneticOptimizer::new(cfg, small_line(), Constraints::pinned(&chrom)).unwrap();
        let outcome = ga.run(50, &mut NoopProgress).unwrap();
        assert_eq!(outcome.reason, StopReason::Converged);
        assert_eq!(outcome.generations, 1);
    }

    #[test]
    fn pareto_front_is_mutually_non_dominated() {
        let mut ga = GeneticOptimizer::new(config(9), small_line(), Constraints::free()).unwrap();
        let outcome = ga.run(3, &mut NoopProgress).unwrap();
        let front = &outcome.pareto_front;
        assert!(!front.is_empty());
        for a in front {
            for b in front {
                assert!(!a.constraint_dominates(b));
            }
        }
        assert!(front.windows(2).all(|w| w[0].cost() <= w[1].cost()));
    }

    #[test]
    fn scalar_population_sorted_by_fitness() {
        let mut ga = GeneticOptimizer::new(scalar_config(10), small_line(), Constraints::free()).unwrap();
        ga.update_generation().unwrap();
        let pop = ga.population();
        assert!(pop.windows(2).all(|w| w[0].fitness() >= w[1].fitness()));
        assert_eq!(ga.best().fitness(), pop[0].fitness());
    }

    #[test]
    fn outcome_decodes_to_timetable() {
        let mut ga = GeneticOptimizer::new(config(14), small_line(), Constraints::free()).unwrap();
        let outcome = ga.run(1, &mut NoopProgress).unwrap();
        let timetable = outcome.timetable();
        assert_eq!(timetable.chromosome(), outcome.best.chromosome);
        assert_eq!(timetable.len() as u32, outcome.best.chromosome.total_departures());
    }
}
