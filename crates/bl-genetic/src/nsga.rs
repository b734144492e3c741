//! NSGA-II building blocks: fast non-dominated sort and crowding distance.
//!
//! Both work on index lists into a population slice so callers can keep
//! individuals in place and decide afterwards which ones survive.

use crate::Individual;

/// Partition `population` into Pareto fronts under
/// [`Individual::constraint_dominates`] and store each individual's front
/// index in `rank`.
///
/// Returns the fronts as index lists, best first.  Every index appears in
/// exactly one front.
pub fn non_dominated_sort(population: &mut [Individual]) -> Vec<Vec<usize>> {
    let n = population.len();
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dominated_count = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = vec![Vec::new()];

    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if population[p].constraint_dominates(&population[q]) {
                dominates[p].push(q);
            } else if population[q].constraint_dominates(&population[p]) {
                dominated_count[p] += 1;
            }
        }
        if dominated_count[p] == 0 {
            population[p].rank = 0;
            fronts[0].push(p);
        }
    }

    let mut i = 0;
    while !fronts[i].is_empty() {
        let mut next = Vec::new();
        for &p in &fronts[i] {
            for &q in &dominates[p] {
                dominated_count[q] -= 1;
                if dominated_count[q] == 0 {
                    population[q].rank = i + 1;
                    next.push(q);
                }
            }
        }
        i += 1;
        fronts.push(next);
    }
    fronts.pop();
    fronts
}

/// Assign crowding distance to every member of `front`.
///
/// For each objective the front is sorted by that objective; the two
/// boundary individuals get infinite distance and every interior one adds
/// the normalised gap between its neighbours.  An objective with zero
/// spread adds nothing.
pub fn assign_crowding_distance(population: &mut [Individual], front: &[usize]) {
    for &i in front {
        population[i].crowding = 0.0;
    }
    let len = front.len();
    if len == 0 {
        return;
    }

    let objectives: [fn(&Individual) -> f64; 2] = [Individual::cost, Individual::satisfaction];
    let mut order = front.to_vec();
    for objective in objectives {
        order.sort_by(|&a, &b| objective(&population[a]).total_cmp(&objective(&population[b])));

        let first = order[0];
        let last = order[len - 1];
        population[first].crowding = f64::INFINITY;
        population[last].crowding = f64::INFINITY;

        let range = objective(&population[last]) - objective(&population[first]);
        if range <= 0.0 {
            continue;
        }
        for k in 1..len.saturating_sub(1) {
            let gap = objective(&population[order[k + 1]]) - objective(&population[order[k - 1]]);
            population[order[k]].crowding += gap / range;
        }
    }
}

/// Sort and assign crowding to every front.  Returns the fronts.
pub fn rank_population(population: &mut [Individual]) -> Vec<Vec<usize>> {
    let fronts = non_dominated_sort(population);
    for front in &fronts {
        assign_crowding_distance(population, front);
    }
    fronts
}
