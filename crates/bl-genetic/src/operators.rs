//! Variation and selection operators.

use bl_core::{HOURS_PER_DAY, SimRng};
use bl_line::Chromosome;

use crate::Constraints;

/// Departure count drawn for a free hour, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneBounds {
    pub min: u32,
    pub max: u32,
}

impl GeneBounds {
    #[inline]
    pub fn sample(self, rng: &mut SimRng) -> u32 {
        rng.integers(self.min, self.max.saturating_add(1))
    }
}

/// A fresh chromosome: free hours drawn from `bounds`, pinned hours fixed.
pub fn random_chromosome(constraints: &Constraints, bounds: GeneBounds, rng: &mut SimRng) -> Chromosome {
    let mut genes = [0u32; HOURS_PER_DAY];
    for (hour, gene) in genes.iter_mut().enumerate() {
        if constraints.is_free(hour) {
            *gene = bounds.sample(rng);
        }
    }
    let mut chromosome = Chromosome(genes);
    constraints.apply(&mut chromosome);
    chromosome
}

/// Re-draw each free gene with probability `rate`.  Pinned genes are never
/// touched.  Returns how many genes were re-drawn.
pub fn mutate(
    chromosome:  &mut Chromosome,
    constraints: &Constraints,
    rate:        f64,
    bounds:      GeneBounds,
    rng:         &mut SimRng,
) -> usize {
    let mut mutated = 0;
    for (hour, gene) in chromosome.genes_mut().iter_mut().enumerate() {
        if constraints.is_free(hour) && rng.uniform() < rate {
            *gene = bounds.sample(rng);
            mutated += 1;
        }
    }
    mutated
}

/// Uniform crossover.  Each gene goes to the first child from `a` or `b`
/// with equal probability and the second child gets the other parent's
/// gene.
pub fn uniform_crossover(a: &Chromosome, b: &Chromosome, rng: &mut SimRng) -> (Chromosome, Chromosome) {
    let mut first = *a;
    let mut second = *b;
    for hour in 0..HOURS_PER_DAY {
        if rng.uniform() >= 0.5 {
            first.0[hour] = b.0[hour];
            second.0[hour] = a.0[hour];
        }
    }
    (first, second)
}

/// Binary tournament over `0..len`: draw two indices uniformly and keep the
/// first if `better(first, second)`, otherwise the second.
///
/// # Panics
/// Panics if `len == 0`.
pub fn tournament<F>(len: usize, rng: &mut SimRng, better: F) -> usize
where
    F: Fn(usize, usize) -> bool,
{
    let first = rng.index(len);
    let second = rng.index(len);
    if better(first, second) { first } else { second }
}
