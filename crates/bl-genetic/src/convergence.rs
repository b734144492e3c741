//! Early stopping on a repeated best chromosome.

use bl_line::Chromosome;

/// Reports convergence once the best chromosome has been identical for
/// `window` consecutive generations.
#[derive(Clone, Debug)]
pub struct ConvergenceTracker {
    window: usize,
    last:   Option<Chromosome>,
    streak: usize,
}

impl ConvergenceTracker {
    pub fn new(window: usize) -> Self {
        Self { window, last: None, streak: 0 }
    }

    /// Record this generation's best chromosome.  Returns `true` once
    /// converged.
    pub fn observe(&mut self, best: &Chromosome) -> bool {
        if self.last.as_ref() == Some(best) {
            self.streak += 1;
        } else {
            self.last = Some(*best);
            self.streak = 1;
        }
        self.is_converged()
    }

    pub fn is_converged(&self) -> bool {
        self.streak >= self.window
    }

    /// Consecutive generations the current best has held.
    pub fn streak(&self) -> usize {
        self.streak
    }
}
