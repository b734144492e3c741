//! Per-hour constraints on the departure counts the optimizer may choose.
//!
//! Text form is 24 comma-separated entries, one per hour.  An integer pins
//! that hour, up to [`MAX_DEPARTURES_PER_HOUR`]; `x` leaves it to the
//! optimizer:
//!
//! ```text
//! 0,0,0,0,0,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x,x,2,1,0
//! ```

use std::fmt;
use std::str::FromStr;

use bl_core::HOURS_PER_DAY;
use bl_line::{Chromosome, MAX_DEPARTURES_PER_HOUR};

use crate::GeneticError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HourConstraint {
    /// Chosen and mutated by the optimizer.
    #[default]
    Free,
    /// Pinned to exactly this many departures; never mutated.
    Fixed(u32),
}

/// One [`HourConstraint`] per hour of the day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraints([HourConstraint; HOURS_PER_DAY]);

impl Constraints {
    /// Every hour free.
    pub fn free() -> Self {
        Self::default()
    }

    /// Every hour pinned to the matching gene of `chromosome`.
    pub fn pinned(chromosome: &Chromosome) -> Self {
        Self(chromosome.0.map(HourConstraint::Fixed))
    }

    pub fn new(hours: [HourConstraint; HOURS_PER_DAY]) -> Self {
        Self(hours)
    }

    #[inline]
    pub fn get(&self, hour: usize) -> HourConstraint {
        self.0[hour]
    }

    #[inline]
    pub fn is_free(&self, hour: usize) -> bool {
        self.0[hour] == HourConstraint::Free
    }

    pub fn set(&mut self, hour: usize, constraint: HourConstraint) {
        self.0[hour] = constraint;
    }

    /// Number of hours the optimizer may change.
    pub fn free_hours(&self) -> usize {
        self.0.iter().filter(|c| **c == HourConstraint::Free).count()
    }

    /// Overwrite every pinned gene of `chromosome` with its fixed value.
    pub fn apply(&self, chromosome: &mut Chromosome) {
        for (gene, constraint) in chromosome.genes_mut().iter_mut().zip(self.0.iter()) {
            if let HourConstraint::Fixed(v) = *constraint {
                *gene = v;
            }
        }
    }

    /// `true` if every pinned gene of `chromosome` holds its fixed value.
    pub fn admits(&self, chromosome: &Chromosome) -> bool {
        chromosome.genes().iter().zip(self.0.iter()).all(|(&gene, c)| match *c {
            HourConstraint::Free => true,
            HourConstraint::Fixed(v) => gene == v,
        })
    }
}

impl FromStr for Constraints {
    type Err = GeneticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries: Vec<&str> = s.split(',').map(str::trim).collect();
        if entries.len() != HOURS_PER_DAY {
            return Err(GeneticError::Constraints(format!(
                "expected {HOURS_PER_DAY} comma-separated entries, found {}",
                entries.len()
            )));
        }

        let mut hours = [HourConstraint::Free; HOURS_PER_DAY];
        for (hour, entry) in entries.iter().enumerate() {
            hours[hour] = if entry.eq_ignore_ascii_case("x") {
                HourConstraint::Free
            } else {
                let v: u32 = entry.parse().map_err(|_| {
                    GeneticError::Constraints(format!(
                        "hour {hour}: {entry:?} is neither a departure count nor 'x'"
                    ))
                })?;
                if v > MAX_DEPARTURES_PER_HOUR {
                    return Err(GeneticError::Constraints(format!(
                        "hour {hour}: {v} departures exceed {MAX_DEPARTURES_PER_HOUR}"
                    )));
                }
                HourConstraint::Fixed(v)
            };
        }
        Ok(Self(hours))
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match c {
                HourConstraint::Free => write!(f, "x")?,
                HourConstraint::Fixed(v) => write!(f, "{v}")?,
            }
        }
        Ok(())
    }
}
