//! Departure timetable and its compact per-hour encoding.
//!
//! # Chromosome encoding
//!
//! The optimizer does not search over individual departure minutes.  It
//! searches over a [`Chromosome`]: 24 integers giving the number of
//! departures in each hour of the day.
//!
//! ```text
//! TimeTable                       Chromosome
//! 07:00,15,30,45      ──────►     [.., 7 => 4, ..]
//! 07:00,15,30,45      ◄──────     [.., 7 => 4, ..]   (even split)
//! 07:05,10,40,41      ──────►     [.., 7 => 4, ..]
//! ```
//!
//! Decoding spreads an hour's departures evenly (`j * 60 / n`), so the round
//! trip keeps per-hour counts exactly but not minute placement.  This loss is
//! intentional: the search space is departures per hour, not exact minutes.

use std::fmt;

use bl_core::{HOURS_PER_DAY, Minute};

use crate::{LineError, LineResult};

/// One departure per minute: the most an hour can hold without repeating a
/// minute.
pub const MAX_DEPARTURES_PER_HOUR: u32 = 60;

// ── Chromosome ────────────────────────────────────────────────────────────────

/// Departures per hour for each of the 24 hours of the day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome(pub [u32; HOURS_PER_DAY]);

impl Chromosome {
    /// Total departures over the day.
    pub fn total_departures(&self) -> u32 {
        self.0.iter().sum()
    }

    #[inline]
    pub fn genes(&self) -> &[u32; HOURS_PER_DAY] {
        &self.0
    }

    #[inline]
    pub fn genes_mut(&mut self) -> &mut [u32; HOURS_PER_DAY] {
        &mut self.0
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, g) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{g}")?;
        }
        write!(f, "]")
    }
}

// ── TimeTableRow ──────────────────────────────────────────────────────────────

/// All departures within one hour of the day.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeTableRow {
    pub hour: u8,
    /// Minutes within the hour, ascending, each in `0..60`.
    pub minutes: Vec<u8>,
}

// ── TimeTable ─────────────────────────────────────────────────────────────────

/// Ordered collection of hourly departure rows.
///
/// Invariants: rows are sorted by hour with at most one row per hour, and
/// every row's minutes are sorted and within `0..60`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeTable {
    rows: Vec<TimeTableRow>,
}

impl TimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add departures for `hour`.  A second row for the same hour is merged
    /// into the first.
    pub fn add_row(&mut self, hour: u32, minutes: &[u32]) -> LineResult<()> {
        if hour as usize >= HOURS_PER_DAY {
            return Err(LineError::InvalidRow { hour, reason: "hour must be within 0..=23".into() });
        }
        if let Some(&bad) = minutes.iter().find(|&&m| m >= 60) {
            return Err(LineError::InvalidRow {
                hour,
                reason: format!("minute {bad} must be within 0..=59"),
            });
        }
        if minutes.is_empty() {
            return Ok(());
        }

        let hour = hour as u8;
        let pos = match self.rows.binary_search_by_key(&hour, |r| r.hour) {
            Ok(i) => i,
            Err(i) => {
                self.rows.insert(i, TimeTableRow { hour, minutes: Vec::new() });
                i
            }
        };
        let row = &mut self.rows[pos];
        row.minutes.extend(minutes.iter().map(|&m| m as u8));
        row.minutes.sort_unstable();
        Ok(())
    }

    pub fn rows(&self) -> &[TimeTableRow] {
        &self.rows
    }

    /// Every departure instant, ascending.
    pub fn departures(&self) -> Vec<Minute> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.minutes
                    .iter()
                    .map(move |&m| Minute::hm(u32::from(row.hour), u32::from(m)))
            })
            .collect()
    }

    /// Number of departures over the day.
    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.minutes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-hour departure counts.
    pub fn chromosome(&self) -> Chromosome {
        let mut genes = [0u32; HOURS_PER_DAY];
        for row in &self.rows {
            genes[row.hour as usize] = row.minutes.len() as u32;
        }
        Chromosome(genes)
    }

    /// Decode a chromosome, spreading each hour's departures evenly across
    /// the hour.  More than [`MAX_DEPARTURES_PER_HOUR`] departures in one hour
    /// produce repeated minutes; the count is still preserved.
    pub fn from_chromosome(chromosome: &Chromosome) -> Self {
        let rows = chromosome
            .0
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(hour, &n)| {
                let n = u64::from(n);
                TimeTableRow {
                    hour:    hour as u8,
                    minutes: (0..n).map(|j| (j * 60 / n) as u8).collect(),
                }
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for TimeTable {
    /// Formats in the timetable file syntax (`HH:MM,MM,...`), one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "{:02}:", row.hour)?;
            for (i, m) in row.minutes.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{m:02}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
