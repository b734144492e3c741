//! Fixed 24-bucket per-hour series.

use bl_core::HOURS_PER_DAY;

/// One value per hour of the day.
///
/// Every hour always has a bucket, so series from different runs line up
/// index for index; an hour with no activity simply holds zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourlySeries([f64; HOURS_PER_DAY]);

impl HourlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the bucket for `hour`.  Hours past 23 wrap.
    #[inline]
    pub fn add(&mut self, hour: usize, value: f64) {
        self.0[hour % HOURS_PER_DAY] += value;
    }

    #[inline]
    pub fn get(&self, hour: usize) -> f64 {
        self.0.get(hour).copied().unwrap_or(0.0)
    }

    /// Sum over all hours.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// `(hour, value)` pairs for hours with a non-zero value.
    pub fn active_hours(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate().filter(|&(_, v)| v != 0.0)
    }

    /// Add every bucket of `other` into `self`.
    pub fn merge(&mut self, other: &HourlySeries) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b;
        }
    }

    /// Multiply every bucket by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in self.0.iter_mut() {
            *v *= factor;
        }
    }

    /// Pointwise mean of `series`.  Empty input gives an all-zero series.
    pub fn mean<'a, I>(series: I) -> HourlySeries
    where
        I: IntoIterator<Item = &'a HourlySeries>,
    {
        let mut acc = HourlySeries::new();
        let mut n = 0usize;
        for s in series {
            acc.merge(s);
            n += 1;
        }
        if n > 0 {
            for v in acc.0.iter_mut() {
                *v /= n as f64;
            }
        }
        acc
    }
}
