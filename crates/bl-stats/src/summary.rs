//! Run-level results and multi-run averaging.

use std::fmt;

use tracing::debug;

use crate::{BusStatistics, BusStopStatistics};

/// Name given to the all-stops aggregate.
const ALL_STOPS: &str = "All stops";

// ── FleetStatistics ──────────────────────────────────────────────────────────

/// Figures aggregated over every bus in a run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetStatistics {
    /// Buses dispatched.  Fractional after averaging.
    pub total_buses: f64,

    pub passengers_transported: f64,

    /// Mean load over every stop visit of every bus.
    pub average_load: f64,

    /// `average_load` relative to vehicle capacity, in percent.
    pub average_load_percent: f64,

    /// Mean load when leaving each stop, in route order.
    pub load_per_stop: Vec<f64>,

    /// Mean of every satisfaction score recorded; `0.0` if none were.
    pub average_passenger_satisfaction: f64,
}

impl FleetStatistics {
    /// Aggregate one run's buses over a route of `stop_count` stops.
    pub fn from_buses(capacity: u32, stop_count: usize, buses: &[BusStatistics]) -> Self {
        let mut visits = 0usize;
        let mut load_sum = 0.0;
        let mut per_stop_sum = vec![0.0; stop_count];
        let mut per_stop_visits = vec![0usize; stop_count];
        let mut satisfaction_sum = 0.0;
        let mut satisfaction_count = 0usize;
        let mut transported = 0.0;

        for bus in buses {
            transported += f64::from(bus.passengers_transported);
            for visit in &bus.load_per_stop {
                let load = f64::from(visit.load);
                visits += 1;
                load_sum += load;
                if let Some(slot) = per_stop_sum.get_mut(visit.stop.index()) {
                    *slot += load;
                    per_stop_visits[visit.stop.index()] += 1;
                }
            }
            satisfaction_sum += bus.satisfactions.iter().sum::<f64>();
            satisfaction_count += bus.satisfactions.len();
        }

        let average_load = if visits == 0 { 0.0 } else { load_sum / visits as f64 };
        let average_load_percent =
            if capacity == 0 { 0.0 } else { average_load / f64::from(capacity) * 100.0 };
        let load_per_stop = per_stop_sum
            .iter()
            .zip(&per_stop_visits)
            .map(|(&sum, &n)| if n == 0 { 0.0 } else { sum / n as f64 })
            .collect();
        let average_passenger_satisfaction = if satisfaction_count == 0 {
            debug!("no satisfaction scores recorded; average reported as 0");
            0.0
        } else {
            satisfaction_sum / satisfaction_count as f64
        };

        Self {
            total_buses: buses.len() as f64,
            passengers_transported: transported,
            average_load,
            average_load_percent,
            load_per_stop,
            average_passenger_satisfaction,
        }
    }
}

// ── Statistics ───────────────────────────────────────────────────────────────

/// Result of one simulation run, or the average of several.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Every stop merged into one set of per-hour series.
    pub stops: BusStopStatistics,

    /// Per-stop series in route order.
    pub per_stop: Vec<BusStopStatistics>,

    pub fleet: FleetStatistics,
}

impl Statistics {
    /// Collect a finished run's entity statistics.
    pub fn from_run(
        capacity: u32,
        per_stop: Vec<BusStopStatistics>,
        buses: &[BusStatistics],
    ) -> Self {
        let mut stops = BusStopStatistics::new(ALL_STOPS);
        for stop in &per_stop {
            stops.merge(stop);
        }
        let fleet = FleetStatistics::from_buses(capacity, per_stop.len(), buses);
        Self { stops, per_stop, fleet }
    }

    #[inline]
    pub fn total_buses(&self) -> f64 {
        self.fleet.total_buses
    }

    pub fn total_passengers_arrived(&self) -> f64 {
        self.stops.total_passengers_arrived()
    }

    pub fn total_passengers_left_unboarded(&self) -> f64 {
        self.stops.total_passengers_left_unboarded()
    }

    pub fn total_passengers_transported(&self) -> f64 {
        self.fleet.passengers_transported
    }

    #[inline]
    pub fn average_passenger_satisfaction(&self) -> f64 {
        self.fleet.average_passenger_satisfaction
    }

    /// Mean minutes waited per arrived passenger over all stops.
    pub fn average_wait_time(&self) -> f64 {
        self.stops.average_wait_time()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "buses dispatched        {:>10.1}", self.fleet.total_buses)?;
        writeln!(f, "passengers arrived      {:>10.1}", self.total_passengers_arrived())?;
        writeln!(f, "passengers transported  {:>10.1}", self.fleet.passengers_transported)?;
        writeln!(f, "passengers alighted     {:>10.1}", self.stops.total_passengers_departed())?;
        writeln!(f, "left unboarded          {:>10.1}", self.total_passengers_left_unboarded())?;
        writeln!(f, "average wait (min)      {:>10.2}", self.average_wait_time())?;
        writeln!(f, "average load            {:>10.2}", self.fleet.average_load)?;
        writeln!(f, "average load (%)        {:>10.2}", self.fleet.average_load_percent)?;
        writeln!(
            f,
            "average satisfaction    {:>10.3}",
            self.fleet.average_passenger_satisfaction
        )?;
        for (stop, load) in self.per_stop.iter().zip(&self.fleet.load_per_stop) {
            writeln!(
                f,
                "  {:<20} arrived {:>8.1}  unboarded {:>8.1}  load {:>6.1}",
                stop.name,
                stop.total_passengers_arrived(),
                stop.total_passengers_left_unboarded(),
                load
            )?;
        }
        Ok(())
    }
}

// ── Averaging ────────────────────────────────────────────────────────────────

/// Pointwise average of several runs.
///
/// Stops are matched by name.  A stop or an hour missing from some run
/// counts as zero for that run, so every average is taken over all
/// `runs.len()` runs.  Returns `None` for an empty slice.
pub fn average_statistics(runs: &[Statistics]) -> Option<Statistics> {
    let first = runs.first()?;
    if runs.len() == 1 {
        return Some(first.clone());
    }
    let factor = 1.0 / runs.len() as f64;

    // Stop order: first run's route order, then any name first seen later.
    let mut per_stop: Vec<BusStopStatistics> = Vec::new();
    for run in runs {
        for stop in &run.per_stop {
            match per_stop.iter_mut().find(|s| s.name == stop.name) {
                Some(acc) => acc.merge(stop),
                None => per_stop.push(stop.clone()),
            }
        }
    }
    for stop in &mut per_stop {
        stop.scale(factor);
    }

    let mut stops = BusStopStatistics::new(first.stops.name.clone());
    for run in runs {
        stops.merge(&run.stops);
    }
    stops.scale(factor);

    let width = runs.iter().map(|r| r.fleet.load_per_stop.len()).max().unwrap_or(0);
    let mut load_per_stop = vec![0.0; width];
    for run in runs {
        for (acc, load) in load_per_stop.iter_mut().zip(&run.fleet.load_per_stop) {
            *acc += load;
        }
    }
    load_per_stop.iter_mut().for_each(|l| *l *= factor);

    let mean = |f: fn(&FleetStatistics) -> f64| runs.iter().map(|r| f(&r.fleet)).sum::<f64>() * factor;
    let fleet = FleetStatistics {
        total_buses: mean(|f| f.total_buses),
        passengers_transported: mean(|f| f.passengers_transported),
        average_load: mean(|f| f.average_load),
        average_load_percent: mean(|f| f.average_load_percent),
        load_per_stop,
        average_passenger_satisfaction: mean(|f| f.average_passenger_satisfaction),
    };

    Some(Statistics { stops, per_stop, fleet })
}
