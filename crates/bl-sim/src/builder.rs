//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use bl_core::{HOURS_PER_DAY, Minute, StopId};
use bl_line::{BusStopSpec, MAX_RATE_PER_HOUR, MAX_TRAVEL_MINUTES};

use crate::{SimConfig, SimError, SimResult, Simulation, VehicleConfig};

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                       |
/// |-------------------|-------------------------------|
/// | `.vehicle(v)`     | capacity 80, 30 seats         |
/// | `.window(s, e)`   | 00:00 – 24:00                 |
/// | `.seed(n)`        | OS entropy                    |
///
/// # Example
///
/// ```rust,ignore
/// let stops = bl_line::load_bus_stops(path)?;
/// let sim = SimBuilder::new(stops)
///     .vehicle(VehicleConfig { capacity: 80, seats: 30 })
///     .seed(42)
///     .build()?;
/// let stats = sim.run(&timetable, &mut sim.config().make_rng())?;
/// ```
pub struct SimBuilder {
    stops:   Vec<BusStopSpec>,
    vehicle: VehicleConfig,
    config:  SimConfig,
}

impl SimBuilder {
    pub fn new(stops: Vec<BusStopSpec>) -> Self {
        Self { stops, vehicle: VehicleConfig::default(), config: SimConfig::default() }
    }

    pub fn vehicle(mut self, vehicle: VehicleConfig) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Operating window.  Visits outside `start..=end` are not executed.
    pub fn window(mut self, start: Minute, end: Minute) -> Self {
        self.config.start = start;
        self.config.end = end;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Validate the configuration and return a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation> {
        let VehicleConfig { capacity, seats } = self.vehicle;
        if capacity == 0 {
            return Err(SimError::Config("vehicle capacity must be positive".into()));
        }
        if seats > capacity {
            return Err(SimError::Config(format!(
                "vehicle has {seats} seats but capacity is only {capacity}"
            )));
        }
        if self.stops.is_empty() {
            return Err(SimError::Config("the line has no bus stops".into()));
        }
        if StopId::try_from(self.stops.len()).is_err() {
            return Err(SimError::Config(format!("too many bus stops ({})", self.stops.len())));
        }
        for stop in &self.stops {
            if stop.travel_minutes > MAX_TRAVEL_MINUTES {
                return Err(SimError::Config(format!(
                    "stop {} is {} min from the first stop, more than {MAX_TRAVEL_MINUTES}",
                    stop.name, stop.travel_minutes
                )));
            }
            let rates_ok = (0..HOURS_PER_DAY)
                .map(|h| stop.arrival_rates.per_hour(h))
                .all(|r| (0.0..=MAX_RATE_PER_HOUR).contains(&r));
            if !rates_ok {
                return Err(SimError::Config(format!(
                    "stop {} has an arrival rate outside 0 to {MAX_RATE_PER_HOUR} per hour",
                    stop.name
                )));
            }
        }
        if self.config.start >= self.config.end {
            return Err(SimError::Config(format!(
                "operating window {} – {} is empty",
                self.config.start, self.config.end
            )));
        }

        Ok(Simulation {
            stops:   Arc::from(self.stops),
            vehicle: self.vehicle,
            config:  self.config,
        })
    }
}
