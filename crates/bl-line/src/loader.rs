//! Text loaders for the bus-stop and timetable definition files.
//!
//! Both formats are line oriented with `:` separated fields.  Blank lines and
//! lines starting with `#` are skipped; every other line must parse or the
//! whole load fails with the offending line number.
//!
//! # Bus-stop file
//!
//! ```text
//! # name:minutes_from_start:[(hour,passengers_per_hour),...]:alighting_fraction
//! Arbesova:3:[(5,60),(6,90),(7,90)]:0.1
//! ```
//!
//! # Timetable file
//!
//! ```text
//! # hour:minute,minute,...
//! 07:00,15,30,45
//! 08:
//! ```
//!
//! An hour with no line, or with an empty minutes field, has no departures.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::stop::{BusStopSpec, HourlyRates};
use crate::timetable::TimeTable;
use crate::{LineError, LineResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a bus-stop definition from a string.
pub fn parse_bus_stops(text: &str) -> LineResult<Vec<BusStopSpec>> {
    read_bus_stops(text.as_bytes())
}

/// Load a bus-stop definition file.
pub fn load_bus_stops(path: &Path) -> LineResult<Vec<BusStopSpec>> {
    let file = std::fs::File::open(path)?;
    read_bus_stops(file)
}

/// Like [`load_bus_stops`] but accepts any `Read` source.
pub fn read_bus_stops<R: Read>(reader: R) -> LineResult<Vec<BusStopSpec>> {
    let mut stops: Vec<BusStopSpec> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();

    for (line, record) in records(reader) {
        let record = record?;
        if record.len() != 4 {
            return Err(parse_err(
                line,
                format!(
                    "expected 4 fields name:minutes:[(hour,rate),...]:fraction, found {}",
                    record.len()
                ),
            ));
        }

        let name = &record[0];
        let travel_minutes: u32 = record[1]
            .parse()
            .map_err(|_| parse_err(line, format!("invalid travel time {:?}", &record[1])))?;
        let rates = parse_rates(&record[2]).map_err(|msg| parse_err(line, msg))?;
        let fraction: f64 = record[3]
            .parse()
            .map_err(|_| parse_err(line, format!("invalid alighting fraction {:?}", &record[3])))?;

        let stop = BusStopSpec::new(name, travel_minutes, rates, fraction)?;
        if !names.insert(stop.name.clone()) {
            return Err(LineError::DuplicateStop(stop.name));
        }
        stops.push(stop);
    }

    Ok(stops)
}

/// Parse a timetable definition from a string.
pub fn parse_time_table(text: &str) -> LineResult<TimeTable> {
    read_time_table(text.as_bytes())
}

/// Load a timetable definition file.
pub fn load_time_table(path: &Path) -> LineResult<TimeTable> {
    let file = std::fs::File::open(path)?;
    read_time_table(file)
}

/// Like [`load_time_table`] but accepts any `Read` source.
pub fn read_time_table<R: Read>(reader: R) -> LineResult<TimeTable> {
    let mut table = TimeTable::new();

    for (line, record) in records(reader) {
        let record = record?;
        if record.len() != 2 {
            return Err(parse_err(
                line,
                format!("expected hour:minute,minute,..., found {} fields", record.len()),
            ));
        }

        let hour: u32 = record[0]
            .parse()
            .map_err(|_| parse_err(line, format!("invalid hour {:?}", &record[0])))?;
        let minutes = if record[1].is_empty() {
            Vec::new()
        } else {
            record[1]
                .split(',')
                .map(|m| {
                    m.trim()
                        .parse::<u32>()
                        .map_err(|_| parse_err(line, format!("invalid minute {:?}", m.trim())))
                })
                .collect::<LineResult<Vec<u32>>>()?
        };

        table.add_row(hour, &minutes)?;
    }

    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Iterate non-blank, non-comment records paired with their 1-based line
/// number.
fn records<R: Read>(reader: R) -> impl Iterator<Item = (u64, LineResult<StringRecord>)> {
    let csv_reader = ReaderBuilder::new()
        .delimiter(b':')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    csv_reader.into_records().filter_map(|result| match result {
        Ok(record) => {
            let line = record.position().map_or(0, |p| p.line());
            // Whitespace-only lines survive the CSV layer as one empty field;
            // indented comments survive as a field starting with '#'.
            let first = record.get(0).unwrap_or("");
            let blank = record.len() == 1 && first.is_empty();
            if blank || first.starts_with('#') {
                None
            } else {
                Some((line, Ok(record)))
            }
        }
        Err(e) => {
            let line = e.position().map_or(0, |p| p.line());
            Some((line, Err(LineError::Csv(e))))
        }
    })
}

fn parse_err(line: u64, message: String) -> LineError {
    LineError::Parse { line, message }
}

/// Parse `[(hour,rate),(hour,rate),...]`.  Whitespace and a trailing comma
/// are tolerated; an empty list means the stop never has arrivals.
fn parse_rates(field: &str) -> Result<HourlyRates, String> {
    let compact: String = field.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("rate table {field:?} must be enclosed in [ ]"))?;

    let mut pairs = Vec::new();
    let mut rest = inner;
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| format!("expected '(' in rate table {field:?}"))?;
        let (tuple, tail) = body
            .split_once(')')
            .ok_or_else(|| format!("unclosed '(' in rate table {field:?}"))?;
        let (hour, rate) = tuple
            .split_once(',')
            .ok_or_else(|| format!("rate entry ({tuple}) must be (hour,rate)"))?;
        let hour: u32 = hour.parse().map_err(|_| format!("invalid hour {hour:?} in rate table"))?;
        let rate: f64 = rate.parse().map_err(|_| format!("invalid rate {rate:?} in rate table"))?;
        pairs.push((hour, rate));

        rest = match tail.strip_prefix(',') {
            Some(next) => next,
            None if tail.is_empty() => tail,
            None => return Err(format!("expected ',' between rate entries in {field:?}")),
        };
    }

    HourlyRates::from_pairs(pairs)
}
