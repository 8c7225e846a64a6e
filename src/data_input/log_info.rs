// src/data_input/log_info.rs

use chrono::{DateTime, TimeZone, Utc};
use log::{info, warn};
use std::path::Path;

use crate::constants::{DERIVED_PREFIX, GPS_TOPIC, GPS_UTC_FIELD};
use crate::data_input::log_data::{FieldValue, ParsedLog};
use crate::data_input::log_parser::LogReader;
use crate::error::{Error, Result};
use crate::table::unified::UnifiedTable;

/// Reads `topics` from the log at `path` and checks that every one of them is
/// present.
///
/// Fails with [`Error::NoTopicPresent`] if the reader found none of the
/// topics and with [`Error::MissingTopics`] (listing the absent ones in
/// request order) if only some are present. An empty `topics` list reads
/// every topic in the log.
pub fn open_log<R: LogReader + ?Sized>(reader: &R, path: &Path, topics: &[String]) -> Result<ParsedLog> {
    let log = reader.read(path, topics)?;

    if log.data_list.is_empty() {
        warn!("Not a single requested topic is present in {}", path.display());
        return Err(Error::NoTopicPresent);
    }

    let mut missing: Vec<String> = Vec::new();
    for topic in topics {
        if !log.topic_names().any(|t| t == topic) && !missing.contains(topic) {
            missing.push(topic.clone());
        }
    }
    if !missing.is_empty() {
        warn!(
            "The following topics do not exist in {}: {}",
            path.display(),
            missing.join(", ")
        );
        return Err(Error::MissingTopics(missing));
    }

    info!(
        "Opened {} with {} topic batch(es)",
        path.display(),
        log.data_list.len()
    );
    Ok(log)
}

/// `H:MM:SS` of a microsecond span, truncated to whole seconds.
fn format_hms(micros: u64) -> String {
    let total_s = micros / 1_000_000;
    let (minutes, seconds) = (total_s / 60, total_s % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Time since boot at which logging started.
pub fn start_time(log: &ParsedLog) -> String {
    format_hms(log.start_timestamp)
}

pub fn duration(log: &ParsedLog) -> String {
    format_hms(log.last_timestamp.saturating_sub(log.start_timestamp))
}

/// Wall-clock time of the flight, from the first non-zero GPS UTC timestamp.
/// None if the log has no GPS fix.
pub fn date(log: &ParsedLog) -> Option<DateTime<Utc>> {
    let gps = log.get_dataset(GPS_TOPIC)?;
    let utc_usec = gps.records.iter().find_map(|record| match record.get(GPS_UTC_FIELD) {
        Some(FieldValue::Scalar(v)) if v.is_finite() && *v > 0.0 => Some(*v as i64),
        _ => None,
    })?;
    Utc.timestamp_micros(utc_usec).single()
}

/// Initial value of a parameter, or `default` if it was not logged.
pub fn get_param(log: &ParsedLog, name: &str, default: f64) -> f64 {
    log.initial_parameters.get(name).copied().unwrap_or(default)
}

/// Name of the column written by [`add_param`].
pub fn param_column(name: &str) -> String {
    format!("{DERIVED_PREFIX}{name}")
}

/// Appends a column with the value of parameter `name` in effect at every row:
/// the initial value (0 if not logged), replaced by each logged change from its
/// timestamp on.
pub fn add_param(log: &ParsedLog, name: &str, table: &mut UnifiedTable) -> Result<()> {
    let initial = get_param(log, name, 0.0);
    let changes: Vec<(u64, f64)> = log
        .changed_parameters
        .iter()
        .filter(|c| c.name == name)
        .map(|c| (c.timestamp, c.value))
        .collect();

    let mut next = 0;
    let mut current = initial;
    let mut values = Vec::with_capacity(table.len());
    for &t in table.timestamps() {
        while next < changes.len() && changes[next].0 <= t {
            current = changes[next].1;
            next += 1;
        }
        values.push(Some(current));
    }

    table.append_column(&param_column(name), values)
}


// src/data_input/log_info.rs
