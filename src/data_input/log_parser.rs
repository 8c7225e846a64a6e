// src/data_input/log_parser.rs

use csv::ReaderBuilder;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CHANGED_PARAMS_FILE_SUFFIX, CSV_EXTENSION, PARAMS_FILE_SUFFIX, TIMESTAMP_COLUMN,
    ULOG_EXTENSION,
};
use crate::data_input::log_data::{ChangedParam, FieldValue, ParsedLog, RawTopicBatch, Record};
use crate::error::{Error, Result};

/// Boundary to the log parser. Implementations turn a log file into decoded
/// topic batches, restricted to `topics` (all topics if `topics` is empty).
pub trait LogReader {
    fn read(&self, path: &Path, topics: &[String]) -> Result<ParsedLog>;
}

/// Reads the per-topic CSV export written by `ulog2csv` next to the log:
///
/// * `<stem>_<topic>_<instance>.csv` with a `timestamp` column and one column per field,
/// * optional `<stem>_params.csv` with `name,value` rows,
/// * optional `<stem>_changed_params.csv` with `timestamp,name,value` rows.
#[derive(Debug, Clone, Default)]
pub struct CsvLogReader;

impl CsvLogReader {
    pub fn new() -> Self {
        Self
    }
}

impl LogReader for CsvLogReader {
    fn read(&self, path: &Path, topics: &[String]) -> Result<ParsedLog> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let topic_files = find_topic_files(&dir, &stem, topics)?;
        info!("Found {} topic file(s) for '{}'", topic_files.len(), stem);

        let mut log = ParsedLog::default();
        for (topic, instance, file) in topic_files {
            let batch = read_topic_file(&file, &topic, instance)?;
            debug!(
                "  {} (instance {}): {} records",
                batch.topic,
                batch.instance,
                batch.records.len()
            );
            log.data_list.push(batch);
        }

        let (start, last) = log
            .data_list
            .iter()
            .flat_map(|batch| batch.records.iter().map(|r| r.timestamp))
            .fold((u64::MAX, 0u64), |(lo, hi), t| (lo.min(t), hi.max(t)));
        if start <= last {
            log.start_timestamp = start;
            log.last_timestamp = last;
        }

        let params_file = dir.join(format!("{stem}_{PARAMS_FILE_SUFFIX}.{CSV_EXTENSION}"));
        if params_file.is_file() {
            log.initial_parameters = read_params_file(&params_file)?;
            debug!("Read {} initial parameters", log.initial_parameters.len());
        }

        let changed_file =
            dir.join(format!("{stem}_{CHANGED_PARAMS_FILE_SUFFIX}.{CSV_EXTENSION}"));
        if changed_file.is_file() {
            log.changed_parameters = read_changed_params_file(&changed_file)?;
            debug!("Read {} parameter changes", log.changed_parameters.len());
        }

        Ok(log)
    }
}

/// Lists `(topic, instance, path)` for every export file belonging to `stem`.
/// The instance suffix must be all digits, so `vehicle_local_position` never
/// matches `vehicle_local_position_setpoint_0.csv`.
///
/// Files of another log in the same directory whose stem extends this one
/// (`flight_2.ulg` next to `flight.ulg`) are skipped. An export whose log
/// file is not in the directory cannot be told apart, so such exports need
/// a directory of their own.
fn find_topic_files(
    dir: &Path,
    stem: &str,
    topics: &[String],
) -> Result<Vec<(String, u32, PathBuf)>> {
    let prefix = format!("{stem}_");
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        paths.push(entry?.path());
    }

    let sibling_prefixes: Vec<String> = paths
        .iter()
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(ULOG_EXTENSION))
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()))
        .filter(|other| other.starts_with(&prefix))
        .map(|other| format!("{other}_"))
        .collect();

    let mut found = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some(CSV_EXTENSION) {
            continue;
        }
        let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if sibling_prefixes.iter().any(|p| file_stem.starts_with(p.as_str())) {
            debug!("Skipping '{}', it belongs to another log", file_stem);
            continue;
        }
        let Some(rest) = file_stem.strip_prefix(&prefix) else {
            continue;
        };
        let Some((topic, instance)) = split_topic_instance(rest) else {
            continue;
        };

        let wanted = if topics.is_empty() {
            true
        } else {
            topics.iter().any(|t| t == topic)
        };
        if wanted {
            found.push((topic.to_string(), instance, path.clone()));
        }
    }

    found.sort();
    Ok(found)
}

/// `vehicle_status_0` -> `("vehicle_status", 0)`.
fn split_topic_instance(name: &str) -> Option<(&str, u32)> {
    let (topic, instance) = name.rsplit_once('_')?;
    if topic.is_empty() || instance.is_empty() || !instance.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((topic, instance.parse().ok()?))
}

fn parse_cell(path: &Path, field: &str, raw: &str) -> Result<f64> {
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| Error::InvalidValue {
        path: path.to_path_buf(),
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn read_topic_file(path: &Path, topic: &str, instance: u32) -> Result<RawTopicBatch> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let timestamp_idx = headers
        .iter()
        .position(|h| h == TIMESTAMP_COLUMN)
        .ok_or_else(|| Error::ColumnNotFound(format!("{} in {}", TIMESTAMP_COLUMN, path.display())))?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let raw_ts = row.get(timestamp_idx).unwrap_or("");
        let timestamp = raw_ts.parse::<u64>().map_err(|_| Error::InvalidValue {
            path: path.to_path_buf(),
            field: TIMESTAMP_COLUMN.to_string(),
            value: raw_ts.to_string(),
        })?;

        let mut record = Record::new(timestamp);
        for (idx, name) in headers.iter().enumerate() {
            if idx == timestamp_idx {
                continue;
            }
            let value = parse_cell(path, name, row.get(idx).unwrap_or(""))?;
            record.fields.push((name.to_string(), FieldValue::Scalar(value)));
        }
        records.push(record);
    }

    Ok(RawTopicBatch::new(topic, instance, records))
}

fn read_params_file(path: &Path) -> Result<BTreeMap<String, f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut params = BTreeMap::new();
    for result in reader.records() {
        let row = result?;
        let (Some(name), Some(value)) = (row.get(0), row.get(1)) else {
            continue;
        };
        match value.parse::<f64>() {
            Ok(v) => {
                params.insert(name.to_string(), v);
            }
            // A header line or a string-valued entry.
            Err(_) => warn!("Skipping parameter '{}' with value '{}'", name, value),
        }
    }
    Ok(params)
}

fn read_changed_params_file(path: &Path) -> Result<Vec<ChangedParam>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut changes = Vec::new();
    for result in reader.records() {
        let row = result?;
        let (Some(ts), Some(name), Some(value)) = (row.get(0), row.get(1), row.get(2)) else {
            continue;
        };
        match (ts.parse::<u64>(), value.parse::<f64>()) {
            (Ok(timestamp), Ok(value)) => changes.push(ChangedParam {
                timestamp,
                name: name.to_string(),
                value,
            }),
            _ => warn!("Skipping parameter change row '{},{},{}'", ts, name, value),
        }
    }
    changes.sort_by_key(|c| c.timestamp);
    Ok(changes)
}


// src/data_input/log_parser.rs
