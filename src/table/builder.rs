// src/table/builder.rs

use log::debug;
use std::collections::HashMap;

use crate::constants::{FIELD_NAME_REPLACEMENTS, FIELD_PREFIX, TOPIC_PREFIX};
use crate::data_input::log_data::{FieldValue, ParsedLog, RawTopicBatch};
use crate::registry::TopicRequirements;
use crate::table::sample::Sample;
use crate::table::topic_table::{duration_index, Column, TopicTable};

/// `vehicle_local_position`, 0 -> `T_vehicle_local_position_0`
pub fn table_name(topic: &str, instance: u32) -> String {
    format!("{TOPIC_PREFIX}{topic}_{instance}")
}

/// Rewrites array and struct notation: `q[0]` -> `q_0`, `a.b` -> `a_b`.
pub fn flatten_field_name(raw: &str) -> String {
    let mut flat = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match FIELD_NAME_REPLACEMENTS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => flat.push_str(to),
            None => flat.push(ch),
        }
    }
    flat
}

/// `q[0]` -> `F_q_0`
pub fn canonical_column_name(raw: &str) -> String {
    format!("{FIELD_PREFIX}{}", flatten_field_name(raw))
}

/// True if the canonical `column` belongs to the raw field `field`, either as
/// the scalar itself or as one of its array elements (`F_q` matches `F_q_3`).
pub fn column_matches_field(column: &str, field: &str) -> bool {
    let wanted = canonical_column_name(field);
    match column.strip_prefix(wanted.as_str()) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .map_or(false, |idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// Expands one logged value into `(column, value)` pairs.
fn expand_field(name: &str, value: &FieldValue, out: &mut Vec<(String, f64)>) {
    match value {
        FieldValue::Scalar(v) => out.push((canonical_column_name(name), *v)),
        FieldValue::Array(values) => {
            let base = canonical_column_name(name);
            for (idx, v) in values.iter().enumerate() {
                out.push((format!("{base}_{idx}"), *v));
            }
        }
    }
}

/// Builds the normalized table of one topic instance.
///
/// NaN in a column belonging to one of `nan_fields` becomes
/// [`Sample::Unavailable`]; NaN anywhere else is [`Sample::Missing`]. Rows are
/// ordered by timestamp (stable for equal timestamps). An empty batch gives a
/// table with no rows and no columns.
pub fn build_topic_table(batch: &RawTopicBatch, nan_fields: &[String]) -> TopicTable {
    let mut order: Vec<usize> = (0..batch.records.len()).collect();
    order.sort_by_key(|&i| batch.records[i].timestamp);

    let mut columns: Vec<Column> = Vec::new();
    let mut column_lookup: HashMap<String, usize> = HashMap::new();
    let mut nan_column: Vec<bool> = Vec::new();
    let mut timestamps = Vec::with_capacity(order.len());
    let mut expanded = Vec::new();

    for (row, &record_idx) in order.iter().enumerate() {
        let record = &batch.records[record_idx];
        timestamps.push(record.timestamp);

        expanded.clear();
        for (name, value) in &record.fields {
            expand_field(name, value, &mut expanded);
        }

        for (name, value) in expanded.drain(..) {
            let col_idx = *column_lookup.entry(name.clone()).or_insert_with(|| {
                nan_column.push(nan_fields.iter().any(|f| column_matches_field(&name, f)));
                // Rows before this column first appeared were not recorded.
                columns.push(Column::new(name.clone(), vec![Sample::Missing; row]));
                columns.len() - 1
            });

            let sample = if !value.is_nan() {
                Sample::Present(value)
            } else if nan_column[col_idx] {
                Sample::Unavailable
            } else {
                Sample::Missing
            };

            let samples = &mut columns[col_idx].samples;
            if samples.len() == row + 1 {
                // Same column twice in one record: the later value wins.
                samples[row] = sample;
            } else {
                samples.push(sample);
            }
        }

        // Columns this record did not carry.
        for column in columns.iter_mut() {
            if column.samples.len() == row {
                column.samples.push(Sample::Missing);
            }
        }
    }

    debug!(
        "Built {} with {} rows and {} columns",
        table_name(&batch.topic, batch.instance),
        timestamps.len(),
        columns.len()
    );

    TopicTable {
        name: table_name(&batch.topic, batch.instance),
        topic: batch.topic.clone(),
        instance: batch.instance,
        index: duration_index(&timestamps),
        timestamps,
        columns,
    }
}

/// Builds a table for every batch of `log`, applying the NaN declarations of
/// `requirements`.
pub fn build_topic_tables(log: &ParsedLog, requirements: &TopicRequirements) -> Vec<TopicTable> {
    log.data_list
        .iter()
        .map(|batch| {
            let nan_fields = requirements.nan_fields(&batch.topic).unwrap_or(&[]);
            build_topic_table(batch, nan_fields)
        })
        .collect()
}


// src/table/builder.rs
