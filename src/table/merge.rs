// src/table/merge.rs

use log::debug;
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::registry::TopicRequirements;
use crate::table::builder::column_matches_field;
use crate::table::namespace::strip_namespace;
use crate::table::sample::Sample;
use crate::table::topic_table::NamespacedTable;
use crate::table::unified::{UnifiedColumn, UnifiedTable};

/// How the gaps left by the outer join are filled in columns that are neither
/// sentinel nor hold columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMethod {
    /// Linear in time between the neighbouring samples.
    #[default]
    Linear,
    /// Hold the last known value.
    ZeroOrderHold,
    /// Leave gaps as they are.
    NoFill,
}

/// Explicit column sets driving the resampling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FillPolicy {
    /// Columns of NaN-bearing fields, forward-filled first.
    pub sentinel_columns: BTreeSet<String>,
    /// Columns of zero-order-hold topics.
    pub hold_columns: BTreeSet<String>,
    pub method: FillMethod,
}

impl FillPolicy {
    /// Resolves the topic-level declarations of `requirements` into the
    /// columns present in `tables`.
    pub fn resolve(requirements: &TopicRequirements, tables: &[NamespacedTable]) -> Self {
        let mut policy = FillPolicy::default();

        for table in tables {
            let hold = requirements.is_zoh_topic(table.topic());
            let nan_fields = requirements.nan_fields(table.topic());

            for name in table.column_names() {
                if hold {
                    policy.hold_columns.insert(name.to_string());
                }
                let Some(fields) = nan_fields else {
                    continue;
                };
                let column = strip_namespace(name).map_or(name, |(_, c)| c);
                if fields.is_empty() || fields.iter().any(|f| column_matches_field(column, f)) {
                    policy.sentinel_columns.insert(name.to_string());
                }
            }
        }
        policy
    }

    pub fn with_method(mut self, method: FillMethod) -> Self {
        self.method = method;
        self
    }
}

/// Intermediate result of the pairwise outer join.
#[derive(Debug, Clone, PartialEq)]
struct JoinFrame {
    timestamps: Vec<u64>,
    columns: Vec<(String, Vec<Sample>)>,
}

impl JoinFrame {
    /// Takes the rows of a table with duplicate timestamps collapsed; the last
    /// row logged at a timestamp wins.
    fn from_table(table: NamespacedTable) -> Self {
        let table = table.into_inner();
        let n = table.timestamps.len();
        let keep: Vec<bool> = (0..n)
            .map(|i| i + 1 == n || table.timestamps[i] != table.timestamps[i + 1])
            .collect();

        let select = |samples: &[Sample]| -> Vec<Sample> {
            samples
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(s, _)| *s)
                .collect()
        };

        JoinFrame {
            timestamps: table
                .timestamps
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(t, _)| *t)
                .collect(),
            columns: table
                .columns
                .iter()
                .map(|c| (c.name.clone(), select(&c.samples)))
                .collect(),
        }
    }
}

/// Ordered outer join of two frames on their (sorted, unique) timestamps.
fn outer_join(left: JoinFrame, right: JoinFrame) -> Result<JoinFrame> {
    for (name, _) in &right.columns {
        if left.columns.iter().any(|(n, _)| n == name) {
            return Err(Error::DuplicateColumn(name.clone()));
        }
    }

    let capacity = left.timestamps.len() + right.timestamps.len();
    let mut timestamps = Vec::with_capacity(capacity);
    let mut left_rows: Vec<Option<usize>> = Vec::with_capacity(capacity);
    let mut right_rows: Vec<Option<usize>> = Vec::with_capacity(capacity);

    let (mut i, mut j) = (0, 0);
    loop {
        match (left.timestamps.get(i), right.timestamps.get(j)) {
            (Some(&a), Some(&b)) if a == b => {
                timestamps.push(a);
                left_rows.push(Some(i));
                right_rows.push(Some(j));
                i += 1;
                j += 1;
            }
            (Some(&a), Some(&b)) if a < b => {
                timestamps.push(a);
                left_rows.push(Some(i));
                right_rows.push(None);
                i += 1;
            }
            (_, Some(&b)) => {
                timestamps.push(b);
                left_rows.push(None);
                right_rows.push(Some(j));
                j += 1;
            }
            (Some(&a), None) => {
                timestamps.push(a);
                left_rows.push(Some(i));
                right_rows.push(None);
                i += 1;
            }
            (None, None) => break,
        }
    }

    let spread = |samples: &[Sample], rows: &[Option<usize>]| -> Vec<Sample> {
        rows.iter()
            .map(|r| r.map_or(Sample::Missing, |k| samples[k]))
            .collect()
    };

    let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len());
    for (name, samples) in &left.columns {
        columns.push((name.clone(), spread(samples, &left_rows)));
    }
    for (name, samples) in &right.columns {
        columns.push((name.clone(), spread(samples, &right_rows)));
    }

    Ok(JoinFrame {
        timestamps,
        columns,
    })
}

/// Propagates the last known sample (value or `Unavailable`) over missing rows.
/// Leading gaps stay missing.
fn forward_fill(samples: &mut [Sample]) {
    let mut last: Option<Sample> = None;
    for sample in samples.iter_mut() {
        if sample.is_missing() {
            if let Some(known) = last {
                *sample = known;
            }
        } else {
            last = Some(*sample);
        }
    }
}

/// Linear interpolation against `timestamps` over every run of missing rows
/// between two finite present values. A run after an `Unavailable` or infinite
/// sample is held instead of blended, trailing runs hold the last sample and
/// leading runs stay missing.
fn interpolate_linear(timestamps: &[u64], samples: &mut [Sample]) {
    let n = samples.len();
    let mut prev: Option<usize> = None;
    let mut k = 0;

    while k < n {
        if samples[k].is_known() {
            prev = Some(k);
            k += 1;
            continue;
        }

        let gap_start = k;
        while k < n && samples[k].is_missing() {
            k += 1;
        }
        let Some(p) = prev else {
            continue;
        };

        match (samples[p], samples.get(k).copied()) {
            (Sample::Present(a), Some(Sample::Present(b))) if a.is_finite() && b.is_finite() => {
                let (t0, t1) = (timestamps[p], timestamps[k]);
                let span = (t1 - t0) as f64;
                for m in gap_start..k {
                    let frac = (timestamps[m] - t0) as f64 / span;
                    let value = a + (b - a) * frac;
                    // Overflow between two huge finite values.
                    samples[m] = if value.is_finite() {
                        Sample::Present(value)
                    } else {
                        Sample::Missing
                    };
                }
            }
            (held, _) => {
                for sample in &mut samples[gap_start..k] {
                    *sample = held;
                }
            }
        }
    }
}

/// Merges namespaced topic tables into one table on a common time axis.
///
/// Steps, in order:
/// 1. ordered outer join on `timestamp` (tables are folded in name order, so
///    the input order does not matter),
/// 2. forward-fill of sentinel columns, so a logged "not used" value is never
///    blended with a neighbour by the interpolation below,
/// 3. forward-fill of hold columns,
/// 4. `policy.method` over every column (hold columns included, which only
///    have leading gaps left),
/// 5. rows with no value in any column are dropped; leading gaps of a topic
///    that starts late stay missing,
/// 6. `Unavailable` samples become missing values.
pub fn merge(mut tables: Vec<NamespacedTable>, policy: &FillPolicy) -> Result<UnifiedTable> {
    tables.sort_by(|a, b| a.name().cmp(b.name()));

    let mut frames = tables.into_iter().map(JoinFrame::from_table);
    let first = frames.next().ok_or(Error::EmptyMerge)?;
    let mut frame = frames.try_fold(first, outer_join)?;
    debug!(
        "Outer join: {} rows, {} columns",
        frame.timestamps.len(),
        frame.columns.len()
    );

    for (name, samples) in frame.columns.iter_mut() {
        if policy.sentinel_columns.contains(name.as_str()) {
            forward_fill(samples);
        }
    }

    for (name, samples) in frame.columns.iter_mut() {
        if policy.hold_columns.contains(name.as_str()) {
            forward_fill(samples);
        }
    }

    match policy.method {
        FillMethod::Linear => {
            for (_, samples) in frame.columns.iter_mut() {
                interpolate_linear(&frame.timestamps, samples);
            }
        }
        FillMethod::ZeroOrderHold => {
            for (_, samples) in frame.columns.iter_mut() {
                forward_fill(samples);
            }
        }
        FillMethod::NoFill => {}
    }

    let keep: Vec<bool> = (0..frame.timestamps.len())
        .map(|row| frame.columns.iter().any(|(_, samples)| samples[row].is_known()))
        .collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        debug!("Dropping {} row(s) that could not be filled", dropped);
    }

    let timestamps: Vec<u64> = frame
        .timestamps
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(t, _)| *t)
        .collect();
    let columns = frame
        .columns
        .into_iter()
        .map(|(name, samples)| UnifiedColumn {
            name,
            values: samples
                .iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(s, _)| s.value())
                .collect(),
        })
        .collect();

    Ok(UnifiedTable::new(timestamps, columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_data::{RawTopicBatch, Record};
    use crate::registry::TopicMsgs;
    use crate::table::builder::build_topic_table;
    use crate::table::namespace::namespace;

    fn batch(topic: &str, rows: &[(u64, f64)]) -> RawTopicBatch {
        RawTopicBatch::new(
            topic,
            0,
            rows.iter().map(|&(t, x)| Record::new(t).with("x", x)).collect(),
        )
    }

    fn merged(batches: &[RawTopicBatch], requirements: &TopicRequirements) -> UnifiedTable {
        let tables = batches
            .iter()
            .map(|b| build_topic_table(b, requirements.nan_fields(&b.topic).unwrap_or(&[])))
            .collect();
        let tables = namespace(tables);
        let policy = FillPolicy::resolve(requirements, &tables);
        merge(tables, &policy).unwrap()
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(
            merge(Vec::new(), &FillPolicy::default()),
            Err(Error::EmptyMerge)
        ));
    }

    #[test]
    fn test_linear_interpolation_by_time() {
        let table = merged(
            &[batch("a", &[(0, 0.0), (10, 10.0)]), batch("b", &[(0, 1.0), (5, 1.0), (10, 1.0)])],
            &TopicRequirements::default(),
        );
        assert_eq!(table.timestamps(), &[0, 5, 10]);
        assert_eq!(table.column("T_a_0__F_x").unwrap(), &[Some(0.0), Some(5.0), Some(10.0)]);
    }

    #[test]
    fn test_interpolation_uses_timestamps_not_row_count() {
        let table = merged(
            &[batch("a", &[(0, 0.0), (100, 100.0)]), batch("b", &[(0, 0.0), (10, 0.0), (20, 0.0), (100, 0.0)])],
            &TopicRequirements::default(),
        );
        assert_eq!(
            table.column("T_a_0__F_x").unwrap(),
            &[Some(0.0), Some(10.0), Some(20.0), Some(100.0)]
        );
    }

    #[test]
    fn test_nan_field_is_held_not_interpolated() {
        let requirements = TopicRequirements {
            required_topics: vec!["sp".to_string(), "pos".to_string()],
            zoh_topics: Vec::new(),
            nan_topic_msgs: vec![TopicMsgs::new("sp", &["x"])],
        };
        let table = merged(
            &[batch("sp", &[(0, 1.0), (20, 3.0)]), batch("pos", &[(0, 0.0), (10, 0.0), (20, 0.0)])],
            &requirements,
        );
        assert_eq!(table.column("T_sp_0__F_x").unwrap(), &[Some(1.0), Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_unavailable_samples_survive_and_become_missing() {
        let requirements = TopicRequirements {
            required_topics: vec!["sp".to_string(), "pos".to_string()],
            zoh_topics: Vec::new(),
            nan_topic_msgs: vec![TopicMsgs::new("sp", &["x"])],
        };
        let table = merged(
            &[
                batch("sp", &[(0, 1.0), (20, f64::NAN), (40, 5.0)]),
                batch("pos", &[(0, 0.0), (10, 0.0), (20, 0.0), (30, 0.0), (40, 0.0)]),
            ],
            &requirements,
        );
        // Row 30 follows an unavailable sample: it is held as unavailable, not
        // blended towards 5.0.
        assert_eq!(
            table.column("T_sp_0__F_x").unwrap(),
            &[Some(1.0), Some(1.0), None, None, Some(5.0)]
        );
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_leading_gap_stays_missing() {
        let table = merged(
            &[batch("a", &[(0, 0.0), (10, 1.0), (20, 2.0)]), batch("b", &[(10, 5.0), (20, 6.0)])],
            &TopicRequirements::default(),
        );
        assert_eq!(table.timestamps(), &[0, 10, 20]);
        assert_eq!(table.column("T_b_0__F_x").unwrap(), &[None, Some(5.0), Some(6.0)]);
    }

    #[test]
    fn test_late_topic_keeps_earlier_rows() {
        let table = merged(
            &[
                batch("pos", &[(0, 0.0), (10, 1.0), (20, 2.0), (30, 3.0)]),
                batch("sp", &[(20, 7.0), (30, 8.0)]),
            ],
            &TopicRequirements::default(),
        );
        assert_eq!(table.timestamps(), &[0, 10, 20, 30]);
        assert_eq!(
            table.column("T_pos_0__F_x").unwrap(),
            &[Some(0.0), Some(1.0), Some(2.0), Some(3.0)]
        );
        assert_eq!(
            table.column("T_sp_0__F_x").unwrap(),
            &[None, None, Some(7.0), Some(8.0)]
        );
    }

    #[test]
    fn test_row_without_any_value_is_dropped() {
        let table = merged(
            &[
                batch("a", &[(0, f64::NAN), (10, 1.0)]),
                batch("b", &[(0, f64::NAN), (10, 2.0)]),
            ],
            &TopicRequirements::default(),
        );
        assert_eq!(table.timestamps(), &[10]);
        assert_eq!(table.column("T_a_0__F_x").unwrap(), &[Some(1.0)]);
    }

    #[test]
    fn test_infinite_endpoint_is_held_not_blended() {
        let table = merged(
            &[
                batch("c", &[(0, f64::INFINITY), (10, 1.0)]),
                batch("d", &[(0, 0.0), (5, 0.0), (10, 0.0)]),
            ],
            &TopicRequirements::default(),
        );
        let c = table.column("T_c_0__F_x").unwrap();
        assert_eq!(c, &[Some(f64::INFINITY), Some(f64::INFINITY), Some(1.0)]);
        assert!(c.iter().flatten().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_overflowing_blend_becomes_missing() {
        let table = merged(
            &[
                batch("c", &[(0, -f64::MAX), (10, f64::MAX)]),
                batch("d", &[(0, 0.0), (5, 0.0), (10, 0.0)]),
            ],
            &TopicRequirements::default(),
        );
        assert_eq!(
            table.column("T_c_0__F_x").unwrap(),
            &[Some(-f64::MAX), None, Some(f64::MAX)]
        );
    }

    #[test]
    fn test_trailing_gap_holds_last_value() {
        let table = merged(
            &[batch("a", &[(0, 0.0), (10, 1.0), (20, 2.0)]), batch("b", &[(0, 5.0), (10, 6.0)])],
            &TopicRequirements::default(),
        );
        assert_eq!(table.column("T_b_0__F_x").unwrap(), &[Some(5.0), Some(6.0), Some(6.0)]);
    }

    #[test]
    fn test_duplicate_timestamps_keep_last_record() {
        let table = merged(&[batch("a", &[(0, 1.0), (0, 2.0), (10, 3.0)])], &TopicRequirements::default());
        assert_eq!(table.timestamps(), &[0, 10]);
        assert_eq!(table.column("T_a_0__F_x").unwrap(), &[Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_all_missing_column_does_not_drop_rows() {
        let table = merged(
            &[batch("a", &[(0, 1.0), (10, 2.0)]), batch("b", &[(0, f64::NAN), (10, f64::NAN)])],
            &TopicRequirements::default(),
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("T_b_0__F_x").unwrap(), &[None, None]);
    }

    #[test]
    fn test_zero_order_hold_method_for_every_column() {
        let tables = namespace(vec![
            build_topic_table(&batch("a", &[(0, 0.0), (10, 10.0)]), &[]),
            build_topic_table(&batch("b", &[(0, 0.0), (5, 0.0), (10, 0.0)]), &[]),
        ]);
        let policy = FillPolicy::default().with_method(FillMethod::ZeroOrderHold);
        let table = merge(tables, &policy).unwrap();
        assert_eq!(table.column("T_a_0__F_x").unwrap(), &[Some(0.0), Some(0.0), Some(10.0)]);
    }

    #[test]
    fn test_resolve_policy() {
        let requirements = TopicRequirements {
            required_topics: Vec::new(),
            zoh_topics: vec!["status".to_string()],
            nan_topic_msgs: vec![TopicMsgs::new("sp", &["x"]), TopicMsgs::new("flags", &[])],
        };
        let tables = namespace(vec![
            build_topic_table(
                &RawTopicBatch::new("sp", 0, vec![Record::new(0).with("x", 1.0).with("xy", 2.0)]),
                &[],
            ),
            build_topic_table(&batch("status", &[(0, 1.0)]), &[]),
            build_topic_table(&batch("flags", &[(0, 1.0)]), &[]),
        ]);
        let policy = FillPolicy::resolve(&requirements, &tables);

        let sentinel: Vec<&str> = policy.sentinel_columns.iter().map(String::as_str).collect();
        assert_eq!(sentinel, vec!["T_flags_0__F_x", "T_sp_0__F_x"]);
        let hold: Vec<&str> = policy.hold_columns.iter().map(String::as_str).collect();
        assert_eq!(hold, vec!["T_status_0__F_x"]);
        assert_eq!(policy.method, FillMethod::Linear);
    }

    #[test]
    fn test_duplicate_table_is_an_error() {
        let tables = namespace(vec![
            build_topic_table(&batch("a", &[(0, 1.0)]), &[]),
            build_topic_table(&batch("a", &[(5, 1.0)]), &[]),
        ]);
        assert!(matches!(
            merge(tables, &FillPolicy::default()),
            Err(Error::DuplicateColumn(_))
        ));
    }
}

// src/table/merge.rs
