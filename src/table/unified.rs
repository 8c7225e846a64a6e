// src/table/unified.rs

use ndarray::Array1;
use std::io::Write;
use std::ops::Range;
use std::time::Duration;

use crate::constants::{MICROS_PER_SECOND, TIMESTAMP_COLUMN};
use crate::error::{Error, Result};
use crate::table::topic_table::duration_index;

/// A resampled column. `None` is a missing value, including values that were
/// logged as "not used".
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// All requested topics on one time axis.
///
/// Timestamps are ascending and unique. Logged columns are never rewritten
/// after the merge; derived columns are appended with [`UnifiedTable::append_column`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedTable {
    timestamps: Vec<u64>,
    index: Vec<Duration>,
    columns: Vec<UnifiedColumn>,
}

impl UnifiedTable {
    pub(crate) fn new(timestamps: Vec<u64>, columns: Vec<UnifiedColumn>) -> Self {
        Self {
            index: duration_index(&timestamps),
            timestamps,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Raw log timestamps [us].
    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn index(&self) -> &[Duration] {
        &self.index
    }

    /// Seconds since the first row.
    pub fn time_s(&self) -> Vec<f64> {
        let start = self.timestamps.first().copied().unwrap_or(0);
        self.timestamps
            .iter()
            .map(|&t| (t - start) as f64 / MICROS_PER_SECOND)
            .collect()
    }

    pub fn columns(&self) -> &[UnifiedColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Column as a dense array, missing values as NaN.
    pub fn values(&self, name: &str) -> Result<Array1<f64>> {
        Ok(self
            .column(name)?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    pub fn append_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if self.has_column(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.len() {
            return Err(Error::ColumnLength {
                name: name.to_string(),
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.columns.push(UnifiedColumn {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Appends a column computed as an array; NaN results are stored as missing.
    pub fn append_array(&mut self, name: &str, values: Array1<f64>) -> Result<()> {
        let values = values
            .iter()
            .map(|&v| if v.is_nan() { None } else { Some(v) })
            .collect();
        self.append_column(name, values)
    }

    /// New table holding the rows where `keep` is true.
    pub fn retain_rows(&self, keep: &[bool]) -> Result<UnifiedTable> {
        if keep.len() != self.len() {
            return Err(Error::ColumnLength {
                name: "row mask".to_string(),
                expected: self.len(),
                actual: keep.len(),
            });
        }
        Ok(self.select_rows(keep))
    }

    /// Rows whose duration index falls in `range`.
    pub fn slice_time(&self, range: Range<Duration>) -> UnifiedTable {
        let keep: Vec<bool> = self.index.iter().map(|d| range.contains(d)).collect();
        self.select_rows(&keep)
    }

    fn select_rows(&self, keep: &[bool]) -> UnifiedTable {
        fn pick<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| *v)
                .collect()
        }
        let columns = self
            .columns
            .iter()
            .map(|c| UnifiedColumn {
                name: c.name.clone(),
                values: pick(&c.values, keep),
            })
            .collect();
        UnifiedTable::new(pick(&self.timestamps, keep), columns)
    }

    /// Writes the table as CSV. The `timestamp` column holds seconds since the
    /// first row; missing values are empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(TIMESTAMP_COLUMN);
        header.extend(self.column_names());
        wtr.write_record(&header)?;

        for (row, t) in self.time_s().iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(t.to_string());
            for column in &self.columns {
                record.push(column.values[row].map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}


// src/table/unified.rs
