// src/data_analysis/summary.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt; // min() / max() on Array1

use crate::error::Result;
use crate::table::unified::UnifiedTable;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize, // Known values
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Min, max and mean of the known values of `name`. None if the column has
/// no value at all.
pub fn summarize(table: &UnifiedTable, name: &str) -> Result<Option<ColumnSummary>> {
    let known: Array1<f64> = table.column(name)?.iter().flatten().copied().collect();
    if known.is_empty() {
        return Ok(None);
    }

    let (Ok(min), Ok(max), Some(mean)) = (known.min(), known.max(), known.mean()) else {
        return Ok(None);
    };
    Ok(Some(ColumnSummary {
        name: name.to_string(),
        count: known.len(),
        min: *min,
        max: *max,
        mean,
    }))
}

/// Summaries of every column holding at least one value, in column order.
pub fn summarize_all(table: &UnifiedTable) -> Result<Vec<ColumnSummary>> {
    let mut summaries = Vec::new();
    for name in table.column_names() {
        if let Some(summary) = summarize(table, name)? {
            summaries.push(summary);
        }
    }
    Ok(summaries)
}


// src/data_analysis/summary.rs
