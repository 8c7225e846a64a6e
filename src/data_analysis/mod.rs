// src/data_analysis/mod.rs

pub mod attitude;
pub mod global_position;
pub mod math;
pub mod position;
pub mod summary;
pub mod utm;
pub mod vehicle_status;

use crate::error::Result;
use crate::registry::AnalysisKind;
use crate::table::unified::UnifiedTable;

/// Appends the derived columns of `kind`. The global position analysis also
/// drops the rows without a usable global reference.
pub fn run_analysis(kind: AnalysisKind, mut table: UnifiedTable) -> Result<UnifiedTable> {
    match kind {
        AnalysisKind::LocalPosition => position::add_horizontal_distance(&mut table)?,
        AnalysisKind::Attitude => attitude::add_all(&mut table)?,
        AnalysisKind::GlobalPosition => table = global_position::process(&table)?,
        // Transitions are reported, not stored as columns.
        AnalysisKind::VehicleStatus => {}
    }
    Ok(table)
}

// src/data_analysis/mod.rs
