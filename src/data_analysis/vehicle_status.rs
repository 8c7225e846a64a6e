// src/data_analysis/vehicle_status.rs

use crate::error::Result;
use crate::table::namespace::field_column;
use crate::table::unified::UnifiedTable;

pub const VEHICLE_STATUS_TOPIC: &str = "vehicle_status";

/// Navigation state entered at `time_s` seconds after the first row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavStateChange {
    pub time_s: f64,
    pub nav_state: u32,
}

/// Every change of `vehicle_status.nav_state`, starting with the first known
/// state. Rows without a state are skipped.
pub fn nav_state_transitions(table: &UnifiedTable) -> Result<Vec<NavStateChange>> {
    let states = table.column(&field_column(VEHICLE_STATUS_TOPIC, 0, "nav_state"))?;
    let time_s = table.time_s();

    let mut changes: Vec<NavStateChange> = Vec::new();
    for (t, state) in time_s.iter().zip(states) {
        let Some(state) = state else { continue };
        let nav_state = state.round() as u32;
        if changes.last().map_or(true, |last| last.nav_state != nav_state) {
            changes.push(NavStateChange {
                time_s: *t,
                nav_state,
            });
        }
    }
    Ok(changes)
}


// src/data_analysis/vehicle_status.rs
