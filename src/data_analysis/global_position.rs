// src/data_analysis/global_position.rs

use log::debug;
use ndarray::Array1;

use crate::constants::{GLOBAL_FLAG_THRESHOLD, LAT_MAX_DEG, LAT_MIN_DEG, LON_MAX_DEG, LON_MIN_DEG};
use crate::data_analysis::utm::series_utm;
use crate::error::Result;
use crate::table::namespace::{derived_column, field_column};
use crate::table::unified::UnifiedTable;

pub const GLOBAL_POSITION_TOPIC: &str = "vehicle_global_position";
pub const LOCAL_POSITION_TOPIC: &str = "vehicle_local_position";
pub const TRIPLET_TOPIC: &str = "position_setpoint_triplet";

fn in_range(v: f64, min: f64, max: f64) -> bool {
    v >= min && v <= max
}

/// Keeps the rows where the local position has a global reference (xy and z)
/// and both the global position and the current setpoint lie in the usable
/// coordinate window.
pub fn filter_valid(table: &UnifiedTable) -> Result<UnifiedTable> {
    let xy_global = table.values(&field_column(LOCAL_POSITION_TOPIC, 0, "xy_global"))?;
    let z_global = table.values(&field_column(LOCAL_POSITION_TOPIC, 0, "z_global"))?;
    let lat = table.values(&field_column(GLOBAL_POSITION_TOPIC, 0, "lat"))?;
    let lon = table.values(&field_column(GLOBAL_POSITION_TOPIC, 0, "lon"))?;
    let sp_lat = table.values(&field_column(TRIPLET_TOPIC, 0, "current.lat"))?;
    let sp_lon = table.values(&field_column(TRIPLET_TOPIC, 0, "current.lon"))?;

    // NaN compares false, so rows with a missing input are dropped.
    let keep: Vec<bool> = (0..table.len())
        .map(|i| {
            xy_global[i] > GLOBAL_FLAG_THRESHOLD
                && z_global[i] > GLOBAL_FLAG_THRESHOLD
                && in_range(lat[i], LAT_MIN_DEG, LAT_MAX_DEG)
                && in_range(lon[i], LON_MIN_DEG, LON_MAX_DEG)
                && in_range(sp_lat[i], LAT_MIN_DEG, LAT_MAX_DEG)
                && in_range(sp_lon[i], LON_MIN_DEG, LON_MAX_DEG)
        })
        .collect();

    let valid = table.retain_rows(&keep)?;
    debug!("{} of {} rows have a valid global position", valid.len(), table.len());
    Ok(valid)
}

fn add_utm(
    table: &mut UnifiedTable,
    topic: &str,
    lat_field: &str,
    lon_field: &str,
    prefix: &str,
) -> Result<()> {
    let lat = table.values(&field_column(topic, 0, lat_field))?;
    let lon = table.values(&field_column(topic, 0, lon_field))?;
    let (easting, northing, zone) = series_utm(&lat, &lon)?;
    for (name, values) in [("easting", easting), ("northing", northing), ("zone", zone)] {
        table.append_array(&derived_column(topic, 0, &format!("{prefix}{name}")), values)?;
    }
    Ok(())
}

/// UTM of the current position setpoint.
pub fn add_utm_from_setpoint(table: &mut UnifiedTable) -> Result<()> {
    add_utm(table, TRIPLET_TOPIC, "current.lat", "current.lon", "current_")
}

/// UTM of the local frame origin.
pub fn add_utm_from_reference(table: &mut UnifiedTable) -> Result<()> {
    add_utm(table, LOCAL_POSITION_TOPIC, "ref_lat", "ref_lon", "ref_")
}

pub fn add_utm_from_global_position(table: &mut UnifiedTable) -> Result<()> {
    add_utm(table, GLOBAL_POSITION_TOPIC, "lat", "lon", "")
}

fn ensure(table: &mut UnifiedTable, column: &str, add: fn(&mut UnifiedTable) -> Result<()>) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        add(table)
    }
}

fn add_relative(table: &mut UnifiedTable, topic: &str, prefix: &str) -> Result<()> {
    for axis in ["easting", "northing"] {
        let value: Array1<f64> = table.values(&derived_column(topic, 0, &format!("{prefix}{axis}")))?;
        let reference = table.values(&derived_column(LOCAL_POSITION_TOPIC, 0, &format!("ref_{axis}")))?;
        table.append_array(
            &derived_column(topic, 0, &format!("{prefix}{axis}_relative")),
            value - reference,
        )?;
    }
    Ok(())
}

/// Setpoint UTM relative to the local origin [m].
pub fn add_utm_setpoint_relative_to_reference(table: &mut UnifiedTable) -> Result<()> {
    ensure(table, &derived_column(TRIPLET_TOPIC, 0, "current_easting"), add_utm_from_setpoint)?;
    ensure(table, &derived_column(LOCAL_POSITION_TOPIC, 0, "ref_easting"), add_utm_from_reference)?;
    add_relative(table, TRIPLET_TOPIC, "current_")
}

/// Global position UTM relative to the local origin [m].
pub fn add_utm_position_relative_to_reference(table: &mut UnifiedTable) -> Result<()> {
    ensure(table, &derived_column(GLOBAL_POSITION_TOPIC, 0, "easting"), add_utm_from_global_position)?;
    ensure(table, &derived_column(LOCAL_POSITION_TOPIC, 0, "ref_easting"), add_utm_from_reference)?;
    add_relative(table, GLOBAL_POSITION_TOPIC, "")
}

/// Filters `table` to valid global rows and appends every UTM quantity.
pub fn process(table: &UnifiedTable) -> Result<UnifiedTable> {
    let mut valid = filter_valid(table)?;
    add_utm_from_setpoint(&mut valid)?;
    add_utm_from_reference(&mut valid)?;
    add_utm_setpoint_relative_to_reference(&mut valid)?;
    add_utm_from_global_position(&mut valid)?;
    add_utm_position_relative_to_reference(&mut valid)?;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::unified::UnifiedColumn;

    fn column(name: &str, values: &[Option<f64>]) -> UnifiedColumn {
        UnifiedColumn {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    fn global_table() -> UnifiedTable {
        UnifiedTable::new(
            vec![0, 10, 20, 30],
            vec![
                column("T_vehicle_local_position_0__F_xy_global", &[Some(0.0), Some(1.0), Some(1.0), Some(1.0)]),
                column("T_vehicle_local_position_0__F_z_global", &[Some(1.0), Some(1.0), Some(1.0), Some(1.0)]),
                column("T_vehicle_local_position_0__F_ref_lat", &[Some(0.0); 4]),
                column("T_vehicle_local_position_0__F_ref_lon", &[Some(3.0); 4]),
                column("T_vehicle_global_position_0__F_lat", &[Some(0.0), Some(0.0), Some(85.0), Some(0.0)]),
                column("T_vehicle_global_position_0__F_lon", &[Some(3.0), Some(3.0), Some(3.0), Some(3.001)]),
                column("T_position_setpoint_triplet_0__F_current_lat", &[Some(0.0), Some(0.001), Some(0.0), None]),
                column("T_position_setpoint_triplet_0__F_current_lon", &[Some(3.0); 4]),
            ],
        )
    }

    #[test]
    fn test_filter_valid() {
        let valid = filter_valid(&global_table()).unwrap();
        // Row 0 has no xy reference, row 2 is outside the latitude window and
        // row 3 has no setpoint.
        assert_eq!(valid.timestamps(), &[10]);
    }

    #[test]
    fn test_process_relative_coordinates() {
        let processed = process(&global_table()).unwrap();
        assert_eq!(processed.len(), 1);

        let east = processed
            .values("T_vehicle_global_position_0__NF_easting_relative")
            .unwrap();
        assert!(east[0].abs() < 1e-6);

        let north = processed
            .values("T_position_setpoint_triplet_0__NF_current_northing_relative")
            .unwrap();
        // 0.001 deg of latitude is roughly 110 m.
        assert!((north[0] - 110.6).abs() < 1.0, "{}", north[0]);

        let zone = processed.values("T_vehicle_local_position_0__NF_ref_zone").unwrap();
        assert_eq!(zone[0], 31.0);
    }

    #[test]
    fn test_relative_adds_missing_inputs() {
        let mut valid = filter_valid(&global_table()).unwrap();
        add_utm_position_relative_to_reference(&mut valid).unwrap();
        assert!(valid.has_column("T_vehicle_global_position_0__NF_easting"));
        assert!(valid.has_column("T_vehicle_local_position_0__NF_ref_northing"));
    }
}

// src/data_analysis/global_position.rs
