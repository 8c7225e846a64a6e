// src/data_analysis/position.rs

use crate::data_analysis::math::series_pythagoras;
use crate::error::Result;
use crate::table::namespace::{derived_column, field_column};
use crate::table::unified::UnifiedTable;

pub const LOCAL_POSITION_TOPIC: &str = "vehicle_local_position";

/// Horizontal distance from the local origin (home) [m].
pub fn add_horizontal_distance(table: &mut UnifiedTable) -> Result<()> {
    let x = table.values(&field_column(LOCAL_POSITION_TOPIC, 0, "x"))?;
    let y = table.values(&field_column(LOCAL_POSITION_TOPIC, 0, "y"))?;
    table.append_array(
        &derived_column(LOCAL_POSITION_TOPIC, 0, "abs_horizontal_dist"),
        series_pythagoras(&x, &y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::unified::UnifiedColumn;

    #[test]
    fn test_horizontal_distance() {
        let mut table = UnifiedTable::new(
            vec![0, 1],
            vec![
                UnifiedColumn {
                    name: "T_vehicle_local_position_0__F_x".to_string(),
                    values: vec![Some(3.0), None],
                },
                UnifiedColumn {
                    name: "T_vehicle_local_position_0__F_y".to_string(),
                    values: vec![Some(4.0), Some(1.0)],
                },
            ],
        );
        add_horizontal_distance(&mut table).unwrap();
        assert_eq!(
            table.column("T_vehicle_local_position_0__NF_abs_horizontal_dist").unwrap(),
            &[Some(5.0), None]
        );
    }

    #[test]
    fn test_missing_input_column() {
        let mut table = UnifiedTable::new(vec![0], Vec::new());
        assert!(matches!(
            add_horizontal_distance(&mut table),
            Err(Error::ColumnNotFound(_))
        ));
    }
}

// src/data_analysis/position.rs
