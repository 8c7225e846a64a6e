// src/axis_names.rs

/// Euler axis names, in the order returned by [`crate::data_analysis::math::quat2euler`].
pub const AXIS_NAMES: [&str; 3] = ["roll", "pitch", "yaw"];

/// Cartesian component suffixes of a vector stored as three columns.
pub const VECTOR_COMPONENTS: [&str; 3] = ["x", "y", "z"];

/// `roll` -> `roll_body`, the attitude setpoint field of that axis.
pub fn setpoint_body_field(axis: &str) -> String {
    format!("{}_body", axis)
}

/// `roll` -> `e_roll`
pub fn error_name(axis: &str) -> String {
    format!("e_{}", axis)
}


// src/axis_names.rs
