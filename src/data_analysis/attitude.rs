// src/data_analysis/attitude.rs

use ndarray::Array1;

use crate::axis_names::{error_name, setpoint_body_field, AXIS_NAMES, VECTOR_COMPONENTS};
use crate::data_analysis::math::{
    angle_wrap, series_dot, series_quat2euler, series_quatrot, series_quatrot_inverse,
};
use crate::error::Result;
use crate::table::namespace::{derived_column, field_column};
use crate::table::unified::UnifiedTable;

pub const ATTITUDE_TOPIC: &str = "vehicle_attitude";
pub const ATTITUDE_SETPOINT_TOPIC: &str = "vehicle_attitude_setpoint";

fn quaternion(table: &UnifiedTable, topic: &str, field: &str) -> Result<[Array1<f64>; 4]> {
    Ok([
        table.values(&field_column(topic, 0, &format!("{field}[0]")))?,
        table.values(&field_column(topic, 0, &format!("{field}[1]")))?,
        table.values(&field_column(topic, 0, &format!("{field}[2]")))?,
        table.values(&field_column(topic, 0, &format!("{field}[3]")))?,
    ])
}

/// World z axis repeated for every row.
fn unit_z(n: usize) -> [Array1<f64>; 3] {
    [Array1::zeros(n), Array1::zeros(n), Array1::ones(n)]
}

fn vector(table: &UnifiedTable, topic: &str, base: &str) -> Result<[Array1<f64>; 3]> {
    Ok([
        table.values(&derived_column(topic, 0, &format!("{base}_{}", VECTOR_COMPONENTS[0])))?,
        table.values(&derived_column(topic, 0, &format!("{base}_{}", VECTOR_COMPONENTS[1])))?,
        table.values(&derived_column(topic, 0, &format!("{base}_{}", VECTOR_COMPONENTS[2])))?,
    ])
}

/// Appends `vehicle_attitude` roll, pitch and yaw [rad].
pub fn add_roll_pitch_yaw(table: &mut UnifiedTable) -> Result<()> {
    let [q0, q1, q2, q3] = quaternion(table, ATTITUDE_TOPIC, "q")?;
    let (roll, pitch, yaw) = series_quat2euler([&q0, &q1, &q2, &q3]);
    for (axis, values) in AXIS_NAMES.iter().zip([roll, pitch, yaw]) {
        table.append_array(&derived_column(ATTITUDE_TOPIC, 0, axis), values)?;
    }
    Ok(())
}

/// Setpoint Euler angles: the logged `<axis>_body` fields if present,
/// otherwise converted from `q_d`.
fn setpoint_euler(table: &UnifiedTable) -> Result<[Array1<f64>; 3]> {
    let body: Vec<String> = AXIS_NAMES
        .iter()
        .map(|axis| field_column(ATTITUDE_SETPOINT_TOPIC, 0, &setpoint_body_field(axis)))
        .collect();
    if body.iter().all(|c| table.has_column(c)) {
        return Ok([table.values(&body[0])?, table.values(&body[1])?, table.values(&body[2])?]);
    }
    let [q0, q1, q2, q3] = quaternion(table, ATTITUDE_SETPOINT_TOPIC, "q_d")?;
    let (roll, pitch, yaw) = series_quat2euler([&q0, &q1, &q2, &q3]);
    Ok([roll, pitch, yaw])
}

/// Appends the wrapped setpoint minus state Euler error per axis.
pub fn add_euler_error(table: &mut UnifiedTable) -> Result<()> {
    if !table.has_column(&derived_column(ATTITUDE_TOPIC, 0, AXIS_NAMES[0])) {
        add_roll_pitch_yaw(table)?;
    }
    let setpoint = setpoint_euler(table)?;
    for (axis, sp) in AXIS_NAMES.iter().zip(setpoint) {
        let state = table.values(&derived_column(ATTITUDE_TOPIC, 0, axis))?;
        table.append_array(
            &derived_column(ATTITUDE_SETPOINT_TOPIC, 0, &error_name(axis)),
            angle_wrap(&(sp - state)),
        )?;
    }
    Ok(())
}

fn add_rotated_z_axis(table: &mut UnifiedTable, topic: &str, q_field: &str, base: &str) -> Result<()> {
    let [q0, q1, q2, q3] = quaternion(table, topic, q_field)?;
    let [x, y, z] = unit_z(table.len());
    let rotated = series_quatrot([&x, &y, &z], [&q0, &q1, &q2, &q3]);
    for (component, values) in VECTOR_COMPONENTS.iter().zip(rotated) {
        table.append_array(&derived_column(topic, 0, &format!("{base}_{component}")), values)?;
    }
    Ok(())
}

/// Appends the body z axis expressed in the world frame.
pub fn add_vehicle_z_axis(table: &mut UnifiedTable) -> Result<()> {
    add_rotated_z_axis(table, ATTITUDE_TOPIC, "q", "body_z_axis")
}

/// Appends the desired body z axis from `q_d`.
pub fn add_desired_z_axis(table: &mut UnifiedTable) -> Result<()> {
    add_rotated_z_axis(table, ATTITUDE_SETPOINT_TOPIC, "q_d", "body_z_axis_sp")
}

/// Appends the world z axis expressed in the body frame (the direction of
/// "up" as the vehicle sees it).
pub fn add_world_z_in_body(table: &mut UnifiedTable) -> Result<()> {
    let [q0, q1, q2, q3] = quaternion(table, ATTITUDE_TOPIC, "q")?;
    let [x, y, z] = unit_z(table.len());
    let in_body = series_quatrot_inverse([&x, &y, &z], [&q0, &q1, &q2, &q3]);
    for (component, values) in VECTOR_COMPONENTS.iter().zip(in_body) {
        table.append_array(
            &derived_column(ATTITUDE_TOPIC, 0, &format!("world_z_axis_body_{component}")),
            values,
        )?;
    }
    Ok(())
}

fn tilt_of(z_axis: &[Array1<f64>; 3]) -> Array1<f64> {
    let [x, y, z] = unit_z(z_axis[0].len());
    series_dot([&x, &y, &z], [&z_axis[0], &z_axis[1], &z_axis[2]]).mapv(|d| d.clamp(-1.0, 1.0).acos())
}

/// Appends the angle between the body z axis and the world z axis [rad].
pub fn add_tilt(table: &mut UnifiedTable) -> Result<()> {
    if !table.has_column(&derived_column(ATTITUDE_TOPIC, 0, "body_z_axis_x")) {
        add_vehicle_z_axis(table)?;
    }
    let tilt = tilt_of(&vector(table, ATTITUDE_TOPIC, "body_z_axis")?);
    table.append_array(&derived_column(ATTITUDE_TOPIC, 0, "tilt"), tilt)
}

pub fn add_desired_tilt(table: &mut UnifiedTable) -> Result<()> {
    if !table.has_column(&derived_column(ATTITUDE_SETPOINT_TOPIC, 0, "body_z_axis_sp_x")) {
        add_desired_z_axis(table)?;
    }
    let tilt = tilt_of(&vector(table, ATTITUDE_SETPOINT_TOPIC, "body_z_axis_sp")?);
    table.append_array(&derived_column(ATTITUDE_SETPOINT_TOPIC, 0, "tilt_desired"), tilt)
}

/// Appends 1 where the body z axis points downwards in the world frame
/// (tilt over 90 deg), else 0.
pub fn add_vehicle_inverted(table: &mut UnifiedTable) -> Result<()> {
    if !table.has_column(&derived_column(ATTITUDE_TOPIC, 0, "body_z_axis_z")) {
        add_vehicle_z_axis(table)?;
    }
    let z = table.values(&derived_column(ATTITUDE_TOPIC, 0, "body_z_axis_z"))?;
    let inverted = z.mapv(|v| {
        if v.is_nan() {
            f64::NAN
        } else if v < 0.0 {
            1.0
        } else {
            0.0
        }
    });
    table.append_array(&derived_column(ATTITUDE_TOPIC, 0, "tilt_more_90"), inverted)
}

/// Every attitude quantity.
pub fn add_all(table: &mut UnifiedTable) -> Result<()> {
    add_roll_pitch_yaw(table)?;
    add_euler_error(table)?;
    add_vehicle_z_axis(table)?;
    add_tilt(table)?;
    add_vehicle_inverted(table)?;
    add_world_z_in_body(table)?;
    add_desired_z_axis(table)?;
    add_desired_tilt(table)
}


// src/data_analysis/attitude.rs
