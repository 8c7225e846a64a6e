// src/data_analysis/math.rs

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use ndarray::{Array1, Zip};

/// PX4 quaternion `[w, x, y, z]` as a rotation. The input is normalized.
fn rotation(q: [f64; 4]) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
}

/// Quaternion to `(roll, pitch, yaw)` [rad], Tait-Bryan ZYX.
pub fn quat2euler(q: [f64; 4]) -> (f64, f64, f64) {
    rotation(q).euler_angles()
}

/// Rotates `v` by `q` (body to world for PX4 attitudes).
pub fn quatrot(v: [f64; 3], q: [f64; 4]) -> [f64; 3] {
    let r = rotation(q) * Vector3::new(v[0], v[1], v[2]);
    [r.x, r.y, r.z]
}

/// Rotates `v` by the conjugate of `q` (world to body for PX4 attitudes).
pub fn quatrot_inverse(v: [f64; 3], q: [f64; 4]) -> [f64; 3] {
    quatrot(v, [q[0], -q[1], -q[2], -q[3]])
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    Vector3::from(a).dot(&Vector3::from(b))
}

// Column-wise versions. All inputs must have the same length.

pub fn series_quat2euler(q: [&Array1<f64>; 4]) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let n = q[0].len();
    let mut roll = Array1::<f64>::zeros(n);
    let mut pitch = Array1::<f64>::zeros(n);
    let mut yaw = Array1::<f64>::zeros(n);
    for i in 0..n {
        let (r, p, y) = quat2euler([q[0][i], q[1][i], q[2][i], q[3][i]]);
        roll[i] = r;
        pitch[i] = p;
        yaw[i] = y;
    }
    (roll, pitch, yaw)
}

pub fn series_quatrot(v: [&Array1<f64>; 3], q: [&Array1<f64>; 4]) -> [Array1<f64>; 3] {
    let n = v[0].len();
    let mut out = [Array1::<f64>::zeros(n), Array1::<f64>::zeros(n), Array1::<f64>::zeros(n)];
    for i in 0..n {
        let r = quatrot([v[0][i], v[1][i], v[2][i]], [q[0][i], q[1][i], q[2][i], q[3][i]]);
        for (axis, value) in r.iter().enumerate() {
            out[axis][i] = *value;
        }
    }
    out
}

/// World to body, row by row.
pub fn series_quatrot_inverse(v: [&Array1<f64>; 3], q: [&Array1<f64>; 4]) -> [Array1<f64>; 3] {
    let conjugate = [q[0].clone(), -q[1], -q[2], -q[3]];
    series_quatrot(v, [&conjugate[0], &conjugate[1], &conjugate[2], &conjugate[3]])
}

pub fn series_dot(a: [&Array1<f64>; 3], b: [&Array1<f64>; 3]) -> Array1<f64> {
    (0..a[0].len())
        .map(|i| dot([a[0][i], a[1][i], a[2][i]], [b[0][i], b[1][i], b[2][i]]))
        .collect()
}

/// Planar norm `sqrt(x^2 + y^2)`.
pub fn series_pythagoras(x: &Array1<f64>, y: &Array1<f64>) -> Array1<f64> {
    Zip::from(x).and(y).map_collect(|&a, &b| a.hypot(b))
}

/// `asin(sin(x))`: folds an angle difference into [-pi/2, pi/2].
pub fn angle_wrap(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.sin().asin())
}


// src/data_analysis/math.rs
