// src/data_analysis/utm.rs

use ndarray::Array1;

use crate::constants::{
    UTM_E, UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_K0, UTM_LAT_MAX_DEG, UTM_LAT_MIN_DEG,
    UTM_R, UTM_ZONE_LETTERS,
};
use crate::error::{Error, Result};

/// A WGS84 position projected to UTM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoord {
    pub easting: f64,  // [m]
    pub northing: f64, // [m]
    pub zone_number: u32,
    pub zone_letter: char,
}

/// Latitude band letter. The caller checks the latitude range.
fn zone_letter(lat: f64) -> char {
    let idx = ((lat - UTM_LAT_MIN_DEG) as usize) >> 3;
    UTM_ZONE_LETTERS[idx.min(UTM_ZONE_LETTERS.len() - 1)] as char
}

/// Zone number, including the Norway (32V) and Svalbard exceptions.
fn zone_number(lat: f64, lon: f64) -> u32 {
    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }
    if (72.0..=84.0).contains(&lat) && lon >= 0.0 {
        if lon < 9.0 {
            return 31;
        } else if lon < 21.0 {
            return 33;
        } else if lon < 33.0 {
            return 35;
        } else if lon < 42.0 {
            return 37;
        }
    }
    // lon = 180 wraps to zone 1
    (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u32 + 1
}

fn central_longitude(zone_number: u32) -> f64 {
    (zone_number as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Projects `lat`/`lon` [deg] to UTM.
pub fn from_latlon(lat: f64, lon: f64) -> Result<UtmCoord> {
    if !(UTM_LAT_MIN_DEG..=UTM_LAT_MAX_DEG).contains(&lat) {
        return Err(Error::LatitudeOutOfRange(lat));
    }

    let e2 = UTM_E * UTM_E;
    let e3 = e2 * UTM_E;
    let e_p2 = UTM_E / (1.0 - UTM_E);

    let m1 = 1.0 - UTM_E / 4.0 - 3.0 * e2 / 64.0 - 5.0 * e3 / 256.0;
    let m2 = 3.0 * UTM_E / 8.0 + 3.0 * e2 / 32.0 + 45.0 * e3 / 1024.0;
    let m3 = 15.0 * e2 / 256.0 + 45.0 * e3 / 1024.0;
    let m4 = 35.0 * e3 / 3072.0;

    let lat_rad = lat.to_radians();
    let lat_sin = lat_rad.sin();
    let lat_cos = lat_rad.cos();
    let lat_tan = lat_sin / lat_cos;
    let lat_tan2 = lat_tan * lat_tan;
    let lat_tan4 = lat_tan2 * lat_tan2;

    let zone_number = zone_number(lat, lon);
    let central_lon_rad = central_longitude(zone_number).to_radians();

    let n = UTM_R / (1.0 - UTM_E * lat_sin * lat_sin).sqrt();
    let c = e_p2 * lat_cos * lat_cos;

    let a = lat_cos * (lon.to_radians() - central_lon_rad);
    let m = UTM_R
        * (m1 * lat_rad - m2 * (2.0 * lat_rad).sin() + m3 * (4.0 * lat_rad).sin()
            - m4 * (6.0 * lat_rad).sin());

    let easting = UTM_K0
        * n
        * (a + a.powi(3) / 6.0 * (1.0 - lat_tan2 + c)
            + a.powi(5) / 120.0 * (5.0 - 18.0 * lat_tan2 + lat_tan4 + 72.0 * c - 58.0 * e_p2))
        + UTM_FALSE_EASTING;

    let mut northing = UTM_K0
        * (m + n
            * lat_tan
            * (a * a / 2.0
                + a.powi(4) / 24.0 * (5.0 - lat_tan2 + 9.0 * c + 4.0 * c * c)
                + a.powi(6) / 720.0 * (61.0 - 58.0 * lat_tan2 + lat_tan4 + 600.0 * c - 330.0 * e_p2)));

    if lat < 0.0 {
        northing += UTM_FALSE_NORTHING_SOUTH;
    }

    Ok(UtmCoord {
        easting,
        northing,
        zone_number,
        zone_letter: zone_letter(lat),
    })
}

/// Column-wise projection returning `(easting, northing, zone_number)`.
/// Rows where either coordinate is NaN stay NaN.
pub fn series_utm(lat: &Array1<f64>, lon: &Array1<f64>) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>)> {
    let n = lat.len();
    let mut easting = Array1::from_elem(n, f64::NAN);
    let mut northing = Array1::from_elem(n, f64::NAN);
    let mut zone = Array1::from_elem(n, f64::NAN);

    for i in 0..n {
        if lat[i].is_nan() || lon[i].is_nan() {
            continue;
        }
        let utm = from_latlon(lat[i], lon[i])?;
        easting[i] = utm.easting;
        northing[i] = utm.northing;
        zone[i] = utm.zone_number as f64;
    }
    Ok((easting, northing, zone))
}


// src/data_analysis/utm.rs
