// src/constants.rs

// Column naming.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const TOPIC_PREFIX: &str = "T_"; // Table identity: T_<topic>_<instance>
pub const FIELD_PREFIX: &str = "F_"; // Logged field: F_<field> or F_<field>_<index>
pub const DERIVED_PREFIX: &str = "NF_"; // Derived (synthetic) column, never produced by the builder
pub const NAMESPACE_SEPARATOR: &str = "__"; // <identity>__<column>

// Raw field-name characters rewritten by the builder.
pub const FIELD_NAME_REPLACEMENTS: [(char, &str); 3] = [('[', "_"), (']', ""), ('.', "_")];

// Log timestamps are microseconds.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

// Accepted log file extension (case-insensitive).
pub const ULOG_EXTENSION: &str = "ulg";

// ulog2csv export naming next to the log file.
pub const CSV_EXTENSION: &str = "csv";
pub const PARAMS_FILE_SUFFIX: &str = "params"; // <stem>_params.csv: name,value
pub const CHANGED_PARAMS_FILE_SUFFIX: &str = "changed_params"; // <stem>_changed_params.csv: timestamp,name,value

// Topic used to recover the wall-clock date of the flight.
pub const GPS_TOPIC: &str = "vehicle_gps_position";
pub const GPS_UTC_FIELD: &str = "time_utc_usec";

// --- Global position validity window ---
// Boolean flags are logged as 0/1 and resampled, so compare against a small threshold.
pub const GLOBAL_FLAG_THRESHOLD: f64 = 0.1;
pub const LAT_MIN_DEG: f64 = -80.0;
pub const LAT_MAX_DEG: f64 = 80.0;
pub const LON_MIN_DEG: f64 = -180.0;
pub const LON_MAX_DEG: f64 = 180.0;

// --- UTM (WGS84) ---
pub const UTM_K0: f64 = 0.9996;
pub const UTM_E: f64 = 0.00669438; // First eccentricity squared
pub const UTM_R: f64 = 6_378_137.0; // Equatorial radius [m]
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
pub const UTM_LAT_MIN_DEG: f64 = -80.0;
pub const UTM_LAT_MAX_DEG: f64 = 84.0;
pub const UTM_ZONE_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWXX";

// src/constants.rs
