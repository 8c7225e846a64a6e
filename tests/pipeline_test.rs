// tests/pipeline_test.rs

use std::fs;
use std::path::{Path, PathBuf};

use ulog_resample::data_analysis::run_analysis;
use ulog_resample::data_analysis::vehicle_status::nav_state_transitions;
use ulog_resample::data_input::log_info::{add_param, duration, open_log, start_time};
use ulog_resample::{AnalysisKind, CsvLogReader, Error, ResampledLog};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// A log with local position at 0/10/20 us and a position setpoint at 0/20 us.
fn position_log(dir: &Path) -> PathBuf {
    let log = dir.join("flight.ulg");
    write(dir, "flight.ulg", "");
    write(
        dir,
        "flight_vehicle_local_position_0.csv",
        "timestamp,x,y\n0,0,0\n10,10,0\n20,20,0\n",
    );
    write(
        dir,
        "flight_vehicle_local_position_setpoint_0.csv",
        "timestamp,x,y\n0,5,nan\n20,25,nan\n",
    );
    log
}

#[test]
fn test_position_and_setpoint_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = position_log(dir.path());

    let resampled =
        ResampledLog::create(&CsvLogReader::new(), &path, AnalysisKind::LocalPosition, &[], &[])
            .unwrap();
    let table = &resampled.table;

    assert_eq!(table.timestamps(), &[0, 10, 20]);
    assert_eq!(
        table.column("T_vehicle_local_position_0__F_x").unwrap(),
        &[Some(0.0), Some(10.0), Some(20.0)]
    );
    // x is a setpoint axis whose samples are held, never interpolated.
    assert_eq!(
        table.column("T_vehicle_local_position_setpoint_0__F_x").unwrap(),
        &[Some(5.0), Some(5.0), Some(25.0)]
    );
    // y is logged as "not used" throughout.
    assert_eq!(
        table.column("T_vehicle_local_position_setpoint_0__F_y").unwrap(),
        &[None, None, None]
    );
    assert_eq!(table.time_s(), vec![0.0, 0.00001, 0.00002]);
}

#[test]
fn test_local_position_analysis_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = position_log(dir.path());

    let resampled =
        ResampledLog::create(&CsvLogReader::new(), &path, AnalysisKind::LocalPosition, &[], &[])
            .unwrap();
    let table = run_analysis(AnalysisKind::LocalPosition, resampled.table).unwrap();
    assert_eq!(
        table.column("T_vehicle_local_position_0__NF_abs_horizontal_dist").unwrap(),
        &[Some(0.0), Some(10.0), Some(20.0)]
    );

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("timestamp,"));
    assert!(header.contains("T_vehicle_local_position_setpoint_0__F_x"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn test_missing_topic_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = position_log(dir.path());

    let err = ResampledLog::create(&CsvLogReader::new(), &path, AnalysisKind::Attitude, &[], &[])
        .unwrap_err();
    assert!(matches!(err, Error::NoTopicPresent));

    let err = ResampledLog::create(
        &CsvLogReader::new(),
        &path,
        AnalysisKind::LocalPosition,
        &["vehicle_status".to_string()],
        &[],
    )
    .unwrap_err();
    match err {
        Error::MissingTopics(missing) => assert_eq!(missing, vec!["vehicle_status"]),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_file_checks_run_first() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResampledLog::create(
        &CsvLogReader::new(),
        &dir.path().join("nothing.ulg"),
        AnalysisKind::LocalPosition,
        &[],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));

    write(dir.path(), "flight.txt", "");
    let err = ResampledLog::create(
        &CsvLogReader::new(),
        &dir.path().join("flight.txt"),
        AnalysisKind::LocalPosition,
        &[],
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotULogFile(_)));
}

#[test]
fn test_vehicle_status_with_params() {
    let dir = tempfile::tempdir().unwrap();
    let path = position_log(dir.path());
    write(
        dir.path(),
        "flight_vehicle_status_0.csv",
        "timestamp,nav_state\n0,2\n15,4\n",
    );
    write(dir.path(), "flight_params.csv", "MPC_XY_P,0.95\n");
    write(dir.path(), "flight_changed_params.csv", "10,MPC_XY_P,1.2\n");

    let resampled =
        ResampledLog::create(&CsvLogReader::new(), &path, AnalysisKind::VehicleStatus, &[], &[])
            .unwrap();
    let mut table = resampled.table;
    assert_eq!(table.timestamps(), &[0, 10, 15, 20]);
    assert_eq!(
        table.column("T_vehicle_status_0__F_nav_state").unwrap(),
        &[Some(2.0), Some(2.0), Some(4.0), Some(4.0)]
    );

    let changes = nav_state_transitions(&table).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[1].nav_state, 4);

    add_param(&resampled.log, "MPC_XY_P", &mut table).unwrap();
    assert_eq!(
        table.column("NF_MPC_XY_P").unwrap(),
        &[Some(0.95), Some(1.2), Some(1.2), Some(1.2)]
    );
}

#[test]
fn test_log_info_from_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.ulg");
    write(dir.path(), "long.ulg", "");
    write(
        dir.path(),
        "long_vehicle_local_position_0.csv",
        "timestamp,x\n1200000,0\n62900000,1\n",
    );

    let log = open_log(
        &CsvLogReader::new(),
        &path,
        &["vehicle_local_position".to_string()],
    )
    .unwrap();
    assert_eq!(start_time(&log), "0:00:01");
    assert_eq!(duration(&log), "0:01:01");
}

// tests/pipeline_test.rs
