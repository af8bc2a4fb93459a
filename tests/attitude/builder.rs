extern crate nyx_attitude as nyx;

use crate::test_data_dir;
use nyx::attitude::{AttitudeIntervalBuilder, ConstructionError};
use nyx::io::AttitudeConfig;
use nyx::time::{Epoch, Unit};
use rstest::*;

#[fixture]
fn builder() -> AttitudeIntervalBuilder {
    let _ = pretty_env_logger::try_init();
    AttitudeIntervalBuilder::from_config(&AttitudeConfig::default())
}

#[rstest]
fn loads_valid_descriptors(builder: AttitudeIntervalBuilder) {
    let index = builder.build(&test_data_dir().join("attitudes")).unwrap();

    // The malformed file, the one with an invalid reference epoch and the duplicate are skipped
    let names: Vec<&str> = index.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, ["EPSL_P", "MSL_COMMISSIONING", "NSL_NOMINAL"]);

    let labels: Vec<&str> = index.iter().map(|record| record.source_label.as_str()).collect();
    assert_eq!(labels, ["01_epsl_preceding.yaml", "02_msl.yaml", "03_nsl.yaml"]);

    let epsl = index.first().unwrap();
    assert_eq!(epsl.activation, Epoch::from_gregorian_utc_hms(2014, 7, 25, 10, 30, 0));
    assert_eq!(epsl.end(), Epoch::from_gregorian_utc_at_midnight(2014, 8, 22));

    // The regime which failed to build does not shorten its predecessor
    let msl = index.find_active(Epoch::from_gregorian_utc_at_midnight(2014, 9, 1)).unwrap();
    assert_eq!(msl.end(), Epoch::from_gregorian_utc_at_midnight(2016, 1, 1));

    let nsl = index.last().unwrap();
    assert_eq!(nsl.end(), AttitudeConfig::default().mission_end);

    // Every indexed strategy can be evaluated
    for record in &index {
        assert!(record.orientation_at(record.activation + 1 * Unit::Hour).is_ok());
    }
}

#[rstest]
fn missing_directory(builder: AttitudeIntervalBuilder) {
    let err = builder
        .build(&test_data_dir().join("no_such_directory"))
        .unwrap_err();
    assert!(matches!(err, ConstructionError::MissingDirectory { .. }));
}

#[rstest]
fn a_file_is_not_a_directory(builder: AttitudeIntervalBuilder) {
    let err = builder.build(&test_data_dir().join("quaternions.txt")).unwrap_err();
    assert!(matches!(err, ConstructionError::MissingDirectory { .. }));
}

#[rstest]
fn no_valid_descriptor(builder: AttitudeIntervalBuilder) {
    let err = builder
        .build(&test_data_dir().join("broken_attitudes"))
        .unwrap_err();
    assert!(matches!(err, ConstructionError::NoValidDescriptors { .. }));
}

#[rstest]
fn reduced_mode(mut builder: AttitudeIntervalBuilder) {
    builder.reduced = true;
    builder.reference_epoch = Some(Epoch::from_gregorian_utc_hms(2021, 5, 4, 13, 27, 12));
    let index = builder.build(&test_data_dir().join("attitudes")).unwrap();

    // All regimes share the same activation time, so only the first one is kept
    assert_eq!(index.len(), 1);
    let record = index.first().unwrap();
    assert_eq!(record.name, "EPSL_P");
    assert_eq!(record.activation, Epoch::from_gregorian_utc_hms(2021, 5, 3, 23, 50, 0));
    assert_eq!(record.duration, 3 * Unit::Hour + 20 * Unit::Minute);
}

#[rstest]
fn reduced_mode_overrides(mut builder: AttitudeIntervalBuilder) {
    builder.reduced = true;
    builder.overlap = 1 * Unit::Hour;
    builder.reduced_window = 1 * Unit::Day;
    builder.reference_epoch = Some(Epoch::from_gregorian_utc_at_midnight(2021, 5, 4));
    let index = builder.build(&test_data_dir().join("attitudes")).unwrap();
    let record = index.first().unwrap();
    assert_eq!(record.activation, Epoch::from_gregorian_utc_hms(2021, 5, 3, 23, 0, 0));
    assert_eq!(record.duration, 26 * Unit::Hour);
}
