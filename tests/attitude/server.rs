extern crate nyx_attitude as nyx;

use super::FailingStrategy;
use crate::test_data_dir;
use approx::assert_abs_diff_eq;
use nyx::attitude::scanlaw::{Msl, Nsl, ScanningLawParameters};
use nyx::attitude::{AttitudeIndex, AttitudeIntervalRecord, AttitudeStrategy};
use nyx::io::{AttitudeConfig, ConfigRepr};
use nyx::linalg::UnitQuaternion;
use nyx::time::{Epoch, Unit};
use nyx::{OrientationProvider, OrientationServer};
use rstest::*;
use std::sync::Arc;

#[fixture]
fn server() -> OrientationServer {
    let _ = pretty_env_logger::try_init();
    let mut cfg = AttitudeConfig::load(test_data_dir().join("server.yaml")).unwrap();
    cfg.attitude_dir = Some(test_data_dir().join("attitudes"));
    OrientationServer::from_config(&cfg).unwrap()
}

fn single_regime(strategy: Box<dyn AttitudeStrategy>, activation: Epoch) -> OrientationServer {
    let mut index = AttitudeIndex::new();
    index.insert(AttitudeIntervalRecord::new(
        "UNDER_TEST",
        activation,
        30 * Unit::Day,
        strategy,
        "under_test.yaml",
    ));
    OrientationServer::with_index(Arc::new(index), ScanningLawParameters::default())
}

#[rstest]
fn identity_before_mission_start(server: OrientationServer) {
    assert!(!server.is_approximate_only());
    let before = Epoch::from_gregorian_utc_at_midnight(2014, 1, 1);
    assert_eq!(server.attitude_at(before), UnitQuaternion::identity());
    assert_eq!(server.current_regime_label(), None);
}

#[rstest]
fn regime_changes(server: OrientationServer) {
    let epsl_time = Epoch::from_gregorian_utc_hms(2014, 7, 30, 6, 0, 0);
    let msl_time = Epoch::from_gregorian_utc_hms(2014, 8, 22, 3, 0, 0);

    let q_epsl = server.attitude_at(epsl_time);
    assert_eq!(server.current_regime_label().as_deref(), Some("EPSL_P"));
    assert_eq!(server.current_orientation(), q_epsl);

    let q_msl = server.attitude_at(msl_time);
    assert_eq!(server.current_regime_label().as_deref(), Some("MSL_COMMISSIONING"));
    assert_eq!(server.current_orientation(), q_msl);
    assert_abs_diff_eq!(q_msl.norm(), 1.0, epsilon = 1e-12);

    // Going back in time switches back to the previous regime
    assert_eq!(server.attitude_at(epsl_time), q_epsl);
    assert_eq!(server.current_regime_label().as_deref(), Some("EPSL_P"));
}

#[rstest]
fn repeated_queries_are_identical(server: OrientationServer) {
    let epoch = Epoch::from_gregorian_utc_hms(2014, 8, 22, 12, 34, 56);
    let first = server.attitude_at(epoch);
    server.attitude_at(Epoch::from_gregorian_utc_at_midnight(2016, 6, 1));
    assert_eq!(server.attitude_at(epoch), first);
}

#[test]
fn failing_regime_uses_default_law() {
    let activation = Epoch::from_gregorian_utc_at_midnight(2015, 1, 1);
    let server = single_regime(Box::new(FailingStrategy), activation);
    let nsl = Nsl::new(ScanningLawParameters::default()).unwrap();

    for hours in [0_i64, 5, 49] {
        let epoch = activation + hours * Unit::Hour;
        assert_eq!(server.attitude_at(epoch), nsl.orientation_at(epoch).unwrap());
    }
    assert_eq!(server.current_regime_label().as_deref(), Some("UNDER_TEST"));
}

#[test]
fn uninitialized_msl_uses_default_law() {
    let activation = Epoch::from_gregorian_utc_at_midnight(2015, 1, 1);
    let msl = Msl::new(ScanningLawParameters::default(), activation);
    assert!(!msl.is_initialized());
    let server = single_regime(Box::new(msl), activation);
    let nsl = Nsl::new(ScanningLawParameters::default()).unwrap();

    let epoch = activation + 2 * Unit::Hour;
    assert_eq!(server.attitude_at(epoch), nsl.orientation_at(epoch).unwrap());
}

#[test]
fn approximate_only() {
    let params = ScanningLawParameters::default();
    let mut server = OrientationServer::approximate_only(params);
    assert!(server.is_approximate_only());
    assert!(server.index().is_none());
    assert!(server.has_orientation());
    assert_eq!(server.current_orientation(), UnitQuaternion::identity());

    let nsl = Nsl::new(params).unwrap();
    // Even before any regime would have started
    let epoch = Epoch::from_gregorian_utc_at_midnight(2001, 3, 4);
    assert_eq!(server.update_orientation(epoch), Some(nsl.orientation_at(epoch).unwrap()));
    assert_eq!(OrientationProvider::current_orientation(&server), nsl.orientation_at(epoch).unwrap());
    assert_eq!(server.current_regime_label(), None);
}

#[test]
fn without_directory_the_server_is_approximate() {
    let cfg = AttitudeConfig::default();
    assert!(cfg.attitude_dir.is_none());
    let server = OrientationServer::from_config(&cfg).unwrap();
    assert!(server.is_approximate_only());
}

#[test]
fn invalid_default_law_keeps_last_attitude() {
    let params = ScanningLawParameters {
        scan_rate_arcsec_s: -1.0,
        ..Default::default()
    };
    let server = OrientationServer::approximate_only(params);
    let epoch = Epoch::from_gregorian_utc_at_midnight(2020, 1, 1);
    assert_eq!(server.attitude_at(epoch), UnitQuaternion::identity());
}

#[test]
fn shared_between_threads() {
    let server = Arc::new(OrientationServer::approximate_only(ScanningLawParameters::default()));
    let start = Epoch::from_gregorian_utc_at_midnight(2020, 1, 1);
    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let server = Arc::clone(&server);
            std::thread::spawn(move || server.attitude_at(start + i * Unit::Minute))
        })
        .collect();
    for handle in handles {
        let q = handle.join().unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-12);
    }
}
