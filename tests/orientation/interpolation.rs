extern crate nyx_attitude as nyx;

use crate::test_data_dir;
use approx::assert_abs_diff_eq;
use nyx::linalg::{Quaternion, UnitQuaternion, Vector3, Vector4};
use nyx::orientation::{InterpolationMethod, OrientationError, QuaternionInterpolator, TimeSample};
use nyx::time::{Duration, Epoch, Unit};
use nyx::OrientationProvider;
use rstest::*;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4, FRAC_PI_8};

fn load(method: InterpolationMethod) -> QuaternionInterpolator {
    let _ = pretty_env_logger::try_init();
    QuaternionInterpolator::from_file(test_data_dir().join("quaternions.txt"), method).unwrap()
}

/// Epoch at the provided fraction between two epochs
fn between(start: Epoch, end: Epoch, num: i128, den: i128) -> Epoch {
    start + Duration::from_total_nanoseconds((end - start).total_nanoseconds() * num / den)
}

#[rstest]
#[case(InterpolationMethod::Nlerp)]
#[case(InterpolationMethod::Slerp)]
fn loads_valid_samples(#[case] method: InterpolationMethod) {
    let interp = load(method);
    assert_eq!(interp.method(), method);
    assert_eq!(interp.samples().len(), 3);
    assert!(interp.has_orientation());
    let epochs: Vec<Epoch> = interp.samples().iter().map(|s| s.epoch).collect();
    assert!(epochs.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(interp.samples()[0].q, UnitQuaternion::identity());
}

#[rstest]
#[case(InterpolationMethod::Nlerp)]
#[case(InterpolationMethod::Slerp)]
fn clamped_outside_of_samples(#[case] method: InterpolationMethod) {
    let interp = load(method);
    let first = interp.samples()[0];
    let last = interp.samples()[2];
    assert_eq!(interp.interpolate(first.epoch - 1 * Unit::Day), Some(first.q));
    assert_eq!(interp.interpolate(first.epoch), Some(first.q));
    assert_eq!(interp.interpolate(last.epoch), Some(last.q));
    assert_eq!(interp.interpolate(last.epoch + 1 * Unit::Hour), Some(last.q));
}

#[rstest]
#[case(InterpolationMethod::Nlerp)]
#[case(InterpolationMethod::Slerp)]
fn midpoint_bisects_the_rotation(#[case] method: InterpolationMethod) {
    let interp = load(method);
    let (s1, s2) = (interp.samples()[1], interp.samples()[2]);
    // From a quarter turn to a half turn about Z
    let q = interp.interpolate(between(s1.epoch, s2.epoch, 1, 2)).unwrap();
    let angle = 3.0 * FRAC_PI_4;
    assert_abs_diff_eq!(q * Vector3::x(), Vector3::new(angle.cos(), angle.sin(), 0.0), epsilon = 1e-9);
    assert_abs_diff_eq!(q * Vector3::z(), Vector3::z(), epsilon = 1e-9);
}

const T0_MS: f64 = 1_600_000_000_000.0;

/// Identity at `T0_MS`, half turn about Z one second later
fn half_turn(method: InterpolationMethod) -> QuaternionInterpolator {
    let sample = |unix_ms: f64, x: f64, y: f64, z: f64, w: f64| TimeSample {
        epoch: Epoch::from_unix_milliseconds(unix_ms),
        q: UnitQuaternion::new_normalize(Quaternion::new(w, x, y, z)),
    };
    QuaternionInterpolator::from_samples(
        vec![sample(T0_MS, 0.0, 0.0, 0.0, 1.0), sample(T0_MS + 1000.0, 0.0, 0.0, 1.0, 0.0)],
        method,
    )
}

#[rstest]
#[case(InterpolationMethod::Nlerp)]
#[case(InterpolationMethod::Slerp)]
fn half_turn_midpoint(#[case] method: InterpolationMethod) {
    let q = half_turn(method)
        .interpolate(Epoch::from_unix_milliseconds(T0_MS + 500.0))
        .unwrap();
    // Normalized average of both samples, as (x, y, z, w)
    let expected = Vector4::new(0.0, 0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2);
    assert_abs_diff_eq!(q.coords, expected, epsilon = 1e-12);
}

#[test]
fn nlerp_and_slerp_differ_off_midpoint() {
    let epoch = Epoch::from_unix_milliseconds(T0_MS + 250.0);
    let nlerp = half_turn(InterpolationMethod::Nlerp).interpolate(epoch).unwrap();
    let slerp = half_turn(InterpolationMethod::Slerp).interpolate(epoch).unwrap();

    // Nlerp normalizes 0.75 q0 + 0.25 q1
    let norm = 0.625_f64.sqrt();
    assert_abs_diff_eq!(nlerp.coords, Vector4::new(0.0, 0.0, 0.25 / norm, 0.75 / norm), epsilon = 1e-12);
    // Slerp is a quarter of the half turn
    assert_abs_diff_eq!(
        slerp.coords,
        Vector4::new(0.0, 0.0, FRAC_PI_8.sin(), FRAC_PI_8.cos()),
        epsilon = 1e-12
    );
    assert!((nlerp.coords - slerp.coords).norm() > 1e-2);
}

#[test]
fn slerp_has_constant_angular_rate() {
    let interp = load(InterpolationMethod::Slerp);
    let (s0, s1) = (interp.samples()[0], interp.samples()[1]);
    let q = interp.interpolate(between(s0.epoch, s1.epoch, 1, 4)).unwrap();
    let angle = FRAC_PI_4 / 2.0;
    assert_abs_diff_eq!(q * Vector3::x(), Vector3::new(angle.cos(), angle.sin(), 0.0), epsilon = 1e-9);
}

#[rstest]
#[case(InterpolationMethod::Nlerp)]
#[case(InterpolationMethod::Slerp)]
fn results_are_unit_quaternions(#[case] method: InterpolationMethod) {
    let mut interp = load(method);
    let (start, end) = (interp.samples()[0].epoch, interp.samples()[2].epoch);
    for num in 0..=20 {
        let q = interp.update_orientation(between(start, end, num, 20)).unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-12);
        assert_eq!(interp.current_orientation(), q);
    }
}

#[test]
fn no_samples() {
    let mut interp = QuaternionInterpolator::parse("# nothing here\n\n", InterpolationMethod::Nlerp);
    let epoch = Epoch::from_gregorian_utc_at_midnight(2020, 1, 1);
    assert!(!interp.has_orientation());
    assert!(interp.interpolate(epoch).is_none());
    assert!(interp.update_orientation(epoch).is_none());
    assert_eq!(interp.current_orientation(), UnitQuaternion::identity());
}

#[test]
fn missing_file() {
    let err = QuaternionInterpolator::from_file(
        test_data_dir().join("no_such_file.txt"),
        InterpolationMethod::Nlerp,
    )
    .unwrap_err();
    assert!(matches!(err, OrientationError::SampleFile { .. }));
}
