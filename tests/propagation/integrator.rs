extern crate nyx_attitude as nyx;

use approx::assert_abs_diff_eq;
use nyx::linalg::{SVector, Vector1, Vector2};
use nyx::propagators::integrate;
use nyx::time::{Duration, Epoch, Unit};
use rstest::*;

#[fixture]
fn start() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2014, 8, 22)
}

#[rstest]
fn same_epoch_is_a_no_op(start: Epoch) {
    let y0 = Vector2::new(1.0, -2.0);
    let y = integrate(
        |_, _: &SVector<f64, 2>| Err("the derivative must not be called"),
        start,
        &y0,
        start,
        150 * Unit::Second,
        Unit::Day,
    )
    .unwrap();
    assert_eq!(y, y0);
}

#[rstest]
fn bit_for_bit_reproducible(start: Epoch) {
    let derivative = |t: Epoch, y: &Vector2<f64>| {
        let days = (t - start).to_unit(Unit::Day);
        Ok::<_, ()>(Vector2::new(y[1] * days.cos(), -y[0]))
    };
    let end = start + 3 * Unit::Day + 17 * Unit::Minute + 3 * Unit::Second;
    let y0 = Vector2::new(0.1, 0.2);
    let first = integrate(derivative, start, &y0, end, 150 * Unit::Second, Unit::Day).unwrap();
    let second = integrate(derivative, start, &y0, end, 150 * Unit::Second, Unit::Day).unwrap();
    assert_eq!(first[0].to_bits(), second[0].to_bits());
    assert_eq!(first[1].to_bits(), second[1].to_bits());
}

#[rstest]
fn exponential_decay(start: Epoch) {
    let y = integrate(
        |_, y: &Vector1<f64>| Ok::<_, ()>(-y),
        start,
        &Vector1::new(1.0),
        start + 1 * Unit::Day,
        150 * Unit::Second,
        Unit::Day,
    )
    .unwrap();
    assert_abs_diff_eq!(y[0], (-1.0_f64).exp(), epsilon = 1e-12);
}

#[rstest]
#[case(Unit::Second, 36_000.0)]
#[case(Unit::Hour, 10.0)]
#[case(Unit::Day, 10.0 / 24.0)]
fn derivative_time_unit(start: Epoch, #[case] unit: Unit, #[case] expected: f64) {
    // Ten hours, not a multiple of the maximum step
    let y = integrate(
        |_, _: &Vector1<f64>| Ok::<_, ()>(Vector1::new(1.0)),
        start,
        &Vector1::zeros(),
        start + 10 * Unit::Hour,
        7 * Unit::Minute,
        unit,
    )
    .unwrap();
    assert_abs_diff_eq!(y[0], expected, epsilon = 1e-9 * expected);
}

#[rstest]
fn backward_integration(start: Epoch) {
    let y = integrate(
        |_, _: &Vector1<f64>| Ok::<_, ()>(Vector1::new(2.0)),
        start,
        &Vector1::new(1.0),
        start - 12 * Unit::Hour,
        150 * Unit::Second,
        Unit::Day,
    )
    .unwrap();
    assert_abs_diff_eq!(y[0], 0.0, epsilon = 1e-12);
}

#[rstest]
fn stage_epochs_stay_in_interval(start: Epoch) {
    let end = start + 1 * Unit::Hour;
    let result = integrate(
        |t, _: &Vector1<f64>| {
            if t < start || t > end {
                Err(t)
            } else {
                Ok(Vector1::new(0.0))
            }
        },
        start,
        &Vector1::zeros(),
        end,
        Duration::from_seconds(61.0),
        Unit::Second,
    );
    assert!(result.is_ok());
}

#[rstest]
fn derivative_errors_are_propagated(start: Epoch) {
    let stop = start + 30 * Unit::Minute;
    let result = integrate(
        |t, y: &Vector1<f64>| if t > stop { Err(t) } else { Ok(-y) },
        start,
        &Vector1::new(1.0),
        start + 1 * Unit::Hour,
        150 * Unit::Second,
        Unit::Day,
    );
    assert!(result.is_err());
}
