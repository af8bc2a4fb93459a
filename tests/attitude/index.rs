extern crate nyx_attitude as nyx;

use super::FailingStrategy;
use nyx::attitude::scanlaw::{Nsl, ScanningLawParameters};
use nyx::attitude::{assign_durations, AttitudeIndex, AttitudeIntervalRecord};
use nyx::time::{Duration, Epoch, Unit};
use rstest::*;

#[fixture]
fn activations() -> Vec<Epoch> {
    vec![
        Epoch::from_gregorian_utc_hms(2014, 7, 25, 10, 30, 0),
        Epoch::from_gregorian_utc_at_midnight(2014, 8, 22),
        Epoch::from_gregorian_utc_at_midnight(2016, 1, 1),
    ]
}

fn index_of(activations: &[Epoch]) -> AttitudeIndex {
    let mut index = AttitudeIndex::new();
    // Inserted out of order on purpose
    for (i, activation) in activations.iter().enumerate().rev() {
        let strategy = Nsl::new(ScanningLawParameters::default()).unwrap();
        index.insert(AttitudeIntervalRecord::new(
            format!("REGIME_{i}"),
            *activation,
            1 * Unit::Day,
            Box::new(strategy),
            format!("regime_{i}.yaml"),
        ));
    }
    index
}

#[rstest]
fn find_active_interval(activations: Vec<Epoch>) {
    let index = index_of(&activations);
    assert_eq!(index.len(), 3);

    assert!(index.find_active(activations[0] - 1 * Unit::Nanosecond).is_none());
    assert!(index.find_active(Epoch::from_gregorian_utc_at_midnight(2000, 1, 1)).is_none());

    for (i, activation) in activations.iter().enumerate() {
        assert_eq!(index.find_active(*activation).unwrap().name, format!("REGIME_{i}"));
        if let Some(next) = activations.get(i + 1) {
            let just_before_next = *next - 1 * Unit::Nanosecond;
            assert_eq!(index.find_active(just_before_next).unwrap().name, format!("REGIME_{i}"));
        }
    }

    // The last regime stays active forever, even past its own duration
    let far_future = activations[2] + 100 * Unit::Century;
    let last = index.find_active(far_future).unwrap();
    assert_eq!(last.name, "REGIME_2");
    assert!(!last.contains(far_future));
}

#[rstest]
fn iteration_in_activation_order(activations: Vec<Epoch>) {
    let index = index_of(&activations);
    let ordered: Vec<Epoch> = index.iter().map(|record| record.activation).collect();
    assert_eq!(ordered, activations);
    assert_eq!(index.first().unwrap().name, "REGIME_0");
    assert_eq!(index.last().unwrap().name, "REGIME_2");
    assert_eq!((&index).into_iter().count(), 3);
}

#[test]
fn record_bounds() {
    let activation = Epoch::from_gregorian_utc_at_midnight(2015, 1, 1);
    let record = AttitudeIntervalRecord::new(
        "FAILING",
        activation,
        2 * Unit::Hour,
        Box::new(FailingStrategy),
        "failing.yaml",
    );
    assert_eq!(record.end(), activation + 2 * Unit::Hour);
    assert!(record.contains(activation));
    assert!(record.contains(activation + 119 * Unit::Minute));
    assert!(!record.contains(activation + 2 * Unit::Hour));
    assert!(!record.contains(activation - 1 * Unit::Second));
    assert!(record.orientation_at(activation).is_err());
}

#[test]
fn insert_same_activation_replaces() {
    let activation = Epoch::from_gregorian_utc_at_midnight(2015, 1, 1);
    let mut index = AttitudeIndex::new();
    let first = AttitudeIntervalRecord::new("A", activation, Duration::ZERO, Box::new(FailingStrategy), "a.yaml");
    let second = AttitudeIntervalRecord::new("B", activation, Duration::ZERO, Box::new(FailingStrategy), "b.yaml");
    assert!(index.insert(first).is_none());
    assert_eq!(index.insert(second).unwrap().name, "A");
    assert_eq!(index.len(), 1);
}

#[rstest]
fn durations_until_mission_end(activations: Vec<Epoch>) {
    let mission_end = Epoch::from_gregorian_utc_hms(2026, 9, 14, 17, 44, 20);
    let durations = assign_durations(&activations, mission_end);
    assert_eq!(durations.len(), activations.len());
    assert_eq!(durations[0], activations[1] - activations[0]);
    assert_eq!(durations[1], activations[2] - activations[1]);
    assert_eq!(durations[2], mission_end - activations[2]);
    assert_eq!(durations[0], 27 * Unit::Day + 13 * Unit::Hour + 30 * Unit::Minute);
}

#[test]
fn durations_edge_cases() {
    let mission_end = Epoch::from_gregorian_utc_at_midnight(2020, 1, 1);
    assert!(assign_durations(&[], mission_end).is_empty());
    let after_end = mission_end + 1 * Unit::Day;
    assert_eq!(assign_durations(&[after_end], mission_end), vec![Duration::ZERO]);
}
