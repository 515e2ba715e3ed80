use super::*;
use crate::counter_engine::types::Direction;

#[test]
fn opposite_zone_completes_window_and_fills_pre_window() {
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Left, 1400);
    assert_eq!(correlator.count(), 1);
    assert!(!correlator.buffer_full());

    correlator.record_event(Zone::Right, 1405);
    assert_eq!(correlator.count(), 2);
    assert!(correlator.buffer_full());
    assert_eq!(
        correlator.pre_window(),
        Some(PathEvent {
            zone: Zone::Right,
            peak_distance: 1405
        })
    );
}

#[test]
fn same_zone_repeat_displaces_first_slot_into_pre_window() {
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Right, 1400);
    correlator.record_event(Zone::Right, 1390);

    assert_eq!(correlator.count(), 1);
    assert!(!correlator.buffer_full());
    assert_eq!(correlator.slots()[0].map(|e| e.peak_distance), Some(1390));
    assert_eq!(correlator.pre_window().map(|e| e.peak_distance), Some(1400));
}

#[test]
fn matched_pair_moves_count_in_direction_of_first_zone() {
    let mut aggregate = EpisodeAggregate::default();
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Left, 1400);
    correlator.record_event(Zone::Right, 1410);

    assert_eq!(
        correlator.flush(&mut aggregate),
        Some(FlushOutcome::MatchedPair(Direction::Entering))
    );
    assert_eq!(aggregate.marginal_change, 1);
    assert_eq!(aggregate.num_peaks, 2);

    let mut aggregate = EpisodeAggregate::default();
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Right, 1400);
    correlator.record_event(Zone::Left, 1400);
    assert_eq!(
        correlator.flush(&mut aggregate),
        Some(FlushOutcome::MatchedPair(Direction::Exiting))
    );
    assert_eq!(aggregate.marginal_change, -1);
}

#[test]
fn distant_peaks_only_bump_parity() {
    let mut aggregate = EpisodeAggregate::default();
    let mut correlator = PathCorrelator::new(10);
    correlator.record_event(Zone::Left, 1400);
    correlator.record_event(Zone::Right, 1411);

    assert_eq!(
        correlator.flush(&mut aggregate),
        Some(FlushOutcome::UnrelatedPair)
    );
    assert_eq!(aggregate.marginal_change, 0);
    assert_eq!(aggregate.num_peaks, 1);
}

#[test]
fn lone_peak_pairs_with_carried_over_opposite_event() {
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Left, 1400);
    correlator.record_event(Zone::Right, 1400);
    correlator.clear_window();
    assert!(correlator.pre_window().is_some());

    correlator.record_event(Zone::Left, 1500);
    let mut aggregate = EpisodeAggregate::default();
    assert_eq!(
        correlator.flush(&mut aggregate),
        Some(FlushOutcome::CarryOver(Direction::Exiting))
    );
    assert_eq!(aggregate.marginal_change, -1);
    assert_eq!(aggregate.num_peaks, 1);
}

#[test]
fn lone_peak_without_opposite_carry_over_is_ignored() {
    let mut aggregate = EpisodeAggregate::default();
    let mut correlator = PathCorrelator::default();
    assert_eq!(correlator.flush(&mut aggregate), None);

    correlator.record_event(Zone::Left, 1400);
    assert_eq!(correlator.flush(&mut aggregate), None);

    correlator.record_event(Zone::Left, 1300);
    assert_eq!(correlator.flush(&mut aggregate), None);
    assert_eq!(aggregate, EpisodeAggregate::default());
}

#[test]
fn reinitialize_drops_pre_window_but_clear_window_keeps_it() {
    let mut correlator = PathCorrelator::default();
    correlator.record_event(Zone::Left, 1400);
    correlator.record_event(Zone::Right, 1400);

    correlator.clear_window();
    assert_eq!(correlator.count(), 0);
    assert!(!correlator.buffer_full());
    assert!(correlator.pre_window().is_some());

    correlator.reinitialize();
    assert_eq!(correlator.pre_window(), None);
}

#[test]
fn settled_change_reverses_on_odd_parity_round_trip() {
    let aggregate = EpisodeAggregate {
        first_peak_zone: Some(Zone::Left),
        last_peak_zone: Some(Zone::Left),
        zone_overlap: true,
        num_peaks: 3,
        marginal_change: 1,
    };
    assert_eq!(aggregate.settled_change(), -1);

    let even = EpisodeAggregate {
        num_peaks: 2,
        ..aggregate
    };
    assert_eq!(even.settled_change(), 1);

    let no_overlap = EpisodeAggregate {
        zone_overlap: false,
        ..aggregate
    };
    assert_eq!(no_overlap.settled_change(), 0);
}
