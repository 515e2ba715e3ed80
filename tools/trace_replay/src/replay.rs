use doorway_counter::{CounterAction, DistanceSample, PeakPolicy, PeopleCounter, Zone};
use tracing::debug;

/// Overrides applied on top of the compiled-in counter configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplaySettings {
    pub geometry: Option<(i32, i32, u8)>,
    pub window_size: Option<usize>,
    pub dispersion_tolerance: Option<u16>,
    pub policy: Option<PeakPolicy>,
}

impl ReplaySettings {
    pub fn build_counter(&self) -> PeopleCounter {
        let mut counter = PeopleCounter::default();
        if let Some((floor, range, vacancy)) = self.geometry {
            counter.configure(floor, range, vacancy);
        }
        if let Some(window_size) = self.window_size {
            counter.set_peak_detector_window_size(window_size);
        }
        if let Some(tolerance) = self.dispersion_tolerance {
            counter.set_peak_detector_dispersion_tolerance(tolerance);
        }
        if let Some(policy) = self.policy {
            counter.set_peak_detector_policy(policy);
        }
        counter
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CountChange {
    pub sample_index: usize,
    pub zone: Zone,
    pub distance: i32,
    pub applied: i32,
    pub people_count: i32,
}

#[derive(Clone, Debug, Default)]
pub struct ReplayReport {
    pub samples: usize,
    pub peaks: usize,
    pub episodes: usize,
    pub changes: Vec<CountChange>,
    pub final_count: i32,
}

pub fn replay(counter: &mut PeopleCounter, samples: &[DistanceSample]) -> ReplayReport {
    let mut report = ReplayReport {
        samples: samples.len(),
        ..ReplayReport::default()
    };

    for (sample_index, sample) in samples.iter().enumerate() {
        let output = counter.add_sample(*sample);
        for action in output.actions.iter() {
            match action {
                CounterAction::PeakDetected { zone, distance } => {
                    report.peaks += 1;
                    debug!("#{sample_index}: peak {zone:?} at {distance}");
                }
                CounterAction::EpisodeClosed { applied, .. } => {
                    report.episodes += 1;
                    if *applied != 0 {
                        report.changes.push(CountChange {
                            sample_index,
                            zone: sample.zone,
                            distance: sample.distance,
                            applied: *applied,
                            people_count: output.trace.people_count,
                        });
                    }
                }
                CounterAction::EpisodeOpened | CounterAction::PathResolved(_) => {}
            }
        }
    }

    report.final_count = counter.people_count();
    report
}
