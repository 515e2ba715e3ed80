use log::{debug, info, trace};
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    config::{active_config, PeakPolicy, PeopleCounterConfig, Thresholds},
    occupancy::ZoneOccupancyTracker,
    path_correlator::{EpisodeAggregate, PathCorrelator},
    peak_detector::PeakDetector,
    trace::CounterTraceSample,
    types::{
        ActionBuffer, CounterAction, DistanceSample, EpisodeStateId, PathEvent,
        SampleDisposition, Zone, ZoneStatus,
    },
};

#[derive(Clone, Copy, Debug)]
enum CounterEvent {
    Sample(DistanceSample),
    Retune(Tuning),
    Reinitialize,
}

#[derive(Clone, Copy, Debug)]
enum Tuning {
    Geometry {
        floor: i32,
        floor_to_ceiling: i32,
        vacancy_percent: u8,
    },
    DetectorFloor(i32),
    WindowSize(usize),
    DispersionTolerance(u16),
    Policy(PeakPolicy),
    VariationTolerance(u16),
    VacancyPercent(u8),
}

#[derive(Default)]
struct DispatchContext {
    actions: ActionBuffer,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CounterOutput {
    pub actions: ActionBuffer,
    pub trace: CounterTraceSample,
}

/// Two-zone doorway counter fed one `(zone, distance)` sample at a time.
pub struct PeopleCounter {
    machine: statig::blocking::StateMachine<EpisodeHsm>,
}

impl Default for PeopleCounter {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl PeopleCounter {
    pub fn new(config: &PeopleCounterConfig) -> Self {
        Self {
            machine: EpisodeHsm::new(config).state_machine(),
        }
    }

    /// Recomputes the floor, ceiling and vacancy thresholds. Detector floors follow
    /// the new vacancy threshold.
    pub fn configure(&mut self, floor_threshold: i32, floor_to_ceiling: i32, vacancy_percent: u8) {
        self.retune(Tuning::Geometry {
            floor: floor_threshold,
            floor_to_ceiling,
            vacancy_percent,
        });
    }

    pub fn set_peak_detector_floor(&mut self, floor: i32) {
        self.retune(Tuning::DetectorFloor(floor));
    }

    pub fn set_peak_detector_window_size(&mut self, window_size: usize) {
        self.retune(Tuning::WindowSize(window_size));
    }

    pub fn set_peak_detector_dispersion_tolerance(&mut self, tolerance: u16) {
        self.retune(Tuning::DispersionTolerance(tolerance));
    }

    pub fn set_peak_detector_policy(&mut self, policy: PeakPolicy) {
        self.retune(Tuning::Policy(policy));
    }

    pub fn set_peak_variation_tolerance(&mut self, tolerance: u16) {
        self.retune(Tuning::VariationTolerance(tolerance));
    }

    /// Moves only the occupancy threshold; detector floors are left alone.
    pub fn set_vacancy_threshold(&mut self, vacancy_percent: u8) {
        self.retune(Tuning::VacancyPercent(vacancy_percent));
    }

    pub fn add_data(&mut self, distance: i32, zone: Zone) -> CounterOutput {
        self.add_sample(DistanceSample::new(zone, distance))
    }

    pub fn add_sample(&mut self, sample: DistanceSample) -> CounterOutput {
        self.dispatch(CounterEvent::Sample(sample))
    }

    /// Clears every zone, detector, window and the carry-over slot, and zeroes the count.
    pub fn reinitialize(&mut self) -> CounterOutput {
        self.dispatch(CounterEvent::Reinitialize)
    }

    pub fn zone_status(&self, zone: Zone) -> ZoneStatus {
        self.machine.inner().occupancy.status(zone)
    }

    pub fn people_count(&self) -> i32 {
        self.machine.inner().people_count
    }

    pub fn state_id(&self) -> EpisodeStateId {
        self.machine.inner().state_id()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.machine.inner().thresholds
    }

    pub fn detector(&self, zone: Zone) -> &PeakDetector {
        &self.machine.inner().detectors[zone.index()]
    }

    pub fn aggregate(&self) -> &EpisodeAggregate {
        &self.machine.inner().aggregate
    }

    pub fn correlator(&self) -> &PathCorrelator {
        &self.machine.inner().correlator
    }

    pub fn pre_window(&self) -> Option<PathEvent> {
        self.machine.inner().correlator.pre_window()
    }

    pub fn last_trace(&self) -> CounterTraceSample {
        self.machine.inner().last_trace
    }

    fn retune(&mut self, tuning: Tuning) {
        let _ = self.dispatch(CounterEvent::Retune(tuning));
    }

    fn dispatch(&mut self, event: CounterEvent) -> CounterOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        CounterOutput {
            actions: context.actions,
            trace: self.machine.inner().last_trace,
        }
    }
}

struct EpisodeHsm {
    thresholds: Thresholds,
    occupancy: ZoneOccupancyTracker,
    detectors: [PeakDetector; 2],
    correlator: PathCorrelator,
    aggregate: EpisodeAggregate,
    people_count: i32,
    last_trace: CounterTraceSample,
}

impl EpisodeHsm {
    fn new(config: &PeopleCounterConfig) -> Self {
        let thresholds = Thresholds::from_config(&config.thresholds);
        let detector_config = &config.peak_detector;
        let detector_floor = detector_config.floor.unwrap_or(thresholds.vacancy);
        let detector = {
            let mut detector = PeakDetector::new(detector_floor);
            detector.configure(
                detector_floor,
                usize::from(detector_config.window_size),
                detector_config.dispersion_tolerance,
            );
            detector.set_policy(detector_config.policy);
            detector
        };

        Self {
            thresholds,
            occupancy: ZoneOccupancyTracker::new(),
            detectors: [detector.clone(), detector],
            correlator: PathCorrelator::new(config.peak_variation_tolerance),
            aggregate: EpisodeAggregate::default(),
            people_count: 0,
            last_trace: CounterTraceSample::default(),
        }
    }

    fn state_id(&self) -> EpisodeStateId {
        if self.occupancy.both_vacant() {
            EpisodeStateId::Idle
        } else {
            EpisodeStateId::Crossing
        }
    }

    fn retune(&mut self, tuning: Tuning) {
        match tuning {
            Tuning::Geometry {
                floor,
                floor_to_ceiling,
                vacancy_percent,
            } => {
                self.thresholds = Thresholds::new(floor, floor_to_ceiling, vacancy_percent);
                let vacancy = self.thresholds.vacancy;
                self.detectors.iter_mut().for_each(|d| d.set_floor(vacancy));
            }
            Tuning::DetectorFloor(floor) => {
                self.detectors.iter_mut().for_each(|d| d.set_floor(floor));
            }
            Tuning::WindowSize(size) => {
                self.detectors.iter_mut().for_each(|d| d.set_window_size(size));
            }
            Tuning::DispersionTolerance(tolerance) => {
                self.detectors.iter_mut().for_each(|d| d.set_tolerance(tolerance));
            }
            Tuning::Policy(policy) => {
                self.detectors.iter_mut().for_each(|d| d.set_policy(policy));
            }
            Tuning::VariationTolerance(tolerance) => {
                self.correlator.set_variation_tolerance(tolerance);
            }
            Tuning::VacancyPercent(percent) => {
                self.thresholds.set_vacancy_percent(percent);
            }
        }
        debug!("counter: retuned {:?} thresholds={:?}", tuning, self.thresholds);
    }

    fn reinitialize(&mut self) {
        self.occupancy.reset();
        self.detectors.iter_mut().for_each(PeakDetector::reset);
        self.correlator.reinitialize();
        self.aggregate = EpisodeAggregate::default();
        self.people_count = 0;
        self.last_trace = CounterTraceSample::default();
        info!("counter: reinitialized");
    }

    /// Returns `false` for samples outside the sensing range, which change nothing.
    fn admit(&mut self, state_id: EpisodeStateId, sample: DistanceSample) -> bool {
        trace!(
            "sample: zone={:?} distance={} state={:?}",
            sample.zone,
            sample.distance,
            state_id
        );
        if self.thresholds.contains(sample.distance) {
            return true;
        }
        self.update_trace(state_id, SampleDisposition::OutOfRange, sample);
        false
    }

    fn open_episode(&mut self) {
        self.detectors.iter_mut().for_each(PeakDetector::reset);
        self.aggregate = EpisodeAggregate::default();
        self.correlator.clear_window();
    }

    fn ingest(&mut self, context: &mut DispatchContext, sample: DistanceSample) -> SampleDisposition {
        let zone = sample.zone;
        let status = self
            .occupancy
            .update(zone, sample.distance, self.thresholds.vacancy);

        let mut fired = false;
        let disposition = if status == ZoneStatus::Occupied {
            if let Some(peak) = self.detectors[zone.index()].add_distance(sample.distance) {
                debug!("peak: zone={:?} distance={}", zone, peak);
                self.correlator.record_event(zone, peak);
                context
                    .actions
                    .push(CounterAction::PeakDetected { zone, distance: peak });
                fired = true;
            }
            SampleDisposition::Fed
        } else {
            SampleDisposition::ZoneVacant
        };

        self.update_aggregate(context, zone, fired);
        disposition
    }

    fn update_aggregate(&mut self, context: &mut DispatchContext, zone: Zone, fired: bool) {
        let own = &self.detectors[zone.index()];
        let other = &self.detectors[zone.other().index()];
        if own.peak_count() == 1 && other.peak_count() == 0 {
            self.aggregate.first_peak_zone = Some(zone);
        }
        // A vacated zone's window may still hold its minimum; only a fresh peak counts.
        if fired {
            self.aggregate.last_peak_zone = Some(zone);
        }
        if self.occupancy.both_occupied() {
            self.aggregate.zone_overlap = true;
        }

        if self.correlator.buffer_full() {
            self.resolve_path(context);
            self.correlator.clear_window();
        }
    }

    fn resolve_path(&mut self, context: &mut DispatchContext) {
        if let Some(outcome) = self.correlator.flush(&mut self.aggregate) {
            context.actions.push(CounterAction::PathResolved(outcome));
        }
    }

    fn close_episode(&mut self, context: &mut DispatchContext) {
        if !self.correlator.buffer_full() {
            self.resolve_path(context);
        }

        let applied = self.aggregate.settled_change();
        self.people_count += applied;
        context.actions.push(CounterAction::EpisodeClosed {
            marginal_change: self.aggregate.marginal_change,
            applied,
        });

        if applied != 0 {
            info!(
                "counter: episode closed change={} count={}",
                applied, self.people_count
            );
        } else {
            debug!(
                "counter: episode closed without change aggregate={:?}",
                self.aggregate
            );
        }
    }

    fn update_trace(
        &mut self,
        state_id: EpisodeStateId,
        disposition: SampleDisposition,
        sample: DistanceSample,
    ) {
        self.last_trace = CounterTraceSample {
            state_id,
            disposition,
            zone: sample.zone,
            distance: sample.distance,
            left_status: self.occupancy.status(Zone::Left),
            right_status: self.occupancy.status(Zone::Right),
            window_count: self.correlator.count(),
            left_peaks: self.detectors[Zone::Left.index()].peak_count(),
            right_peaks: self.detectors[Zone::Right.index()].peak_count(),
            marginal_change: self.aggregate.marginal_change,
            num_peaks: self.aggregate.num_peaks,
            people_count: self.people_count,
        };
    }
}

#[state_machine(initial = "State::idle()")]
impl EpisodeHsm {
    /// Both zones vacant. The first in-range sample starts a fresh episode even when it
    /// does not occupy its zone.
    #[state(superstate = "tracking")]
    fn idle(&mut self, context: &mut DispatchContext, event: &CounterEvent) -> Outcome<State> {
        match event {
            CounterEvent::Sample(sample) => {
                if !self.admit(EpisodeStateId::Idle, *sample) {
                    return Handled;
                }

                self.open_episode();
                let engages = sample.distance < self.thresholds.vacancy;
                if engages {
                    debug!("counter: episode opened by {:?}", sample.zone);
                    context.actions.push(CounterAction::EpisodeOpened);
                }

                let disposition = self.ingest(context, *sample);
                self.update_trace(EpisodeStateId::Idle, disposition, *sample);
                if self.occupancy.both_vacant() {
                    // Nothing was recorded, so there is nothing to settle.
                    return Handled;
                }
                Transition(State::crossing())
            }
            _ => Super,
        }
    }

    #[state(superstate = "tracking")]
    fn crossing(&mut self, context: &mut DispatchContext, event: &CounterEvent) -> Outcome<State> {
        match event {
            CounterEvent::Sample(sample) => {
                if !self.admit(EpisodeStateId::Crossing, *sample) {
                    return Handled;
                }

                let disposition = self.ingest(context, *sample);
                if self.occupancy.both_vacant() {
                    self.close_episode(context);
                    self.update_trace(EpisodeStateId::Crossing, disposition, *sample);
                    return Transition(State::idle());
                }
                self.update_trace(EpisodeStateId::Crossing, disposition, *sample);
                Handled
            }
            _ => Super,
        }
    }

    #[superstate]
    fn tracking(&mut self, context: &mut DispatchContext, event: &CounterEvent) -> Outcome<State> {
        let _ = context;
        match event {
            CounterEvent::Retune(tuning) => {
                self.retune(*tuning);
                Handled
            }
            CounterEvent::Reinitialize => {
                self.reinitialize();
                Transition(State::idle())
            }
            CounterEvent::Sample(_) => Handled,
        }
    }
}
