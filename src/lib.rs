#![cfg_attr(not(test), no_std)]

pub mod counter_engine;

pub use counter_engine::{
    active_config, ActionBuffer, CounterAction, CounterOutput, CounterTraceSample, Direction,
    DistanceSample, EpisodeAggregate, EpisodeStateId, FlushOutcome, PathCorrelator, PathEvent,
    PeakDetector, PeakPolicy, PeopleCounter, PeopleCounterConfig, SampleDisposition, SampleQueue,
    SharedPeopleCounter, Thresholds, Zone, ZoneOccupancyTracker, ZoneStatus,
};
