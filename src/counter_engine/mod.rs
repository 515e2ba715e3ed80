pub mod config;
pub mod episode_hsm;
pub mod occupancy;
pub mod path_correlator;
pub mod peak_detector;
pub mod shared;
pub mod trace;
pub mod types;

pub use config::{active_config, PeakPolicy, PeopleCounterConfig, Thresholds};
pub use episode_hsm::{CounterOutput, PeopleCounter};
pub use occupancy::ZoneOccupancyTracker;
pub use path_correlator::{EpisodeAggregate, PathCorrelator};
pub use peak_detector::PeakDetector;
pub use shared::{SampleQueue, SharedPeopleCounter};
pub use trace::CounterTraceSample;
pub use types::{
    ActionBuffer, CounterAction, Direction, DistanceSample, EpisodeStateId, FlushOutcome,
    PathEvent, SampleDisposition, Zone, ZoneStatus,
};
