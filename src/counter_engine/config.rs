pub const MAX_WINDOW_SIZE: usize = 16;

/// Slope rule applied by the peak test once the dispersion check passes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PeakPolicy {
    /// Distances strictly fall towards the middle of the window and rise after it.
    #[default]
    Strict,
    /// Both half-window slopes stay within [`LENIENT_SLOPE_MARGIN`] of flat.
    Lenient,
}

pub const LENIENT_SLOPE_MARGIN: i32 = 20;

#[derive(Clone, Copy, Debug)]
pub struct ThresholdConfig {
    pub floor: i32,
    pub floor_to_ceiling: i32,
    pub vacancy_percent: u8,
}

#[derive(Clone, Copy, Debug)]
pub struct PeakDetectorConfig {
    /// Falls back to the zone vacancy threshold when unset.
    pub floor: Option<i32>,
    pub window_size: u8,
    pub dispersion_tolerance: u16,
    pub policy: PeakPolicy,
}

#[derive(Clone, Copy, Debug)]
pub struct PeopleCounterConfig {
    pub thresholds: ThresholdConfig,
    pub peak_detector: PeakDetectorConfig,
    pub peak_variation_tolerance: u16,
}

include!(concat!(env!("OUT_DIR"), "/counter_config.rs"));

pub fn active_config() -> &'static PeopleCounterConfig {
    &COUNTER_CONFIG
}

/// Distance thresholds derived from a [`ThresholdConfig`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Thresholds {
    pub floor: i32,
    pub ceiling: i32,
    pub vacancy: i32,
}

impl Thresholds {
    pub fn new(floor: i32, floor_to_ceiling: i32, vacancy_percent: u8) -> Self {
        let ceiling = floor - floor_to_ceiling.abs();
        Self {
            floor,
            ceiling,
            vacancy: vacancy_threshold(floor, ceiling, vacancy_percent),
        }
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::new(config.floor, config.floor_to_ceiling, config.vacancy_percent)
    }

    pub fn contains(&self, distance: i32) -> bool {
        (self.ceiling..=self.floor).contains(&distance)
    }

    pub fn set_vacancy_percent(&mut self, percent: u8) {
        self.vacancy = vacancy_threshold(self.floor, self.ceiling, percent);
    }
}

/// `floor + (ceiling - floor) * percent / 100`, truncating toward zero.
pub fn vacancy_threshold(floor: i32, ceiling: i32, percent: u8) -> i32 {
    floor + (ceiling - floor) * i32::from(percent) / 100
}
