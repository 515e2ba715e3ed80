// @generated by counter_config_compiler. Do not edit.
pub static COUNTER_CONFIG: PeopleCounterConfig = PeopleCounterConfig {
    thresholds: ThresholdConfig {
        floor: 1800,
        floor_to_ceiling: 1600,
        vacancy_percent: 5,
    },
    peak_detector: PeakDetectorConfig {
        floor: None,
        window_size: 5,
        dispersion_tolerance: 10,
        policy: PeakPolicy::Strict,
    },
    peak_variation_tolerance: 10,
};
