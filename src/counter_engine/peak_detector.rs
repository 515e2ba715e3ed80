use heapless::Vec;

use super::config::{PeakPolicy, LENIENT_SLOPE_MARGIN, MAX_WINDOW_SIZE};

pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_DISPERSION_TOLERANCE: u16 = 10;

/// Sliding-window local-minimum detector for one zone.
///
/// Distances above the floor are ignored. Once the window is full, it is split at
/// `window_size / 2` and the summed sample-to-sample differences of each half are
/// compared: a falling left half followed by a rising right half whose sum stays
/// within the dispersion tolerance is a peak. The window is emptied on the sample
/// after a peak so the same minimum is never reported twice.
#[derive(Clone, Debug)]
pub struct PeakDetector {
    floor: i32,
    window_size: usize,
    tolerance: u16,
    policy: PeakPolicy,
    window: Vec<i32, MAX_WINDOW_SIZE>,
    last_peak: i32,
    second_last_peak: i32,
    largest_peak: i32,
    peak_count: u16,
}

impl PeakDetector {
    pub fn new(floor: i32) -> Self {
        Self {
            floor,
            window_size: DEFAULT_WINDOW_SIZE,
            tolerance: DEFAULT_DISPERSION_TOLERANCE,
            policy: PeakPolicy::Strict,
            window: Vec::new(),
            last_peak: floor,
            second_last_peak: floor,
            largest_peak: floor,
            peak_count: 0,
        }
    }

    pub fn configure(&mut self, floor: i32, window_size: usize, tolerance: u16) {
        self.floor = floor;
        self.set_window_size(window_size);
        self.tolerance = tolerance;
    }

    pub fn set_floor(&mut self, floor: i32) {
        self.floor = floor;
    }

    /// Clamps to `1..=MAX_WINDOW_SIZE`; shrinking drops the oldest samples.
    pub fn set_window_size(&mut self, window_size: usize) {
        self.window_size = window_size.clamp(1, MAX_WINDOW_SIZE);
        while self.window.len() > self.window_size {
            self.window.remove(0);
        }
    }

    pub fn set_tolerance(&mut self, tolerance: u16) {
        self.tolerance = tolerance;
    }

    pub fn set_policy(&mut self, policy: PeakPolicy) {
        self.policy = policy;
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.last_peak = self.floor;
        self.second_last_peak = self.floor;
        self.largest_peak = self.floor;
        self.peak_count = 0;
    }

    /// Feeds one distance, returning the peak distance when this sample completes one.
    pub fn add_distance(&mut self, distance: i32) -> Option<i32> {
        if self.peak_pending() {
            self.window.clear();
        }
        if distance > self.floor {
            return None;
        }

        if self.window.len() >= self.window_size {
            self.window.remove(0);
        }
        if self.window.push(distance).is_err() {
            return None;
        }

        if !self.peak_pending() {
            return None;
        }

        let peak = self.window_minimum();
        self.second_last_peak = self.last_peak;
        self.last_peak = peak;
        self.largest_peak = self.largest_peak.min(peak);
        self.peak_count = self.peak_count.wrapping_add(1);
        Some(peak)
    }

    /// True while the window still holds the last detected peak.
    fn peak_pending(&self) -> bool {
        if self.window.len() < self.window_size {
            return false;
        }
        let (left, right) = half_window_slopes(&self.window);
        if (left + right).unsigned_abs() > u64::from(self.tolerance) {
            return false;
        }
        let margin = i64::from(LENIENT_SLOPE_MARGIN);
        match self.policy {
            PeakPolicy::Strict => left < 0 && right > 0,
            PeakPolicy::Lenient => left < margin && right > -margin,
        }
    }

    // The oldest slot only anchors the left slope.
    fn window_minimum(&self) -> i32 {
        self.window
            .iter()
            .skip(1)
            .copied()
            .min()
            .or_else(|| self.window.first().copied())
            .unwrap_or(self.floor)
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn tolerance(&self) -> u16 {
        self.tolerance
    }

    pub fn policy(&self) -> PeakPolicy {
        self.policy
    }

    pub fn window(&self) -> &[i32] {
        &self.window
    }

    pub fn last_peak(&self) -> i32 {
        self.last_peak
    }

    pub fn second_last_peak(&self) -> i32 {
        self.second_last_peak
    }

    /// Smallest distance recorded as a peak since the last reset.
    pub fn largest_peak(&self) -> i32 {
        self.largest_peak
    }

    pub fn peak_count(&self) -> u16 {
        self.peak_count
    }
}

/// Summed differences of the two window halves split at `len / 2`.
///
/// Widened to `i64` so any pair of `i32` readings fits.
pub fn half_window_slopes(window: &[i32]) -> (i64, i64) {
    let Some((&first, &last)) = window.first().zip(window.last()) else {
        return (0, 0);
    };
    let middle = i64::from(window[window.len() / 2]);
    (middle - i64::from(first), i64::from(last) - middle)
}
