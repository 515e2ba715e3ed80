use log::debug;

use super::types::{FlushOutcome, PathEvent, Zone};

pub const DEFAULT_PEAK_VARIATION_TOLERANCE: u16 = 10;

/// Per-episode tally the correlator and the counter build up between two idle moments.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EpisodeAggregate {
    pub first_peak_zone: Option<Zone>,
    pub last_peak_zone: Option<Zone>,
    pub zone_overlap: bool,
    /// Only the parity is meaningful.
    pub num_peaks: u16,
    pub marginal_change: i32,
}

impl EpisodeAggregate {
    /// Signed change to apply at episode end; zero unless both zones were occupied at once.
    pub fn settled_change(&self) -> i32 {
        if !self.zone_overlap {
            return 0;
        }
        let reversed = self.first_peak_zone == self.last_peak_zone && self.num_peaks % 2 == 1;
        if reversed {
            -self.marginal_change
        } else {
            self.marginal_change
        }
    }
}

/// Two-slot matching window plus the carry-over slot that outlives it.
#[derive(Clone, Copy, Debug)]
pub struct PathCorrelator {
    slots: [Option<PathEvent>; 2],
    count: u8,
    buffer_full: bool,
    pre_window: Option<PathEvent>,
    variation_tolerance: u16,
}

impl Default for PathCorrelator {
    fn default() -> Self {
        Self::new(DEFAULT_PEAK_VARIATION_TOLERANCE)
    }
}

impl PathCorrelator {
    pub const fn new(variation_tolerance: u16) -> Self {
        Self {
            slots: [None; 2],
            count: 0,
            buffer_full: false,
            pre_window: None,
            variation_tolerance,
        }
    }

    pub fn set_variation_tolerance(&mut self, tolerance: u16) {
        self.variation_tolerance = tolerance;
    }

    pub fn variation_tolerance(&self) -> u16 {
        self.variation_tolerance
    }

    pub fn record_event(&mut self, zone: Zone, peak_distance: i32) {
        let event = PathEvent {
            zone,
            peak_distance,
        };
        match (self.count, self.slots[0]) {
            (0, _) | (_, None) => {
                self.slots[0] = Some(event);
                self.count = 1;
            }
            (1, Some(first)) if first.zone != zone => {
                self.buffer_full = true;
                self.pre_window = Some(event);
                self.slots[1] = Some(event);
                self.count = 2;
            }
            (1, Some(first)) => {
                self.pre_window = Some(first);
                self.slots[0] = Some(event);
            }
            _ => {
                self.slots[1] = Some(event);
            }
        }
    }

    /// Resolves the window into `aggregate`, leaving the slots in place.
    pub fn flush(&self, aggregate: &mut EpisodeAggregate) -> Option<FlushOutcome> {
        let first = self.slots[0]?;
        let direction = first.zone.pair_direction();

        let outcome = match self.slots[1] {
            Some(second) if second.zone != first.zone => {
                let spread = (first.peak_distance - second.peak_distance).unsigned_abs();
                if spread <= u32::from(self.variation_tolerance) {
                    aggregate.marginal_change += direction.delta();
                    aggregate.num_peaks = aggregate.num_peaks.wrapping_add(2);
                    FlushOutcome::MatchedPair(direction)
                } else {
                    aggregate.num_peaks = aggregate.num_peaks.wrapping_add(1);
                    FlushOutcome::UnrelatedPair
                }
            }
            Some(_) => return None,
            None => match self.pre_window {
                Some(carried) if carried.zone == first.zone.other() => {
                    aggregate.marginal_change -= direction.delta();
                    aggregate.num_peaks = aggregate.num_peaks.wrapping_add(1);
                    FlushOutcome::CarryOver(direction.reversed())
                }
                _ => return None,
            },
        };

        debug!(
            "path: flush {:?} marginal={} peaks={}",
            outcome, aggregate.marginal_change, aggregate.num_peaks
        );
        Some(outcome)
    }

    pub fn clear_window(&mut self) {
        self.slots = [None; 2];
        self.count = 0;
        self.buffer_full = false;
    }

    pub fn reinitialize(&mut self) {
        self.clear_window();
        self.pre_window = None;
    }

    pub fn buffer_full(&self) -> bool {
        self.buffer_full
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn slots(&self) -> [Option<PathEvent>; 2] {
        self.slots
    }

    pub fn pre_window(&self) -> Option<PathEvent> {
        self.pre_window
    }
}

#[cfg(test)]
mod tests;
