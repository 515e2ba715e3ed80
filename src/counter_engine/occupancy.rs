use super::types::{Zone, ZoneStatus};

/// Vacant/occupied hysteresis for both zones around a single vacancy threshold.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoneOccupancyTracker {
    statuses: [ZoneStatus; 2],
}

impl ZoneOccupancyTracker {
    pub const fn new() -> Self {
        Self {
            statuses: [ZoneStatus::Vacant; 2],
        }
    }

    /// Applies one in-range distance to `zone` and returns its status afterwards.
    pub fn update(&mut self, zone: Zone, distance: i32, vacancy_threshold: i32) -> ZoneStatus {
        let status = &mut self.statuses[zone.index()];
        *status = next_status(*status, distance, vacancy_threshold);
        *status
    }

    pub fn status(&self, zone: Zone) -> ZoneStatus {
        self.statuses[zone.index()]
    }

    pub fn both_vacant(&self) -> bool {
        self.statuses.iter().all(|s| *s == ZoneStatus::Vacant)
    }

    pub fn both_occupied(&self) -> bool {
        self.statuses.iter().all(|s| *s == ZoneStatus::Occupied)
    }

    pub fn reset(&mut self) {
        self.statuses = [ZoneStatus::Vacant; 2];
    }
}

pub fn next_status(current: ZoneStatus, distance: i32, vacancy_threshold: i32) -> ZoneStatus {
    match current {
        ZoneStatus::Vacant if distance < vacancy_threshold => ZoneStatus::Occupied,
        ZoneStatus::Occupied if distance >= vacancy_threshold => ZoneStatus::Vacant,
        unchanged => unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_value_itself_reads_as_vacant() {
        assert_eq!(next_status(ZoneStatus::Vacant, 1720, 1720), ZoneStatus::Vacant);
        assert_eq!(next_status(ZoneStatus::Vacant, 1719, 1720), ZoneStatus::Occupied);
        assert_eq!(next_status(ZoneStatus::Occupied, 1719, 1720), ZoneStatus::Occupied);
        assert_eq!(next_status(ZoneStatus::Occupied, 1720, 1720), ZoneStatus::Vacant);
    }

    #[test]
    fn zones_are_tracked_independently() {
        let mut tracker = ZoneOccupancyTracker::new();
        assert!(tracker.both_vacant());

        assert_eq!(tracker.update(Zone::Left, 1500, 1720), ZoneStatus::Occupied);
        assert_eq!(tracker.status(Zone::Right), ZoneStatus::Vacant);
        assert!(!tracker.both_vacant());
        assert!(!tracker.both_occupied());

        tracker.update(Zone::Right, 900, 1720);
        assert!(tracker.both_occupied());

        tracker.update(Zone::Left, 1790, 1720);
        tracker.update(Zone::Right, 1720, 1720);
        assert!(tracker.both_vacant());
    }
}
