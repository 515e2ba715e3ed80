use super::types::{EpisodeStateId, SampleDisposition, Zone, ZoneStatus};

#[derive(Clone, Copy, Debug, Default)]
pub struct CounterTraceSample {
    pub state_id: EpisodeStateId,
    pub disposition: SampleDisposition,
    pub zone: Zone,
    pub distance: i32,
    pub left_status: ZoneStatus,
    pub right_status: ZoneStatus,
    pub window_count: u8,
    pub left_peaks: u16,
    pub right_peaks: u16,
    pub marginal_change: i32,
    pub num_peaks: u16,
    pub people_count: i32,
}

impl CounterTraceSample {
    pub fn status(&self, zone: Zone) -> ZoneStatus {
        match zone {
            Zone::Left => self.left_status,
            Zone::Right => self.right_status,
        }
    }
}
