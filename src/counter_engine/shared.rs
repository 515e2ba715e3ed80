use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex},
    channel::{Channel, TrySendError},
};

use super::{
    config::PeopleCounterConfig,
    episode_hsm::{CounterOutput, PeopleCounter},
    types::{DistanceSample, Zone, ZoneStatus},
};

/// A [`PeopleCounter`] callable from several execution contexts.
///
/// Every call runs inside the mutex, so samples from different producers are applied
/// one at a time in lock order.
pub struct SharedPeopleCounter<M: RawMutex> {
    inner: Mutex<M, RefCell<PeopleCounter>>,
}

impl<M: RawMutex> SharedPeopleCounter<M> {
    pub fn new(counter: PeopleCounter) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(counter)),
        }
    }

    pub fn from_config(config: &PeopleCounterConfig) -> Self {
        Self::new(PeopleCounter::new(config))
    }

    pub fn add_data(&self, distance: i32, zone: Zone) -> CounterOutput {
        self.with(|counter| counter.add_data(distance, zone))
    }

    pub fn people_count(&self) -> i32 {
        self.with(|counter| counter.people_count())
    }

    pub fn zone_status(&self, zone: Zone) -> ZoneStatus {
        self.with(|counter| counter.zone_status(zone))
    }

    pub fn reinitialize(&self) {
        let _ = self.with(PeopleCounter::reinitialize);
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut PeopleCounter) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<M: RawMutex> Default for SharedPeopleCounter<M> {
    fn default() -> Self {
        Self::new(PeopleCounter::default())
    }
}

/// Bounded hand-off from interrupt-side producers to a single consuming task.
pub struct SampleQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, DistanceSample, N>,
}

impl<M: RawMutex, const N: usize> SampleQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Hands the sample back when the queue is full.
    pub fn try_push(&self, sample: DistanceSample) -> Result<(), DistanceSample> {
        self.channel.try_send(sample).map_err(|err| match err {
            TrySendError::Full(sample) => sample,
        })
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Feeds every queued sample to `counter` in arrival order, returning how many were applied.
    pub fn drain_into(&self, counter: &mut PeopleCounter) -> usize {
        let mut applied = 0;
        while let Ok(sample) = self.channel.try_receive() {
            let _ = counter.add_sample(sample);
            applied += 1;
        }
        applied
    }
}

impl<M: RawMutex, const N: usize> Default for SampleQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
