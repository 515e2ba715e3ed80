/// One half of the doorway. Crossing from `Left` into `Right` counts as entering.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum Zone {
    #[default]
    Left = 0,
    Right = 1,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::Left, Zone::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Count adjustment for a matched pair whose first peak was in this zone.
    pub const fn pair_direction(self) -> Direction {
        match self {
            Self::Left => Direction::Entering,
            Self::Right => Direction::Exiting,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Entering,
    Exiting,
}

impl Direction {
    pub const fn delta(self) -> i32 {
        match self {
            Self::Entering => 1,
            Self::Exiting => -1,
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Self::Entering => Self::Exiting,
            Self::Exiting => Self::Entering,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum ZoneStatus {
    #[default]
    Vacant = 0,
    Occupied = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DistanceSample {
    pub zone: Zone,
    pub distance: i32,
}

impl DistanceSample {
    pub const fn new(zone: Zone, distance: i32) -> Self {
        Self { zone, distance }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PathEvent {
    pub zone: Zone,
    pub peak_distance: i32,
}

/// Result of resolving the path window into a count adjustment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlushOutcome {
    /// Opposite-zone peaks within the variation tolerance: one person crossed.
    MatchedPair(Direction),
    /// Opposite-zone peaks too different to belong to the same person.
    UnrelatedPair,
    /// A lone peak paired with the carried-over event from the other zone.
    CarryOver(Direction),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CounterAction {
    EpisodeOpened,
    PeakDetected { zone: Zone, distance: i32 },
    PathResolved(FlushOutcome),
    EpisodeClosed { marginal_change: i32, applied: i32 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionBuffer {
    len: usize,
    slots: [Option<CounterAction>; Self::MAX],
}

impl ActionBuffer {
    // Opened, peak, resolved and closed is the most a single sample can produce.
    pub const MAX: usize = 4;

    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; Self::MAX],
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.slots = [None; Self::MAX];
    }

    pub fn push(&mut self, action: CounterAction) {
        if self.len >= Self::MAX {
            return;
        }
        self.slots[self.len] = Some(action);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &CounterAction> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    pub fn peak_in(&self, zone: Zone) -> Option<i32> {
        self.iter().find_map(|action| match action {
            CounterAction::PeakDetected { zone: z, distance } if *z == zone => Some(*distance),
            _ => None,
        })
    }

    /// Count change applied by an episode closed on this sample, if any.
    pub fn applied_change(&self) -> Option<i32> {
        self.iter().find_map(|action| match action {
            CounterAction::EpisodeClosed { applied, .. } => Some(*applied),
            _ => None,
        })
    }
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a sample handed to the counter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum SampleDisposition {
    #[default]
    None = 0,
    OutOfRange = 1,
    ZoneVacant = 2,
    Fed = 3,
}

impl SampleDisposition {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum EpisodeStateId {
    #[default]
    Idle = 0,
    Crossing = 1,
}

impl EpisodeStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
