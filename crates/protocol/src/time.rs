use serde::{Deserialize, Serialize};

/// An instant on the shared time axis.
///
/// `time` is the virtual clock reading; `order` breaks ties between
/// occurrences that share the same reading. Points compare by `time` first,
/// then by `order`.
///
/// Serialized as `[time, order]`. Deserialization also accepts a bare
/// number, which is read as `[time, 0]`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "RawTimePoint", into = "(u64, u64)")]
pub struct TimePoint {
    pub time: u64,
    pub order: u64,
}

impl TimePoint {
    pub const ZERO: TimePoint = TimePoint { time: 0, order: 0 };

    pub fn new(time: u64, order: u64) -> Self {
        Self { time, order }
    }

    /// A point at `time` with no tie-break order.
    pub fn at(time: u64) -> Self {
        Self { time, order: 0 }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<u64> for TimePoint {
    fn from(time: u64) -> Self {
        Self::at(time)
    }
}

impl From<(u64, u64)> for TimePoint {
    fn from((time, order): (u64, u64)) -> Self {
        Self::new(time, order)
    }
}

impl From<TimePoint> for (u64, u64) {
    fn from(point: TimePoint) -> Self {
        (point.time, point.order)
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.time, self.order)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimePoint {
    Bare(u64),
    Pair(u64, u64),
}

impl From<RawTimePoint> for TimePoint {
    fn from(raw: RawTimePoint) -> Self {
        match raw {
            RawTimePoint::Bare(time) => Self::at(time),
            RawTimePoint::Pair(time, order) => Self::new(time, order),
        }
    }
}
