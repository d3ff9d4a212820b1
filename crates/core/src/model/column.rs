use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("event for timeline {timeline} cannot follow timeline {last} in the same column")]
pub struct AppendOrderError {
    pub timeline: usize,
    pub last: usize,
}

/// One vertical slice of the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Column<'a, L, E> {
    Label(LabelColumn<'a, L>),
    Gap(GapColumn),
    Event(EventColumn<'a, E>),
}

/// Leading column holding every timeline's label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelColumn<'a, L> {
    pub labels: Vec<&'a L>,
}

/// Elapsed time between two instants, with each timeline's activity over
/// that interval.
#[derive(Debug, Clone, PartialEq)]
pub struct GapColumn {
    pub duration: u64,
    pub active: Vec<bool>,
}

impl GapColumn {
    pub fn is_active(&self, timeline: usize) -> bool {
        self.active.get(timeline).copied().unwrap_or(false)
    }

    pub fn any_active(&self) -> bool {
        self.active.iter().any(|&active| active)
    }
}

/// Payloads that share one visual slot. Slots are filled in strictly
/// increasing timeline order.
#[derive(Debug, Clone, PartialEq)]
pub struct EventColumn<'a, E> {
    pub time: u64,
    events: Vec<Option<&'a E>>,
    last_timeline: Option<usize>,
}

impl<'a, E> EventColumn<'a, E> {
    pub fn new(time: u64, timelines: usize) -> Self {
        Self {
            time,
            events: vec![None; timelines],
            last_timeline: None,
        }
    }

    /// Whether a payload for `timeline` at `time` may join this column.
    pub fn accepts(&self, time: u64, timeline: usize) -> bool {
        self.time == time && self.last_timeline.is_none_or(|last| last < timeline)
    }

    pub fn insert(&mut self, timeline: usize, payload: &'a E) -> Result<(), AppendOrderError> {
        if let Some(last) = self.last_timeline
            && last >= timeline
        {
            return Err(AppendOrderError { timeline, last });
        }
        if timeline >= self.events.len() {
            self.events.resize(timeline + 1, None);
        }
        self.events[timeline] = Some(payload);
        self.last_timeline = Some(timeline);
        Ok(())
    }

    pub fn payload(&self, timeline: usize) -> Option<&'a E> {
        self.events.get(timeline).copied().flatten()
    }

    pub fn payloads(&self) -> impl Iterator<Item = &'a E> + '_ {
        self.events.iter().flatten().copied()
    }

    pub fn last_timeline(&self) -> Option<usize> {
        self.last_timeline
    }
}
