use serde::{Deserialize, Serialize};

use crate::TimePoint;

/// A single payload placed on a timeline at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent<E> {
    pub time: TimePoint,
    #[serde(rename = "event", alias = "payload")]
    pub payload: E,
}

impl<E> TimelineEvent<E> {
    pub fn new(time: impl Into<TimePoint>, payload: E) -> Self {
        Self {
            time: time.into(),
            payload,
        }
    }
}

/// One labelled row of the diagram: an optional activation window plus the
/// events that happened on it.
///
/// A missing `start_time` means the timeline is active from the start of the
/// grid; a missing `end_time` means it stays active through the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline<L, E> {
    pub label: L,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<TimePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimePoint>,
    #[serde(default = "Vec::new")]
    pub events: Vec<TimelineEvent<E>>,
}

impl<L, E> Timeline<L, E> {
    pub fn new(label: L) -> Self {
        Self {
            label,
            start_time: None,
            end_time: None,
            events: Vec::new(),
        }
    }

    pub fn starting_at(mut self, time: impl Into<TimePoint>) -> Self {
        self.start_time = Some(time.into());
        self
    }

    pub fn ending_at(mut self, time: impl Into<TimePoint>) -> Self {
        self.end_time = Some(time.into());
        self
    }

    pub fn with_event(mut self, time: impl Into<TimePoint>, payload: E) -> Self {
        self.events.push(TimelineEvent::new(time, payload));
        self
    }

    /// Whether the timeline is active before any of its events are applied.
    ///
    /// Only a start time other than `[0, 0]` makes it start inactive.
    pub fn is_active_at_start(&self) -> bool {
        self.start_time.is_none_or(|start| start.is_zero())
    }

    /// Convert every payload, keeping label, window and times.
    pub fn map_payloads<F>(self, mut f: impl FnMut(E) -> F) -> Timeline<L, F> {
        Timeline {
            label: self.label,
            start_time: self.start_time,
            end_time: self.end_time,
            events: self
                .events
                .into_iter()
                .map(|event| TimelineEvent {
                    time: event.time,
                    payload: f(event.payload),
                })
                .collect(),
        }
    }
}
