//! Recorded subscriptions and their conversion into timelines.
//!
//! Recorders capture what a subscriber saw, stamping every occurrence with a
//! [`TimePoint`] handed out by an [`OrderCoordinator`]. The records here are
//! plain data; turning one into a [`Timeline`] places a `^` at subscription,
//! one marble per notification, and a `<` at unsubscription.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TimePoint, Timeline, TimelineEvent};

/// What a subscriber was told.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Notification<T> {
    #[serde(rename = "N")]
    Next { value: T },
    #[serde(rename = "C")]
    Complete,
    #[serde(rename = "E")]
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedNotification<T> {
    pub time: TimePoint,
    pub notification: Notification<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSubscription<T> {
    pub subscribed: TimePoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribed: Option<TimePoint>,
    #[serde(default = "Vec::new")]
    pub notifications: Vec<RecordedNotification<T>>,
}

/// Marble-diagram payload for a recorded subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum Marble<T> {
    Subscribe,
    Value(T),
    Complete,
    Error(String),
    Unsubscribe,
}

impl<T: fmt::Display> fmt::Display for Marble<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marble::Subscribe => f.write_str("^"),
            Marble::Value(value) => fmt::Display::fmt(value, f),
            Marble::Complete => f.write_str("|"),
            Marble::Error(_) => f.write_str("#"),
            Marble::Unsubscribe => f.write_str("<"),
        }
    }
}

impl<T> From<Notification<T>> for Marble<T> {
    fn from(notification: Notification<T>) -> Self {
        match notification {
            Notification::Next { value } => Marble::Value(value),
            Notification::Complete => Marble::Complete,
            Notification::Error { error } => Marble::Error(error),
        }
    }
}

impl<T> RecordedSubscription<T> {
    /// Build the timeline of this subscription: active from subscription to
    /// unsubscription, bracketed by `^` and `<`.
    pub fn into_timeline<L>(self, label: L) -> Timeline<L, Marble<T>> {
        let mut events = Vec::with_capacity(self.notifications.len() + 2);
        events.push(TimelineEvent::new(self.subscribed, Marble::Subscribe));
        events.extend(
            self.notifications
                .into_iter()
                .map(|recorded| TimelineEvent::new(recorded.time, recorded.notification.into())),
        );
        if let Some(unsubscribed) = self.unsubscribed {
            events.push(TimelineEvent::new(unsubscribed, Marble::Unsubscribe));
        }

        Timeline {
            label,
            start_time: Some(self.subscribed),
            end_time: self.unsubscribed,
            events,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("time {time} is earlier than the last stamped time {last}")]
pub struct TimeRegression {
    pub time: u64,
    pub last: u64,
}

/// Hands out [`TimePoint`]s for a non-decreasing stream of clock readings.
///
/// Repeated readings get increasing `order` values; a later reading restarts
/// the order at zero.
#[derive(Debug, Clone, Default)]
pub struct OrderCoordinator {
    last_time: u64,
    next_order: u64,
}

impl OrderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&mut self, time: u64) -> Result<TimePoint, TimeRegression> {
        if time < self.last_time {
            return Err(TimeRegression {
                time,
                last: self.last_time,
            });
        }
        if time > self.last_time {
            self.last_time = time;
            self.next_order = 0;
        }
        let point = TimePoint::new(time, self.next_order);
        self.next_order += 1;
        Ok(point)
    }
}
