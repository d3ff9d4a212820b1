//! JSON documents describing timelines to render.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use syncline_protocol::{RecordedSubscription, Timeline};
use thiserror::Error;

use crate::format::GridStyle;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to detect document format")]
    UnknownFormat,
}

/// A label or event payload taken verbatim from JSON.
///
/// Strings display without quotes, `null` as `?`, everything else as
/// compact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub Value);

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            Value::Null => f.write_str("?"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload(Value::String(text.to_string()))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload(Value::String(text))
    }
}

pub type JsonTimeline = Timeline<Payload, Payload>;

/// Everything needed for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub timelines: Vec<JsonTimeline>,
    pub style: Option<GridStyle>,
}

#[derive(Deserialize)]
struct TimelinesDocument {
    timelines: Vec<JsonTimeline>,
    #[serde(default)]
    style: Option<GridStyle>,
}

#[derive(Deserialize)]
struct Recording {
    label: Payload,
    subscription: RecordedSubscription<Payload>,
}

#[derive(Deserialize)]
struct RecordingsDocument {
    recordings: Vec<Recording>,
    #[serde(default)]
    style: Option<GridStyle>,
}

/// Detect the document shape and parse it.
///
/// Accepted shapes:
/// 1. A top-level array of timelines.
/// 2. An object with `timelines` and an optional `style`.
/// 3. An object with `recordings` (label plus recorded subscription) and an
///    optional `style`; each recording becomes a bracketed timeline.
pub fn parse_document(data: &[u8]) -> Result<Document, InputError> {
    let value: Value = serde_json::from_slice(data)?;

    if value.is_array() {
        return Ok(Document {
            timelines: serde_json::from_value(value)?,
            style: None,
        });
    }

    if let Some(obj) = value.as_object() {
        if obj.contains_key("timelines") {
            let doc: TimelinesDocument = serde_json::from_value(value)?;
            return Ok(Document {
                timelines: doc.timelines,
                style: doc.style,
            });
        }

        if obj.contains_key("recordings") {
            let doc: RecordingsDocument = serde_json::from_value(value)?;
            let timelines = doc
                .recordings
                .into_iter()
                .map(|recording| {
                    recording
                        .subscription
                        .into_timeline(recording.label)
                        .map_payloads(|marble| Payload::from(marble.to_string()))
                })
                .collect();
            return Ok(Document {
                timelines,
                style: doc.style,
            });
        }
    }

    Err(InputError::UnknownFormat)
}
