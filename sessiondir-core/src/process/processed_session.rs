use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DESCRIPTION_PREVIEW_CHARS;
use crate::record::Session;
use crate::timestamp::{format_date, parse_timestamp};

/// One row of the flattened browsing dataset (`sessions-data.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSession {
    pub id: u64,
    /// `DD-MM-YYYY`
    pub date: String,
    pub session_topic: String,
    pub location: String,
    pub event_id: u64,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub presentation_url: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub tags: Vec<Value>,
    #[serde(default)]
    pub session_type: String,
}

impl ProcessedSession {
    /// Join a session with its parent event's location.
    /// Sessions without a name or start time are not listed.
    pub fn from_session(session: &Session, event_id: u64, location: &str) -> Option<Self> {
        let name = session.name.as_deref().filter(|n| !n.is_empty())?;
        let start_time = session.start_time.as_deref().filter(|t| !t.is_empty())?;

        Some(ProcessedSession {
            id: session.id,
            date: format_date(start_time),
            session_topic: name.to_string(),
            location: location.to_string(),
            event_id,
            start_time: start_time.to_string(),
            end_time: session.end_time.clone(),
            description: session.description.clone().unwrap_or_default(),
            presentation_url: session.presentation_url.clone().unwrap_or_default(),
            video_url: session.video_url.clone().unwrap_or_default(),
            tags: session.tags.clone().unwrap_or_default(),
            session_type: session.session_type.clone().unwrap_or_default(),
        })
    }

    pub fn start_instant(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.start_time)
    }

    pub fn year(&self) -> Option<i32> {
        self.start_instant().map(|dt| dt.year())
    }

    /// Calendar date of the start time in UTC, used for date-range filters.
    pub fn utc_date(&self) -> Option<NaiveDate> {
        self.start_instant().map(|dt| dt.with_timezone(&Utc).date_naive())
    }

    pub fn has_presentation(&self) -> bool {
        !self.presentation_url.trim().is_empty()
    }

    pub fn has_video(&self) -> bool {
        !self.video_url.trim().is_empty()
    }

    /// Trimmed description, cut to a preview length with a trailing "...".
    pub fn short_description(&self) -> Option<String> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }

        if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
            return Some(description.to_string());
        }

        let truncated: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        Some(format!("{truncated}..."))
    }
}
