//! Summary of the last update run, published next to the dataset as
//! `public/data/update-summary.json`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionDirResult;
use crate::record::{Event, Session};
use crate::store::{read_json, write_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBrief {
    pub id: u64,
    pub name: Option<String>,
    pub chapter: String,
    pub start_time: Option<String>,
}

impl From<&Event> for EventBrief {
    fn from(event: &Event) -> Self {
        EventBrief {
            id: event.id,
            name: event.name.clone(),
            chapter: event.location().to_string(),
            start_time: event.start_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBrief {
    pub id: u64,
    pub name: Option<String>,
    pub event_id: u64,
}

impl SessionBrief {
    /// `parent_id` is used when the session does not carry its event id.
    pub fn new(session: &Session, parent_id: u64) -> Self {
        SessionBrief {
            id: session.id,
            name: session.name.clone(),
            event_id: session.event_id.unwrap_or(parent_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub timestamp: DateTime<Utc>,
    pub new_events: usize,
    pub new_sessions: usize,

    #[serde(default)]
    pub events: Vec<EventBrief>,

    #[serde(default)]
    pub sessions: Vec<SessionBrief>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateSummary {
    pub fn new(timestamp: DateTime<Utc>, events: Vec<EventBrief>, sessions: Vec<SessionBrief>) -> Self {
        UpdateSummary {
            timestamp,
            new_events: events.len(),
            new_sessions: sessions.len(),
            events,
            sessions,
            message: None,
        }
    }

    /// A summary reporting nothing new.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, Vec::new(), Vec::new())
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Returns None if no summary has been written yet.
    pub fn load(path: &Path) -> SessionDirResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        read_json(path).map(Some)
    }

    pub fn save(&self, path: &Path) -> SessionDirResult<()> {
        write_json(path, self, b"  ")
    }

    pub fn has_updates(&self) -> bool {
        self.new_events > 0 || self.new_sessions > 0
    }

    /// Whether this run has news for someone who last looked at `seen`.
    pub fn is_newer_than(&self, seen: Option<DateTime<Utc>>) -> bool {
        self.has_updates() && seen.is_none_or(|seen| self.timestamp > seen)
    }

    /// Human-readable announcement, e.g. "2 new events and 1 new session have been added!"
    pub fn banner_message(&self) -> Option<String> {
        let events = self.new_events;
        let sessions = self.new_sessions;

        let message = match (events, sessions) {
            (0, 0) => return None,
            (e, 0) => format!("{e} new {} {} been added!", pluralize("event", e), have(e)),
            (0, s) => format!("{s} new {} {} been added!", pluralize("session", s), have(s)),
            (e, s) => format!(
                "{e} new {} and {s} new {} have been added!",
                pluralize("event", e),
                pluralize("session", s)
            ),
        };

        Some(message)
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn have(count: usize) -> &'static str {
    if count == 1 { "has" } else { "have" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(events: usize, sessions: usize) -> UpdateSummary {
        UpdateSummary {
            timestamp: Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap(),
            new_events: events,
            new_sessions: sessions,
            events: vec![],
            sessions: vec![],
            message: None,
        }
    }

    #[test]
    fn test_banner_message_pluralization() {
        assert_eq!(summary(0, 0).banner_message(), None);
        assert_eq!(
            summary(1, 0).banner_message().unwrap(),
            "1 new event has been added!"
        );
        assert_eq!(
            summary(0, 3).banner_message().unwrap(),
            "3 new sessions have been added!"
        );
        assert_eq!(
            summary(2, 1).banner_message().unwrap(),
            "2 new events and 1 new session have been added!"
        );
    }

    #[test]
    fn test_is_newer_than() {
        let s = summary(1, 0);
        assert!(s.is_newer_than(None));
        assert!(s.is_newer_than(Some(Utc.with_ymd_and_hms(2025, 8, 9, 0, 0, 0).unwrap())));
        assert!(!s.is_newer_than(Some(Utc.with_ymd_and_hms(2025, 8, 11, 0, 0, 0).unwrap())));
        assert!(!summary(0, 0).is_newer_than(None));
    }

    #[test]
    fn test_reads_summary_written_by_web_tooling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("update-summary.json");
        std::fs::write(
            &path,
            r#"{
  "timestamp": "2025-08-10T12:00:00.000Z",
  "newEvents": 1,
  "newSessions": 1,
  "events": [{"id": 9, "name": "Meetup", "chapter": "Pune", "startTime": null}],
  "sessions": [{"id": 4, "name": "Talk", "eventId": 9}]
}"#,
        )
        .unwrap();

        let loaded = UpdateSummary::load(&path).unwrap().unwrap();

        assert_eq!(loaded.events[0].chapter, "Pune");
        assert_eq!(loaded.sessions[0].event_id, 9);
    }

    #[test]
    fn test_save_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("update-summary.json");

        summary(2, 0).save(&path).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(raw["newEvents"], 2);
        assert!(raw.get("message").is_none());
        assert!(UpdateSummary::load(&dir.path().join("missing.json")).unwrap().is_none());
    }
}
