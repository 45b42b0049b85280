//! Event and session records as returned by the community platform API.
//!
//! Only the fields sessiondir reads are typed. Everything else is kept in
//! `extra` so shards and session files keep the full remote payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::UNKNOWN_LOCATION;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub chapter: Option<Chapter>,

    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Minimal event, mostly useful for tests and fixtures.
    pub fn new(id: u64, name: &str, chapter: &str) -> Self {
        Event {
            id,
            name: Some(name.to_string()),
            chapter: Some(Chapter {
                name: Some(chapter.to_string()),
                extra: Map::new(),
            }),
            start_time: None,
            extra: Map::new(),
        }
    }

    /// The chapter an event belongs to doubles as its location.
    pub fn location(&self) -> &str {
        self.chapter
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(untitled)")
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Event {}: {} ({})", self.id, self.display_name(), self.location())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,

    #[serde(default)]
    pub event_id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub presentation_url: Option<String>,

    #[serde(default)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<Value>>,

    #[serde(default)]
    pub session_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    pub fn new(id: u64, event_id: u64, name: &str, start_time: &str) -> Self {
        Session {
            id,
            event_id: Some(event_id),
            name: Some(name.to_string()),
            start_time: Some(start_time.to_string()),
            end_time: None,
            description: None,
            presentation_url: None,
            video_url: None,
            tags: None,
            session_type: None,
            extra: Map::new(),
        }
    }
}
