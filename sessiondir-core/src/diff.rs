//! Incremental diffing between the remote event list and local storage.

use std::collections::HashSet;

use crate::error::SessionDirResult;
use crate::record::Event;
use crate::store::{EventStore, SessionStore};

/// Remote events whose id is not stored locally, in remote order.
/// Ids repeated in the remote list are only returned once.
pub fn new_events(remote: &[Event], existing_ids: &HashSet<u64>) -> Vec<Event> {
    let mut seen = HashSet::new();

    remote
        .iter()
        .filter(|e| !existing_ids.contains(&e.id) && seen.insert(e.id))
        .cloned()
        .collect()
}

/// Stored events that have no session file yet.
pub fn missing_sessions(events: &[Event], sessions: &SessionStore) -> Vec<Event> {
    events
        .iter()
        .filter(|e| !sessions.has(e.id))
        .cloned()
        .collect()
}

/// Work an update run would do, without doing it.
#[derive(Debug, Clone, Default)]
pub struct IngestPlan {
    pub new_events: Vec<Event>,
    /// Already stored events whose sessions were never fetched.
    pub missing_sessions: Vec<Event>,
}

impl IngestPlan {
    pub fn compute(
        remote: &[Event],
        events: &EventStore,
        sessions: &SessionStore,
    ) -> SessionDirResult<Self> {
        let stored = events.events()?;
        let existing: HashSet<u64> = stored.iter().map(|e| e.id).collect();

        Ok(IngestPlan {
            new_events: new_events(remote, &existing),
            missing_sessions: missing_sessions(&stored, sessions),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.new_events.is_empty() && self.missing_sessions.is_empty()
    }
}
