//! Flatten stored events and sessions into the browsing dataset.

mod processed_session;
mod stats;

pub use processed_session::ProcessedSession;
pub use stats::ProcessStats;

use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

use crate::constants::UNKNOWN_LOCATION;
use crate::error::SessionDirResult;
use crate::record::{Event, Session};
use crate::sessiondir::SessionDir;
use crate::store::{SessionStore, read_json, write_json};

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub sessions: Vec<ProcessedSession>,
    pub stats: ProcessStats,
    pub output_path: PathBuf,
}

/// Rebuild `public/data/sessions-data.json` from the event shards and session files.
pub fn process(sessiondir: &SessionDir) -> SessionDirResult<ProcessOutput> {
    info!("Processing session data");

    let events = sessiondir.event_store().events()?;
    let sessions = flatten(&events, &sessiondir.session_store())?;
    info!(count = sessions.len(), "Processed sessions");

    let output_path = sessiondir.sessions_data_path();
    write_json(&output_path, &sessions, b"  ")?;
    info!("Data written to {}", output_path.display());

    let stats = ProcessStats::from_sessions(&sessions);
    stats.log();

    Ok(ProcessOutput {
        sessions,
        stats,
        output_path,
    })
}

/// Join every session file with its parent event, newest sessions first.
///
/// Files whose name carries no event id, or whose content is not a JSON
/// array, are skipped with a warning, as are individual entries that are
/// not session objects.
pub fn flatten(events: &[Event], store: &SessionStore) -> SessionDirResult<Vec<ProcessedSession>> {
    let mut by_id: HashMap<u64, &Event> = HashMap::new();
    for event in events {
        by_id.entry(event.id).or_insert(event);
    }

    let files = store.files()?;
    info!(count = files.len(), "Reading session files");

    let mut processed = Vec::new();

    for file in files {
        let Some(event_id) = file.event_id else {
            warn!("Could not extract event ID from {}", file.file_name());
            continue;
        };

        let entries = match read_json::<Value>(&file.path) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("Invalid session data in {}", file.file_name());
                continue;
            }
            Err(e) => {
                warn!("Invalid session data in {}: {e}", file.file_name());
                continue;
            }
        };

        let location = by_id
            .get(&event_id)
            .map(|e| e.location())
            .unwrap_or(UNKNOWN_LOCATION);

        for entry in entries {
            match serde_json::from_value::<Session>(entry) {
                Ok(session) => {
                    processed.extend(ProcessedSession::from_session(&session, event_id, location));
                }
                Err(e) => warn!("Skipping malformed session in {}: {e}", file.file_name()),
            }
        }
    }

    // Newest first; rows with unparseable start times go last
    processed.sort_by_cached_key(|s| Reverse(s.start_instant()));

    Ok(processed)
}
