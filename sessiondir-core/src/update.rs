//! Incremental ingest: pull new events into the shards, fetch their
//! sessions, backfill events that never got a session file, and record a
//! summary of what changed.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::diff::{self, IngestPlan};
use crate::error::SessionDirResult;
use crate::record::Event;
use crate::remote::EventSource;
use crate::sessiondir::SessionDir;
use crate::store::{AppendReport, EventStore, SessionStore};
use crate::summary::{EventBrief, SessionBrief, UpdateSummary};

/// Outcome of backfilling events without a session file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Events whose sessions were requested.
    pub processed: usize,
    pub sessions_added: usize,
}

#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub summary: UpdateSummary,
    pub appended: AppendReport,
    pub reconciled: Reconciliation,
}

pub struct Updater<S> {
    source: S,
    events: EventStore,
    sessions: SessionStore,
    summary_path: PathBuf,
    request_delay: Duration,
}

impl<S: EventSource> Updater<S> {
    pub fn new(sessiondir: &SessionDir, source: S) -> Self {
        Updater {
            source,
            events: sessiondir.event_store(),
            sessions: sessiondir.session_store(),
            summary_path: sessiondir.update_summary_path(),
            request_delay: sessiondir.config().request_delay(),
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Compute what `run` would do without writing anything.
    pub async fn plan(&self) -> SessionDirResult<IngestPlan> {
        let upcoming = self.source.upcoming_events().await?;
        IngestPlan::compute(&upcoming, &self.events, &self.sessions)
    }

    pub async fn run(&self) -> SessionDirResult<UpdateReport> {
        info!("Starting event update");

        let upcoming = self.source.upcoming_events().await?;
        let existing = self.events.existing_ids()?;
        let mut new_events = diff::new_events(&upcoming, &existing);
        new_events.sort_by_key(|e| e.id);

        let mut attempted = HashSet::new();
        let mut found = Vec::new();
        let mut appended = AppendReport::default();

        if new_events.is_empty() {
            info!("No new events found, all events are up to date");
        } else {
            info!(count = new_events.len(), "Found new events");
            for event in &new_events {
                info!("  {event}");
            }

            appended = self.events.append(&new_events)?;
            self.fetch_sessions(&new_events, &mut attempted, &mut found).await?;
        }

        let reconciled = self.fetch_missing_sessions(&mut attempted, &mut found).await?;

        let briefs: Vec<EventBrief> = new_events.iter().map(EventBrief::from).collect();
        let summary = UpdateSummary::new(Utc::now(), briefs, found);
        summary.save(&self.summary_path)?;

        info!(
            new_events = summary.new_events,
            new_sessions = summary.new_sessions,
            "Update completed"
        );

        Ok(UpdateReport {
            summary,
            appended,
            reconciled,
        })
    }

    /// Fetch sessions for stored events that have no session file.
    /// Events already requested during this run are not asked for again.
    async fn fetch_missing_sessions(
        &self,
        attempted: &mut HashSet<u64>,
        found: &mut Vec<SessionBrief>,
    ) -> SessionDirResult<Reconciliation> {
        let missing: Vec<Event> = diff::missing_sessions(&self.events.events()?, &self.sessions)
            .into_iter()
            .filter(|e| !attempted.contains(&e.id))
            .collect();

        if missing.is_empty() {
            info!("All events have corresponding session files");
            return Ok(Reconciliation::default());
        }

        info!(count = missing.len(), "Found events without session files");
        for event in &missing {
            info!("  {event}");
        }

        let before = found.len();
        self.fetch_sessions(&missing, attempted, found).await?;

        Ok(Reconciliation {
            processed: missing.len(),
            sessions_added: found.len() - before,
        })
    }

    async fn fetch_sessions(
        &self,
        events: &[Event],
        attempted: &mut HashSet<u64>,
        found: &mut Vec<SessionBrief>,
    ) -> SessionDirResult<()> {
        for (i, event) in events.iter().enumerate() {
            attempted.insert(event.id);

            let sessions = self.source.event_sessions(event.id).await;
            if sessions.is_empty() {
                info!(event_id = event.id, "No sessions found");
            } else {
                self.sessions.save(event.id, &sessions)?;
                info!(event_id = event.id, count = sessions.len(), "Saved sessions");
                found.extend(sessions.iter().map(|s| SessionBrief::new(s, event.id)));
            }

            // Keep request rate down
            if i + 1 < events.len() && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        Ok(())
    }
}
