//! Community platform API client.
//!
//! The ingest pipeline talks to the API through the `EventSource` trait so
//! that it can run against anything that yields events and sessions.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{SessionDirError, SessionDirResult};
use crate::record::{Event, Session};
use crate::sessiondir_config::SessionDirConfig;

/// Where upcoming events and their sessions come from.
pub trait EventSource {
    /// All upcoming events. A failure here aborts the update run.
    fn upcoming_events(&self) -> impl Future<Output = SessionDirResult<Vec<Event>>> + Send;

    /// Sessions of one event. Failures are reported and yield an empty list.
    fn event_sessions(&self, event_id: u64) -> impl Future<Output = Vec<Session>> + Send;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    events_timeout: Duration,
    sessions_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> SessionDirResult<Self> {
        let defaults = SessionDirConfig::default();
        let client = reqwest::Client::builder()
            .user_agent(concat!("sessiondir/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SessionDirError::Fetch(e.to_string()))?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            events_timeout: defaults.events_timeout(),
            sessions_timeout: defaults.sessions_timeout(),
        })
    }

    pub fn from_config(config: &SessionDirConfig) -> SessionDirResult<Self> {
        Ok(Self::new(&config.api_base_url)?
            .with_timeouts(config.events_timeout(), config.sessions_timeout()))
    }

    pub fn with_timeouts(mut self, events: Duration, sessions: Duration) -> Self {
        self.events_timeout = events;
        self.sessions_timeout = sessions;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.base_url)
    }

    fn sessions_url(&self, event_id: u64) -> String {
        format!("{}/events/{}/event_sessions", self.base_url, event_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, timeout: Duration) -> SessionDirResult<T> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(url, timeout, e))?
            .error_for_status()
            .map_err(|e| SessionDirError::Fetch(e.to_string()))?;

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                request_error(url, timeout, e)
            } else {
                SessionDirError::InvalidResponse(e.to_string())
            }
        })
    }
}

fn request_error(url: &str, timeout: Duration, e: reqwest::Error) -> SessionDirError {
    if e.is_timeout() {
        SessionDirError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        }
    } else {
        SessionDirError::Fetch(e.to_string())
    }
}

impl EventSource for ApiClient {
    async fn upcoming_events(&self) -> SessionDirResult<Vec<Event>> {
        info!("Fetching upcoming events from {}", self.base_url);

        let events: Vec<Event> = self.get_json(&self.events_url(), self.events_timeout).await?;

        info!(count = events.len(), "Fetched upcoming events");
        Ok(events)
    }

    async fn event_sessions(&self, event_id: u64) -> Vec<Session> {
        let entries = match self
            .get_json::<Vec<Value>>(&self.sessions_url(event_id), self.sessions_timeout)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(event_id, "Could not fetch sessions: {e}");
                return Vec::new();
            }
        };

        // Malformed entries are skipped one at a time
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Session>(entry) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(event_id, "Skipping malformed session: {e}");
                    None
                }
            })
            .collect()
    }
}
