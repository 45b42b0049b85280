//! Sessiondir root directory management.

use std::path::PathBuf;

use crate::constants::{
    EVENTS_DIR, PUBLIC_DIR, SESSIONS_DATA_FILE, SESSIONS_DIR, UPDATE_SUMMARY_FILE,
};
use crate::error::SessionDirResult;
use crate::remote::ApiClient;
use crate::sessiondir_config::SessionDirConfig;
use crate::store::{EventStore, SessionStore};

/// The data root: `events/` shards, `sessions/` files and the `public/`
/// directory that the browser UI is served from.
#[derive(Clone, Debug)]
pub struct SessionDir {
    config: SessionDirConfig,
}

impl SessionDir {
    pub fn load() -> SessionDirResult<Self> {
        Ok(SessionDir {
            config: SessionDirConfig::load()?,
        })
    }

    pub fn from_config(config: SessionDirConfig) -> Self {
        SessionDir { config }
    }

    /// Override the configured data directory (e.g. from `--data-dir`).
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.config.data_dir = data_dir;
        self
    }

    pub fn config(&self) -> &SessionDirConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_path().join(EVENTS_DIR)
    }

    pub fn sessions_path(&self) -> PathBuf {
        self.data_path().join(SESSIONS_DIR)
    }

    pub fn public_path(&self) -> PathBuf {
        self.data_path().join(PUBLIC_DIR)
    }

    pub fn public_data_path(&self) -> PathBuf {
        self.public_path().join("data")
    }

    /// The flattened dataset consumed by the table UI.
    pub fn sessions_data_path(&self) -> PathBuf {
        self.public_data_path().join(SESSIONS_DATA_FILE)
    }

    pub fn update_summary_path(&self) -> PathBuf {
        self.public_data_path().join(UPDATE_SUMMARY_FILE)
    }

    pub fn event_store(&self) -> EventStore {
        EventStore::new(self.events_path(), self.config.max_events_per_shard)
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.sessions_path())
    }

    pub fn api_client(&self) -> SessionDirResult<ApiClient> {
        ApiClient::from_config(&self.config)
    }
}
