//! Global sessiondir configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_EVENTS_TIMEOUT_SECS, DEFAULT_MAX_EVENTS_PER_SHARD,
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_DELAY_MS, DEFAULT_SERVER_PORT,
    DEFAULT_SESSIONS_TIMEOUT_SECS,
};
use crate::error::{SessionDirError, SessionDirResult};

static DEFAULT_DATA_DIR: &str = ".";

/// Prefix for environment overrides, e.g. `SESSIONDIR_DATA_DIR`.
pub const ENV_PREFIX: &str = "SESSIONDIR";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_max_events_per_shard() -> usize {
    DEFAULT_MAX_EVENTS_PER_SHARD
}

fn default_events_timeout_secs() -> u64 {
    DEFAULT_EVENTS_TIMEOUT_SECS
}

fn default_sessions_timeout_secs() -> u64 {
    DEFAULT_SESSIONS_TIMEOUT_SECS
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Global configuration at ~/.config/sessiondir/config.toml
///
/// Every key is optional. Values can also be overridden from the
/// environment with the `SESSIONDIR_` prefix.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionDirConfig {
    /// Root holding `events/`, `sessions/` and `public/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_max_events_per_shard")]
    pub max_events_per_shard: usize,

    #[serde(default = "default_events_timeout_secs")]
    pub events_timeout_secs: u64,

    #[serde(default = "default_sessions_timeout_secs")]
    pub sessions_timeout_secs: u64,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SessionDirConfig {
    fn default() -> Self {
        SessionDirConfig {
            data_dir: default_data_dir(),
            api_base_url: default_api_base_url(),
            max_events_per_shard: default_max_events_per_shard(),
            events_timeout_secs: default_events_timeout_secs(),
            sessions_timeout_secs: default_sessions_timeout_secs(),
            request_delay_ms: default_request_delay_ms(),
            server_port: default_server_port(),
            page_size: default_page_size(),
        }
    }
}

impl SessionDirConfig {
    pub fn config_path() -> SessionDirResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SessionDirError::Config("Could not determine config directory".into()))?
            .join("sessiondir");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path, creating a commented default file
    /// on first use.
    pub fn load() -> SessionDirResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file (which may be missing) plus environment overrides.
    pub fn load_from(path: &Path) -> SessionDirResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| SessionDirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SessionDirError::Config(e.to_string()))
    }

    pub fn events_timeout(&self) -> Duration {
        Duration::from_secs(self.events_timeout_secs)
    }

    pub fn sessions_timeout(&self) -> Duration {
        Duration::from_secs(self.sessions_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SessionDirResult<()> {
        let contents = format!(
            "\
# sessiondir configuration

# Where events/, sessions/ and public/ live:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Community platform API:
# api_base_url = \"{DEFAULT_API_BASE_URL}\"

# Events per shard file before rolling over:
# max_events_per_shard = {DEFAULT_MAX_EVENTS_PER_SHARD}

# Request timeouts (seconds) and pause between session requests (ms):
# events_timeout_secs = {DEFAULT_EVENTS_TIMEOUT_SECS}
# sessions_timeout_secs = {DEFAULT_SESSIONS_TIMEOUT_SECS}
# request_delay_ms = {DEFAULT_REQUEST_DELAY_MS}

# Control server port and table page size:
# server_port = {DEFAULT_SERVER_PORT}
# page_size = {DEFAULT_PAGE_SIZE}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionDirError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SessionDirError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Loading reads the process environment, which the override test mutates
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_missing_file_uses_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let config = SessionDirConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.max_events_per_shard, 100);
        assert_eq!(config.request_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_default_config_file_is_all_comments() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        SessionDirConfig::create_default_config(&path).unwrap();
        let config = SessionDirConfig::load_from(&path).unwrap();

        assert_eq!(config.server_port, 3001);
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/sessions\"\nmax_events_per_shard = 25\n",
        )
        .unwrap();

        let config = SessionDirConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/sessions"));
        assert_eq!(config.max_events_per_shard, 25);
        assert_eq!(config.sessions_timeout_secs, 5);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_events_per_shard = 25\nserver_port = 4000\n").unwrap();

        // SAFETY: every test touching the environment holds ENV_LOCK
        unsafe {
            std::env::set_var("SESSIONDIR_MAX_EVENTS_PER_SHARD", "7");
            std::env::set_var("SESSIONDIR_API_BASE_URL", "http://localhost:9000/api-v2");
        }
        let config = SessionDirConfig::load_from(&path);
        unsafe {
            std::env::remove_var("SESSIONDIR_MAX_EVENTS_PER_SHARD");
            std::env::remove_var("SESSIONDIR_API_BASE_URL");
        }
        let config = config.unwrap();

        assert_eq!(config.max_events_per_shard, 7);
        assert_eq!(config.api_base_url, "http://localhost:9000/api-v2");
        assert_eq!(config.server_port, 4000);
    }
}
