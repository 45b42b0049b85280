//! Per-event session files: `sessions/event_{event_id}_sessions.json`.

use std::path::{Path, PathBuf};

use crate::error::SessionDirResult;
use crate::record::Session;
use crate::store::{read_json, write_store_json};

/// A `.json` file in the sessions directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFile {
    pub path: PathBuf,
    /// Parent event id, if the file name follows the naming scheme.
    pub event_id: Option<u64>,
}

impl SessionFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        SessionStore { dir }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(event_id: u64) -> String {
        format!("event_{event_id}_sessions.json")
    }

    /// Inverse of `file_name_for`.
    pub fn event_id_from_file_name(name: &str) -> Option<u64> {
        let digits = name.strip_prefix("event_")?.strip_suffix("_sessions.json")?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn path_for(&self, event_id: u64) -> PathBuf {
        self.dir.join(Self::file_name_for(event_id))
    }

    pub fn has(&self, event_id: u64) -> bool {
        self.path_for(event_id).exists()
    }

    pub fn load(&self, event_id: u64) -> SessionDirResult<Vec<Session>> {
        read_json(&self.path_for(event_id))
    }

    pub fn save(&self, event_id: u64, sessions: &[Session]) -> SessionDirResult<PathBuf> {
        let path = self.path_for(event_id);
        write_store_json(&path, sessions)?;
        Ok(path)
    }

    /// Every `.json` file in the sessions directory, sorted by name.
    pub fn files(&self) -> SessionDirResult<Vec<SessionFile>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files: Vec<SessionFile> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "json"))
            .map(|path| {
                let event_id = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(Self::event_id_from_file_name);
                SessionFile { path, event_id }
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}
