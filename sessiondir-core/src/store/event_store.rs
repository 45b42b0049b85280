//! Event shards: `events/event{N}.json`, each a JSON array of at most
//! `max_per_shard` events, where `N` is the id of the shard's first event.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::SessionDirResult;
use crate::record::Event;
use crate::store::{read_json, write_store_json};

const SHARD_PREFIX: &str = "event";
const SHARD_SUFFIX: &str = ".json";

/// A shard file in the events directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    pub path: PathBuf,
    /// Numeric part of `event{N}.json`; None for other `event*.json` names.
    pub start_id: Option<u64>,
}

impl Shard {
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if !name.starts_with(SHARD_PREFIX) || !name.ends_with(SHARD_SUFFIX) {
            return None;
        }

        let start_id = name
            .strip_prefix(SHARD_PREFIX)
            .and_then(|rest| rest.strip_suffix(SHARD_SUFFIX))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok());

        Some(Shard { path, start_id })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// What `EventStore::append` did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendReport {
    pub appended: usize,
    /// Every shard written, in write order.
    pub written: Vec<PathBuf>,
    /// Shards that did not exist before.
    pub created: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct EventStore {
    dir: PathBuf,
    max_per_shard: usize,
}

impl EventStore {
    pub fn new(dir: PathBuf, max_per_shard: usize) -> Self {
        EventStore {
            dir,
            max_per_shard: max_per_shard.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn max_per_shard(&self) -> usize {
        self.max_per_shard
    }

    pub fn shard_path_for(&self, start_id: u64) -> PathBuf {
        self.dir.join(format!("{SHARD_PREFIX}{start_id}{SHARD_SUFFIX}"))
    }

    /// All shard files, ordered by start id (unnumbered shards first, by name).
    pub fn shards(&self) -> SessionDirResult<Vec<Shard>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut shards: Vec<Shard> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(Shard::from_path)
            .collect();

        shards.sort_by(|a, b| a.start_id.cmp(&b.start_id).then_with(|| a.path.cmp(&b.path)));
        Ok(shards)
    }

    pub fn read_shard(path: &Path) -> SessionDirResult<Vec<Event>> {
        read_json(path)
    }

    /// The numbered shard with the highest start id.
    pub fn latest_shard(&self) -> SessionDirResult<Option<Shard>> {
        Ok(self
            .shards()?
            .into_iter()
            .filter(|s| s.start_id.is_some())
            .max_by_key(|s| s.start_id))
    }

    /// Every stored event. Shards that cannot be read are skipped with a warning.
    pub fn events(&self) -> SessionDirResult<Vec<Event>> {
        let mut events = Vec::new();

        for shard in self.shards()? {
            match Self::read_shard(&shard.path) {
                Ok(shard_events) => events.extend(shard_events),
                Err(e) => warn!("Could not read {}: {e}", shard.file_name()),
            }
        }

        Ok(events)
    }

    /// Union of the ids of all stored events.
    pub fn existing_ids(&self) -> SessionDirResult<HashSet<u64>> {
        let ids: HashSet<u64> = self.events()?.into_iter().map(|e| e.id).collect();

        info!(count = ids.len(), "Found existing events in local shards");
        Ok(ids)
    }

    /// Append events to the shard set.
    ///
    /// Events already stored (or repeated within `new_events`) are dropped.
    /// The rest are written in ascending id order, filling the latest shard
    /// and rolling over to `event{id}.json` whenever a shard is full.
    pub fn append(&self, new_events: &[Event]) -> SessionDirResult<AppendReport> {
        let existing = self.existing_ids()?;
        let mut seen = HashSet::new();

        let mut pending: Vec<Event> = new_events
            .iter()
            .filter(|e| !existing.contains(&e.id) && seen.insert(e.id))
            .cloned()
            .collect();
        pending.sort_by_key(|e| e.id);

        let mut report = AppendReport::default();
        let Some(first) = pending.first() else {
            return Ok(report);
        };

        std::fs::create_dir_all(&self.dir)?;

        let (mut current_path, mut current) = match self.latest_shard()? {
            Some(shard) => {
                let events = Self::read_shard(&shard.path)?;
                info!("Latest shard: {} with {} events", shard.file_name(), events.len());
                (shard.path, events)
            }
            None => {
                let path = self.shard_path_for(first.id);
                report.created.push(path.clone());
                (path, Vec::new())
            }
        };

        for event in pending {
            if current.len() >= self.max_per_shard {
                write_store_json(&current_path, &current)?;
                info!("Saved {} with {} events", display_name(&current_path), current.len());
                report.written.push(current_path);

                current_path = self.shard_path_for(event.id);
                current = Vec::new();
                report.created.push(current_path.clone());
                info!("Created new shard: {}", display_name(&current_path));
            }

            current.push(event);
            report.appended += 1;
        }

        write_store_json(&current_path, &current)?;
        info!("Saved {} with {} events", display_name(&current_path), current.len());
        report.written.push(current_path);

        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
