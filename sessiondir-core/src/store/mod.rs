//! On-disk stores for events and sessions.

mod event_store;
mod session_store;

pub use event_store::{AppendReport, EventStore, Shard};
pub use session_store::{SessionFile, SessionStore};

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

use crate::error::{SessionDirError, SessionDirResult};

/// Indentation used for event shards and session files.
const STORE_INDENT: &[u8] = b"    ";

/// Read and parse a JSON file, attributing parse errors to the file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> SessionDirResult<T> {
    let content = std::fs::read_to_string(path)?;

    serde_json::from_str(&content).map_err(|e| SessionDirError::MalformedFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Pretty-print `value` with the given indent and write it via a temp file
/// so readers never see a half-written file.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    indent: &[u8],
) -> SessionDirResult<()> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    value
        .serialize(&mut serializer)
        .map_err(|e| SessionDirError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    std::fs::write(&temp, buf)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}

pub(crate) fn write_store_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> SessionDirResult<()> {
    write_json(path, value, STORE_INDENT)
}
