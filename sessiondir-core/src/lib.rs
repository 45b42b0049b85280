//! Core library for sessiondir.
//!
//! Ingests events and their sessions from the community platform API into a
//! local directory of JSON shards, then flattens them into a single browsing
//! dataset:
//! - `remote` fetches events and per-event sessions
//! - `store` manages the event shards and session files on disk
//! - `diff` finds new events and events without session files
//! - `update` runs the incremental ingest and writes the update summary
//! - `process` builds the flattened `sessions-data.json`
//! - `table` filters, sorts, paginates and exports the flattened dataset

pub mod constants;
pub mod diff;
pub mod error;
pub mod process;
pub mod record;
pub mod remote;
pub mod sessiondir;
pub mod sessiondir_config;
pub mod store;
pub mod summary;
pub mod table;
pub mod timestamp;
pub mod update;

pub use error::{SessionDirError, SessionDirResult};
pub use record::{Chapter, Event, Session};
pub use sessiondir::SessionDir;
