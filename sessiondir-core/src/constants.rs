/// Base URL of the community platform API.
pub const DEFAULT_API_BASE_URL: &str = "https://null.community:443/api-v2";

/// Maximum number of events stored in a single shard file.
pub const DEFAULT_MAX_EVENTS_PER_SHARD: usize = 100;

pub const DEFAULT_EVENTS_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSIONS_TIMEOUT_SECS: u64 = 5;

/// Pause between per-event session requests.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

pub const DEFAULT_SERVER_PORT: u16 = 3001;

/// Rows per page in the session table.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Most page numbers shown at once in the pagination bar.
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Descriptions longer than this are shown truncated.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

pub const EVENTS_DIR: &str = "events";
pub const SESSIONS_DIR: &str = "sessions";
pub const PUBLIC_DIR: &str = "public";
pub const SESSIONS_DATA_FILE: &str = "sessions-data.json";
pub const UPDATE_SUMMARY_FILE: &str = "update-summary.json";
