use std::sync::Arc;

use sessiondir_core::SessionDir;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    sessiondir: Arc<SessionDir>,
    // Held for the duration of an update so runs never overlap
    update_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(sessiondir: SessionDir) -> Self {
        AppState {
            sessiondir: Arc::new(sessiondir),
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn sessiondir(&self) -> &SessionDir {
        &self.sessiondir
    }

    pub fn update_lock(&self) -> &Mutex<()> {
        &self.update_lock
    }
}
