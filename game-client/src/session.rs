use std::fs;
use std::path::PathBuf;

use tracing::warn;

use game_core::RememberedUser;

/// File-backed session store, the client-local analog of browser storage.
/// Explicit load/save/clear lifecycle; a corrupt or missing file simply
/// reads as "no session".
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Option<RememberedUser> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(remembered) => Some(remembered),
            Err(e) => {
                warn!("Ignoring unreadable session file: {}", e);
                None
            }
        }
    }

    pub fn save(&self, remembered: &RememberedUser) {
        match serde_json::to_string_pretty(remembered) {
            Ok(contents) => {
                if let Err(e) = fs::write(&self.path, contents) {
                    warn!("Failed to persist session: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize session: {}", e),
        }
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("Failed to clear session file: {}", e);
            }
        }
    }
}
