use std::env;
use std::path::PathBuf;

/// The shared admin password, compared locally before unlocking admin
/// commands. There is no server-side enforcement behind this gate; it is a
/// known weakness carried over deliberately rather than silently upgraded
/// to real auth.
pub const ADMIN_PASSWORD: &str = "password1994";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub session_file: PathBuf,
    pub poll_interval_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: env::var("SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".prediction-session.json")),
            poll_interval_seconds: env::var("POLL_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid POLL_INTERVAL_SECONDS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
