use std::fs;
use std::path::Path;

use client_logging::{client_info, client_warn};
use console_core::DEFAULT_HEARTBEAT_MS;
use console_swap::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};

/// Declarative configuration surface of the client, loaded from a RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// The page's own URL; only its query string is ever rewritten.
    pub base_url: String,
    /// Initial session poll target. Rotated by the server afterwards.
    pub session_url: String,
    /// Heartbeat interval in milliseconds; 0 disables polling.
    pub interval_ms: u64,
    /// Debounce window for swap triggers, in milliseconds.
    pub debounce_ms: u64,
    /// Intercept submit-like actions while other sessions are editing.
    pub intercept: bool,
    /// Suppress downstream change notifications when content is applied.
    pub quiet: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/admin/pages/1/edit/".to_string(),
            session_url: "http://localhost:8000/admin/pages/1/edit/session/".to_string(),
            interval_ms: DEFAULT_HEARTBEAT_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            intercept: true,
            quiet: false,
        }
    }
}

impl ClientConfig {
    /// Loads the config, falling back to defaults on a missing or malformed
    /// file. A bad file is worth a warning, not a crash.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Self::default();
            }
            Err(err) => {
                client_warn!("Failed to read config from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(config) => {
                client_info!("Loaded config from {:?}", path);
                config
            }
            Err(err) => {
                client_warn!("Failed to parse config from {:?}: {}", path, err);
                Self::default()
            }
        }
    }
}
