use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "CHAT_API_URL";

const API_SUFFIX: &str = "/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub session_db: String,
    pub contacts_poll_secs: u64,
    pub thread_poll_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_db: "data/session.db".to_string(),
            contacts_poll_secs: 4,
            thread_poll_secs: 3,
            request_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// API root every endpoint path is appended to, always ending in `/api`.
    pub fn base_url(&self) -> String {
        normalize_base_url(&self.api_url)
    }

    pub fn contacts_poll_interval(&self) -> Duration {
        Duration::from_secs(self.contacts_poll_secs.max(1))
    }

    pub fn thread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.thread_poll_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Env var beats the file, an explicit CLI value beats both.
    pub fn apply_overrides(&mut self, env_api_url: Option<String>, cli_api_url: Option<String>) {
        if let Some(url) = cli_api_url.or(env_api_url) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn api_url_from_env() -> Option<String> {
    env::var(API_URL_ENV).ok()
}

pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = if trimmed.is_empty() {
        DEFAULT_API_URL
    } else {
        trimmed
    };

    if url.ends_with(API_SUFFIX) {
        url.to_string()
    } else {
        format!("{url}{API_SUFFIX}")
    }
}

/// Turns a server-relative media path into an absolute URL on the API host.
pub fn resolve_media_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        return url.to_string();
    }

    let origin = base_url
        .strip_suffix(API_SUFFIX)
        .unwrap_or(base_url)
        .trim_end_matches('/');
    format!("{origin}/{}", url.trim_start_matches('/'))
}
