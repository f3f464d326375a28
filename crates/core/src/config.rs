use std::path::PathBuf;

use reqwest::Url;

use crate::error::{MeetingBotError, Result};

pub const API_URL_ENV: &str = "MEETING_BOT_API_URL";
pub const DATA_DIR_ENV: &str = "MEETING_BOT_DATA_DIR";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Where the API client sends requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config from a host string, normalizing it first.
    pub fn new(raw: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(raw)?,
        })
    }

    /// Read `MEETING_BOT_API_URL` (loading `.env` if present), defaulting to the
    /// local development server.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let raw = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&raw)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute API path (e.g. `/meetings`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Force a URL scheme onto a configured host.
///
/// Values that already carry `http://` or `https://` are used verbatim (minus a
/// trailing slash); anything else is assumed to be a bare host and gets `https://`.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(MeetingBotError::InvalidBaseUrl {
            value: raw.to_string(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    Url::parse(&normalized).map_err(|_| MeetingBotError::InvalidBaseUrl {
        value: raw.to_string(),
    })?;

    Ok(normalized)
}

/// Directory holding the local key-value store.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("meeting-bot")
}
