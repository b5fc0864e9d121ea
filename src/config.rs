//! Runtime configuration loaded from the environment (and `.env` when present)

use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api/music";
const DEFAULT_SAVE_INTERVAL_MS: u64 = 5000;
const DEFAULT_RESUME_THRESHOLD_SECS: f64 = 5.0;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub access_token: String,
    /// Minimum time between two position writes to the backend
    pub save_interval: Duration,
    /// Saved positions at or below this are not offered for resume
    pub resume_threshold_secs: f64,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: String::new(),
            save_interval: Duration::from_millis(DEFAULT_SAVE_INTERVAL_MS),
            resume_threshold_secs: DEFAULT_RESUME_THRESHOLD_SECS,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Could not read .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_base = lookup("DMAIL_API_BASE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);

        let access_token = lookup("DMAIL_ACCESS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("DMAIL_ACCESS_TOKEN must be set to a valid access token")?;

        let save_interval = match lookup("DMAIL_SAVE_INTERVAL_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse()
                    .with_context(|| format!("DMAIL_SAVE_INTERVAL_MS is not a number: {raw}"))?,
            ),
            None => defaults.save_interval,
        };

        let resume_threshold_secs = match lookup("DMAIL_RESUME_THRESHOLD_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DMAIL_RESUME_THRESHOLD_SECS is not a number: {raw}"))?,
            None => defaults.resume_threshold_secs,
        };

        let http_timeout = match lookup("DMAIL_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("DMAIL_HTTP_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            None => defaults.http_timeout,
        };

        Ok(Self {
            api_base,
            access_token,
            save_interval,
            resume_threshold_secs,
            http_timeout,
        })
    }
}
