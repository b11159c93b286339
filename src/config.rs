//! Application configuration loaded from the environment.
//!
//! Built once at startup and shared by reference; handlers never read
//! environment variables themselves.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::verse::DEFAULT_VERSE_API_URL;

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Append-only event log (`EVENT_LOG_PATH`).
    pub event_log_path: PathBuf,

    /// Basic-auth user for the admin surface (`ADMIN_USERNAME`).
    pub admin_username: String,

    /// Basic-auth password for the admin surface (`ADMIN_PASSWORD`).
    pub admin_password: String,

    /// Listen port on all interfaces (`PORT`).
    pub port: u16,

    /// Static asset directory (`WEB_DIR`).
    pub web_dir: PathBuf,

    /// Upstream random-verse endpoint (`VERSE_API_URL`).
    pub verse_api_url: String,

    /// Upstream request timeout (`VERSE_TIMEOUT_SECS`).
    pub verse_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_log_path: PathBuf::from("data/events.log"),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            port: 8080,
            web_dir: PathBuf::from("web"),
            verse_api_url: DEFAULT_VERSE_API_URL.to_string(),
            verse_timeout: Duration::from_secs(7),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("event_log_path", &self.event_log_path)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .field("port", &self.port)
            .field("web_dir", &self.web_dir)
            .field("verse_api_url", &self.verse_api_url)
            .field("verse_timeout", &self.verse_timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `EVENT_LOG_PATH` (default: `data/events.log`)
    /// - `ADMIN_USERNAME` (default: `admin`)
    /// - `ADMIN_PASSWORD` (default: `admin123`)
    /// - `PORT` (default: `8080`)
    /// - `WEB_DIR` (default: `web`)
    /// - `VERSE_API_URL` (default: quran.com random verse)
    /// - `VERSE_TIMEOUT_SECS` (default: `7`)
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        tracing::info!(
            event_log = %config.event_log_path.display(),
            admin_user = %config.admin_username,
            port = config.port,
            web_dir = %config.web_dir.display(),
            verse_timeout_secs = config.verse_timeout.as_secs(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value '{}'", v))?,
            None => defaults.port,
        };

        let verse_timeout = match get("VERSE_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid VERSE_TIMEOUT_SECS value '{}'", v))?;
                if secs == 0 {
                    anyhow::bail!("VERSE_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => defaults.verse_timeout,
        };

        Ok(Self {
            event_log_path: get("EVENT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.event_log_path),
            admin_username: get("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: get("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            port,
            web_dir: get("WEB_DIR").map(PathBuf::from).unwrap_or(defaults.web_dir),
            verse_api_url: get("VERSE_API_URL").unwrap_or(defaults.verse_api_url),
            verse_timeout,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Path of the admin page inside the web directory.
    pub fn admin_page(&self) -> PathBuf {
        self.web_dir.join("admin.html")
    }
}
