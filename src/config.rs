//! Runtime configuration assembled by the CLI.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::browser::Location;
use crate::client::DEFAULT_LIMIT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const MAX_LIMIT: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("page size {0} out of range (1..={max})", max = MAX_LIMIT)]
    LimitOutOfRange(usize),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("tick rate must be greater than zero")]
    ZeroTickRate,

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Initial location (`/?kind=...`).
    pub location: Location,
    /// Page size sent as `limit`.
    pub limit: usize,
    pub timeout: Duration,
    pub tick_rate: Duration,
    /// Logs go nowhere without a file; the terminal belongs to the TUI.
    pub log_file: Option<PathBuf>,
    /// Browse the built-in demo data instead of a backend.
    pub demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            location: Location::default(),
            limit: DEFAULT_LIMIT,
            timeout: Duration::from_secs(30),
            tick_rate: Duration::from_millis(250),
            log_file: None,
            demo: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(ConfigError::LimitOutOfRange(self.limit));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.tick_rate.is_zero() {
            return Err(ConfigError::ZeroTickRate);
        }
        if !self.demo {
            let invalid = |reason: String| ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason,
            };
            let url = url::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
            }
        }
        Ok(())
    }

    /// Opens the log file for appending, if one is configured.
    pub fn open_log_file(&self) -> Result<Option<File>, ConfigError> {
        let Some(path) = &self.log_file else {
            return Ok(None);
        };
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(Some)
            .map_err(|source| ConfigError::LogFile {
                path: path.clone(),
                source,
            })
    }
}
