//! Configuration for quiz sharing.
//!
//! Supports loading configuration from:
//! - A TOML file
//! - Environment variables

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{DEFAULT_SHARE_ENDPOINT, Result, ShareError};

/// Origin used when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5000";

/// Configuration for a share session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Origin of the quiz site; share links and fallback URLs hang off it.
    pub origin: Url,
    /// Path of the share link endpoint, relative to `origin`.
    pub endpoint_path: String,
    /// Overall timeout for the share link request, in milliseconds. Unset means none.
    pub request_timeout_ms: Option<u64>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            endpoint_path: DEFAULT_SHARE_ENDPOINT.to_string(),
            request_timeout_ms: None,
        }
    }
}

impl ShareConfig {
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            origin: parse_origin(origin)?,
            ..Self::default()
        })
    }

    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    /// Sub-millisecond timeouts round up to 1 ms.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.request_timeout_ms = Some(ms.max(1));
        self
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShareError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ShareError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!("Loaded share config from {}", path.display());
        Ok(config)
    }

    /// Load from environment variables.
    ///
    /// - `QUIZ_SHARE_ORIGIN`
    /// - `QUIZ_SHARE_ENDPOINT`
    /// - `QUIZ_SHARE_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(origin) = std::env::var("QUIZ_SHARE_ORIGIN") {
            self.origin = parse_origin(&origin)?;
        }

        if let Ok(path) = std::env::var("QUIZ_SHARE_ENDPOINT") {
            self.endpoint_path = path;
        }

        if let Ok(ms) = std::env::var("QUIZ_SHARE_TIMEOUT_MS") {
            let ms = ms.parse::<u64>().map_err(|_| {
                ShareError::Config(format!("QUIZ_SHARE_TIMEOUT_MS is not a number: {ms}"))
            })?;
            self.request_timeout_ms = Some(ms);
        }

        self.validate()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Absolute URL of the share link endpoint.
    pub fn endpoint_url(&self) -> Result<Url> {
        self.origin
            .join(&self.endpoint_path)
            .map_err(|e| ShareError::Config(format!("invalid endpoint path: {e}")))
    }

    fn validate(&self) -> Result<()> {
        match self.origin.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ShareError::Config(format!(
                    "origin must be http or https, got '{scheme}'"
                )));
            }
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ShareError::Config(
                "request timeout must be greater than zero".into(),
            ));
        }
        if !self.endpoint_path.starts_with('/') {
            return Err(ShareError::Config(format!(
                "endpoint path must start with '/': {}",
                self.endpoint_path
            )));
        }
        Ok(())
    }
}

fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin.trim_end_matches('/'))
        .map_err(|e| ShareError::Config(format!("invalid origin '{origin}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ShareError::Config(format!("invalid origin '{origin}'")));
    }
    Ok(url)
}
