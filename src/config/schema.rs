//! Configuration schema for toolrelay.toml.

use crate::retry::RetryPolicy;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Transcript service base URL.
    pub transcript_api_url: String,

    /// Bearer token for the transcript service (empty = anonymous).
    pub transcript_api_key: String,

    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Retry applied to external fetches and to `dispatch --retry`.
    pub retry: RetryPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            transcript_api_url: "http://127.0.0.1:8484".into(),
            transcript_api_key: String::new(),
            request_timeout_secs: 30,
            log_level: "info".into(),
            retry: RetryPolicy::default(),
        }
    }
}

impl RelayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values that would only fail later, at the first tool call.
    pub fn validate(&self) -> Result<()> {
        let url = self.transcript_api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!(
                "transcript_api_url must be an http(s) URL, got '{}'",
                self.transcript_api_url
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }
}
