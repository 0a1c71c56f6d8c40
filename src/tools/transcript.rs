//! `get_youtube_transcript`: fetch a video transcript from a transcript service.

use crate::retry::RetryPolicy;
use crate::tools::{parse_args, ToolHandler, ToolName};
use crate::types::ToolResponseEnvelope;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can produce the transcript of a video URL.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<TranscriptSegment>>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

/// Transcript service client.
#[derive(Debug, Clone)]
pub struct HttpTranscriptSource {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    segments: Vec<TranscriptSegment>,
}

impl HttpTranscriptSource {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build transcript HTTP client")?;

        Ok(Self::with_client(base_url, api_key, http))
    }

    /// Use a preconfigured client (proxy settings, TLS roots, timeouts).
    pub fn with_client(base_url: &str, api_key: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        }
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    async fn fetch(&self, url: &str) -> Result<Vec<TranscriptSegment>> {
        debug!("Transcript fetch: {}", url);

        let mut req = self
            .http
            .get(format!("{}/v1/transcript", self.base_url))
            .query(&[("url", url)]);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req.send().await.context("Transcript request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Transcript service returned {}: {}", status, body);
        }

        let body: TranscriptResponse = resp
            .json()
            .await
            .context("Failed to parse transcript response")?;
        Ok(body.segments)
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TranscriptArgs {
    url: String,
}

/// Handler for [`ToolName::GetYoutubeTranscript`]. Fetches are retried
/// under the configured policy.
pub struct TranscriptHandler<S> {
    source: S,
    retry: RetryPolicy,
}

impl<S: TranscriptSource> TranscriptHandler<S> {
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }
}

#[async_trait]
impl<S: TranscriptSource> ToolHandler for TranscriptHandler<S> {
    fn tool(&self) -> ToolName {
        ToolName::GetYoutubeTranscript
    }

    async fn call(&self, args: &Map<String, Value>, name: &str) -> Result<ToolResponseEnvelope> {
        let args: TranscriptArgs = match parse_args(args) {
            Ok(a) => a,
            Err(e) => {
                warn!("Invalid transcript arguments: {}", e);
                return Ok(ToolResponseEnvelope::new(
                    name,
                    std::iter::empty::<(String, Value)>(),
                    format!("Error: invalid arguments for {}: {}", name, e),
                ));
            }
        };

        let echo = [("url", Value::String(args.url.clone()))];

        let content = match self.retry.run(|| self.source.fetch(&args.url)).await {
            Ok(segments) => {
                let text = join_segments(&segments);
                if text.is_empty() {
                    format!("No transcript available for {}", args.url)
                } else {
                    text
                }
            }
            Err(e) => {
                warn!("Transcript fetch for {} gave up: {}", args.url, e);
                format!("Error fetching transcript: {}", e)
            }
        };

        Ok(ToolResponseEnvelope::new(name, echo, content))
    }
}

fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
