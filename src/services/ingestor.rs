//! Image ingestion with bounded retries.
//!
//! An [`ImageIngestor`] turns an image reference into a decoded
//! [`PixelBuffer`]. The bytes come from a [`Transport`]; everything that can
//! go wrong per attempt (network, status, timeout, empty or undecodable
//! payload, zero-pixel image) is retried according to a [`RetryPolicy`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dominant_colors::PixelBuffer;
use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::models::IngestConfig;

/// File extensions picked up from a local dataset folder
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Growth of the delay between consecutive attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Same delay before every retry
    #[default]
    Fixed,
    /// delay, 2*delay, 3*delay, ...
    Linear,
    /// delay, 2*delay, 4*delay, ...
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Attempts actually made; a policy always tries at least once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait before the 1-based `attempt`. The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let retry = attempt - 1;
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay.saturating_mul(retry),
            Backoff::Exponential => self
                .delay
                .saturating_mul(2u32.saturating_pow(retry - 1)),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

/// Source of raw image bytes
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the payload behind `image_ref`, giving up after `timeout`
    async fn fetch(&self, image_ref: &str, timeout: Duration) -> Result<Vec<u8>, IngestError>;
}

/// `http://` and `https://` references
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, image_ref: &str, timeout: Duration) -> Result<Vec<u8>, IngestError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                IngestError::Timeout(timeout)
            } else {
                IngestError::Transport(e.to_string())
            }
        };

        let response = self
            .client
            .get(image_ref)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(map_err)?;
        Ok(bytes.to_vec())
    }
}

/// Local paths and `file://` references
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTransport;

#[async_trait]
impl Transport for FsTransport {
    async fn fetch(&self, image_ref: &str, timeout: Duration) -> Result<Vec<u8>, IngestError> {
        let path = image_ref.strip_prefix("file://").unwrap_or(image_ref);
        let bytes = tokio::time::timeout(timeout, tokio::fs::read(path))
            .await
            .map_err(|_| IngestError::Timeout(timeout))??;
        Ok(bytes)
    }
}

/// Routes a reference to HTTP or the filesystem by its scheme
#[derive(Debug, Clone, Default)]
pub struct SourceTransport {
    http: HttpTransport,
    fs: FsTransport,
}

impl SourceTransport {
    pub fn new(http: HttpTransport) -> Self {
        Self {
            http,
            fs: FsTransport,
        }
    }
}

#[async_trait]
impl Transport for SourceTransport {
    async fn fetch(&self, image_ref: &str, timeout: Duration) -> Result<Vec<u8>, IngestError> {
        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            self.http.fetch(image_ref, timeout).await
        } else if image_ref.starts_with("file://") || !image_ref.contains("://") {
            self.fs.fetch(image_ref, timeout).await
        } else {
            Err(IngestError::UnsupportedReference(image_ref.to_string()))
        }
    }
}

/// Fetches and decodes images, retrying transient failures
#[derive(Clone)]
pub struct ImageIngestor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl ImageIngestor {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            transport,
            policy,
            timeout,
        }
    }

    /// Ingestor over HTTP and the local filesystem
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            Arc::new(SourceTransport::default()),
            config.retry_policy(),
            config.timeout(),
        )
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch and decode `image_ref`.
    ///
    /// Makes at most `policy.max_attempts` attempts and keeps no state
    /// between calls.
    pub async fn fetch(&self, image_ref: &str) -> Result<PixelBuffer, IngestError> {
        let attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.fetch_once(image_ref).await {
                Ok(buffer) => {
                    tracing::debug!(
                        image_ref,
                        attempt,
                        width = buffer.width(),
                        height = buffer.height(),
                        "Image fetched"
                    );
                    return Ok(buffer);
                }
                Err(e) if !e.is_transient() => {
                    tracing::error!(image_ref, error = %e, "Image reference rejected");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(
                        image_ref,
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Image fetch attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.unwrap_or(IngestError::EmptyPayload);
        tracing::error!(image_ref, attempts, error = %last, "Giving up on image");
        Err(IngestError::Exhausted {
            attempts,
            last: Box::new(last),
        })
    }

    async fn fetch_once(&self, image_ref: &str) -> Result<PixelBuffer, IngestError> {
        let bytes = self.transport.fetch(image_ref, self.timeout).await?;
        if bytes.is_empty() {
            return Err(IngestError::EmptyPayload);
        }

        // Decoding is CPU-bound; keep it off the executor threads
        let buffer = tokio::task::spawn_blocking(move || PixelBuffer::decode(&bytes))
            .await
            .map_err(|e| IngestError::Decode(e.to_string()))?
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        if buffer.is_empty() {
            return Err(IngestError::EmptyImage);
        }
        Ok(buffer)
    }
}

/// Image files directly inside `dir`, sorted by path.
pub fn list_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
