use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClarifaiError, Result};

/// Result of a single round trip that did not fail outright.
#[derive(Debug)]
enum Attempt {
    Body(Vec<u8>),
    Unauthorized,
}

/// Map a fully-read response onto the error taxonomy.
fn classify(status: StatusCode, body: Vec<u8>) -> Result<Attempt> {
    match status.as_u16() {
        200 | 201 => Ok(Attempt::Body(body)),
        401 => Ok(Attempt::Unauthorized),
        400 => Err(ClarifaiError::RequestRejected(body_text(body))),
        500 => Err(ClarifaiError::RemoteService(body_text(body))),
        code => Err(ClarifaiError::UnexpectedStatus {
            status: code,
            body: body_text(body),
        }),
    }
}

fn body_text(body: Vec<u8>) -> String {
    String::from_utf8_lossy(&body).into_owned()
}

/// Async client for the Clarifai v2 API.
///
/// Holds the connection settings and a `reqwest::Client`. Every call is
/// one authenticated request; an HTTP 401 is retried exactly once with
/// the same key before failing with [`ClarifaiError::InvalidApiKey`].
///
/// # Example
/// ```no_run
/// use clarifai_rs::ClarifaiClient;
///
/// # async fn example() -> clarifai_rs::Result<()> {
/// let client = ClarifaiClient::new("my-api-key");
/// let response = client
///     .predict_by_urls(&["https://samples.clarifai.com/metro-north.jpg"], "general")
///     .await?;
/// println!("{:?}", clarifai_rs::top_five(&response)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClarifaiClient {
    http: Client,
    config: ClientConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ClarifaiClient {
    /// Create a client for the production API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from a full configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            cancel: None,
        }
    }

    /// Use a custom `reqwest::Client` (for proxies, TLS settings).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Abort calls once `flag` is set.
    ///
    /// The flag is checked before the first attempt and before the 401
    /// retry. A request already in flight is not interrupted; it is
    /// bounded only by [`ClientConfig::timeout`].
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Replace the API key used by subsequent calls.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = api_key.into();
    }

    /// Replace the API root used by subsequent calls.
    pub fn set_api_root(&mut self, root: impl Into<String>) {
        self.config.api_root = root.into();
    }

    /// Returns the configured API key.
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Returns the configured API root.
    pub fn api_root(&self) -> &str {
        &self.config.api_root
    }

    /// Returns the full connection settings.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for an endpoint under the configured root.
    pub fn build_url(&self, endpoint: &str) -> String {
        self.config.build_url(endpoint)
    }

    // ── Executor ────────────────────────────────────────────────────

    /// Send one authenticated request and return the raw response body.
    ///
    /// A `None` body is sent as `{}`. Status 200/201 succeeds; 401 is
    /// retried once; 400, 500 and anything else fail immediately.
    pub async fn execute<B>(
        &self,
        body: Option<&B>,
        endpoint: &str,
        method: Method,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(b) => serde_json::to_vec(b).map_err(ClarifaiError::Serialization)?,
            None => b"{}".to_vec(),
        };
        let url = self.build_url(endpoint);

        let mut retried = false;
        loop {
            match self.send_once(&method, &url, &payload).await? {
                Attempt::Body(bytes) => return Ok(bytes),
                Attempt::Unauthorized if !retried => {
                    warn!("Clarifai returned 401 for {} {}, retrying once", method, url);
                    retried = true;
                }
                Attempt::Unauthorized => return Err(ClarifaiError::InvalidApiKey),
            }
        }
    }

    async fn send_once(&self, method: &Method, url: &str, payload: &[u8]) -> Result<Attempt> {
        if self.is_cancelled() {
            return Err(ClarifaiError::Cancelled);
        }

        debug!("Sending {} {} ({} bytes)", method, url, payload.len());

        let resp = self
            .http
            .request(method.clone(), url)
            .timeout(self.config.timeout)
            .header(AUTHORIZATION, format!("Key {}", self.config.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| ClarifaiError::Transport {
                context: format!("Cannot reach Clarifai at {}", url),
                source: e,
            })?;

        let status = resp.status();
        // Drain the body on every branch so the connection is released.
        let body = resp.bytes().await.map_err(|e| ClarifaiError::Transport {
            context: format!("Failed to read Clarifai response from {}", url),
            source: e,
        })?;

        debug!("Clarifai answered {} for {}", status, url);
        classify(status, body.to_vec())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}
