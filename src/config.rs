use std::fmt;
use std::time::Duration;

use crate::error::{ClarifaiError, Result};

/// Production API root.
pub const DEFAULT_API_ROOT: &str = "https://api.clarifai.com";

/// API version segment inserted between the root and every endpoint.
pub const API_VERSION: &str = "v2";

/// Connection settings for a [`ClarifaiClient`](crate::ClarifaiClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Secret API key, sent as `Authorization: Key <api_key>`
    pub api_key: String,
    /// API root (default: "https://api.clarifai.com")
    pub api_root: String,
    /// Per-request deadline (default: 60s)
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_root", &self.api_root)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a config for the production API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create config from environment variables.
    ///
    /// `CLARIFAI_API_KEY` is required; `CLARIFAI_API_ROOT` and
    /// `CLARIFAI_TIMEOUT_SECS` fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CLARIFAI_API_KEY")
            .map_err(|_| ClarifaiError::Config("CLARIFAI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(root) = std::env::var("CLARIFAI_API_ROOT") {
            config = config.api_root(root);
        }
        if let Ok(secs) = std::env::var("CLARIFAI_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ClarifaiError::Config(format!("CLARIFAI_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Set the API root (e.g. a staging host or a local mock).
    pub fn api_root(mut self, root: impl Into<String>) -> Self {
        self.api_root = root.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join root, version and endpoint with exactly one `/` between each.
    pub fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_root.trim_end_matches('/'),
            API_VERSION,
            endpoint.trim_start_matches('/')
        )
    }
}
