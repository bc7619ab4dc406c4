use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by Clarifai operations.
#[derive(Error, Debug)]
pub enum ClarifaiError {
    /// The request body could not be encoded as JSON.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        source: reqwest::Error,
    },

    /// Clarifai answered HTTP 401 twice in a row.
    #[error("Clarifai rejected the API key")]
    InvalidApiKey,

    /// Clarifai answered HTTP 400.
    #[error("Clarifai rejected the request: {0}")]
    RequestRejected(String),

    /// Clarifai answered HTTP 500.
    #[error("Clarifai internal error: {0}")]
    RemoteService(String),

    /// Clarifai answered with a status this client does not handle.
    #[error("Clarifai returned unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("Failed to decode Clarifai response: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A local media file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The caller's cancellation flag was raised before the request went out.
    #[error("Request was cancelled")]
    Cancelled,

    /// Configuration could not be assembled.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The predict response carried no outputs.
    #[error("Response contains no outputs")]
    NoOutputs,

    /// The first output had fewer concepts than requested.
    #[error("Wanted {wanted} concepts but the response has {found}")]
    InsufficientConcepts { wanted: usize, found: usize },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClarifaiError>;
