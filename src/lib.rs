//! # clarifai-rs
//!
//! Async Rust client for the [Clarifai](https://www.clarifai.com) v2 API:
//! image and video tagging through the predict endpoint, and input
//! management through the inputs endpoint.
//!
//! ## Features
//!
//! - **Predict** on images or videos given as URLs, in-memory bytes or
//!   local files
//! - **Inputs** upload (URLs, bytes, files) and delete-all
//! - **Typed errors** for every failure: transport, HTTP status, decoding,
//!   file access
//! - **One automatic retry** on HTTP 401, with the same key
//! - **Per-request timeout** and an optional cancellation flag
//!
//! ## Quick Start
//!
//! ```no_run
//! use clarifai_rs::{ClarifaiClient, top_five};
//!
//! # async fn example() -> clarifai_rs::Result<()> {
//! let client = ClarifaiClient::new("my-api-key");
//!
//! // Tag a hosted image with the general model
//! let response = client
//!     .predict_by_urls(
//!         &["https://samples.clarifai.com/metro-north.jpg"],
//!         "aaa03c23b3724a16a56b629203edc62c",
//!     )
//!     .await?;
//! println!("Tags: {:?}", top_five(&response)?);
//!
//! // Store local files as inputs
//! client.input_by_files(&["photo.jpg"]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! ```rust
//! use clarifai_rs::{top_five, ClarifaiError, Response};
//!
//! // An empty response has no outputs to take tags from
//! let err = top_five(&Response::default()).unwrap_err();
//! assert!(matches!(err, ClarifaiError::NoOutputs));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod requests;
pub mod tags;
pub mod types;

pub use client::ClarifaiClient;
pub use config::{ClientConfig, API_VERSION, DEFAULT_API_ROOT};
pub use error::{ClarifaiError, Result};
pub use tags::{top_five, top_tags};
pub use types::{
    Action, And, Concept, Data, Geo, GeoLimit, GeoPoint, Image, Input, InputReq, Model, ModelReq,
    ModelVersion, Output, OutputConfig, OutputInfo, PredictReq, Query, Response, SearchReq, Status,
    StoredInput, Video, STATUS_SUCCESS,
};
