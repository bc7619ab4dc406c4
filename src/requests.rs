//! Predict and input calls built on [`ClarifaiClient::execute`].
//!
//! Each builder turns a batch of URLs, byte buffers or file paths into a
//! single request. Inputs appear in the body in the order given.

use reqwest::Method;
use std::path::Path;
use tracing::debug;

use crate::client::ClarifaiClient;
use crate::error::{ClarifaiError, Result};
use crate::types::{Data, Image, Input, InputReq, PredictReq, Response, Video};

#[derive(Debug, Clone, Copy)]
enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    fn url_input(self, url: &str) -> Input {
        match self {
            MediaKind::Image => Input::new(Data::image(Image::from_url(url))),
            MediaKind::Video => Input::new(Data::video(Video::from_url(url))),
        }
    }

    fn bytes_input(self, bytes: &[u8]) -> Input {
        match self {
            MediaKind::Image => Input::new(Data::image(Image::from_bytes(bytes))),
            MediaKind::Video => Input::new(Data::video(Video::from_bytes(bytes))),
        }
    }
}

fn url_inputs<S: AsRef<str>>(urls: &[S], kind: MediaKind) -> Vec<Input> {
    urls.iter().map(|u| kind.url_input(u.as_ref())).collect()
}

fn byte_inputs<B: AsRef<[u8]>>(buffers: &[B], kind: MediaKind) -> Vec<Input> {
    buffers.iter().map(|b| kind.bytes_input(b.as_ref())).collect()
}

/// Read every file, stopping at the first failure.
async fn read_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Vec<u8>>> {
    let mut buffers = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClarifaiError::Filesystem {
                path: path.to_path_buf(),
                source: e,
            })?;
        buffers.push(bytes);
    }
    Ok(buffers)
}

fn decode(bytes: &[u8]) -> Result<Response> {
    serde_json::from_slice(bytes).map_err(ClarifaiError::Deserialization)
}

fn predict_endpoint(model_id: &str) -> String {
    format!("models/{}/outputs", model_id)
}

const INPUTS_ENDPOINT: &str = "inputs";

impl ClarifaiClient {
    // ── Predict ─────────────────────────────────────────────────────

    /// Run `model_id` against the inputs in `req`.
    pub async fn predict(&self, req: &PredictReq, model_id: &str) -> Result<Response> {
        debug!("Predicting {} inputs with model {}", req.inputs.len(), model_id);
        let bytes = self
            .execute(Some(req), &predict_endpoint(model_id), Method::POST)
            .await?;
        decode(&bytes)
    }

    /// Predict on images hosted at the given URLs.
    pub async fn predict_by_urls<S: AsRef<str>>(
        &self,
        urls: &[S],
        model_id: &str,
    ) -> Result<Response> {
        self.predict_inputs(url_inputs(urls, MediaKind::Image), model_id)
            .await
    }

    /// Predict on in-memory images.
    pub async fn predict_by_bytes<B: AsRef<[u8]>>(
        &self,
        images: &[B],
        model_id: &str,
    ) -> Result<Response> {
        self.predict_inputs(byte_inputs(images, MediaKind::Image), model_id)
            .await
    }

    /// Predict on local image files. All files are read before sending.
    pub async fn predict_by_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        model_id: &str,
    ) -> Result<Response> {
        let buffers = read_files(paths).await?;
        self.predict_by_bytes(&buffers, model_id).await
    }

    /// Predict on videos hosted at the given URLs.
    pub async fn predict_video_by_urls<S: AsRef<str>>(
        &self,
        urls: &[S],
        model_id: &str,
    ) -> Result<Response> {
        self.predict_inputs(url_inputs(urls, MediaKind::Video), model_id)
            .await
    }

    /// Predict on in-memory videos.
    pub async fn predict_video_by_bytes<B: AsRef<[u8]>>(
        &self,
        videos: &[B],
        model_id: &str,
    ) -> Result<Response> {
        self.predict_inputs(byte_inputs(videos, MediaKind::Video), model_id)
            .await
    }

    /// Predict on local video files. All files are read before sending.
    pub async fn predict_video_by_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        model_id: &str,
    ) -> Result<Response> {
        let buffers = read_files(paths).await?;
        self.predict_video_by_bytes(&buffers, model_id).await
    }

    async fn predict_inputs(&self, inputs: Vec<Input>, model_id: &str) -> Result<Response> {
        let req = PredictReq {
            inputs,
            model: None,
        };
        self.predict(&req, model_id).await
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Store or update inputs on the service.
    pub async fn input(&self, req: &InputReq) -> Result<Response> {
        debug!("Submitting {} inputs", req.inputs.len());
        let bytes = self
            .execute(Some(req), INPUTS_ENDPOINT, Method::POST)
            .await?;
        decode(&bytes)
    }

    /// Store images hosted at the given URLs.
    pub async fn input_by_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Response> {
        self.add_inputs(url_inputs(urls, MediaKind::Image)).await
    }

    /// Store in-memory images.
    pub async fn input_by_bytes<B: AsRef<[u8]>>(&self, images: &[B]) -> Result<Response> {
        self.add_inputs(byte_inputs(images, MediaKind::Image)).await
    }

    /// Store local image files. All files are read before sending.
    pub async fn input_by_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Response> {
        let buffers = read_files(paths).await?;
        self.input_by_bytes(&buffers).await
    }

    /// Store videos hosted at the given URLs.
    pub async fn input_video_by_urls<S: AsRef<str>>(&self, urls: &[S]) -> Result<Response> {
        self.add_inputs(url_inputs(urls, MediaKind::Video)).await
    }

    /// Delete every input stored in the application.
    pub async fn delete_all_inputs(&self) -> Result<Response> {
        let req = InputReq {
            delete_all: true,
            ..Default::default()
        };
        debug!("Deleting all inputs");
        let bytes = self
            .execute(Some(&req), INPUTS_ENDPOINT, Method::DELETE)
            .await?;
        decode(&bytes)
    }

    async fn add_inputs(&self, inputs: Vec<Input>) -> Result<Response> {
        let req = InputReq {
            inputs,
            ..Default::default()
        };
        self.input(&req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_inputs_only_set_url() {
        let req = PredictReq {
            inputs: url_inputs(&["a.jpg", "b.jpg"], MediaKind::Image),
            model: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"inputs": [
                {"data": {"image": {"url": "a.jpg"}}},
                {"data": {"image": {"url": "b.jpg"}}}
            ]})
        );
    }

    #[test]
    fn test_byte_inputs_base64() {
        let inputs = byte_inputs(&[vec![0x01u8, 0x02]], MediaKind::Image);
        let image = inputs[0].data.as_ref().unwrap().image.as_ref().unwrap();
        assert_eq!(image.base64.as_deref(), Some("AQI="));
        assert!(image.url.is_none());
    }

    #[test]
    fn test_video_inputs() {
        let inputs = url_inputs(&["beer.mp4".to_string()], MediaKind::Video);
        let data = inputs[0].data.as_ref().unwrap();
        assert!(data.image.is_none());
        assert_eq!(data.video.as_ref().unwrap().url.as_deref(), Some("beer.mp4"));
    }

    #[test]
    fn test_empty_batch() {
        assert!(url_inputs::<&str>(&[], MediaKind::Image).is_empty());
    }

    #[test]
    fn test_predict_endpoint() {
        assert_eq!(predict_endpoint("m1"), "models/m1/outputs");
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        let err = decode(b"<html>").unwrap_err();
        assert!(matches!(err, ClarifaiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_read_files_stops_at_missing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.jpg");
        std::fs::write(&present, [1u8, 2, 3]).unwrap();
        let missing = dir.path().join("missing.jpg");

        let err = read_files(&[present.clone(), missing.clone()]).await.unwrap_err();
        match err {
            ClarifaiError::Filesystem { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }

        let buffers = read_files(&[present]).await.unwrap();
        assert_eq!(buffers, vec![vec![1u8, 2, 3]]);
    }
}
