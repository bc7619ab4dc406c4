//! Wire types for the Clarifai v2 API.
//!
//! Every field that can be absent is skipped on serialization, so a
//! request body carries only what the caller set.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn is_false(b: &bool) -> bool {
    !*b
}

// The service sends `null` for unset fields; treat it like an absent one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Encode raw bytes with the standard base64 alphabet (padded).
pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// ── Media ───────────────────────────────────────────────────────────

/// A still image, referenced by URL or carried inline as base64.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    /// Crop region as `[top, left, bottom, right]` fractions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<[f64; 4]>,
}

impl Image {
    /// An image hosted at `url`.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// An image sent inline; `bytes` is base64-encoded here.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            base64: Some(encode_base64(bytes.as_ref())),
            ..Default::default()
        }
    }

    /// Restrict prediction to a region of the image.
    pub fn with_crop(mut self, top: f64, left: f64, bottom: f64, right: f64) -> Self {
        self.crop = Some([top, left, bottom, right]);
        self
    }
}

/// A video, referenced by URL or carried inline as base64.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

impl Video {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            base64: Some(encode_base64(bytes.as_ref())),
            ..Default::default()
        }
    }
}

// ── Concepts and geo ────────────────────────────────────────────────

/// A tag, either predicted by a model or attached to an input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub app_id: String,
    /// Confidence in `[0.0, 1.0]`, as reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
}

impl Concept {
    /// A concept referenced by id only.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLimit {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub geo_point: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_limit: Option<GeoLimit>,
}

// ── Data and inputs ─────────────────────────────────────────────────

/// Payload of an input or output. Holds an image or a video, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<Concept>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

impl Data {
    pub fn image(image: Image) -> Self {
        Self {
            image: Some(image),
            ..Default::default()
        }
    }

    pub fn video(video: Video) -> Self {
        Self {
            video: Some(video),
            ..Default::default()
        }
    }
}

/// One unit of media submitted to or returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
}

impl Input {
    pub fn new(data: Data) -> Self {
        Self {
            id: None,
            data: Some(data),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// ── Models ──────────────────────────────────────────────────────────

/// How a model filters and interprets its predictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub select_concepts: Vec<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concepts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f32>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub concepts_mutually_exclusive: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub closed_environment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputInfo {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "type",
        skip_serializing_if = "String::is_empty"
    )]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub type_ext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_config: Option<OutputConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
}

/// A remote predictive model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_info: Option<OutputInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<ModelVersion>,
}

// ── Status ──────────────────────────────────────────────────────────

/// Outcome reported by the service for a response or sub-resource.
///
/// This describes what happened remotely; it is not a local error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "deserialize_status_code")]
    pub code: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Status code success value used throughout the v2 API.
pub const STATUS_SUCCESS: u32 = 10000;

impl Status {
    pub fn is_success(&self) -> bool {
        self.code == STATUS_SUCCESS
    }
}

// Codes arrive as numbers, but accept numeric strings too.
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid status code: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid status code: {}", s))),
        Value::Null => Ok(0),
        _ => Err(serde::de::Error::custom("Expected number or string status code")),
    }
}

// ── Responses ───────────────────────────────────────────────────────

/// Result of running a model against one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Input>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Output {
    /// Concepts predicted for this output, empty when none came back.
    pub fn concepts(&self) -> &[Concept] {
        self.data
            .as_ref()
            .map(|d| d.concepts.as_slice())
            .unwrap_or_default()
    }
}

/// An input as stored on the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Data,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
}

/// Top-level body returned by predict and input calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: Vec<Output>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Vec<StoredInput>,
}

// ── Request envelopes ───────────────────────────────────────────────

/// How `POST inputs` treats inputs that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Merge,
    Overwrite,
    Remove,
}

/// Body of `POST models/{id}/outputs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictReq {
    #[serde(default, deserialize_with = "null_as_default")]
    pub inputs: Vec<Input>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
}

/// Body of `POST inputs` and `DELETE inputs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputReq {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Input>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "is_false")]
    pub delete_all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReq {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<Model>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<Concept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// One clause of a search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct And {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Input>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Output>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ands: Vec<And>,
}

/// Search request schema. Query construction is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchReq {
    pub query: Query,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_from_url_sets_only_url() {
        let value = serde_json::to_value(Image::from_url("a.jpg")).unwrap();
        assert_eq!(value, json!({"url": "a.jpg"}));
    }

    #[test]
    fn test_image_from_bytes_encodes_base64() {
        let image = Image::from_bytes([0x01u8, 0x02]);
        assert_eq!(image.base64.as_deref(), Some("AQI="));
        assert!(image.url.is_none());
    }

    #[test]
    fn test_image_crop_serialization() {
        let image = Image::from_url("a.jpg").with_crop(0.1, 0.2, 0.9, 0.8);
        let value = serde_json::to_value(image).unwrap();
        assert_eq!(value["crop"], json!([0.1, 0.2, 0.9, 0.8]));
    }

    #[test]
    fn test_video_from_url() {
        let data = Data::video(Video::from_url("beer.mp4"));
        let value = serde_json::to_value(data).unwrap();
        assert_eq!(value, json!({"video": {"url": "beer.mp4"}}));
    }

    #[test]
    fn test_input_req_delete_all_body() {
        let req = InputReq {
            delete_all: true,
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(req).unwrap(), json!({"delete_all": true}));
    }

    #[test]
    fn test_input_req_action_lowercase() {
        let req = InputReq {
            inputs: vec![Input::new(Data::image(Image::from_url("a.jpg")))],
            action: Some(Action::Merge),
            ..Default::default()
        };
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(value["action"], "merge");
        assert!(value.get("delete_all").is_none());
    }

    #[test]
    fn test_predict_req_always_has_inputs() {
        let value = serde_json::to_value(PredictReq::default()).unwrap();
        assert_eq!(value, json!({"inputs": []}));
    }

    #[test]
    fn test_input_with_metadata_and_concepts() {
        let mut data = Data::image(Image::from_url("a.jpg"));
        data.concepts.push(Concept {
            value: Some(1.0),
            ..Concept::with_id("dog")
        });
        data.metadata.insert("owner".into(), json!("alice"));
        let value = serde_json::to_value(Input::new(data).with_id("in-1")).unwrap();
        assert_eq!(value["id"], "in-1");
        assert_eq!(value["data"]["concepts"][0], json!({"id": "dog", "value": 1.0}));
        assert_eq!(value["data"]["metadata"]["owner"], "alice");
    }

    #[test]
    fn test_geo_serialization() {
        let geo = Geo {
            geo_point: GeoPoint {
                longitude: -30.5,
                latitude: 40.25,
            },
            geo_limit: Some(GeoLimit {
                kind: "withinKilometers".into(),
                value: 10,
            }),
        };
        let value = serde_json::to_value(geo).unwrap();
        assert_eq!(value["geo_point"]["latitude"], 40.25);
        assert_eq!(value["geo_limit"]["type"], "withinKilometers");
    }

    #[test]
    fn test_status_code_from_number_or_string() {
        let a: Status = serde_json::from_str(r#"{"code": 10000, "description": "Ok"}"#).unwrap();
        let b: Status = serde_json::from_str(r#"{"code": "10000", "description": "Ok"}"#).unwrap();
        assert_eq!(a, b);
        assert!(a.is_success());
    }

    #[test]
    fn test_status_code_rejects_garbage() {
        let result = serde_json::from_str::<Status>(r#"{"code": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_predict_response() {
        let response: Response = serde_json::from_str(
            r#"{
            "status": {"code": 10000, "description": "Ok"},
            "outputs": [{
                "id": "out-1",
                "status": {"code": 10000, "description": "Ok"},
                "created_at": "2016-11-22T16:59:23.675919Z",
                "model": {
                    "name": "general-v1.3",
                    "id": "aaa03c23b3724a16a56b629203edc62c",
                    "output_info": {"message": "Show output_info with: GET /models/{model_id}/output_info", "type": "concept"},
                    "model_version": {"id": "aa9ca48295b37401f8af92ad1af0d91d", "status": {"code": 21100, "description": "Model trained successfully"}}
                },
                "input": {"id": "in-1", "data": {"image": {"url": "https://samples.clarifai.com/metro-north.jpg"}}},
                "data": {"concepts": [
                    {"id": "ai_HLmqFqBf", "name": "train", "app_id": null, "value": 0.9989112}
                ]}
            }]
        }"#,
        )
        .unwrap();

        assert!(response.status.is_success());
        assert_eq!(response.outputs.len(), 1);
        let output = &response.outputs[0];
        assert_eq!(output.concepts()[0].name, "train");
        assert!(output.created_at.is_some());
        let model = output.model.as_ref().unwrap();
        assert_eq!(model.output_info.as_ref().unwrap().kind, "concept");
        assert_eq!(model.model_version.as_ref().unwrap().status.code, 21100);
        assert!(response.inputs.is_empty());
    }

    #[test]
    fn test_parse_inputs_response() {
        let response: Response = serde_json::from_str(
            r#"{
            "status": {"code": 10000, "description": "Ok"},
            "inputs": [{
                "id": "in-1",
                "data": {"image": {"url": "https://samples.clarifai.com/metro-north.jpg"}},
                "created_at": "2017-01-01T00:00:00Z",
                "modified_at": "2017-01-02T00:00:00Z",
                "status": {"code": 30000, "description": "Download complete"}
            }]
        }"#,
        )
        .unwrap();

        assert!(response.outputs.is_empty());
        assert_eq!(response.inputs[0].id, "in-1");
        assert_eq!(response.inputs[0].status.code, 30000);
        assert!(response.inputs[0].modified_at.is_some());
    }

    #[test]
    fn test_parse_response_with_nulls() {
        let response: Response = serde_json::from_str(
            r#"{
            "status": {"code": 10000, "description": null, "details": null},
            "outputs": [{
                "id": null,
                "status": {"code": null, "description": null},
                "created_at": null,
                "model": {
                    "id": null,
                    "name": null,
                    "app_id": null,
                    "output_info": {"message": null, "type": null, "type_ext": null},
                    "model_version": {"id": null, "status": null}
                },
                "input": {"id": null, "data": null},
                "data": {"concepts": null, "metadata": null, "image": null, "geo": null}
            }],
            "inputs": [{
                "id": null,
                "data": null,
                "created_at": null,
                "modified_at": null,
                "status": null
            }]
        }"#,
        )
        .unwrap();

        assert!(response.status.is_success());
        assert!(response.status.description.is_empty());

        let output = &response.outputs[0];
        assert!(output.id.is_empty());
        assert!(output.concepts().is_empty());
        assert!(output.data.as_ref().unwrap().metadata.is_empty());
        let model = output.model.as_ref().unwrap();
        assert!(model.id.is_empty() && model.name.is_empty());
        assert!(model.output_info.as_ref().unwrap().kind.is_empty());
        assert_eq!(model.model_version.as_ref().unwrap().status, Status::default());

        let stored = &response.inputs[0];
        assert_eq!(stored.data, Data::default());
        assert_eq!(stored.status, Status::default());
    }

    #[test]
    fn test_parse_null_lists() {
        let response: Response =
            serde_json::from_str(r#"{"status": null, "outputs": null, "inputs": null}"#).unwrap();
        assert!(response.outputs.is_empty());
        assert!(response.inputs.is_empty());
        assert_eq!(response.status, Status::default());
    }

    #[test]
    fn test_output_concepts_empty_without_data() {
        assert!(Output::default().concepts().is_empty());
    }

    #[test]
    fn test_search_req_shape() {
        let req = SearchReq {
            query: Query {
                ands: vec![And {
                    output: Some(Output {
                        data: Some(Data {
                            concepts: vec![Concept {
                                name: "dog".into(),
                                ..Default::default()
                            }],
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
            },
        };
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(
            value,
            json!({"query": {"ands": [{"output": {"data": {"concepts": [{"name": "dog"}]}}}]}})
        );
    }
}
