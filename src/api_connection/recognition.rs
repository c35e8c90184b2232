use base64::{engine::general_purpose, Engine};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::connection::{build_http_client, read_json_response, with_timeout, ApiConnectionError};
use super::endpoints::{WorkflowPrediction, WorkflowRequest};
use crate::models::RawDetection;

/// What the recognition workflow returned for one photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionOutcome {
    pub detections: Vec<RawDetection>,
    /// Annotated image as base64 (optionally a data URL), when the workflow renders one.
    pub visualization: Option<String>,
}

pub struct RecognitionClient {
    client: Client,
    workflow_url: String,
    api_key: String,
    workspace: String,
    timeout: Duration,
}

impl RecognitionClient {
    pub fn new(
        workflow_base_url: &str,
        workflow_id: &str,
        workspace: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, ApiConnectionError> {
        if api_key.trim().is_empty() {
            return Err(ApiConnectionError::MissingApiKey("ROBOFLOW_API_KEY".to_string()));
        }
        Ok(Self {
            client: build_http_client(timeout)?,
            workflow_url: format!("{}/{}", workflow_base_url.trim_end_matches('/'), workflow_id),
            api_key: api_key.to_string(),
            workspace: workspace.to_string(),
            timeout,
        })
    }

    pub fn workflow_url(&self) -> &str {
        &self.workflow_url
    }

    async fn post_workflow(&self, payload: &WorkflowRequest) -> Result<Value, ApiConnectionError> {
        let response = self
            .client
            .post(&self.workflow_url)
            .query(&[("access_key", self.api_key.as_str()), ("workspace", self.workspace.as_str())])
            .json(payload)
            .send()
            .await?;
        read_json_response(response).await
    }

    pub async fn try_detect(&self, image: &[u8]) -> Result<RecognitionOutcome, ApiConnectionError> {
        let payload = WorkflowRequest::base64(general_purpose::STANDARD.encode(image));
        let result = with_timeout(self.timeout, self.post_workflow(&payload)).await?;
        Ok(parse_workflow_response(&result))
    }

    /// Never fails: an unreachable or broken service reads as "nothing seen".
    pub async fn detect(&self, image: &[u8]) -> RecognitionOutcome {
        match self.try_detect(image).await {
            Ok(outcome) => {
                log::info!("Recognition returned {} raw detections", outcome.detections.len());
                outcome
            }
            Err(e) => {
                log::warn!("Recognition unavailable: {}", e);
                RecognitionOutcome::default()
            }
        }
    }
}

fn prediction_list(predictions: &Value) -> Option<&Vec<Value>> {
    match predictions {
        Value::Array(list) => Some(list),
        // Object-detection blocks nest the list one level down.
        Value::Object(obj) => obj.get("predictions").and_then(Value::as_array),
        _ => None,
    }
}

/// Accepts either a single result object or a list whose first element is
/// the result object.
pub fn parse_workflow_response(result: &Value) -> RecognitionOutcome {
    let result_data = match result {
        Value::Array(list) => match list.first() {
            Some(first) => first,
            None => return RecognitionOutcome::default(),
        },
        other => other,
    };

    let detections: Vec<RawDetection> = result_data
        .get("predictions")
        .and_then(prediction_list)
        .map(|list| {
            list.iter()
                .filter_map(|raw| serde_json::from_value::<WorkflowPrediction>(raw.clone()).ok())
                .filter_map(|pred| {
                    let label = pred.class_name.trim().to_lowercase();
                    if label.is_empty() {
                        None
                    } else {
                        Some(RawDetection::new(label, pred.confidence))
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let visualization = result_data
        .get("visualization")
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("value").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .filter(|s| !s.is_empty());

    RecognitionOutcome { detections, visualization }
}

/// Strips a `data:...;base64,` prefix and decodes the visualization image.
pub fn decode_visualization(visualization: &str) -> Option<Vec<u8>> {
    let encoded = match visualization.split_once(',') {
        Some((_, data)) => data,
        None => visualization,
    };
    general_purpose::STANDARD.decode(encoded.trim()).ok()
}
