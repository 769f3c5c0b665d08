//! Wire types for the assistant backend.

use serde::{Deserialize, Serialize};

use crate::models::ResponseType;

/// Body of `POST /requests`.
#[derive(Debug, Serialize)]
pub struct CreateRequestBody<'a> {
    pub original_text: &'a str,
    pub response_type: ResponseType,
    pub is_new_request: bool,
}

/// Body of `POST /generate`.
#[derive(Debug, Serialize)]
pub struct GenerateBody<'a> {
    pub request_id: i64,
    pub model_name: &'a str,
    pub custom_input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizen_name: Option<&'a str>,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
    /// Empty to use the backend's own prompt.
    pub system_prompt: &'a str,
}

/// Response of `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub id: i64,
    pub request_id: i64,
    pub model_name: String,
    pub response_text: String,
    #[serde(default)]
    pub latency_ms: f64,
}

/// Body of `POST /responses/feedback`.
#[derive(Debug, Serialize)]
pub struct FeedbackBody {
    pub response_id: i64,
    pub is_selected: bool,
    pub copied: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// A model offered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub supports_embedding: Option<bool>,
    pub supports_chat: Option<bool>,
}

impl ModelInfo {
    /// Display name when the backend provides one, else the raw name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Error body returned by the backend (`{"detail": ...}`).
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail; validation errors arrive as a JSON array.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
