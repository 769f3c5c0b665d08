//! Collaborators the drafting controller depends on.
//!
//! The controller never talks to the network or the OS directly; it goes
//! through these traits so the backend client and clipboard can be swapped
//! out (tests use in-memory fakes).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{CitizenRequest, ResponseType};

use super::error::ExternalFailure;

/// Sampling parameters forwarded to the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.2,
        }
    }
}

/// One generation call against a registered citizen request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub request_id: i64,
    pub model_name: String,
    /// The reply drafted by the user, which the model rewrites.
    pub custom_input: String,
    /// Name used in the salutation, if known.
    pub citizen_name: Option<String>,
    pub params: GenerationParams,
}

/// A draft returned by the generation backend.
#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    /// Backend response id.
    pub remote_id: i64,
    pub text: String,
    pub model_name: String,
    pub latency_ms: f64,
}

/// Creates citizen requests and generates drafts for them.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    /// Register a citizen request and return it with its backend id.
    async fn create_request(
        &self,
        original_text: &str,
        response_type: ResponseType,
    ) -> Result<CitizenRequest, ExternalFailure>;

    /// Generate one draft.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedDraft, ExternalFailure>;
}

/// Tells the backend which draft was chosen and copied.
#[async_trait]
pub trait CopyNotifier: Send + Sync {
    async fn notify_copied(&self, remote_id: i64) -> Result<(), ExternalFailure>;
}

/// Places text on the system clipboard.
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ExternalFailure>;
}

impl<T: ClipboardWriter + ?Sized> ClipboardWriter for Box<T> {
    fn write_text(&self, text: &str) -> Result<(), ExternalFailure> {
        (**self).write_text(text)
    }
}
