//! HTTP client for the assistant backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::drafting::{
    Collaborator, CopyNotifier, DraftGenerator, ExternalFailure, GeneratedDraft,
    GenerationRequest,
};
use crate::models::{CitizenRequest, ResponseType};

use super::types::{
    CreateRequestBody, ErrorBody, FeedbackBody, FeedbackResponse, GenerateBody,
    GenerateResponse, ModelInfo,
};

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("not permitted to perform this operation")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the assistant backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:12000/api/v1`).
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(builder).send().await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder).await?.json().await.map_err(ApiError::Decode)
    }

    /// `GET /models`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        self.send_json(self.http.get(self.url("/models"))).await
    }

    /// `POST /requests`
    pub async fn create_request(
        &self,
        original_text: &str,
        response_type: ResponseType,
    ) -> Result<CitizenRequest, ApiError> {
        let body = CreateRequestBody {
            original_text,
            response_type,
            is_new_request: true,
        };
        self.send_json(self.http.post(self.url("/requests")).json(&body))
            .await
    }

    /// `POST /generate`
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerateResponse, ApiError> {
        let body = GenerateBody {
            request_id: request.request_id,
            model_name: &request.model_name,
            custom_input: &request.custom_input,
            citizen_name: request.citizen_name.as_deref(),
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            repetition_penalty: request.params.repetition_penalty,
            system_prompt: "",
        };
        debug!(request_id = request.request_id, model = %request.model_name, "requesting draft");
        self.send_json(self.http.post(self.url("/generate")).json(&body))
            .await
    }

    /// `PUT /responses/{id}/mark-copied`
    pub async fn mark_copied(&self, response_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/responses/{response_id}/mark-copied"));
        self.send(self.http.put(url)).await?;
        Ok(())
    }

    /// `POST /responses/feedback`
    pub async fn update_feedback(
        &self,
        response_id: i64,
        is_selected: bool,
        copied: bool,
    ) -> Result<FeedbackResponse, ApiError> {
        let body = FeedbackBody {
            response_id,
            is_selected,
            copied,
        };
        self.send_json(self.http.post(self.url("/responses/feedback")).json(&body))
            .await
    }
}

/// Map non-2xx responses to [`ApiError`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("error").to_string()
            } else {
                trimmed.to_string()
            }
        });

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        _ => ApiError::Status {
            status: status.as_u16(),
            detail,
        },
    })
}

fn external(collaborator: Collaborator, err: &ApiError) -> ExternalFailure {
    ExternalFailure::new(collaborator, err.to_string())
}

#[async_trait]
impl DraftGenerator for ApiClient {
    async fn create_request(
        &self,
        original_text: &str,
        response_type: ResponseType,
    ) -> Result<CitizenRequest, ExternalFailure> {
        Self::create_request(self, original_text, response_type)
            .await
            .map_err(|e| external(Collaborator::Generation, &e))
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedDraft, ExternalFailure> {
        let response = Self::generate(self, request)
            .await
            .map_err(|e| external(Collaborator::Generation, &e))?;
        debug!(
            request_id = response.request_id,
            response_id = response.id,
            latency_ms = response.latency_ms,
            "draft received"
        );

        if response.response_text.trim().is_empty() {
            return Err(ExternalFailure::new(
                Collaborator::Generation,
                "backend returned an empty response",
            ));
        }

        Ok(GeneratedDraft {
            remote_id: response.id,
            text: response.response_text,
            model_name: response.model_name,
            latency_ms: response.latency_ms,
        })
    }
}

#[async_trait]
impl CopyNotifier for ApiClient {
    /// Mark the response copied, then record it as the selected one.
    async fn notify_copied(&self, remote_id: i64) -> Result<(), ExternalFailure> {
        self.mark_copied(remote_id)
            .await
            .map_err(|e| external(Collaborator::CopyNotification, &e))?;
        let feedback = self
            .update_feedback(remote_id, true, true)
            .await
            .map_err(|e| external(Collaborator::CopyNotification, &e))?;
        if !feedback.success {
            return Err(ExternalFailure::new(
                Collaborator::CopyNotification,
                feedback.message,
            ));
        }
        Ok(())
    }
}
