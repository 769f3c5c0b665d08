//! Citizen request model.

use serde::{Deserialize, Serialize};

/// Kind of reply expected for a citizen request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Positive,
    Negative,
    #[default]
    Informative,
    Other,
}

impl ResponseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Informative => "informative",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A citizen request registered with the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenRequest {
    /// Backend-assigned identifier.
    pub id: i64,
    /// Text of the request as the citizen wrote it.
    pub original_text: String,
    /// Expected reply kind.
    pub response_type: ResponseType,
    /// When the backend stored the request, as the backend formats it.
    pub created_at: Option<String>,
}
