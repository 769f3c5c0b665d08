//! Draft model representing one AI-generated candidate reply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated reply to a citizen request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Locally assigned unique identifier.
    pub id: String,
    /// Response id assigned by the backend, used for copy notification.
    pub remote_id: Option<i64>,
    /// Generated text.
    pub text: String,
    /// Model that produced the text.
    pub model_name: String,
    /// Generation latency reported by the backend.
    pub latency_ms: Option<f64>,
    /// Whether this draft was the one finalized and copied.
    #[serde(default)]
    pub copied: bool,
    /// When the draft was recorded.
    pub created_at: DateTime<Utc>,
}

impl Draft {
    /// Create a draft with a fresh id and the current timestamp.
    pub fn new(text: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            remote_id: None,
            text: text.into(),
            model_name: model_name.into(),
            latency_ms: None,
            copied: false,
            created_at: Utc::now(),
        }
    }

    /// First eight characters of the id, for display.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drafts_get_distinct_ids() {
        let a = Draft::new("a", "m1");
        let b = Draft::new("a", "m1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.short_id().len(), 8);
        assert!(a.id.starts_with(a.short_id()));
    }

    #[test]
    fn new_draft_has_no_backend_fields() {
        let draft = Draft::new("text", "gemini-1.5");
        assert_eq!(draft.remote_id, None);
        assert_eq!(draft.latency_ms, None);
        assert!(!draft.copied);
    }
}
