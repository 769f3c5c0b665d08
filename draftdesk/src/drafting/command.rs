//! Typed commands accepted by the drafting controller and what they report.

use serde::Serialize;

use crate::models::{Draft, Phase};

use super::error::ExternalFailure;
use super::service::GenerationParams;
use super::session::DraftSession;

/// Input for one generation.
#[derive(Debug, Clone)]
pub struct GenerateInput {
    /// The incoming citizen request.
    pub request_text: String,
    /// The user's own reply draft.
    pub reply_draft: String,
    pub model: String,
    pub citizen_name: Option<String>,
    pub params: GenerationParams,
}

/// A user action on the current session.
#[derive(Debug, Clone)]
pub enum DraftCommand {
    /// Generate a new draft.
    Generate(GenerateInput),
    /// Select and copy a draft.
    Finalize { draft_id: String },
    /// Drop the session and start over.
    NewRequest,
}

/// Result of a finalize: the committed selection plus collaborator warnings.
#[derive(Debug, Clone)]
pub struct CopyReport {
    pub draft: Draft,
    /// Set when the backend could not be told about the copy.
    pub notification: Option<ExternalFailure>,
    /// Set when the text could not be placed on the clipboard.
    pub clipboard: Option<ExternalFailure>,
}

impl CopyReport {
    /// Whether every side effect went through.
    pub const fn is_clean(&self) -> bool {
        self.notification.is_none() && self.clipboard.is_none()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ExternalFailure> {
        self.notification.iter().chain(self.clipboard.iter())
    }
}

/// What a command did.
#[derive(Debug, Clone)]
pub enum DraftEvent {
    Generated(Draft),
    Finalized(CopyReport),
    Reset,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub request_id: Option<i64>,
    pub phase: Phase,
    pub draft_count: u8,
    pub remaining_drafts: u8,
    pub can_generate: bool,
    pub can_finalize: bool,
    pub show_new_request: bool,
    pub primary: Option<Draft>,
    pub previous: Vec<Draft>,
}

impl From<&DraftSession> for DraftView {
    fn from(session: &DraftSession) -> Self {
        Self {
            request_id: session.request_id(),
            phase: session.phase(),
            draft_count: session.draft_count(),
            remaining_drafts: session.remaining_drafts(),
            can_generate: session.can_generate(),
            can_finalize: session.can_finalize() && session.primary().is_some(),
            show_new_request: session.show_new_request(),
            primary: session.primary().cloned(),
            previous: session.previous().cloned().collect(),
        }
    }
}
