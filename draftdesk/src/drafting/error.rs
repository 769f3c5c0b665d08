//! Drafting error taxonomy.

use thiserror::Error;

use crate::models::Phase;

use super::session::MAX_DRAFTS;

/// External collaborator a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    /// Draft generation service (request creation and generation).
    Generation,
    /// System clipboard.
    Clipboard,
    /// Backend copy notification.
    CopyNotification,
}

impl Collaborator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generation => "draft generation",
            Self::Clipboard => "clipboard",
            Self::CopyNotification => "copy notification",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A collaborator call failed. Session state is never changed by one.
#[derive(Debug, Clone, Error)]
#[error("{collaborator} failed: {message}")]
pub struct ExternalFailure {
    pub collaborator: Collaborator,
    pub message: String,
}

impl ExternalFailure {
    pub fn new(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the drafting state machine and controller.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Operation attempted outside its allowed phase or draft count.
    #[error("cannot {action}: session is {phase} with {draft_count}/{max} drafts used", max = MAX_DRAFTS)]
    InvalidState {
        action: &'static str,
        phase: Phase,
        draft_count: u8,
    },

    /// Referenced draft is not part of the session.
    #[error("draft {0} not found in the current session")]
    NotFound(String),

    /// Command input rejected before any state change.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    External(#[from] ExternalFailure),
}

impl DraftError {
    /// Whether the error is a state-machine guard rejection.
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
