//! Drafting phase of a session.

use serde::{Deserialize, Serialize};

/// Phase of a draft session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Drafts may still be generated and one may be finalized.
    #[default]
    Drafting,
    /// A draft has been selected and copied; the session is closed.
    Finalized,
}

impl Phase {
    /// Convert phase to its display/storage string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drafting => "drafting",
            Self::Finalized => "finalized",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
