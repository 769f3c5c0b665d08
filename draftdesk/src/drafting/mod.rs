//! Response drafting lifecycle.
//!
//! - [`DraftSession`]: the state machine (how many drafts, whether finalized)
//! - [`Drafter`]: runs typed commands against the session and its collaborators
//! - collaborator traits the backend client and clipboard implement

mod command;
mod controller;
mod error;
mod service;
mod session;

pub use command::{CopyReport, DraftCommand, DraftEvent, DraftView, GenerateInput};
pub use controller::Drafter;
pub use error::{Collaborator, DraftError, ExternalFailure};
pub use service::{
    ClipboardWriter, CopyNotifier, DraftGenerator, GeneratedDraft, GenerationParams,
    GenerationRequest,
};
pub use session::{DraftSession, MAX_DRAFTS};
