//! Drafting controller.
//!
//! Owns one [`DraftSession`] and the collaborators that feed it. Every
//! operation takes `&mut self`, so only one generation or finalize can be in
//! flight; the session guards are checked again before anything is committed.

use tracing::{debug, info, warn};

use crate::models::{Draft, ResponseType};

use super::command::{CopyReport, DraftCommand, DraftEvent, DraftView, GenerateInput};
use super::error::DraftError;
use super::service::{ClipboardWriter, CopyNotifier, DraftGenerator, GenerationRequest};
use super::session::DraftSession;

/// Drives a draft session against its collaborators.
pub struct Drafter<G, N, C> {
    session: DraftSession,
    generator: G,
    notifier: N,
    clipboard: C,
}

impl<G, N, C> Drafter<G, N, C>
where
    G: DraftGenerator,
    N: CopyNotifier,
    C: ClipboardWriter,
{
    /// Create a controller with an empty session.
    pub fn new(generator: G, notifier: N, clipboard: C) -> Self {
        Self {
            session: DraftSession::new(),
            generator,
            notifier,
            clipboard,
        }
    }

    /// Continue an existing session (e.g. one restored from the cache).
    pub fn with_session(mut self, session: DraftSession) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    pub fn view(&self) -> DraftView {
        DraftView::from(&self.session)
    }

    /// Execute one command.
    pub async fn dispatch(&mut self, command: DraftCommand) -> Result<DraftEvent, DraftError> {
        match command {
            DraftCommand::Generate(input) => {
                let draft = self.generate(input).await?.clone();
                Ok(DraftEvent::Generated(draft))
            }
            DraftCommand::Finalize { draft_id } => {
                let report = self.finalize(&draft_id).await?;
                Ok(DraftEvent::Finalized(report))
            }
            DraftCommand::NewRequest => {
                self.new_request();
                Ok(DraftEvent::Reset)
            }
        }
    }

    /// Generate a draft and record it.
    ///
    /// The citizen request is registered on the first call of a session and
    /// its id kept even if generation then fails, so a retry reuses it.
    pub async fn generate(&mut self, input: GenerateInput) -> Result<&Draft, DraftError> {
        let request_text = input.request_text.trim();
        let reply_draft = input.reply_draft.trim();
        if request_text.is_empty() || reply_draft.is_empty() {
            return Err(DraftError::InvalidInput(
                "both the citizen request and your reply draft are required".to_string(),
            ));
        }
        if input.model.trim().is_empty() {
            return Err(DraftError::InvalidInput("a model name is required".to_string()));
        }

        self.session.ensure_can_generate()?;

        let request_id = if let Some(id) = self.session.request_id() {
            id
        } else {
            let request = self
                .generator
                .create_request(request_text, ResponseType::Informative)
                .await?;
            info!(request_id = request.id, "registered citizen request");
            self.session.bind_request(request.id);
            request.id
        };

        let generation = GenerationRequest {
            request_id,
            model_name: input.model.trim().to_string(),
            custom_input: reply_draft.to_string(),
            citizen_name: input
                .citizen_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            params: input.params,
        };

        let generated = self.generator.generate(&generation).await.map_err(|e| {
            warn!(request_id, error = %e, "draft generation failed");
            e
        })?;

        let model_name = if generated.model_name.is_empty() {
            generation.model_name
        } else {
            generated.model_name
        };
        let draft = self.session.record_draft(generated.text, model_name)?;
        draft.remote_id = Some(generated.remote_id);
        draft.latency_ms = Some(generated.latency_ms);
        info!(
            request_id,
            draft_id = %draft.id,
            latency_ms = ?draft.latency_ms,
            "draft generated"
        );
        Ok(&*draft)
    }

    /// Finalize a draft, then notify the backend and copy its text.
    ///
    /// The local transition is committed first; collaborator failures are
    /// returned in the report and never undo it.
    pub async fn finalize(&mut self, draft_id: &str) -> Result<CopyReport, DraftError> {
        let draft = self.session.finalize(draft_id)?.clone();
        info!(draft_id = %draft.id, "draft finalized");

        let notification = match draft.remote_id {
            Some(remote_id) => self.notifier.notify_copied(remote_id).await.err(),
            None => {
                debug!(draft_id = %draft.id, "draft has no backend id; skipping copy notification");
                None
            }
        };
        if let Some(failure) = &notification {
            warn!(error = %failure, "copy notification failed; keeping local selection");
        }

        let clipboard = self.clipboard.write_text(&draft.text).err();
        if let Some(failure) = &clipboard {
            warn!(error = %failure, "clipboard write failed");
        }

        Ok(CopyReport {
            draft,
            notification,
            clipboard,
        })
    }

    /// Start over with an empty session.
    pub fn new_request(&mut self) {
        self.session.reset();
        info!("started new request");
    }
}
