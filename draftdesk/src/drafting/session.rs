//! Draft session state machine.
//!
//! A session tracks the drafts generated for one citizen request:
//! - `Drafting`: up to [`MAX_DRAFTS`] drafts may be generated, one may be finalized
//! - `Finalized`: a draft was copied; only [`DraftSession::reset`] leaves this phase
//!
//! Drafts are kept newest first. Finalizing moves the selected draft to the
//! front so `responses()[0]` is always the one to present.

use serde::{Deserialize, Serialize};

use crate::models::{Draft, Phase};

use super::error::DraftError;

/// Maximum number of drafts per session.
pub const MAX_DRAFTS: u8 = 5;

/// Maximum number of non-primary drafts presented.
pub const MAX_PREVIOUS: usize = 4;

/// Lifecycle of the drafts produced for one citizen request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftSession {
    request_id: Option<i64>,
    responses: Vec<Draft>,
    draft_count: u8,
    phase: Phase,
}

impl DraftSession {
    /// Create an empty session in the `Drafting` phase.
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn request_id(&self) -> Option<i64> {
        self.request_id
    }

    /// Drafts, newest (or finalized) first.
    pub fn responses(&self) -> &[Draft] {
        &self.responses
    }

    pub const fn draft_count(&self) -> u8 {
        self.draft_count
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether another draft may be generated.
    pub fn can_generate(&self) -> bool {
        self.phase == Phase::Drafting && self.draft_count < MAX_DRAFTS
    }

    /// Whether a draft may be finalized.
    pub fn can_finalize(&self) -> bool {
        self.phase == Phase::Drafting
    }

    /// Whether the UI should offer starting a new request.
    pub fn show_new_request(&self) -> bool {
        self.phase == Phase::Finalized || self.draft_count >= MAX_DRAFTS
    }

    pub const fn remaining_drafts(&self) -> u8 {
        MAX_DRAFTS.saturating_sub(self.draft_count)
    }

    /// The draft to present as the main response.
    pub fn primary(&self) -> Option<&Draft> {
        self.responses.first()
    }

    /// Earlier drafts shown below the primary one.
    pub fn previous(&self) -> impl Iterator<Item = &Draft> {
        self.responses.iter().skip(1).take(MAX_PREVIOUS)
    }

    /// Attach the citizen request this session drafts against.
    pub fn bind_request(&mut self, request_id: i64) {
        if let Some(existing) = self.request_id {
            if existing != request_id {
                tracing::warn!(existing, request_id, "rebinding draft session to another request");
            }
        }
        self.request_id = Some(request_id);
    }

    /// Record a freshly generated draft with a new id and timestamp.
    ///
    /// Returns the new primary draft so backend ids can be attached to it.
    pub fn record_draft(
        &mut self,
        text: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Result<&mut Draft, DraftError> {
        self.ensure_can_generate()?;

        self.responses.insert(0, Draft::new(text, model_name));
        self.draft_count += 1;
        tracing::debug!(
            draft_count = self.draft_count,
            remaining = self.remaining_drafts(),
            "recorded draft"
        );

        Ok(&mut self.responses[0])
    }

    /// Fail with `InvalidState` unless another draft may be generated.
    pub fn ensure_can_generate(&self) -> Result<(), DraftError> {
        if self.can_generate() {
            Ok(())
        } else {
            Err(self.invalid_state("generate another draft"))
        }
    }

    /// Select a draft as the answer and close the session.
    ///
    /// The selected draft moves to the front and is marked copied. Finalizing
    /// also consumes one draft slot, capped at [`MAX_DRAFTS`].
    pub fn finalize(&mut self, draft_id: &str) -> Result<&Draft, DraftError> {
        if !self.can_finalize() {
            return Err(self.invalid_state("finalize a draft"));
        }

        let index = self
            .position(draft_id)
            .ok_or_else(|| DraftError::NotFound(draft_id.to_string()))?;

        let mut selected = self.responses.remove(index);
        selected.copied = true;
        self.responses.insert(0, selected);
        self.phase = Phase::Finalized;
        self.draft_count = (self.draft_count + 1).min(MAX_DRAFTS);
        tracing::debug!(draft_id, draft_count = self.draft_count, "finalized draft");

        Ok(&self.responses[0])
    }

    /// Drop all drafts and return to the initial state.
    pub fn reset(&mut self) -> &Self {
        *self = Self::default();
        self
    }

    /// Find a draft by exact id.
    pub fn get(&self, draft_id: &str) -> Option<&Draft> {
        self.responses.iter().find(|d| d.id == draft_id)
    }

    /// Resolve a user-supplied selector to a draft.
    ///
    /// Accepts a 1-based position (1 is the primary draft), an exact id, or an
    /// unambiguous id prefix.
    pub fn resolve(&self, selector: &str) -> Option<&Draft> {
        let selector = selector.trim();
        if let Ok(position) = selector.parse::<usize>() {
            if position <= usize::from(MAX_DRAFTS) {
                return position
                    .checked_sub(1)
                    .and_then(|index| self.responses.get(index));
            }
        }

        if let Some(draft) = self.get(selector) {
            return Some(draft);
        }

        let mut matches = self.responses.iter().filter(|d| d.id.starts_with(selector));
        match (matches.next(), matches.next()) {
            (Some(draft), None) if !selector.is_empty() => Some(draft),
            _ => None,
        }
    }

    /// Check invariants of a session restored from outside (e.g. a cache file).
    ///
    /// While drafting the counter matches the number of drafts. A finalized
    /// session has its copied draft first and counted the finalize as one
    /// more slot unless the limit was already reached.
    pub fn is_well_formed(&self) -> bool {
        let len = self.responses.len();
        let Ok(count) = u8::try_from(len) else {
            return false;
        };
        if count > MAX_DRAFTS {
            return false;
        }

        match self.phase {
            Phase::Drafting => self.draft_count == count,
            Phase::Finalized => {
                let primary_copied = self.responses.first().is_some_and(|d| d.copied);
                let finalized_count = (count + 1).min(MAX_DRAFTS);
                primary_copied
                    && (self.draft_count == count || self.draft_count == finalized_count)
            }
        }
    }

    fn position(&self, draft_id: &str) -> Option<usize> {
        self.responses.iter().position(|d| d.id == draft_id)
    }

    fn invalid_state(&self, action: &'static str) -> DraftError {
        DraftError::InvalidState {
            action,
            phase: self.phase,
            draft_count: self.draft_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(texts: &[&str]) -> DraftSession {
        let mut session = DraftSession::new();
        for text in texts {
            session.record_draft(*text, "m1").unwrap();
        }
        session
    }

    #[test]
    fn new_session_is_drafting_and_empty() {
        let session = DraftSession::new();
        assert_eq!(session.phase(), Phase::Drafting);
        assert_eq!(session.draft_count(), 0);
        assert!(session.responses().is_empty());
        assert!(session.request_id().is_none());
        assert!(session.can_generate());
        assert!(session.can_finalize());
        assert!(!session.show_new_request());
        assert_eq!(session.remaining_drafts(), 5);
    }

    #[test]
    fn record_draft_increments_by_one_up_to_limit() {
        let mut session = DraftSession::new();
        for expected in 1..=MAX_DRAFTS {
            assert!(session.can_generate());
            session.record_draft(format!("draft {expected}"), "m1").unwrap();
            assert_eq!(session.draft_count(), expected);
            assert_eq!(session.responses().len(), usize::from(expected));
        }
        assert!(!session.can_generate());
    }

    #[test]
    fn sixth_draft_is_rejected() {
        let mut session = session_with(&["1", "2", "3", "4", "5"]);
        let err = session.record_draft("6", "m1").unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(session.draft_count(), 5);
        assert_eq!(session.responses().len(), 5);
        assert_eq!(session.remaining_drafts(), 0);
        assert!(session.show_new_request());
    }

    #[test]
    fn drafts_are_newest_first() {
        let session = session_with(&["A", "B", "C"]);
        let texts: Vec<_> = session.responses().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "B", "A"]);
        assert_eq!(session.primary().unwrap().text, "C");
        let previous: Vec<_> = session.previous().map(|d| d.text.as_str()).collect();
        assert_eq!(previous, vec!["B", "A"]);
    }

    #[test]
    fn finalize_on_fresh_session_is_not_found() {
        let mut session = DraftSession::new();
        let err = session.finalize("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session.phase(), Phase::Drafting);
    }

    #[test]
    fn finalize_unknown_id_leaves_session_untouched() {
        let mut session = session_with(&["A"]);
        let before = session.clone();
        assert!(session.finalize("nope").unwrap_err().is_not_found());
        assert_eq!(session, before);
    }

    #[test]
    fn finalize_moves_selected_draft_to_front() {
        let mut session = session_with(&["A", "B"]);
        let id_of_b = session.responses()[0].id.clone();

        let selected = session.finalize(&id_of_b).unwrap();
        assert_eq!(selected.text, "B");
        assert!(selected.copied);

        assert_eq!(session.responses()[0].text, "B");
        assert_eq!(session.phase(), Phase::Finalized);
        assert_eq!(session.draft_count(), 3);
    }

    #[test]
    fn finalize_older_draft_reorders() {
        let mut session = session_with(&["A", "B", "C"]);
        let id_of_a = session.responses()[2].id.clone();
        session.finalize(&id_of_a).unwrap();

        let texts: Vec<_> = session.responses().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "C", "B"]);
        assert!(!session.responses()[1].copied);
    }

    #[test]
    fn second_finalize_is_rejected() {
        let mut session = session_with(&["A", "B"]);
        let first = session.responses()[0].id.clone();
        let other = session.responses()[1].id.clone();
        session.finalize(&first).unwrap();

        assert!(!session.can_finalize());
        assert!(session.finalize(&first).unwrap_err().is_invalid_state());
        assert!(session.finalize(&other).unwrap_err().is_invalid_state());
        assert!(session.finalize("missing").unwrap_err().is_invalid_state());
        assert_eq!(session.draft_count(), 3);
    }

    #[test]
    fn finalized_session_rejects_generation() {
        let mut session = session_with(&["A"]);
        let id = session.responses()[0].id.clone();
        session.finalize(&id).unwrap();

        assert!(!session.can_generate());
        assert!(session.show_new_request());
        assert!(session.record_draft("B", "m1").unwrap_err().is_invalid_state());
        assert_eq!(session.responses().len(), 1);
    }

    #[test]
    fn finalize_at_limit_keeps_count_capped() {
        let mut session = session_with(&["1", "2", "3", "4", "5"]);
        let id = session.responses()[4].id.clone();
        session.finalize(&id).unwrap();
        assert_eq!(session.draft_count(), MAX_DRAFTS);
        assert_eq!(session.remaining_drafts(), 0);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut finalized = session_with(&["A", "B"]);
        finalized.bind_request(7);
        let id = finalized.responses()[1].id.clone();
        finalized.finalize(&id).unwrap();

        for mut session in [finalized, session_with(&["1", "2", "3", "4", "5"]), DraftSession::new()] {
            session.reset();
            assert_eq!(session, DraftSession::new());
            assert_eq!(session.phase(), Phase::Drafting);
            assert_eq!(session.draft_count(), 0);
            assert!(session.responses().is_empty());
            assert!(session.request_id().is_none());
        }
    }

    #[test]
    fn previous_shows_at_most_four() {
        let session = session_with(&["1", "2", "3", "4", "5"]);
        assert_eq!(session.previous().count(), MAX_PREVIOUS);
    }

    #[test]
    fn resolve_by_position_and_prefix() {
        let session = session_with(&["A", "B"]);
        let newest = session.responses()[0].clone();
        let oldest = session.responses()[1].clone();

        assert_eq!(session.resolve("1").unwrap().id, newest.id);
        assert_eq!(session.resolve("2").unwrap().id, oldest.id);
        assert!(session.resolve("0").is_none());
        assert!(session.resolve("3").is_none());
        assert_eq!(session.resolve(&oldest.id).unwrap().text, "A");
        assert_eq!(session.resolve(newest.short_id()).unwrap().id, newest.id);
        assert!(session.resolve("").is_none());
    }

    #[test]
    fn well_formed_detects_tampered_counts() {
        let session = session_with(&["A"]);
        assert!(session.is_well_formed());

        let mut json = serde_json::to_value(&session).unwrap();
        json["draft_count"] = serde_json::json!(9);
        let tampered: DraftSession = serde_json::from_value(json).unwrap();
        assert!(!tampered.is_well_formed());
    }

    fn with_fields(session: &DraftSession, fields: serde_json::Value) -> DraftSession {
        let mut json = serde_json::to_value(session).unwrap();
        for (key, value) in fields.as_object().unwrap() {
            json[key] = value.clone();
        }
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn drafting_count_must_match_drafts() {
        let session = session_with(&["A"]);
        let lagging = with_fields(&session, serde_json::json!({ "draft_count": 4 }));
        assert!(!lagging.is_well_formed());

        let empty = with_fields(&DraftSession::new(), serde_json::json!({ "draft_count": 1 }));
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn finalized_session_needs_a_copied_primary() {
        let empty = with_fields(&DraftSession::new(), serde_json::json!({ "phase": "finalized" }));
        assert!(!empty.is_well_formed());

        let uncopied = with_fields(
            &session_with(&["A", "B"]),
            serde_json::json!({ "phase": "finalized", "draft_count": 3 }),
        );
        assert!(!uncopied.is_well_formed());

        let mut finalized = session_with(&["A", "B"]);
        let id = finalized.responses()[1].id.clone();
        finalized.finalize(&id).unwrap();
        assert!(finalized.is_well_formed());

        let inflated = with_fields(&finalized, serde_json::json!({ "draft_count": 5 }));
        assert!(!inflated.is_well_formed());

        let mut at_limit = session_with(&["1", "2", "3", "4", "5"]);
        let id = at_limit.responses()[0].id.clone();
        at_limit.finalize(&id).unwrap();
        assert!(at_limit.is_well_formed());
    }
}
