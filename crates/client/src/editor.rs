use thiserror::Error;
use tracing::{info, warn};

use smsledger_core::{
    validate_pattern, PatternAction, PatternDraft, Phase, SelectionError, Session, TestGate,
    TestTicket, TestTracker, TestVerdict, TokenKind, ValidationError,
};

use crate::config::ClientConfig;
use crate::matcher::Matcher;
use crate::store::{PatternStore, StoreError};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Error saving pattern: {0}")]
    Store(#[from] StoreError),
    #[error("Pattern has no id")]
    MissingId,
}

/// A matcher test that has been started but not yet run.
///
/// Owns everything it needs so it can be moved onto another task.
#[derive(Debug, Clone)]
pub struct TestRequest {
    ticket: TestTicket,
    pub content: String,
    pub pattern: String,
    pub action: PatternAction,
}

impl TestRequest {
    /// Call the matcher and judge its report. Transport failures become a
    /// failed verdict.
    pub async fn run<M: Matcher + ?Sized>(self, matcher: &M) -> TestResponse {
        let verdict = match matcher.test(&self.content, &self.pattern).await {
            Ok(report) => TestVerdict::judge(&self.pattern, self.action, &report),
            Err(e) => {
                warn!("Error testing pattern: {e}");
                TestVerdict::unreachable(
                    &self.pattern,
                    self.action,
                    &format!("Error testing pattern: {e}"),
                )
            }
        };
        TestResponse {
            ticket: self.ticket,
            verdict,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestResponse {
    ticket: TestTicket,
    pub verdict: TestVerdict,
}

/// Drives one pattern from draft to saved: classification session, matcher
/// test and store write.
#[derive(Debug)]
pub struct PatternEditor {
    draft: PatternDraft,
    session: Session,
    tracker: TestTracker,
    require_test: bool,
}

impl PatternEditor {
    /// Drafts without original content start from an empty session; their
    /// pattern text is edited directly with [`PatternEditor::set_pattern`].
    pub fn new(draft: PatternDraft, require_test: bool) -> Self {
        let source = draft.original_content.clone().unwrap_or_default();
        let session = Session::new(source, draft.action);
        Self {
            draft,
            session,
            tracker: TestTracker::new(),
            require_test,
        }
    }

    /// Start from an unprocessed message.
    pub fn from_message(raw_sender: &str, content: &str, config: &ClientConfig) -> Self {
        Self::new(
            PatternDraft::from_message(raw_sender, content),
            config.require_test_before_save,
        )
    }

    pub fn draft(&self) -> &PatternDraft {
        &self.draft
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn latest_test(&self) -> Option<&TestVerdict> {
        self.tracker.latest()
    }

    // ── Classification ───────────────────────────────────────────────────────

    pub fn toggle(&mut self, index: usize) -> Result<TokenKind, SelectionError> {
        self.session.toggle(index)
    }

    pub fn set_phase(&mut self, phase: Phase) -> Result<(), SelectionError> {
        self.session.set_phase(phase)
    }

    pub fn advance(&mut self) -> bool {
        self.session.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.session.retreat()
    }

    /// Copy the assembled selection into the draft's pattern.
    pub fn apply_selection(&mut self) -> &str {
        self.draft.pattern = self.session.pattern();
        self.tracker.invalidate();
        &self.draft.pattern
    }

    // ── Draft fields ─────────────────────────────────────────────────────────

    pub fn set_action(&mut self, action: PatternAction) {
        if action != self.draft.action {
            self.draft.action = action;
            self.session.set_action(action);
            self.tracker.invalidate();
        }
    }

    /// Replace the message the pattern is built from and tested against.
    pub fn set_original_content(&mut self, content: &str) {
        self.draft.original_content = Some(content.to_string());
        self.session.set_message(content);
        self.tracker.invalidate();
    }

    /// Hand-edit the pattern text.
    pub fn set_pattern(&mut self, pattern: &str) {
        self.draft.pattern = pattern.to_string();
        self.tracker.invalidate();
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = name.to_string();
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) {
        self.draft.metadata.insert(key.to_string(), value.to_string());
    }

    // ── Test / validate / save ───────────────────────────────────────────────

    /// Start a test of the current pattern against the original content.
    ///
    /// Returns `None` when there is no content to test against. Any test
    /// already in flight is superseded.
    pub fn begin_test(&mut self) -> Option<TestRequest> {
        self.trim_pattern();
        let content = self
            .draft
            .original_content
            .clone()
            .filter(|c| !c.is_empty())?;
        let ticket = self.tracker.begin(&self.draft.pattern);
        Some(TestRequest {
            ticket,
            content,
            pattern: self.draft.pattern.clone(),
            action: self.draft.action,
        })
    }

    /// Record a finished test. Returns `false` if a newer test or an edit
    /// made it stale.
    pub fn finish_test(&mut self, response: TestResponse) -> bool {
        let accepted = self.tracker.finish(response.ticket, response.verdict);
        if let Some(verdict) = self.tracker.latest().filter(|_| accepted) {
            info!(passed = verdict.passed(), "{}", verdict.message());
        }
        accepted
    }

    /// Run a test to completion and return its verdict.
    pub async fn test<M: Matcher + ?Sized>(&mut self, matcher: &M) -> Option<TestVerdict> {
        let request = self.begin_test()?;
        let response = request.run(matcher).await;
        self.finish_test(response);
        self.tracker.latest().cloned()
    }

    fn test_gate(&self) -> TestGate<'_> {
        if self.require_test && self.draft.has_original_content() {
            TestGate::Required(self.tracker.latest())
        } else {
            TestGate::NotRequired
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_pattern(self.draft.trimmed_pattern(), self.draft.action, self.test_gate())
    }

    /// Test (when required), validate, then write the draft to the store.
    ///
    /// On failure nothing is written and the editor stays editable.
    pub async fn save<M, S>(&mut self, matcher: &M, store: &S) -> Result<(), SaveError>
    where
        M: Matcher + ?Sized,
        S: PatternStore + ?Sized,
    {
        self.trim_pattern();
        if matches!(self.test_gate(), TestGate::Required(_)) {
            self.test(matcher).await;
        }
        self.validate()?;

        store.upsert(&self.draft).await?;
        info!(name = %self.draft.name, action = %self.draft.action, "pattern saved");
        Ok(())
    }

    pub async fn delete<S: PatternStore + ?Sized>(&self, store: &S) -> Result<(), SaveError> {
        let id = self.draft.id.as_deref().ok_or(SaveError::MissingId)?;
        store.delete(id).await?;
        info!(id, "pattern deleted");
        Ok(())
    }

    fn trim_pattern(&mut self) {
        let trimmed = self.draft.trimmed_pattern();
        if trimmed.len() != self.draft.pattern.len() {
            self.draft.pattern = trimmed.to_string();
            self.tracker.invalidate();
        }
    }
}
