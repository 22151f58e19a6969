//! Pure state transitions driven by UI actions: ballot actions applied to the
//! selection engine, and the assistant panel's request lifecycle.

use assistant_client::AssistantError;
use ballot_core::{SelectionEngine, SubmitOutcome, ToggleOutcome};
use shared::domain::CandidateId;

pub const ASSISTANT_FALLBACK: &str = "Unable to connect to Election HQ.";
pub const ASSISTANT_EMPTY_ANSWER: &str = "No response found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotAction {
    Toggle(CandidateId),
    Submit,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotTransition {
    Toggled(ToggleOutcome),
    Submitted(SubmitOutcome),
    Reset,
}

impl BallotTransition {
    pub fn vote_accepted(self) -> bool {
        self == BallotTransition::Submitted(SubmitOutcome::Accepted)
    }

    /// Status-line text for transitions the ballot screen does not show on its own.
    pub fn status_note(self) -> Option<&'static str> {
        match self {
            BallotTransition::Toggled(ToggleOutcome::RejectedAtCapacity) => {
                Some("Vote limit reached; deselect a candidate first")
            }
            BallotTransition::Toggled(ToggleOutcome::Unknown) => Some("Unknown candidate ignored"),
            BallotTransition::Submitted(SubmitOutcome::Empty) => Some("Select at least one candidate"),
            _ => None,
        }
    }
}

pub fn apply_ballot_action(engine: &mut SelectionEngine, action: BallotAction) -> BallotTransition {
    match action {
        BallotAction::Toggle(id) => {
            let outcome = engine.toggle(id);
            tracing::debug!(%id, ?outcome, "candidate toggled");
            BallotTransition::Toggled(outcome)
        }
        BallotAction::Submit => {
            let outcome = engine.submit();
            if outcome == SubmitOutcome::Accepted {
                tracing::info!(selected = ?engine.selected(), "vote confirmed");
            }
            BallotTransition::Submitted(outcome)
        }
        BallotAction::Reset => {
            engine.reset();
            tracing::info!("ballot reset");
            BallotTransition::Reset
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateCardState {
    pub selected: bool,
    pub enabled: bool,
}

pub fn candidate_card_state(engine: &SelectionEngine, id: CandidateId) -> CandidateCardState {
    CandidateCardState {
        selected: engine.is_selected(id),
        enabled: engine.can_toggle(id),
    }
}

pub fn submit_button_label(engine: &SelectionEngine) -> String {
    if engine.selection_count() == 0 {
        "Select your candidates".to_string()
    } else {
        format!(
            "Confirm vote ({}/{})",
            engine.selection_count(),
            engine.vote_limit()
        )
    }
}

#[derive(Debug, Default)]
pub struct AssistantPanelState {
    pub query: String,
    response: Option<String>,
    pending_request: Option<u64>,
    next_request_id: u64,
}

impl AssistantPanelState {
    /// Starts a request for the current query. Returns `None` while another
    /// request is pending or when the query is blank.
    pub fn begin_ask(&mut self) -> Option<(u64, String)> {
        if self.pending_request.is_some() {
            return None;
        }
        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending_request = Some(request_id);
        Some((request_id, query.to_string()))
    }

    /// Applies a reply. Replies for anything but the pending request are dropped.
    pub fn finish(&mut self, request_id: u64, result: Result<String, AssistantError>) -> bool {
        if self.pending_request != Some(request_id) {
            return false;
        }
        self.pending_request = None;

        let text = match result {
            Ok(answer) if answer.trim().is_empty() => ASSISTANT_EMPTY_ANSWER.to_string(),
            Ok(answer) => answer.trim().to_string(),
            Err(err) => {
                tracing::warn!(request_id, "assistant query failed: {err}");
                ASSISTANT_FALLBACK.to_string()
            }
        };
        self.response = Some(text);
        true
    }

    /// Releases the pending slot when the request never reached the backend.
    pub fn abort(&mut self, request_id: u64) {
        if self.pending_request == Some(request_id) {
            self.pending_request = None;
            self.response = Some(ASSISTANT_FALLBACK.to_string());
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn ask_label(&self) -> &'static str {
        if self.is_loading() {
            "Thinking..."
        } else {
            "Ask"
        }
    }
}
