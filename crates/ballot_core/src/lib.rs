//! Selection state machine for a single ballot session.
//!
//! The engine is synchronous and free of I/O: the UI thread owns one
//! [`SelectionEngine`] and drives it with `toggle`, `submit` and `reset`.

use std::collections::HashSet;

use shared::domain::{BallotConfig, CandidateId};
use tracing::debug;

/// Mutable part of a ballot session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_ids: Vec<CandidateId>,
    pub has_submitted: bool,
    pub warning_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallotPhase {
    Selecting { warned: bool },
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    RejectedAtCapacity,
    Unknown,
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    RequiredMissing,
    Empty,
    AlreadySubmitted,
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    candidates: HashSet<CandidateId>,
    required: CandidateId,
    vote_limit: usize,
    state: SelectionState,
}

impl SelectionEngine {
    /// Builds an engine for `config`. The config is expected to have passed
    /// [`BallotConfig::validate`].
    pub fn new(config: &BallotConfig) -> Self {
        Self::with_rules(config.candidate_ids(), config.required_candidate, config.vote_limit)
    }

    pub fn with_rules(
        candidates: impl IntoIterator<Item = CandidateId>,
        required: CandidateId,
        vote_limit: usize,
    ) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
            required,
            vote_limit,
            state: SelectionState::default(),
        }
    }

    pub fn toggle(&mut self, id: CandidateId) -> ToggleOutcome {
        if self.state.has_submitted {
            return ToggleOutcome::Frozen;
        }

        self.state.warning_active = false;

        let outcome = if let Some(pos) = self.state.selected_ids.iter().position(|s| *s == id) {
            self.state.selected_ids.remove(pos);
            ToggleOutcome::Deselected
        } else if !self.candidates.contains(&id) {
            ToggleOutcome::Unknown
        } else if self.state.selected_ids.len() < self.vote_limit {
            self.state.selected_ids.push(id);
            ToggleOutcome::Selected
        } else {
            ToggleOutcome::RejectedAtCapacity
        };

        self.enforce_required_clears_warning();
        debug!(candidate = id.0, ?outcome, selected = self.state.selected_ids.len(), "toggle");
        outcome
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = if self.state.has_submitted {
            SubmitOutcome::AlreadySubmitted
        } else if self.state.selected_ids.is_empty() {
            SubmitOutcome::Empty
        } else if self.is_required_selected() {
            self.state.has_submitted = true;
            self.state.warning_active = false;
            SubmitOutcome::Accepted
        } else {
            self.state.warning_active = true;
            SubmitOutcome::RequiredMissing
        };

        debug!(?outcome, "submit");
        outcome
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    pub fn is_required_selected(&self) -> bool {
        self.state.selected_ids.contains(&self.required)
    }

    pub fn at_capacity(&self) -> bool {
        self.state.selected_ids.len() >= self.vote_limit
    }

    pub fn is_selected(&self, id: CandidateId) -> bool {
        self.state.selected_ids.contains(&id)
    }

    /// Whether the control for `id` should accept a click right now.
    /// Selected entries stay deselectable at capacity.
    pub fn can_toggle(&self, id: CandidateId) -> bool {
        !self.state.has_submitted && (self.is_selected(id) || !self.at_capacity())
    }

    pub fn can_submit(&self) -> bool {
        !self.state.has_submitted && !self.state.selected_ids.is_empty()
    }

    pub fn should_show_warning(&self) -> bool {
        self.state.warning_active && !self.is_required_selected()
    }

    pub fn selected(&self) -> &[CandidateId] {
        &self.state.selected_ids
    }

    pub fn selection_count(&self) -> usize {
        self.state.selected_ids.len()
    }

    pub fn vote_limit(&self) -> usize {
        self.vote_limit
    }

    pub fn required_candidate(&self) -> CandidateId {
        self.required
    }

    pub fn has_submitted(&self) -> bool {
        self.state.has_submitted
    }

    pub fn warning_active(&self) -> bool {
        self.state.warning_active
    }

    pub fn phase(&self) -> BallotPhase {
        if self.state.has_submitted {
            BallotPhase::Submitted
        } else {
            BallotPhase::Selecting {
                warned: self.state.warning_active,
            }
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    // Re-run after every mutation; a selected required candidate always
    // dismisses the warning.
    fn enforce_required_clears_warning(&mut self) {
        if self.is_required_selected() {
            self.state.warning_active = false;
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
