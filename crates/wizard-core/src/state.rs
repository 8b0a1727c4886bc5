//! Dialogue state and legal transitions

use serde::Serialize;

use crate::error::WizardError;

/// Where a dialogue session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DialogueState {
    /// Nothing entered yet
    Idle,
    /// Basic fields entered, not yet sent
    AwaitingFirstSubmit,
    /// A question is pending
    AwaitingAnswer,
    /// A request is in flight
    Submitting,
    /// No questions remain
    Complete,
    /// Last request failed; retry, answer again, or discard
    Failed,
}

impl DialogueState {
    /// Check if the state accepts an answer
    #[inline]
    #[must_use]
    pub fn accepts_answer(self) -> bool {
        matches!(self, Self::AwaitingAnswer | Self::Failed)
    }

    /// Check if no further transitions besides discard exist
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Validates a state transition.
///
/// # Errors
/// Returns [`WizardError::InvalidTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: DialogueState, to: DialogueState) -> Result<(), WizardError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(WizardError::InvalidTransition { from, to })
    }
}

pub fn allowed_transitions(from: DialogueState) -> Vec<DialogueState> {
    use DialogueState::*;
    match from {
        Idle => vec![AwaitingFirstSubmit],
        AwaitingFirstSubmit => vec![AwaitingFirstSubmit, Submitting, Idle],
        AwaitingAnswer => vec![AwaitingAnswer, Submitting, Failed, Idle],
        Submitting => vec![AwaitingAnswer, Complete, Failed],
        Complete => vec![Idle],
        Failed => vec![Failed, Submitting, AwaitingFirstSubmit, Idle],
    }
}

fn allowed(from: DialogueState, to: DialogueState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
