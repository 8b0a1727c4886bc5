//! Error types for the dialogue engine
//!
//! Provides error handling for:
//! - Payload path resolution during answer submission
//! - Local widget validation
//! - Server-side answer rejection and transport failures
//! - Undecodable question types
//! - Illegal dialogue transitions

use wizard_payload::PathResolutionError;
use wizard_question::{DecodeError, LocalValidationError};

use crate::state::DialogueState;

/// HTTP status the configuration service uses for validation failures
pub const VALIDATION_FAILURE_STATUS: u16 = 400;

/// Main wizard error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Question path does not fit the payload shape
    #[error("path resolution failed: {0}")]
    PathResolution(#[from] PathResolutionError),

    /// Input rejected before any network call
    #[error("invalid input: {0}")]
    LocalValidation(#[from] LocalValidationError),

    /// Service rejected the answer for this question
    #[error("answer rejected for '{path}': {detail}")]
    AnswerRejected { path: String, detail: String },

    /// Service call failed for a reason other than validation
    #[error("protocol failure: {0}")]
    ProtocolFailure(#[from] ServiceError),

    /// Pending question cannot be rendered
    #[error("cannot display question: {0}")]
    UnknownQuestionType(#[from] DecodeError),

    /// Basic configuration fields failed validation
    #[error("invalid fields: {0}")]
    InvalidFields(#[from] FieldError),

    /// Operation not permitted in the current state
    #[error("illegal transition {from:?} -> {to:?}")]
    InvalidTransition {
        from: DialogueState,
        to: DialogueState,
    },

    /// Operation needs a pending question and there is none
    #[error("no pending question")]
    NoPendingQuestion,

    /// Retry requested with nothing to retry
    #[error("nothing to retry")]
    NothingToRetry,
}

impl WizardError {
    /// Check if resubmitting the same request could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProtocolFailure(e) if e.is_retryable())
    }

    /// Check if error was raised without contacting the service
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::LocalValidation(_) | Self::InvalidFields(_) | Self::PathResolution(_)
        )
    }

    /// Text shown to the user for this error
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ProtocolFailure(e) => e.detail(),
            Self::AnswerRejected { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors reported by a configuration service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Service answered with a non-success status
    #[error("service returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    /// Check if the service rejected the submitted values
    #[inline]
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == VALIDATION_FAILURE_STATUS)
    }

    /// Check if the failure is worth retrying unchanged
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Transport(_) => true,
            Self::InvalidResponse(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// HTTP status, if the service answered
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Detail text suitable for the user
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Basic field validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("name is required")]
    EmptyName,

    #[error("name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("description must be at most {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("version '{0}' is not of the form MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

/// Result type for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;
