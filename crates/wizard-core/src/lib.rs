//! Wizard Core
//!
//! Drives a server-led configuration dialogue: the service owns the
//! question list and the rules, this crate owns the conversation.
//!
//! # Core Concepts
//!
//! - [`DialogueSession`]: one configuration, from basic fields to completion
//! - [`ConfigurationService`]: the only way out to storage and rules
//! - [`DialogueState`]: `Idle → AwaitingFirstSubmit → Submitting ⇄ AwaitingAnswer → Complete`,
//!   with `Failed` reachable from any request
//! - [`Transcript`]: append-only record of what was said
//!
//! Answers are written into a copy of the last accepted payload. The copy
//! replaces the stored document only when the service accepts it.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod protocol;
pub mod service;
pub mod session;
pub mod state;
pub mod transcript;
pub mod types;

pub use config::{WizardConfig, DEFAULT_WELCOME};
pub use error::{FieldError, ServiceError, WizardError, WizardResult, VALIDATION_FAILURE_STATUS};
pub use protocol::{create_request, patch_document, submit, update_request, SubmissionOutcome};
pub use service::ConfigurationService;
pub use session::{DialogueSession, PromptedQuestion, StepOutcome};
pub use state::{allowed_transitions, validate_transition, DialogueState};
pub use transcript::{ChatEntry, EntryDraft, Sender, Transcript, WidgetError};
pub use types::{
    BasicFields, ConfigurationDocument, ConfigurationFields, ConfigurationId, ConfigurationRecord,
    ConfigurationStatus, HealthStatus, PendingQuestion, SessionId,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BasicFields, ConfigurationService, DialogueSession, DialogueState, StepOutcome, WizardConfig,
        WizardError, WizardResult,
    };
    pub use wizard_question::{Answer, WidgetInput, WidgetSpec};
}
