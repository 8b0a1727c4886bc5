//! Dialogue session
//!
//! [`DialogueSession`] drives one configuration from basic fields to the
//! last answered question. It owns the transcript, the last accepted
//! document and the pending question; the service decides which question
//! comes next.
//!
//! Operations take `&mut self`, so at most one request is in flight per
//! session. Failures are reported as a [`StepOutcome`]; `Err` is reserved
//! for calls the current state does not permit.

use wizard_question::{Answer, DecodeError, LocalValidationError, WidgetInput, WidgetSelector, WidgetSpec};

use crate::config::WizardConfig;
use crate::error::{WizardError, WizardResult};
use crate::protocol::{create_request, patch_document, submit, update_request, SubmissionOutcome};
use crate::service::ConfigurationService;
use crate::state::{validate_transition, DialogueState};
use crate::transcript::{EntryDraft, Transcript, WidgetError};
use crate::types::{BasicFields, ConfigurationDocument, ConfigurationId, PendingQuestion, SessionId};

const NO_QUESTIONS_MESSAGE: &str = "Configuration complete! No additional information needed.";
const ALL_ANSWERED_MESSAGE: &str = "Configuration complete! All questions have been answered.";

fn start_message(id: ConfigurationId) -> String {
    format!("Starting the configuration process (config id = {id}). Please answer a few questions.")
}

/// Pending question together with how it is rendered
#[derive(Debug, Clone, PartialEq)]
pub struct PromptedQuestion {
    pub question: PendingQuestion,
    /// Widget offered for the answer; `None` if the type could not be decoded
    pub widget: Option<WidgetSpec>,
    pub problem: Option<DecodeError>,
}

/// Result of one dialogue step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A new question is pending
    NextQuestion,
    /// A new question is pending but has no usable widget
    Undisplayable(DecodeError),
    /// No questions remain
    Completed,
    /// Input failed local validation; nothing was sent
    InputInvalid(LocalValidationError),
    /// Service refused the answer; the same question stays pending.
    /// Carries [`WizardError::AnswerRejected`]
    Rejected(WizardError),
    /// Step failed; the banner and transcript carry the detail
    Failed(WizardError),
}

/// One configuration dialogue
pub struct DialogueSession<S> {
    id: SessionId,
    service: S,
    selector: WidgetSelector,
    state: DialogueState,
    fields: BasicFields,
    configuration_id: Option<ConfigurationId>,
    document: ConfigurationDocument,
    transcript: Transcript,
    pending: Option<PromptedQuestion>,
    widget_error: Option<WidgetError>,
    banner: Option<String>,
    last_answer: Option<Answer>,
}

impl<S: ConfigurationService> DialogueSession<S> {
    /// Create session with default configuration
    #[must_use]
    pub fn new(service: S) -> Self {
        Self::with_config(service, WizardConfig::default())
    }

    /// Create session
    #[must_use]
    pub fn with_config(service: S, config: WizardConfig) -> Self {
        let id = SessionId::new();
        let mut transcript = Transcript::new();
        if !config.welcome_message.is_empty() {
            transcript.bot(config.welcome_message.clone());
        }
        tracing::info!("Dialogue session {} created", id);

        Self {
            id,
            service,
            selector: config.selector(),
            state: DialogueState::Idle,
            fields: BasicFields::default(),
            configuration_id: None,
            document: ConfigurationDocument::default(),
            transcript,
            pending: None,
            widget_error: None,
            banner: None,
            last_answer: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> DialogueState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &BasicFields {
        &self.fields
    }

    #[inline]
    #[must_use]
    pub fn configuration_id(&self) -> Option<ConfigurationId> {
        self.configuration_id
    }

    /// Last document the service accepted
    #[inline]
    #[must_use]
    pub fn document(&self) -> &ConfigurationDocument {
        &self.document
    }

    /// Payload rendered as indented JSON
    #[must_use]
    pub fn payload_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.document.payload).unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> Option<&PromptedQuestion> {
        self.pending.as_ref()
    }

    /// Error attached to the pending question's input
    #[inline]
    #[must_use]
    pub fn widget_error(&self) -> Option<&WidgetError> {
        self.widget_error.as_ref()
    }

    /// Session-level error message
    #[inline]
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Check if a request is in flight
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state == DialogueState::Submitting
    }

    /// Record the basic fields for the first submission
    ///
    /// # Errors
    /// - [`WizardError::InvalidFields`] if validation fails; state is unchanged
    /// - [`WizardError::InvalidTransition`] once a configuration exists
    pub fn enter_fields(&mut self, fields: BasicFields) -> WizardResult<()> {
        if self.configuration_id.is_some() {
            return Err(WizardError::InvalidTransition {
                from: self.state,
                to: DialogueState::AwaitingFirstSubmit,
            });
        }
        validate_transition(self.state, DialogueState::AwaitingFirstSubmit)?;
        fields.validate()?;
        self.fields = fields;
        self.transition(DialogueState::AwaitingFirstSubmit)
    }

    /// Enter `fields` and create the configuration
    ///
    /// # Errors
    /// Same as [`Self::enter_fields`]
    pub async fn start(&mut self, fields: BasicFields) -> WizardResult<StepOutcome> {
        self.enter_fields(fields)?;
        self.create().await
    }

    /// Turn widget input into an answer and submit it
    ///
    /// Input that fails local validation sets the widget error and sends
    /// nothing.
    ///
    /// # Errors
    /// - [`WizardError::NoPendingQuestion`] if no question is pending
    /// - [`WizardError::UnknownQuestionType`] if the pending question has no widget
    /// - [`WizardError::InvalidTransition`] if the state does not accept answers
    pub async fn commit_input(&mut self, input: WidgetInput) -> WizardResult<StepOutcome> {
        let prompted = self.pending.as_ref().ok_or(WizardError::NoPendingQuestion)?;
        if !self.state.accepts_answer() {
            return Err(WizardError::InvalidTransition {
                from: self.state,
                to: DialogueState::Submitting,
            });
        }
        let Some(widget) = prompted.widget.as_ref() else {
            return Err(prompted
                .problem
                .clone()
                .map_or(WizardError::NoPendingQuestion, WizardError::UnknownQuestionType));
        };

        let path = prompted.question.path.clone();
        match widget.commit(input) {
            Ok(answer) => self.submit_answer(answer).await,
            Err(e) => {
                tracing::debug!("[{}] Input for '{}' rejected locally: {}", self.id, path, e);
                self.widget_error = Some(WidgetError {
                    key: path,
                    message: e.to_string(),
                });
                Ok(StepOutcome::InputInvalid(e))
            }
        }
    }

    /// Write `answer` at the pending question's path and submit the document
    ///
    /// # Errors
    /// - [`WizardError::NoPendingQuestion`] if no question is pending
    /// - [`WizardError::InvalidTransition`] if the state does not accept answers
    pub async fn submit_answer(&mut self, answer: Answer) -> WizardResult<StepOutcome> {
        let path = self
            .pending
            .as_ref()
            .ok_or(WizardError::NoPendingQuestion)?
            .question
            .path
            .clone();
        let id = self.configuration_id.ok_or(WizardError::NoPendingQuestion)?;
        validate_transition(self.state, DialogueState::Submitting)?;

        self.transcript.user(answer.echo.clone());
        self.widget_error = None;
        self.last_answer = Some(answer.clone());

        let patched = match patch_document(&self.document, &path, answer.value) {
            Ok(patched) => patched,
            Err(e) => return self.fail(e.into()),
        };
        let request = match update_request(&self.fields, &patched) {
            Ok(request) => request,
            Err(e) => return self.fail(e.into()),
        };

        self.transition(DialogueState::Submitting)?;
        tracing::info!("[{}] Submitting '{}' for configuration {}", self.id, path, id);

        match submit(&self.service, id, &request).await {
            SubmissionOutcome::Accepted(record) => {
                self.document = record.configuration_data;
                self.last_answer = None;
                self.banner = None;
                self.present_next(ALL_ANSWERED_MESSAGE)
            }
            SubmissionOutcome::Rejected { detail } => {
                self.widget_error = Some(WidgetError {
                    key: path.clone(),
                    message: detail.clone(),
                });
                self.banner = None;
                self.transition(DialogueState::AwaitingAnswer)?;
                Ok(StepOutcome::Rejected(WizardError::AnswerRejected { path, detail }))
            }
            SubmissionOutcome::Failed(e) => self.fail(e.into()),
        }
    }

    /// Repeat the request that failed
    ///
    /// Re-sends the create request if no configuration exists yet, otherwise
    /// the last answer.
    ///
    /// # Errors
    /// - [`WizardError::InvalidTransition`] unless the session is `Failed`
    /// - [`WizardError::NothingToRetry`] if there is no answer to resend
    pub async fn retry(&mut self) -> WizardResult<StepOutcome> {
        if self.state != DialogueState::Failed {
            return Err(WizardError::InvalidTransition {
                from: self.state,
                to: DialogueState::Submitting,
            });
        }
        tracing::info!("[{}] Retrying", self.id);
        match (self.configuration_id, self.last_answer.clone()) {
            (None, _) => self.create().await,
            (Some(_), Some(answer)) => self.submit_answer(answer).await,
            (Some(_), None) => Err(WizardError::NothingToRetry),
        }
    }

    /// Delete the configuration, if one was created, and return to `Idle`
    ///
    /// The transcript is kept.
    ///
    /// # Errors
    /// - [`WizardError::InvalidTransition`] while idle or submitting
    /// - [`WizardError::ProtocolFailure`] if the delete fails; nothing is reset
    pub async fn discard(&mut self) -> WizardResult<()> {
        validate_transition(self.state, DialogueState::Idle)?;
        if let Some(id) = self.configuration_id {
            self.service.delete_configuration(id).await?;
            tracing::info!("[{}] Deleted configuration {}", self.id, id);
            self.transcript.bot(format!("Configuration {id} discarded."));
        }

        self.fields = BasicFields::default();
        self.configuration_id = None;
        self.document = ConfigurationDocument::default();
        self.pending = None;
        self.widget_error = None;
        self.banner = None;
        self.last_answer = None;
        self.transition(DialogueState::Idle)
    }

    async fn create(&mut self) -> WizardResult<StepOutcome> {
        self.transition(DialogueState::Submitting)?;
        let request = create_request(&self.fields);
        tracing::info!("[{}] Creating configuration '{}'", self.id, request.name);

        match self.service.create_configuration(&request).await {
            Ok(record) => {
                let id = record.id;
                tracing::info!("[{}] Created configuration {}", self.id, id);
                self.configuration_id = Some(id);
                self.document = record.configuration_data;
                self.banner = None;
                self.transcript.bot(start_message(id));
                self.present_next(NO_QUESTIONS_MESSAGE)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Present the head of the question list, or finish
    fn present_next(&mut self, completion: &str) -> WizardResult<StepOutcome> {
        let Some(question) = self.document.pending_question().cloned() else {
            self.pending = None;
            self.transcript.bot(completion);
            tracing::info!("[{}] Configuration complete", self.id);
            self.transition(DialogueState::Complete)?;
            return Ok(StepOutcome::Completed);
        };

        let outcome = match question.decode_type() {
            Ok(decoded) => {
                let widget = self.selector.select(&decoded);
                tracing::debug!("[{}] Asking '{}' with {}", self.id, question.path, widget.kind());
                self.transcript
                    .append(EntryDraft::question(&question, Some(widget.clone())));
                self.pending = Some(PromptedQuestion {
                    question,
                    widget: Some(widget),
                    problem: None,
                });
                StepOutcome::NextQuestion
            }
            Err(e) => {
                tracing::warn!("[{}] Cannot display '{}': {}", self.id, question.path, e);
                self.transcript.append(EntryDraft::question(&question, None));
                self.transcript
                    .bot(format!("This step cannot be displayed: {e}"));
                self.pending = Some(PromptedQuestion {
                    question,
                    widget: None,
                    problem: Some(e.clone()),
                });
                StepOutcome::Undisplayable(e)
            }
        };

        self.transition(DialogueState::AwaitingAnswer)?;
        Ok(outcome)
    }

    fn fail(&mut self, error: WizardError) -> WizardResult<StepOutcome> {
        let detail = error.user_message();
        tracing::error!("[{}] {}", self.id, error);
        self.transcript.bot(format!("Error: {detail}"));
        self.banner = Some(detail);
        self.transition(DialogueState::Failed)?;
        Ok(StepOutcome::Failed(error))
    }

    fn transition(&mut self, to: DialogueState) -> WizardResult<()> {
        validate_transition(self.state, to)?;
        tracing::debug!("[{}] {:?} -> {:?}", self.id, self.state, to);
        self.state = to;
        Ok(())
    }
}
