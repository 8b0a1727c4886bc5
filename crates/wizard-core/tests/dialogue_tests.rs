//! End-to-end dialogue scenarios against a scripted service

use pretty_assertions::assert_eq;
use serde_json::json;
use wizard_core::prelude::*;
use wizard_core::{Sender, ServiceError};
use wizard_question::{DecodeError, LocalValidationError};
use wizard_test_utils::{document, question, record, rejection, server_error, RecordedCall, ScriptedService};

fn messages(session: &DialogueSession<ScriptedService>) -> Vec<String> {
    session
        .transcript()
        .entries()
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

fn mode_question() -> wizard_core::PendingQuestion {
    question(
        "mode",
        "Which deployment mode?",
        json!({
            "type": "Enum",
            "possible_values": [{"v": "auto", "l": "Auto"}, {"v": "manual", "l": "Manual"}]
        }),
    )
    .with_info("Auto lets the cluster scale itself")
}

fn cpu_question() -> wizard_core::PendingQuestion {
    question(
        "nodes[0].cpu",
        "How many CPUs per node?",
        json!({"type": "Number", "min": 1, "max": 64, "step": 1}),
    )
}

#[tokio::test]
async fn single_question_dialogue_completes() {
    let service = ScriptedService::new()
        .with_create(Ok(record(1, document(json!({}), vec![mode_question()]))))
        .with_update(Ok(record(1, document(json!({"mode": "auto"}), vec![]))));
    let mut session = DialogueSession::new(service.clone());

    let outcome = session.start(BasicFields::default()).await.unwrap();
    assert_eq!(outcome, StepOutcome::NextQuestion);
    assert_eq!(session.state(), DialogueState::AwaitingAnswer);
    assert_eq!(session.configuration_id(), Some(1));

    let asked = session.transcript().last().unwrap();
    assert_eq!(asked.sender, Sender::Bot);
    assert_eq!(asked.question_path.as_deref(), Some("mode"));
    assert_eq!(asked.tooltip.as_deref(), Some("Auto lets the cluster scale itself"));
    assert!(matches!(asked.widget, Some(WidgetSpec::Buttons { .. })));

    let outcome = session.commit_input(WidgetInput::Choice(0)).await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.state(), DialogueState::Complete);
    assert!(session.pending().is_none());
    assert_eq!(session.document().payload["mode"], json!("auto"));

    assert_eq!(
        messages(&session),
        vec![
            wizard_core::DEFAULT_WELCOME.to_string(),
            "Starting the configuration process (config id = 1). Please answer a few questions.".to_string(),
            "Which deployment mode?".to_string(),
            "Selected: Auto".to_string(),
            "Configuration complete! All questions have been answered.".to_string(),
        ]
    );
    let ids: Vec<u64> = session.transcript().entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let calls = service.calls();
    assert_eq!(calls.len(), 2);
    let RecordedCall::Create(created) = &calls[0] else {
        panic!("expected create first, got {:?}", calls[0]);
    };
    assert_eq!(created.configuration_data, json!({}));
    let RecordedCall::Update { id, fields } = &calls[1] else {
        panic!("expected update second, got {:?}", calls[1]);
    };
    assert_eq!(*id, 1);
    assert_eq!(fields.name, "cfg1");
    assert_eq!(fields.configuration_data["payload"], json!({"mode": "auto"}));
    assert_eq!(fields.configuration_data["questions"][0]["path"], json!("mode"));
}

#[tokio::test]
async fn no_questions_at_start_completes_immediately() {
    let service = ScriptedService::new().with_create(Ok(record(3, document(json!({}), vec![]))));
    let mut session = DialogueSession::new(service);

    let outcome = session.start(BasicFields::default()).await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.state(), DialogueState::Complete);
    assert_eq!(
        messages(&session).last().map(String::as_str),
        Some("Configuration complete! No additional information needed.")
    );
}

#[tokio::test]
async fn local_then_server_rejection_keeps_payload() {
    let initial = document(json!({"nodes": [{"cpu": 1}]}), vec![cpu_question()]);
    let service = ScriptedService::new()
        .with_create(Ok(record(2, initial.clone())))
        .with_update(Err(rejection("cpu must be at most 64")))
        .with_update(Ok(record(2, document(json!({"nodes": [{"cpu": 8}]}), vec![]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    // Not a number: caught locally, nothing sent.
    let outcome = session.commit_input(WidgetInput::Text("abc".into())).await.unwrap();
    assert_eq!(
        outcome,
        StepOutcome::InputInvalid(LocalValidationError::NotAnInteger("abc".into()))
    );
    assert_eq!(service.call_count(), 1);
    assert_eq!(session.widget_error().map(|e| e.key.as_str()), Some("nodes[0].cpu"));
    assert_eq!(session.state(), DialogueState::AwaitingAnswer);

    // Out of bounds: the service decides.
    let outcome = session.commit_input(WidgetInput::Text("128".into())).await.unwrap();
    assert_eq!(
        outcome,
        StepOutcome::Rejected(WizardError::AnswerRejected {
            path: "nodes[0].cpu".into(),
            detail: "cpu must be at most 64".into(),
        })
    );
    let error = session.widget_error().unwrap();
    assert_eq!(error.key, "nodes[0].cpu");
    assert_eq!(error.message, "cpu must be at most 64");
    assert_eq!(session.state(), DialogueState::AwaitingAnswer);
    assert_eq!(session.document(), &initial);
    assert_eq!(session.banner(), None);
    assert_eq!(session.pending().unwrap().question.path, "nodes[0].cpu");
    assert_eq!(service.updates()[0].configuration_data["payload"]["nodes"][0]["cpu"], json!(128));

    let outcome = session.commit_input(WidgetInput::Text("8".into())).await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.widget_error(), None);
    assert_eq!(session.document().payload["nodes"][0]["cpu"], json!(8));
}

#[tokio::test]
async fn server_failure_is_retried_unchanged() {
    let service = ScriptedService::new()
        .with_create(Ok(record(4, document(json!({}), vec![mode_question()]))))
        .with_update(Err(server_error(500, "Internal Server Error")))
        .with_update(Ok(record(4, document(json!({"mode": "manual"}), vec![]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    let outcome = session.commit_input(WidgetInput::Choice(1)).await.unwrap();
    let StepOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(error.is_retryable());
    assert_eq!(session.state(), DialogueState::Failed);
    assert_eq!(session.banner(), Some("Internal Server Error"));
    assert!(session.document().payload.is_empty());
    assert_eq!(
        messages(&session).last().map(String::as_str),
        Some("Error: Internal Server Error")
    );

    let outcome = session.retry().await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.banner(), None);

    let updates = service.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], updates[1]);
}

#[tokio::test]
async fn answering_again_after_failure() {
    let service = ScriptedService::new()
        .with_create(Ok(record(6, document(json!({}), vec![mode_question()]))))
        .with_update(Err(ServiceError::Transport("connection reset".into())))
        .with_update(Ok(record(6, document(json!({"mode": "auto"}), vec![]))));
    let mut session = DialogueSession::new(service);
    session.start(BasicFields::default()).await.unwrap();

    session.commit_input(WidgetInput::Choice(1)).await.unwrap();
    assert_eq!(session.state(), DialogueState::Failed);

    let outcome = session.commit_input(WidgetInput::Choice(0)).await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.document().payload["mode"], json!("auto"));
}

#[tokio::test]
async fn unknown_question_type_is_undisplayable() {
    let service = ScriptedService::new().with_create(Ok(record(
        7,
        document(json!({}), vec![question("layout", "Pick a layout", json!({"type": "Matrix"}))]),
    )));
    let mut session = DialogueSession::new(service.clone());

    let outcome = session.start(BasicFields::default()).await.unwrap();
    assert_eq!(
        outcome,
        StepOutcome::Undisplayable(DecodeError::UnknownQuestionType("Matrix".into()))
    );
    assert_eq!(session.state(), DialogueState::AwaitingAnswer);
    assert!(session.pending().unwrap().widget.is_none());
    assert!(messages(&session)
        .last()
        .unwrap()
        .starts_with("This step cannot be displayed"));

    let err = session
        .commit_input(WidgetInput::Text("grid".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::UnknownQuestionType(_)));
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn optional_collection_none_submits_empty_list() {
    let addons = question(
        "addons",
        "Add a notification channel?",
        json!({
            "type": "ObjectCollection",
            "minSize": 0,
            "maxSize": 1,
            "possible_types": [{"v": "demo.Email", "l": "Email"}]
        }),
    );
    let service = ScriptedService::new()
        .with_create(Ok(record(8, document(json!({}), vec![addons]))))
        .with_update(Ok(record(8, document(json!({"addons": []}), vec![]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    let outcome = session.commit_input(WidgetInput::Text("None".into())).await.unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(service.updates()[0].configuration_data["payload"]["addons"], json!([]));
}

#[tokio::test]
async fn counted_collection_synthesizes_elements() {
    let brokers = question(
        "brokers",
        "How many brokers?",
        json!({
            "type": "ObjectCollection",
            "minSize": 1,
            "maxSize": 5,
            "possible_types": [{"v": "kafka.Broker", "l": "Broker"}]
        }),
    );
    let follow_up = question(
        "brokers[0].heap",
        "Heap size for broker 0?",
        json!({"type": "Number", "step": 0.5}),
    );
    let service = ScriptedService::new()
        .with_create(Ok(record(9, document(json!({}), vec![brokers]))))
        .with_update(Ok(record(
            9,
            document(
                json!({"brokers": [{"LGType_": "kafka.Broker"}, {"LGType_": "kafka.Broker"}, {"LGType_": "kafka.Broker"}]}),
                vec![follow_up],
            ),
        )));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    let outcome = session.commit_input(WidgetInput::Text("6".into())).await.unwrap();
    assert!(matches!(
        outcome,
        StepOutcome::InputInvalid(LocalValidationError::CountOutOfRange { count: 6, .. })
    ));
    assert_eq!(service.call_count(), 1);

    let outcome = session.commit_input(WidgetInput::Text("3".into())).await.unwrap();
    assert_eq!(outcome, StepOutcome::NextQuestion);
    assert_eq!(
        service.updates()[0].configuration_data["payload"]["brokers"],
        json!([{"LGType_": "kafka.Broker"}, {"LGType_": "kafka.Broker"}, {"LGType_": "kafka.Broker"}])
    );
    assert_eq!(session.pending().unwrap().question.path, "brokers[0].heap");
}

#[tokio::test]
async fn unresolvable_path_fails_without_request() {
    let orphan = question("cluster.mode", "Cluster mode?", json!({"type": "Boolean"}));
    let service = ScriptedService::new().with_create(Ok(record(10, document(json!({}), vec![orphan]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    let outcome = session.commit_input(WidgetInput::Choice(0)).await.unwrap();
    assert!(matches!(outcome, StepOutcome::Failed(WizardError::PathResolution(_))));
    assert_eq!(session.state(), DialogueState::Failed);
    assert!(session.banner().is_some());
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn fields_are_sent_on_every_request() {
    let fields = BasicFields::new("kafka-prod")
        .with_description("  ")
        .with_version("2.1.0")
        .with_tags("prod, kafka");
    let service = ScriptedService::new()
        .with_create(Ok(record(11, document(json!({}), vec![mode_question()]))))
        .with_update(Ok(record(11, document(json!({"mode": "auto"}), vec![]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(fields).await.unwrap();
    session.commit_input(WidgetInput::Choice(0)).await.unwrap();

    let update = &service.updates()[0];
    assert_eq!(update.name, "kafka-prod");
    assert_eq!(update.version, "2.1.0");
    assert_eq!(update.description, None);
    assert_eq!(update.tags, vec!["prod", "kafka"]);
}

#[tokio::test]
async fn discard_after_completion_returns_to_idle() {
    let service = ScriptedService::new().with_create(Ok(record(12, document(json!({}), vec![]))));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();

    session.discard().await.unwrap();
    assert_eq!(session.state(), DialogueState::Idle);
    assert_eq!(service.calls().last(), Some(&RecordedCall::Delete(12)));

    session.start(BasicFields::new("cfg2")).await.unwrap();
    assert_eq!(session.state(), DialogueState::Failed);
}

#[tokio::test]
async fn failed_discard_keeps_the_session() {
    let service = ScriptedService::new()
        .with_create(Ok(record(14, document(json!({"mode": null}), vec![mode_question()]))))
        .with_delete(Err(server_error(500, "database locked")))
        .with_delete(Ok(()));
    let mut session = DialogueSession::new(service.clone());
    session.start(BasicFields::default()).await.unwrap();
    let before = messages(&session);

    let err = session.discard().await.unwrap_err();
    assert_eq!(
        err,
        WizardError::ProtocolFailure(ServiceError::Status {
            status: 500,
            detail: "database locked".into()
        })
    );
    assert_eq!(session.state(), DialogueState::AwaitingAnswer);
    assert_eq!(session.configuration_id(), Some(14));
    assert_eq!(session.pending().unwrap().question.path, "mode");
    assert_eq!(messages(&session), before);

    session.discard().await.unwrap();
    assert_eq!(session.state(), DialogueState::Idle);
    assert_eq!(session.configuration_id(), None);
    assert_eq!(
        service.calls()[1..].to_vec(),
        vec![RecordedCall::Delete(14), RecordedCall::Delete(14)]
    );
    assert_eq!(messages(&session).last().map(String::as_str), Some("Configuration 14 discarded."));
}

#[tokio::test]
async fn fields_cannot_change_once_created() {
    let service = ScriptedService::new().with_create(Ok(record(13, document(json!({}), vec![mode_question()]))));
    let mut session = DialogueSession::new(service);
    session.start(BasicFields::default()).await.unwrap();

    let err = session.enter_fields(BasicFields::new("other")).unwrap_err();
    assert!(matches!(err, WizardError::InvalidTransition { .. }));
}
