//! Integration tests for formcraft

use formcraft::{
    AnswerError, Answers, FormSession, JsonFileStorage, MIN_GREATER_THAN_MAX, MemoryStorage,
    Notice, QuestionField, QuestionType, RecordingBackend, Screen,
    SequentialIds, SessionError, Simulated, SimulationConfig, SubmissionBackend, SubmitError,
    TOO_FEW_OPTIONS,
};

async fn open(storage: MemoryStorage) -> FormSession<MemoryStorage, RecordingBackend, SequentialIds> {
    FormSession::open(storage, RecordingBackend::new(), SequentialIds::new("q"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_text_question_builds_and_renders() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.builder().questions()[0].id().clone();

    session
        .update_field(&id, QuestionField::Title("Name".into()))
        .unwrap();
    session.settle().await;

    assert!(session.build().unwrap().is_ok());
    assert_eq!(session.screen(), Screen::Rendering);
    assert_eq!(session.renderer().questions().len(), 1);
    assert_eq!(session.renderer().questions()[0].title(), "Name");
}

#[tokio::test]
async fn test_select_with_one_option_is_rejected() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.add_question(QuestionType::Select).unwrap();
    session.add_option(&id, "A").unwrap();
    session.settle().await;

    let errors = session.build().unwrap().unwrap_err();
    assert_eq!(session.screen(), Screen::Building);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(&id).unwrap().options_error(), Some(TOO_FEW_OPTIONS));
    assert_eq!(
        session.take_notices(),
        vec![Notice::BuildRejected { invalid: 1 }]
    );

    // Invalid questions are never auto-saved.
    let persisted = session.storage().snapshot().unwrap_or_default();
    assert!(persisted.iter().all(|question| question.id() != &id));
}

#[tokio::test]
async fn test_number_bounds_revalidate_live() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.add_question(QuestionType::Number).unwrap();
    session.update_field(&id, QuestionField::Min(10.0)).unwrap();
    session.update_field(&id, QuestionField::Max(5.0)).unwrap();

    let errors = session.build().unwrap().unwrap_err();
    assert_eq!(
        errors.get(&id).unwrap().min_error(),
        Some(MIN_GREATER_THAN_MAX)
    );

    session.update_field(&id, QuestionField::Max(20.0)).unwrap();
    assert!(session.builder().errors().is_empty());

    session.settle().await;
    assert!(session.build().unwrap().is_ok());
}

#[tokio::test]
async fn test_required_answer_then_submit() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.builder().questions()[0].id().clone();
    session.build().unwrap().unwrap();

    assert!(!session.submit_form().unwrap());
    assert_eq!(
        session.renderer().errors().get(&id),
        Some(&AnswerError::Required)
    );
    assert_eq!(
        session.renderer().errors().get(&id).unwrap().to_string(),
        "Answer is required"
    );
    assert!(!session.renderer().is_saving_form());

    session.update_answer(&id, "hello").unwrap();
    assert!(session.renderer().errors().is_empty());

    assert!(session.submit_form().unwrap());
    assert!(session.renderer().is_saving_form());
    session.settle().await;

    let notices = session.take_notices();
    assert_eq!(notices.last(), Some(&Notice::SubmitSucceeded));
    let submissions = session.backend().submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].get(&id).unwrap().as_text(), Some("hello"));
}

#[tokio::test]
async fn test_failed_remove_restores_question() {
    let mut session = open(MemoryStorage::new().failing_removes(true)).await;
    let first = session.builder().questions()[0].id().clone();
    let second = session.add_question(QuestionType::Number).unwrap();
    session.settle().await;

    session.remove_question(&first).unwrap();
    assert_eq!(session.builder().questions().len(), 1);

    session.settle().await;
    let ids: Vec<_> = session
        .builder()
        .questions()
        .iter()
        .map(|question| question.id().clone())
        .collect();
    assert_eq!(ids, vec![first.clone(), second]);
    assert!(matches!(
        session.take_notices().as_slice(),
        [Notice::RemoveFailed { id, message, restored: true }]
            if id == &first && message == "Failed to remove question"
    ));
}

#[tokio::test]
async fn test_edits_survive_rollback() {
    let mut session = open(MemoryStorage::new()).await;
    let first = session.builder().questions()[0].id().clone();
    let second = session.add_question(QuestionType::Text).unwrap();
    session.settle().await;
    session.storage().fail_for(first.as_str());

    session.remove_question(&first).unwrap();
    session
        .update_field(&second, QuestionField::Title("Still here".into()))
        .unwrap();
    session.settle().await;

    let questions = session.builder().questions();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].id(), &first);
    assert_eq!(questions[1].title(), "Still here");
    assert!(questions.iter().all(|question| !question.is_saving()));
}

#[tokio::test]
async fn test_edit_build_returns_to_builder() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.builder().questions()[0].id().clone();
    session.build().unwrap().unwrap();
    session.update_answer(&id, "draft").unwrap();

    session.edit_build().unwrap();
    assert_eq!(session.screen(), Screen::Building);
    assert!(session.renderer().answer(&id).is_none());
    assert!(matches!(session.edit_build(), Err(SessionError::Screen(_))));
}

#[tokio::test]
async fn test_select_answer_is_single_choice() {
    let mut session = open(MemoryStorage::new()).await;
    let id = session.add_question(QuestionType::Select).unwrap();
    let yes = session.add_option(&id, "Yes").unwrap();
    let no = session.add_option(&id, "No").unwrap();
    session.settle().await;
    session.build().unwrap().unwrap();

    session.update_answer(&id, yes.as_str()).unwrap();
    session.update_answer(&id, no.as_str()).unwrap();
    assert_eq!(
        session.renderer().answer(&id).unwrap().as_selection(),
        Some(&[no][..])
    );
}

#[tokio::test]
async fn test_reset_builder() {
    let mut session = open(MemoryStorage::new()).await;
    session.add_question(QuestionType::Number).unwrap();
    session.add_question(QuestionType::Select).unwrap();
    session.build().unwrap().unwrap_err();

    session.reset_builder().unwrap();
    session.settle().await;

    assert_eq!(session.builder().questions().len(), 1);
    assert_eq!(
        session.builder().questions()[0].question_type(),
        QuestionType::Text
    );
    assert!(session.builder().errors().is_empty());
    assert!(!session.builder().is_validated_once());
}

#[tokio::test]
async fn test_questions_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.json");

    let storage = Simulated::new(JsonFileStorage::new(&path), SimulationConfig::instant());
    let mut session = FormSession::open(storage, RecordingBackend::new(), SequentialIds::new("a"))
        .await
        .unwrap();
    let id = session.builder().questions()[0].id().clone();
    session
        .update_field(&id, QuestionField::Title("Email".into()))
        .unwrap();
    session.settle().await;
    let number = session.add_question(QuestionType::Number).unwrap();
    session.update_field(&number, QuestionField::Max(10.0)).unwrap();
    session.settle().await;
    drop(session);

    let session = FormSession::open(
        JsonFileStorage::new(&path),
        RecordingBackend::new(),
        SequentialIds::new("b"),
    )
    .await
    .unwrap();
    let questions = session.builder().questions();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].title(), "Email");
    assert_eq!(questions[1].id(), &number);
    assert!(questions.iter().all(|question| !question.is_saving()));
}

#[tokio::test]
async fn test_failing_simulated_backend_reports_failure() {
    let backend = Simulated::new(RecordingBackend::new(), SimulationConfig::always_failing());
    let mut session = FormSession::open(MemoryStorage::new(), backend, SequentialIds::new("q"))
        .await
        .unwrap();
    let id = session.builder().questions()[0].id().clone();
    session.build().unwrap().unwrap();
    session.update_answer(&id, "hello").unwrap();

    assert!(session.submit_form().unwrap());
    session.settle().await;

    assert!(!session.renderer().is_saving_form());
    assert_eq!(
        session.take_notices(),
        vec![Notice::SubmitFailed {
            message: "Failed to save answers".into()
        }]
    );
    // A failed submission can be retried.
    assert!(session.submit_form().unwrap());
}

struct OfflineBackend;

impl SubmissionBackend for OfflineBackend {
    async fn submit(&self, _answers: &Answers) -> Result<(), SubmitError> {
        Err(SubmitError::backend(anyhow::anyhow!("network unreachable")))
    }
}

#[tokio::test]
async fn test_custom_backend_error_is_surfaced() {
    let mut session = FormSession::open(MemoryStorage::new(), OfflineBackend, SequentialIds::new("q"))
        .await
        .unwrap();
    let id = session.builder().questions()[0].id().clone();
    session.build().unwrap().unwrap();
    session.update_answer(&id, "hello").unwrap();
    session.submit_form().unwrap();
    session.settle().await;

    let notices = session.take_notices();
    assert!(matches!(
        notices.as_slice(),
        [Notice::SubmitFailed { message }] if message.contains("network unreachable")
    ));
}
