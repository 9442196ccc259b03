//! The form session: builder, renderer and screen flow wired to storage.
//!
//! All state lives on a single owner and is only changed through the
//! session's methods. Storage and submission calls are spawned onto the
//! runtime and never awaited by the caller; their results come back as
//! completion events that are applied by [`FormSession::next_event`],
//! [`FormSession::poll_events`] or [`FormSession::settle`].

use std::sync::Arc;

use formcraft_types::{
    AnswerValue, IdSource, OptionId, QuestionId, QuestionStorage, QuestionType,
    QuestionsErrorMap, SelectOption, StorageError, SubmissionBackend, SubmitError,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::builder::{Persist, QuestionField, QuestionStore};
use crate::renderer::{AnswerStore, SubmissionId};
use crate::screen::{Screen, ScreenController};
use crate::{BuilderError, SessionError};

/// A user-facing outcome the presentation layer should surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Saving an edited question failed. The edit stands.
    SaveFailed { id: QuestionId, message: String },

    /// Deleting a question failed.
    ///
    /// `restored` is false when the question could not be put back: it was
    /// removed by a builder reset, or a question with that id exists again.
    RemoveFailed {
        id: QuestionId,
        message: String,
        restored: bool,
    },

    /// "Build" was refused because questions are invalid.
    BuildRejected { invalid: usize },

    /// "Submit" was refused because answers are invalid.
    SubmissionRejected { invalid: usize },

    /// The backend accepted the answers.
    SubmitSucceeded,

    /// The backend failed to accept the answers.
    SubmitFailed { message: String },
}

/// Result of an asynchronous call, delivered back to the session.
#[derive(Debug)]
enum Completion {
    Saved {
        id: QuestionId,
        result: Result<(), StorageError>,
    },
    Removed {
        id: QuestionId,
        result: Result<(), StorageError>,
    },
    Submitted {
        submission: SubmissionId,
        result: Result<(), SubmitError>,
    },
}

/// A complete build-then-fill form flow.
pub struct FormSession<S, B, I> {
    storage: Arc<S>,
    backend: Arc<B>,
    ids: I,
    screen: ScreenController,
    builder: QuestionStore,
    renderer: AnswerStore,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    notices: Vec<Notice>,
}

impl<S, B, I> FormSession<S, B, I>
where
    S: QuestionStorage + 'static,
    B: SubmissionBackend + 'static,
    I: IdSource,
{
    /// Open a session, seeding the builder from storage.
    ///
    /// Falls back to a single default TEXT question when nothing has been
    /// persisted yet.
    pub async fn open(storage: S, backend: B, ids: I) -> Result<Self, SessionError> {
        let storage = Arc::new(storage);
        let builder = match storage.load().await? {
            Some(questions) => {
                info!(count = questions.len(), "loaded persisted questions");
                QuestionStore::new(questions)
            }
            None => QuestionStore::with_default(&ids),
        };
        Ok(Self::with_builder(storage, Arc::new(backend), ids, builder))
    }

    /// Assemble a session around an existing question store.
    pub fn with_builder(storage: Arc<S>, backend: Arc<B>, ids: I, builder: QuestionStore) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            storage,
            backend,
            ids,
            screen: ScreenController::new(),
            builder,
            renderer: AnswerStore::default(),
            completions_tx,
            completions_rx,
            in_flight: 0,
            notices: Vec::new(),
        }
    }

    // === State ===

    pub fn screen(&self) -> Screen {
        self.screen.screen()
    }

    pub fn builder(&self) -> &QuestionStore {
        &self.builder
    }

    pub fn renderer(&self) -> &AnswerStore {
        &self.renderer
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of storage or submission calls not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Take every notice queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // === Builder ===

    pub fn add_question(&mut self, question_type: QuestionType) -> Result<QuestionId, SessionError> {
        self.screen.require(Screen::Building, "add a question")?;
        let (id, persist) = self.builder.add_question(question_type, &self.ids);
        self.dispatch(persist);
        Ok(id)
    }

    pub fn remove_question(&mut self, id: &QuestionId) -> Result<(), SessionError> {
        self.screen.require(Screen::Building, "remove a question")?;
        let persist = self.builder.remove_question(id)?;
        self.dispatch(Some(persist));
        Ok(())
    }

    pub fn update_field(&mut self, id: &QuestionId, field: QuestionField) -> Result<(), SessionError> {
        self.screen.require(Screen::Building, "edit a question")?;
        let persist = self.builder.update_field(id, field)?;
        self.dispatch(persist);
        Ok(())
    }

    /// Append a new option to a SELECT question.
    pub fn add_option(
        &mut self,
        id: &QuestionId,
        label: impl Into<String>,
    ) -> Result<OptionId, SessionError> {
        self.screen.require(Screen::Building, "edit a question")?;
        let option = SelectOption::new(self.ids.new_id(), label);
        let option_id = option.id.clone();
        let persist = self.builder.add_option(id, option)?;
        self.dispatch(persist);
        Ok(option_id)
    }

    pub fn update_option(
        &mut self,
        id: &QuestionId,
        option_id: &OptionId,
        label: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.screen.require(Screen::Building, "edit a question")?;
        let persist = self.builder.update_option(id, option_id, label)?;
        self.dispatch(persist);
        Ok(())
    }

    pub fn remove_option(&mut self, id: &QuestionId, option_id: &OptionId) -> Result<(), SessionError> {
        self.screen.require(Screen::Building, "edit a question")?;
        let persist = self.builder.remove_option(id, option_id)?;
        self.dispatch(persist);
        Ok(())
    }

    /// Throw away every question and start from the default one.
    pub fn reset_builder(&mut self) -> Result<(), SessionError> {
        self.screen.require(Screen::Building, "reset the builder")?;
        let persist = self.builder.reset(&self.ids);
        for command in persist {
            self.dispatch(Some(command));
        }
        Ok(())
    }

    /// Validate the builder and, if every question is valid, open the renderer.
    ///
    /// Returns the builder errors when the build is refused; the screen then
    /// stays on the builder.
    pub fn build(&mut self) -> Result<Result<(), QuestionsErrorMap>, SessionError> {
        self.screen.require(Screen::Building, "build the form")?;
        match self.builder.validate_builder() {
            Ok(()) => {
                self.screen.on_builder_validation_success()?;
                self.renderer.restart(self.builder.questions().to_vec());
                info!(questions = self.builder.questions().len(), "form built");
                Ok(Ok(()))
            }
            Err(errors) => {
                self.notices.push(Notice::BuildRejected {
                    invalid: errors.len(),
                });
                Ok(Err(errors))
            }
        }
    }

    /// Leave the renderer and go back to editing.
    ///
    /// Answers are discarded. A submission still in flight is abandoned: its
    /// result will not be applied to the next render pass.
    pub fn edit_build(&mut self) -> Result<(), SessionError> {
        self.screen.edit_build()?;
        self.renderer.reset();
        Ok(())
    }

    // === Renderer ===

    pub fn update_answer(&mut self, id: &QuestionId, value: impl Into<AnswerValue>) -> Result<(), SessionError> {
        self.screen.require(Screen::Rendering, "answer a question")?;
        let question_type = self
            .renderer
            .questions()
            .iter()
            .find(|question| question.id() == id)
            .map(|question| question.question_type())
            .ok_or_else(|| BuilderError::UnknownQuestion(id.clone()))?;
        self.renderer.update_answer(id, question_type, value.into());
        Ok(())
    }

    /// Validate the answers and, if valid, send them to the backend.
    ///
    /// Returns true if a submission was started. The backend's verdict
    /// arrives later as a [`Notice`].
    pub fn submit_form(&mut self) -> Result<bool, SessionError> {
        self.screen.require(Screen::Rendering, "submit the form")?;
        if self.renderer.is_saving_form() {
            return Err(SessionError::SubmissionInFlight);
        }

        let (submission, answers) = match self.renderer.begin_submit() {
            Ok(pending) => pending,
            Err(errors) => {
                self.notices.push(Notice::SubmissionRejected {
                    invalid: errors.len(),
                });
                return Ok(false);
            }
        };

        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend.submit(&answers).await;
            if tx.send(Completion::Submitted { submission, result }).is_err() {
                warn!("session closed before submission completed");
            }
        });
        Ok(true)
    }

    // === Completions ===

    /// Wait for the next completion and apply it.
    ///
    /// Returns false immediately when nothing is in flight.
    pub async fn next_event(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait until every outstanding call has completed and been applied.
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Saved { id, result } => {
                self.builder.complete_save(&id, &result);
                if let Err(err) = result {
                    self.notices.push(Notice::SaveFailed {
                        id,
                        message: err.to_string(),
                    });
                }
            }
            Completion::Removed { id, result } => {
                let restored = self.builder.complete_remove(&id, &result);
                if let Err(err) = result {
                    self.notices.push(Notice::RemoveFailed {
                        id,
                        message: err.to_string(),
                        restored,
                    });
                }
            }
            Completion::Submitted { submission, result } => {
                if !self.renderer.finish_submit(submission, &result) {
                    return;
                }
                match result {
                    Ok(()) => {
                        info!("form submitted");
                        self.notices.push(Notice::SubmitSucceeded);
                    }
                    Err(err) => self.notices.push(Notice::SubmitFailed {
                        message: err.to_string(),
                    }),
                }
            }
        }
    }

    fn dispatch(&mut self, persist: Option<Persist>) {
        let Some(persist) = persist else {
            return;
        };

        let storage = Arc::clone(&self.storage);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        match persist {
            Persist::Save(question) => {
                tokio::spawn(async move {
                    let result = storage.save(&question).await;
                    let id = question.id().clone();
                    if tx.send(Completion::Saved { id, result }).is_err() {
                        warn!("session closed before save completed");
                    }
                });
            }
            Persist::Remove(id) => {
                tokio::spawn(async move {
                    let result = storage.remove(&id).await;
                    if tx.send(Completion::Removed { id, result }).is_err() {
                        warn!("session closed before removal completed");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use formcraft_types::Question;

    use super::*;
    use crate::{MemoryStorage, RecordingBackend, SequentialIds, Simulated, SimulationConfig};

    type TestSession = FormSession<MemoryStorage, RecordingBackend, SequentialIds>;

    async fn session(storage: MemoryStorage) -> TestSession {
        FormSession::open(storage, RecordingBackend::new(), SequentialIds::new("id"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn opens_with_default_question() {
        let session = session(MemoryStorage::new()).await;
        assert_eq!(session.screen(), Screen::Building);
        assert_eq!(session.builder().questions().len(), 1);
        assert_eq!(session.in_flight(), 0);
    }

    #[tokio::test]
    async fn opens_with_persisted_questions() {
        let stored = vec![formcraft_types::Question::new("q9", QuestionType::Number).titled("Age")];
        let session = session(MemoryStorage::new().with_questions(stored)).await;
        assert_eq!(session.builder().questions()[0].id().as_str(), "q9");
    }

    #[tokio::test]
    async fn builder_edits_are_refused_while_rendering() {
        let mut session = session(MemoryStorage::new()).await;
        session.build().unwrap().unwrap();

        assert!(matches!(
            session.add_question(QuestionType::Text),
            Err(SessionError::Screen(_))
        ));
        assert!(matches!(session.build(), Err(SessionError::Screen(_))));
    }

    #[tokio::test]
    async fn answers_are_refused_while_building() {
        let mut session = session(MemoryStorage::new()).await;
        let id = session.builder().questions()[0].id().clone();
        assert!(matches!(
            session.update_answer(&id, "x"),
            Err(SessionError::Screen(_))
        ));
    }

    #[tokio::test]
    async fn save_failure_is_reported_without_rollback() {
        let mut session = session(MemoryStorage::new().failing_saves(true)).await;
        let id = session.builder().questions()[0].id().clone();

        session
            .update_field(&id, QuestionField::Title("Email".into()))
            .unwrap();
        assert!(session.builder().question(&id).unwrap().is_saving());

        session.settle().await;
        let question = session.builder().question(&id).unwrap();
        assert_eq!(question.title(), "Email");
        assert!(!question.is_saving());
        assert!(matches!(
            session.take_notices().as_slice(),
            [Notice::SaveFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn double_submit_is_refused() {
        let mut session = session(MemoryStorage::new()).await;
        let id = session.builder().questions()[0].id().clone();
        session.build().unwrap().unwrap();
        session.update_answer(&id, "hello").unwrap();

        assert!(session.submit_form().unwrap());
        assert!(matches!(
            session.submit_form(),
            Err(SessionError::SubmissionInFlight)
        ));

        session.settle().await;
        assert!(!session.renderer().is_saving_form());
        assert_eq!(session.take_notices(), vec![Notice::SubmitSucceeded]);
    }

    #[tokio::test]
    async fn edit_build_resets_answers() {
        let mut session = session(MemoryStorage::new()).await;
        let id = session.builder().questions()[0].id().clone();
        session.build().unwrap().unwrap();
        session.update_answer(&id, "hello").unwrap();

        session.edit_build().unwrap();
        assert_eq!(session.screen(), Screen::Building);
        assert!(session.renderer().answers().is_empty());
    }

    #[tokio::test]
    async fn reset_builder_persists_new_default() {
        let storage = MemoryStorage::new();
        let mut session = session(storage).await;
        session.add_question(QuestionType::Number).unwrap();
        session.settle().await;

        session.reset_builder().unwrap();
        session.settle().await;

        let persisted = session.storage().snapshot().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id(), session.builder().questions()[0].id());
    }

    #[tokio::test]
    async fn failed_reset_removal_is_not_restored() {
        let mut session = session(MemoryStorage::new().failing_removes(true)).await;
        let old = session.builder().questions()[0].id().clone();

        session.reset_builder().unwrap();
        session.settle().await;

        assert_eq!(session.builder().questions().len(), 1);
        assert_ne!(session.builder().questions()[0].id(), &old);
        assert!(matches!(
            session.take_notices().as_slice(),
            [Notice::RemoveFailed { id, restored: false, .. }] if id == &old
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn result_of_abandoned_submission_is_ignored() {
        let backend = Simulated::new(
            RecordingBackend::new(),
            SimulationConfig {
                min_delay_ms: 100,
                max_delay_ms: 100,
                failure_rate: 0.0,
            },
        );
        let mut session = FormSession::open(MemoryStorage::new(), backend, SequentialIds::new("id"))
            .await
            .unwrap();
        let id = session.builder().questions()[0].id().clone();

        session.build().unwrap().unwrap();
        session.update_answer(&id, "first").unwrap();
        assert!(session.submit_form().unwrap());

        tokio::time::sleep(Duration::from_millis(50)).await;
        session.edit_build().unwrap();
        session.build().unwrap().unwrap();
        session.update_answer(&id, "second").unwrap();
        assert!(session.submit_form().unwrap());

        // The first submission lands while the second is still pending.
        assert!(session.next_event().await);
        assert!(session.renderer().is_saving_form());
        assert!(session.take_notices().is_empty());
        assert!(matches!(
            session.submit_form(),
            Err(SessionError::SubmissionInFlight)
        ));

        assert!(session.next_event().await);
        assert!(!session.renderer().is_saving_form());
        assert_eq!(session.take_notices(), vec![Notice::SubmitSucceeded]);
        assert_eq!(session.backend().inner().submissions().len(), 2);
    }

    /// Storage with scripted latency: saves by title, removals by id.
    #[derive(Debug, Default)]
    struct LatencyStorage {
        inner: MemoryStorage,
        save_delays: HashMap<String, u64>,
        remove_delays: HashMap<QuestionId, u64>,
    }

    impl QuestionStorage for LatencyStorage {
        async fn save(&self, question: &Question) -> Result<(), StorageError> {
            let delay = self.save_delays.get(question.title()).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.save(question).await
        }

        async fn remove(&self, id: &QuestionId) -> Result<(), StorageError> {
            let delay = self.remove_delays.get(id).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.inner.remove(id).await
        }

        async fn load(&self) -> Result<Option<Vec<Question>>, StorageError> {
            self.inner.load().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn completions_in_reverse_order_are_applied_by_id() {
        let storage = LatencyStorage {
            inner: MemoryStorage::new().failing_removes(true),
            save_delays: HashMap::from([("slow".to_string(), 300), ("fast".to_string(), 100)]),
            remove_delays: HashMap::from([(QuestionId::new("id-2"), 50)]),
        };
        let mut session = FormSession::open(storage, RecordingBackend::new(), SequentialIds::new("id"))
            .await
            .unwrap();
        let edited = session.builder().questions()[0].id().clone();
        let removed = session.add_question(QuestionType::Text).unwrap();
        assert_eq!(removed.as_str(), "id-2");
        session.settle().await;

        session
            .update_field(&edited, QuestionField::Title("slow".into()))
            .unwrap();
        session
            .update_field(&edited, QuestionField::Title("fast".into()))
            .unwrap();
        session.remove_question(&removed).unwrap();
        assert_eq!(session.in_flight(), 3);

        // The removal fails first and the question comes back.
        assert!(session.next_event().await);
        assert_eq!(session.builder().questions().len(), 2);
        assert_eq!(session.builder().questions()[1].id(), &removed);
        assert!(session.builder().question(&edited).unwrap().is_saving());

        // The second save finishes before the first.
        assert!(session.next_event().await);
        assert!(session.builder().question(&edited).unwrap().is_saving());

        assert!(session.next_event().await);
        let question = session.builder().question(&edited).unwrap();
        assert!(!question.is_saving());
        assert_eq!(question.title(), "fast");
        assert_eq!(session.in_flight(), 0);
        assert!(matches!(
            session.take_notices().as_slice(),
            [Notice::RemoveFailed { restored: true, .. }]
        ));
    }
}
