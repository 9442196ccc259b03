//! In-memory collaborators for testing forms without files or latency.
//!
//! `MemoryStorage` and `RecordingBackend` complete immediately and can be
//! told to fail, which makes rollback and error paths easy to drive.
//!
//! # Example
//!
//! ```rust,ignore
//! use formcraft::{FormSession, MemoryStorage, RecordingBackend, SequentialIds};
//!
//! let storage = MemoryStorage::new().failing_removes(true);
//! let backend = RecordingBackend::new();
//! let session = FormSession::open(storage, backend, SequentialIds::new("q")).await?;
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use formcraft_types::{
    Answers, Question, QuestionId, QuestionStorage, StorageError, SubmissionBackend, SubmitError,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Question storage held in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    questions: Mutex<Option<Vec<Question>>>,
    fail_saves: AtomicBool,
    fail_removes: AtomicBool,
    failing_ids: Mutex<HashSet<QuestionId>>,
}

impl MemoryStorage {
    /// Create an empty storage that has never been written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted question list.
    pub fn with_questions(self, questions: Vec<Question>) -> Self {
        *lock(&self.questions) = Some(questions);
        self
    }

    /// Make every save fail.
    pub fn failing_saves(self, fail: bool) -> Self {
        self.fail_saves.store(fail, Ordering::SeqCst);
        self
    }

    /// Make every removal fail.
    pub fn failing_removes(self, fail: bool) -> Self {
        self.fail_removes.store(fail, Ordering::SeqCst);
        self
    }

    /// Make saves and removals of one question fail.
    pub fn fail_for(&self, id: impl Into<QuestionId>) {
        lock(&self.failing_ids).insert(id.into());
    }

    /// Let saves and removals of a question succeed again.
    pub fn recover(&self, id: &QuestionId) {
        lock(&self.failing_ids).remove(id);
    }

    /// The persisted list, if anything was ever written.
    pub fn snapshot(&self) -> Option<Vec<Question>> {
        lock(&self.questions).clone()
    }

    fn fails(&self, flag: &AtomicBool, id: &QuestionId) -> bool {
        flag.load(Ordering::SeqCst) || lock(&self.failing_ids).contains(id)
    }
}

impl QuestionStorage for MemoryStorage {
    async fn save(&self, question: &Question) -> Result<(), StorageError> {
        if self.fails(&self.fail_saves, question.id()) {
            return Err(StorageError::SaveFailed);
        }

        let mut guard = lock(&self.questions);
        let questions = guard.get_or_insert_with(Vec::new);
        match questions.iter_mut().find(|q| q.id() == question.id()) {
            Some(existing) => *existing = question.clone(),
            None => questions.push(question.clone()),
        }
        Ok(())
    }

    async fn remove(&self, id: &QuestionId) -> Result<(), StorageError> {
        if self.fails(&self.fail_removes, id) {
            return Err(StorageError::RemoveFailed);
        }

        if let Some(questions) = lock(&self.questions).as_mut() {
            questions.retain(|q| q.id() != id);
        }
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<Question>>, StorageError> {
        Ok(self.snapshot())
    }
}

/// Submission backend that records every accepted submission.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    submissions: Mutex<Vec<Answers>>,
    fail: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every submission.
    pub fn failing(self, fail: bool) -> Self {
        self.fail.store(fail, Ordering::SeqCst);
        self
    }

    /// Switch failure on or off after construction.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every accepted submission, oldest first.
    pub fn submissions(&self) -> Vec<Answers> {
        lock(&self.submissions).clone()
    }
}

impl SubmissionBackend for RecordingBackend {
    async fn submit(&self, answers: &Answers) -> Result<(), SubmitError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SubmitError::Rejected);
        }
        lock(&self.submissions).push(answers.clone());
        Ok(())
    }
}
