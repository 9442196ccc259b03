use std::future::Future;

use crate::{Answers, Question, QuestionId, StorageError, SubmitError};

/// Persistence for question definitions.
///
/// Writes are idempotent upserts keyed by question id. Latency and failure
/// are up to the implementation; callers must cope with both and never
/// assume completions arrive in the order the calls were made.
pub trait QuestionStorage: Send + Sync {
    /// Save or replace a question (upsert on id).
    fn save(&self, question: &Question) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete a question by id. No-op if it does not exist.
    fn remove(&self, id: &QuestionId) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Load the persisted question list in order.
    ///
    /// Returns `None` if nothing was ever persisted.
    fn load(&self) -> impl Future<Output = Result<Option<Vec<Question>>, StorageError>> + Send;
}

/// Receiver of completed forms.
pub trait SubmissionBackend: Send + Sync {
    /// Submit the answers of a validated form.
    fn submit(&self, answers: &Answers) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Source of globally unique identifiers.
pub trait IdSource {
    /// Produce a fresh identifier.
    fn new_id(&self) -> String;
}
