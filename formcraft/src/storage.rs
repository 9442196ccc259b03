//! Question persistence in a JSON file.
//!
//! The file holds the ordered question list in its persisted record form.
//! Saves upsert by id (appending unknown questions), removals filter by id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use formcraft_types::{Question, QuestionId, QuestionStorage, StorageError};
use tokio::sync::Mutex;
use tracing::debug;

/// [`QuestionStorage`] backed by a single JSON file.
///
/// Read-modify-write cycles are serialized so concurrent saves of different
/// questions never lose each other's updates.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Option<Vec<Question>>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn write(&self, questions: &[Question]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(questions)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        // Stage then rename: a crash mid-write must not truncate the list.
        let staging = self.staging_path();
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        PathBuf::from(path)
    }
}

impl QuestionStorage for JsonFileStorage {
    async fn save(&self, question: &Question) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut questions = self.read().await?.unwrap_or_default();

        match questions.iter_mut().find(|q| q.id() == question.id()) {
            Some(existing) => *existing = question.clone(),
            None => questions.push(question.clone()),
        }

        debug!(question_id = %question.id(), path = %self.path.display(), "question saved");
        self.write(&questions).await
    }

    async fn remove(&self, id: &QuestionId) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut questions = self.read().await?.unwrap_or_default();
        questions.retain(|q| q.id() != id);

        debug!(question_id = %id, path = %self.path.display(), "question removed");
        self.write(&questions).await
    }

    async fn load(&self) -> Result<Option<Vec<Question>>, StorageError> {
        let _guard = self.lock.lock().await;
        let questions = self.read().await?.map(|questions| {
            questions
                .into_iter()
                .map(|mut question| {
                    question.set_saving(false);
                    question
                })
                .collect()
        });
        Ok(questions)
    }
}
