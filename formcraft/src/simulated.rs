use std::time::Duration;

use formcraft_types::{
    Answers, Question, QuestionId, QuestionStorage, StorageError, SubmissionBackend, SubmitError,
};
use rand::Rng;
use tracing::debug;

use crate::SimulationConfig;

/// Wraps a collaborator with random latency and random failure.
///
/// Every call sleeps for a duration drawn from the configured range, then
/// either fails (with the configured probability) or forwards to the inner
/// collaborator. Loading persisted questions is never delayed or failed.
#[derive(Debug)]
pub struct Simulated<T> {
    inner: T,
    config: SimulationConfig,
}

impl<T> Simulated<T> {
    pub fn new(inner: T, config: SimulationConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // NaN never fails.
    fn failure_probability(&self) -> f64 {
        let rate = self.config.failure_rate;
        if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
    }

    /// Draw a delay and a verdict. Returns true if the call should fail.
    async fn roll(&self, operation: &'static str) -> bool {
        let (delay, fail) = {
            let mut rng = rand::rng();
            let range = self.config.delay_range();
            let delay = if range.start() < range.end() {
                rng.random_range(range)
            } else {
                *range.start()
            };
            let fail = rng.random_bool(self.failure_probability());
            (delay, fail)
        };

        debug!(operation, delay_ms = delay.as_millis() as u64, fail, "simulating call");
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        fail
    }
}

impl<T: QuestionStorage> QuestionStorage for Simulated<T> {
    async fn save(&self, question: &Question) -> Result<(), StorageError> {
        if self.roll("save").await {
            return Err(StorageError::SaveFailed);
        }
        self.inner.save(question).await
    }

    async fn remove(&self, id: &QuestionId) -> Result<(), StorageError> {
        if self.roll("remove").await {
            return Err(StorageError::RemoveFailed);
        }
        self.inner.remove(id).await
    }

    async fn load(&self) -> Result<Option<Vec<Question>>, StorageError> {
        self.inner.load().await
    }
}

impl<T: SubmissionBackend> SubmissionBackend for Simulated<T> {
    async fn submit(&self, answers: &Answers) -> Result<(), SubmitError> {
        if self.roll("submit").await {
            return Err(SubmitError::Rejected);
        }
        self.inner.submit(answers).await
    }
}
