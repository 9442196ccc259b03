//! Render-time answer state.

use formcraft_types::{
    AnswerValue, Answers, AnswersErrorMap, OptionId, Question, QuestionId, QuestionType,
    SubmitError,
};
use tracing::{debug, warn};

use crate::validate::validate_all_answers;

/// Identifies one submission attempt.
///
/// Ids are never reused by the same [`AnswerStore`], even across
/// [`AnswerStore::restart`] and [`AnswerStore::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// Answers to a frozen list of questions.
///
/// Errors are only recomputed on every update after the first submit
/// attempt, mirroring the builder's live validation.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    questions: Vec<Question>,
    answers: Answers,
    errors: AnswersErrorMap,
    validated_once: bool,
    pending: Option<SubmissionId>,
    submissions: u64,
}

impl AnswerStore {
    /// Start answering the given questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Default::default()
        }
    }

    /// Start a fresh render pass over new questions.
    ///
    /// Drops answers and any pending submission but keeps the id counter, so
    /// results of earlier passes are never mistaken for new ones.
    pub fn restart(&mut self, questions: Vec<Question>) {
        self.reset();
        self.questions = questions;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn answer(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(id)
    }

    pub fn errors(&self) -> &AnswersErrorMap {
        &self.errors
    }

    pub fn is_validated_once(&self) -> bool {
        self.validated_once
    }

    /// Whether a submission is waiting for the backend.
    pub fn is_saving_form(&self) -> bool {
        self.pending.is_some()
    }

    /// Record the answer to a question.
    ///
    /// For SELECT questions a chosen option id replaces the previous
    /// selection as a single-element list. Other values are stored as given.
    pub fn update_answer(
        &mut self,
        id: &QuestionId,
        question_type: QuestionType,
        value: AnswerValue,
    ) {
        let value = match (question_type, value) {
            (QuestionType::Select, AnswerValue::Text(option)) => {
                AnswerValue::Selection(vec![OptionId::new(option)])
            }
            (_, value) => value,
        };
        debug!(question_id = %id, kind = value.type_name(), "updating answer");
        self.answers.insert(id.clone(), value);

        if self.validated_once {
            self.errors = validate_all_answers(&self.questions, &self.answers);
        }
    }

    /// Validate everything and, if valid, hand out the answers to submit.
    ///
    /// Marks the form as saving until [`finish_submit`](Self::finish_submit)
    /// is called with the returned id. On validation failure nothing is
    /// pending and the errors are returned.
    pub fn begin_submit(&mut self) -> Result<(SubmissionId, Answers), AnswersErrorMap> {
        self.validated_once = true;
        self.errors = validate_all_answers(&self.questions, &self.answers);

        if !self.errors.is_empty() {
            debug!(invalid = self.errors.len(), "form has invalid answers");
            return Err(self.errors.clone());
        }

        self.submissions += 1;
        let submission = SubmissionId(self.submissions);
        self.pending = Some(submission);
        Ok((submission, self.answers.clone()))
    }

    /// Apply the backend's verdict on a submission.
    ///
    /// Returns false, changing nothing, if `submission` is not the one
    /// pending, e.g. because the answers it carried were discarded since.
    pub fn finish_submit(
        &mut self,
        submission: SubmissionId,
        result: &Result<(), SubmitError>,
    ) -> bool {
        if self.pending != Some(submission) {
            debug!(submission = submission.0, "ignoring result of a stale submission");
            return false;
        }

        self.pending = None;
        if let Err(err) = result {
            warn!(error = %err, "failed to submit answers");
        }
        true
    }

    /// Forget all answers and validation state.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.errors = AnswersErrorMap::new();
        self.validated_once = false;
        self.pending = None;
    }
}
