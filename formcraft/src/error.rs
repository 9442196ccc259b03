use formcraft_types::{OptionId, QuestionId, QuestionType, StorageError};

use crate::Screen;

/// Error type for edits to the question list.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BuilderError {
    #[error("No question with id '{0}'")]
    UnknownQuestion(QuestionId),

    #[error("Question '{question}' has no option with id '{option}'")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },

    /// The edit targets a detail that questions of this type do not have.
    #[error("Field '{field}' does not apply to {question_type} questions")]
    FieldNotApplicable {
        field: &'static str,
        question_type: QuestionType,
    },
}

/// Error type for screen transitions.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScreenError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: Screen, action: &'static str },
}

/// Error type for [`FormSession`](crate::FormSession) operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A submission is still waiting for the backend.
    #[error("Form submission already in progress")]
    SubmissionInFlight,
}
