//! Core types for the formcraft crate.
//!
//! This crate provides the foundational types for building and filling forms:
//! - `Question` and `QuestionKind` - Build-time question definitions
//! - `QuestionRecord` - The persisted shape of a question
//! - `Answers` and `AnswerValue` - Values collected while filling a form
//! - `QuestionError`, `AnswerError` and `ErrorMap` - Validation results
//! - `QuestionStorage`, `SubmissionBackend` and `IdSource` - External collaborators

mod id;
pub use id::{OptionId, QuestionId};

mod question;
pub use question::{
    DEFAULT_TITLE, NumberDetails, Question, QuestionKind, QuestionType, SelectDetails,
    SelectOption, TextDetails,
};

mod record;
pub use record::{DetailsRecord, QuestionRecord, QuestionRecordError};

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::Answers;

mod validation;
pub use validation::{
    AdditionalDetailsError, AnswerError, MIN_GREATER_THAN_MAX, OPTION_LABEL_REQUIRED,
    QuestionError, TITLE_REQUIRED, TOO_FEW_OPTIONS,
};

mod error_map;
pub use error_map::{AnswersErrorMap, ErrorMap, QuestionsErrorMap};

mod error;
pub use error::{StorageError, SubmitError};

mod traits;
pub use traits::{IdSource, QuestionStorage, SubmissionBackend};
