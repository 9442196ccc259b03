use formcraft_types::{
    MIN_GREATER_THAN_MAX, OPTION_LABEL_REQUIRED, Question, QuestionError, QuestionKind,
    QuestionsErrorMap, TITLE_REQUIRED, TOO_FEW_OPTIONS,
};

/// Validate a single question definition.
///
/// Every rule is checked independently and all failures accumulate into one
/// [`QuestionError`]. Returns `None` when the question is valid.
pub fn validate_question(question: &Question) -> Option<QuestionError> {
    let mut error = QuestionError::default();

    if question.title().trim().is_empty() {
        error.title_error = Some(TITLE_REQUIRED.to_string());
    }

    match question.kind() {
        QuestionKind::Text(_) => {}
        QuestionKind::Number(details) => {
            // An absent bound never conflicts.
            if let (Some(min), Some(max)) = (details.min, details.max)
                && min > max
            {
                error.details_mut().min_error = Some(MIN_GREATER_THAN_MAX.to_string());
            }
        }
        QuestionKind::Select(details) => {
            if details.options.len() < 2 {
                error.details_mut().options_error = Some(TOO_FEW_OPTIONS.to_string());
            }
            for option in &details.options {
                if option.label.trim().is_empty() {
                    error
                        .details_mut()
                        .options_error_map
                        .insert(option.id.clone(), OPTION_LABEL_REQUIRED.to_string());
                }
            }
        }
    }

    (!error.is_empty()).then_some(error)
}

/// Validate every question, keeping only the ones that failed.
pub fn validate_all_questions(questions: &[Question]) -> QuestionsErrorMap {
    questions
        .iter()
        .map(|question| (question.id().clone(), validate_question(question)))
        .collect()
}
