use formcraft_types::{
    AnswerError, AnswerValue, Answers, AnswersErrorMap, NumberDetails, Question, QuestionKind,
};

/// Validate the current answer to a question.
///
/// Rules are evaluated in order and the first failing one is reported. A
/// missing answer or an empty string is always "required", regardless of
/// the question type. The mandatory flag is not consulted.
pub fn validate_answer(question: &Question, answer: Option<&AnswerValue>) -> Result<(), AnswerError> {
    let answer = match answer {
        None => return Err(AnswerError::Required),
        Some(AnswerValue::Text(text)) if text.is_empty() => return Err(AnswerError::Required),
        Some(answer) => answer,
    };

    match question.kind() {
        QuestionKind::Text(_) => match answer {
            AnswerValue::Text(text) if text.trim().is_empty() => Err(AnswerError::Required),
            AnswerValue::Text(_) => Ok(()),
            _ => Err(AnswerError::NotText),
        },
        QuestionKind::Number(details) => match answer {
            AnswerValue::Number(value) => check_number(*value, details),
            _ => Err(AnswerError::NotNumber),
        },
        QuestionKind::Select(_) => match answer {
            AnswerValue::Selection(ids) if ids.is_empty() => Err(AnswerError::NothingSelected),
            AnswerValue::Selection(_) => Ok(()),
            _ => Err(AnswerError::NotSelection),
        },
    }
}

// Bounds are inclusive; a bound of 0 is a real bound.
fn check_number(value: f64, details: &NumberDetails) -> Result<(), AnswerError> {
    if value.is_nan() {
        return Err(AnswerError::InvalidNumber);
    }
    if let Some(min) = details.min
        && value < min
    {
        return Err(AnswerError::BelowMin);
    }
    if let Some(max) = details.max
        && value > max
    {
        return Err(AnswerError::AboveMax);
    }
    Ok(())
}

/// Validate the answers to every question, keeping only the failures.
pub fn validate_all_answers(questions: &[Question], answers: &Answers) -> AnswersErrorMap {
    questions
        .iter()
        .map(|question| {
            let result = validate_answer(question, answers.get(question.id()));
            (question.id().clone(), result.err())
        })
        .collect()
}
