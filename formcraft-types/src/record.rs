//! The persisted shape of a question.
//!
//! Storage holds questions as camelCase records whose `additionalDetails`
//! is a flat bag of optional fields. Decoding checks that only the fields
//! belonging to the record's `type` are present.

use serde::{Deserialize, Serialize};

use crate::{
    NumberDetails, Question, QuestionId, QuestionKind, QuestionType, SelectDetails, SelectOption,
    TextDetails,
};

/// Error raised when a stored record cannot become a [`Question`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuestionRecordError {
    #[error("question '{id}' of type {question_type} carries foreign detail '{field}'")]
    MismatchedDetails {
        id: QuestionId,
        question_type: QuestionType,
        field: &'static str,
    },
}

/// Wire form of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default)]
    pub additional_details: DetailsRecord,
    #[serde(default)]
    pub is_saving: bool,
}

/// Wire form of the type-specific details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paragraph: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl DetailsRecord {
    fn foreign_field(&self, question_type: QuestionType) -> Option<&'static str> {
        let present = [
            ("isParagraph", self.is_paragraph.is_some(), QuestionType::Text),
            ("min", self.min.is_some(), QuestionType::Number),
            ("max", self.max.is_some(), QuestionType::Number),
            ("options", self.options.is_some(), QuestionType::Select),
        ];
        present
            .into_iter()
            .find(|(_, is_set, owner)| *is_set && *owner != question_type)
            .map(|(field, _, _)| field)
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionRecordError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let details = record.additional_details;
        if let Some(field) = details.foreign_field(record.question_type) {
            return Err(QuestionRecordError::MismatchedDetails {
                id: record.id,
                question_type: record.question_type,
                field,
            });
        }

        let kind = match record.question_type {
            QuestionType::Text => QuestionKind::Text(TextDetails {
                is_paragraph: details.is_paragraph.unwrap_or_default(),
            }),
            QuestionType::Number => {
                QuestionKind::Number(NumberDetails::with_bounds(details.min, details.max))
            }
            QuestionType::Select => {
                QuestionKind::Select(SelectDetails::new(details.options.unwrap_or_default()))
            }
        };

        Ok(Question::from_parts(
            record.id,
            record.title,
            kind,
            record.is_mandatory,
            record.help_text,
            record.is_saving,
        ))
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let question_type = question.question_type();
        let additional_details = match question.kind().clone() {
            QuestionKind::Text(details) => DetailsRecord {
                is_paragraph: Some(details.is_paragraph),
                ..Default::default()
            },
            QuestionKind::Number(details) => DetailsRecord {
                min: details.min,
                max: details.max,
                ..Default::default()
            },
            QuestionKind::Select(details) => DetailsRecord {
                options: Some(details.options),
                ..Default::default()
            },
        };

        Self {
            id: question.id().clone(),
            title: question.title().to_string(),
            question_type,
            is_mandatory: question.is_mandatory(),
            help_text: question.help_text().map(String::from),
            additional_details,
            is_saving: question.is_saving(),
        }
    }
}
