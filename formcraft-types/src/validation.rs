use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::OptionId;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const MIN_GREATER_THAN_MAX: &str = "Min must be less than max";
pub const TOO_FEW_OPTIONS: &str = "At least two options are required for SELECT type";
pub const OPTION_LABEL_REQUIRED: &str = "Option label is required";

/// Everything wrong with a single question definition.
///
/// Only constructed for invalid questions; a valid question has no error
/// value at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details_error: Option<AdditionalDetailsError>,
}

impl QuestionError {
    /// True when no rule triggered.
    pub fn is_empty(&self) -> bool {
        self.title_error.is_none()
            && self
                .additional_details_error
                .as_ref()
                .is_none_or(AdditionalDetailsError::is_empty)
    }

    /// Details error, created on first use.
    pub fn details_mut(&mut self) -> &mut AdditionalDetailsError {
        self.additional_details_error.get_or_insert_with(Default::default)
    }

    /// The min/max error, if any.
    pub fn min_error(&self) -> Option<&str> {
        self.additional_details_error.as_ref()?.min_error.as_deref()
    }

    /// The option count error, if any.
    pub fn options_error(&self) -> Option<&str> {
        self.additional_details_error.as_ref()?.options_error.as_deref()
    }

    /// The error for a single option, if any.
    pub fn option_error(&self, id: &OptionId) -> Option<&str> {
        self.additional_details_error
            .as_ref()?
            .options_error_map
            .get(id)
            .map(String::as_str)
    }
}

/// Errors in the type-specific part of a question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDetailsError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options_error: Option<String>,

    /// Per-option label errors, keyed by option id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options_error_map: BTreeMap<OptionId, String>,
}

impl AdditionalDetailsError {
    pub fn is_empty(&self) -> bool {
        self.min_error.is_none() && self.options_error.is_none() && self.options_error_map.is_empty()
    }
}

/// Why an answer is not acceptable.
///
/// The display strings are the messages shown next to the answer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("Answer is required")]
    Required,

    #[error("Answer must be a string")]
    NotText,

    #[error("Answer must be a number")]
    NotNumber,

    #[error("Answer must be a valid number")]
    InvalidNumber,

    #[error("Answer must be greater than or equal to min")]
    BelowMin,

    #[error("Answer must be less than or equal to max")]
    AboveMax,

    #[error("Answer must be an array")]
    NotSelection,

    #[error("Please select at least one option")]
    NothingSelected,
}

impl Serialize for AnswerError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
