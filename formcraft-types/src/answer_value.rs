use serde::{Deserialize, Serialize};

use crate::OptionId;

/// A single answer value collected while filling a form.
///
/// The expected shape depends on the question type: text for TEXT, a number
/// for NUMBER and a list of option ids for SELECT. The value itself does not
/// know which question it belongs to, so a mismatched shape is representable
/// and reported by answer validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A string value (TEXT questions).
    Text(String),

    /// A numeric value (NUMBER questions).
    Number(f64),

    /// Selected option ids (SELECT questions).
    Selection(Vec<OptionId>),
}

impl AnswerValue {
    /// Try to get this value as a string reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as selected option ids.
    pub fn as_selection(&self) -> Option<&[OptionId]> {
        match self {
            Self::Selection(ids) => Some(ids),
            _ => None,
        }
    }

    /// Get the type name of this value for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Number(_) => "Number",
            Self::Selection(_) => "Selection",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<OptionId>> for AnswerValue {
    fn from(ids: Vec<OptionId>) -> Self {
        Self::Selection(ids)
    }
}
