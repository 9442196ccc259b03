use std::collections::HashMap;

use serde::Serialize;

use crate::{AnswerError, QuestionError, QuestionId};

/// Validation errors keyed by question id.
///
/// Only questions that failed validation have an entry, so presence of a key
/// is the error signal and an empty map means everything is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap<E> {
    errors: HashMap<QuestionId, E>,
}

/// Build-time errors, one [`QuestionError`] per invalid question.
pub type QuestionsErrorMap = ErrorMap<QuestionError>;

/// Fill-time errors, one [`AnswerError`] per unacceptable answer.
pub type AnswersErrorMap = ErrorMap<AnswerError>;

impl<E> ErrorMap<E> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }

    /// Record an error for a question, replacing any previous one.
    pub fn insert(&mut self, id: impl Into<QuestionId>, error: E) {
        self.errors.insert(id.into(), error);
    }

    /// Get the error for a question.
    pub fn get(&self, id: &QuestionId) -> Option<&E> {
        self.errors.get(id)
    }

    /// Check if a question has an error.
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.errors.contains_key(id)
    }

    /// Get an iterator over all id-error pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &E)> {
        self.errors.iter()
    }

    /// Get the number of questions with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<E> Default for ErrorMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects per-question validation results, keeping only actual errors.
impl<E> FromIterator<(QuestionId, Option<E>)> for ErrorMap<E> {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Option<E>)>>(iter: T) -> Self {
        Self {
            errors: iter
                .into_iter()
                .filter_map(|(id, error)| error.map(|error| (id, error)))
                .collect(),
        }
    }
}

impl<E> IntoIterator for ErrorMap<E> {
    type Item = (QuestionId, E);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a ErrorMap<E> {
    type Item = (&'a QuestionId, &'a E);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
