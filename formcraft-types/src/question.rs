use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OptionId, QuestionId, QuestionRecord};

/// Title given to freshly added questions.
pub const DEFAULT_TITLE: &str = "New Question";

/// The type of a question, fixed at creation.
///
/// Determines which details a question carries and which answer rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    /// Free text answer.
    Text,
    /// Numeric answer, optionally bounded.
    Number,
    /// Choice among a list of options.
    Select,
}

impl QuestionType {
    /// The wire name of this type (`"TEXT"`, `"NUMBER"`, `"SELECT"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Select => "SELECT",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single choice of a SELECT question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: OptionId,
    pub label: String,
}

impl SelectOption {
    /// Create a new option.
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Details of a TEXT question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextDetails {
    /// Render the answer input as a multi-line paragraph.
    pub is_paragraph: bool,
}

/// Details of a NUMBER question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberDetails {
    /// Optional inclusive lower bound for answers.
    pub min: Option<f64>,

    /// Optional inclusive upper bound for answers.
    pub max: Option<f64>,
}

impl NumberDetails {
    /// Create with bounds.
    pub fn with_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Details of a SELECT question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectDetails {
    /// Options in display order.
    pub options: Vec<SelectOption>,
}

impl SelectDetails {
    /// Create with the given options.
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }

    /// Get a mutable reference to an option by id.
    pub fn option_mut(&mut self, id: &OptionId) -> Option<&mut SelectOption> {
        self.options.iter_mut().find(|option| &option.id == id)
    }

    /// Remove an option by id, returning it if it existed.
    pub fn remove(&mut self, id: &OptionId) -> Option<SelectOption> {
        let index = self.options.iter().position(|option| &option.id == id)?;
        Some(self.options.remove(index))
    }
}

/// The type-specific part of a question.
///
/// Exactly one shape exists per question and it always matches the
/// question's type.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Text(TextDetails),
    Number(NumberDetails),
    Select(SelectDetails),
}

impl QuestionKind {
    /// The details a newly added question of the given type starts with.
    ///
    /// TEXT is a single line, NUMBER is bounded to `0..=100` and SELECT has
    /// no options yet.
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Text => Self::Text(TextDetails::default()),
            QuestionType::Number => {
                Self::Number(NumberDetails::with_bounds(Some(0.0), Some(100.0)))
            }
            QuestionType::Select => Self::Select(SelectDetails::default()),
        }
    }

    /// The type tag of this kind.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text(_) => QuestionType::Text,
            Self::Number(_) => QuestionType::Number,
            Self::Select(_) => QuestionType::Select,
        }
    }
}

/// A build-time question definition.
///
/// The id and type are fixed for the lifetime of the question. Field edits
/// go through the setters and the typed `*_details_mut` accessors, which
/// cannot swap the details for another type's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    title: String,
    kind: QuestionKind,
    is_mandatory: bool,
    help_text: Option<String>,
    is_saving: bool,
}

impl Question {
    /// Create a question of the given type with its default details.
    pub fn new(id: impl Into<QuestionId>, question_type: QuestionType) -> Self {
        Self::with_kind(id, QuestionKind::default_for(question_type))
    }

    /// Create a question with explicit details.
    pub fn with_kind(id: impl Into<QuestionId>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            kind,
            is_mandatory: false,
            help_text: None,
            is_saving: false,
        }
    }

    /// Builder-style title setter.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder-style help text setter.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Builder-style mandatory flag setter.
    pub fn mandatory(mut self, is_mandatory: bool) -> Self {
        self.is_mandatory = is_mandatory;
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_mandatory(&self) -> bool {
        self.is_mandatory
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// Whether a save of this question is in flight.
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_mandatory(&mut self, is_mandatory: bool) {
        self.is_mandatory = is_mandatory;
    }

    pub fn set_help_text(&mut self, help_text: impl Into<String>) {
        self.help_text = Some(help_text.into());
    }

    pub fn set_saving(&mut self, is_saving: bool) {
        self.is_saving = is_saving;
    }

    /// TEXT details, if this is a TEXT question.
    pub fn text_details_mut(&mut self) -> Option<&mut TextDetails> {
        match &mut self.kind {
            QuestionKind::Text(details) => Some(details),
            _ => None,
        }
    }

    /// NUMBER details, if this is a NUMBER question.
    pub fn number_details_mut(&mut self) -> Option<&mut NumberDetails> {
        match &mut self.kind {
            QuestionKind::Number(details) => Some(details),
            _ => None,
        }
    }

    /// SELECT details, if this is a SELECT question.
    pub fn select_details_mut(&mut self) -> Option<&mut SelectDetails> {
        match &mut self.kind {
            QuestionKind::Select(details) => Some(details),
            _ => None,
        }
    }

    /// Options of a SELECT question; empty for other types.
    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            QuestionKind::Select(details) => &details.options,
            _ => &[],
        }
    }

    pub(crate) fn from_parts(
        id: QuestionId,
        title: String,
        kind: QuestionKind,
        is_mandatory: bool,
        help_text: Option<String>,
        is_saving: bool,
    ) -> Self {
        Self {
            id,
            title,
            kind,
            is_mandatory,
            help_text,
            is_saving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_defaults() {
        assert_eq!(
            QuestionKind::default_for(QuestionType::Text),
            QuestionKind::Text(TextDetails {
                is_paragraph: false
            })
        );
        assert_eq!(
            QuestionKind::default_for(QuestionType::Number),
            QuestionKind::Number(NumberDetails::with_bounds(Some(0.0), Some(100.0)))
        );
        assert_eq!(
            QuestionKind::default_for(QuestionType::Select),
            QuestionKind::Select(SelectDetails::default())
        );
    }

    #[test]
    fn new_question_defaults() {
        let question = Question::new("q1", QuestionType::Select);
        assert_eq!(question.title(), DEFAULT_TITLE);
        assert_eq!(question.question_type(), QuestionType::Select);
        assert!(!question.is_mandatory());
        assert!(!question.is_saving());
        assert!(question.options().is_empty());
    }

    #[test]
    fn typed_accessors_only_match_own_type() {
        let mut question = Question::new("q1", QuestionType::Text);
        assert!(question.text_details_mut().is_some());
        assert!(question.number_details_mut().is_none());
        assert!(question.select_details_mut().is_none());
    }

    #[test]
    fn select_details_remove() {
        let mut details = SelectDetails::new(vec![
            SelectOption::new("a", "A"),
            SelectOption::new("b", "B"),
        ]);
        let removed = details.remove(&OptionId::new("a")).unwrap();
        assert_eq!(removed.label, "A");
        assert_eq!(details.options.len(), 1);
        assert!(details.remove(&OptionId::new("missing")).is_none());
    }
}
