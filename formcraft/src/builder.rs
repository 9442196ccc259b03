//! Build-time question state.
//!
//! [`QuestionStore`] owns the ordered question list and its error map. Every
//! edit is applied locally right away and hands back the [`Persist`] command
//! the caller should run against storage. Completions come back through
//! [`QuestionStore::complete_save`] and [`QuestionStore::complete_remove`],
//! which look questions up by id, so edits made while a call was in flight
//! are never clobbered.

use std::collections::HashMap;

use formcraft_types::{
    IdSource, OptionId, Question, QuestionId, QuestionType, QuestionsErrorMap, SelectOption,
    StorageError,
};
use tracing::{debug, warn};

use crate::BuilderError;
use crate::validate::{validate_all_questions, validate_question};

/// A single-field edit of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionField {
    Title(String),
    IsMandatory(bool),
    HelpText(String),
    /// TEXT only.
    IsParagraph(bool),
    /// NUMBER only.
    Min(f64),
    /// NUMBER only.
    Max(f64),
}

impl QuestionField {
    fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::IsMandatory(_) => "isMandatory",
            Self::HelpText(_) => "helpText",
            Self::IsParagraph(_) => "isParagraph",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
        }
    }
}

/// Storage work produced by a local edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Persist {
    /// Upsert this snapshot of the question.
    Save(Question),
    /// Delete the question with this id.
    Remove(QuestionId),
}

/// A removal that has been applied locally but not yet confirmed.
#[derive(Debug, Clone)]
struct PendingRemoval {
    index: usize,
    question: Question,
}

/// The ordered list of question definitions being built.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    errors: QuestionsErrorMap,
    validated_once: bool,
    saves_in_flight: HashMap<QuestionId, usize>,
    pending_removals: HashMap<QuestionId, PendingRemoval>,
}

impl QuestionStore {
    /// Create a store over previously persisted questions.
    ///
    /// Saving flags are cleared; nothing is in flight yet.
    pub fn new(questions: Vec<Question>) -> Self {
        let questions = questions
            .into_iter()
            .map(|mut question| {
                question.set_saving(false);
                question
            })
            .collect();
        Self {
            questions,
            ..Default::default()
        }
    }

    /// Create a store holding the single default TEXT question.
    pub fn with_default(ids: &impl IdSource) -> Self {
        Self::new(vec![default_question(ids)])
    }

    // === Accessors ===

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    /// The error map as of the last recomputation.
    ///
    /// Stays empty until the builder has been validated once, then tracks
    /// every edit.
    pub fn errors(&self) -> &QuestionsErrorMap {
        &self.errors
    }

    pub fn is_validated_once(&self) -> bool {
        self.validated_once
    }

    /// Whether any save or removal is still waiting for storage.
    pub fn has_pending_work(&self) -> bool {
        !self.saves_in_flight.is_empty() || !self.pending_removals.is_empty()
    }

    // === Edits ===

    /// Append a new question of the given type with its default details.
    pub fn add_question(
        &mut self,
        question_type: QuestionType,
        ids: &impl IdSource,
    ) -> (QuestionId, Option<Persist>) {
        let question = Question::new(ids.new_id(), question_type);
        let id = question.id().clone();
        debug!(question_id = %id, %question_type, "adding question");

        self.questions.push(question);
        let persist = self.after_edit(&id);
        (id, persist)
    }

    /// Remove a question right away and ask storage to delete it.
    ///
    /// If storage later reports failure the question is put back.
    pub fn remove_question(&mut self, id: &QuestionId) -> Result<Persist, BuilderError> {
        let index = self.index_of(id)?;
        let question = self.questions.remove(index);
        debug!(question_id = %id, index, "removing question");

        self.pending_removals
            .insert(id.clone(), PendingRemoval { index, question });
        self.refresh_errors();
        Ok(Persist::Remove(id.clone()))
    }

    /// Replace one field of a question, leaving the rest untouched.
    pub fn update_field(
        &mut self,
        id: &QuestionId,
        field: QuestionField,
    ) -> Result<Option<Persist>, BuilderError> {
        let question = self.question_mut(id)?;
        let question_type = question.question_type();
        let not_applicable = BuilderError::FieldNotApplicable {
            field: field.name(),
            question_type,
        };

        match field {
            QuestionField::Title(title) => question.set_title(title),
            QuestionField::IsMandatory(is_mandatory) => question.set_mandatory(is_mandatory),
            QuestionField::HelpText(help_text) => question.set_help_text(help_text),
            QuestionField::IsParagraph(is_paragraph) => {
                question.text_details_mut().ok_or(not_applicable)?.is_paragraph = is_paragraph;
            }
            QuestionField::Min(min) => {
                question.number_details_mut().ok_or(not_applicable)?.min = Some(min);
            }
            QuestionField::Max(max) => {
                question.number_details_mut().ok_or(not_applicable)?.max = Some(max);
            }
        }

        Ok(self.after_edit(id))
    }

    /// Append an option to a SELECT question.
    pub fn add_option(
        &mut self,
        id: &QuestionId,
        option: SelectOption,
    ) -> Result<Option<Persist>, BuilderError> {
        let question = self.question_mut(id)?;
        let question_type = question.question_type();
        question
            .select_details_mut()
            .ok_or(BuilderError::FieldNotApplicable {
                field: "options",
                question_type,
            })?
            .options
            .push(option);

        Ok(self.after_edit(id))
    }

    /// Relabel an option of a SELECT question.
    pub fn update_option(
        &mut self,
        id: &QuestionId,
        option_id: &OptionId,
        label: impl Into<String>,
    ) -> Result<Option<Persist>, BuilderError> {
        let option = self.option_mut(id, option_id)?;
        option.label = label.into();

        Ok(self.after_edit(id))
    }

    /// Remove an option from a SELECT question.
    pub fn remove_option(
        &mut self,
        id: &QuestionId,
        option_id: &OptionId,
    ) -> Result<Option<Persist>, BuilderError> {
        // Resolve first so a missing option reports the right error.
        self.option_mut(id, option_id)?;
        if let Some(details) = self.question_mut(id)?.select_details_mut() {
            details.remove(option_id);
        }

        Ok(self.after_edit(id))
    }

    /// Start over with the single default TEXT question.
    ///
    /// Clears errors and the validated-once latch. Returns deletions for
    /// every previous question followed by the save of the new one. Failed
    /// deletions from a reset are not rolled back.
    pub fn reset(&mut self, ids: &impl IdSource) -> Vec<Persist> {
        let previous = std::mem::take(&mut self.questions);
        self.pending_removals.clear();
        self.errors = QuestionsErrorMap::new();
        self.validated_once = false;

        let mut persist: Vec<Persist> = previous
            .into_iter()
            .map(|question| Persist::Remove(question.id().clone()))
            .collect();

        let question = default_question(ids);
        let id = question.id().clone();
        debug!(question_id = %id, removed = persist.len(), "resetting builder");
        self.questions.push(question);
        persist.extend(self.auto_save(&id));
        persist
    }

    /// Validate every question and latch live validation on.
    ///
    /// On success the error map is empty; otherwise the computed errors are
    /// stored and returned.
    pub fn validate_builder(&mut self) -> Result<(), QuestionsErrorMap> {
        self.validated_once = true;
        self.errors = validate_all_questions(&self.questions);
        if self.errors.is_empty() {
            Ok(())
        } else {
            debug!(invalid = self.errors.len(), "builder validation failed");
            Err(self.errors.clone())
        }
    }

    // === Completions ===

    /// Apply the outcome of a save issued for `id`.
    ///
    /// The edit itself is never rolled back; the saving flag drops once the
    /// last outstanding save for the question has completed.
    pub fn complete_save(&mut self, id: &QuestionId, result: &Result<(), StorageError>) {
        let remaining = match self.saves_in_flight.get_mut(id) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            self.saves_in_flight.remove(id);
        }

        if let Err(err) = result {
            warn!(question_id = %id, error = %err, "failed to save question");
        }

        let is_saving = remaining > 0;
        if let Some(question) = self.questions.iter_mut().find(|q| q.id() == id) {
            question.set_saving(is_saving);
        } else if let Some(pending) = self.pending_removals.get_mut(id) {
            pending.question.set_saving(is_saving);
        }
    }

    /// Apply the outcome of a removal issued for `id`.
    ///
    /// On failure the removed question is re-inserted at its former position
    /// (clamped to the current length) unless a question with that id is
    /// already back. Returns true if the question was restored.
    pub fn complete_remove(&mut self, id: &QuestionId, result: &Result<(), StorageError>) -> bool {
        let pending = self.pending_removals.remove(id);
        let Err(err) = result else {
            return false;
        };

        warn!(question_id = %id, error = %err, "failed to remove question");
        let Some(PendingRemoval { index, question }) = pending else {
            return false;
        };
        if self.index_of(id).is_ok() {
            return false;
        }

        let index = index.min(self.questions.len());
        self.questions.insert(index, question);
        self.refresh_errors();
        true
    }

    // === Internals ===

    fn index_of(&self, id: &QuestionId) -> Result<usize, BuilderError> {
        self.questions
            .iter()
            .position(|question| question.id() == id)
            .ok_or_else(|| BuilderError::UnknownQuestion(id.clone()))
    }

    fn question_mut(&mut self, id: &QuestionId) -> Result<&mut Question, BuilderError> {
        self.questions
            .iter_mut()
            .find(|question| question.id() == id)
            .ok_or_else(|| BuilderError::UnknownQuestion(id.clone()))
    }

    fn option_mut(
        &mut self,
        id: &QuestionId,
        option_id: &OptionId,
    ) -> Result<&mut SelectOption, BuilderError> {
        let question = self.question_mut(id)?;
        let question_type = question.question_type();
        question
            .select_details_mut()
            .ok_or(BuilderError::FieldNotApplicable {
                field: "options",
                question_type,
            })?
            .option_mut(option_id)
            .ok_or_else(|| BuilderError::UnknownOption {
                question: id.clone(),
                option: option_id.clone(),
            })
    }

    fn after_edit(&mut self, id: &QuestionId) -> Option<Persist> {
        self.refresh_errors();
        self.auto_save(id)
    }

    fn refresh_errors(&mut self) {
        if self.validated_once {
            self.errors = validate_all_questions(&self.questions);
        }
    }

    /// Mark the question as saving and snapshot it, unless it is invalid.
    fn auto_save(&mut self, id: &QuestionId) -> Option<Persist> {
        let question = self.questions.iter_mut().find(|q| q.id() == id)?;
        if validate_question(question).is_some() {
            debug!(question_id = %id, "skipping auto-save of invalid question");
            return None;
        }

        let snapshot = question.clone();
        question.set_saving(true);
        *self.saves_in_flight.entry(id.clone()).or_default() += 1;
        Some(Persist::Save(snapshot))
    }
}

fn default_question(ids: &impl IdSource) -> Question {
    Question::new(ids.new_id(), QuestionType::Text)
}
