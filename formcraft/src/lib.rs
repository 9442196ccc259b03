//! # formcraft
//!
//! Build a form from typed questions, then fill and submit it.
//!
//! A form goes through two screens. On the builder screen questions are
//! added, edited and removed; every valid edit is persisted in the
//! background. Once every question validates, the renderer screen collects
//! answers and submits them to a backend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formcraft::{FormSession, MemoryStorage, QuestionField, QuestionType, RecordingBackend, UuidSource};
//!
//! let mut session = FormSession::open(MemoryStorage::new(), RecordingBackend::new(), UuidSource).await?;
//!
//! let age = session.add_question(QuestionType::Number)?;
//! session.update_field(&age, QuestionField::Title("How old are you?".into()))?;
//! session.update_field(&age, QuestionField::Max(150.0))?;
//!
//! if session.build()?.is_ok() {
//!     session.update_answer(&age, 42.0)?;
//!     session.submit_form()?;
//! }
//! session.settle().await;
//! ```
//!
//! ## Question types
//!
//! - `TEXT` - single line or paragraph text
//! - `NUMBER` - a number with optional inclusive bounds
//! - `SELECT` - one choice among at least two labelled options
//!
//! ## Collaborators
//!
//! Persistence and submission sit behind `QuestionStorage` and
//! `SubmissionBackend`:
//! - `JsonFileStorage` - the question list in a JSON file
//! - `Simulated` - random latency and failure around any collaborator
//! - `MemoryStorage` / `RecordingBackend` - in-memory doubles for tests

// Re-export all types from formcraft-types
pub use formcraft_types::*;

pub mod validate;

mod error;
pub use error::{BuilderError, ScreenError, SessionError};

mod screen;
pub use screen::{Screen, ScreenController};

mod builder;
pub use builder::{Persist, QuestionField, QuestionStore};

mod renderer;
pub use renderer::{AnswerStore, SubmissionId};

mod session;
pub use session::{FormSession, Notice};

mod config;
pub use config::{ConfigError, FormConfig, SimulationConfig};

mod ids;
pub use ids::{SequentialIds, UuidSource};

mod storage;
pub use storage::JsonFileStorage;

mod simulated;
pub use simulated::Simulated;

// In-memory collaborators for testing forms without files or latency
mod memory;
pub use memory::{MemoryStorage, RecordingBackend};
