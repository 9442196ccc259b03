//! Pure validation of question definitions and answers.
//!
//! Both validators are side-effect free: validating the same input twice
//! yields the same result, and aggregation only keeps questions that failed.

mod answer;
mod question;

pub use answer::{validate_all_answers, validate_answer};
pub use question::{validate_all_questions, validate_question};
