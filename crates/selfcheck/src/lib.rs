//! Scoring engine and notification relay for the self-assessment quizzes.
//!
//! Both instruments share one engine parameterized by a
//! [`questionnaire::QuestionnaireDefinition`]; the HTTP surface lives in
//! [`submission`] and the outbound sink in [`notify`].

pub mod config;
pub mod error;
pub mod notify;
pub mod questionnaire;
pub mod report;
pub mod submission;
pub mod telemetry;
