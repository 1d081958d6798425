//! Questionnaire definitions and the shared validate → aggregate → classify
//! pipeline.

pub mod answers;
pub mod bands;
pub mod catalog;
pub mod definition;
pub mod scoring;

pub use answers::{normalize, validate, AnswerSet, RawAnswer, RawAnswers, ValidationFailure};
pub use bands::{Band, BandTable, BandTableError, ClassificationError};
pub use catalog::{definition_for, reactions_inventory, trait_inventory};
pub use definition::{
    DefinitionError, Factor, Question, QuestionId, QuestionnaireDefinition, QuestionnaireKind,
    ReportCopy, ValueDomain,
};
pub use scoring::{percentage, Aggregate, FactorScore, ScoreResult, ScoringEngine};
