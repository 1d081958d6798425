use std::collections::BTreeSet;

use serde::Serialize;

use super::bands::{BandTable, BandTableError};

pub type QuestionId = u8;

/// Identifies which instrument a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionnaireKind {
    TraitInventory,
    Reactions,
}

impl QuestionnaireKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TraitInventory => "trait inventory",
            Self::Reactions => "inner reactions",
        }
    }

    pub const fn ordered() -> [Self; 2] {
        [Self::TraitInventory, Self::Reactions]
    }
}

/// Inclusive integer range a single answer may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueDomain {
    pub min: u8,
    pub max: u8,
}

impl ValueDomain {
    pub const fn contains(self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }

    pub fn clamp(self, value: i64) -> u8 {
        value.clamp(i64::from(self.min), i64::from(self.max)) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub label: &'static str,
}

/// Named subset of questions contributing to a sub-score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    /// Wire name of the client-side subtotal (`factor1`, `factor2`).
    pub key: &'static str,
    pub short_name: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub subtitle: Option<&'static str>,
    pub items: Vec<QuestionId>,
}

/// Fixed copy used when rendering reports for an instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    pub title: &'static str,
    pub score_caption: &'static str,
    /// Shown next to the contact heading, e.g. `(Optional)`.
    pub contact_subtitle: Option<&'static str>,
    pub disclaimer: &'static str,
}

/// Everything the engine needs to validate, score, classify, and render one
/// instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireDefinition {
    kind: QuestionnaireKind,
    questions: Vec<Question>,
    factors: Vec<Factor>,
    domain: ValueDomain,
    bands: BandTable,
    copy: ReportCopy,
}

impl QuestionnaireDefinition {
    pub fn new(
        kind: QuestionnaireKind,
        questions: Vec<Question>,
        factors: Vec<Factor>,
        domain: ValueDomain,
        bands: BandTable,
        copy: ReportCopy,
    ) -> Result<Self, DefinitionError> {
        let definition = Self {
            kind,
            questions,
            factors,
            domain,
            bands,
            copy,
        };
        definition.validate()?;
        Ok(definition)
    }

    pub fn kind(&self) -> QuestionnaireKind {
        self.kind
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(|question| question.id)
    }

    pub fn label(&self, id: QuestionId) -> Option<&'static str> {
        self.questions
            .iter()
            .find(|question| question.id == id)
            .map(|question| question.label)
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn has_factors(&self) -> bool {
        !self.factors.is_empty()
    }

    pub fn domain(&self) -> ValueDomain {
        self.domain
    }

    pub fn bands(&self) -> &BandTable {
        &self.bands
    }

    pub fn copy(&self) -> &ReportCopy {
        &self.copy
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * u32::from(self.domain.max)
    }

    pub fn factor_max(&self, factor: &Factor) -> u32 {
        factor.items.len() as u32 * u32::from(self.domain.max)
    }

    /// Checks the structural invariants: IDs run `1..=N`, factors partition
    /// the IDs exactly, and the band table covers `[0, max_score]`.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.questions.is_empty() {
            return Err(DefinitionError::NoQuestions);
        }
        for (index, question) in self.questions.iter().enumerate() {
            let expected = index + 1;
            if usize::from(question.id) != expected {
                return Err(DefinitionError::QuestionOrder {
                    expected,
                    found: question.id,
                });
            }
        }

        if self.domain.min > self.domain.max {
            return Err(DefinitionError::EmptyDomain);
        }

        if !self.factors.is_empty() {
            let mut seen = BTreeSet::new();
            for factor in &self.factors {
                for &id in &factor.items {
                    if self.label(id).is_none() {
                        return Err(DefinitionError::UnknownFactorItem {
                            factor: factor.key,
                            id,
                        });
                    }
                    if !seen.insert(id) {
                        return Err(DefinitionError::OverlappingFactors { id });
                    }
                }
            }
            let uncovered: Vec<QuestionId> = self
                .question_ids()
                .filter(|id| !seen.contains(id))
                .collect();
            if !uncovered.is_empty() {
                return Err(DefinitionError::IncompletePartition { uncovered });
            }
        }

        for total in 0..=self.max_score() {
            self.bands
                .classify(total)
                .map_err(|_| DefinitionError::BandCoverage { total })?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("questionnaire declares no questions")]
    NoQuestions,
    #[error("question ids must run 1..=N; position {expected} holds {found}")]
    QuestionOrder { expected: usize, found: QuestionId },
    #[error("answer domain is empty")]
    EmptyDomain,
    #[error("factor '{factor}' references unknown question {id}")]
    UnknownFactorItem { factor: &'static str, id: QuestionId },
    #[error("question {id} belongs to more than one factor")]
    OverlappingFactors { id: QuestionId },
    #[error("questions {uncovered:?} belong to no factor")]
    IncompletePartition { uncovered: Vec<QuestionId> },
    #[error("score {total} is not covered by exactly one band")]
    BandCoverage { total: u32 },
    #[error(transparent)]
    Bands(#[from] BandTableError),
}
