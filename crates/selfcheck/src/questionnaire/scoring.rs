use std::sync::Arc;

use serde::Serialize;

use super::answers::AnswerSet;
use super::bands::{Band, ClassificationError};
use super::definition::QuestionnaireDefinition;

/// Subtotal of one factor, with its maximum for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorScore {
    pub key: &'static str,
    pub short_name: &'static str,
    pub title: &'static str,
    pub score: u32,
    pub max: u32,
}

/// Raw sums before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub total: u32,
    pub max_score: u32,
    pub percentage: u32,
    /// Empty when the definition declares no factors.
    pub factors: Vec<FactorScore>,
}

/// Authoritative, server-computed outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total: u32,
    pub max_score: u32,
    pub percentage: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<FactorScore>,
    pub band: Band,
}

impl ScoreResult {
    pub fn factor(&self, key: &str) -> Option<&FactorScore> {
        self.factors.iter().find(|factor| factor.key == key)
    }
}

/// `round(100 * total / max)` with halves rounded up, in integer arithmetic.
pub fn percentage(total: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    let scaled = u64::from(total) * 100;
    let max = u64::from(max_score);
    ((scaled * 2 + max) / (max * 2)) as u32
}

/// Stateless scorer bound to one questionnaire definition.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    definition: Arc<QuestionnaireDefinition>,
}

impl ScoringEngine {
    pub fn new(definition: Arc<QuestionnaireDefinition>) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &QuestionnaireDefinition {
        &self.definition
    }

    /// Sums declared questions; ids absent from `answers` contribute 0.
    pub fn aggregate(&self, answers: &AnswerSet) -> Aggregate {
        let value = |id| u32::from(answers.get(id).unwrap_or(0));

        let total = self.definition.question_ids().map(value).sum();
        let max_score = self.definition.max_score();

        let factors = self
            .definition
            .factors()
            .iter()
            .map(|factor| FactorScore {
                key: factor.key,
                short_name: factor.short_name,
                title: factor.title,
                score: factor.items.iter().copied().map(value).sum(),
                max: self.definition.factor_max(factor),
            })
            .collect();

        Aggregate {
            total,
            max_score,
            percentage: percentage(total, max_score),
            factors,
        }
    }

    pub fn score(&self, answers: &AnswerSet) -> Result<ScoreResult, ClassificationError> {
        let Aggregate {
            total,
            max_score,
            percentage,
            factors,
        } = self.aggregate(answers);

        let band = self.definition.bands().classify(total)?.clone();

        Ok(ScoreResult {
            total,
            max_score,
            percentage,
            factors,
            band,
        })
    }
}
