use std::collections::BTreeMap;

use serde_json::Value;

use super::definition::{QuestionId, QuestionnaireDefinition};

/// Answers exactly as submitted: keys are question identifiers in string form
/// (`"1"`), values are whatever JSON the client sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnswers(BTreeMap<String, Value>);

/// Interpretation of one raw answer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAnswer {
    Missing,
    NotAnInteger,
    Value(i64),
}

impl RawAnswers {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (QuestionId, i64)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(id, value)| (id.to_string(), Value::from(value)))
                .collect(),
        )
    }

    /// Anything other than a JSON object (including `null`) yields no
    /// answers at all.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map.into_iter().collect()),
            _ => Self::default(),
        }
    }

    /// Keys that do not parse as a question id are extraneous and never match.
    pub fn lookup(&self, id: QuestionId) -> RawAnswer {
        let value = self
            .0
            .iter()
            .find(|(key, _)| key.trim().parse::<QuestionId>().ok() == Some(id))
            .map(|(_, value)| value);

        match value {
            None | Some(Value::Null) => RawAnswer::Missing,
            Some(value) => value
                .as_i64()
                .map_or(RawAnswer::NotAnInteger, RawAnswer::Value),
        }
    }
}

/// A validated mapping of question id to in-domain value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<QuestionId, u8>,
}

impl AnswerSet {
    pub fn get(&self, id: QuestionId) -> Option<u8> {
        self.values.get(&id).copied()
    }

}

/// Question ids that prevented a submission from being scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} unanswered and {} invalid question(s)", .missing.len(), .out_of_domain.len())]
pub struct ValidationFailure {
    pub missing: Vec<QuestionId>,
    pub out_of_domain: Vec<QuestionId>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.out_of_domain.is_empty()
    }
}

/// Requires every declared question to carry an integer inside the domain.
/// Extraneous keys are ignored.
pub fn validate(
    definition: &QuestionnaireDefinition,
    raw: &RawAnswers,
) -> Result<AnswerSet, ValidationFailure> {
    let domain = definition.domain();
    let mut values = BTreeMap::new();
    let mut failure = ValidationFailure::default();

    for id in definition.question_ids() {
        match raw.lookup(id) {
            RawAnswer::Missing => failure.missing.push(id),
            RawAnswer::NotAnInteger => failure.out_of_domain.push(id),
            RawAnswer::Value(value) if !domain.contains(value) => failure.out_of_domain.push(id),
            RawAnswer::Value(value) => {
                values.insert(id, domain.clamp(value));
            }
        }
    }

    if failure.is_empty() {
        Ok(AnswerSet { values })
    } else {
        Err(failure)
    }
}

/// Best-effort normalization used when re-validation is disabled: unusable
/// slots are dropped (they score 0) and out-of-range integers are clamped.
pub fn normalize(definition: &QuestionnaireDefinition, raw: &RawAnswers) -> AnswerSet {
    let domain = definition.domain();
    let values = definition
        .question_ids()
        .filter_map(|id| match raw.lookup(id) {
            RawAnswer::Value(value) => Some((id, domain.clamp(value))),
            RawAnswer::Missing | RawAnswer::NotAnInteger => None,
        })
        .collect();
    AnswerSet { values }
}
