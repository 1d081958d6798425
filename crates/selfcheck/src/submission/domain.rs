use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::questionnaire::{QuestionId, RawAnswers, ScoreResult, ValidationFailure};
use crate::report::{parse_client_timestamp, SubmissionContext};

/// Body accepted by both submission endpoints. Everything the client computed
/// (`score`, `percentage`, `level`, factor subtotals, `maxScore`) is advisory;
/// the server recomputes it from `answers`. A field of the wrong JSON type is
/// treated as absent instead of rejecting the body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "deserialize_answers")]
    pub answers: RawAnswers,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub factor1: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub factor2: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub max_score: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub optional_thoughts: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub referrer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    pub contact_phone: Option<String>,
}

fn deserialize_answers<'de, D>(deserializer: D) -> Result<RawAnswers, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(RawAnswers::from_json)
}

/// Numbers, and strings holding a number, are kept; anything else is dropped.
fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    })
}

fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

impl SubmissionRequest {
    /// Builds visitor context; the client timestamp wins when it parses,
    /// otherwise the receipt time is used.
    pub fn context(
        &self,
        remote_addr: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> SubmissionContext {
        let submitted_at = parse_client_timestamp(self.timestamp.as_deref()).unwrap_or(received_at);
        SubmissionContext {
            remote_addr: remote_addr.into(),
            user_agent: self.user_agent.clone(),
            referrer: self.referrer.clone(),
            submitted_at,
            notes: self.optional_thoughts.clone(),
            contact_email: self.contact_email.clone(),
            contact_phone: self.contact_phone.clone(),
        }
    }

    /// Names of client-supplied fields that disagree with the server result.
    pub fn claim_mismatches(&self, result: &ScoreResult) -> Vec<&'static str> {
        let differs = |claim: Option<f64>, actual: u32| {
            claim.is_some_and(|claim| (claim - f64::from(actual)).abs() > f64::EPSILON)
        };

        let mut mismatches = Vec::new();
        if differs(self.score, result.total) {
            mismatches.push("score");
        }
        if differs(self.percentage, result.percentage) {
            mismatches.push("percentage");
        }
        if differs(self.max_score, result.max_score) {
            mismatches.push("maxScore");
        }
        if self
            .level
            .as_deref()
            .is_some_and(|level| level != result.band.key)
        {
            mismatches.push("level");
        }
        for (key, claim) in [("factor1", self.factor1), ("factor2", self.factor2)] {
            if let Some(factor) = result.factor(key) {
                if differs(claim, factor.score) {
                    mismatches.push(key);
                }
            }
        }
        mismatches
    }
}

/// Response for every handled submission, whether or not the sink accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl SubmissionResponse {
    pub fn from_delivery(delivered: bool) -> Self {
        let message = if delivered {
            "Result recorded"
        } else {
            "Notification failed"
        };
        Self {
            success: delivered,
            message: message.to_string(),
        }
    }
}

/// 422 body listing the offending question ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteSubmissionResponse {
    pub success: bool,
    pub error: String,
    pub missing_questions: Vec<QuestionId>,
    pub invalid_questions: Vec<QuestionId>,
}

impl From<ValidationFailure> for IncompleteSubmissionResponse {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            success: false,
            error: format!("Incomplete submission: {failure}"),
            missing_questions: failure.missing,
            invalid_questions: failure.out_of_domain,
        }
    }
}
