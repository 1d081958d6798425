use std::sync::Arc;

use tracing::{info, warn};

use super::domain::SubmissionRequest;
use crate::config::ScoringConfig;
use crate::notify::SubmissionDispatcher;
use crate::questionnaire::{
    definition_for, normalize, validate, AnswerSet, ClassificationError, DefinitionError,
    QuestionnaireKind, ScoreResult, ScoringEngine, ValidationFailure,
};
use crate::report::{ReportFormatter, SubmissionContext};

/// Server-side view of one submission: normalized answers plus the
/// authoritative score.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub kind: QuestionnaireKind,
    pub answers: AnswerSet,
    pub result: ScoreResult,
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub evaluation: Evaluation,
    pub report: String,
    pub delivered: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("incomplete submission: {0}")]
    Incomplete(ValidationFailure),
    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

/// Service composing both scoring engines, the report formatter and the
/// notification dispatcher.
pub struct SubmissionService {
    traits: ScoringEngine,
    reactions: ScoringEngine,
    formatter: ReportFormatter,
    dispatcher: SubmissionDispatcher,
    scoring: ScoringConfig,
}

impl SubmissionService {
    pub fn new(
        scoring: ScoringConfig,
        formatter: ReportFormatter,
        dispatcher: SubmissionDispatcher,
    ) -> Result<Self, DefinitionError> {
        let engine = |kind| definition_for(kind).map(|def| ScoringEngine::new(Arc::new(def)));
        Ok(Self {
            traits: engine(QuestionnaireKind::TraitInventory)?,
            reactions: engine(QuestionnaireKind::Reactions)?,
            formatter,
            dispatcher,
            scoring,
        })
    }

    pub fn engine(&self, kind: QuestionnaireKind) -> &ScoringEngine {
        match kind {
            QuestionnaireKind::TraitInventory => &self.traits,
            QuestionnaireKind::Reactions => &self.reactions,
        }
    }

    pub fn dispatcher(&self) -> &SubmissionDispatcher {
        &self.dispatcher
    }

    /// Validates (or, in lenient mode, normalizes) the answers and scores
    /// them. Client-computed fields are compared and only logged.
    pub fn evaluate(
        &self,
        kind: QuestionnaireKind,
        request: &SubmissionRequest,
    ) -> Result<Evaluation, SubmissionError> {
        let engine = self.engine(kind);
        let definition = engine.definition();

        let answers = if self.scoring.strict_validation {
            validate(definition, &request.answers).map_err(SubmissionError::Incomplete)?
        } else {
            normalize(definition, &request.answers)
        };

        let result = engine.score(&answers)?;

        let mismatches = request.claim_mismatches(&result);
        if !mismatches.is_empty() {
            warn!(
                quiz = kind.label(),
                fields = ?mismatches,
                server_total = result.total,
                server_level = result.band.key,
                "client-computed result disagrees with server; using server values"
            );
        }

        Ok(Evaluation {
            kind,
            answers,
            result,
        })
    }

    pub fn render(&self, evaluation: &Evaluation, context: &SubmissionContext) -> String {
        self.formatter.render(
            self.engine(evaluation.kind).definition(),
            &evaluation.result,
            &evaluation.answers,
            context,
        )
    }

    /// Scores, renders and relays one submission. Sink failures surface as
    /// `delivered == false`, never as an error.
    pub async fn submit(
        &self,
        kind: QuestionnaireKind,
        request: &SubmissionRequest,
        context: SubmissionContext,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let evaluation = self.evaluate(kind, request)?;
        let report = self.render(&evaluation, &context);
        let delivered = self.dispatcher.dispatch(&report).await;

        info!(
            quiz = kind.label(),
            total = evaluation.result.total,
            level = evaluation.result.band.key,
            delivered,
            "submission processed"
        );

        Ok(SubmissionOutcome {
            evaluation,
            report,
            delivered,
        })
    }
}

impl std::fmt::Debug for SubmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionService")
            .field("formatter", &self.formatter)
            .field("dispatcher", &self.dispatcher)
            .field("scoring", &self.scoring)
            .finish_non_exhaustive()
    }
}
