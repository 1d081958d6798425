use chrono::{FixedOffset, Utc};
use clap::{Args, ValueEnum};
use selfcheck::config::{parse_utc_offset, ReportConfig, ScoringConfig};
use selfcheck::error::AppError;
use selfcheck::notify::SubmissionDispatcher;
use selfcheck::questionnaire::{QuestionnaireKind, RawAnswers};
use selfcheck::submission::SubmissionRequest;

use crate::infra::build_submission_service;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Quiz {
    /// 20-item trait inventory
    Traits,
    /// 7-item inner reactions quiz
    Reactions,
}

impl From<Quiz> for QuestionnaireKind {
    fn from(value: Quiz) -> Self {
        match value {
            Quiz::Traits => QuestionnaireKind::TraitInventory,
            Quiz::Reactions => QuestionnaireKind::Reactions,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Which questionnaire the answers belong to
    #[arg(long, value_enum, default_value_t = Quiz::Traits)]
    pub(crate) quiz: Quiz,
    /// Comma-separated answers, e.g. `1=2,2=0,3=1`
    #[arg(long, value_parser = parse_answers)]
    pub(crate) answers: RawAnswers,
    /// Score partial answers instead of rejecting them
    #[arg(long)]
    pub(crate) lenient: bool,
    /// Offset used for the report timestamp, e.g. `+06:00`
    #[arg(long, value_parser = parse_utc_offset)]
    pub(crate) utc_offset: Option<FixedOffset>,
    /// Free-text thoughts to include in the report
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let report = render_preview(args)?;
    println!("{report}");
    Ok(())
}

pub(crate) fn render_preview(args: PreviewArgs) -> Result<String, AppError> {
    let PreviewArgs {
        quiz,
        answers,
        lenient,
        utc_offset,
        notes,
    } = args;

    let report_config = utc_offset
        .map(|utc_offset| ReportConfig { utc_offset })
        .unwrap_or_default();
    let service = build_submission_service(
        ScoringConfig {
            strict_validation: !lenient,
        },
        report_config,
        SubmissionDispatcher::disabled(),
    )?;

    let request = SubmissionRequest {
        answers,
        optional_thoughts: notes,
        user_agent: Some(format!("selfcheck-api/{}", env!("CARGO_PKG_VERSION"))),
        ..SubmissionRequest::default()
    };
    let evaluation = service.evaluate(quiz.into(), &request)?;
    let context = request.context("127.0.0.1", Utc::now());
    Ok(service.render(&evaluation, &context))
}

pub(crate) fn parse_answers(raw: &str) -> Result<RawAnswers, String> {
    let mut pairs = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (id, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected `id=value`, got '{entry}'"))?;
        let id = id
            .trim()
            .parse::<u8>()
            .map_err(|err| format!("invalid question id '{id}' ({err})"))?;
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|err| format!("invalid answer '{value}' for question {id} ({err})"))?;
        pairs.push((id, value));
    }

    if pairs.is_empty() {
        return Err("no answers supplied".to_string());
    }
    Ok(RawAnswers::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfcheck::submission::SubmissionError;

    fn args(quiz: Quiz, answers: &str) -> PreviewArgs {
        PreviewArgs {
            quiz,
            answers: parse_answers(answers).expect("answers parse"),
            lenient: false,
            utc_offset: None,
            notes: None,
        }
    }

    #[test]
    fn parses_answer_pairs() {
        let answers = parse_answers("1=2, 2=0 ,3=1").expect("parses");
        assert_eq!(answers, RawAnswers::from_pairs([(1, 2), (2, 0), (3, 1)]));
    }

    #[test]
    fn rejects_malformed_answer_pairs() {
        assert!(parse_answers("").is_err());
        assert!(parse_answers("1:2").is_err());
        assert!(parse_answers("x=2").is_err());
        assert!(parse_answers("1=often").is_err());
    }

    #[test]
    fn preview_renders_reactions_report() {
        let report =
            render_preview(args(Quiz::Reactions, "1=1,2=1,3=1,4=1,5=1,6=1,7=0")).expect("renders");
        assert!(report.starts_with("🧠 *Inner Reactions Quiz*"));
        assert!(report.contains("🟡 *Result:* Moderate (4-7)"));
        assert!(report.contains("📊 *Score:* 6 / 14 (43%)"));
        assert!(report.contains("🖥️ Browser: 💻 Other"));
    }

    #[test]
    fn preview_rejects_incomplete_answers_unless_lenient() {
        let err = render_preview(args(Quiz::Reactions, "1=2")).expect_err("incomplete");
        assert!(matches!(
            err,
            AppError::Submission(SubmissionError::Incomplete(_))
        ));

        let mut lenient = args(Quiz::Reactions, "1=2");
        lenient.lenient = true;
        let report = render_preview(lenient).expect("lenient renders");
        assert!(report.contains("📊 *Score:* 2 / 14 (14%)"));
    }
}
