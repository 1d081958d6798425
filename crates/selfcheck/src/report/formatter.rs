use std::fmt;

use chrono::FixedOffset;

use super::context::SubmissionContext;
use super::user_agent;
use crate::config::ReportConfig;
use crate::questionnaire::{AnswerSet, QuestionId, QuestionnaireDefinition, ScoreResult};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━";
const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Renders submissions into the Markdown message relayed to the sink.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    utc_offset: FixedOffset,
}

impl ReportFormatter {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            utc_offset: config.utc_offset,
        }
    }

    pub fn render(
        &self,
        definition: &QuestionnaireDefinition,
        result: &ScoreResult,
        answers: &AnswerSet,
        context: &SubmissionContext,
    ) -> String {
        SubmissionReport {
            definition,
            result,
            answers,
            context,
            utc_offset: self.utc_offset,
        }
        .to_string()
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

/// One submission, displayable as the fixed-layout report.
pub struct SubmissionReport<'a> {
    pub definition: &'a QuestionnaireDefinition,
    pub result: &'a ScoreResult,
    pub answers: &'a AnswerSet,
    pub context: &'a SubmissionContext,
    pub utc_offset: FixedOffset,
}

impl fmt::Display for SubmissionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)?;
        self.write_factor_breakdown(f)?;
        self.write_answers(f)?;
        self.write_notes(f)?;
        self.write_visitor(f)?;
        self.write_contact(f)?;
        write!(f, "\n\n⚠️ _{}_", self.definition.copy().disclaimer)
    }
}

impl SubmissionReport<'_> {
    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let copy = self.definition.copy();
        let band = &self.result.band;

        writeln!(f, "🧠 *{}*", copy.title)?;
        writeln!(f, "{RULE}")?;
        writeln!(f)?;
        writeln!(f, "{} *Result:* {}", band.marker, band.title)?;
        writeln!(
            f,
            "📊 *{}:* {} / {} ({}%)",
            copy.score_caption, self.result.total, self.result.max_score, self.result.percentage
        )?;
        if !band.description.is_empty() {
            writeln!(f, "💡 *Interpretation:* {}", band.description)?;
        }
        Ok(())
    }

    fn write_factor_breakdown(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.factors.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "📈 *Factor Breakdown:*")?;
        let last = self.result.factors.len() - 1;
        for (index, factor) in self.result.factors.iter().enumerate() {
            let branch = if index == last { '└' } else { '├' };
            writeln!(
                f,
                "{branch} {} ({}): *{}*/{}",
                factor.short_name, factor.title, factor.score, factor.max
            )?;
        }
        Ok(())
    }

    fn write_answers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factors = self.definition.factors();
        if factors.is_empty() {
            write_heading(f, "ANSWERS", None)?;
            for id in self.definition.question_ids() {
                self.write_answer_line(f, id)?;
            }
            return Ok(());
        }

        for factor in factors {
            write_heading(f, factor.heading, factor.subtitle)?;
            for &id in &factor.items {
                self.write_answer_line(f, id)?;
            }
        }
        Ok(())
    }

    fn write_answer_line(&self, f: &mut fmt::Formatter<'_>, id: QuestionId) -> fmt::Result {
        let domain = self.definition.domain();
        let label = self.definition.label(id).unwrap_or("");
        match self.answers.get(id) {
            Some(value) => {
                let tier = if value >= domain.max {
                    "🔴"
                } else if value <= domain.min {
                    "⚪"
                } else {
                    "🟡"
                };
                writeln!(f, "{tier} Q{id}: {value} ({label})")
            }
            None => writeln!(f, "⚪ Q{id}: ? ({label})"),
        }
    }

    fn write_notes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notes) = self.context.notes() {
            write_heading(f, "OPTIONAL THOUGHTS", None)?;
            writeln!(f, "{}", escape_markdown(notes))?;
        }
        Ok(())
    }

    fn write_visitor(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context;
        let referrer = context
            .referrer()
            .map_or_else(|| "Direct".to_string(), escape_markdown);
        let time = context
            .submitted_at
            .with_timezone(&self.utc_offset)
            .format(TIMESTAMP_FORMAT);

        write_heading(f, "VISITOR INFO", None)?;
        writeln!(f, "🌐 IP: `{}`", context.remote_addr.replace('`', ""))?;
        writeln!(
            f,
            "🖥️ Browser: {}",
            user_agent::describe(context.user_agent.as_deref())
        )?;
        writeln!(f, "🔗 Referrer: {referrer}")?;
        write!(f, "⏰ Time: {time}")
    }

    fn write_contact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.context.has_contact() {
            return Ok(());
        }

        let mut lines = Vec::with_capacity(2);
        if let Some(email) = self.context.contact_email() {
            lines.push(format!("📧 Email: {}", escape_markdown(email)));
        }
        if let Some(phone) = self.context.contact_phone() {
            lines.push(format!("📱 Phone: {}", escape_markdown(phone)));
        }

        let heading = match self.definition.copy().contact_subtitle {
            Some(subtitle) => format!("📬 *CONTACT INFO* ({subtitle})"),
            None => "📬 *CONTACT INFO*".to_string(),
        };
        write!(f, "\n\n{RULE}\n{heading}\n{RULE}\n{}", lines.join("\n"))
    }
}

fn write_heading(f: &mut fmt::Formatter<'_>, title: &str, subtitle: Option<&str>) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{RULE}")?;
    match subtitle {
        Some(subtitle) => writeln!(f, "*{title}* ({subtitle})")?,
        None => writeln!(f, "*{title}*")?,
    }
    writeln!(f, "{RULE}")
}

/// Escapes the entity characters of Telegram's legacy Markdown so visitor
/// text cannot break message parsing.
pub fn escape_markdown(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
