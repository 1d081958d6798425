mod context;
mod formatter;
pub mod user_agent;

pub use context::{parse_client_timestamp, SubmissionContext};
pub use formatter::{escape_markdown, ReportFormatter, SubmissionReport};
