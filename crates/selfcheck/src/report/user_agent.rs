//! Best-effort browser sniffing for report display only.

use std::sync::OnceLock;

use regex::Regex;

const MOBILE_MARKER: &str = "📱";
const DESKTOP_MARKER: &str = "💻";

/// Checked in order; the first token found wins.
const BROWSER_TOKENS: [(&[&str], &str); 5] = [
    (&["Firefox"], "Firefox"),
    (&["Edg"], "Edge"),
    (&["Chrome"], "Chrome"),
    (&["Safari"], "Safari"),
    (&["Opera", "OPR"], "Opera"),
];

fn mobile_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Mobile|Android|iPhone|iPad").ok())
        .as_ref()
}

pub fn is_mobile(user_agent: &str) -> bool {
    mobile_pattern().is_some_and(|pattern| pattern.is_match(user_agent))
}

pub fn browser_name(user_agent: &str) -> &'static str {
    BROWSER_TOKENS
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| user_agent.contains(token)))
        .map_or("Other", |(_, name)| *name)
}

/// `📱 Chrome`, `💻 Firefox`, or `Unknown` when no user agent was sent.
pub fn describe(user_agent: Option<&str>) -> String {
    let Some(user_agent) = user_agent.filter(|ua| !ua.trim().is_empty()) else {
        return "Unknown".to_string();
    };

    let device = if is_mobile(user_agent) {
        MOBILE_MARKER
    } else {
        DESKTOP_MARKER
    };
    format!("{device} {}", browser_name(user_agent))
}
