use chrono::{DateTime, Utc};

/// Visitor metadata forwarded with a submission. Everything here is opaque
/// pass-through data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub remote_addr: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

impl SubmissionContext {
    pub fn new(remote_addr: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            user_agent: None,
            referrer: None,
            submitted_at,
            notes: None,
            contact_email: None,
            contact_phone: None,
        }
    }

    pub fn referrer(&self) -> Option<&str> {
        present(&self.referrer)
    }

    pub fn notes(&self) -> Option<&str> {
        present(&self.notes)
    }

    pub fn contact_email(&self) -> Option<&str> {
        present(&self.contact_email)
    }

    pub fn contact_phone(&self) -> Option<&str> {
        present(&self.contact_phone)
    }

    pub fn has_contact(&self) -> bool {
        self.contact_email().is_some() || self.contact_phone().is_some()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Parses the client's ISO-8601 timestamp. Unparseable input yields `None`
/// so the caller can fall back to the receipt time.
pub fn parse_client_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blank_fields_are_treated_as_absent() {
        let mut context = SubmissionContext::new("203.0.113.7", Utc::now());
        context.contact_email = Some("   ".to_string());
        context.referrer = Some(String::new());
        assert!(!context.has_contact());
        assert_eq!(context.referrer(), None);

        context.contact_phone = Some(" +8801700000000 ".to_string());
        assert!(context.has_contact());
        assert_eq!(context.contact_phone(), Some("+8801700000000"));
    }

    #[test]
    fn parses_browser_iso_timestamps() {
        let parsed = parse_client_timestamp(Some("2025-01-05T10:20:30.123Z")).expect("valid");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2025, 1, 5, 10, 20, 30).unwrap()
                + chrono::Duration::milliseconds(123)
        );
        assert_eq!(parse_client_timestamp(Some("yesterday")), None);
        assert_eq!(parse_client_timestamp(None), None);
    }
}
