use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// A single failed field rule, keyed so clients can render inline errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// The full set of field failures for one submission. Rules never
/// short-circuit: every failing field is reported in one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    pub errors: Vec<FieldError>,
}

impl ValidationRejection {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl std::fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "validation failed for fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationRejection {}

/// Accumulates field outcomes so a form can report every problem at once.
#[derive(Debug, Default)]
pub struct FieldReport {
    errors: Vec<FieldError>,
}

impl FieldReport {
    /// Record the outcome of one field rule, keeping the normalized value
    /// when the rule passed.
    pub fn capture<T>(&mut self, field: &'static str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError { field, message });
                None
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_rejection(self) -> ValidationRejection {
        ValidationRejection::new(self.errors)
    }
}

/// Trim and require a non-empty value.
pub fn required_text(value: &str, message: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trim, require non-empty, and enforce a minimum character count.
pub fn text_with_min(value: &str, min: usize, message: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() < min {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trim and enforce both a minimum and maximum character count.
pub fn bounded_text(value: &str, min: usize, max: usize, message: &str) -> Result<String, String> {
    let trimmed = value.trim();
    let count = trimmed.chars().count();
    if count < min || count > max {
        Err(message.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Absent or blank optional fields are valid and normalize to `None`.
pub fn optional_text(value: Option<&str>) -> Result<Option<String>, String> {
    Ok(value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string))
}

/// Optional field with a maximum length applied only when a value is present.
pub fn optional_text_max(
    value: Option<&str>,
    max: usize,
    message: &str,
) -> Result<Option<String>, String> {
    match optional_text(value)? {
        Some(text) if text.chars().count() > max => Err(message.to_string()),
        other => Ok(other),
    }
}

/// Validate and normalize an email address: trim, ASCII-lowercase, and a
/// syntactic check (one `@`, non-empty local part, dotted domain).
pub fn email_address(value: &str, message: &str) -> Result<String, String> {
    let normalized = value.trim().to_ascii_lowercase();
    if is_well_formed_email(&normalized) {
        Ok(normalized)
    } else {
        Err(message.to_string())
    }
}

fn is_well_formed_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    if value.matches('@').count() != 1 {
        return false;
    }
    let (local, domain) = match value.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.len() >= 3
}

/// Loose phone check: optional punctuation allowed, 7 to 15 digits.
pub fn optional_phone(value: Option<&str>, message: &str) -> Result<Option<String>, String> {
    match optional_text(value)? {
        Some(phone) => {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            let punctuation_only = phone
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_whitespace() || "()+-.".contains(c));
            if punctuation_only && (7..=15).contains(&digits) {
                Ok(Some(phone))
            } else {
                Err(message.to_string())
            }
        }
        None => Ok(None),
    }
}

/// Optional URL check: scheme-less values are accepted as long as the host
/// part is dotted and free of whitespace.
pub fn optional_url(value: Option<&str>, message: &str) -> Result<Option<String>, String> {
    match optional_text(value)? {
        Some(url) => {
            if is_plausible_url(&url) {
                Ok(Some(url))
            } else {
                Err(message.to_string())
            }
        }
        None => Ok(None),
    }
}

fn is_plausible_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    let host = rest.split('/').next().unwrap_or("");
    host.len() >= 4 && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}

/// Parse an ISO-8601 calendar date, accepting either a plain date or a full
/// RFC 3339 timestamp (the frontend sends both shapes).
pub fn calendar_date(value: &str, message: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.date_naive());
    }
    Err(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_before_validation() {
        let result = email_address(" Foo@Example.com ", "bad email");
        assert_eq!(result, Ok("foo@example.com".to_string()));
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for raw in ["", "plainaddress", "two@@at.com", "@missing-local.com", "user@nodot"] {
            assert!(email_address(raw, "bad email").is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn bounded_text_applies_inclusive_limits() {
        let nine = "a".repeat(9);
        let ten = "a".repeat(10);
        assert!(bounded_text(&nine, 10, 2000, "too short").is_err());
        assert_eq!(bounded_text(&ten, 10, 2000, "too short"), Ok(ten));
    }

    #[test]
    fn optional_fields_accept_absent_and_blank_values() {
        assert_eq!(optional_text(None), Ok(None));
        assert_eq!(optional_text(Some("   ")), Ok(None));
        assert_eq!(optional_phone(None, "bad phone"), Ok(None));
        assert_eq!(optional_url(Some(""), "bad url"), Ok(None));
    }

    #[test]
    fn phone_check_is_loose_but_bounded() {
        assert_eq!(
            optional_phone(Some("+1 (515) 555-0100"), "bad phone"),
            Ok(Some("+1 (515) 555-0100".to_string()))
        );
        assert!(optional_phone(Some("12345"), "bad phone").is_err());
        assert!(optional_phone(Some("call me maybe"), "bad phone").is_err());
    }

    #[test]
    fn url_check_accepts_scheme_less_hosts() {
        assert!(optional_url(Some("https://example.com/about"), "bad").is_ok());
        assert!(optional_url(Some("example.com"), "bad").is_ok());
        assert!(optional_url(Some("not a url"), "bad").is_err());
        assert!(optional_url(Some("nodots"), "bad").is_err());
    }

    #[test]
    fn calendar_date_accepts_both_iso_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date");
        assert_eq!(calendar_date("2025-01-15", "bad date"), Ok(expected));
        assert_eq!(
            calendar_date("2025-01-15T10:00:00Z", "bad date"),
            Ok(expected)
        );
        assert!(calendar_date("15/01/2025", "bad date").is_err());
    }

    #[test]
    fn report_collects_every_failure() {
        let mut report = FieldReport::default();
        let name = report.capture("name", text_with_min("", 2, "name required"));
        let email = report.capture("email", email_address("nope", "bad email"));
        let phone = report.capture("phone", optional_phone(Some("abc"), "bad phone"));
        assert!(name.is_none() && email.is_none() && phone.is_none());
        let rejection = report.into_rejection();
        assert_eq!(rejection.errors.len(), 3);
        assert_eq!(rejection.errors[0].field, "name");
    }
}
