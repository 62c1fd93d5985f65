//! Shared validation helpers for inbound payloads.
//!
//! Payload types collect every problem into a [`Violations`] list and turn
//! it into a single `AppError::Validation` so clients see all field errors
//! at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors while a payload is checked.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Returns `value` if nothing was recorded, otherwise a validation error.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AppError::validation(self.0))
        }
    }

    /// Trimmed, non-empty text or a recorded violation.
    pub fn required_text(&mut self, field: &str, value: Option<String>, message: &str) -> String {
        match non_empty(value) {
            Some(text) => text,
            None => {
                self.push(field, message);
                String::new()
            }
        }
    }

    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.push(field, message);
        }
    }

    pub fn date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        let raw = match non_empty(value) {
            Some(raw) => raw,
            None => {
                self.push(field, format!("{field} is required"));
                return None;
            }
        };
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, format!("{field} must be a date in YYYY-MM-DD format"));
                None
            }
        }
    }

    pub fn positive(&mut self, field: &str, value: Option<f64>, message: &str) -> Option<f64> {
        match value {
            Some(number) if !(number.is_finite() && number > 0.0) => {
                self.push(field, message);
                None
            }
            other => other,
        }
    }

    pub fn positive_integer(
        &mut self,
        field: &str,
        value: Option<f64>,
        message: &str,
    ) -> Option<i64> {
        match value {
            None => None,
            Some(number)
                if number.is_finite()
                    && number > 0.0
                    && number.fract() == 0.0
                    && number < i64::MAX as f64 =>
            {
                Some(number as i64)
            }
            Some(_) => {
                self.push(field, message);
                None
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_email(value) {
            self.push(field, "Invalid email format");
        }
    }
}

/// Trims the value and maps empty strings to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_drops_blank() {
        assert_eq!(non_empty(Some("  mill ".into())), Some("mill".into()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("admin@example.com"));
        assert!(is_email("a.b@mail.example.org"));
        assert!(!is_email("admin"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("admin@example"));
        assert!(!is_email("admin@@example.com"));
        assert!(!is_email("ad min@example.com"));
    }

    #[test]
    fn positive_integer_rejects_fractions_and_zero() {
        let mut violations = Violations::new();
        assert_eq!(violations.positive_integer("bags", Some(4.0), "bad"), Some(4));
        assert_eq!(violations.positive_integer("bags", Some(1.5), "bad"), None);
        assert_eq!(violations.positive_integer("bags", Some(0.0), "bad"), None);
        assert_eq!(violations.positive_integer("bags", None, "bad"), None);
        assert!(violations.finish(()).is_err());
    }

    #[test]
    fn positive_integer_rejects_values_beyond_i64() {
        let mut violations = Violations::new();
        assert_eq!(
            violations.positive_integer("bags", Some(9_007_199_254_740_992.0), "bad"),
            Some(9_007_199_254_740_992)
        );
        // 2^63 would saturate to i64::MAX
        assert_eq!(
            violations.positive_integer("bags", Some(9_223_372_036_854_775_808.0), "bad"),
            None
        );
        assert!(violations.finish(()).is_err());
    }

    #[test]
    fn date_requires_iso_format() {
        let mut violations = Violations::new();
        assert!(violations.date("date", Some("2024-02-29".into())).is_some());
        assert!(violations.date("date", Some("29/02/2024".into())).is_none());
        assert!(violations.date("date", None).is_none());

        match violations.finish(()) {
            Err(AppError::Validation { details, .. }) => assert_eq!(details.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
