//! Per-type coercion of raw editor input
//!
//! Every function maps empty input to `Ok(None)` (value unset) and invalid
//! input to an error.

use super::ResponseError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"))
}

fn plain_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"))
}

/// Accepts only `-?[0-9]+` that fits in an i64
pub fn parse_integer(raw: &str) -> Result<Option<i64>, ResponseError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = || ResponseError::InvalidInteger {
        value: raw.to_string(),
    };
    if !integer_pattern().is_match(raw) {
        return Err(invalid());
    }
    raw.parse::<i64>().map(Some).map_err(|_| invalid())
}

/// Forgiving decimal parsing for human-entered numbers
///
/// Tries, in order: the input as-is, the input without whitespace, a single
/// comma read as the decimal point, and finally (when both `,` and `.` are
/// present) the last separator as the decimal point with the other one
/// dropped as a thousands separator.
pub fn parse_decimal(raw: &str) -> Result<Option<f64>, ResponseError> {
    fn attempt(candidate: &str) -> Option<f64> {
        candidate.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    if let Some(value) = attempt(raw) {
        return Ok(Some(value));
    }

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }
    if let Some(value) = attempt(&compact) {
        return Ok(Some(value));
    }

    if compact.matches(',').count() == 1 {
        if let Some(value) = attempt(&compact.replacen(',', ".", 1)) {
            return Ok(Some(value));
        }
    }

    if let (Some(last_comma), Some(last_dot)) = (compact.rfind(','), compact.rfind('.')) {
        let (decimal_separator, thousands_separator) = if last_comma > last_dot {
            (',', '.')
        } else {
            ('.', ',')
        };
        let normalized: String = compact
            .chars()
            .filter(|c| *c != thousands_separator)
            .map(|c| if c == decimal_separator { '.' } else { c })
            .collect();
        if let Some(value) = attempt(&normalized) {
            return Ok(Some(value));
        }
    }

    Err(ResponseError::InvalidDecimal {
        value: raw.to_string(),
    })
}

/// Wraps a plain `YYYY-MM-DD` date as `date('YYYY-MM-DD')`
///
/// Input already containing `date` is kept as written.
pub fn parse_date(raw: &str) -> Result<Option<String>, ResponseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.contains("date") {
        return Ok(Some(raw.to_string()));
    }

    let is_calendar_date = plain_date_pattern().is_match(raw)
        && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();
    if !is_calendar_date {
        return Err(ResponseError::InvalidDate {
            value: raw.to_string(),
        });
    }
    Ok(Some(format!("date('{}')", raw)))
}
