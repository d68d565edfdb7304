//! Parser for the relevance expressions the criterion serializer emits
//!
//! Only the flat shapes the skip-logic editor can represent are accepted:
//! criteria in the operator forms below, all joined by the same delimiter.
//! Anything else (parenthesised groups, mixed `and`/`or`, other functions)
//! is a [`ParseError`] and the form editor falls back to hand-written logic.
//!
//! ```text
//! ${q} OP value            OP in = != > < >= <=
//!                          value in '' | 'text' | 12.5 | date('YYYY-MM-DD')
//! selected(${q}, 'v')
//! not(selected(${q}, 'v'))
//! ```

mod error;

pub use error::ParseError;

use crate::config::constants::compile_time::expressions::{
    MAX_CRITERIA_PER_RULE, MAX_EXPRESSION_LENGTH,
};
use crate::logging::codes;
use crate::rule::Delimiter;
use crate::{log_debug, log_success};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Right-hand side of a comparison criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedValue {
    /// The `''` literal used by answered/not answered checks
    Empty,
    /// Single-quoted string, escapes removed
    Text(String),
    Number(String),
    /// Plain `YYYY-MM-DD` taken out of `date('...')`
    Date(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ParsedCriterion {
    Comparison {
        question: String,
        symbol: String,
        value: ParsedValue,
    },
    Selected {
        question: String,
        choice: String,
        negated: bool,
    },
}

impl ParsedCriterion {
    pub fn question(&self) -> &str {
        match self {
            ParsedCriterion::Comparison { question, .. }
            | ParsedCriterion::Selected { question, .. } => question,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRule {
    pub delimiter: Delimiter,
    pub criteria: Vec<ParsedCriterion>,
}

const QUESTION_REF: &str = r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)\}";

fn cached(cell: &'static OnceLock<Regex>, source: impl FnOnce() -> String) -> &'static Regex {
    cell.get_or_init(|| Regex::new(&source()).expect("valid expression pattern"))
}

fn comparison_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || format!(r"^{}\s*(!=|>=|<=|=|>|<)\s*(.+)$", QUESTION_REF))
}

fn selected_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || {
        format!(r"^selected\(\s*{}\s*,\s*'((?:[^'\\]|\\.)*)'\s*\)$", QUESTION_REF)
    })
}

fn not_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || r"^not\(\s*(.*?)\s*\)$".to_string())
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || r"^'((?:[^'\\]|\\.)*)'$".to_string())
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || r"^date\(\s*'([0-9]{4}-[0-9]{2}-[0-9]{2})'\s*\)$".to_string())
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || r"^-?[0-9]+(?:\.[0-9]+)?$".to_string())
}

fn delimiter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, || r"^\s+(and|or)\s+".to_string())
}

/// Parse a relevance expression into its criteria
pub fn parse_expression(expression: &str) -> Result<ParsedRule, ParseError> {
    if expression.len() > MAX_EXPRESSION_LENGTH {
        return Err(rejected(ParseError::ExpressionTooLong {
            length: expression.len(),
        }));
    }
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(rejected(ParseError::EmptyExpression));
    }

    let (delimiter, fragments) = split_top_level(expression).map_err(rejected)?;
    if fragments.len() > MAX_CRITERIA_PER_RULE {
        return Err(rejected(ParseError::TooManyCriteria {
            count: fragments.len(),
        }));
    }

    let criteria = fragments
        .iter()
        .map(|fragment| parse_criterion(fragment))
        .collect::<Result<Vec<_>, _>>()
        .map_err(rejected)?;

    log_success!(codes::success::EXPRESSION_PARSED, "Expression parsed",
        "criteria" => criteria.len(),
        "delimiter" => delimiter);
    Ok(ParsedRule {
        delimiter,
        criteria,
    })
}

fn rejected(error: ParseError) -> ParseError {
    log_debug!(code = error.error_code(), "Expression not representable",
        "reason" => error);
    error
}

/// Split on top-level `and`/`or`, outside quotes and parentheses
fn split_top_level(expression: &str) -> Result<(Delimiter, Vec<&str>), ParseError> {
    let bytes = expression.as_bytes();
    let mut delimiter: Option<Delimiter> = None;
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if in_quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'\'' {
                in_quote = false;
            }
            i += 1;
            continue;
        }

        match byte {
            b'\'' => in_quote = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            b if b.is_ascii_whitespace() && depth == 0 => {
                if let Some(found) = delimiter_pattern().captures(&expression[i..]) {
                    let next = match &found[1] {
                        "and" => Delimiter::And,
                        _ => Delimiter::Or,
                    };
                    if delimiter.is_some_and(|current| current != next) {
                        return Err(ParseError::MixedDelimiters);
                    }
                    delimiter = Some(next);
                    fragments.push(&expression[start..i]);
                    i += found[0].len();
                    start = i;
                    continue;
                }
            }
            _ => {}
        }
        if depth < 0 {
            return Err(ParseError::unrecognized(expression));
        }
        i += 1;
    }

    if in_quote || depth != 0 {
        return Err(ParseError::unrecognized(expression));
    }
    fragments.push(&expression[start..]);
    Ok((delimiter.unwrap_or_default(), fragments))
}

fn parse_criterion(fragment: &str) -> Result<ParsedCriterion, ParseError> {
    let fragment = fragment.trim();

    if let Some(inner) = not_pattern().captures(fragment) {
        return match parse_criterion(&inner[1])? {
            ParsedCriterion::Selected {
                question,
                choice,
                negated: false,
            } => Ok(ParsedCriterion::Selected {
                question,
                choice,
                negated: true,
            }),
            _ => Err(ParseError::unrecognized(fragment)),
        };
    }

    if let Some(selected) = selected_pattern().captures(fragment) {
        return Ok(ParsedCriterion::Selected {
            question: selected[1].to_string(),
            choice: unescape(&selected[2]),
            negated: false,
        });
    }

    let comparison = comparison_pattern()
        .captures(fragment)
        .ok_or_else(|| ParseError::unrecognized(fragment))?;
    let value =
        parse_value(comparison[3].trim()).ok_or_else(|| ParseError::unrecognized(fragment))?;

    Ok(ParsedCriterion::Comparison {
        question: comparison[1].to_string(),
        symbol: comparison[2].to_string(),
        value,
    })
}

fn parse_value(raw: &str) -> Option<ParsedValue> {
    if raw == "''" {
        return Some(ParsedValue::Empty);
    }
    if let Some(quoted) = quoted_pattern().captures(raw) {
        return Some(ParsedValue::Text(unescape(&quoted[1])));
    }
    if let Some(date) = date_pattern().captures(raw) {
        return Some(ParsedValue::Date(date[1].to_string()));
    }
    number_pattern()
        .is_match(raw)
        .then(|| ParsedValue::Number(raw.to_string()))
}

fn unescape(quoted: &str) -> String {
    quoted.replace("\\'", "'")
}
