//! Operators render a question reference and a response value into one
//! XLSForm relevance sub-expression.
//!
//! The editor passes operators around as a signed integer: the magnitude is
//! the registry id and a negative sign selects the negated symbol.

use crate::registry::OperatorCategory;
use serde::Serialize;

/// Resolved registry entry carried by every non-empty operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparator {
    pub id: u32,
    /// Symbol already resolved for negation
    pub symbol: String,
    pub is_negated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operator {
    /// Unset operator; id 0
    #[default]
    Empty,
    /// Plain comparison, e.g. `${age} >= 18`
    Basic(Comparator),
    /// Comparison against a single-quoted string literal
    Text(Comparator),
    /// Comparison against a `date('...')` literal
    Date(Comparator),
    /// Answered / not answered check against `''`
    Existence(Comparator),
    /// `selected(${q}, 'v')`, optionally wrapped in `not(...)`
    SelectMultiple(Comparator),
}

impl Operator {
    pub fn comparator(&self) -> Option<&Comparator> {
        match self {
            Operator::Empty => None,
            Operator::Basic(c)
            | Operator::Text(c)
            | Operator::Date(c)
            | Operator::Existence(c)
            | Operator::SelectMultiple(c) => Some(c),
        }
    }

    pub fn id(&self) -> u32 {
        self.comparator().map_or(0, |c| c.id)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Operator::Empty)
    }

    pub fn is_negated(&self) -> bool {
        self.comparator().is_some_and(|c| c.is_negated)
    }

    pub fn symbol(&self) -> &str {
        self.comparator().map_or("", |c| c.symbol.as_str())
    }

    /// Rendering category; `Basic` reports as `Equality`
    pub fn category(&self) -> Option<OperatorCategory> {
        match self {
            Operator::Empty => None,
            Operator::Basic(_) => Some(OperatorCategory::Equality),
            Operator::Text(_) => Some(OperatorCategory::Text),
            Operator::Date(_) => Some(OperatorCategory::Date),
            Operator::Existence(_) => Some(OperatorCategory::Existence),
            Operator::SelectMultiple(_) => Some(OperatorCategory::SelectMultiple),
        }
    }

    /// Signed editor value for this operator
    pub fn raw_value(&self) -> i32 {
        encode_operator(self.id(), self.is_negated())
    }

    /// Render `question_name` and `response_value` into an expression
    pub fn serialize(&self, question_name: &str, response_value: &str) -> String {
        match self {
            Operator::Empty => String::new(),
            Operator::Basic(c) => comparison(question_name, &c.symbol, response_value),
            Operator::Text(c) => comparison(question_name, &c.symbol, &quote(response_value)),
            Operator::Date(c) => {
                if response_value.contains("date") {
                    comparison(question_name, &c.symbol, response_value)
                } else {
                    let literal = format!("date('{}')", response_value);
                    comparison(question_name, &c.symbol, &literal)
                }
            }
            Operator::Existence(c) => comparison(question_name, &c.symbol, "''"),
            Operator::SelectMultiple(c) => {
                let selected = format!("selected(${{{}}}, '{}')", question_name, response_value);
                if c.is_negated {
                    format!("not({})", selected)
                } else {
                    selected
                }
            }
        }
    }
}

fn comparison(question_name: &str, symbol: &str, right: &str) -> String {
    format!("${{{}}} {} {}", question_name, symbol, right)
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}

/// Combine a registry id and negation into the editor's signed value
pub fn encode_operator(id: u32, negated: bool) -> i32 {
    let magnitude = id as i32;
    if negated {
        -magnitude
    } else {
        magnitude
    }
}

/// Split the editor's signed value into registry id and negation
pub fn decode_operator(raw: i32) -> (u32, bool) {
    (raw.unsigned_abs(), raw < 0)
}
