use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntactic family an operator belongs to
///
/// Registry entries use `Equality`, `Existence` and `SelectMultiple`; the
/// `Text` and `Date` flavors come from the question type profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorCategory {
    Equality,
    Text,
    Date,
    Existence,
    SelectMultiple,
}

impl OperatorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorCategory::Equality => "equality",
            OperatorCategory::Text => "text",
            OperatorCategory::Date => "date",
            OperatorCategory::Existence => "existence",
            OperatorCategory::SelectMultiple => "select_multiple",
        }
    }
}

/// Value type of a criterion's right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Text,
    /// No usable value (existence checks)
    Empty,
    Integer,
    Decimal,
    Date,
    Dropdown,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Text => "text",
            ResponseType::Empty => "empty",
            ResponseType::Integer => "integer",
            ResponseType::Decimal => "decimal",
            ResponseType::Date => "date",
            ResponseType::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
