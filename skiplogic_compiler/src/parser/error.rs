use crate::config::constants::compile_time::expressions::{
    MAX_CRITERIA_PER_RULE, MAX_EXPRESSION_LENGTH,
};
use crate::logging::{codes, Code};

/// Expression the skip-logic editor cannot represent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Expression is empty")]
    EmptyExpression,

    #[error("Unrecognized criterion: '{fragment}'")]
    UnrecognizedCriterion { fragment: String },

    #[error("Expression mixes 'and' and 'or'")]
    MixedDelimiters,

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },

    #[error("Too many criteria: {count} (max {MAX_CRITERIA_PER_RULE})")]
    TooManyCriteria { count: usize },
}

impl ParseError {
    pub fn unrecognized(fragment: &str) -> Self {
        Self::UnrecognizedCriterion {
            fragment: fragment.trim().to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::EmptyExpression => codes::parser::EMPTY_EXPRESSION,
            Self::UnrecognizedCriterion { .. } => codes::parser::UNRECOGNIZED_CRITERION,
            Self::MixedDelimiters => codes::parser::MIXED_DELIMITERS,
            Self::ExpressionTooLong { .. } => codes::parser::EXPRESSION_TOO_LONG,
            Self::TooManyCriteria { .. } => codes::parser::TOO_MANY_CRITERIA,
        }
    }
}
