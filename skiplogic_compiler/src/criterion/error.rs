//! Error types for criterion mutations

use crate::logging::{codes, Code};
use crate::response::ResponseError;

/// Result type for criterion mutations
pub type CriterionResult<T> = Result<T, CriterionError>;

/// Rejected criterion mutation; the criterion keeps its prior state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriterionError {
    #[error("Question '{cid}' was not found in the survey")]
    QuestionNotFound { cid: String },

    #[error("Operator {operator} is not allowed for {question_type} question '{cid}'")]
    OperatorNotAllowed {
        cid: String,
        question_type: String,
        operator: i32,
    },

    #[error("No question selected")]
    NoQuestionSelected,

    #[error("Question '{cid}' of type {question_type} has no skip-logic operators")]
    QuestionHasNoOperators { cid: String, question_type: String },

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl CriterionError {
    /// Create a question not found error
    pub fn question_not_found(cid: &str) -> Self {
        Self::QuestionNotFound {
            cid: cid.to_string(),
        }
    }

    /// Create an operator not allowed error
    pub fn operator_not_allowed(cid: &str, question_type: &str, operator: i32) -> Self {
        Self::OperatorNotAllowed {
            cid: cid.to_string(),
            question_type: question_type.to_string(),
            operator,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::QuestionNotFound { .. } => codes::criterion::QUESTION_NOT_FOUND,
            Self::OperatorNotAllowed { .. } => codes::criterion::OPERATOR_NOT_ALLOWED,
            Self::NoQuestionSelected => codes::criterion::NO_QUESTION_SELECTED,
            Self::QuestionHasNoOperators { .. } => codes::criterion::QUESTION_HAS_NO_OPERATORS,
            Self::Response(error) => error.error_code(),
        }
    }
}
