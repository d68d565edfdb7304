use crate::logging::{codes, Code};

/// Rejected response input; the model keeps its previous value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("'{value}' is not a whole number")]
    InvalidInteger { value: String },

    #[error("'{value}' is not a decimal number")]
    InvalidDecimal { value: String },

    #[error("'{value}' is not a YYYY-MM-DD calendar date")]
    InvalidDate { value: String },

    #[error("choice '{id}' is not in the question's choice list")]
    UnknownChoice { id: String },

    #[error("question has no resolvable choice list")]
    ChoiceListUnavailable,
}

impl ResponseError {
    pub fn error_code(&self) -> Code {
        match self {
            ResponseError::InvalidInteger { .. } => codes::response::INVALID_INTEGER,
            ResponseError::InvalidDecimal { .. } => codes::response::INVALID_DECIMAL,
            ResponseError::InvalidDate { .. } => codes::response::INVALID_DATE,
            ResponseError::UnknownChoice { .. } => codes::response::UNKNOWN_CHOICE,
            ResponseError::ChoiceListUnavailable => codes::response::CHOICE_LIST_UNAVAILABLE,
        }
    }
}
