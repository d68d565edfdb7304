//! Response models: the typed right-hand side of a criterion
//!
//! Each variant owns its validation and coercion rules. A rejected input
//! never changes the stored value.

mod coerce;
mod error;

pub use coerce::{parse_date, parse_decimal, parse_integer};
pub use error::ResponseError;

use crate::registry::ResponseType;
use crate::survey::Choice;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseModel {
    /// Verbatim string value; serves the `text` and `empty` response types
    Generic {
        response_type: ResponseType,
        value: Option<String>,
    },
    Integer {
        value: Option<i64>,
    },
    Decimal {
        value: Option<f64>,
    },
    /// Stored already wrapped as `date('YYYY-MM-DD')`
    Date {
        value: Option<String>,
    },
    Dropdown {
        /// Stable choice name written into the expression
        value: Option<String>,
        /// Client id of the selected choice, for the editor
        selection_id: Option<String>,
    },
}

impl ResponseModel {
    pub fn response_type(&self) -> ResponseType {
        match self {
            ResponseModel::Generic { response_type, .. } => *response_type,
            ResponseModel::Integer { .. } => ResponseType::Integer,
            ResponseModel::Decimal { .. } => ResponseType::Decimal,
            ResponseModel::Date { .. } => ResponseType::Date,
            ResponseModel::Dropdown { .. } => ResponseType::Dropdown,
        }
    }

    /// Value as it appears in an expression, if one is set
    pub fn value(&self) -> Option<String> {
        match self {
            ResponseModel::Generic { value, .. }
            | ResponseModel::Date { value }
            | ResponseModel::Dropdown { value, .. } => value.clone(),
            ResponseModel::Integer { value } => value.map(|v| v.to_string()),
            ResponseModel::Decimal { value } => value.map(|v| v.to_string()),
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            ResponseModel::Generic { value, .. }
            | ResponseModel::Date { value }
            | ResponseModel::Dropdown { value, .. } => value.is_some(),
            ResponseModel::Integer { value } => value.is_some(),
            ResponseModel::Decimal { value } => value.is_some(),
        }
    }

    /// Whether the model can take part in a serialized expression
    ///
    /// The `empty` type needs no value at all; text needs a non-empty string.
    pub fn is_complete(&self) -> bool {
        match self {
            ResponseModel::Generic {
                response_type: ResponseType::Empty,
                ..
            } => true,
            ResponseModel::Generic { value, .. } => value.as_deref().is_some_and(|v| !v.is_empty()),
            _ => self.has_value(),
        }
    }

    pub fn selection_id(&self) -> Option<&str> {
        match self {
            ResponseModel::Dropdown { selection_id, .. } => selection_id.as_deref(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        match self {
            ResponseModel::Generic { value, .. }
            | ResponseModel::Date { value }
            | ResponseModel::Dropdown { value, .. } => *value = None,
            ResponseModel::Integer { value } => *value = None,
            ResponseModel::Decimal { value } => *value = None,
        }
        if let ResponseModel::Dropdown { selection_id, .. } = self {
            *selection_id = None;
        }
    }

    /// Validate and store a raw value
    ///
    /// Dropdown models take a choice client id and need the question's
    /// choices; every other variant ignores `choices`.
    pub fn set_value(
        &mut self,
        raw: &str,
        choices: Option<&[Choice]>,
    ) -> Result<(), ResponseError> {
        match self {
            ResponseModel::Generic { value, .. } => {
                *value = Some(raw.to_string());
            }
            ResponseModel::Integer { value } => {
                *value = parse_integer(raw)?;
            }
            ResponseModel::Decimal { value } => {
                *value = parse_decimal(raw)?;
            }
            ResponseModel::Date { value } => {
                *value = parse_date(raw)?;
            }
            ResponseModel::Dropdown {
                value,
                selection_id,
            } => {
                let choices = choices.ok_or(ResponseError::ChoiceListUnavailable)?;
                let choice = choices
                    .iter()
                    .find(|choice| choice.id == raw)
                    .ok_or_else(|| ResponseError::UnknownChoice { id: raw.to_string() })?;
                *value = Some(choice.name.clone());
                *selection_id = Some(choice.id.clone());
            }
        }
        Ok(())
    }
}
