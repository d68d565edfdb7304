//! Survey document collaborator
//!
//! The criterion never owns survey data; it resolves questions and choice
//! lists on demand through [`SurveyLookup`]. [`InMemorySurvey`] is a
//! serde-loadable implementation used by the CLI and tests.

mod memory;

pub use memory::{ChoiceRow, InMemorySurvey, SurveyRow};

use crate::registry::{OperatorCategory, ResponseType};
use serde::{Deserialize, Serialize};

/// Question metadata as seen by skip logic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuestion {
    pub cid: String,
    pub name: String,
    pub question_type: String,
    /// First entry is the default operator for this question
    pub allowed_operator_ids: Vec<u32>,
    pub response_type: ResponseType,
    pub equality_flavor: OperatorCategory,
    pub choice_list: Option<String>,
}

impl ResolvedQuestion {
    pub fn allows_operator(&self, id: u32) -> bool {
        self.allowed_operator_ids.contains(&id)
    }

    pub fn default_operator_id(&self) -> Option<u32> {
        self.allowed_operator_ids.first().copied()
    }
}

/// One selectable option of a choice list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Client-side identifier used by the editor
    pub id: String,
    /// Stable name written into expressions
    pub name: String,
    pub label: String,
}

/// Read access to the survey document
pub trait SurveyLookup {
    /// Look up a question (or group) by client id, searching inside groups
    fn resolve_question(&self, cid: &str) -> Option<ResolvedQuestion>;

    /// Ordered choices of a named list
    fn resolve_choice_list(&self, list_name: &str) -> Option<Vec<Choice>>;

    /// Client id of the question with the given name
    fn find_question_cid(&self, name: &str) -> Option<String>;

    /// Choices attached to a question, if it has a resolvable list
    fn choices_for(&self, question: &ResolvedQuestion) -> Option<Vec<Choice>> {
        question
            .choice_list
            .as_deref()
            .and_then(|list| self.resolve_choice_list(list))
    }
}

/// Derive a stable choice name from its label
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_`, and trims leading and trailing underscores.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_separator = false;

    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Red"), "red");
        assert_eq!(slugify("  Dark   Blue! "), "dark_blue");
        assert_eq!(slugify("Option #2 (new)"), "option_2_new");
        assert_eq!(slugify("already_slugged"), "already_slugged");
        assert_eq!(slugify("???"), "");
    }
}
