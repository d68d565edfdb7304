//! Operator type registry
//!
//! Static metadata describing every skip-logic operator (category, symbols,
//! forced response type) and every question type (allowed operators, equality
//! flavor, response type). Operator ids start at 1; 0 is reserved for the
//! empty operator and never appears in the table.

mod types;

pub use types::{OperatorCategory, ResponseType};

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Affirmative and negated rendering of one operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolPair {
    pub affirmative: &'static str,
    pub negated: &'static str,
}

impl SymbolPair {
    pub fn select(&self, negated: bool) -> &'static str {
        if negated {
            self.negated
        } else {
            self.affirmative
        }
    }
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorTypeDescriptor {
    pub id: u32,
    pub category: OperatorCategory,
    pub label: &'static str,
    pub negated_label: &'static str,
    pub symbols: SymbolPair,
    /// Overrides the question's response type when set
    pub forced_response_type: Option<ResponseType>,
}

impl OperatorTypeDescriptor {
    pub fn label_for(&self, negated: bool) -> &'static str {
        if negated {
            self.negated_label
        } else {
            self.label
        }
    }
}

/// How a question type interacts with skip logic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionTypeProfile {
    pub name: &'static str,
    /// Allowed operator ids; the first one is the default
    pub operators: Vec<u32>,
    /// Operator variant used when an `equality` entry is applied to this type
    pub equality_flavor: OperatorCategory,
    pub response_type: ResponseType,
}

const DEFAULT_PROFILE: &str = "default";

/// Read-only operator and question type tables
#[derive(Debug, Clone)]
pub struct OperatorTypeRegistry {
    operators: Vec<OperatorTypeDescriptor>,
    profiles: HashMap<&'static str, QuestionTypeProfile>,
}

static STANDARD_REGISTRY: OnceLock<Arc<OperatorTypeRegistry>> = OnceLock::new();

impl OperatorTypeRegistry {
    /// Build a registry; descriptor ids must be 1..=n in order
    pub fn new(
        operators: Vec<OperatorTypeDescriptor>,
        profiles: Vec<QuestionTypeProfile>,
    ) -> Self {
        for (index, descriptor) in operators.iter().enumerate() {
            assert_eq!(
                descriptor.id as usize,
                index + 1,
                "operator registry ids must be contiguous from 1"
            );
        }

        let registry = Self {
            operators,
            profiles: profiles.into_iter().map(|p| (p.name, p)).collect(),
        };
        registry.assert_consistent();
        registry
    }

    /// The built-in XLSForm operator table
    pub fn standard() -> Arc<Self> {
        STANDARD_REGISTRY
            .get_or_init(|| Arc::new(Self::build_standard()))
            .clone()
    }

    fn build_standard() -> Self {
        use OperatorCategory::*;

        let operators = vec![
            OperatorTypeDescriptor {
                id: 1,
                category: Existence,
                label: "Was Answered",
                negated_label: "Was not Answered",
                symbols: SymbolPair {
                    affirmative: "!=",
                    negated: "=",
                },
                forced_response_type: Some(ResponseType::Empty),
            },
            OperatorTypeDescriptor {
                id: 2,
                category: Equality,
                label: "=",
                negated_label: "!=",
                symbols: SymbolPair {
                    affirmative: "=",
                    negated: "!=",
                },
                forced_response_type: None,
            },
            OperatorTypeDescriptor {
                id: 3,
                category: Equality,
                label: "Greater Than",
                negated_label: "Less Than",
                symbols: SymbolPair {
                    affirmative: ">",
                    negated: "<",
                },
                forced_response_type: None,
            },
            OperatorTypeDescriptor {
                id: 4,
                category: Equality,
                label: "Greater Than or Equal to",
                negated_label: "Less Than or Equal to",
                symbols: SymbolPair {
                    affirmative: ">=",
                    negated: "<=",
                },
                forced_response_type: None,
            },
            OperatorTypeDescriptor {
                id: 5,
                category: SelectMultiple,
                label: "Was Selected",
                negated_label: "Was not Selected",
                symbols: SymbolPair {
                    affirmative: "=",
                    negated: "!=",
                },
                forced_response_type: Some(ResponseType::Dropdown),
            },
        ];

        let profile = |name, operators: &[u32], equality_flavor, response_type| {
            QuestionTypeProfile {
                name,
                operators: operators.to_vec(),
                equality_flavor,
                response_type,
            }
        };

        let profiles = vec![
            profile(DEFAULT_PROFILE, &[1, 2], Text, ResponseType::Text),
            profile("select_one", &[2, 1], Text, ResponseType::Dropdown),
            profile(
                "select_multiple",
                &[5, 1],
                SelectMultiple,
                ResponseType::Dropdown,
            ),
            profile("integer", &[2, 3, 4, 1], Equality, ResponseType::Integer),
            profile("decimal", &[2, 3, 4, 1], Equality, ResponseType::Decimal),
            profile("date", &[2, 3, 4, 1], Date, ResponseType::Date),
            profile("rank", &[5, 1], SelectMultiple, ResponseType::Dropdown),
            profile("rating", &[5, 1], SelectMultiple, ResponseType::Dropdown),
            profile("geopoint", &[1], Equality, ResponseType::Empty),
        ];

        Self::new(operators, profiles)
    }

    // Profiles referencing unknown operators are a table bug, not bad input
    fn assert_consistent(&self) {
        assert!(
            self.profiles.contains_key(DEFAULT_PROFILE),
            "operator registry requires a '{}' question profile",
            DEFAULT_PROFILE
        );
        for profile in self.profiles.values() {
            assert!(
                !profile.operators.is_empty(),
                "question profile '{}' has no operators",
                profile.name
            );
            for id in &profile.operators {
                assert!(
                    self.get(*id).is_some(),
                    "question profile '{}' references unknown operator {}",
                    profile.name,
                    id
                );
            }
        }
    }

    /// Look up an operator descriptor by id
    pub fn get(&self, id: u32) -> Option<&OperatorTypeDescriptor> {
        let index = (id as usize).checked_sub(1)?;
        self.operators.get(index)
    }

    /// Look up an id known to be valid (e.g. taken from a question profile)
    ///
    /// Panics when the id is not in the table: that is a registry mismatch.
    pub fn descriptor(&self, id: u32) -> &OperatorTypeDescriptor {
        match self.get(id) {
            Some(descriptor) => descriptor,
            None => panic!("operator id {} is not in the operator registry", id),
        }
    }

    pub fn descriptors(&self) -> &[OperatorTypeDescriptor] {
        &self.operators
    }

    /// Find the operator of `category` rendered with `symbol`
    ///
    /// Returns the id and whether the symbol is the negated form.
    pub fn find_by_symbol(&self, category: OperatorCategory, symbol: &str) -> Option<(u32, bool)> {
        self.operators
            .iter()
            .filter(|d| d.category == category)
            .find_map(|d| {
                if d.symbols.affirmative == symbol {
                    Some((d.id, false))
                } else if d.symbols.negated == symbol {
                    Some((d.id, true))
                } else {
                    None
                }
            })
    }

    /// Profile for a question type, falling back to the default profile
    pub fn question_profile(&self, question_type: &str) -> &QuestionTypeProfile {
        self.profiles
            .get(question_type)
            .or_else(|| self.profiles.get(DEFAULT_PROFILE))
            .expect("default question profile checked at construction")
    }

    /// Whether a question type has its own profile
    pub fn has_profile(&self, question_type: &str) -> bool {
        self.profiles.contains_key(question_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ids_are_one_based() {
        let registry = OperatorTypeRegistry::standard();
        assert!(registry.get(0).is_none());
        assert_eq!(registry.get(1).unwrap().category, OperatorCategory::Existence);
        assert_eq!(
            registry.get(5).unwrap().category,
            OperatorCategory::SelectMultiple
        );
        assert!(registry.get(6).is_none());
    }

    #[test]
    fn test_find_by_symbol_respects_category() {
        let registry = OperatorTypeRegistry::standard();

        assert_eq!(
            registry.find_by_symbol(OperatorCategory::Equality, "<="),
            Some((4, true))
        );
        assert_eq!(
            registry.find_by_symbol(OperatorCategory::Existence, "="),
            Some((1, true))
        );
        assert_eq!(
            registry.find_by_symbol(OperatorCategory::SelectMultiple, "="),
            Some((5, false))
        );
        assert_eq!(registry.find_by_symbol(OperatorCategory::Existence, ">"), None);
    }

    #[test]
    fn test_unknown_question_type_uses_default_profile() {
        let registry = OperatorTypeRegistry::standard();
        let profile = registry.question_profile("barcode");

        assert_eq!(profile.name, "default");
        assert_eq!(profile.operators, vec![1, 2]);
        assert_eq!(profile.response_type, ResponseType::Text);
        assert!(!registry.has_profile("barcode"));
    }

    #[test]
    fn test_date_profile() {
        let registry = OperatorTypeRegistry::standard();
        let profile = registry.question_profile("date");

        assert_eq!(profile.equality_flavor, OperatorCategory::Date);
        assert_eq!(profile.response_type, ResponseType::Date);
        assert_eq!(profile.operators[0], 2);
    }

    #[test]
    #[should_panic(expected = "references unknown operator")]
    fn test_profile_with_unknown_operator_panics() {
        OperatorTypeRegistry::new(
            vec![],
            vec![QuestionTypeProfile {
                name: "default",
                operators: vec![9],
                equality_flavor: OperatorCategory::Text,
                response_type: ResponseType::Text,
            }],
        );
    }

    #[test]
    #[should_panic(expected = "not in the operator registry")]
    fn test_descriptor_out_of_range_panics() {
        OperatorTypeRegistry::standard().descriptor(42);
    }
}
