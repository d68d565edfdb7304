//! Single construction site for operators, response models and criteria

use crate::criterion::Criterion;
use crate::operator::{Comparator, Operator};
use crate::registry::{OperatorCategory, OperatorTypeRegistry, ResponseType};
use crate::response::ResponseModel;
use crate::survey::ResolvedQuestion;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SkipLogicFactory {
    registry: Arc<OperatorTypeRegistry>,
}

impl SkipLogicFactory {
    pub fn new(registry: Arc<OperatorTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Factory over the built-in operator table
    pub fn standard() -> Self {
        Self::new(OperatorTypeRegistry::standard())
    }

    pub fn registry(&self) -> &OperatorTypeRegistry {
        &self.registry
    }

    /// Build the operator variant for `category`
    ///
    /// Negation is derived from `symbol`: existence operators are negated by
    /// `=`, every other category by `!=`, `<` or `<=`.
    pub fn create_operator(&self, category: OperatorCategory, symbol: &str, id: u32) -> Operator {
        assert!(id != 0, "operator id 0 is reserved for the empty operator");

        let is_negated = match category {
            OperatorCategory::Existence => symbol == "=",
            _ => matches!(symbol, "!=" | "<" | "<="),
        };
        let comparator = Comparator {
            id,
            symbol: symbol.to_string(),
            is_negated,
        };

        match category {
            OperatorCategory::Equality => Operator::Basic(comparator),
            OperatorCategory::Text => Operator::Text(comparator),
            OperatorCategory::Date => Operator::Date(comparator),
            OperatorCategory::Existence => Operator::Existence(comparator),
            OperatorCategory::SelectMultiple => Operator::SelectMultiple(comparator),
        }
    }

    pub fn create_empty_operator(&self) -> Operator {
        Operator::Empty
    }

    /// Resolve a registry id against a question and build the operator
    ///
    /// `equality` entries take the question's equality flavor.
    pub fn create_operator_for(
        &self,
        question: &ResolvedQuestion,
        id: u32,
        negated: bool,
    ) -> Operator {
        let descriptor = self.registry.descriptor(id);
        let category = match descriptor.category {
            OperatorCategory::Equality => question.equality_flavor,
            other => other,
        };
        self.create_operator(category, descriptor.symbols.select(negated), id)
    }

    pub fn create_response_model(&self, response_type: ResponseType) -> ResponseModel {
        match response_type {
            ResponseType::Integer => ResponseModel::Integer { value: None },
            ResponseType::Decimal => ResponseModel::Decimal { value: None },
            ResponseType::Date => ResponseModel::Date { value: None },
            ResponseType::Dropdown => ResponseModel::Dropdown {
                value: None,
                selection_id: None,
            },
            ResponseType::Text | ResponseType::Empty => ResponseModel::Generic {
                response_type,
                value: None,
            },
        }
    }

    /// Response type a criterion needs for `operator` on `question`
    pub fn required_response_type(
        &self,
        operator: &Operator,
        question: &ResolvedQuestion,
    ) -> ResponseType {
        if operator.is_empty() {
            return question.response_type;
        }
        self.registry
            .descriptor(operator.id())
            .forced_response_type
            .unwrap_or(question.response_type)
    }

    /// New criterion with no question, operator or value
    pub fn create_criterion(&self) -> Criterion {
        Criterion::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(
        question_type: &str,
        flavor: OperatorCategory,
        response: ResponseType,
    ) -> ResolvedQuestion {
        ResolvedQuestion {
            cid: "c1".to_string(),
            name: "q".to_string(),
            question_type: question_type.to_string(),
            allowed_operator_ids: vec![1, 2, 3, 4, 5],
            response_type: response,
            equality_flavor: flavor,
            choice_list: None,
        }
    }

    #[test]
    fn test_equality_entries_take_question_flavor() {
        let factory = SkipLogicFactory::standard();

        let text = question("text", OperatorCategory::Text, ResponseType::Text);
        assert!(matches!(factory.create_operator_for(&text, 2, false), Operator::Text(_)));

        let date = question("date", OperatorCategory::Date, ResponseType::Date);
        let op = factory.create_operator_for(&date, 4, true);
        assert!(matches!(op, Operator::Date(_)));
        assert_eq!(op.symbol(), "<=");
        assert!(op.is_negated());

        let integer = question("integer", OperatorCategory::Equality, ResponseType::Integer);
        assert!(matches!(factory.create_operator_for(&integer, 3, false), Operator::Basic(_)));
    }

    #[test]
    fn test_existence_negation_follows_equals_sign() {
        let factory = SkipLogicFactory::standard();
        let q = question("text", OperatorCategory::Text, ResponseType::Text);

        let answered = factory.create_operator_for(&q, 1, false);
        assert_eq!(answered.symbol(), "!=");
        assert!(!answered.is_negated());

        let unanswered = factory.create_operator_for(&q, 1, true);
        assert_eq!(unanswered.symbol(), "=");
        assert!(unanswered.is_negated());
    }

    #[test]
    fn test_forced_response_types() {
        let factory = SkipLogicFactory::standard();
        let q = question("integer", OperatorCategory::Equality, ResponseType::Integer);

        let existence = factory.create_operator_for(&q, 1, false);
        assert_eq!(factory.required_response_type(&existence, &q), ResponseType::Empty);

        let greater = factory.create_operator_for(&q, 3, false);
        assert_eq!(factory.required_response_type(&greater, &q), ResponseType::Integer);

        let selected = factory.create_operator_for(&q, 5, false);
        assert_eq!(factory.required_response_type(&selected, &q), ResponseType::Dropdown);
    }

    #[test]
    fn test_response_model_variants() {
        let factory = SkipLogicFactory::standard();
        assert_eq!(
            factory.create_response_model(ResponseType::Text).response_type(),
            ResponseType::Text
        );
        assert!(matches!(
            factory.create_response_model(ResponseType::Decimal),
            ResponseModel::Decimal { value: None }
        ));
    }

    #[test]
    #[should_panic(expected = "reserved for the empty operator")]
    fn test_zero_id_is_a_programming_error() {
        SkipLogicFactory::standard().create_operator(OperatorCategory::Equality, "=", 0);
    }
}
