//! Cascading consistency between question, operator and response
//!
//! Every criterion mutation stages its change on a copy, runs [`reconcile`]
//! over it and commits the result. Keeping the fix-up logic in one pure
//! function means the invariants can be tested without going through the
//! mutation entry points.

use super::Criterion;
use crate::factory::SkipLogicFactory;
use crate::log_debug;
use crate::operator::{decode_operator, Operator};
use crate::registry::ResponseType;
use crate::response::ResponseModel;
use crate::survey::{Choice, SurveyLookup};

/// Restore the criterion invariants against the current survey
///
/// - an empty or disallowed operator is replaced by the question's default
/// - a question type change rebuilds the operator from its signed value, so
///   the operator variant follows the new type's equality flavor
/// - a response whose type differs from the required type (forced by the
///   operator, else the question's) is rebuilt, carrying the old value over
///   where the new type accepts it
///
/// A criterion whose question does not resolve is returned unchanged.
pub fn reconcile(criterion: &Criterion, survey: &impl SurveyLookup) -> Criterion {
    let mut next = criterion.clone();
    let Some(question) = criterion
        .question_cid
        .as_deref()
        .and_then(|cid| survey.resolve_question(cid))
    else {
        return next;
    };
    let factory = &criterion.factory;

    let type_changed = criterion.question_type.as_deref() != Some(question.question_type.as_str());
    let list_changed = criterion.choice_list != question.choice_list;

    if next.operator.is_empty() || !question.allows_operator(next.operator.id()) {
        next.operator = match question.default_operator_id() {
            Some(id) => factory.create_operator_for(&question, id, false),
            None => factory.create_empty_operator(),
        };
    } else if type_changed {
        let (id, negated) = decode_operator(next.operator.raw_value());
        next.operator = factory.create_operator_for(&question, id, negated);
    }

    let required = factory.required_response_type(&next.operator, &question);
    let current = criterion.response.as_ref().map(ResponseModel::response_type);
    let stale_selection = required == ResponseType::Dropdown && list_changed;

    if current != Some(required) || stale_selection {
        let choices = survey.choices_for(&question);
        next.response = Some(rebuild_response(
            factory,
            criterion.response.as_ref(),
            required,
            choices.as_deref(),
        ));
    }

    next.question_type = Some(question.question_type);
    next.choice_list = question.choice_list;
    next
}

/// Fresh response model of `required` type seeded from `previous`
///
/// Dropdowns keep the previous selection when it is still listed, then try
/// a choice whose name matches the previous value, and fall back to the
/// first choice. Other types re-validate the previous expression value and
/// drop it when the new type rejects it. A wrapped date literal is never
/// carried into a text model.
fn rebuild_response(
    factory: &SkipLogicFactory,
    previous: Option<&ResponseModel>,
    required: ResponseType,
    choices: Option<&[Choice]>,
) -> ResponseModel {
    let mut model = factory.create_response_model(required);

    if required == ResponseType::Dropdown {
        let Some(choices) = choices else {
            return model;
        };
        let kept = previous
            .and_then(ResponseModel::selection_id)
            .filter(|id| choices.iter().any(|choice| choice.id == *id));
        let by_name = || {
            let name = previous.and_then(ResponseModel::value)?;
            choices
                .iter()
                .find(|choice| choice.name == name)
                .map(|choice| choice.id.as_str())
        };
        let selection = kept
            .or_else(by_name)
            .or_else(|| choices.first().map(|choice| choice.id.as_str()));

        if let Some(id) = selection {
            if let Err(error) = model.set_value(id, Some(choices)) {
                log_debug!(code = error.error_code(), "Dropdown selection not restored",
                    "selection" => id);
            }
        }
        return model;
    }

    let carried = previous
        .and_then(ResponseModel::value)
        .filter(|value| !(required == ResponseType::Text && value.contains("date(")));
    if let Some(value) = carried {
        if let Err(error) = model.set_value(&value, None) {
            log_debug!(code = error.error_code(), "Previous response discarded",
                "value" => value,
                "response_type" => required);
        }
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{ChoiceRow, InMemorySurvey, SurveyRow};

    fn survey() -> InMemorySurvey {
        InMemorySurvey::new()
            .with_row(SurveyRow::question("c1", "age", "integer"))
            .with_row(SurveyRow::question("c2", "dob", "date"))
            .with_row(SurveyRow::question("c3", "weight", "decimal"))
            .with_row(SurveyRow::select("c4", "fav", "select_one", "colors"))
            .with_choices(
                "colors",
                vec![ChoiceRow::new("k1", "Red"), ChoiceRow::new("k2", "Blue")],
            )
    }

    fn with_question(cid: &str) -> Criterion {
        let mut criterion = SkipLogicFactory::standard().create_criterion();
        criterion.question_cid = Some(cid.to_string());
        criterion
    }

    #[test]
    fn test_unresolved_question_is_left_alone() {
        let survey = survey();
        let criterion = with_question("missing");
        let reconciled = reconcile(&criterion, &survey);

        assert!(reconciled.operator().is_empty());
        assert!(reconciled.response().is_none());
        assert!(reconciled.question_type.is_none());
    }

    #[test]
    fn test_empty_operator_takes_question_default() {
        let survey = survey();
        let reconciled = reconcile(&with_question("c1"), &survey);

        assert_eq!(reconciled.operator().id(), 2);
        assert_eq!(reconciled.operator().symbol(), "=");
        assert!(matches!(reconciled.operator(), Operator::Basic(_)));
        assert_eq!(
            reconciled.response().map(ResponseModel::response_type),
            Some(ResponseType::Integer)
        );
        assert_eq!(reconciled.question_type.as_deref(), Some("integer"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let survey = survey();
        let once = reconcile(&with_question("c4"), &survey);
        let twice = reconcile(&once, &survey);

        assert_eq!(once.operator(), twice.operator());
        assert_eq!(once.response(), twice.response());
    }

    #[test]
    fn test_type_change_rebuilds_operator_variant() {
        let survey = survey();
        let mut criterion = reconcile(&with_question("c1"), &survey);
        criterion.operator = criterion
            .factory
            .create_operator_for(&survey.resolve_question("c1").unwrap(), 4, true);

        criterion.question_cid = Some("c2".to_string());
        let reconciled = reconcile(&criterion, &survey);

        assert!(matches!(reconciled.operator(), Operator::Date(_)));
        assert_eq!(reconciled.operator().raw_value(), -4);
    }

    #[test]
    fn test_rebuild_carries_compatible_values() {
        let factory = SkipLogicFactory::standard();
        let mut integer = factory.create_response_model(ResponseType::Integer);
        integer.set_value("18", None).unwrap();

        let decimal = rebuild_response(&factory, Some(&integer), ResponseType::Decimal, None);
        assert_eq!(decimal, ResponseModel::Decimal { value: Some(18.0) });

        let date = rebuild_response(&factory, Some(&integer), ResponseType::Date, None);
        assert_eq!(date, ResponseModel::Date { value: None });
    }

    #[test]
    fn test_dropdown_rebuild_falls_back_to_first_choice() {
        let survey = survey();
        let choices = survey.resolve_choice_list("colors").unwrap();
        let factory = SkipLogicFactory::standard();

        let fresh = rebuild_response(&factory, None, ResponseType::Dropdown, Some(&choices));
        assert_eq!(fresh.selection_id(), Some("k1"));
        assert_eq!(fresh.value().as_deref(), Some("red"));

        let mut previous = factory.create_response_model(ResponseType::Dropdown);
        previous.set_value("k2", Some(&choices)).unwrap();
        let kept = rebuild_response(
            &factory,
            Some(&previous),
            ResponseType::Dropdown,
            Some(&choices),
        );
        assert_eq!(kept.selection_id(), Some("k2"));

        let unlisted = rebuild_response(&factory, None, ResponseType::Dropdown, None);
        assert!(!unlisted.has_value());
    }

    #[test]
    fn test_dropdown_rebuild_matches_carried_choice_name() {
        let survey = survey();
        let choices = survey.resolve_choice_list("colors").unwrap();
        let factory = SkipLogicFactory::standard();

        let mut existence = factory.create_response_model(ResponseType::Empty);
        existence.set_value("blue", None).unwrap();

        let restored = rebuild_response(
            &factory,
            Some(&existence),
            ResponseType::Dropdown,
            Some(&choices),
        );
        assert_eq!(restored.selection_id(), Some("k2"));
        assert_eq!(restored.value().as_deref(), Some("blue"));
    }

    #[test]
    fn test_wrapped_date_is_not_carried_into_text() {
        let factory = SkipLogicFactory::standard();
        let mut date = factory.create_response_model(ResponseType::Date);
        date.set_value("2024-01-05", None).unwrap();

        let text = rebuild_response(&factory, Some(&date), ResponseType::Text, None);
        assert_eq!(text.response_type(), ResponseType::Text);
        assert!(!text.has_value());
    }
}
