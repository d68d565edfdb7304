//! Criterion: one question, operator and response triple
//!
//! A criterion is driven through [`Criterion::change_question`],
//! [`Criterion::change_operator`] and [`Criterion::change_response`]. Each
//! mutation is staged on a copy, passed through [`reconcile`] and only then
//! committed, so a rejected call leaves the criterion exactly as it was.

mod error;
mod reconcile;

pub use error::{CriterionError, CriterionResult};
pub use reconcile::reconcile;

use crate::factory::SkipLogicFactory;
use crate::logging::codes;
use crate::operator::{decode_operator, Operator};
use crate::response::ResponseModel;
use crate::survey::{ResolvedQuestion, SurveyLookup};
use crate::{log_debug, log_warning};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Criterion {
    question_cid: Option<String>,
    /// Question type seen by the last reconcile
    #[serde(skip_serializing_if = "Option::is_none")]
    question_type: Option<String>,
    /// Choice list seen by the last reconcile
    #[serde(skip_serializing_if = "Option::is_none")]
    choice_list: Option<String>,
    operator: Operator,
    response: Option<ResponseModel>,
    #[serde(skip)]
    factory: SkipLogicFactory,
}

impl Criterion {
    /// Empty criterion; prefer [`SkipLogicFactory::create_criterion`]
    pub fn new(factory: SkipLogicFactory) -> Self {
        Self {
            question_cid: None,
            question_type: None,
            choice_list: None,
            operator: factory.create_empty_operator(),
            response: None,
            factory,
        }
    }

    pub fn question_cid(&self) -> Option<&str> {
        self.question_cid.as_deref()
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn response(&self) -> Option<&ResponseModel> {
        self.response.as_ref()
    }

    /// Point the criterion at another question
    ///
    /// The operator survives when the new question allows it; otherwise the
    /// question's default operator takes over.
    pub fn change_question(
        &mut self,
        cid: &str,
        survey: &impl SurveyLookup,
    ) -> CriterionResult<()> {
        let question = match survey.resolve_question(cid) {
            Some(question) => question,
            None => return Err(self.rejected(CriterionError::question_not_found(cid))),
        };
        if question.allowed_operator_ids.is_empty() {
            return Err(self.rejected(CriterionError::QuestionHasNoOperators {
                cid: question.cid,
                question_type: question.question_type,
            }));
        }

        let mut staged = self.clone();
        staged.question_cid = Some(cid.to_string());
        self.commit(reconcile(&staged, survey));
        Ok(())
    }

    /// Apply a signed editor operator value (negative means negated)
    pub fn change_operator(&mut self, raw: i32, survey: &impl SurveyLookup) -> CriterionResult<()> {
        let question = self.current_question(survey)?;
        let (id, negated) = decode_operator(raw);

        if !question.allows_operator(id) || self.factory.registry().get(id).is_none() {
            return Err(self.rejected(CriterionError::operator_not_allowed(
                &question.cid,
                &question.question_type,
                raw,
            )));
        }

        let mut staged = self.clone();
        staged.operator = self.factory.create_operator_for(&question, id, negated);
        self.commit(reconcile(&staged, survey));
        Ok(())
    }

    /// Store a response value; dropdowns take a choice client id
    pub fn change_response(
        &mut self,
        raw: &str,
        survey: &impl SurveyLookup,
    ) -> CriterionResult<()> {
        let question = self.current_question(survey)?;
        let choices = survey.choices_for(&question);

        let mut staged = reconcile(self, survey);
        if let Some(response) = staged.response.as_mut() {
            if let Err(error) = response.set_value(raw, choices.as_deref()) {
                log_debug!(code = error.error_code(), "Response value rejected",
                    "cid" => question.cid,
                    "value" => raw);
                return Err(error.into());
            }
        }
        self.commit(reconcile(&staged, survey));
        Ok(())
    }

    /// Whether [`Criterion::serialize`] would produce an expression
    pub fn is_complete(&self, survey: &impl SurveyLookup) -> bool {
        !self.serialize(survey).is_empty()
    }

    /// Render the criterion, or `""` while it is incomplete
    pub fn serialize(&self, survey: &impl SurveyLookup) -> String {
        let Some(question) = self
            .question_cid
            .as_deref()
            .and_then(|cid| survey.resolve_question(cid))
        else {
            return String::new();
        };
        if self.operator.is_empty() || !question.allows_operator(self.operator.id()) {
            return String::new();
        }
        let Some(response) = self.response.as_ref().filter(|response| response.is_complete()) else {
            return String::new();
        };

        let value = response.value().unwrap_or_default();
        let expression = self.operator.serialize(&question.name, &value);
        log_debug!(code = codes::success::CRITERION_SERIALIZED, "Criterion serialized",
            "cid" => question.cid,
            "expression" => expression);
        expression
    }

    fn current_question(&self, survey: &impl SurveyLookup) -> CriterionResult<ResolvedQuestion> {
        let Some(cid) = self.question_cid.as_deref() else {
            return Err(self.rejected(CriterionError::NoQuestionSelected));
        };
        survey
            .resolve_question(cid)
            .ok_or_else(|| self.rejected(CriterionError::question_not_found(cid)))
    }

    fn commit(&mut self, next: Criterion) {
        *self = next;
    }

    fn rejected(&self, error: CriterionError) -> CriterionError {
        log_warning!(code = error.error_code(), "Criterion change rejected",
            "cid" => self.question_cid.as_deref().unwrap_or("-"),
            "reason" => error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResponseType;
    use crate::response::ResponseError;
    use crate::survey::{ChoiceRow, InMemorySurvey, SurveyRow};
    use assert_matches::assert_matches;

    fn survey() -> InMemorySurvey {
        InMemorySurvey::new()
            .with_row(SurveyRow::question("c1", "age", "integer"))
            .with_row(SurveyRow::question("c2", "dob", "date"))
            .with_row(SurveyRow::question("c3", "surname", "text"))
            .with_row(SurveyRow::question("c4", "photo", "image"))
            .with_row(SurveyRow::question("c5", "weight", "decimal"))
            .with_row(SurveyRow::select("c6", "colors", "select_multiple", "colors"))
            .with_row(SurveyRow::select("c7", "fav", "select_one", "colors"))
            .with_row(SurveyRow::select("c8", "size", "select_one", "sizes"))
            .with_choices(
                "colors",
                vec![ChoiceRow::new("k1", "Red"), ChoiceRow::new("k2", "Blue")],
            )
            .with_choices(
                "sizes",
                vec![ChoiceRow::named("s1", "sm", "Small"), ChoiceRow::named("s2", "lg", "Large")],
            )
    }

    fn criterion() -> Criterion {
        SkipLogicFactory::standard().create_criterion()
    }

    fn snapshot(criterion: &Criterion) -> serde_json::Value {
        serde_json::to_value(criterion).unwrap()
    }

    #[test]
    fn test_empty_criterion_serializes_to_nothing() {
        let survey = survey();
        let criterion = criterion();
        assert_eq!(criterion.serialize(&survey), "");
        assert!(!criterion.is_complete(&survey));
    }

    #[test]
    fn test_unknown_question_is_rejected_without_change() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c1", &survey).unwrap();
        let before = snapshot(&criterion);

        let err = criterion.change_question("nope", &survey).unwrap_err();
        assert_matches!(err, CriterionError::QuestionNotFound { ref cid } if cid == "nope");
        assert_eq!(snapshot(&criterion), before);
    }

    #[test]
    fn test_question_selects_default_operator_and_response() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c1", &survey).unwrap();

        assert_eq!(criterion.question_cid(), Some("c1"));
        assert_eq!(criterion.operator().raw_value(), 2);
        assert_eq!(
            criterion.response().map(ResponseModel::response_type),
            Some(ResponseType::Integer)
        );
        assert_eq!(criterion.serialize(&survey), "");
    }

    #[test]
    fn test_full_integer_flow() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c1", &survey).unwrap();
        criterion.change_operator(4, &survey).unwrap();
        criterion.change_response("18", &survey).unwrap();

        assert_eq!(criterion.serialize(&survey), "${age} >= 18");

        criterion.change_operator(-3, &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${age} < 18");
    }

    #[test]
    fn test_operator_requires_question() {
        let survey = survey();
        let mut criterion = criterion();
        assert_matches!(
            criterion.change_operator(2, &survey),
            Err(CriterionError::NoQuestionSelected)
        );
        assert!(criterion.operator().is_empty());
    }

    #[test]
    fn test_disallowed_operator_is_ignored() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c3", &survey).unwrap();
        criterion.change_operator(2, &survey).unwrap();
        criterion.change_response("Smith", &survey).unwrap();
        let before = snapshot(&criterion);

        assert_matches!(
            criterion.change_operator(3, &survey),
            Err(CriterionError::OperatorNotAllowed { operator: 3, .. })
        );
        assert_matches!(
            criterion.change_operator(99, &survey),
            Err(CriterionError::OperatorNotAllowed { .. })
        );
        assert_eq!(snapshot(&criterion), before);
        assert_eq!(criterion.serialize(&survey), "${surname} = 'Smith'");
    }

    #[test]
    fn test_text_escaping() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c3", &survey).unwrap();
        criterion.change_operator(-2, &survey).unwrap();
        criterion.change_response("O'Brien", &survey).unwrap();

        assert_eq!(criterion.serialize(&survey), "${surname} != 'O\\'Brien'");
    }

    #[test]
    fn test_integer_to_date_question_discards_value() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c1", &survey).unwrap();
        criterion.change_operator(3, &survey).unwrap();
        criterion.change_response("18", &survey).unwrap();

        criterion.change_question("c2", &survey).unwrap();

        assert_eq!(criterion.response(), Some(&ResponseModel::Date { value: None }));
        assert!(matches!(criterion.operator(), Operator::Date(_)));
        assert_eq!(criterion.operator().raw_value(), 3);
        assert_eq!(criterion.serialize(&survey), "");

        criterion.change_response("2024-01-05", &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${dob} > date('2024-01-05')");
    }

    #[test]
    fn test_same_type_question_change_keeps_operator_and_value() {
        let survey = InMemorySurvey::new()
            .with_row(SurveyRow::question("a", "height", "integer"))
            .with_row(SurveyRow::question("b", "width", "integer"));
        let mut criterion = criterion();
        criterion.change_question("a", &survey).unwrap();
        criterion.change_operator(-4, &survey).unwrap();
        criterion.change_response("7", &survey).unwrap();

        criterion.change_question("b", &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${width} <= 7");
    }

    #[test]
    fn test_existence_ignores_response_value() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c4", &survey).unwrap();
        criterion.change_response("something", &survey).unwrap();

        criterion.change_operator(1, &survey).unwrap();
        assert_eq!(
            criterion.response().map(ResponseModel::response_type),
            Some(ResponseType::Empty)
        );
        assert_eq!(criterion.serialize(&survey), "${photo} != ''");

        criterion.change_operator(-1, &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${photo} = ''");
        assert!(criterion.operator().is_negated());
    }

    #[test]
    fn test_leaving_existence_restores_previous_text() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c3", &survey).unwrap();
        criterion.change_operator(2, &survey).unwrap();
        criterion.change_response("Smith", &survey).unwrap();
        criterion.change_operator(1, &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${surname} != ''");
        criterion.change_operator(2, &survey).unwrap();

        assert_eq!(criterion.serialize(&survey), "${surname} = 'Smith'");
    }

    #[test]
    fn test_decimal_rejection_is_atomic() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c5", &survey).unwrap();
        criterion.change_response("1,234.56", &survey).unwrap();
        let before = snapshot(&criterion);

        assert_matches!(
            criterion.change_response("abc", &survey),
            Err(CriterionError::Response(ResponseError::InvalidDecimal { .. }))
        );
        assert_eq!(snapshot(&criterion), before);
        assert_eq!(criterion.serialize(&survey), "${weight} = 1234.56");
    }

    #[test]
    fn test_select_multiple_defaults_to_first_choice() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c6", &survey).unwrap();

        assert_eq!(criterion.serialize(&survey), "selected(${colors}, 'red')");

        criterion.change_operator(-5, &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "not(selected(${colors}, 'red'))");

        criterion.change_response("k2", &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "not(selected(${colors}, 'blue'))");
    }

    #[test]
    fn test_refreshed_choice_list_keeps_previous_value() {
        let mut survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c7", &survey).unwrap();
        criterion.change_response("k2", &survey).unwrap();
        assert_eq!(criterion.serialize(&survey), "${fav} = 'blue'");

        survey.set_choices(
            "colors",
            vec![ChoiceRow::new("k1", "Red"), ChoiceRow::new("k3", "Blue")],
        );
        assert_matches!(
            criterion.change_response("k2", &survey),
            Err(CriterionError::Response(ResponseError::UnknownChoice { .. }))
        );
        assert_eq!(criterion.response().and_then(ResponseModel::value).as_deref(), Some("blue"));
        assert_eq!(criterion.response().and_then(ResponseModel::selection_id), Some("k2"));
    }

    #[test]
    fn test_switching_choice_lists_reselects() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c7", &survey).unwrap();
        criterion.change_response("k2", &survey).unwrap();

        criterion.change_question("c8", &survey).unwrap();
        assert_eq!(criterion.response().and_then(ResponseModel::selection_id), Some("s1"));
        assert_eq!(criterion.serialize(&survey), "${size} = 'sm'");
    }

    #[test]
    fn test_serialize_is_empty_once_question_disappears() {
        let survey = survey();
        let mut criterion = criterion();
        criterion.change_question("c3", &survey).unwrap();
        criterion.change_response("x", &survey).unwrap();

        let emptied = InMemorySurvey::new();
        assert_eq!(criterion.serialize(&emptied), "");
        assert_matches!(
            criterion.change_response("y", &emptied),
            Err(CriterionError::QuestionNotFound { .. })
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CriterionError::NoQuestionSelected.error_code(),
            codes::criterion::NO_QUESTION_SELECTED
        );
        let wrapped: CriterionError = ResponseError::ChoiceListUnavailable.into();
        assert_eq!(wrapped.error_code(), codes::response::CHOICE_LIST_UNAVAILABLE);
    }
}
