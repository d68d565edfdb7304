//! Rebuilds editable criteria from a parsed expression
//!
//! Each parsed criterion is replayed through the same mutation sequence the
//! editor uses (question, operator, response), so the rebuilt rule obeys
//! every criterion invariant.

use crate::criterion::{Criterion, CriterionError};
use crate::factory::SkipLogicFactory;
use crate::logging::{codes, Code};
use crate::operator::encode_operator;
use crate::parser::{ParsedCriterion, ParsedRule, ParsedValue};
use crate::registry::{OperatorCategory, ResponseType};
use crate::rule::SkipLogicRule;
use crate::survey::SurveyLookup;
use crate::{log_error, log_success};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("No question named '{name}' in the survey")]
    UnknownQuestionName { name: String },

    #[error("No operator renders '{symbol}' for question '{question}'")]
    NoMatchingOperator { question: String, symbol: String },

    #[error("Question '{question}' has no choice named '{name}'")]
    UnknownChoiceName { question: String, name: String },

    #[error("Criterion for question '{question}' rejected: {source}")]
    CriterionRejected {
        question: String,
        #[source]
        source: CriterionError,
    },
}

impl BuildError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnknownQuestionName { .. } => codes::builder::UNKNOWN_QUESTION_NAME,
            Self::NoMatchingOperator { .. } => codes::builder::NO_MATCHING_OPERATOR,
            Self::UnknownChoiceName { .. } => codes::builder::UNKNOWN_CHOICE_NAME,
            Self::CriterionRejected { .. } => codes::builder::CRITERION_REJECTED,
        }
    }
}

/// Turn a parsed expression into a rule bound to `survey`
pub fn build_rule(
    parsed: &ParsedRule,
    survey: &impl SurveyLookup,
    factory: &SkipLogicFactory,
) -> Result<SkipLogicRule, BuildError> {
    let mut rule = SkipLogicRule::new(factory.clone()).with_delimiter(parsed.delimiter);

    for parsed_criterion in &parsed.criteria {
        match build_criterion(parsed_criterion, survey, factory) {
            Ok(criterion) => rule.push(criterion),
            Err(error) => {
                log_error!(error.error_code(), "Failed to rebuild criterion",
                    "question" => parsed_criterion.question(),
                    "reason" => error);
                return Err(error);
            }
        }
    }

    log_success!(codes::success::RULE_BUILT, "Rule rebuilt from expression",
        "criteria" => rule.len(),
        "delimiter" => rule.delimiter());
    Ok(rule)
}

fn build_criterion(
    parsed: &ParsedCriterion,
    survey: &impl SurveyLookup,
    factory: &SkipLogicFactory,
) -> Result<Criterion, BuildError> {
    let name = parsed.question();
    let cid = survey
        .find_question_cid(name)
        .ok_or_else(|| BuildError::UnknownQuestionName {
            name: name.to_string(),
        })?;

    let (id, negated) = match_operator(parsed, factory)?;
    let rejected = |source: CriterionError| BuildError::CriterionRejected {
        question: name.to_string(),
        source,
    };

    let mut criterion = factory.create_criterion();
    criterion.change_question(&cid, survey).map_err(rejected)?;
    criterion
        .change_operator(encode_operator(id, negated), survey)
        .map_err(rejected)?;

    let raw = match parsed {
        ParsedCriterion::Comparison {
            value: ParsedValue::Empty,
            ..
        } if criterion.operator().category() == Some(OperatorCategory::Existence) => None,
        ParsedCriterion::Comparison { value, .. } => Some(match value {
            ParsedValue::Empty => String::new(),
            ParsedValue::Text(text) => text.clone(),
            ParsedValue::Number(number) => number.clone(),
            ParsedValue::Date(date) => date.clone(),
        }),
        ParsedCriterion::Selected { choice, .. } => Some(choice.clone()),
    };

    if let Some(raw) = raw {
        let is_dropdown =
            criterion.response().map(|r| r.response_type()) == Some(ResponseType::Dropdown);
        let raw = if is_dropdown {
            choice_id(&cid, name, &raw, survey)?
        } else {
            raw
        };
        criterion.change_response(&raw, survey).map_err(rejected)?;
    }

    Ok(criterion)
}

/// Registry id and negation for a parsed criterion
fn match_operator(
    parsed: &ParsedCriterion,
    factory: &SkipLogicFactory,
) -> Result<(u32, bool), BuildError> {
    let registry = factory.registry();
    let (found, symbol) = match parsed {
        ParsedCriterion::Comparison {
            symbol,
            value: ParsedValue::Empty,
            ..
        } if symbol == "=" || symbol == "!=" => (
            registry.find_by_symbol(OperatorCategory::Existence, symbol),
            symbol.as_str(),
        ),
        ParsedCriterion::Comparison { symbol, .. } => (
            registry.find_by_symbol(OperatorCategory::Equality, symbol),
            symbol.as_str(),
        ),
        ParsedCriterion::Selected { negated, .. } => {
            let symbol = if *negated { "!=" } else { "=" };
            (
                registry.find_by_symbol(OperatorCategory::SelectMultiple, symbol),
                "selected",
            )
        }
    };

    found.ok_or_else(|| BuildError::NoMatchingOperator {
        question: parsed.question().to_string(),
        symbol: symbol.to_string(),
    })
}

/// Map a choice name in an expression back to the editor's choice id
fn choice_id(
    cid: &str,
    question: &str,
    name: &str,
    survey: &impl SurveyLookup,
) -> Result<String, BuildError> {
    survey
        .resolve_question(cid)
        .and_then(|resolved| survey.choices_for(&resolved))
        .and_then(|choices| choices.into_iter().find(|choice| choice.name == name))
        .map(|choice| choice.id)
        .ok_or_else(|| BuildError::UnknownChoiceName {
            question: question.to_string(),
            name: name.to_string(),
        })
}
