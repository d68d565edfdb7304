//! Skip-logic rule: criteria joined by a single delimiter

use crate::criterion::Criterion;
use crate::factory::SkipLogicFactory;
use crate::log_debug;
use crate::logging::codes;
use crate::survey::SurveyLookup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical connective between criteria
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    And,
    Or,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::And => "and",
            Delimiter::Or => "or",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Delimiter::And),
            "or" => Ok(Delimiter::Or),
            other => Err(format!("unknown delimiter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkipLogicRule {
    delimiter: Delimiter,
    criteria: Vec<Criterion>,
    #[serde(skip)]
    factory: SkipLogicFactory,
}

impl SkipLogicRule {
    pub fn new(factory: SkipLogicFactory) -> Self {
        Self {
            delimiter: Delimiter::default(),
            criteria: Vec::new(),
            factory,
        }
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter = delimiter;
    }

    /// Append an empty criterion and hand it back for editing
    pub fn add_criterion(&mut self) -> &mut Criterion {
        let index = self.criteria.len();
        self.criteria.push(self.factory.create_criterion());
        &mut self.criteria[index]
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    /// Remove the criterion at `index`; out of range is a no-op
    pub fn remove(&mut self, index: usize) -> Option<Criterion> {
        (index < self.criteria.len()).then(|| self.criteria.remove(index))
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Criterion> {
        self.criteria.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Join every complete criterion with the delimiter
    ///
    /// Incomplete criteria are skipped; a rule with none complete renders
    /// as `""`.
    pub fn serialize(&self, survey: &impl SurveyLookup) -> String {
        let separator = format!(" {} ", self.delimiter);
        let parts: Vec<String> = self
            .criteria
            .iter()
            .map(|criterion| criterion.serialize(survey))
            .filter(|expression| !expression.is_empty())
            .collect();

        let expression = parts.join(&separator);
        log_debug!(code = codes::success::RULE_SERIALIZED, "Rule serialized",
            "criteria" => self.criteria.len(),
            "complete" => parts.len());
        expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{InMemorySurvey, SurveyRow};

    fn survey() -> InMemorySurvey {
        InMemorySurvey::new()
            .with_row(SurveyRow::question("c1", "age", "integer"))
            .with_row(SurveyRow::question("c2", "photo", "image"))
    }

    #[test]
    fn test_delimiter_parsing() {
        assert_eq!("AND".parse::<Delimiter>(), Ok(Delimiter::And));
        assert_eq!(" or ".parse::<Delimiter>(), Ok(Delimiter::Or));
        assert!("xor".parse::<Delimiter>().is_err());
    }

    #[test]
    fn test_empty_rule_serializes_to_nothing() {
        let survey = survey();
        let mut rule = SkipLogicRule::new(SkipLogicFactory::standard());
        assert_eq!(rule.serialize(&survey), "");

        rule.add_criterion();
        assert_eq!(rule.serialize(&survey), "");
    }

    #[test]
    fn test_joins_complete_criteria() {
        let survey = survey();
        let mut rule = SkipLogicRule::new(SkipLogicFactory::standard());

        let age = rule.add_criterion();
        age.change_question("c1", &survey).unwrap();
        age.change_operator(3, &survey).unwrap();
        age.change_response("18", &survey).unwrap();

        rule.add_criterion();
        rule.add_criterion().change_question("c2", &survey).unwrap();

        assert_eq!(rule.serialize(&survey), "${age} > 18 and ${photo} != ''");

        rule.set_delimiter(Delimiter::Or);
        assert_eq!(rule.serialize(&survey), "${age} > 18 or ${photo} != ''");
    }

    #[test]
    fn test_remove_by_index() {
        let survey = survey();
        let mut rule = SkipLogicRule::new(SkipLogicFactory::standard());
        rule.add_criterion().change_question("c2", &survey).unwrap();
        rule.add_criterion();

        assert!(rule.remove(5).is_none());
        assert_eq!(rule.len(), 2);

        let removed = rule.remove(0).unwrap();
        assert_eq!(removed.question_cid(), Some("c2"));
        assert_eq!(rule.len(), 1);
        assert_eq!(rule.serialize(&survey), "");
    }
}
