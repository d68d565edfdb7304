use super::{slugify, Choice, ResolvedQuestion, SurveyLookup};
use crate::registry::OperatorTypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A question or group row in the survey document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub cid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub row_type: String,
    /// Choice list name for select questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_from: Option<String>,
    /// Nested rows when this row is a group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SurveyRow>,
}

impl SurveyRow {
    pub fn question(cid: &str, name: &str, row_type: &str) -> Self {
        Self {
            cid: cid.to_string(),
            name: name.to_string(),
            row_type: row_type.to_string(),
            select_from: None,
            children: Vec::new(),
        }
    }

    pub fn select(cid: &str, name: &str, row_type: &str, list_name: &str) -> Self {
        Self {
            select_from: Some(list_name.to_string()),
            ..Self::question(cid, name, row_type)
        }
    }

    pub fn group(cid: &str, name: &str, children: Vec<SurveyRow>) -> Self {
        Self {
            children,
            ..Self::question(cid, name, "group")
        }
    }

    fn find(&self, predicate: &dyn Fn(&SurveyRow) -> bool) -> Option<&SurveyRow> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }
}

/// Choice list entry as stored in the document; `name` may be omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRow {
    pub cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub label: String,
}

impl ChoiceRow {
    pub fn new(cid: &str, label: &str) -> Self {
        Self {
            cid: cid.to_string(),
            name: None,
            label: label.to_string(),
        }
    }

    pub fn named(cid: &str, name: &str, label: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(cid, label)
        }
    }

    fn to_choice(&self) -> Choice {
        let name = match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let slug = slugify(&self.label);
                if slug.is_empty() {
                    self.cid.clone()
                } else {
                    slug
                }
            }
        };

        Choice {
            id: self.cid.clone(),
            name,
            label: self.label.clone(),
        }
    }
}

/// Survey document held in memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemorySurvey {
    #[serde(default)]
    pub rows: Vec<SurveyRow>,
    #[serde(default)]
    pub choices: HashMap<String, Vec<ChoiceRow>>,
    #[serde(skip, default = "OperatorTypeRegistry::standard")]
    registry: Arc<OperatorTypeRegistry>,
}

impl Default for InMemorySurvey {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySurvey {
    pub fn new() -> Self {
        Self::with_registry(OperatorTypeRegistry::standard())
    }

    pub fn with_registry(registry: Arc<OperatorTypeRegistry>) -> Self {
        Self {
            rows: Vec::new(),
            choices: HashMap::new(),
            registry,
        }
    }

    /// Parse a JSON survey document
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn with_row(mut self, row: SurveyRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_choices(mut self, list_name: &str, choices: Vec<ChoiceRow>) -> Self {
        self.set_choices(list_name, choices);
        self
    }

    /// Replace a choice list (e.g. after the editor reloads it)
    pub fn set_choices(&mut self, list_name: &str, choices: Vec<ChoiceRow>) {
        self.choices.insert(list_name.to_string(), choices);
    }

    fn find_row(&self, predicate: &dyn Fn(&SurveyRow) -> bool) -> Option<&SurveyRow> {
        self.rows.iter().find_map(|row| row.find(predicate))
    }
}

impl SurveyLookup for InMemorySurvey {
    fn resolve_question(&self, cid: &str) -> Option<ResolvedQuestion> {
        let row = self.find_row(&|row: &SurveyRow| row.cid == cid)?;
        let profile = self.registry.question_profile(&row.row_type);

        Some(ResolvedQuestion {
            cid: row.cid.clone(),
            name: row.name.clone(),
            question_type: row.row_type.clone(),
            allowed_operator_ids: profile.operators.clone(),
            response_type: profile.response_type,
            equality_flavor: profile.equality_flavor,
            choice_list: row.select_from.clone(),
        })
    }

    fn resolve_choice_list(&self, list_name: &str) -> Option<Vec<Choice>> {
        self.choices
            .get(list_name)
            .map(|rows| rows.iter().map(ChoiceRow::to_choice).collect())
    }

    fn find_question_cid(&self, name: &str) -> Option<String> {
        self.find_row(&|row: &SurveyRow| row.name == name)
            .map(|row| row.cid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ResponseType;

    fn sample() -> InMemorySurvey {
        InMemorySurvey::from_json(
            r#"{
                "rows": [
                    {"cid": "c1", "name": "age", "type": "integer"},
                    {"cid": "g1", "name": "household", "type": "begin_group", "children": [
                        {"cid": "c2", "name": "colors", "type": "select_multiple", "select_from": "colors"}
                    ]}
                ],
                "choices": {
                    "colors": [
                        {"cid": "k1", "label": "Dark Red"},
                        {"cid": "k2", "name": "blue", "label": "Blue"}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolves_questions_inside_groups() {
        let survey = sample();
        let question = survey.resolve_question("c2").unwrap();

        assert_eq!(question.name, "colors");
        assert_eq!(question.allowed_operator_ids, vec![5, 1]);
        assert_eq!(question.response_type, ResponseType::Dropdown);
        assert_eq!(question.choice_list.as_deref(), Some("colors"));
        assert!(survey.resolve_question("missing").is_none());
    }

    #[test]
    fn test_choice_names_default_to_slugified_label() {
        let survey = sample();
        let choices = survey.resolve_choice_list("colors").unwrap();

        assert_eq!(choices[0].name, "dark_red");
        assert_eq!(choices[1].name, "blue");
        assert_eq!(choices[0].id, "k1");
    }

    #[test]
    fn test_find_question_cid_by_name() {
        let survey = sample();
        assert_eq!(survey.find_question_cid("colors").as_deref(), Some("c2"));
        assert_eq!(survey.find_question_cid("household").as_deref(), Some("g1"));
        assert!(survey.find_question_cid("nobody").is_none());
    }

    #[test]
    fn test_unlabelled_choice_falls_back_to_cid() {
        let survey = InMemorySurvey::new().with_choices("odd", vec![ChoiceRow::new("k9", "???")]);
        let choices = survey.resolve_choice_list("odd").unwrap();
        assert_eq!(choices[0].name, "k9");
    }
}
