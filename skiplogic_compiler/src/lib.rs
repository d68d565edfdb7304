// Internal modules
pub mod builder;
pub mod config;
pub mod criterion;
pub mod factory;
#[macro_use]
pub mod logging;
pub mod operator;
pub mod parser;
pub mod registry;
pub mod response;
pub mod rule;
pub mod survey;

// Re-export key types for library consumers
pub use builder::{build_rule, BuildError};
pub use criterion::{reconcile, Criterion, CriterionError};
pub use factory::SkipLogicFactory;
pub use operator::{decode_operator, encode_operator, Operator};
pub use parser::{parse_expression, ParseError, ParsedCriterion, ParsedRule, ParsedValue};
pub use registry::{OperatorCategory, OperatorTypeRegistry, ResponseType};
pub use response::{ResponseError, ResponseModel};
pub use rule::{Delimiter, SkipLogicRule};
pub use survey::{Choice, InMemorySurvey, ResolvedQuestion, SurveyLookup};
