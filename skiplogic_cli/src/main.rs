//! # Skip-logic CLI
//!
//! Compiles a single criterion against a survey document, parses existing
//! relevance expressions back into editable criteria, and lists the operators
//! a question type offers.

use clap::{Parser, Subcommand};
use serde_json::json;
use skiplogic_compiler::config::RuntimeConfig;
use skiplogic_compiler::{
    build_rule, encode_operator, log_info, logging, parse_expression, InMemorySurvey,
    SkipLogicFactory,
};
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "skiplogic", version, about = "Compile and parse skip-logic expressions")]
struct Cli {
    /// TOML runtime configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit log events as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build one criterion and print its expression
    Compile {
        #[arg(long)]
        survey: PathBuf,
        /// Question client id
        #[arg(long)]
        question: String,
        /// Signed operator value; negative selects the negated form
        #[arg(long, allow_hyphen_values = true)]
        operator: i32,
        /// Response value (choice client id for choice questions)
        #[arg(long)]
        response: Option<String>,
    },
    /// Parse an expression and rebuild its criteria
    Parse {
        #[arg(long)]
        survey: PathBuf,
        #[arg(long)]
        expression: String,
    },
    /// List operator values allowed for a question type
    Operators {
        #[arg(long = "type")]
        question_type: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::from_env(),
    };
    if cli.json_logs {
        config.logging.use_structured_logging = true;
    }
    logging::init_global_logging(&config.logging)?;
    log_info!("Skip-logic CLI starting");

    match cli.command {
        Command::Compile {
            survey,
            question,
            operator,
            response,
        } => compile(&survey, &question, operator, response.as_deref()),
        Command::Parse { survey, expression } => parse(&survey, &expression),
        Command::Operators { question_type } => {
            list_operators(&question_type);
            Ok(())
        }
    }
}

fn load_survey(path: &Path) -> Result<InMemorySurvey, Box<dyn Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read survey {}: {}", path.display(), e))?;
    Ok(InMemorySurvey::from_json(&source)?)
}

fn compile(
    survey_path: &Path,
    question: &str,
    operator: i32,
    response: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let survey = load_survey(survey_path)?;
    let mut criterion = SkipLogicFactory::standard().create_criterion();

    criterion.change_question(question, &survey)?;
    criterion.change_operator(operator, &survey)?;
    if let Some(response) = response {
        criterion.change_response(response, &survey)?;
    }

    println!("{}", criterion.serialize(&survey));
    Ok(())
}

fn parse(survey_path: &Path, expression: &str) -> Result<(), Box<dyn Error>> {
    let survey = load_survey(survey_path)?;
    let factory = SkipLogicFactory::standard();

    let parsed = parse_expression(expression)?;
    let rule = build_rule(&parsed, &survey, &factory)?;

    let output = json!({
        "delimiter": rule.delimiter(),
        "criteria": rule.criteria(),
        "expression": rule.serialize(&survey),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn list_operators(question_type: &str) {
    let factory = SkipLogicFactory::standard();
    let registry = factory.registry();
    let profile = registry.question_profile(question_type);

    if !registry.has_profile(question_type) {
        println!("# '{}' uses the {} profile", question_type, profile.name);
    }
    for id in &profile.operators {
        let descriptor = registry.descriptor(*id);
        for negated in [false, true] {
            println!(
                "{:>3}  {:<20} {}",
                encode_operator(*id, negated),
                descriptor.label_for(negated),
                descriptor.symbols.select(negated)
            );
        }
    }
}
