//! Evaluate rules against JSON input

use super::CliError;
use crate::{EmptyContext, Evaluator, Lexer, Limits, Parser};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The rule to evaluate
    pub rule: String,
    /// JSON document whose top-level fields are the variables
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Overrides the default nesting limit
    pub max_depth: Option<usize>,
}

impl CheckOptions {
    fn limits(&self) -> Limits {
        match self.max_depth {
            Some(depth) => Limits::default().with_max_depth(depth),
            None => Limits::default(),
        }
    }
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Rule evaluated successfully with JSON output
    Success(serde_json::Value),
}

/// Parse and, unless only syntax is requested, evaluate a rule
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let limits = options.limits();
    let expr = Parser::with_limits(Lexer::new(&options.rule), limits).parse()?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let evaluator = Evaluator::with_limits(limits);
    let result = match &options.input {
        Some(json_str) => {
            let document: serde_json::Value = serde_json::from_str(json_str)?;
            match document {
                serde_json::Value::Object(fields) => evaluator.eval(&expr, &fields)?,
                _ => evaluator.eval(&expr, &EmptyContext)?,
            }
        }
        None => evaluator.eval(&expr, &EmptyContext)?,
    };

    log::debug!("rule {:?} evaluated to {:?}", options.rule, result);
    Ok(CheckResult::Success(serde_json::Value::from(result)))
}

/// One line per token, `position kind literal`
pub fn describe_tokens(rule: &str) -> Vec<String> {
    Lexer::new(rule)
        .map(|token| format!("{:>4}  {:<8} {}", token.position, token.kind, token.literal))
        .collect()
}

