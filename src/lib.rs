//! Embeddable interpreter for side-effect-free rule expressions.
//!
//! A rule is a small boolean/arithmetic expression such as
//! `a is not null and length(a) between 4 and 10`, evaluated against
//! variables supplied by the host application.
//!
//! ```
//! use ruleval::{Value, evaluate, evaluate_json};
//! use serde_json::json;
//!
//! assert_eq!(evaluate("10 + 2 * 6").unwrap(), Value::Integer(22));
//!
//! let order = json!({ "status": "Green", "items": ["a", "b"] });
//! let ok = evaluate_json("status in ('Blue', 'Green') and length(items) = 2", &order);
//! assert_eq!(ok.unwrap(), Value::Boolean(true));
//! ```

use std::collections::HashMap;

use thiserror::Error;

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{BinOp, Expression, Literal, Token, TokenKind};
pub use config::Limits;
pub use evaluator::{Context, EmptyContext, EvalError, Evaluator};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use value::Value;

/// Either stage of the pipeline failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Parses a rule into its syntax tree.
///
/// ```
/// use ruleval::{BinOp, Expression, parse};
///
/// let expr = parse("a is null").unwrap();
/// assert!(matches!(expr, Expression::Binary { op: BinOp::Equal, .. }));
/// assert!(parse("a = ").is_err());
/// ```
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    log::debug!("parsing rule: {}", source);
    Parser::new(Lexer::new(source)).parse()
}

/// Parses and evaluates a rule that uses no variables. Any identifier reads
/// as null.
pub fn evaluate(source: &str) -> Result<Value, Error> {
    evaluate_with(source, &EmptyContext)
}

/// Parses and evaluates a rule, resolving identifiers through `ctx`.
///
/// ```
/// use ruleval::{Value, evaluate_with};
///
/// let ctx = |name: &str| match name {
///     "light" => Some(Value::String("Yellow".into())),
///     _ => None,
/// };
/// let rule = "case when light = 'Green' then 'Go' when light = 'Yellow' then 'Slow' else 'Stop' end";
/// assert_eq!(evaluate_with(rule, &ctx).unwrap(), Value::String("Slow".into()));
/// ```
pub fn evaluate_with(source: &str, ctx: &dyn Context) -> Result<Value, Error> {
    let expr = parse(source)?;
    let value = Evaluator::new().eval(&expr, ctx)?;
    log::debug!("rule evaluated to {:?}", value);
    Ok(value)
}

/// Evaluates a rule with the entries of `object` as its variables.
pub fn evaluate_object(source: &str, object: &HashMap<String, Value>) -> Result<Value, Error> {
    evaluate_with(source, object)
}

/// Evaluates a rule against a JSON document. The fields of a top-level
/// object become variables; any other document exposes none.
pub fn evaluate_json(source: &str, document: &serde_json::Value) -> Result<Value, Error> {
    match document {
        serde_json::Value::Object(fields) => evaluate_with(source, fields),
        _ => evaluate_with(source, &EmptyContext),
    }
}
