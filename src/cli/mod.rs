//! CLI support for ruleval
//!
//! Provides programmatic access to the command-line functionality so the
//! binary stays a thin argument parser.

mod check;
mod docs;

pub use check::{CheckOptions, CheckResult, describe_tokens, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unknown category: '{0}'\nRun 'ruleval docs' to see available categories.")]
    UnknownCategory(String),
}
