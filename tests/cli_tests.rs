// tests/cli_tests.rs

#![cfg(feature = "cli")]

use ruleval::cli::{
    CheckOptions, CheckResult, CliError, DocCategory, describe_tokens, execute_check,
    get_doc_category, get_docs_overview,
};
use ruleval::{EvalError, ParseError};
use serde_json::json;

fn options(rule: &str, input: Option<&str>) -> CheckOptions {
    CheckOptions {
        rule: rule.to_string(),
        input: input.map(str::to_string),
        ..Default::default()
    }
}

fn check_output(rule: &str, input: Option<&str>) -> serde_json::Value {
    match execute_check(&options(rule, input)) {
        Ok(CheckResult::Success(output)) => output,
        other => panic!("Expected output from {:?}, got {:?}", rule, other),
    }
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_with_input() {
    assert_eq!(check_output("a * 2", Some(r#"{"a": 5}"#)), json!(10));
    assert_eq!(
        check_output(
            "status in ('Blue', 'Green') and length(items) = 2",
            Some(r#"{"status": "Green", "items": [1, 2]}"#)
        ),
        json!(true)
    );
}

#[test]
fn test_eval_without_input() {
    assert_eq!(check_output("7 / 2", None), json!(3.5));
    assert_eq!(check_output("a is null", None), json!(true));
    assert_eq!(check_output("'a' + 'b'", None), json!("ab"));
}

#[test]
fn test_non_object_input_has_no_variables() {
    assert_eq!(check_output("a is null", Some("[1, 2]")), json!(true));
}

#[test]
fn test_syntax_only() {
    let opts = CheckOptions {
        syntax_only: true,
        ..options("length(a) between 1 and 3", None)
    };
    assert!(matches!(execute_check(&opts), Ok(CheckResult::SyntaxValid)));

    // Evaluation errors are not reached.
    let opts = CheckOptions {
        syntax_only: true,
        ..options("upper(a)", None)
    };
    assert!(matches!(execute_check(&opts), Ok(CheckResult::SyntaxValid)));
}

#[test]
fn test_errors() {
    assert!(matches!(
        execute_check(&options("a = ", None)),
        Err(CliError::Parse(ParseError::UnexpectedStart { .. }))
    ));
    assert!(matches!(
        execute_check(&options("a", Some("{not json"))),
        Err(CliError::Json(_))
    ));
    assert!(matches!(
        execute_check(&options("1 / 0", None)),
        Err(CliError::Eval(EvalError::DivisionByZero))
    ));
}

#[test]
fn test_max_depth_option() {
    let opts = CheckOptions {
        max_depth: Some(2),
        ..options("1 + 2 + 3", None)
    };
    assert!(matches!(
        execute_check(&opts),
        Err(CliError::Parse(ParseError::TooDeep { max_depth: 2 }))
    ));

    let opts = CheckOptions {
        max_depth: Some(2),
        ..options("1 + 2", None)
    };
    assert!(matches!(execute_check(&opts), Ok(CheckResult::Success(_))));
}

#[test]
fn test_error_message_prefix() {
    let message = match execute_check(&options("b in (1)", None)) {
        Err(e) => e.to_string(),
        Ok(result) => panic!("Expected error, got {:?}", result),
    };
    assert_eq!(message, "Evaluation error: b is not defined");
}

// ============================================================================
// tokens
// ============================================================================

#[test]
fn test_describe_tokens() {
    assert_eq!(
        describe_tokens("a = 'x'"),
        vec![
            "   0  IDENT    a".to_string(),
            "   2  =        =".to_string(),
            "   5  STR      x".to_string(),
        ]
    );
}

#[test]
fn test_describe_tokens_shows_illegal() {
    let lines = describe_tokens("a # 1");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "   2  ILLEGAL  #");
}

#[test]
fn test_describe_tokens_empty() {
    assert!(describe_tokens("   ").is_empty());
}

// ============================================================================
// docs
// ============================================================================

#[test]
fn test_docs_overview_lists_categories() {
    let overview = get_docs_overview();
    for category in ["syntax", "operators", "membership", "functions"] {
        assert!(overview.contains(category), "missing {}", category);
    }
}

#[test]
fn test_doc_category_aliases() {
    let test_cases = vec![
        ("syntax", DocCategory::Syntax),
        ("OPS", DocCategory::Operators),
        ("has", DocCategory::Membership),
        ("fn", DocCategory::Functions),
    ];

    for (name, expected) in test_cases {
        assert_eq!(DocCategory::from_name(name), Some(expected), "Failed for {}", name);
        assert!(get_doc_category(name).is_ok());
    }
}

#[test]
fn test_unknown_doc_category() {
    match get_doc_category("macros") {
        Err(CliError::UnknownCategory(name)) => assert_eq!(name, "macros"),
        other => panic!("Expected UnknownCategory, got {:?}", other),
    }
}
