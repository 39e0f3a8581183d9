// tests/lexer_tests.rs

use ruleval::ast::{Token, TokenKind};
use ruleval::lexer::Lexer;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input).map(|t| t.kind).collect()
}

// ============================================================================
// Operators and punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("=", TokenKind::Eq),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        (",", TokenKind::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, expected, "Failed for input: {}", input);
        assert_eq!(token.literal, input);
        assert_eq!(token.position, 0);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("<>", TokenKind::NotEq),
        ("<=", TokenKind::LtEq),
        (">=", TokenKind::GtEq),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, expected, "Failed for input: {}", input);
        assert_eq!(token.literal, input);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

#[test]
fn test_two_char_vs_single_char() {
    assert_eq!(kinds("< >"), vec![TokenKind::Lt, TokenKind::Gt]);
    assert_eq!(kinds("<>="), vec![TokenKind::NotEq, TokenKind::Eq]);
    assert_eq!(kinds("> ="), vec![TokenKind::Gt, TokenKind::Eq]);
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_keywords_are_case_insensitive() {
    for input in ["between", "BETWEEN", "Between", "bEtWeEn"] {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Between, "between", 0));
    }
}

#[test]
fn test_keywords_vs_identifiers() {
    let test_cases = vec![
        "android", "and_item", "_and", "or_gate", "order", "truth", "nullable", "hash", "inside",
        "ending",
    ];

    for input in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier, "Failed for input: {}", input);
        assert_eq!(token.literal, input);
    }
}

#[test]
fn test_identifier_stops_at_digit() {
    let mut lexer = Lexer::new("abc1");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Identifier, "abc", 0));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Numeric, "1", 3));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_strings_either_quote() {
    let mut lexer = Lexer::new(r#"'single' "double""#);
    assert_eq!(lexer.next_token(), Token::new(TokenKind::String, "single", 1));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::String, "double", 10));
}

#[test]
fn test_string_keeps_other_quote_and_spaces() {
    let mut lexer = Lexer::new(r#"'it "is" here '"#);
    assert_eq!(lexer.next_token().literal, r#"it "is" here "#);
}

#[test]
fn test_unterminated_string_runs_to_end() {
    let mut lexer = Lexer::new("'abc");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::String, "abc", 1));
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_empty_string() {
    let mut lexer = Lexer::new("''");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::String, "", 1));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Eof, "", 2));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers_keep_raw_text() {
    for input in ["0", "42", "1.0", ".64", "1988", "3."] {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token(), Token::new(TokenKind::Numeric, input, 0));
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }
}

#[test]
fn test_number_allows_one_decimal_point() {
    let mut lexer = Lexer::new("1.2.3");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Numeric, "1.2", 0));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Numeric, ".3", 3));
}

// ============================================================================
// Whitespace and illegal input
// ============================================================================

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        kinds(" \t1\n+\r\n2 "),
        vec![TokenKind::Numeric, TokenKind::Plus, TokenKind::Numeric]
    );
}

#[test]
fn test_illegal_characters() {
    for input in ["#", "!", "%", "$", "\u{00a0}", "é"] {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Illegal, "Failed for input: {:?}", input);
        assert_eq!(token.literal, input);
    }
}

#[test]
fn test_illegal_does_not_stop_the_scan() {
    assert_eq!(
        kinds("a ! b"),
        vec![TokenKind::Identifier, TokenKind::Illegal, TokenKind::Identifier]
    );
}

// ============================================================================
// Complete expressions
// ============================================================================

#[test]
fn test_basic_expression() {
    let mut lexer = Lexer::new("999 <> \"asd\" ");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Numeric, "999", 0));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::NotEq, "<>", 4));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::String, "asd", 8));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Eof, "", 13));
}

#[test]
fn test_complex_expression_positions() {
    let input = r#"a>1 and b<c or g <> "xyz" ( a + b - c *d /f) <> abc  and a > 1 a>= 1988 and bxx<=2 and e=true not FALSE"#;
    let expected = vec![
        Token::new(TokenKind::Identifier, "a", 0),
        Token::new(TokenKind::Gt, ">", 1),
        Token::new(TokenKind::Numeric, "1", 2),
        Token::new(TokenKind::And, "and", 4),
        Token::new(TokenKind::Identifier, "b", 8),
        Token::new(TokenKind::Lt, "<", 9),
        Token::new(TokenKind::Identifier, "c", 10),
        Token::new(TokenKind::Or, "or", 12),
        Token::new(TokenKind::Identifier, "g", 15),
        Token::new(TokenKind::NotEq, "<>", 17),
        Token::new(TokenKind::String, "xyz", 21),
        Token::new(TokenKind::LParen, "(", 26),
        Token::new(TokenKind::Identifier, "a", 28),
        Token::new(TokenKind::Plus, "+", 30),
        Token::new(TokenKind::Identifier, "b", 32),
        Token::new(TokenKind::Minus, "-", 34),
        Token::new(TokenKind::Identifier, "c", 36),
        Token::new(TokenKind::Star, "*", 38),
        Token::new(TokenKind::Identifier, "d", 39),
        Token::new(TokenKind::Slash, "/", 41),
        Token::new(TokenKind::Identifier, "f", 42),
        Token::new(TokenKind::RParen, ")", 43),
        Token::new(TokenKind::NotEq, "<>", 45),
        Token::new(TokenKind::Identifier, "abc", 48),
        Token::new(TokenKind::And, "and", 53),
        Token::new(TokenKind::Identifier, "a", 57),
        Token::new(TokenKind::Gt, ">", 59),
        Token::new(TokenKind::Numeric, "1", 61),
        Token::new(TokenKind::Identifier, "a", 63),
        Token::new(TokenKind::GtEq, ">=", 64),
        Token::new(TokenKind::Numeric, "1988", 67),
        Token::new(TokenKind::And, "and", 72),
        Token::new(TokenKind::Identifier, "bxx", 76),
        Token::new(TokenKind::LtEq, "<=", 79),
        Token::new(TokenKind::Numeric, "2", 81),
        Token::new(TokenKind::And, "and", 83),
        Token::new(TokenKind::Identifier, "e", 87),
        Token::new(TokenKind::Eq, "=", 88),
        Token::new(TokenKind::True, "true", 89),
        Token::new(TokenKind::Not, "not", 94),
        Token::new(TokenKind::False, "false", 98),
        Token::new(TokenKind::Eof, "", 103),
    ];

    let mut lexer = Lexer::new(input);
    for token in expected {
        assert_eq!(lexer.next_token(), token);
    }
}

#[test]
fn test_iterator_stops_before_eof() {
    let tokens: Vec<Token> = Lexer::new("length(a) = 3").collect();
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Numeric));
}

#[test]
fn test_token_display() {
    let token = Token::new(TokenKind::Then, "then", 7);
    assert_eq!(token.to_string(), "{ type: then, literal: then } at position 7");
}
