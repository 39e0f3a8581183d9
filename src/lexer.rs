use crate::ast::{Token, TokenKind};

/// Pull-based scanner over a rule string.
///
/// Each call to [`Lexer::next_token`] skips whitespace and returns the next
/// token; once the input is exhausted it keeps returning [`TokenKind::Eof`].
/// Unknown characters come back as [`TokenKind::Illegal`] tokens, the parser
/// decides what to do with them.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    // Only the four ASCII whitespace characters, never Unicode spaces.
    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.current_char() {
            self.advance();
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while self.current_char().is_some_and(is_ident_char) {
            self.advance();
        }
        self.slice(start, self.position)
    }

    /// Reads up to the matching quote. An unterminated string runs to the end
    /// of the input.
    fn read_string(&mut self, quote: char) -> (String, usize) {
        self.advance(); // opening quote
        let start = self.position;

        while let Some(ch) = self.current_char() {
            if ch == quote {
                let content = self.slice(start, self.position);
                self.advance();
                return (content, start);
            }
            self.advance();
        }

        (self.slice(start, self.position), start)
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        let mut seen_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }
        self.slice(start, self.position)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, kind.as_str(), self.position);
        self.advance();
        token
    }

    fn double(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, kind.as_str(), self.position);
        self.advance();
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let token = match self.current_char() {
            None => Token::new(TokenKind::Eof, "", start),
            Some('=') => self.single(TokenKind::Eq),
            Some('<') => match self.peek_char() {
                Some('>') => self.double(TokenKind::NotEq),
                Some('=') => self.double(TokenKind::LtEq),
                _ => self.single(TokenKind::Lt),
            },
            Some('>') => match self.peek_char() {
                Some('=') => self.double(TokenKind::GtEq),
                _ => self.single(TokenKind::Gt),
            },
            Some(quote @ ('"' | '\'')) => {
                let (content, position) = self.read_string(quote);
                Token::new(TokenKind::String, content, position)
            }
            Some('+') => self.single(TokenKind::Plus),
            Some('-') => self.single(TokenKind::Minus),
            Some('*') => self.single(TokenKind::Star),
            Some('/') => self.single(TokenKind::Slash),
            Some('(') => self.single(TokenKind::LParen),
            Some(')') => self.single(TokenKind::RParen),
            Some(',') => self.single(TokenKind::Comma),
            Some(ch) if is_ident_char(ch) => {
                let ident = self.read_identifier();
                match TokenKind::keyword(&ident) {
                    Some(kind) => Token::new(kind, kind.as_str(), start),
                    None => Token::new(TokenKind::Identifier, ident, start),
                }
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => {
                let number = self.read_number();
                Token::new(TokenKind::Numeric, number, start)
            }
            Some(ch) => {
                self.advance();
                Token::new(TokenKind::Illegal, ch.to_string(), start)
            }
        };

        log::trace!("scanned {}", token);
        token
    }
}

/// Yields every token before end of input.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            None
        } else {
            Some(token)
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR Not true FALSE is between null case when else end then in has");
    let kinds: Vec<TokenKind> = std::iter::from_fn(|| Some(lexer.next_token().kind))
        .take_while(|k| *k != TokenKind::Eof)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Is,
            TokenKind::Between,
            TokenKind::Null,
            TokenKind::Case,
            TokenKind::When,
            TokenKind::Else,
            TokenKind::End,
            TokenKind::Then,
            TokenKind::In,
            TokenKind::Has,
        ]
    );
}

#[test]
fn test_keyword_literal_is_canonical() {
    let mut lexer = Lexer::new("FALSE");
    assert_eq!(lexer.next_token(), Token::new(TokenKind::False, "false", 0));
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("a");
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Eof, "", 1));
    assert_eq!(lexer.next_token(), Token::new(TokenKind::Eof, "", 1));
}
