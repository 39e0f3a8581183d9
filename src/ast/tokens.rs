use std::fmt;

/// Lexical category of a [`Token`].
///
/// The set is closed: one member per operator, punctuation mark and keyword,
/// plus the literal categories and the two sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input
    Eof,
    /// A character the language does not know
    Illegal,

    // Literals
    /// Variable name
    ///
    /// Letters and underscores only.
    ///
    /// # Examples
    /// ```text
    /// status
    /// order_total
    /// ```
    Identifier,

    /// Quoted string, single or double quotes
    ///
    /// # Examples
    /// ```text
    /// 'Green'
    /// "Should Stop"
    /// ```
    String,

    /// Integer or decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 1.0
    /// .64
    /// ```
    Numeric,

    // Arithmetic
    /// Addition or string concatenation
    Plus,
    /// Subtraction
    Minus,
    /// Multiplication
    Star,
    /// Division
    Slash,

    // Comparison
    /// Equality (`=`)
    Eq,
    /// Inequality (`<>`)
    NotEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,

    // Delimiters
    /// Left parenthesis for grouping, lists or function calls
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma separating list elements and call arguments
    Comma,

    // Keywords
    /// Logical AND
    And,
    /// Logical OR
    Or,
    /// Negation of `in` / `has`, and part of `is not null`
    Not,
    True,
    False,
    /// `is null` / `is not null`
    Is,
    /// `x between 1 and 10`
    Between,
    Null,
    /// Opens a conditional expression
    ///
    /// # Examples
    /// ```text
    /// case when light = 'Red' then 'Stop' else 'Go' end
    /// ```
    Case,
    When,
    Else,
    End,
    Then,
    /// Membership test against a parenthesized list
    ///
    /// # Examples
    /// ```text
    /// color in ('Blue', 'Green')
    /// ```
    In,
    /// Nested-predicate membership
    ///
    /// # Examples
    /// ```text
    /// items has price > 100
    /// tags has 'urgent'
    /// ```
    Has,
}

impl TokenKind {
    /// Looks up a keyword, ignoring ASCII case.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident.to_ascii_lowercase().as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "is" => TokenKind::Is,
            "between" => TokenKind::Between,
            "null" => TokenKind::Null,
            "case" => TokenKind::Case,
            "when" => TokenKind::When,
            "else" => TokenKind::Else,
            "end" => TokenKind::End,
            "then" => TokenKind::Then,
            "in" => TokenKind::In,
            "has" => TokenKind::Has,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical spelling of fixed tokens, or the category name for literals.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Identifier => "IDENT",
            TokenKind::String => "STR",
            TokenKind::Numeric => "NUM",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "<>",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Is => "is",
            TokenKind::Between => "between",
            TokenKind::Null => "null",
            TokenKind::Case => "case",
            TokenKind::When => "when",
            TokenKind::Else => "else",
            TokenKind::End => "end",
            TokenKind::Then => "then",
            TokenKind::In => "in",
            TokenKind::Has => "has",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A scanned token.
///
/// `literal` is the exact source text: the canonical spelling for operators
/// and keywords, the unquoted content for strings, the raw text for numbers.
/// `position` is the character offset where the literal starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            position,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ type: {}, literal: {} }} at position {}",
            self.kind, self.literal, self.position
        )
    }
}
