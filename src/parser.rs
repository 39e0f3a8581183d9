use std::mem;

use thiserror::Error;

use crate::{
    ast::{BinOp, CaseArm, Expression, Literal, Token, TokenKind},
    config::Limits,
    lexer::Lexer,
};

/// Errors raised while turning a rule into an [`Expression`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A character the lexer could not classify
    #[error("Invalid input: '{literal}' at position {position}")]
    IllegalToken { literal: String, position: usize },

    /// A token that cannot begin an expression
    #[error("Unexpected start of expression: {token}")]
    UnexpectedStart { token: Token },

    /// A token other than the one the grammar requires here
    #[error("Expected {expected} but got {found}")]
    UnexpectedToken { expected: String, found: Token },

    /// Tokens left over after a complete expression
    #[error("Unexpected {found} after end of expression")]
    TrailingInput { found: Token },

    #[error("Invalid number '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    /// `(` applied to something other than a function name
    #[error("Only function names can be called, found '(' at position {position}")]
    NotCallable { position: usize },

    /// A comma list outside of an IN operand
    #[error("A parenthesized list is only valid as an operand of IN")]
    MisplacedGroup,

    #[error("Expression nests deeper than the limit of {max_depth}")]
    TooDeep { max_depth: usize },

    #[error("Expression has more than {max_nodes} nodes")]
    TooLarge { max_nodes: usize },
}

const LOWEST: u8 = 0;

/// Binding power of a token in infix position. Zero ends an expression.
fn precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::And => 1,
        TokenKind::Or => 2,
        TokenKind::Not => 3,
        TokenKind::Eq | TokenKind::NotEq => 4,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => 5,
        TokenKind::Between => 6,
        TokenKind::In | TokenKind::Has | TokenKind::Is => 7,
        TokenKind::Plus | TokenKind::Minus => 8,
        TokenKind::Star | TokenKind::Slash | TokenKind::Comma => 9,
        TokenKind::LParen => 10,
        _ => LOWEST,
    }
}

/// Whether a token continues a left-hand expression. Commas have a binding
/// power but are consumed by the list parser, never as an infix operator.
fn has_infix(kind: TokenKind) -> bool {
    BinOp::from_token(kind).is_some()
        || matches!(
            kind,
            TokenKind::Is
                | TokenKind::In
                | TokenKind::Not
                | TokenKind::Has
                | TokenKind::Between
                | TokenKind::LParen
        )
}

/// Depth and node count of a subtree, known while it is being built so that
/// limits are enforced before an oversized tree exists.
#[derive(Debug, Clone, Copy)]
struct Shape {
    depth: usize,
    nodes: usize,
}

impl Shape {
    const LEAF: Shape = Shape { depth: 1, nodes: 1 };

    fn with_child(self, child: Shape) -> Shape {
        Shape {
            depth: self.depth.max(child.depth.saturating_add(1)),
            nodes: self.nodes.saturating_add(child.nodes),
        }
    }

    fn parent_of(children: &[Shape]) -> Shape {
        children
            .iter()
            .fold(Shape::LEAF, |parent, child| parent.with_child(*child))
    }

    /// The elements of a group once the group node itself is dropped.
    fn without_root(self) -> Shape {
        Shape {
            depth: self.depth.saturating_sub(1),
            nodes: self.nodes.saturating_sub(1),
        }
    }
}

type Parsed = (Expression, Shape);

/// Pratt parser with two tokens of lookahead.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peek_token: Token,
    limits: Limits,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self::with_limits(lexer, Limits::default())
    }

    pub fn with_limits(mut lexer: Lexer, limits: Limits) -> Self {
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
            peek_token,
            limits,
            depth: 0,
        }
    }

    /// Parses the whole input as one expression.
    ///
    /// Fails on the first grammar violation; nothing is returned for a
    /// partially valid rule.
    pub fn parse(&mut self) -> Result<Expression, ParseError> {
        let (expr, _) = self.parse_expression(LOWEST)?;

        match self.peek_token.kind {
            TokenKind::Eof => {}
            TokenKind::Illegal => return Err(self.illegal(&self.peek_token)),
            _ => {
                return Err(ParseError::TrailingInput {
                    found: self.peek_token.clone(),
                });
            }
        }

        check_groups(&expr)?;
        Ok(expr)
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token();
        self.current_token = mem::replace(&mut self.peek_token, next);
        if self.current_token.is(TokenKind::Illegal) {
            return Err(self.illegal(&self.current_token));
        }
        Ok(())
    }

    fn illegal(&self, token: &Token) -> ParseError {
        ParseError::IllegalToken {
            literal: token.literal.clone(),
            position: token.position,
        }
    }

    fn expect_peek(&mut self, kind: TokenKind, expected: &str) -> Result<(), ParseError> {
        if self.peek_token.is(kind) {
            return self.advance();
        }
        if self.peek_token.is(TokenKind::Illegal) {
            return Err(self.illegal(&self.peek_token));
        }
        Err(ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek_token.clone(),
        })
    }

    fn too_deep(&self) -> ParseError {
        log::warn!(
            "rule nests deeper than {} at position {}",
            self.limits.max_depth,
            self.current_token.position
        );
        ParseError::TooDeep {
            max_depth: self.limits.max_depth,
        }
    }

    /// Rejects a subtree that is already over a limit.
    fn check(&self, shape: Shape) -> Result<Shape, ParseError> {
        if shape.depth > self.limits.max_depth {
            return Err(self.too_deep());
        }
        if shape.nodes > self.limits.max_nodes {
            log::warn!(
                "rule has more than {} nodes at position {}",
                self.limits.max_nodes,
                self.current_token.position
            );
            return Err(ParseError::TooLarge {
                max_nodes: self.limits.max_nodes,
            });
        }
        Ok(shape)
    }

    fn parse_expression(&mut self, precedence: u8) -> Result<Parsed, ParseError> {
        if self.depth >= self.limits.max_depth {
            return Err(self.too_deep());
        }

        self.depth += 1;
        let result = self.parse_precedence(precedence);
        self.depth -= 1;
        result
    }

    /// Every fold is checked, so a long operator chain stops at the limit
    /// instead of building a spine it cannot drop.
    fn parse_precedence(&mut self, min_precedence: u8) -> Result<Parsed, ParseError> {
        let (mut left, shape) = self.parse_prefix()?;
        let mut shape = self.check(shape)?;

        while min_precedence < precedence(self.peek_token.kind) && has_infix(self.peek_token.kind)
        {
            self.advance()?;
            let (folded, folded_shape) = self.parse_infix(left, shape)?;
            left = folded;
            shape = self.check(folded_shape)?;
        }
        Ok((left, shape))
    }

    fn parse_prefix(&mut self) -> Result<Parsed, ParseError> {
        let leaf = match self.current_token.kind {
            TokenKind::Identifier => Expression::identifier(self.current_token.literal.clone()),
            TokenKind::String => {
                Expression::Value(Literal::String(self.current_token.literal.clone()))
            }
            TokenKind::Numeric => Expression::Value(self.parse_number()?),
            TokenKind::True => Expression::Value(Literal::Boolean(true)),
            TokenKind::False => Expression::Value(Literal::Boolean(false)),
            TokenKind::Null => Expression::null(),
            TokenKind::LParen => return self.parse_grouped(),
            TokenKind::Case => return self.parse_case(),
            TokenKind::Illegal => return Err(self.illegal(&self.current_token)),
            _ => {
                return Err(ParseError::UnexpectedStart {
                    token: self.current_token.clone(),
                });
            }
        };
        Ok((leaf, Shape::LEAF))
    }

    fn parse_infix(&mut self, left: Expression, shape: Shape) -> Result<Parsed, ParseError> {
        let kind = self.current_token.kind;
        if let Some(op) = BinOp::from_token(kind) {
            return self.parse_binary(op, left, shape);
        }

        match kind {
            TokenKind::Is => self.parse_is(left, shape),
            TokenKind::In => self.parse_in(left, shape),
            TokenKind::Not => self.parse_not(left, shape),
            TokenKind::Has => self.parse_has(left, shape),
            TokenKind::Between => self.parse_between(left, shape),
            TokenKind::LParen => self.parse_call(left),
            _ => Err(ParseError::UnexpectedToken {
                expected: "an operator".to_string(),
                found: self.current_token.clone(),
            }),
        }
    }

    /// Integers without a decimal point, falling back to float when they
    /// overflow `i64`.
    fn parse_number(&self) -> Result<Literal, ParseError> {
        let literal = &self.current_token.literal;
        let invalid = || ParseError::InvalidNumber {
            literal: literal.clone(),
            position: self.current_token.position,
        };

        if !literal.contains('.')
            && let Ok(n) = literal.parse::<i64>()
        {
            return Ok(Literal::Integer(n));
        }
        literal
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| invalid())
    }

    /// `left op right`, left-associative: the right side only takes operators
    /// that bind tighter than `op`.
    fn parse_binary(
        &mut self,
        op: BinOp,
        left: Expression,
        left_shape: Shape,
    ) -> Result<Parsed, ParseError> {
        let own = precedence(self.current_token.kind);
        self.advance()?;
        let (right, right_shape) = self.parse_expression(own)?;
        Ok((
            Expression::binary(op, left, right),
            Shape::parent_of(&[left_shape, right_shape]),
        ))
    }

    /// `( expr )` or `( expr, expr, ... )`
    fn parse_grouped(&mut self) -> Result<Parsed, ParseError> {
        let (mut items, shape) = self.parse_list(true)?;
        match items.len() {
            0 => Err(ParseError::UnexpectedToken {
                expected: "an expression".to_string(),
                found: self.current_token.clone(),
            }),
            1 => Ok((items.remove(0), shape.without_root())),
            _ => Ok((Expression::Group(items), shape)),
        }
    }

    /// Parses a comma list with the current token on `(`, leaving the current
    /// token on `)`. Each element is a full expression. The shape returned is
    /// that of one node holding all the elements.
    fn parse_list(&mut self, flatten: bool) -> Result<(Vec<Expression>, Shape), ParseError> {
        let mut items = Vec::new();
        let mut shape = Shape::LEAF;
        if self.peek_token.is(TokenKind::RParen) {
            self.advance()?;
            return Ok((items, shape));
        }

        loop {
            self.advance()?;
            let (item, item_shape) = self.parse_expression(LOWEST)?;
            let item_shape = match item {
                Expression::Group(inner) if flatten => {
                    items.extend(inner);
                    item_shape.without_root()
                }
                item => {
                    items.push(item);
                    item_shape
                }
            };
            shape = self.check(shape.with_child(item_shape))?;

            if self.peek_token.is(TokenKind::Comma) {
                self.advance()?;
                continue;
            }
            self.expect_peek(TokenKind::RParen, "',' or ')'")?;
            return Ok((items, shape));
        }
    }

    fn parse_call(&mut self, callee: Expression) -> Result<Parsed, ParseError> {
        let name = match callee {
            Expression::Identifier(name) => name,
            _ => {
                return Err(ParseError::NotCallable {
                    position: self.current_token.position,
                });
            }
        };
        let (args, shape) = self.parse_list(false)?;
        Ok((Expression::FunctionCall { name, args }, shape))
    }

    /// `x is null` / `x is not null`, desugared to `=` / `<>` against null.
    fn parse_is(&mut self, left: Expression, shape: Shape) -> Result<Parsed, ParseError> {
        let mut op = BinOp::Equal;
        if self.peek_token.is(TokenKind::Not) {
            self.advance()?;
            op = BinOp::NotEqual;
        }
        self.expect_peek(TokenKind::Null, "'null'")?;
        Ok((
            Expression::binary(op, left, Expression::null()),
            Shape::parent_of(&[shape, Shape::LEAF]),
        ))
    }

    /// `x between MIN and MAX` with numeric bounds, desugared to
    /// `x >= MIN and x <= MAX`. The subject is copied, so the limits are
    /// checked before the copy is made.
    fn parse_between(&mut self, left: Expression, shape: Shape) -> Result<Parsed, ParseError> {
        self.expect_peek(TokenKind::Numeric, "a number")?;
        let min = self.parse_number()?;
        self.expect_peek(TokenKind::And, "'and'")?;
        self.expect_peek(TokenKind::Numeric, "a number")?;
        let max = self.parse_number()?;

        let bound = Shape::parent_of(&[shape, Shape::LEAF]);
        let shape = self.check(Shape::parent_of(&[bound, bound]))?;

        Ok((
            Expression::binary(
                BinOp::And,
                Expression::binary(BinOp::GreaterEqual, left.clone(), Expression::Value(min)),
                Expression::binary(BinOp::LessEqual, left, Expression::Value(max)),
            ),
            shape,
        ))
    }

    /// A parenthesized right operand is always a group, even with one element.
    fn parse_in(&mut self, left: Expression, left_shape: Shape) -> Result<Parsed, ParseError> {
        let (right, right_shape) = if self.peek_token.is(TokenKind::LParen) {
            self.advance()?;
            let (items, shape) = self.parse_list(true)?;
            (Expression::Group(items), shape)
        } else {
            self.advance()?;
            self.parse_expression(precedence(TokenKind::In))?
        };

        Ok((
            Expression::In {
                left: Box::new(left),
                right: Box::new(right),
            },
            Shape::parent_of(&[left_shape, right_shape]),
        ))
    }

    /// `target has PREDICATE`; the predicate stops at `and` / `or`.
    fn parse_has(&mut self, target: Expression, shape: Shape) -> Result<Parsed, ParseError> {
        if !matches!(
            self.peek_token.kind,
            TokenKind::Identifier | TokenKind::String | TokenKind::Numeric
        ) {
            return Err(ParseError::UnexpectedToken {
                expected: "an identifier, string or number".to_string(),
                found: self.peek_token.clone(),
            });
        }
        self.advance()?;
        let (predicate, predicate_shape) = self.parse_expression(precedence(TokenKind::Not))?;

        Ok((
            Expression::Has {
                target: Box::new(target),
                predicate: Box::new(predicate),
            },
            Shape::parent_of(&[shape, predicate_shape]),
        ))
    }

    /// `x not in ...` / `x not has ...`
    fn parse_not(&mut self, left: Expression, shape: Shape) -> Result<Parsed, ParseError> {
        let (inner, inner_shape) = match self.peek_token.kind {
            TokenKind::In => {
                self.advance()?;
                self.parse_in(left, shape)?
            }
            TokenKind::Has => {
                self.advance()?;
                self.parse_has(left, shape)?
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "'in' or 'has'".to_string(),
                    found: self.peek_token.clone(),
                });
            }
        };
        Ok((
            Expression::Not(Box::new(inner)),
            Shape::parent_of(&[inner_shape]),
        ))
    }

    /// `case (when COND then RESULT)+ (else RESULT)? end`
    fn parse_case(&mut self) -> Result<Parsed, ParseError> {
        if !self.peek_token.is(TokenKind::When) {
            return Err(ParseError::UnexpectedToken {
                expected: "'when'".to_string(),
                found: self.peek_token.clone(),
            });
        }

        let mut arms = Vec::new();
        let mut shape = Shape::LEAF;
        while self.peek_token.is(TokenKind::When) {
            self.advance()?; // when
            self.advance()?;
            let (when, when_shape) = self.parse_expression(LOWEST)?;
            self.expect_peek(TokenKind::Then, "'then'")?;
            self.advance()?;
            let (then, then_shape) = self.parse_expression(LOWEST)?;
            shape = self.check(shape.with_child(when_shape).with_child(then_shape))?;
            arms.push(CaseArm { when, then });
        }

        let otherwise = if self.peek_token.is(TokenKind::Else) {
            self.advance()?; // else
            self.advance()?;
            let (expr, else_shape) = self.parse_expression(LOWEST)?;
            shape = shape.with_child(else_shape);
            Some(Box::new(expr))
        } else {
            None
        };

        let expected = if otherwise.is_some() {
            "'end'"
        } else {
            "'when', 'else' or 'end'"
        };
        self.expect_peek(TokenKind::End, expected)?;

        Ok((Expression::Case { arms, otherwise }, shape))
    }
}

/// Rejects groups anywhere but directly under an IN.
fn check_groups(root: &Expression) -> Result<(), ParseError> {
    let mut stack = vec![(root, false)];

    while let Some((node, group_allowed)) = stack.pop() {
        if matches!(node, Expression::Group(_)) && !group_allowed {
            return Err(ParseError::MisplacedGroup);
        }

        let operands_may_group = matches!(node, Expression::In { .. });
        for child in node.children() {
            stack.push((child, operands_may_group));
        }
    }
    Ok(())
}
