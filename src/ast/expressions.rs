use crate::ast::{BinOp, UnaryOp};

/// Literal carried by [`Expression::Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Whole number without a decimal point
    Integer(i64),
    /// Number written with a decimal point
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

/// One `when ... then ...` arm of a [`Expression::Case`].
#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub when: Expression,
    pub then: Expression,
}

/// Abstract Syntax Tree node representing a parsed rule.
///
/// The tree is strictly owned top-down: every child sits in a `Box` or `Vec`
/// held by its parent, so dropping the root drops the whole rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Arithmetic, comparison or logical infix operation
    ///
    /// # Examples
    /// ```text
    /// price * 1.1
    /// a >= 1 and a < 10
    /// ```
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Prefix operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Literal value
    Value(Literal),

    /// Variable resolved against the context at evaluation time
    Identifier(String),

    /// Built-in function call
    ///
    /// # Example
    /// ```text
    /// length(name)
    /// ```
    FunctionCall { name: String, args: Vec<Expression> },

    /// Conditional expression; arms are tried in source order
    ///
    /// # Example
    /// ```text
    /// case when a = 1 then 'one' when a = 2 then 'two' else 'many' end
    /// ```
    Case {
        arms: Vec<CaseArm>,
        otherwise: Option<Box<Expression>>,
    },

    /// Parenthesized comma list. Only valid as an operand of [`Expression::In`].
    Group(Vec<Expression>),

    /// Membership test
    ///
    /// # Examples
    /// ```text
    /// color in ('Blue', 'Green')
    /// ('admin', 'ops') in roles
    /// ```
    In {
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Nested-predicate membership
    ///
    /// # Examples
    /// ```text
    /// items has price > 100
    /// tags has 'urgent'
    /// ```
    Has {
        target: Box<Expression>,
        predicate: Box<Expression>,
    },

    /// Negation produced by `not in` and `not has`
    Not(Box<Expression>),
}

impl Expression {
    pub fn binary(op: BinOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn null() -> Self {
        Expression::Value(Literal::Null)
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Binary { left, right, .. } | Expression::In { left, right } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Expression::Has { target, predicate } => vec![target.as_ref(), predicate.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Not(inner) => vec![inner.as_ref()],
            Expression::FunctionCall { args, .. } => args.iter().collect(),
            Expression::Group(values) => values.iter().collect(),
            Expression::Case { arms, otherwise } => arms
                .iter()
                .flat_map(|arm| [&arm.when, &arm.then])
                .chain(otherwise.as_deref())
                .collect(),
            Expression::Value(_) | Expression::Identifier(_) => Vec::new(),
        }
    }
}
