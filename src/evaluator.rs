use std::collections::HashMap;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

use crate::{
    ast::{BinOp, CaseArm, Expression, UnaryOp},
    config::Limits,
    value::Value,
};

/// Read-only variable lookup consulted while evaluating a rule.
///
/// Returning `None` means the name is unknown; it reads as null and only
/// fails where a value is strictly required.
///
/// Implemented for closures, `HashMap<String, Value>` and JSON objects:
///
/// ```
/// use ruleval::{Context, Value};
///
/// let ctx = |name: &str| (name == "a").then_some(Value::Integer(1));
/// assert_eq!(ctx.resolve("a"), Some(Value::Integer(1)));
/// assert_eq!(ctx.resolve("b"), None);
/// ```
pub trait Context {
    fn resolve(&self, name: &str) -> Option<Value>;
}

impl<F> Context for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

impl Context for HashMap<String, Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Context for serde_json::Map<String, serde_json::Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Value::from)
    }
}

/// A context that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl Context for EmptyContext {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Fields of one element, the scope of a `has` predicate.
struct ElementScope<'a>(&'a Value);

impl Context for ElementScope<'_> {
    fn resolve(&self, name: &str) -> Option<Value> {
        match self.0 {
            Value::Object(fields) => fields.get(name).cloned(),
            _ => None,
        }
    }
}

/// Errors that can occur during rule evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Type mismatch or invalid operation for the given type
    #[error("Type error: {0}")]
    TypeError(String),

    /// A variable that must have a value resolved to nothing
    #[error("{0} is not defined")]
    NotDefined(String),

    #[error("Function {0} not implemented")]
    UnknownFunction(String),

    #[error("{name} function takes exactly {expected} argument(s), got {found}")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid left side of IN expression")]
    InvalidInLeft,

    #[error("Right side of IN expression must be an array")]
    InRightNotArray,

    /// Neither `identifier in (...)` nor `(...) in identifier`
    #[error("Invalid left or right side of IN expression")]
    InvalidInOperands,

    /// Both operands share a type the operator is not defined for
    #[error("Operator {op} is not supported for {type_name} operands")]
    UnsupportedOperator { op: BinOp, type_name: &'static str },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Expression nests deeper than the limit of {max_depth}")]
    TooDeep { max_depth: usize },
}

/// Tree-walking evaluator.
///
/// Holds no state between calls, so one evaluator (and one parsed
/// [`Expression`]) can be shared freely, including across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    limits: Limits,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Evaluator { limits }
    }

    /// Reduces `expr` to a value, resolving identifiers through `ctx`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ruleval::{Evaluator, Value, parse};
    /// use std::collections::HashMap;
    ///
    /// let rule = parse("price * 2 > 150").unwrap();
    /// let mut vars = HashMap::new();
    /// vars.insert("price".to_string(), Value::Integer(100));
    ///
    /// let result = Evaluator::new().eval(&rule, &vars).unwrap();
    /// assert_eq!(result, Value::Boolean(true));
    /// ```
    pub fn eval(&self, expr: &Expression, ctx: &dyn Context) -> Result<Value, EvalError> {
        self.eval_expr(expr, ctx, 1)
    }

    fn eval_expr(
        &self,
        expr: &Expression,
        ctx: &dyn Context,
        depth: usize,
    ) -> Result<Value, EvalError> {
        if depth > self.limits.max_depth {
            log::warn!("evaluation nests deeper than {}", self.limits.max_depth);
            return Err(EvalError::TooDeep {
                max_depth: self.limits.max_depth,
            });
        }
        let next = depth + 1;

        match expr {
            Expression::Value(literal) => Ok(Value::from(literal)),
            Expression::Identifier(name) => Ok(ctx.resolve(name).unwrap_or(Value::Null)),
            Expression::Binary { op, left, right } => {
                let left_val = self.eval_expr(left, ctx, next)?;
                let right_val = self.eval_expr(right, ctx, next)?;
                apply_binop(*op, &left_val, &right_val)
            }
            Expression::Unary { op, operand } => {
                let value = self.eval_expr(operand, ctx, next)?;
                apply_unary(*op, value)
            }
            Expression::FunctionCall { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, ctx, next))
                    .collect::<Result<Vec<_>, _>>()?;
                call_function(name, &args)
            }
            Expression::Case { arms, otherwise } => {
                self.eval_case(arms, otherwise.as_deref(), ctx, next)
            }
            Expression::Group(values) => values
                .iter()
                .map(|value| self.eval_expr(value, ctx, next))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expression::In { left, right } => {
                self.eval_in(left, right, ctx, next).map(Value::Boolean)
            }
            Expression::Has { target, predicate } => {
                let found = self.eval_has(target, predicate, ctx, next)?;
                Ok(Value::Boolean(found == Some(true)))
            }
            Expression::Not(inner) => match inner.as_ref() {
                // A target that is not a collection gives no answer either way.
                Expression::Has { target, predicate } => {
                    let found = self.eval_has(target, predicate, ctx, next + 1)?;
                    Ok(Value::Boolean(found == Some(false)))
                }
                _ => {
                    let value = self.eval_expr(inner, ctx, next)?;
                    Ok(Value::Boolean(!value.as_bool()))
                }
            },
        }
    }

    /// First truthy guard wins; without a match and without `else` the
    /// result is `false`.
    fn eval_case(
        &self,
        arms: &[CaseArm],
        otherwise: Option<&Expression>,
        ctx: &dyn Context,
        depth: usize,
    ) -> Result<Value, EvalError> {
        for arm in arms {
            if self.eval_expr(&arm.when, ctx, depth)?.as_bool() {
                return self.eval_expr(&arm.then, ctx, depth);
            }
        }
        match otherwise {
            Some(expr) => self.eval_expr(expr, ctx, depth),
            None => Ok(Value::Boolean(false)),
        }
    }

    /// `identifier in (...)` tests the identifier's value (every element, if
    /// it is an array) against the group. `(...) in identifier` requires every
    /// group element to appear in the identifier's array.
    fn eval_in(
        &self,
        left: &Expression,
        right: &Expression,
        ctx: &dyn Context,
        depth: usize,
    ) -> Result<bool, EvalError> {
        match (left, right) {
            (Expression::Group(_), Expression::Identifier(name)) => {
                let Value::Array(wanted) = self.eval_expr(left, ctx, depth)? else {
                    return Err(EvalError::InvalidInLeft);
                };
                match self.eval_expr(right, ctx, depth)? {
                    Value::Null => Err(EvalError::NotDefined(name.clone())),
                    Value::Array(candidates) => Ok(wanted.iter().all(|v| v.is_in(&candidates))),
                    _ => Err(EvalError::InRightNotArray),
                }
            }
            (Expression::Identifier(name), Expression::Group(_)) => {
                let subject = self.eval_expr(left, ctx, depth)?;
                let Value::Array(candidates) = self.eval_expr(right, ctx, depth)? else {
                    return Err(EvalError::InvalidInOperands);
                };
                match subject {
                    Value::Null => Err(EvalError::NotDefined(name.clone())),
                    Value::Array(items) => Ok(items.iter().all(|v| v.is_in(&candidates))),
                    Value::Object(_) => Err(EvalError::InvalidInLeft),
                    scalar => Ok(scalar.is_in(&candidates)),
                }
            }
            _ => Err(EvalError::InvalidInOperands),
        }
    }

    /// `None` when the target is neither an array nor an object.
    fn eval_has(
        &self,
        target: &Expression,
        predicate: &Expression,
        ctx: &dyn Context,
        depth: usize,
    ) -> Result<Option<bool>, EvalError> {
        let subject = self.eval_expr(target, ctx, depth)?;
        let candidates = match &subject {
            Value::Array(items) => items.as_slice(),
            Value::Object(_) => std::slice::from_ref(&subject),
            _ => return Ok(None),
        };

        for candidate in candidates {
            if self.element_matches(candidate, predicate, depth)? {
                return Ok(Some(true));
            }
        }
        Ok(Some(false))
    }

    fn element_matches(
        &self,
        candidate: &Value,
        predicate: &Expression,
        depth: usize,
    ) -> Result<bool, EvalError> {
        if let Expression::Value(literal) = predicate {
            return Ok(candidate.strict_eq(&Value::from(literal)));
        }
        let scope = ElementScope(candidate);
        Ok(self.eval_expr(predicate, &scope, depth)?.as_bool())
    }
}

fn apply_binop(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Divide => {
            apply_arithmetic(op, left, right)
        }
        BinOp::Equal => Ok(Value::Boolean(left.strict_eq(right))),
        BinOp::NotEqual => Ok(Value::Boolean(!left.strict_eq(right))),
        BinOp::LessThan | BinOp::GreaterThan | BinOp::LessEqual | BinOp::GreaterEqual => {
            apply_comparison(op, left, right)
        }
        BinOp::And => Ok(Value::Boolean(left.as_bool() && right.as_bool())),
        BinOp::Or => Ok(Value::Boolean(left.as_bool() || right.as_bool())),
    }
}

fn apply_arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => {
            if op == BinOp::Divide && *b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(float_arithmetic(op, *a, *b)))
        }
        (Value::Integer(_), Value::Float(_)) | (Value::Float(_), Value::Integer(_)) => {
            mixed_arithmetic(op, left, right)
        }
        (Value::String(_), _) | (_, Value::String(_))
            if op == BinOp::Add && is_concatenable(left) && is_concatenable(right) =>
        {
            Ok(Value::String(format!(
                "{}{}",
                left.as_string(),
                right.as_string()
            )))
        }
        (a, b) if a.type_name() == b.type_name() => Err(EvalError::UnsupportedOperator {
            op,
            type_name: a.type_name(),
        }),
        (a, b) => {
            let verb = match op {
                BinOp::Add => "add",
                BinOp::Subtract => "subtract",
                BinOp::Multiply => "multiply",
                _ => "divide",
            };
            Err(EvalError::TypeError(format!(
                "Cannot {} {} and {}",
                verb,
                a.type_name(),
                b.type_name()
            )))
        }
    }
}

fn is_concatenable(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Integer(_) | Value::Float(_) | Value::Boolean(_)
    )
}

/// Exact integer arithmetic, overflowing into floats. A division that does
/// not come out even yields a float.
fn integer_arithmetic(op: BinOp, a: i64, b: i64) -> Result<Value, EvalError> {
    let exact = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Subtract => a.checked_sub(b),
        BinOp::Multiply => a.checked_mul(b),
        _ => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            // `i64::MIN / -1` has no remainder and no i64 quotient.
            match a.checked_rem(b) {
                Some(0) => a.checked_div(b),
                Some(_) => return Ok(Value::Float(a as f64 / b as f64)),
                None => None,
            }
        }
    };

    Ok(match exact {
        Some(n) => Value::Integer(n),
        None => Value::Float(float_arithmetic(op, a as f64, b as f64)),
    })
}

fn float_arithmetic(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Subtract => a - b,
        BinOp::Multiply => a * b,
        _ => a / b,
    }
}

/// One integer and one float operand: computed in decimal so that results
/// like `2 * 1.5` come back as whole integers.
fn mixed_arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_float(), right.as_float()) else {
        return Err(EvalError::TypeError(format!(
            "Cannot combine {} and {}",
            left.type_name(),
            right.type_name()
        )));
    };
    if op == BinOp::Divide && b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }

    if let Some(ad) = to_decimal(left)
        && let Some(bd) = to_decimal(right)
        && let Some(rd) = decimal_arithmetic(op, ad, bd)
    {
        if rd.is_integer()
            && let Some(r) = rd.to_i64()
        {
            return Ok(Value::Integer(r));
        } else if let Some(r) = rd.to_f64() {
            return Ok(Value::Float(r));
        }
    }
    Ok(Value::Float(float_arithmetic(op, a, b)))
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Integer(n) => Decimal::from_i64(*n),
        Value::Float(n) => Decimal::from_f64(*n),
        _ => None,
    }
}

fn decimal_arithmetic(op: BinOp, a: Decimal, b: Decimal) -> Option<Decimal> {
    match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Subtract => a.checked_sub(b),
        BinOp::Multiply => a.checked_mul(b),
        _ => a.checked_div(b),
    }
}

/// Numbers compare numerically, strings lexicographically, booleans with
/// `false < true`. Anything against null is `false`.
fn apply_comparison(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Boolean(false));
    }

    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            left.as_float().partial_cmp(&right.as_float())
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
        (a, b) if a.type_name() == b.type_name() => {
            return Err(EvalError::UnsupportedOperator {
                op,
                type_name: a.type_name(),
            });
        }
        (a, b) => {
            return Err(EvalError::TypeError(format!(
                "Cannot compare {} {} {}",
                a.type_name(),
                op,
                b.type_name()
            )));
        }
    };

    // NaN orders against nothing
    let result = ordering.is_some_and(|o| match op {
        BinOp::LessThan => o.is_lt(),
        BinOp::GreaterThan => o.is_gt(),
        BinOp::LessEqual => o.is_le(),
        _ => o.is_ge(),
    });
    Ok(Value::Boolean(result))
}

fn apply_unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Not, value) => Ok(Value::Boolean(!value.as_bool())),
        (UnaryOp::Negate, Value::Integer(n)) => Ok(n
            .checked_neg()
            .map(Value::Integer)
            .unwrap_or(Value::Float(-(n as f64)))),
        (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
        (UnaryOp::Negate, other) => Err(EvalError::TypeError(format!(
            "Cannot negate {}",
            other.type_name()
        ))),
    }
}

/// The fixed function table. Arguments arrive already evaluated.
fn call_function(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    match name.to_ascii_lowercase().as_str() {
        "length" => {
            let [arg] = args else {
                return Err(EvalError::WrongArity {
                    name: name.to_string(),
                    expected: 1,
                    found: args.len(),
                });
            };
            match arg {
                Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
                Value::Array(items) => Ok(Value::Integer(items.len() as i64)),
                Value::Null => Ok(Value::Null),
                other => Err(EvalError::TypeError(format!(
                    "length() requires string or array, got {}",
                    other.type_name()
                ))),
            }
        }
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}
