//! Sandboxed arithmetic evaluation for the calculator app.
//!
//! The evaluator accepts a single numeric expression, parses it into a tree
//! built only from number literals, unary `+`/`-` and the binary operators
//! `+ - * / // % **`, and walks that tree. Anything outside this whitelist
//! (names, calls, strings, comparisons, subscripts) is rejected before any
//! evaluation happens, so there is no way to reach code execution through
//! the calculator prompt.

use crate::lexer;
use crate::parser::{self, BinOp, Expr, UnaryOp};
use std::fmt;
use thiserror::Error;

/// A numeric value produced by the evaluator.
///
/// Integers stay integers as long as every operation on them is exact;
/// true division and any mixed operand promote to `Float`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Float(x) => {
                // Integral floats keep a trailing .0 so `8/2` visibly
                // evaluates to `4.0`, not `4`.
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
        }
    }
}

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The input contains a construct outside the arithmetic whitelist,
    /// e.g. a name reference, call syntax, or a string literal.
    #[error("disallowed construct: {0}")]
    Disallowed(String),
    /// The input does not parse as an arithmetic expression.
    #[error("invalid expression: {0}")]
    Malformed(String),
    /// The expression parsed but has no defined numeric result,
    /// e.g. division by zero or integer overflow.
    #[error("{0}")]
    Arithmetic(String),
}

fn overflow() -> EvalError {
    EvalError::Arithmetic("integer overflow".to_string())
}

/// Evaluate one arithmetic expression.
///
/// Stateless and IO-free: each call scans, parses and folds the input on its
/// own, and nothing is remembered between calls.
///
/// ```
/// use fishyos::eval::{evaluate, Number};
/// assert_eq!(evaluate("2+3*4").unwrap(), Number::Int(14));
/// assert!(evaluate("__import__('os')").is_err());
/// ```
pub fn evaluate(input: &str) -> Result<Number, EvalError> {
    let tokens = lexer::scan(input)?;
    let expr = parser::parse(tokens)?;
    eval_expr(&expr)
}

fn eval_expr(expr: &Expr) -> Result<Number, EvalError> {
    match expr {
        Expr::Literal(n) => Ok(*n),
        Expr::Unary { op, operand } => apply_unary(*op, eval_expr(operand)?),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs)?;
            let rhs = eval_expr(rhs)?;
            apply_binary(*op, lhs, rhs)
        }
    }
}

fn apply_unary(op: UnaryOp, value: Number) -> Result<Number, EvalError> {
    match (op, value) {
        (UnaryOp::Plus, v) => Ok(v),
        (UnaryOp::Minus, Number::Int(n)) => n.checked_neg().map(Number::Int).ok_or_else(overflow),
        (UnaryOp::Minus, Number::Float(x)) => Ok(Number::Float(-x)),
    }
}

fn apply_binary(op: BinOp, lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    match op {
        BinOp::Add => int_or_float(lhs, rhs, i64::checked_add, |a, b| a + b),
        BinOp::Sub => int_or_float(lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinOp::Mul => int_or_float(lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinOp::Div => true_div(lhs, rhs),
        BinOp::FloorDiv => floor_div(lhs, rhs),
        BinOp::Mod => modulo(lhs, rhs),
        BinOp::Pow => power(lhs, rhs),
    }
}

/// Apply an exact integer operation when both operands are integers,
/// otherwise fall back to float arithmetic.
fn int_or_float(
    lhs: Number,
    rhs: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Number, EvalError> {
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => int_op(a, b).map(Number::Int).ok_or_else(overflow),
        _ => Ok(Number::Float(float_op(as_f64(lhs), as_f64(rhs)))),
    }
}

fn as_f64(n: Number) -> f64 {
    match n {
        Number::Int(i) => i as f64,
        Number::Float(x) => x,
    }
}

fn is_zero(n: Number) -> bool {
    match n {
        Number::Int(i) => i == 0,
        Number::Float(x) => x == 0.0,
    }
}

/// `/` always produces a float, like the calculator's reference semantics.
fn true_div(lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    if is_zero(rhs) {
        return Err(EvalError::Arithmetic("division by zero".to_string()));
    }
    Ok(Number::Float(as_f64(lhs) / as_f64(rhs)))
}

/// `//` floors toward negative infinity, so `-7 // 2 == -4`.
fn floor_div(lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    if is_zero(rhs) {
        return Err(EvalError::Arithmetic("division by zero".to_string()));
    }
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => {
            let q = a.checked_div(b).ok_or_else(overflow)?;
            let r = a - q * b;
            if r != 0 && (r < 0) != (b < 0) {
                q.checked_sub(1).map(Number::Int).ok_or_else(overflow)
            } else {
                Ok(Number::Int(q))
            }
        }
        _ => Ok(Number::Float((as_f64(lhs) / as_f64(rhs)).floor())),
    }
}

/// `%` takes the sign of the divisor, so `-7 % 2 == 1` and `7 % -2 == -1`.
fn modulo(lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    if is_zero(rhs) {
        return Err(EvalError::Arithmetic("modulo by zero".to_string()));
    }
    match (lhs, rhs) {
        (Number::Int(a), Number::Int(b)) => {
            let r = a.checked_rem(b).ok_or_else(overflow)?;
            if r != 0 && (r < 0) != (b < 0) {
                Ok(Number::Int(r + b))
            } else {
                Ok(Number::Int(r))
            }
        }
        _ => {
            let (a, b) = (as_f64(lhs), as_f64(rhs));
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                Ok(Number::Float(r + b))
            } else {
                Ok(Number::Float(r))
            }
        }
    }
}

fn power(lhs: Number, rhs: Number) -> Result<Number, EvalError> {
    match (lhs, rhs) {
        (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
            let exp = u32::try_from(exp).map_err(|_| overflow())?;
            base.checked_pow(exp).map(Number::Int).ok_or_else(overflow)
        }
        _ => {
            let (base, exp) = (as_f64(lhs), as_f64(rhs));
            if base == 0.0 && exp < 0.0 {
                return Err(EvalError::Arithmetic(
                    "0 cannot be raised to a negative power".to_string(),
                ));
            }
            let result = base.powf(exp);
            if result.is_nan() {
                // A negative base with a fractional exponent has no real
                // result; report it instead of handing back NaN.
                return Err(EvalError::Arithmetic(
                    "fractional power of a negative number".to_string(),
                ));
            }
            Ok(Number::Float(result))
        }
    }
}
