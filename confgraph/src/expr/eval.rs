//! Interpreter for parsed attribute expressions.

use std::cmp::Ordering;

use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::builtin;
use crate::expr::value::AttrValue;
use crate::expr::{EvalContext, EvalError};

/// Longest string, in bytes, an expression may produce.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Evaluates `expr` against the names available in `context`.
///
/// # Errors
///
/// Returns an error for unknown names or functions, operand type
/// mismatches, division by zero, integer overflow, and strings longer
/// than [`MAX_STRING_LEN`].
pub fn eval_expr(expr: &Expr, context: &EvalContext) -> Result<AttrValue, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => context
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownName(name.clone())),
        Expr::List(items) => items
            .iter()
            .map(|item| eval_expr(item, context))
            .collect::<Result<Vec<_>, _>>()
            .map(AttrValue::List),
        Expr::UnaryOp { op, expr } => eval_unary(*op, eval_expr(expr, context)?),
        Expr::BinaryOp { op, left, right } => {
            let left = eval_expr(left, context)?;
            // `and` / `or` short-circuit and yield one of their operands.
            match op {
                BinaryOp::And if !left.is_truthy() => Ok(left),
                BinaryOp::Or if left.is_truthy() => Ok(left),
                BinaryOp::And | BinaryOp::Or => eval_expr(right, context),
                _ => eval_binary(*op, left, eval_expr(right, context)?),
            }
        }
        Expr::FunctionCall { name, args } => {
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, context))
                .collect::<Result<Vec<_>, _>>()?;
            builtin::call(name, args)
        }
    }
}

fn eval_unary(op: UnaryOp, operand: AttrValue) -> Result<AttrValue, EvalError> {
    match (op, operand) {
        (UnaryOp::Not, operand) => Ok(AttrValue::Bool(!operand.is_truthy())),
        (UnaryOp::Neg, AttrValue::Int(i)) => i
            .checked_neg()
            .map(AttrValue::Int)
            .ok_or(EvalError::Overflow { op: op.symbol() }),
        (UnaryOp::Neg, AttrValue::Float(f)) => Ok(AttrValue::Float(-f)),
        (UnaryOp::Pos, operand @ (AttrValue::Int(_) | AttrValue::Float(_))) => Ok(operand),
        (_, operand) => Err(EvalError::BadOperand {
            op: op.symbol(),
            operand: operand.type_name(),
        }),
    }
}

fn eval_binary(op: BinaryOp, left: AttrValue, right: AttrValue) -> Result<AttrValue, EvalError> {
    use AttrValue::{Float, Int, List, Str};

    let mismatch = |left: &AttrValue, right: &AttrValue| EvalError::TypeMismatch {
        op: op.symbol(),
        left: left.type_name(),
        right: right.type_name(),
    };
    let overflow = EvalError::Overflow { op: op.symbol() };
    let too_large = EvalError::TooLarge { op: op.symbol() };

    match op {
        BinaryOp::Eq => Ok(AttrValue::Bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(AttrValue::Bool(!values_equal(&left, &right))),
        BinaryOp::LessThan | BinaryOp::LessThanEq | BinaryOp::GreaterThan | BinaryOp::GreaterThanEq => {
            let ordering = compare(&left, &right).ok_or_else(|| mismatch(&left, &right))?;
            let result = match op {
                BinaryOp::LessThan => ordering == Ordering::Less,
                BinaryOp::LessThanEq => ordering != Ordering::Greater,
                BinaryOp::GreaterThan => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(AttrValue::Bool(result))
        }
        BinaryOp::Add => match (left, right) {
            (Int(a), Int(b)) => a.checked_add(b).map(Int).ok_or(overflow),
            (Str(a), Str(b)) if a.len() + b.len() > MAX_STRING_LEN => Err(too_large),
            (Str(a), Str(b)) => Ok(Str(a + &b)),
            (List(mut a), List(b)) => {
                a.extend(b);
                Ok(List(a))
            }
            (a, b) => float_op(&a, &b, |x, y| x + y).ok_or_else(|| mismatch(&a, &b)),
        },
        BinaryOp::Sub => match (left, right) {
            (Int(a), Int(b)) => a.checked_sub(b).map(Int).ok_or(overflow),
            (a, b) => float_op(&a, &b, |x, y| x - y).ok_or_else(|| mismatch(&a, &b)),
        },
        BinaryOp::Mul => match (left, right) {
            (Int(a), Int(b)) => a.checked_mul(b).map(Int).ok_or(overflow),
            (Str(s), Int(n)) | (Int(n), Str(s)) => {
                // Negative counts give the empty string.
                let count = usize::try_from(n).unwrap_or(0);
                match s.len().checked_mul(count) {
                    Some(len) if len <= MAX_STRING_LEN => Ok(Str(s.repeat(count))),
                    _ => Err(too_large),
                }
            }
            (a, b) => float_op(&a, &b, |x, y| x * y).ok_or_else(|| mismatch(&a, &b)),
        },
        BinaryOp::Div => {
            let (x, y) = both_f64(&left, &right).ok_or_else(|| mismatch(&left, &right))?;
            if y == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Float(x / y))
        }
        BinaryOp::FloorDiv => match (left, right) {
            (Int(_), Int(0)) => Err(EvalError::DivisionByZero),
            (Int(a), Int(b)) => floor_div(a, b).map(Int).ok_or(overflow),
            (a, b) => {
                let (x, y) = both_f64(&a, &b).ok_or_else(|| mismatch(&a, &b))?;
                if y == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Float((x / y).floor()))
            }
        },
        BinaryOp::Mod => match (left, right) {
            (Int(_), Int(0)) => Err(EvalError::DivisionByZero),
            (Int(a), Int(b)) => floor_mod(a, b).map(Int).ok_or(overflow),
            (a, b) => {
                let (x, y) = both_f64(&a, &b).ok_or_else(|| mismatch(&a, &b))?;
                if y == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Float(x - y * (x / y).floor()))
            }
        },
        BinaryOp::Pow => match (left, right) {
            (Int(a), Int(b)) if b >= 0 => u32::try_from(b)
                .ok()
                .and_then(|b| a.checked_pow(b))
                .map(Int)
                .ok_or(overflow),
            (a, b) => {
                let (x, y) = both_f64(&a, &b).ok_or_else(|| mismatch(&a, &b))?;
                if x == 0.0 && y < 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Float(x.powf(y)))
            }
        },
        BinaryOp::And => Ok(if left.is_truthy() { right } else { left }),
        BinaryOp::Or => Ok(if left.is_truthy() { left } else { right }),
    }
}

fn both_f64(left: &AttrValue, right: &AttrValue) -> Option<(f64, f64)> {
    Some((left.as_f64()?, right.as_f64()?))
}

fn float_op(left: &AttrValue, right: &AttrValue, f: impl Fn(f64, f64) -> f64) -> Option<AttrValue> {
    both_f64(left, right).map(|(x, y)| AttrValue::Float(f(x, y)))
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Remainder with the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

fn values_equal(left: &AttrValue, right: &AttrValue) -> bool {
    match (left, right) {
        (AttrValue::List(a), AttrValue::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => match both_f64(left, right) {
            Some((x, y)) => x == y,
            None => left == right,
        },
    }
}

fn compare(left: &AttrValue, right: &AttrValue) -> Option<Ordering> {
    match (left, right) {
        (AttrValue::Int(a), AttrValue::Int(b)) => Some(a.cmp(b)),
        (AttrValue::Str(a), AttrValue::Str(b)) => Some(a.cmp(b)),
        (AttrValue::Bool(a), AttrValue::Bool(b)) => Some(a.cmp(b)),
        _ => {
            let (x, y) = both_f64(left, right)?;
            x.partial_cmp(&y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::evaluate;

    fn eval(source: &str) -> Result<AttrValue, EvalError> {
        evaluate(source, &EvalContext::default())
    }

    #[test]
    fn test_integer_arithmetic_stays_integral() {
        assert_eq!(eval("2*3").unwrap(), AttrValue::Int(6));
        assert_eq!(eval("7 - 10").unwrap(), AttrValue::Int(-3));
        assert_eq!(eval("2 ** 10").unwrap(), AttrValue::Int(1024));
    }

    #[test]
    fn test_true_division_is_float() {
        assert_eq!(eval("7 / 2").unwrap(), AttrValue::Float(3.5));
        assert_eq!(eval("2 ** -1").unwrap(), AttrValue::Float(0.5));
    }

    #[test]
    fn test_floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(eval("7 // 2").unwrap(), AttrValue::Int(3));
        assert_eq!(eval("-7 // 2").unwrap(), AttrValue::Int(-4));
        assert_eq!(eval("-7 % 3").unwrap(), AttrValue::Int(2));
        assert_eq!(eval("7 % -3").unwrap(), AttrValue::Int(-2));
        assert_eq!(eval("7.5 // 2").unwrap(), AttrValue::Float(3.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval("1 // 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval("1 % 0").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = eval("9223372036854775807 + 1").unwrap_err();
        assert_eq!(err, EvalError::Overflow { op: "+" });
    }

    #[test]
    fn test_mixed_numeric_promotes_to_float() {
        assert_eq!(eval("1 + 0.5").unwrap(), AttrValue::Float(1.5));
    }

    #[test]
    fn test_string_operations() {
        assert_eq!(eval("'ab' + 'cd'").unwrap(), AttrValue::Str("abcd".into()));
        assert_eq!(eval("'ab' * 2").unwrap(), AttrValue::Str("abab".into()));
        assert!(matches!(
            eval("'ab' - 1").unwrap_err(),
            EvalError::TypeMismatch { op: "-", left: "str", right: "int" }
        ));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("1 < 2.5").unwrap(), AttrValue::Bool(true));
        assert_eq!(eval("1 == 1.0").unwrap(), AttrValue::Bool(true));
        assert_eq!(eval("'a' != 'b'").unwrap(), AttrValue::Bool(true));
        assert!(eval("'a' < 1").is_err());
    }

    #[test]
    fn test_logic_short_circuits_and_returns_operand() {
        assert_eq!(eval("0 or 5").unwrap(), AttrValue::Int(5));
        assert_eq!(eval("0 and undefined_name").unwrap(), AttrValue::Int(0));
        assert_eq!(eval("not 0").unwrap(), AttrValue::Bool(true));
    }

    #[test]
    fn test_unary_on_string_is_error() {
        assert_eq!(
            eval("-'x'").unwrap_err(),
            EvalError::BadOperand { op: "unary -", operand: "str" }
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            eval("[1, 2] + [3]").unwrap(),
            AttrValue::List(vec![AttrValue::Int(1), AttrValue::Int(2), AttrValue::Int(3)])
        );
        assert_eq!(eval("[1, 2.0] == [1.0, 2]").unwrap(), AttrValue::Bool(true));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            eval("om.NonlinearBlockGS").unwrap_err().to_string(),
            "syntax error at column 3: unexpected '.'"
        );
        assert_eq!(
            eval("solver").unwrap_err(),
            EvalError::UnknownName("solver".into())
        );
    }

    #[test]
    fn test_string_repetition_is_capped() {
        assert_eq!(
            eval("'x' * 9223372036854775807").unwrap_err(),
            EvalError::TooLarge { op: "*" }
        );
        assert_eq!(
            eval("4294967296 * 'abcd'").unwrap_err(),
            EvalError::TooLarge { op: "*" }
        );
        assert_eq!(eval("'x' * -5").unwrap(), AttrValue::Str(String::new()));

        let at_limit = eval(&format!("'x' * {MAX_STRING_LEN}")).unwrap();
        assert!(matches!(at_limit, AttrValue::Str(s) if s.len() == MAX_STRING_LEN));
    }

    #[test]
    fn test_string_concatenation_is_capped() {
        let context =
            EvalContext::default().with("big", AttrValue::Str("x".repeat(MAX_STRING_LEN)));
        assert_eq!(
            evaluate("big + 'y'", &context).unwrap_err(),
            EvalError::TooLarge { op: "+" }
        );
        assert!(evaluate("big + ''", &context).is_ok());
    }

    #[test]
    fn test_deep_nesting_fails_without_evaluating() {
        let source = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(eval(&source).unwrap_err(), EvalError::Syntax { .. }));
    }
}
