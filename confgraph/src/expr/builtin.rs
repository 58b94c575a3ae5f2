//! Built-in functions callable from attribute expressions.
//!
//! The set is fixed. Configuration documents cannot define functions or
//! reach anything outside this table.

use crate::expr::value::AttrValue;
use crate::expr::EvalError;

/// Names of every built-in function.
pub const FUNCTION_NAMES: &[&str] = &[
    "abs", "sqrt", "exp", "ln", "log", "log10", "sin", "cos", "tan", "floor", "ceil", "round",
    "min", "max",
];

/// Calls the built-in `name` with already-evaluated `args`.
///
/// # Errors
///
/// Returns an error for unknown functions, wrong argument counts,
/// non-numeric arguments, and arguments outside a function's domain.
pub fn call(name: &str, args: Vec<AttrValue>) -> Result<AttrValue, EvalError> {
    match name {
        "abs" => match single(name, args)? {
            AttrValue::Int(i) => i
                .checked_abs()
                .map(AttrValue::Int)
                .ok_or(EvalError::Overflow { op: "abs" }),
            other => Ok(AttrValue::Float(number(name, &other)?.abs())),
        },
        "sqrt" => {
            let x = number(name, &single(name, args)?)?;
            domain(name, x >= 0.0)?;
            Ok(AttrValue::Float(x.sqrt()))
        }
        "exp" => unary_float(name, args, f64::exp),
        "sin" => unary_float(name, args, f64::sin),
        "cos" => unary_float(name, args, f64::cos),
        "tan" => unary_float(name, args, f64::tan),
        "ln" => {
            let x = number(name, &single(name, args)?)?;
            domain(name, x > 0.0)?;
            Ok(AttrValue::Float(x.ln()))
        }
        "log10" => {
            let x = number(name, &single(name, args)?)?;
            domain(name, x > 0.0)?;
            Ok(AttrValue::Float(x.log10()))
        }
        "log" => match args.as_slice() {
            [x] => {
                let x = number(name, x)?;
                domain(name, x > 0.0)?;
                Ok(AttrValue::Float(x.ln()))
            }
            [x, base] => {
                let (x, base) = (number(name, x)?, number(name, base)?);
                domain(name, x > 0.0 && base > 0.0 && base != 1.0)?;
                Ok(AttrValue::Float(x.log(base)))
            }
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        "floor" => to_int(name, args, f64::floor),
        "ceil" => to_int(name, args, f64::ceil),
        "round" => to_int(name, args, f64::round),
        "min" => extremum(name, args, |candidate, best| candidate < best),
        "max" => extremum(name, args, |candidate, best| candidate > best),
        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

fn arity(name: &str, expected: &str, found: usize) -> EvalError {
    EvalError::Arity {
        name: name.to_string(),
        expected: expected.to_string(),
        found,
    }
}

fn single(name: &str, args: Vec<AttrValue>) -> Result<AttrValue, EvalError> {
    let found = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(arg), None) => Ok(arg),
        _ => Err(arity(name, "1", found)),
    }
}

fn number(name: &str, value: &AttrValue) -> Result<f64, EvalError> {
    value.as_f64().ok_or_else(|| EvalError::BadArgument {
        name: name.to_string(),
        found: value.type_name(),
    })
}

fn domain(name: &str, ok: bool) -> Result<(), EvalError> {
    if ok {
        Ok(())
    } else {
        Err(EvalError::Domain {
            name: name.to_string(),
        })
    }
}

fn unary_float(
    name: &str,
    args: Vec<AttrValue>,
    f: impl Fn(f64) -> f64,
) -> Result<AttrValue, EvalError> {
    let x = number(name, &single(name, args)?)?;
    Ok(AttrValue::Float(f(x)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn to_int(
    name: &str,
    args: Vec<AttrValue>,
    f: impl Fn(f64) -> f64,
) -> Result<AttrValue, EvalError> {
    match single(name, args)? {
        AttrValue::Int(i) => Ok(AttrValue::Int(i)),
        other => {
            let rounded = f(number(name, &other)?);
            if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
                Ok(AttrValue::Int(rounded as i64))
            } else {
                Err(EvalError::Overflow { op: "float to int" })
            }
        }
    }
}

/// `min`/`max` over either several arguments or a single list.
fn extremum(
    name: &str,
    args: Vec<AttrValue>,
    better: impl Fn(f64, f64) -> bool,
) -> Result<AttrValue, EvalError> {
    let candidates = match args.as_slice() {
        [AttrValue::List(items)] => items.clone(),
        _ => args,
    };

    let mut best: Option<(f64, AttrValue)> = None;
    for candidate in candidates {
        let x = number(name, &candidate)?;
        match &best {
            Some((best_x, _)) if !better(x, *best_x) => {}
            _ => best = Some((x, candidate)),
        }
    }

    best.map(|(_, value)| value)
        .ok_or_else(|| arity(name, "at least 1", 0))
}
