//! Attribute expression evaluation.
//!
//! String leaves of a problem table are small expressions such as `"2*3"`,
//! `"sqrt(2) / 2"` or `"'gauss-seidel'"`. They are parsed with a restricted
//! grammar and interpreted here; nothing in a configuration document can
//! reach beyond the literals, operators, named constants and built-in
//! functions this module defines.
//!
//! # Examples
//!
//! ```
//! use confgraph::expr::{evaluate, AttrValue, EvalContext};
//!
//! let context = EvalContext::default().with("span", AttrValue::Float(30.0));
//! assert_eq!(evaluate("2*3", &context).unwrap(), AttrValue::Int(6));
//! assert_eq!(evaluate("span / 2", &context).unwrap(), AttrValue::Float(15.0));
//! assert!(evaluate("__import__('os')", &context).is_err());
//! ```

pub mod ast;
mod builtin;
pub mod eval;
pub mod parser;
#[cfg(all(test, feature = "property-tests"))]
mod proptests;
pub mod value;

use indexmap::IndexMap;
use thiserror::Error;

use crate::document::{Literal, Value};

pub use builtin::FUNCTION_NAMES;
pub use eval::eval_expr;
pub use parser::parse;
pub use value::AttrValue;

/// Errors raised while parsing or evaluating an attribute expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression is not well formed.
    #[error("syntax error at column {column}: {message}")]
    Syntax {
        /// 1-based column of the offending character.
        column: usize,
        /// What the parser expected.
        message: String,
    },

    /// A name is not a known constant.
    #[error("name '{0}' is not defined")]
    UnknownName(String),

    /// A called function is not a built-in.
    #[error("function '{0}' is not defined")]
    UnknownFunction(String),

    /// A built-in was called with the wrong number of arguments.
    #[error("{name}() takes {expected} argument(s), {found} given")]
    Arity {
        /// The function name.
        name: String,
        /// Accepted argument counts.
        expected: String,
        /// Arguments given.
        found: usize,
    },

    /// A built-in received a non-numeric argument.
    #[error("{name}() expects numbers, got {found}")]
    BadArgument {
        /// The function name.
        name: String,
        /// Type of the rejected argument.
        found: &'static str,
    },

    /// A binary operator does not apply to its operand types.
    #[error("unsupported operand type(s) for {op}: {left} and {right}")]
    TypeMismatch {
        /// The operator.
        op: &'static str,
        /// Left operand type.
        left: &'static str,
        /// Right operand type.
        right: &'static str,
    },

    /// A unary operator does not apply to its operand type.
    #[error("bad operand type for {op}: {operand}")]
    BadOperand {
        /// The operator.
        op: &'static str,
        /// Operand type.
        operand: &'static str,
    },

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflowed.
    #[error("integer overflow in {op}")]
    Overflow {
        /// The operation that overflowed.
        op: &'static str,
    },

    /// A string result would exceed [`eval::MAX_STRING_LEN`].
    #[error("result of {op} is too large")]
    TooLarge {
        /// The operation that would have produced it.
        op: &'static str,
    },

    /// A built-in argument is outside the function's domain.
    #[error("math domain error in {name}()")]
    Domain {
        /// The function name.
        name: String,
    },

    /// The leaf holds a value that cannot become an attribute.
    #[error("{kind} cannot be used as an attribute value")]
    Unsupported {
        /// What was found.
        kind: &'static str,
    },

    /// The leaf has no value at all.
    #[error("attribute has no value")]
    MissingValue,
}

/// Names visible to expressions.
///
/// The default context defines `pi`, `e`, `tau`, `inf` and `nan`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalContext {
    names: IndexMap<String, AttrValue>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::empty()
            .with("pi", AttrValue::Float(std::f64::consts::PI))
            .with("e", AttrValue::Float(std::f64::consts::E))
            .with("tau", AttrValue::Float(std::f64::consts::TAU))
            .with("inf", AttrValue::Float(f64::INFINITY))
            .with("nan", AttrValue::Float(f64::NAN))
    }
}

impl EvalContext {
    /// A context with no names at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: IndexMap::new(),
        }
    }

    /// Adds (or replaces) a named constant.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.names.insert(name.into(), value);
        self
    }

    /// Looks up a named constant.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.names.get(name)
    }

    /// Iterates over the defined names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.names.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Parses and evaluates `source`.
///
/// # Errors
///
/// Returns [`EvalError::Syntax`] for malformed input, or any evaluation error.
pub fn evaluate(source: &str, context: &EvalContext) -> Result<AttrValue, EvalError> {
    eval_expr(&parse(source)?, context)
}

/// Turns an attribute leaf from a problem table into a typed value.
///
/// Strings are evaluated as expressions; numbers and booleans are taken as
/// they are; arrays are converted element by element.
///
/// # Errors
///
/// Returns an error if a string fails to evaluate, if the leaf is null, or
/// if an array contains a table.
pub fn evaluate_literal(literal: &Literal, context: &EvalContext) -> Result<AttrValue, EvalError> {
    match literal {
        Literal::Null => Err(EvalError::MissingValue),
        Literal::Bool(b) => Ok(AttrValue::Bool(*b)),
        Literal::Int(i) => Ok(AttrValue::Int(*i)),
        Literal::Float(x) => Ok(AttrValue::Float(*x)),
        Literal::Str(source) => evaluate(source, context),
        Literal::Array(items) => items
            .iter()
            .map(|item| evaluate_value(item, context))
            .collect::<Result<Vec<_>, _>>()
            .map(AttrValue::List),
    }
}

fn evaluate_value(value: &Value, context: &EvalContext) -> Result<AttrValue, EvalError> {
    match value {
        Value::Null => Err(EvalError::MissingValue),
        Value::Bool(b) => Ok(AttrValue::Bool(*b)),
        Value::Int(i) => Ok(AttrValue::Int(*i)),
        Value::Float(x) => Ok(AttrValue::Float(*x)),
        Value::Str(source) => evaluate(source, context),
        Value::Array(items) => items
            .iter()
            .map(|item| evaluate_value(item, context))
            .collect::<Result<Vec<_>, _>>()
            .map(AttrValue::List),
        Value::Table(_) => Err(EvalError::Unsupported {
            kind: "a table inside a list",
        }),
    }
}
