//! Parser for attribute expressions.
//!
//! Precedence, lowest first:
//!
//! | level          | operators                     |
//! |----------------|-------------------------------|
//! | or             | `or`                          |
//! | and            | `and`                         |
//! | not            | `not`                         |
//! | comparison     | `== != < <= > >=` (no chains) |
//! | additive       | `+ -`                         |
//! | multiplicative | `* / // %`                    |
//! | unary          | `- +`                         |
//! | power          | `**` (right associative)      |
//! | primary        | literals, names, calls, `[..]`, `(..)` |

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{all_consuming, cut, map, not, opt, recognize, value, verify},
    error::ErrorKind,
    multi::separated_list0,
    sequence::{pair, preceded, terminated},
    IResult, Parser,
};

use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::value::AttrValue;
use crate::expr::EvalError;

/// Deepest expression tree the parser accepts. Brackets count as a level
/// even though they add no node.
pub const MAX_DEPTH: usize = 128;

type ParseResult<'a, T> = IResult<&'a str, T>;
type SyntaxError<'a> = nom::error::Error<&'a str>;

/// A parsed subtree and its height.
type Node = (Expr, usize);

/// Parses a complete expression.
///
/// # Errors
///
/// Returns [`EvalError::Syntax`] if the input is not a single well-formed
/// expression, or if it nests deeper than [`MAX_DEPTH`].
///
/// # Examples
///
/// ```
/// use confgraph::expr::parser::parse;
///
/// assert!(parse("2 * (3 + 4)").is_ok());
/// assert!(parse("bad_expr(").is_err());
/// ```
pub fn parse(source: &str) -> Result<Expr, EvalError> {
    match all_consuming(terminated(|input| expr(input, 0), multispace0)).parse(source) {
        Ok((_, (expr, _))) => Ok(expr),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) if err.code == ErrorKind::TooLarge => {
            Err(EvalError::Syntax {
                column: column(source, err.input),
                message: "expression nested too deeply".to_string(),
            })
        }
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(syntax_error(source, err.input)),
        Err(nom::Err::Incomplete(_)) => Err(syntax_error(source, "")),
    }
}

/// 1-based column where `rest` starts, skipping leading whitespace.
fn column(source: &str, rest: &str) -> usize {
    let offset = source.len() - rest.trim_start().len();
    source[..offset].chars().count() + 1
}

fn syntax_error(source: &str, rest: &str) -> EvalError {
    let message = match rest.trim_start().chars().next() {
        None => "unexpected end of expression".to_string(),
        Some(quote @ ('\'' | '"')) => format!("unterminated string starting with {quote}"),
        Some(c) => format!("unexpected '{c}'"),
    };
    EvalError::Syntax {
        column: column(source, rest),
        message,
    }
}

fn too_deep(input: &str) -> nom::Err<SyntaxError<'_>> {
    nom::Err::Failure(SyntaxError::new(input, ErrorKind::TooLarge))
}

/// Fails once `depth` levels are already open above `input`.
fn enter(input: &str, depth: usize) -> Result<(), nom::Err<SyntaxError<'_>>> {
    if depth > MAX_DEPTH {
        Err(too_deep(input))
    } else {
        Ok(())
    }
}

/// Accepts `expr` of `height` below `depth` levels.
fn node(input: &str, depth: usize, height: usize, expr: Expr) -> ParseResult<'_, Node> {
    if depth + height > MAX_DEPTH {
        Err(too_deep(input))
    } else {
        Ok((input, (expr, height)))
    }
}

/// Turns a recoverable error into a failure once input has been consumed.
fn committed<T>(result: ParseResult<'_, T>) -> ParseResult<'_, T> {
    result.map_err(|err| match err {
        nom::Err::Error(err) => nom::Err::Failure(err),
        other => other,
    })
}

fn sym<'a>(symbol: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = SyntaxError<'a>> {
    preceded(multispace0, tag(symbol))
}

fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = SyntaxError<'a>> {
    preceded(multispace0, verify(identifier, move |found: &str| found == word))
}

fn identifier<'a>(input: &'a str) -> ParseResult<'a, &'a str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn left_associative<'a>(
    mut operand: impl FnMut(&'a str, usize) -> ParseResult<'a, Node>,
    mut operator: impl Parser<&'a str, Output = BinaryOp, Error = SyntaxError<'a>>,
    input: &'a str,
    depth: usize,
) -> ParseResult<'a, Node> {
    let (mut rest, (mut acc, mut height)) = operand(input, depth)?;
    loop {
        let (after_op, op) = match operator.parse(rest) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => return Ok((rest, (acc, height))),
            Err(err) => return Err(err),
        };
        let (after_operand, (right, right_height)) = committed(operand(after_op, depth + 1))?;
        let (_, (combined, combined_height)) = node(
            after_op,
            depth,
            height.max(right_height) + 1,
            Expr::binary_op(op, acc, right),
        )?;
        acc = combined;
        height = combined_height;
        rest = after_operand;
    }
}

fn expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    enter(input, depth)?;
    or_expr(input, depth)
}

fn or_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    left_associative(and_expr, value(BinaryOp::Or, keyword("or")), input, depth)
}

fn and_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    left_associative(not_expr, value(BinaryOp::And, keyword("and")), input, depth)
}

fn not_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    enter(input, depth)?;
    match keyword("not").parse(input) {
        Ok((rest, _)) => {
            let (rest, (operand, height)) = committed(not_expr(rest, depth + 1))?;
            let (_, parsed) = node(input, depth, height + 1, Expr::unary_op(UnaryOp::Not, operand))?;
            Ok((rest, parsed))
        }
        Err(nom::Err::Error(_)) => comparison_expr(input, depth),
        Err(err) => Err(err),
    }
}

fn comparison_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let operator = alt((
        value(BinaryOp::LessThanEq, sym("<=")),
        value(BinaryOp::GreaterThanEq, sym(">=")),
        value(BinaryOp::Eq, sym("==")),
        value(BinaryOp::NotEq, sym("!=")),
        value(BinaryOp::LessThan, sym("<")),
        value(BinaryOp::GreaterThan, sym(">")),
    ));

    let (rest, (left, left_height)) = additive_expr(input, depth)?;
    let (rest, right) =
        opt(pair(operator, cut(|i| additive_expr(i, depth + 1)))).parse(rest)?;

    match right {
        Some((op, (right, right_height))) => {
            let height = left_height.max(right_height) + 1;
            let (_, parsed) = node(input, depth, height, Expr::binary_op(op, left, right))?;
            Ok((rest, parsed))
        }
        None => Ok((rest, (left, left_height))),
    }
}

fn additive_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let operator = alt((
        value(BinaryOp::Add, sym("+")),
        value(BinaryOp::Sub, sym("-")),
    ));
    left_associative(multiplicative_expr, operator, input, depth)
}

fn multiplicative_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let operator = alt((
        value(BinaryOp::FloorDiv, sym("//")),
        value(BinaryOp::Div, sym("/")),
        value(BinaryOp::Mod, sym("%")),
        value(BinaryOp::Mul, terminated(sym("*"), not(char('*')))),
    ));
    left_associative(unary_expr, operator, input, depth)
}

fn unary_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    enter(input, depth)?;
    let mut operator = alt((
        value(UnaryOp::Neg, sym("-")),
        value(UnaryOp::Pos, sym("+")),
    ));

    match operator.parse(input) {
        Ok((rest, op)) => {
            let (rest, (operand, height)) = committed(unary_expr(rest, depth + 1))?;
            let (_, parsed) = node(input, depth, height + 1, Expr::unary_op(op, operand))?;
            Ok((rest, parsed))
        }
        Err(nom::Err::Error(_)) => power_expr(input, depth),
        Err(err) => Err(err),
    }
}

fn power_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let (rest, (base, base_height)) = primary_expr(input, depth)?;
    // The exponent may itself be signed: `2 ** -1`.
    let (rest, exponent) =
        opt(preceded(sym("**"), cut(|i| unary_expr(i, depth + 1)))).parse(rest)?;

    match exponent {
        Some((exponent, exponent_height)) => {
            let height = base_height.max(exponent_height) + 1;
            let (_, parsed) =
                node(input, depth, height, Expr::binary_op(BinaryOp::Pow, base, exponent))?;
            Ok((rest, parsed))
        }
        None => Ok((rest, (base, base_height))),
    }
}

fn primary_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    preceded(
        multispace0,
        alt((
            map(number, |expr| (expr, 1)),
            map(string_literal, |expr| (expr, 1)),
            |i| list_display(i, depth),
            |i| parenthesized_expr(i, depth),
            |i| name_or_call(i, depth),
        )),
    )
    .parse(input)
}

fn number(input: &str) -> ParseResult<'_, Expr> {
    let (rest, text) = recognize((
        alt((
            recognize((digit1, opt((char('.'), digit0)))),
            recognize((char('.'), digit1)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    let is_float = text.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
    let literal = match text.parse::<i64>() {
        Ok(int) if !is_float => AttrValue::Int(int),
        // Integers too large for i64 degrade to floats.
        _ => match text.parse::<f64>() {
            Ok(float) => AttrValue::Float(float),
            Err(_) => {
                return Err(nom::Err::Failure(SyntaxError::new(input, ErrorKind::Float)));
            }
        },
    };
    Ok((rest, Expr::Literal(literal)))
}

fn string_literal(input: &str) -> ParseResult<'_, Expr> {
    let (body, quote) = one_of("'\"").parse(input)?;

    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((index, c)) = chars.next() {
        if c == quote {
            let rest = &body[index + c.len_utf8()..];
            return Ok((rest, Expr::Literal(AttrValue::Str(text))));
        }
        if c == '\\' {
            let Some((_, escaped)) = chars.next() else {
                break;
            };
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                other => other,
            });
        } else {
            text.push(c);
        }
    }

    Err(nom::Err::Failure(SyntaxError::new(input, ErrorKind::Char)))
}

/// Comma-separated items one level below `depth`, with their tallest height.
fn items(input: &str, depth: usize) -> ParseResult<'_, (Vec<Expr>, usize)> {
    let (rest, parsed) = separated_list0(sym(","), |i| expr(i, depth + 1)).parse(input)?;
    let height = parsed.iter().map(|(_, height)| *height).max().unwrap_or(0);
    Ok((rest, (parsed.into_iter().map(|(expr, _)| expr).collect(), height)))
}

fn list_display(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let (rest, _) = char('[').parse(input)?;
    let (rest, (items, height)) = items(rest, depth)?;
    let (rest, _) = cut((opt(sym(",")), sym("]"))).parse(rest)?;
    let (_, parsed) = node(input, depth, height + 1, Expr::List(items))?;
    Ok((rest, parsed))
}

fn parenthesized_expr(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let (rest, _) = char('(').parse(input)?;
    let (rest, (inner, height)) = committed(expr(rest, depth + 1))?;
    let (rest, _) = cut(sym(")")).parse(rest)?;
    Ok((rest, (inner, height)))
}

fn name_or_call(input: &str, depth: usize) -> ParseResult<'_, Node> {
    let (rest, name) = identifier(input)?;

    match name {
        "true" | "True" => return Ok((rest, (Expr::Literal(AttrValue::Bool(true)), 1))),
        "false" | "False" => return Ok((rest, (Expr::Literal(AttrValue::Bool(false)), 1))),
        "and" | "or" | "not" => {
            return Err(nom::Err::Error(SyntaxError::new(input, ErrorKind::Tag)));
        }
        _ => {}
    }

    let Ok((rest, _)) = sym("(").parse(rest) else {
        return Ok((rest, (Expr::Name(name.to_string()), 1)));
    };
    let (rest, (args, height)) = items(rest, depth)?;
    let (rest, _) = cut((opt(sym(",")), sym(")"))).parse(rest)?;

    let call = Expr::FunctionCall {
        name: name.to_string(),
        args,
    };
    let (_, parsed) = node(input, depth, height + 1, call)?;
    Ok((rest, parsed))
}
