//! Predicate parser using nom.
//!
//! Parses a small C-like condition language into an [`Expr`].
//!
//! # Syntax Overview
//!
//! ```text
//! Users.Age >= 18 && !(Users.Name == 'root') || Users.Email.ends_with('@corp.example')
//! ─────┬──── ─┬──  ─┬ ┬   ───────┬────────   ─┬ ─────────────┬──────────────────────
//!      │      │     │ │          │            │              └── SQL method call
//!      │      │     │ │          │            └── or (also `or`)
//!      │      │     │ │          └── comparison, quoted string literal
//!      │      │     │ └── not (also `not`)
//!      │      │     └── and (also `and`)
//!      │      └── integer literal
//!      └── member access Table.Field
//! ```
//!
//! Precedence, loosest first: or, and, not, comparison, `+ -`, `* / %`,
//! unary minus. Literals are `null`, `true`, `false`, integers, decimals and
//! single-quoted strings (`''` escapes a quote).

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{alpha1, char, digit1, multispace0, none_of, satisfy},
    combinator::{map, map_opt, map_res, not, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::ast::{BinaryOp, Expr, SqlMethod, UnaryOp, Value};
use crate::error::{QueryError, QueryResult};

/// Parse a complete predicate string.
pub fn parse(input: &str) -> QueryResult<Expr> {
    let input = input.trim();

    match or_expr(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((remaining, _)) => Err(QueryError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(QueryError::parse(
            input.len() - e.input.len(),
            format!("Unexpected input: '{}'", e.input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(QueryError::parse(input.len(), "Unexpected end of input")),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Surround a parser with optional whitespace.
fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A keyword that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), not(satisfy(is_ident_char)))
}

fn fold_binary(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |left, (op, right)| Expr::binary(op, left, right))
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(alt((tag("||"), keyword("or")))), and_expr))(input)?;
    Ok((input, rest.into_iter().fold(first, |left, right| left.or(right))))
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(ws(alt((tag("&&"), keyword("and")))), not_expr))(input)?;
    Ok((input, rest.into_iter().fold(first, |left, right| left.and(right))))
}

fn not_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(
            preceded(
                ws(alt((terminated(tag("!"), not(char('='))), keyword("not")))),
                not_expr,
            ),
            |operand| Expr::unary(UnaryOp::Not, operand),
        ),
        comparison,
    ))(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, left) = additive(input)?;
    let (input, tail) = opt(pair(ws(comparison_op), additive))(input)?;
    let expr = match tail {
        Some((op, right)) => Expr::binary(op, left, right),
        None => left,
    };
    Ok((input, expr))
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOp> {
    alt((
        value(BinaryOp::Equal, tag("==")),
        value(BinaryOp::NotEqual, alt((tag("!="), tag("<>")))),
        value(BinaryOp::GreaterThanOrEqual, tag(">=")),
        value(BinaryOp::LessThanOrEqual, tag("<=")),
        value(BinaryOp::GreaterThan, tag(">")),
        value(BinaryOp::LessThan, tag("<")),
        value(BinaryOp::Equal, tag("=")),
    ))(input)
}

fn additive(input: &str) -> IResult<&str, Expr> {
    let (input, first) = multiplicative(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Add, char('+')),
            value(BinaryOp::Subtract, char('-')),
        ))),
        multiplicative,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Multiply, char('*')),
            value(BinaryOp::Divide, char('/')),
            value(BinaryOp::Modulo, char('%')),
        ))),
        unary,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((map(preceded(ws(char('-')), unary), negate), postfix))(input)
}

/// Negative literals stay literals.
fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(Value::Int(n)) => Expr::Constant(Value::Int(-n)),
        Expr::Constant(Value::Float(n)) => Expr::Constant(Value::Float(-n)),
        other => Expr::unary(UnaryOp::Negate, other),
    }
}

/// A primary followed by any number of `.method(args)` calls.
fn postfix(input: &str) -> IResult<&str, Expr> {
    let (input, receiver) = primary(input)?;
    let (input, calls) = many0(pair(
        preceded(char('.'), map_opt(identifier, SqlMethod::from_name)),
        delimited(
            ws(char('(')),
            separated_list0(ws(char(',')), or_expr),
            ws(char(')')),
        ),
    ))(input)?;
    let expr = calls
        .into_iter()
        .fold(receiver, |receiver, (method, args)| Expr::sql_call(method, receiver, args));
    Ok((input, expr))
}

fn primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        delimited(char('('), or_expr, char(')')),
        map(literal, Expr::Constant),
        member,
    )))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alt((alpha1, tag("_"))), take_while(is_ident_char)))(input)
}

fn member(input: &str) -> IResult<&str, Expr> {
    map(
        tuple((identifier, char('.'), identifier)),
        |(table, _, field)| Expr::member(table, field),
    )(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Null, keyword("null")),
        value(Value::Bool(true), keyword("true")),
        value(Value::Bool(false), keyword("false")),
        map_res(recognize(tuple((digit1, char('.'), digit1))), |s: &str| {
            s.parse::<f64>().map(Value::Float)
        }),
        map_res(digit1, |s: &str| s.parse::<i64>().map(Value::Int)),
        quoted_string,
    ))(input)
}

/// 'text' with '' standing for one quote.
fn quoted_string(input: &str) -> IResult<&str, Value> {
    map(
        delimited(
            char('\''),
            many0(alt((value('\'', tag("''")), none_of("'")))),
            char('\''),
        ),
        |chars: Vec<char>| Value::String(chars.into_iter().collect()),
    )(input)
}
