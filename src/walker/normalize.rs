//! Tree rewrites applied before flattening.
//!
//! After normalization a tree only holds members, constants, binary and
//! unary operators, and SQL-native method calls. Lambdas are unwrapped,
//! captured values and host calls are folded to constants, NOT is pushed
//! into equality and null tests, and bare boolean members in predicate
//! position become `(member = true)`.

use crate::ast::{BinaryOp, Expr, HostFn, LogicalType, Method, SqlMethod, UnaryOp, Value};
use crate::error::{QueryError, QueryResult};

use super::Scope;

/// Where a node sits relative to the clause it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The node is a condition on its own: a clause root, an AND/OR
    /// operand or the operand of NOT.
    Predicate,
    /// The node feeds an operator, a method or a projection.
    Operand,
}

pub fn normalize(expr: &Expr, position: Position, scope: &Scope<'_>) -> QueryResult<Expr> {
    match expr {
        Expr::Lambda(body) => normalize(body, position, scope),

        Expr::Captured(func) => fold(func, &[]),

        Expr::Member { table, field } => {
            let definition = scope.resolve(table, field)?;
            let member = expr.clone();
            if position == Position::Predicate && definition.logical_type() == LogicalType::Boolean {
                Ok(member.equals(true))
            } else {
                Ok(member)
            }
        }

        Expr::Constant(_) => Ok(expr.clone()),

        Expr::Binary { op, left, right } => {
            let child = if op.is_logical() {
                Position::Predicate
            } else {
                Position::Operand
            };
            let left = normalize(left, child, scope)?;
            let right = normalize(right, child, scope)?;
            Ok(null_comparison(*op, left, right))
        }

        Expr::Unary { op: UnaryOp::Not, operand } => {
            let operand = normalize(operand, Position::Predicate, scope)?;
            Ok(negate(operand))
        }

        Expr::Unary { op, operand } => {
            let operand = normalize(operand, Position::Operand, scope)?;
            Ok(Expr::unary(*op, operand))
        }

        Expr::Construct { args, ctor: Some(ctor) } => {
            let values = constant_args(ctor, args, scope)?;
            fold(ctor, &values)
        }

        Expr::Construct { ctor: None, .. } => Err(QueryError::malformed(
            "a field list cannot be used as a condition or operand",
        )),

        Expr::Call {
            method: Method::Host(func),
            receiver,
            args,
        } => {
            let mut values = Vec::with_capacity(args.len() + 1);
            if let Some(receiver) = receiver {
                values.push(constant_of(func, receiver, scope)?);
            }
            values.extend(constant_args(func, args, scope)?);
            fold(func, &values)
        }

        Expr::Call {
            method: Method::Sql(method),
            receiver,
            args,
        } => {
            let receiver = receiver.as_deref().ok_or_else(|| {
                QueryError::malformed(format!("{:?} needs a receiver", method))
            })?;
            if !method.accepts(args.len()) {
                return Err(QueryError::malformed(format!(
                    "{:?} does not take {} argument(s)",
                    method,
                    args.len()
                )));
            }
            let receiver = normalize(receiver, Position::Operand, scope)?;
            let args = args
                .iter()
                .map(|arg| normalize(arg, Position::Operand, scope))
                .collect::<QueryResult<Vec<_>>>()?;
            if *method == SqlMethod::In {
                non_empty_in(&args)?;
            }
            Ok(pattern_match(*method, receiver, args))
        }
    }
}

fn fold(func: &HostFn, args: &[Value]) -> QueryResult<Expr> {
    let value = func.call(args)?;
    tracing::trace!("Folded '{}' to {}", func.name(), value);
    Ok(Expr::Constant(value))
}

fn constant_of(func: &HostFn, expr: &Expr, scope: &Scope<'_>) -> QueryResult<Value> {
    match normalize(expr, Position::Operand, scope)? {
        Expr::Constant(value) => Ok(value),
        _ => Err(QueryError::evaluation(
            func.name(),
            "arguments reference columns and cannot be evaluated",
        )),
    }
}

fn constant_args(func: &HostFn, args: &[Expr], scope: &Scope<'_>) -> QueryResult<Vec<Value>> {
    args.iter().map(|arg| constant_of(func, arg, scope)).collect()
}

/// `x = NULL` and `x <> NULL` never hold in SQL; use the null tests.
fn null_comparison(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let is_null = |e: &Expr| matches!(e, Expr::Constant(Value::Null));
    let method = match op {
        BinaryOp::Equal => SqlMethod::IsNull,
        BinaryOp::NotEqual => SqlMethod::IsNotNull,
        _ => return Expr::binary(op, left, right),
    };
    if is_null(&right) && !is_null(&left) {
        Expr::sql_call(method, left, Vec::new())
    } else if is_null(&left) && !is_null(&right) {
        Expr::sql_call(method, right, Vec::new())
    } else {
        Expr::binary(op, left, right)
    }
}

fn negate(operand: Expr) -> Expr {
    match operand {
        Expr::Binary { op, left, right } => match op.negated() {
            Some(negated) => Expr::Binary {
                op: negated,
                left,
                right,
            },
            None => Expr::unary(UnaryOp::Not, Expr::Binary { op, left, right }),
        },
        Expr::Call {
            method: Method::Sql(SqlMethod::IsNull),
            receiver: Some(receiver),
            args,
        } => Expr::Call {
            method: Method::Sql(SqlMethod::IsNotNull),
            receiver: Some(receiver),
            args,
        },
        Expr::Call {
            method: Method::Sql(SqlMethod::IsNotNull),
            receiver: Some(receiver),
            args,
        } => Expr::Call {
            method: Method::Sql(SqlMethod::IsNull),
            receiver: Some(receiver),
            args,
        },
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => *operand,
        other => Expr::unary(UnaryOp::Not, other),
    }
}

/// Contains / StartsWith / EndsWith against a constant string become a
/// LIKE with the wildcard baked into the pattern. A needle holding
/// wildcard characters is escaped and rendered with an ESCAPE clause.
fn pattern_match(method: SqlMethod, receiver: Expr, mut args: Vec<Expr>) -> Expr {
    let needle = match (method, args.as_slice()) {
        (
            SqlMethod::Contains | SqlMethod::StartsWith | SqlMethod::EndsWith,
            [Expr::Constant(Value::String(s))],
        ) => s.clone(),
        _ => return Expr::sql_call(method, receiver, args),
    };
    let (like, needle) = match escape_wildcards(&needle) {
        Some(escaped) => (SqlMethod::LikeEscaped, escaped),
        None => (SqlMethod::Like, needle),
    };
    let pattern = match method {
        SqlMethod::StartsWith => format!("{}%", needle),
        SqlMethod::EndsWith => format!("%{}", needle),
        _ => format!("%{}%", needle),
    };
    args.clear();
    args.push(Expr::Constant(Value::String(pattern)));
    Expr::sql_call(like, receiver, args)
}

/// `None` when the needle has nothing LIKE would interpret.
fn escape_wildcards(needle: &str) -> Option<String> {
    let special = |c: char| matches!(c, '%' | '_' | '[') || c == SqlMethod::ESCAPE;
    if !needle.contains(special) {
        return None;
    }
    let mut escaped = String::with_capacity(needle.len() + 4);
    for c in needle.chars() {
        if special(c) {
            escaped.push(SqlMethod::ESCAPE);
        }
        escaped.push(c);
    }
    Some(escaped)
}

/// IN needs at least one value once lists are folded.
fn non_empty_in(args: &[Expr]) -> QueryResult<()> {
    let values: usize = args
        .iter()
        .map(|arg| match arg {
            Expr::Constant(Value::List(items)) => items.len(),
            _ => 1,
        })
        .sum();
    if values == 0 {
        return Err(QueryError::malformed("IN needs at least one value"));
    }
    Ok(())
}
