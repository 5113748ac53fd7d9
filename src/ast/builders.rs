//! Builder functions for expression nodes.
//!
//! Member accesses come from [`Schema::col`](crate::ast::Schema::col);
//! everything else is assembled from the helpers here and the fluent
//! methods on [`Expr`].
//!
//! # Example
//! ```
//! use querycraft::ast::builders::*;
//! use querycraft::ast::{LogicalType, Schema, FieldDefinition};
//!
//! let t = Schema::new("TestClass")
//!     .with_field(FieldDefinition::new("Id", LogicalType::Int32))
//!     .with_field(FieldDefinition::new("Done", LogicalType::Boolean));
//!
//! let limit = 10;
//! let pred = t.col("Id").less_than(captured("limit", move || Ok(limit.into())))
//!     .and(not(t.col("Done")));
//! ```

use crate::ast::{BinaryOp, Expr, HostFn, UnaryOp, Value};
use crate::error::QueryResult;

/// A constant literal.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// Logical negation.
pub fn not(expr: impl Into<Expr>) -> Expr {
    Expr::unary(UnaryOp::Not, expr)
}

/// Arithmetic negation.
pub fn neg(expr: impl Into<Expr>) -> Expr {
    Expr::unary(UnaryOp::Negate, expr)
}

/// An ordered field list, for multi-column SELECT / ORDER BY / GROUP BY.
pub fn fields<I>(items: I) -> Expr
where
    I: IntoIterator<Item = Expr>,
{
    Expr::Construct {
        args: items.into_iter().collect(),
        ctor: None,
    }
}

/// Wrap a body the way a quoted lambda arrives.
pub fn lambda(body: impl Into<Expr>) -> Expr {
    Expr::Lambda(Box::new(body.into()))
}

/// First non-null of `value` and `fallback`.
pub fn coalesce(value: impl Into<Expr>, fallback: impl Into<Expr>) -> Expr {
    Expr::binary(BinaryOp::Coalesce, value, fallback)
}

/// A value captured from the host environment, read when the clause is translated.
pub fn captured<F>(name: impl Into<String>, read: F) -> Expr
where
    F: Fn() -> QueryResult<Value> + Send + Sync + 'static,
{
    Expr::Captured(HostFn::new(name, move |_| read()))
}

/// A free host function call, folded to a constant when translated.
pub fn call<F>(name: impl Into<String>, func: F, args: Vec<Expr>) -> Expr
where
    F: Fn(&[Value]) -> QueryResult<Value> + Send + Sync + 'static,
{
    Expr::Call {
        method: crate::ast::Method::Host(HostFn::new(name, func)),
        receiver: None,
        args,
    }
}

/// A host constructor call, folded to a constant when translated.
pub fn construct<F>(name: impl Into<String>, ctor: F, args: Vec<Expr>) -> Expr
where
    F: Fn(&[Value]) -> QueryResult<Value> + Send + Sync + 'static,
{
    Expr::Construct {
        args,
        ctor: Some(HostFn::new(name, ctor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keeps_order() {
        let list = fields([Expr::member("T", "B"), Expr::member("T", "A")]);
        match list {
            Expr::Construct { args, ctor: None } => {
                assert_eq!(args, vec![Expr::member("T", "B"), Expr::member("T", "A")]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_captured_reads_lazily() {
        let expr = captured("answer", || Ok(Value::Int(42)));
        match expr {
            Expr::Captured(f) => assert_eq!(f.call(&[]).unwrap(), Value::Int(42)),
            other => panic!("unexpected node {:?}", other),
        }
    }
}
