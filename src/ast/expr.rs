use std::fmt;
use std::sync::Arc;

use crate::ast::{BinaryOp, LogicalType, SqlMethod, UnaryOp, Value};
use crate::error::QueryResult;

type HostCallable = dyn Fn(&[Value]) -> QueryResult<Value> + Send + Sync;

/// A host-side computation stored on a node and evaluated while folding.
///
/// Captured values are zero-argument host functions. For method calls the
/// receiver's value is passed as the first argument.
#[derive(Clone)]
pub struct HostFn {
    name: String,
    func: Arc<HostCallable>,
}

impl HostFn {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> QueryResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> QueryResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFn({})", self.name)
    }
}

impl PartialEq for HostFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// What a method-call node invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    /// Rendered as the dialect's operator form
    Sql(SqlMethod),
    /// Folded into a constant at translation time
    Host(HostFn),
}

/// A language-neutral expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `Table.Field` on one of the schemas bound to the statement
    Member { table: String, field: String },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Constant(Value),
    /// Ordered argument list. Without a constructor it is a field list for
    /// multi-column clauses; with one it is folded like a host call.
    Construct {
        args: Vec<Expr>,
        ctor: Option<HostFn>,
    },
    Call {
        method: Method,
        receiver: Option<Box<Expr>>,
        args: Vec<Expr>,
    },
    /// Lambda wrapper, unwrapped to its body by the walker
    Lambda(Box<Expr>),
    /// A captured host value, folded to a constant
    Captured(HostFn),
}

impl Expr {
    pub fn member(table: impl Into<String>, field: impl Into<String>) -> Self {
        Expr::Member {
            table: table.into(),
            field: field.into(),
        }
    }

    pub fn binary(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    pub fn unary(op: UnaryOp, operand: impl Into<Expr>) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand.into()),
        }
    }

    pub fn sql_call(method: SqlMethod, receiver: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            method: Method::Sql(method),
            receiver: Some(Box::new(receiver)),
            args,
        }
    }

    pub fn equals(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Equal, self, other)
    }

    pub fn not_equals(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::NotEqual, self, other)
    }

    pub fn greater_than(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::GreaterThan, self, other)
    }

    pub fn greater_or_equal(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::GreaterThanOrEqual, self, other)
    }

    pub fn less_than(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LessThan, self, other)
    }

    pub fn less_or_equal(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::LessThanOrEqual, self, other)
    }

    pub fn and(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::AndAlso, self, other)
    }

    pub fn or(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::OrElse, self, other)
    }

    pub fn plus(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Add, self, other)
    }

    pub fn minus(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Subtract, self, other)
    }

    pub fn times(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Multiply, self, other)
    }

    pub fn divided_by(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Divide, self, other)
    }

    pub fn modulo(self, other: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Modulo, self, other)
    }

    pub fn or_else(self, fallback: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Coalesce, self, fallback)
    }

    pub fn like(self, pattern: impl Into<Expr>) -> Expr {
        Expr::sql_call(SqlMethod::Like, self, vec![pattern.into()])
    }

    pub fn contains(self, needle: impl Into<Expr>) -> Expr {
        Expr::sql_call(SqlMethod::Contains, self, vec![needle.into()])
    }

    pub fn starts_with(self, prefix: impl Into<Expr>) -> Expr {
        Expr::sql_call(SqlMethod::StartsWith, self, vec![prefix.into()])
    }

    pub fn ends_with(self, suffix: impl Into<Expr>) -> Expr {
        Expr::sql_call(SqlMethod::EndsWith, self, vec![suffix.into()])
    }

    pub fn is_in<I, E>(self, items: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::sql_call(SqlMethod::In, self, items.into_iter().map(Into::into).collect())
    }

    pub fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::sql_call(SqlMethod::Between, self, vec![low.into(), high.into()])
    }

    pub fn is_null(self) -> Expr {
        Expr::sql_call(SqlMethod::IsNull, self, Vec::new())
    }

    pub fn is_not_null(self) -> Expr {
        Expr::sql_call(SqlMethod::IsNotNull, self, Vec::new())
    }

    pub fn length(self) -> Expr {
        Expr::sql_call(SqlMethod::Length, self, Vec::new())
    }

    pub fn cast(self, ty: LogicalType) -> Expr {
        Expr::unary(UnaryOp::Convert(ty), self)
    }

    /// Call a host function on this value; folded at translation time.
    pub fn invoke(self, func: HostFn, args: Vec<Expr>) -> Expr {
        Expr::Call {
            method: Method::Host(func),
            receiver: Some(Box::new(self)),
            args,
        }
    }
}

macro_rules! expr_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Constant(Value::from(v))
                }
            }
        )*
    };
}

expr_from_literal!(
    bool,
    i32,
    i64,
    u32,
    f64,
    &str,
    String,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    uuid::Uuid,
);

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}
