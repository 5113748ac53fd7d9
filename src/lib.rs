//! # querycraft: typed SQL statement construction
//!
//! querycraft turns predicate and projection expressions written against
//! row schemas into SQL text for one of several dialects.
//!
//! ## Quick Example
//!
//! ```rust
//! use querycraft::prelude::*;
//!
//! let users = Schema::new("Users")
//!     .with_field(FieldDefinition::new("Id", LogicalType::Int32).primary_key())
//!     .with_field(FieldDefinition::new("Active", LogicalType::Boolean));
//!
//! let sql = Query::new(users.clone(), Dialect::MySql.translator())
//!     .where_clause(users.col("Active").and(users.col("Id").greater_than(10)))
//!     .order_by(users.col("Id"))
//!     .top(5)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM Users WHERE ((Users.Active = TRUE) AND (Users.Id > 10)) ORDER BY Users.Id LIMIT 5"
//! );
//! ```
//!
//! ## Layout
//!
//! | Module       | Role                                              |
//! |--------------|---------------------------------------------------|
//! | `ast`        | Expression nodes, schemas, literal values         |
//! | `walker`     | Normalize, flatten and render expressions         |
//! | `translator` | Per-dialect operators, types, literals and DDL    |
//! | `query`      | Fluent SELECT builder and statement assembly      |
//! | `parser`     | Text predicates such as `Users.Id > 10`           |

pub mod ast;
pub mod binding;
pub mod config;
pub mod error;
pub mod parser;
pub mod query;
pub mod translator;
pub mod walker;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::binding::{BindingStore, Parameters};
    pub use crate::config::{LiteralPolicy, QueryConfig};
    pub use crate::error::*;
    pub use crate::parser::parse;
    pub use crate::query::{Query, Statement};
    pub use crate::translator::{Dialect, Translator};
}

/// Parse a predicate string into an expression.
///
/// # Example
///
/// ```
/// use querycraft::parse;
///
/// let expr = parse("Users.Id = 7").unwrap();
/// assert_eq!(expr, querycraft::ast::Expr::member("Users", "Id").equals(7));
/// ```
pub fn parse(input: &str) -> Result<ast::Expr, error::QueryError> {
    parser::parse(input)
}
