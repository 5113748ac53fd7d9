pub mod builders;
pub mod expr;
pub mod operators;
pub mod schema;
pub mod types;

pub use self::expr::{Expr, HostFn, Method};
pub use self::operators::{BinaryOp, OperatorTag, SqlMethod, UnaryOp};
pub use self::schema::{Catalog, FieldDefinition, Schema, SchemaReflector, Table};
pub use self::types::{LogicalType, Value};
