//! Error types for querycraft.

use thiserror::Error;

use crate::ast::OperatorTag;
use crate::translator::Dialect;

/// The main error type for query construction.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The active dialect has no template for an operator the walker produced.
    #[error("No {dialect} mapping for operator '{tag}'")]
    UnmappedOperator { tag: OperatorTag, dialect: Dialect },

    /// An expression node did not have the shape the clause expects.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// A captured value or host function failed while being folded.
    #[error("Evaluation of '{name}' failed: {message}")]
    Evaluation { name: String, message: String },

    /// A member access names a field the bound schema does not declare.
    #[error("Field '{field}' is not declared on '{table}'")]
    SchemaMismatch { table: String, field: String },

    /// A member access names a schema that is not bound to the statement.
    #[error("Table '{0}' is not bound to this statement")]
    UnknownTable(String),

    /// Two binding stores hand out the same placeholder name.
    #[error("Binding '{0}' is already present")]
    DuplicateBinding(String),

    /// Failed to parse a predicate string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a malformed-expression error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedExpression(message.into())
    }

    /// Create an evaluation error, for host functions that fail while folding.
    pub fn evaluation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a schema-mismatch error.
    pub fn schema_mismatch(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            table: table.into(),
            field: field.into(),
        }
    }
}

/// Result type alias for querycraft operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );

        let err = QueryError::UnmappedOperator {
            tag: OperatorTag::Modulo,
            dialect: Dialect::MySql,
        };
        assert_eq!(err.to_string(), "No mysql mapping for operator 'Modulo'");
    }
}
