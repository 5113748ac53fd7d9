//! Dialect translators.
//!
//! A translator is the per-database half of statement generation: operator
//! templates, type keywords, literal spelling, row limiting and the DDL /
//! existence statements. Every method has a baseline implementation; the
//! MySQL and SQL Server translators override what their engines spell
//! differently.

pub mod default;
pub mod format;
pub mod mysql;
pub mod sqlserver;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ast::{FieldDefinition, LogicalType, OperatorTag, SqlMethod};
use crate::error::QueryError;
use crate::query::Clauses;

pub use default::DefaultTranslator;
pub use format::apply_format;
pub use mysql::MySqlTranslator;
pub use sqlserver::SqlServerTranslator;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Default,
    MySql,
    SqlServer,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Default, Dialect::MySql, Dialect::SqlServer];

    pub fn translator(&self) -> Arc<dyn Translator> {
        match self {
            Dialect::Default => Arc::new(DefaultTranslator),
            Dialect::MySql => Arc::new(MySqlTranslator),
            Dialect::SqlServer => Arc::new(SqlServerTranslator),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Default => write!(f, "default"),
            Dialect::MySql => write!(f, "mysql"),
            Dialect::SqlServer => write!(f, "sqlserver"),
        }
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Dialect::Default),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            other => Err(QueryError::Config(format!("Unknown dialect: '{}'", other))),
        }
    }
}

/// Per-dialect text generation. Implementations are stateless.
pub trait Translator: fmt::Debug + Send + Sync {
    fn dialect(&self) -> Dialect;

    // ---- expressions ----

    /// Template for an operator, `{0}`/`{1}`/`{2}` marking operand positions.
    /// `None` means the dialect cannot render the operator.
    fn format_for(&self, tag: OperatorTag) -> Option<String> {
        format::standard_format(
            tag,
            self.is_null_function_name(),
            self.length_function_name(),
            &self.like_escape(),
        )
    }

    /// The LIKE escape character as a literal in this dialect.
    fn like_escape(&self) -> String {
        self.string_literal(&SqlMethod::ESCAPE.to_string())
    }

    /// Type keyword for a logical type, in column definitions or in CAST.
    fn type_name_for(&self, ty: LogicalType, _is_cast: bool) -> &'static str {
        match ty {
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::Single | LogicalType::Double => "REAL",
            LogicalType::Decimal | LogicalType::Currency | LogicalType::VarNumeric => "DECIMAL",
            LogicalType::AnsiString
            | LogicalType::AnsiStringFixedLength
            | LogicalType::String
            | LogicalType::StringFixedLength
            | LogicalType::Guid
            | LogicalType::Object
            | LogicalType::Xml => "VARCHAR",
            LogicalType::Date => "DATE",
            LogicalType::Time => "TIME",
            LogicalType::DateTime | LogicalType::DateTime2 | LogicalType::DateTimeOffset => {
                "TIMESTAMP"
            }
            LogicalType::Binary => "BLOB",
            // integer family and anything unlisted
            _ => "INTEGER",
        }
    }

    fn is_null_function_name(&self) -> &'static str {
        "ISNULL"
    }

    fn length_function_name(&self) -> &'static str {
        "LEN"
    }

    fn alias_format(&self) -> &'static str {
        "[{0}]"
    }

    fn order_by_descending_format(&self) -> &'static str {
        "{0} DESC"
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "1".to_string() } else { "0".to_string() }
    }

    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn date_literal(&self, value: &NaiveDate) -> String {
        format!("'{}'", value.format("%Y-%m-%d"))
    }

    fn time_literal(&self, value: &NaiveTime) -> String {
        format!("'{}'", value.format("%H:%M:%S"))
    }

    fn date_time_literal(&self, value: &NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%d %H:%M:%S"))
    }

    fn binary_literal(&self, value: &[u8]) -> String {
        let hex: String = value.iter().map(|b| format!("{:02X}", b)).collect();
        format!("0x{}", hex)
    }

    /// String concatenation, used for non-literal LIKE patterns.
    fn concat(&self, parts: &[&str]) -> String {
        parts.join(" || ")
    }

    /// How a bound parameter is spelled in the statement text.
    fn placeholder(&self, name: &str) -> String {
        format!("@{}", name)
    }

    // ---- statement structure ----

    fn table_name_for(&self, logical: &str) -> String {
        logical.to_string()
    }

    /// Table reference as used in FROM and JOIN, with any read hint.
    fn select_table_name(&self, logical: &str) -> String {
        format!("{} WITH(NOLOCK)", self.table_name_for(logical))
    }

    fn apply_row_limit(&self, clauses: &mut Clauses, count: u64) {
        clauses.select_format = format!("TOP ({}) {{0}}", count);
    }

    fn apply_pagination(&self, clauses: &mut Clauses, page_size: u64, page_number: u64) {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        clauses.tail = format!(
            "OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
            offset, page_size
        );
    }

    fn apply_count(&self, clauses: &mut Clauses) {
        clauses.columns = "COUNT(*)".to_string();
    }

    // ---- DDL ----

    fn column_format(&self, field: &FieldDefinition) -> &'static str {
        format::standard_column_format(field)
    }

    fn column_definition(&self, field: &FieldDefinition) -> String {
        let nullable = if field.is_nullable() { "NULL" } else { "NOT NULL" };
        let extra = if field.is_primary_key() {
            format!("{} PRIMARY KEY", nullable)
        } else {
            nullable.to_string()
        };
        let identity = if field.is_identity() {
            format!(
                "GENERATED BY DEFAULT AS IDENTITY (START WITH {} INCREMENT BY {})",
                field.identity_start(),
                field.identity_increment()
            )
        } else {
            String::new()
        };
        format::render_column(
            self.column_format(field),
            field,
            self.type_name_for(field.logical_type(), false),
            &extra,
            &identity,
        )
    }

    /// Wrap a query so it yields 1 when it returns rows and 0 otherwise.
    /// The `*_exists_query` statements already count; pass a row-returning
    /// check here, not one of those.
    fn exists_query(&self, query: &str) -> String {
        format!("SELECT CASE WHEN EXISTS ({}) THEN 1 ELSE 0 END", query)
    }

    fn database_exists_query(&self, name: &str) -> String {
        format!("SELECT COUNT(1) FROM sys.databases WHERE name = '{}'", name)
    }

    fn create_database_if_not_exists_query(&self, name: &str) -> String {
        format!("CREATE DATABASE IF NOT EXISTS {}", name)
    }

    fn drop_database_if_exists_query(&self, name: &str) -> String {
        format!("DROP DATABASE IF EXISTS {}", name)
    }

    fn table_exists_query(&self, table: &str) -> String {
        format!("SELECT COUNT(1) FROM sys.tables WHERE name = '{}'", table)
    }

    fn column_exists_query(&self, table: &str, column: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM sys.columns WHERE name = '{}' AND object_id = OBJECT_ID('{}')",
            column, table
        )
    }

    fn index_exists_query(&self, index: &str, table: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM sys.indexes WHERE name = '{}' AND object_id = OBJECT_ID('{}')",
            index, table
        )
    }

    fn foreign_key_exists_query(&self, key: &str, table: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM sys.foreign_keys WHERE name = '{}' AND parent_object_id = OBJECT_ID('{}')",
            key, table
        )
    }

    /// Ordered statements creating the table when it is missing.
    fn create_table_if_not_exists_query(&self, table: &str, fields: &[FieldDefinition]) -> Vec<String> {
        let columns: Vec<String> = fields.iter().map(|f| self.column_definition(f)).collect();
        vec![format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_name_for(table),
            columns.join(", ")
        )]
    }

    fn create_foreign_key_if_not_exists_query(
        &self,
        key: &str,
        table_from: &str,
        column_from: &str,
        table_to: &str,
        column_to: &str,
    ) -> String {
        format!(
            "IF NOT EXISTS (SELECT * FROM sys.foreign_keys WHERE name = '{1}' AND parent_object_id = OBJECT_ID('{0}')) ALTER TABLE {0} ADD CONSTRAINT {1} FOREIGN KEY ({2}) REFERENCES {3} ({4})",
            table_from, key, column_from, table_to, column_to
        )
    }

    fn drop_foreign_key_query(&self, table: &str, key: &str) -> String {
        format!("ALTER TABLE {} DROP CONSTRAINT {}", table, key)
    }

    fn drop_foreign_key_if_exists_query(&self, table: &str, key: &str) -> String {
        format!("ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}", table, key)
    }

    fn create_index_if_not_exists_query(
        &self,
        index: &str,
        table: &str,
        columns: &[&str],
        unique: bool,
    ) -> String {
        format!(
            "CREATE{} INDEX IF NOT EXISTS {} ON {}({})",
            if unique { " UNIQUE" } else { "" },
            index,
            table,
            columns.join(", ")
        )
    }

    fn drop_index_query(&self, table: &str, index: &str) -> String {
        format!("DROP INDEX {} ON {}", index, table)
    }

    fn drop_index_if_exists_query(&self, table: &str, index: &str) -> String {
        format!("DROP INDEX IF EXISTS {} ON {}", index, table)
    }

    fn create_column_query(&self, table: &str, field: &FieldDefinition) -> String {
        format!("ALTER TABLE {} ADD COLUMN {}", table, self.column_definition(field))
    }

    fn create_column_if_not_exists_query(&self, table: &str, field: &FieldDefinition) -> String {
        format!(
            "IF NOT EXISTS (SELECT * FROM sys.columns WHERE name = '{}' AND object_id = OBJECT_ID('{}')) {}",
            field.name(),
            table,
            self.create_column_query(table, field)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("mssql".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_translator_reports_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.translator().dialect(), dialect);
        }
    }

    #[test]
    fn test_every_tag_has_a_template() {
        let tags = [
            OperatorTag::Equal,
            OperatorTag::NotEqual,
            OperatorTag::GreaterThan,
            OperatorTag::GreaterThanOrEqual,
            OperatorTag::LessThan,
            OperatorTag::LessThanOrEqual,
            OperatorTag::AndAlso,
            OperatorTag::OrElse,
            OperatorTag::Not,
            OperatorTag::LikeEscaped,
            OperatorTag::Contains,
            OperatorTag::StartsWith,
            OperatorTag::EndsWith,
        ];
        for dialect in Dialect::ALL {
            let translator = dialect.translator();
            for tag in tags {
                assert!(translator.format_for(tag).is_some(), "{} has no {}", dialect, tag);
            }
        }
    }

    #[test]
    fn test_pagination_offset_saturates() {
        let mut clauses = Clauses::default();
        DefaultTranslator.apply_pagination(&mut clauses, u64::MAX, 3);
        assert_eq!(
            clauses.tail,
            format!("OFFSET {0} ROWS FETCH NEXT {0} ROWS ONLY", u64::MAX)
        );

        MySqlTranslator.apply_pagination(&mut clauses, u64::MAX, 3);
        assert_eq!(clauses.tail, format!("LIMIT {0} OFFSET {0}", u64::MAX));
    }

    #[test]
    fn test_like_escape_spelling() {
        assert_eq!(
            DefaultTranslator.format_for(OperatorTag::LikeEscaped).as_deref(),
            Some("({0} LIKE {1} ESCAPE '\\')")
        );
        assert_eq!(MySqlTranslator.like_escape(), "'\\\\'");
    }
}
