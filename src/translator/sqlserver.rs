//! SQL Server translator.
//!
//! Row limiting, pagination, the `WITH(NOLOCK)` read hint and the `sys.*`
//! guards for foreign keys and columns come from the trait defaults; this
//! type overrides the type table, the identity clause and the remaining
//! guarded DDL.

use chrono::NaiveDateTime;

use super::{Dialect, Translator, format};
use crate::ast::{FieldDefinition, LogicalType};

/// SQL Server translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerTranslator;

impl SqlServerTranslator {
    pub fn new() -> Self {
        Self
    }

    fn index_check(&self, index: &str, table: &str) -> String {
        format!(
            "SELECT * FROM sys.indexes WHERE name = '{}' AND object_id = OBJECT_ID('{}')",
            index, table
        )
    }

    fn foreign_key_check(&self, key: &str, table: &str) -> String {
        format!(
            "SELECT * FROM sys.foreign_keys WHERE name = '{}' AND parent_object_id = OBJECT_ID('{}')",
            key, table
        )
    }
}

impl Translator for SqlServerTranslator {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn type_name_for(&self, ty: LogicalType, _is_cast: bool) -> &'static str {
        match ty {
            LogicalType::Boolean => "BIT",
            LogicalType::Double
            | LogicalType::Decimal
            | LogicalType::Single
            | LogicalType::Currency
            | LogicalType::VarNumeric => "FLOAT",
            LogicalType::Time => "DATETIME",
            LogicalType::AnsiString
            | LogicalType::AnsiStringFixedLength
            | LogicalType::String
            | LogicalType::StringFixedLength
            | LogicalType::Guid
            | LogicalType::Object
            | LogicalType::Xml => "VARCHAR",
            LogicalType::Date
            | LogicalType::DateTime
            | LogicalType::DateTime2
            | LogicalType::DateTimeOffset => "DATETIME2",
            // integer family, binary, byte and anything unlisted
            _ => "INT",
        }
    }

    fn date_time_literal(&self, value: &NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }

    fn concat(&self, parts: &[&str]) -> String {
        parts.join(" + ")
    }

    fn column_format(&self, field: &FieldDefinition) -> &'static str {
        // FLOAT takes no (size,precision) pair
        if field.logical_type().is_exact_numeric() {
            "{0} {1} {4} {5}"
        } else {
            format::standard_column_format(field)
        }
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
                "IDENTITY({},{})",
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

    fn exists_query(&self, query: &str) -> String {
        format!("IF EXISTS ({}) SELECT 1 ELSE SELECT 0", query)
    }

    fn database_exists_query(&self, name: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM master.dbo.sysdatabases WHERE name = N'{}'",
            name
        )
    }

    fn create_database_if_not_exists_query(&self, name: &str) -> String {
        format!(
            "IF NOT EXISTS (SELECT name FROM master.dbo.sysdatabases WHERE name = N'{0}') CREATE DATABASE {0}",
            name
        )
    }

    fn drop_database_if_exists_query(&self, name: &str) -> String {
        format!(
            "IF EXISTS (SELECT name FROM master.dbo.sysdatabases WHERE name = N'{0}') DROP DATABASE {0}",
            name
        )
    }

    fn create_table_if_not_exists_query(&self, table: &str, fields: &[FieldDefinition]) -> Vec<String> {
        let columns: Vec<String> = fields.iter().map(|f| self.column_definition(f)).collect();
        let table = self.table_name_for(table);
        vec![format!(
            "IF NOT EXISTS(SELECT * FROM sys.tables WHERE name = '{0}') CREATE TABLE {0} ({1})",
            table,
            columns.join(",")
        )]
    }

    fn drop_foreign_key_if_exists_query(&self, table: &str, key: &str) -> String {
        format!(
            "IF EXISTS ({}) {}",
            self.foreign_key_check(key, table),
            self.drop_foreign_key_query(table, key)
        )
    }

    fn create_index_if_not_exists_query(
        &self,
        index: &str,
        table: &str,
        columns: &[&str],
        unique: bool,
    ) -> String {
        format!(
            "IF NOT EXISTS ({}) CREATE{} INDEX {} ON {}({})",
            self.index_check(index, table),
            if unique { " UNIQUE" } else { "" },
            index,
            table,
            columns.join(", ")
        )
    }

    fn create_column_query(&self, table: &str, field: &FieldDefinition) -> String {
        format!("ALTER TABLE {} ADD {}", table, self.column_definition(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_type_names() {
        let t = SqlServerTranslator::new();
        assert_eq!(t.type_name_for(LogicalType::Boolean, false), "BIT");
        assert_eq!(t.type_name_for(LogicalType::Decimal, false), "FLOAT");
        assert_eq!(t.type_name_for(LogicalType::Time, false), "DATETIME");
        assert_eq!(t.type_name_for(LogicalType::DateTimeOffset, false), "DATETIME2");
        assert_eq!(t.type_name_for(LogicalType::Binary, false), "INT");
        assert_eq!(t.type_name_for(LogicalType::UInt64, true), "INT");
    }

    #[test]
    fn test_create_table_is_one_guarded_statement() {
        let t = SqlServerTranslator::new();
        let fields = [
            FieldDefinition::new("Id", LogicalType::Int32)
                .primary_key()
                .identity(1, 1),
            FieldDefinition::new("Name", LogicalType::String).size(50).nullable(),
            FieldDefinition::new("Price", LogicalType::Decimal).size(10).precision(2),
        ];
        let statements = t.create_table_if_not_exists_query("Products", &fields);
        assert_eq!(
            statements,
            vec![
                "IF NOT EXISTS(SELECT * FROM sys.tables WHERE name = 'Products') CREATE TABLE Products (Id INT NOT NULL PRIMARY KEY IDENTITY(1,1),Name VARCHAR(50) NULL,Price FLOAT NOT NULL)"
            ]
        );
    }

    #[test]
    fn test_guards_have_no_end_if() {
        let t = SqlServerTranslator::new();
        let sql = t.create_index_if_not_exists_query("IX_Name", "Users", &["Name", "Email"], false);
        assert_eq!(
            sql,
            "IF NOT EXISTS (SELECT * FROM sys.indexes WHERE name = 'IX_Name' AND object_id = OBJECT_ID('Users')) CREATE INDEX IX_Name ON Users(Name, Email)"
        );
        assert!(!sql.contains("END IF"));
        assert_eq!(t.drop_index_if_exists_query("Users", "IX_Name"), "DROP INDEX IF EXISTS IX_Name ON Users");
    }

    #[test]
    fn test_database_guards() {
        let t = SqlServerTranslator::new();
        assert_eq!(
            t.create_database_if_not_exists_query("Shop"),
            "IF NOT EXISTS (SELECT name FROM master.dbo.sysdatabases WHERE name = N'Shop') CREATE DATABASE Shop"
        );
        assert_eq!(
            t.exists_query("SELECT 1 FROM Users"),
            "IF EXISTS (SELECT 1 FROM Users) SELECT 1 ELSE SELECT 0"
        );
    }

    #[test]
    fn test_date_time_literal() {
        let t = SqlServerTranslator::new();
        let value = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(13, 5, 9, 250)
            .unwrap();
        assert_eq!(t.date_time_literal(&value), "'2024-02-29T13:05:09.250'");
    }
}
