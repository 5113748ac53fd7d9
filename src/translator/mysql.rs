//! MySQL / MariaDB translator.

use chrono::NaiveDateTime;

use super::{Dialect, Translator, format};
use crate::ast::{FieldDefinition, LogicalType};
use crate::query::Clauses;

/// MySQL translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlTranslator;

impl MySqlTranslator {
    pub fn new() -> Self {
        Self
    }

    /// `IF [NOT] EXISTS (check) THEN stmt; END IF;`
    fn guarded(&self, negate: bool, check: &str, statement: &str) -> String {
        format!(
            "IF {}EXISTS ({}) THEN {}; END IF;",
            if negate { "NOT " } else { "" },
            check,
            statement
        )
    }

    fn statistics_check(&self, table: &str, index: &str) -> String {
        format!(
            "SELECT * FROM INFORMATION_SCHEMA.STATISTICS WHERE TABLE_SCHEMA=DATABASE() AND TABLE_NAME = '{}' AND INDEX_NAME = '{}'",
            table, index
        )
    }
}

impl Translator for MySqlTranslator {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn type_name_for(&self, ty: LogicalType, is_cast: bool) -> &'static str {
        match ty {
            LogicalType::Boolean => "BOOLEAN",
            LogicalType::Double
            | LogicalType::Decimal
            | LogicalType::Single
            | LogicalType::Currency
            | LogicalType::VarNumeric => "REAL",
            LogicalType::AnsiString
            | LogicalType::AnsiStringFixedLength
            | LogicalType::String
            | LogicalType::StringFixedLength
            | LogicalType::Guid
            | LogicalType::Object
            | LogicalType::Xml => "VARCHAR",
            LogicalType::Date
            | LogicalType::Time
            | LogicalType::DateTime
            | LogicalType::DateTime2
            | LogicalType::DateTimeOffset => "DATETIME",
            // integer family, binary and anything unlisted
            _ if is_cast => "SIGNED",
            _ => "INTEGER",
        }
    }

    fn is_null_function_name(&self) -> &'static str {
        "coalesce"
    }

    fn length_function_name(&self) -> &'static str {
        "length"
    }

    fn alias_format(&self) -> &'static str {
        "\"{0}\""
    }

    fn bool_literal(&self, value: bool) -> String {
        if value { "TRUE".to_string() } else { "FALSE".to_string() }
    }

    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn date_time_literal(&self, value: &NaiveDateTime) -> String {
        format!("'{}'", value.format("%Y-%m-%d %H:%M:%S%.6f"))
    }

    fn binary_literal(&self, value: &[u8]) -> String {
        let hex: String = value.iter().map(|b| format!("{:02X}", b)).collect();
        format!("X'{}'", hex)
    }

    fn concat(&self, parts: &[&str]) -> String {
        format!("CONCAT({})", parts.join(", "))
    }

    fn select_table_name(&self, logical: &str) -> String {
        self.table_name_for(logical)
    }

    fn apply_row_limit(&self, clauses: &mut Clauses, count: u64) {
        clauses.tail = format!("LIMIT {}", count);
    }

    fn apply_pagination(&self, clauses: &mut Clauses, page_size: u64, page_number: u64) {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        clauses.tail = format!("LIMIT {} OFFSET {}", page_size, offset);
    }

    fn column_definition(&self, field: &FieldDefinition) -> String {
        // PRIMARY KEY takes the place of the nullability token
        let extra = if field.is_primary_key() {
            "PRIMARY KEY"
        } else if field.is_nullable() {
            "NULL"
        } else {
            "NOT NULL"
        };
        let identity = if field.is_identity() { "AUTO_INCREMENT" } else { "" };
        format::render_column(
            self.column_format(field),
            field,
            self.type_name_for(field.logical_type(), false),
            extra,
            identity,
        )
    }

    fn exists_query(&self, query: &str) -> String {
        format!("SELECT EXISTS ({})", query)
    }

    fn database_exists_query(&self, name: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME='{}'",
            name
        )
    }

    fn table_exists_query(&self, table: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM information_schema.tables WHERE table_name='{}'",
            table
        )
    }

    fn column_exists_query(&self, table: &str, column: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM information_schema.COLUMNS WHERE table_name='{}' AND COLUMN_NAME='{}'",
            table, column
        )
    }

    fn index_exists_query(&self, index: &str, table: &str) -> String {
        format!(
            "SELECT COUNT(1) FROM information_schema.statistics WHERE INDEX_NAME='{}' AND TABLE_NAME='{}'",
            index, table
        )
    }

    fn foreign_key_exists_query(&self, key: &str, _table: &str) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.REFERENTIAL_CONSTRAINTS WHERE CONSTRAINT_NAME = '{}'",
            key
        )
    }

    fn create_foreign_key_if_not_exists_query(
        &self,
        key: &str,
        table_from: &str,
        column_from: &str,
        table_to: &str,
        column_to: &str,
    ) -> String {
        let check = format!(
            "SELECT * FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS WHERE CONSTRAINT_SCHEMA=DATABASE() AND CONSTRAINT_NAME = '{}'",
            key
        );
        let statement = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            table_from, key, column_from, table_to, column_to
        );
        self.guarded(true, &check, &statement)
    }

    fn drop_foreign_key_query(&self, table: &str, key: &str) -> String {
        format!("ALTER TABLE {} DROP FOREIGN KEY {}", table, key)
    }

    fn drop_foreign_key_if_exists_query(&self, table: &str, key: &str) -> String {
        let check = format!(
            "SELECT * FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS WHERE CONSTRAINT_SCHEMA=DATABASE() AND CONSTRAINT_NAME = '{}'",
            key
        );
        self.guarded(false, &check, &self.drop_foreign_key_query(table, key))
    }

    fn create_index_if_not_exists_query(
        &self,
        index: &str,
        table: &str,
        columns: &[&str],
        unique: bool,
    ) -> String {
        let statement = format!(
            "CREATE{} INDEX {} ON {}({})",
            if unique { " UNIQUE" } else { "" },
            index,
            table,
            columns.join(", ")
        );
        self.guarded(true, &self.statistics_check(table, index), &statement)
    }

    fn drop_index_query(&self, table: &str, index: &str) -> String {
        format!("ALTER TABLE {} DROP INDEX {}", table, index)
    }

    fn drop_index_if_exists_query(&self, table: &str, index: &str) -> String {
        self.guarded(
            false,
            &self.statistics_check(table, index),
            &self.drop_index_query(table, index),
        )
    }

    fn create_column_if_not_exists_query(&self, table: &str, field: &FieldDefinition) -> String {
        let check = format!(
            "SELECT * FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_SCHEMA=DATABASE() AND TABLE_NAME = '{}' AND COLUMN_NAME = '{}'",
            table,
            field.name()
        );
        self.guarded(true, &check, &self.create_column_query(table, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::OperatorTag;

    #[test]
    fn test_type_names() {
        let t = MySqlTranslator::new();
        assert_eq!(t.type_name_for(LogicalType::Boolean, false), "BOOLEAN");
        assert_eq!(t.type_name_for(LogicalType::Currency, false), "REAL");
        assert_eq!(t.type_name_for(LogicalType::Guid, false), "VARCHAR");
        assert_eq!(t.type_name_for(LogicalType::Time, false), "DATETIME");
        assert_eq!(t.type_name_for(LogicalType::Int64, false), "INTEGER");
        assert_eq!(t.type_name_for(LogicalType::Int64, true), "SIGNED");
        assert_eq!(t.type_name_for(LogicalType::String, true), "VARCHAR");
    }

    #[test]
    fn test_coalesce_uses_mysql_function() {
        let t = MySqlTranslator::new();
        assert_eq!(
            t.format_for(OperatorTag::Coalesce).as_deref(),
            Some("coalesce({0}, {1})")
        );
        assert_eq!(t.format_for(OperatorTag::Length).as_deref(), Some("length({0})"));
    }

    #[test]
    fn test_column_definition() {
        let t = MySqlTranslator::new();
        let id = FieldDefinition::new("Id", LogicalType::Int32)
            .primary_key()
            .identity(1, 1);
        assert_eq!(t.column_definition(&id), "Id INTEGER PRIMARY KEY AUTO_INCREMENT");

        let name = FieldDefinition::new("Name", LogicalType::String).size(64).nullable();
        assert_eq!(t.column_definition(&name), "Name VARCHAR(64) NULL");
    }

    #[test]
    fn test_limits_go_to_tail() {
        let t = MySqlTranslator::new();
        let mut clauses = Clauses::default();
        t.apply_row_limit(&mut clauses, 10);
        assert_eq!(clauses.select_format, "{0}");
        assert_eq!(clauses.tail, "LIMIT 10");

        t.apply_pagination(&mut clauses, 20, 3);
        assert_eq!(clauses.tail, "LIMIT 20 OFFSET 40");
    }

    #[test]
    fn test_guarded_index() {
        let t = MySqlTranslator::new();
        assert_eq!(
            t.create_index_if_not_exists_query("IX_Name", "Users", &["Name"], true),
            "IF NOT EXISTS (SELECT * FROM INFORMATION_SCHEMA.STATISTICS WHERE TABLE_SCHEMA=DATABASE() AND TABLE_NAME = 'Users' AND INDEX_NAME = 'IX_Name') THEN CREATE UNIQUE INDEX IX_Name ON Users(Name); END IF;"
        );
        assert_eq!(
            t.drop_index_if_exists_query("Users", "IX_Name"),
            "IF EXISTS (SELECT * FROM INFORMATION_SCHEMA.STATISTICS WHERE TABLE_SCHEMA=DATABASE() AND TABLE_NAME = 'Users' AND INDEX_NAME = 'IX_Name') THEN ALTER TABLE Users DROP INDEX IX_Name; END IF;"
        );
    }

    #[test]
    fn test_literals() {
        let t = MySqlTranslator::new();
        assert_eq!(t.bool_literal(true), "TRUE");
        assert_eq!(t.string_literal(r"it's a\b"), r"'it''s a\\b'");
        assert_eq!(t.binary_literal(&[0xde, 0xad]), "X'DEAD'");
    }
}
