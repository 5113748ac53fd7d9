use super::{Dialect, Translator};

/// Baseline translator: every method keeps its trait default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn dialect(&self) -> Dialect {
        Dialect::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldDefinition, LogicalType};

    #[test]
    fn test_read_hint() {
        assert_eq!(DefaultTranslator.select_table_name("TestClass"), "TestClass WITH(NOLOCK)");
    }

    #[test]
    fn test_column_definition() {
        let field = FieldDefinition::new("Id", LogicalType::Int32)
            .primary_key()
            .identity(1, 1);
        assert_eq!(
            DefaultTranslator.column_definition(&field),
            "Id INTEGER NOT NULL PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY (START WITH 1 INCREMENT BY 1)"
        );

        let name = FieldDefinition::new("Name", LogicalType::String).size(50).nullable();
        assert_eq!(DefaultTranslator.column_definition(&name), "Name VARCHAR(50) NULL");

        let price = FieldDefinition::new("Price", LogicalType::Decimal).size(10).precision(2);
        assert_eq!(DefaultTranslator.column_definition(&price), "Price DECIMAL(10,2) NOT NULL");
    }

    #[test]
    fn test_create_table_is_single_statement() {
        let fields = [
            FieldDefinition::new("Id", LogicalType::Int32).primary_key(),
            FieldDefinition::new("Done", LogicalType::Boolean),
        ];
        assert_eq!(
            DefaultTranslator.create_table_if_not_exists_query("TestClass", &fields),
            vec!["CREATE TABLE IF NOT EXISTS TestClass (Id INTEGER NOT NULL PRIMARY KEY, Done BOOLEAN NOT NULL)"]
        );
    }
}
