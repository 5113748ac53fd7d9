#![allow(dead_code)]

use querycraft::ast::{FieldDefinition, LogicalType, Schema, Table};

pub struct TestClass;

impl Table for TestClass {
    fn schema() -> Schema {
        Schema::new("TestClass")
            .with_field(
                FieldDefinition::new("Id", LogicalType::Int32)
                    .primary_key()
                    .identity(1, 1),
            )
            .with_field(FieldDefinition::new("Name", LogicalType::String).size(255).nullable())
            .with_field(FieldDefinition::new("Number", LogicalType::Int32))
            .with_field(FieldDefinition::new("Done", LogicalType::Boolean))
            .with_field(FieldDefinition::new("InsertDate", LogicalType::DateTime))
            .with_field(FieldDefinition::new("TestClass2Id", LogicalType::Int32))
    }
}

pub struct TestClass2;

impl Table for TestClass2 {
    fn schema() -> Schema {
        Schema::new("TestClass2")
            .with_field(FieldDefinition::new("Id", LogicalType::Int32).primary_key())
            .with_field(FieldDefinition::new("Title", LogicalType::String).size(100))
    }
}

pub struct TestClass3;

impl Table for TestClass3 {
    fn schema() -> Schema {
        Schema::new("TestClass3")
            .with_field(FieldDefinition::new("Id", LogicalType::Int32).primary_key())
    }
}
