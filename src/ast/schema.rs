//! Row schemas, field definitions and the reflection seam.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, LogicalType};
use crate::error::{QueryError, QueryResult};

fn default_one() -> i64 {
    1
}

/// One column, as DDL generation sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    name: String,
    #[serde(rename = "type")]
    logical_type: LogicalType,
    #[serde(default)]
    size: u32,
    #[serde(default)]
    precision: u32,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    identity: bool,
    #[serde(default = "default_one")]
    identity_start: i64,
    #[serde(default = "default_one")]
    identity_increment: i64,
}

impl FieldDefinition {
    /// A non-null field with no size, key or identity.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            size: 0,
            precision: 0,
            nullable: false,
            primary_key: false,
            identity: false,
            identity_start: 1,
            identity_increment: 1,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn identity(mut self, start: i64, increment: i64) -> Self {
        self.identity = true;
        self.identity_start = start;
        self.identity_increment = increment;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logical_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn field_size(&self) -> u32 {
        self.size
    }

    pub fn field_precision(&self) -> u32 {
        self.precision
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn identity_start(&self) -> i64 {
        self.identity_start
    }

    pub fn identity_increment(&self) -> i64 {
        self.identity_increment
    }
}

/// A named row shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Member access on this schema. Resolution is checked when the
    /// expression is translated, not here.
    pub fn col(&self, field: &str) -> Expr {
        Expr::member(self.name.clone(), field)
    }
}

/// A row type that knows its own schema.
pub trait Table {
    fn schema() -> Schema;
}

/// Supplies the ordered field definitions for a table name.
pub trait SchemaReflector {
    fn reflect(&self, table: &str) -> QueryResult<Schema>;
}

/// In-memory set of schemas, loadable from TOML.
///
/// ```toml
/// [[tables]]
/// name = "TestClass"
///
/// [[tables.fields]]
/// name = "Id"
/// type = "int32"
/// primary_key = true
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<String, Schema>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tables: Vec<Schema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(input: &str) -> QueryResult<Self> {
        let file: CatalogFile =
            toml::from_str(input).map_err(|e| QueryError::Config(e.to_string()))?;
        let mut catalog = Self::new();
        for schema in file.tables {
            catalog.insert(schema);
        }
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> QueryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn insert(&mut self, schema: Schema) {
        self.tables.insert(schema.name.clone(), schema);
    }

    pub fn tables(&self) -> impl Iterator<Item = &Schema> {
        self.tables.values()
    }
}

impl SchemaReflector for Catalog {
    fn reflect(&self, table: &str) -> QueryResult<Schema> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| QueryError::UnknownTable(table.to_string()))
    }
}
