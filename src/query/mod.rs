//! Fluent SELECT statement builder.
//!
//! A [`Query`] is bound to one schema and one translator. Each clause
//! method hands its expression to the [`Walker`] and stores the fragment;
//! [`Query::build`] consumes the builder and assembles the statement.
//!
//! Clause methods never fail on their own. The first translation error is
//! kept and returned by `build`, and later clause calls are skipped.

mod build;
mod clauses;

pub use self::build::Statement;
pub use self::clauses::{Clauses, JoinKind};

use std::sync::Arc;

use crate::ast::{Expr, Schema, Table};
use crate::binding::Parameters;
use crate::config::{LiteralPolicy, QueryConfig};
use crate::error::{QueryError, QueryResult};
use crate::translator::{Translator, apply_format};
use crate::walker::Walker;

/// Which schemas a fragment may reference.
#[derive(Clone, Copy)]
enum Bound<'s> {
    /// The base schema and everything joined so far
    Statement,
    /// The base schema and one joined schema
    Join(&'s Schema),
    /// Two explicitly named schemas
    Between(&'s Schema, &'s Schema),
}

/// SELECT builder.
#[derive(Debug)]
pub struct Query {
    schema: Schema,
    translator: Arc<dyn Translator>,
    policy: LiteralPolicy,
    clauses: Clauses,
    joined: Vec<Schema>,
    unions: Vec<Query>,
    union_alls: Vec<Query>,
    parameters: Parameters,
    error: Option<QueryError>,
}

impl Query {
    pub fn new(schema: Schema, translator: Arc<dyn Translator>) -> Self {
        let clauses = Clauses {
            from: translator.select_table_name(schema.name()),
            ..Clauses::default()
        };
        Self {
            schema,
            translator,
            policy: LiteralPolicy::Inline,
            clauses,
            joined: Vec::new(),
            unions: Vec::new(),
            union_alls: Vec::new(),
            parameters: Parameters::new(),
            error: None,
        }
    }

    /// Query a statically described table.
    pub fn from_table<T: Table>(translator: Arc<dyn Translator>) -> Self {
        Self::new(T::schema(), translator)
    }

    /// Dialect and literal policy taken from a configuration.
    pub fn with_config(schema: Schema, config: &QueryConfig) -> Self {
        let mut query = Self::new(schema, config.translator());
        query.policy = config.literals;
        query
    }

    /// Switch the literal policy. Affects clauses added afterwards.
    pub fn literals(mut self, policy: LiteralPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }

    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The deferred error, if a clause failed to translate.
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    // ---- projection ----

    /// Add columns to the projection. The first call replaces `*`.
    pub fn select(mut self, columns: Expr) -> Self {
        if let Some(list) = self.attempt(|q| q.field_list(&columns)) {
            self.replace_star();
            clauses::append_list(&mut self.clauses.columns, &list);
        }
        self
    }

    /// Add an aliased value expression to the projection.
    pub fn select_as(mut self, value: Expr, alias: &str) -> Self {
        if let Some(sql) = self.attempt(|q| q.translate(Bound::Statement, &value, false)) {
            let alias = apply_format(self.translator.alias_format(), &[alias]);
            self.replace_star();
            clauses::append_list(&mut self.clauses.columns, &[format!("{} AS {}", sql, alias)]);
        }
        self
    }

    /// Project the row count.
    pub fn count(mut self) -> Self {
        self.translator.apply_count(&mut self.clauses);
        self
    }

    fn replace_star(&mut self) {
        if self.clauses.columns == "*" {
            self.clauses.columns.clear();
        }
    }

    // ---- conditions ----

    /// AND a condition into WHERE.
    pub fn where_clause(mut self, condition: Expr) -> Self {
        if let Some(sql) = self.attempt(|q| q.translate(Bound::Statement, &condition, true)) {
            clauses::combine(&mut self.clauses.filter, "AND", sql);
        }
        self
    }

    /// OR a condition into WHERE.
    pub fn or_where(mut self, condition: Expr) -> Self {
        if let Some(sql) = self.attempt(|q| q.translate(Bound::Statement, &condition, true)) {
            clauses::combine(&mut self.clauses.filter, "OR", sql);
        }
        self
    }

    /// AND a condition into HAVING.
    pub fn having(mut self, condition: Expr) -> Self {
        if let Some(sql) = self.attempt(|q| q.translate(Bound::Statement, &condition, true)) {
            clauses::combine(&mut self.clauses.having, "AND", sql);
        }
        self
    }

    // ---- joins ----

    /// `INNER JOIN other ON condition`, the condition relating the base
    /// schema to `other`.
    pub fn join(self, other: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Inner, Bound::Join(other), other, on)
    }

    /// `INNER JOIN right ON condition`, the condition relating two schemas
    /// already in the statement or joined by this call.
    pub fn join_between(self, left: &Schema, right: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Inner, Bound::Between(left, right), right, on)
    }

    pub fn left_join(self, other: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Left, Bound::Join(other), other, on)
    }

    pub fn left_join_between(self, left: &Schema, right: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Left, Bound::Between(left, right), right, on)
    }

    pub fn right_join(self, other: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Right, Bound::Join(other), other, on)
    }

    pub fn right_join_between(self, left: &Schema, right: &Schema, on: Expr) -> Self {
        self.add_join(JoinKind::Right, Bound::Between(left, right), right, on)
    }

    fn add_join(mut self, kind: JoinKind, bound: Bound<'_>, target: &Schema, on: Expr) -> Self {
        if let Some(sql) = self.attempt(|q| q.translate(bound, &on, true)) {
            let table = self.translator.select_table_name(target.name());
            self.clauses
                .from
                .push_str(&format!(" {} {} ON {}", kind, table, sql));
            if let Bound::Between(left, _) = bound {
                self.bind_schema(left);
            }
            self.bind_schema(target);
        }
        self
    }

    fn bind_schema(&mut self, schema: &Schema) {
        let known = self.schema.name() == schema.name()
            || self.joined.iter().any(|s| s.name() == schema.name());
        if !known {
            self.joined.push(schema.clone());
        }
    }

    // ---- ordering and grouping ----

    /// Append columns to ORDER BY.
    pub fn order_by(mut self, columns: Expr) -> Self {
        if let Some(list) = self.attempt(|q| q.field_list(&columns)) {
            clauses::append_list(&mut self.clauses.order_by, &list);
        }
        self
    }

    /// Append columns to ORDER BY, each descending.
    pub fn order_by_descending(mut self, columns: Expr) -> Self {
        if let Some(list) = self.attempt(|q| q.field_list(&columns)) {
            let format = self.translator.order_by_descending_format();
            let list: Vec<String> = list
                .iter()
                .map(|column| apply_format(format, &[column.as_str()]))
                .collect();
            clauses::append_list(&mut self.clauses.order_by, &list);
        }
        self
    }

    /// Append columns to GROUP BY.
    pub fn group_by(mut self, columns: Expr) -> Self {
        if let Some(list) = self.attempt(|q| q.field_list(&columns)) {
            clauses::append_list(&mut self.clauses.group_by, &list);
        }
        self
    }

    // ---- row limits ----

    /// Keep the first `count` rows.
    pub fn top(mut self, count: u64) -> Self {
        self.translator.apply_row_limit(&mut self.clauses, count);
        self
    }

    /// Keep page `page_number` (1-based) of `page_size` rows.
    pub fn paginate(mut self, page_size: u64, page_number: u64) -> Self {
        self.translator
            .apply_pagination(&mut self.clauses, page_size, page_number);
        self
    }

    // ---- set operations ----

    /// `... UNION <other>`. Sub-queries are assembled with this one.
    pub fn union(mut self, other: Query) -> Self {
        self.unions.push(other);
        self
    }

    /// `... UNION ALL <other>`.
    pub fn union_all(mut self, other: Query) -> Self {
        self.union_alls.push(other);
        self
    }

    // ---- translation ----

    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> QueryResult<T>) -> Option<T> {
        if self.error.is_some() {
            return None;
        }
        match f(self) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!("Deferring query error: {}", err);
                self.error = Some(err);
                None
            }
        }
    }

    fn translate(&mut self, bound: Bound<'_>, expr: &Expr, predicate: bool) -> QueryResult<String> {
        let schemas = match bound {
            Bound::Statement => {
                let mut schemas = vec![&self.schema];
                schemas.extend(&self.joined);
                schemas
            }
            Bound::Join(other) => vec![&self.schema, other],
            Bound::Between(left, right) => vec![left, right],
        };
        let mut walker = Walker::new(self.translator.as_ref(), schemas);
        if self.policy == LiteralPolicy::Parameterized {
            walker = walker.with_bindings(&mut self.parameters);
        }
        if predicate {
            walker.predicate(expr)
        } else {
            walker.expression(expr)
        }
    }

    fn field_list(&self, expr: &Expr) -> QueryResult<Vec<String>> {
        let mut schemas = vec![&self.schema];
        schemas.extend(&self.joined);
        Walker::new(self.translator.as_ref(), schemas).field_list(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::fields;
    use crate::ast::{FieldDefinition, LogicalType};
    use crate::translator::{DefaultTranslator, MySqlTranslator};

    fn test_class() -> Schema {
        Schema::new("TestClass")
            .with_field(FieldDefinition::new("Id", LogicalType::Int32))
            .with_field(FieldDefinition::new("Name", LogicalType::String))
    }

    #[test]
    fn test_first_select_replaces_star() {
        let t = test_class();
        let query = Query::new(t.clone(), Arc::new(DefaultTranslator))
            .select(t.col("Id"))
            .select(fields([t.col("Name")]));
        assert_eq!(query.clauses().columns, "TestClass.Id, TestClass.Name");
    }

    #[test]
    fn test_select_as_uses_alias_format() {
        let t = test_class();
        let query = Query::new(t.clone(), Arc::new(MySqlTranslator)).select_as(t.col("Id").plus(1), "Next");
        assert_eq!(query.clauses().columns, "(TestClass.Id + 1) AS \"Next\"");
    }

    #[test]
    fn test_first_error_is_kept() {
        let t = test_class();
        let query = Query::new(t.clone(), Arc::new(DefaultTranslator))
            .where_clause(t.col("Missing").equals(1))
            .where_clause(Expr::member("Nope", "Id").equals(1));
        assert!(matches!(query.error(), Some(QueryError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_join_extends_statement_scope() {
        let t = test_class();
        let other = Schema::new("Other").with_field(FieldDefinition::new("Id", LogicalType::Int32));

        let without = Query::new(t.clone(), Arc::new(DefaultTranslator))
            .where_clause(other.col("Id").equals(1));
        assert!(matches!(without.error(), Some(QueryError::UnknownTable(_))));

        let with = Query::new(t.clone(), Arc::new(DefaultTranslator))
            .join(&other, t.col("Id").equals(other.col("Id")))
            .where_clause(other.col("Id").equals(1));
        assert!(with.error().is_none());
        assert_eq!(with.clauses().filter, "(Other.Id = 1)");
    }
}
