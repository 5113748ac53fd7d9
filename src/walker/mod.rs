//! Expression walker: turns expression trees into SQL fragments.
//!
//! A predicate goes through three passes. `normalize` rewrites and folds
//! the tree, `flatten` lays it out in prefix order, and `reconstruct`
//! consumes that sequence, asking the translator for each operator's
//! template.

pub mod flatten;
pub mod literal;
pub mod normalize;

use crate::ast::{Expr, FieldDefinition, OperatorTag, Schema, SqlMethod, UnaryOp};
use crate::binding::BindingStore;
use crate::error::{QueryError, QueryResult};
use crate::translator::{Translator, apply_format};

use self::flatten::{Assemble, Token};
use self::normalize::Position;

/// The schemas a fragment may reference.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    schemas: Vec<&'a Schema>,
}

impl<'a> Scope<'a> {
    pub fn new(schemas: Vec<&'a Schema>) -> Self {
        Self { schemas }
    }

    /// Find the definition a member access points at.
    pub fn resolve(&self, table: &str, field: &str) -> QueryResult<&'a FieldDefinition> {
        let schema = self
            .schemas
            .iter()
            .find(|s| s.name() == table)
            .ok_or_else(|| QueryError::UnknownTable(table.to_string()))?;
        schema
            .field(field)
            .ok_or_else(|| QueryError::schema_mismatch(table, field))
    }
}

/// Translates expressions bound to a scope into one dialect.
pub struct Walker<'a> {
    translator: &'a dyn Translator,
    scope: Scope<'a>,
    bindings: Option<&'a mut dyn BindingStore>,
}

impl<'a> Walker<'a> {
    pub fn new(translator: &'a dyn Translator, schemas: Vec<&'a Schema>) -> Self {
        Self {
            translator,
            scope: Scope::new(schemas),
            bindings: None,
        }
    }

    /// Bind literals into `store` instead of rendering them inline.
    pub fn with_bindings(mut self, store: &'a mut dyn BindingStore) -> Self {
        self.bindings = Some(store);
        self
    }

    /// Translate a condition (WHERE, HAVING, JOIN ... ON).
    pub fn predicate(&mut self, expr: &Expr) -> QueryResult<String> {
        self.translate(expr, Position::Predicate)
    }

    /// Translate a value expression, e.g. a computed projection.
    pub fn expression(&mut self, expr: &Expr) -> QueryResult<String> {
        self.translate(expr, Position::Operand)
    }

    /// Ordered `Table.Field` list for SELECT, ORDER BY and GROUP BY.
    ///
    /// Accepts a single member or a field list of members.
    pub fn field_list(&self, expr: &Expr) -> QueryResult<Vec<String>> {
        match expr {
            Expr::Lambda(body) => self.field_list(body),
            Expr::Member { table, field } => Ok(vec![self.column(table, field)?]),
            Expr::Construct { args, ctor: None } => {
                let mut columns = Vec::with_capacity(args.len());
                for arg in args {
                    match arg {
                        Expr::Member { table, field } => columns.push(self.column(table, field)?),
                        other => {
                            return Err(QueryError::malformed(format!(
                                "field list entries must be columns, found {:?}",
                                other
                            )));
                        }
                    }
                }
                Ok(columns)
            }
            other => Err(QueryError::malformed(format!(
                "expected a column or a field list, found {:?}",
                other
            ))),
        }
    }

    fn translate(&mut self, expr: &Expr, position: Position) -> QueryResult<String> {
        let normalized = normalize::normalize(expr, position, &self.scope)?;
        let tokens = flatten::flatten(&normalized)?;
        let sql = flatten::reconstruct(&tokens, self)?;
        tracing::debug!("Translated {} fragment: {}", self.translator.dialect(), sql);
        Ok(sql)
    }

    fn column(&self, table: &str, field: &str) -> QueryResult<String> {
        self.scope.resolve(table, field)?;
        Ok(format!("{}.{}", self.translator.table_name_for(table), field))
    }

    fn apply(&self, tag: OperatorTag, operands: &[&str]) -> QueryResult<String> {
        let template = self
            .translator
            .format_for(tag)
            .ok_or(QueryError::UnmappedOperator {
                tag,
                dialect: self.translator.dialect(),
            })?;
        Ok(apply_format(&template, operands))
    }

    /// LIKE pattern for a column-valued needle.
    fn wildcard(&self, method: SqlMethod, needle: &str) -> String {
        let any = self.translator.string_literal("%");
        match method {
            SqlMethod::StartsWith => self.translator.concat(&[needle, any.as_str()]),
            SqlMethod::EndsWith => self.translator.concat(&[any.as_str(), needle]),
            _ => self.translator.concat(&[any.as_str(), needle, any.as_str()]),
        }
    }
}

impl<'e> Assemble<'e> for Walker<'_> {
    type Output = String;

    fn assemble(&mut self, token: &Token<'e>, operands: Vec<String>) -> QueryResult<String> {
        let args: Vec<&str> = operands.iter().map(String::as_str).collect();
        match token {
            Token::Member { table, field } => self.column(table, field),
            Token::Constant(value) => Ok(match self.bindings.as_deref_mut() {
                Some(store) => literal::bind(self.translator, store, value),
                None => literal::inline(self.translator, value),
            }),
            Token::Binary(op) => self.apply(op.tag(), &args),
            Token::Unary(op @ UnaryOp::Convert(ty)) => {
                let type_name = self.translator.type_name_for(*ty, true);
                self.apply(op.tag(), &[args[0], type_name])
            }
            Token::Unary(op) => self.apply(op.tag(), &args),
            Token::Method { method, .. } => match method {
                SqlMethod::Contains | SqlMethod::StartsWith | SqlMethod::EndsWith => {
                    let pattern = self.wildcard(*method, args[1]);
                    self.apply(method.tag(), &[args[0], pattern.as_str()])
                }
                SqlMethod::In => {
                    let list = args[1..].join(", ");
                    self.apply(method.tag(), &[args[0], list.as_str()])
                }
                _ => self.apply(method.tag(), &args),
            },
        }
    }
}
