//! Statement assembly.

use std::fmt;

use super::Query;
use crate::binding::Parameters;
use crate::error::QueryResult;
use crate::translator::{Translator, apply_format};

/// An assembled statement and the values bound while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    parameters: Parameters,
}

impl Statement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.sql, self.parameters)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl Query {
    /// Assemble the statement, consuming the builder.
    ///
    /// Fails with the first error any clause method ran into.
    pub fn build(self) -> QueryResult<Statement> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let clauses = self.clauses;

        let mut sql = String::from("SELECT ");
        sql.push_str(&apply_format(&clauses.select_format, &[clauses.columns.as_str()]));
        sql.push_str(" FROM ");
        sql.push_str(&clauses.from);

        let optional = [
            ("WHERE", &clauses.filter),
            ("GROUP BY", &clauses.group_by),
            ("HAVING", &clauses.having),
            ("ORDER BY", &clauses.order_by),
        ];
        for (keyword, text) in optional {
            if !text.trim().is_empty() {
                sql.push_str(&format!(" {} {}", keyword, text));
            }
        }
        if !clauses.tail.trim().is_empty() {
            sql.push(' ');
            sql.push_str(&clauses.tail);
        }

        let mut parameters = self.parameters;
        let sets = self
            .unions
            .into_iter()
            .map(|q| ("UNION", q))
            .chain(self.union_alls.into_iter().map(|q| ("UNION ALL", q)));
        for (keyword, sub) in sets {
            let translator = sub.translator.clone();
            let (sub_sql, mut sub_parameters) = sub.build()?.into_parts();
            let renames = sub_parameters.renumber(parameters.len());
            let sub_sql = rename_placeholders(sub_sql, translator.as_ref(), &renames);
            parameters.merge(sub_parameters)?;
            sql.push_str(&format!(" {} {}", keyword, sub_sql));
        }

        tracing::debug!("Built {} statement: {}", self.translator.dialect(), sql);
        Ok(Statement { sql, parameters })
    }

    /// Build and keep only the text.
    pub fn to_sql(self) -> QueryResult<String> {
        self.build().map(|statement| statement.sql)
    }
}

fn rename_placeholders(mut sql: String, translator: &dyn Translator, renames: &[(String, String)]) -> String {
    for (old, new) in renames {
        sql = replace_placeholder(&sql, &translator.placeholder(old), &translator.placeholder(new));
    }
    sql
}

/// Replace whole placeholders only: `@p1` must not match inside `@p12`,
/// and quoted literals and identifiers are copied untouched.
fn replace_placeholder(sql: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut close: Option<char> = None;
    let mut at = 0;

    while let Some(c) = sql[at..].chars().next() {
        if let Some(end) = close {
            // a doubled quote closes and reopens, which leaves us inside
            if c == end {
                close = None;
            }
        } else if sql[at..].starts_with(from)
            && !sql[at + from.len()..].starts_with(|c: char| c.is_ascii_digit())
        {
            out.push_str(to);
            at += from.len();
            continue;
        } else {
            close = match c {
                '\'' => Some('\''),
                '"' => Some('"'),
                '[' => Some(']'),
                _ => None,
            };
        }
        out.push(c);
        at += c.len_utf8();
    }
    out
}
