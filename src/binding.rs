//! Binding store for parameterized literals.

use serde::Serialize;

use crate::ast::Value;
use crate::error::{QueryError, QueryResult};

/// Receives literal values the walker chose not to inline.
///
/// The store hands out the placeholder name; the dialect decides how the
/// name is spelled in the statement text.
pub trait BindingStore {
    fn bind(&mut self, value: Value) -> String;
}

/// Ordered name → value bindings collected while a statement is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parameters {
    entries: Vec<(String, Value)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Append another store's bindings, refusing names already present.
    pub fn merge(&mut self, other: Parameters) -> QueryResult<()> {
        for (name, value) in other.entries {
            if self.get(&name).is_some() {
                return Err(QueryError::DuplicateBinding(name));
            }
            self.entries.push((name, value));
        }
        Ok(())
    }

    /// Shift every `p{n}` name up by `offset`, as if `offset` bindings had
    /// been made first. Returns `(old, new)` pairs, highest index first.
    pub fn renumber(&mut self, offset: usize) -> Vec<(String, String)> {
        let mut renames = Vec::new();
        if offset == 0 {
            return renames;
        }
        for (index, (name, _)) in self.entries.iter_mut().enumerate().rev() {
            let renamed = format!("p{}", offset + index + 1);
            renames.push((std::mem::replace(name, renamed.clone()), renamed));
        }
        renames
    }
}

impl BindingStore for Parameters {
    fn bind(&mut self, value: Value) -> String {
        let name = format!("p{}", self.entries.len() + 1);
        self.entries.push((name.clone(), value));
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_numbers_in_order() {
        let mut params = Parameters::new();
        assert_eq!(params.bind(Value::Int(1)), "p1");
        assert_eq!(params.bind(Value::from("x")), "p2");
        assert_eq!(params.get("p2"), Some(&Value::from("x")));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_merge_rejects_duplicates() {
        let mut a = Parameters::new();
        a.bind(Value::Int(1));
        let mut b = Parameters::new();
        b.bind(Value::Int(2));
        let err = a.merge(b).unwrap_err();
        assert!(matches!(err, QueryError::DuplicateBinding(name) if name == "p1"));
    }

    #[test]
    fn test_renumber_then_merge() {
        let mut a = Parameters::new();
        a.bind(Value::Int(1));
        let mut b = Parameters::new();
        b.bind(Value::Int(2));
        b.bind(Value::Int(3));

        let renames = b.renumber(a.len());
        assert_eq!(
            renames,
            vec![
                ("p2".to_string(), "p3".to_string()),
                ("p1".to_string(), "p2".to_string()),
            ]
        );
        a.merge(b).unwrap();
        assert_eq!(a.get("p3"), Some(&Value::Int(3)));
    }
}
