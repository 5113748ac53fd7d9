//! Literal rendering.

use crate::ast::Value;
use crate::binding::BindingStore;
use crate::translator::Translator;

/// Render a value as an inline literal in the translator's dialect.
pub fn inline(translator: &dyn Translator, value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => translator.bool_literal(*b),
        Value::String(s) => translator.string_literal(s),
        Value::Date(d) => translator.date_literal(d),
        Value::Time(t) => translator.time_literal(t),
        Value::DateTime(dt) => translator.date_time_literal(dt),
        Value::Guid(u) => translator.string_literal(&u.to_string()),
        Value::Binary(bytes) => translator.binary_literal(bytes),
        Value::List(items) => items
            .iter()
            .map(|v| inline(translator, v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Int(_) | Value::Float(_) => value.to_string(),
    }
}

/// Bind a value and return its placeholder. NULL stays inline; lists bind
/// each item.
pub fn bind(translator: &dyn Translator, store: &mut dyn BindingStore, value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::List(items) => items
            .iter()
            .map(|v| bind(translator, store, v))
            .collect::<Vec<_>>()
            .join(", "),
        _ => {
            let name = store.bind(value.clone());
            translator.placeholder(&name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Parameters;
    use crate::translator::{DefaultTranslator, MySqlTranslator};
    use chrono::NaiveDate;

    #[test]
    fn test_inline() {
        let t = DefaultTranslator;
        assert_eq!(inline(&t, &Value::Int(-3)), "-3");
        assert_eq!(inline(&t, &Value::Float(2.5)), "2.5");
        assert_eq!(inline(&t, &Value::from("O'Brien")), "'O''Brien'");
        assert_eq!(inline(&t, &Value::Bool(true)), "1");
        assert_eq!(inline(&MySqlTranslator, &Value::Bool(false)), "FALSE");
        assert_eq!(
            inline(&t, &Value::from(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap())),
            "'2020-01-31'"
        );
        assert_eq!(inline(&t, &Value::from(vec![1, 2])), "1, 2");
        assert_eq!(inline(&t, &Value::Null), "NULL");
    }

    #[test]
    fn test_bind() {
        let t = DefaultTranslator;
        let mut params = Parameters::new();
        assert_eq!(bind(&t, &mut params, &Value::from("x")), "@p1");
        assert_eq!(bind(&t, &mut params, &Value::from(vec![5, 6])), "@p2, @p3");
        assert_eq!(bind(&t, &mut params, &Value::Null), "NULL");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("p3"), Some(&Value::Int(6)));
    }
}
