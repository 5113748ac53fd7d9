use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Abstract column type, independent of any dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    UInt16,
    UInt32,
    UInt64,
    Single,
    Double,
    Decimal,
    Currency,
    VarNumeric,
    AnsiString,
    AnsiStringFixedLength,
    String,
    StringFixedLength,
    Date,
    Time,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Binary,
    Guid,
    Object,
    Xml,
}

impl LogicalType {
    /// Every logical type, in declaration order.
    pub const ALL: [LogicalType; 27] = [
        LogicalType::Boolean,
        LogicalType::Byte,
        LogicalType::SByte,
        LogicalType::Int16,
        LogicalType::Int32,
        LogicalType::Int64,
        LogicalType::UInt16,
        LogicalType::UInt32,
        LogicalType::UInt64,
        LogicalType::Single,
        LogicalType::Double,
        LogicalType::Decimal,
        LogicalType::Currency,
        LogicalType::VarNumeric,
        LogicalType::AnsiString,
        LogicalType::AnsiStringFixedLength,
        LogicalType::String,
        LogicalType::StringFixedLength,
        LogicalType::Date,
        LogicalType::Time,
        LogicalType::DateTime,
        LogicalType::DateTime2,
        LogicalType::DateTimeOffset,
        LogicalType::Binary,
        LogicalType::Guid,
        LogicalType::Object,
        LogicalType::Xml,
    ];

    /// Character types whose size is rendered as `TYPE(size)`.
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            LogicalType::AnsiString
                | LogicalType::AnsiStringFixedLength
                | LogicalType::String
                | LogicalType::StringFixedLength
        )
    }

    /// Exact numerics whose size and precision are rendered as `TYPE(size,precision)`.
    pub fn is_exact_numeric(&self) -> bool {
        matches!(
            self,
            LogicalType::Decimal | LogicalType::Currency | LogicalType::VarNumeric
        )
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A literal value carried by a constant node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    Binary(Vec<u8>),
    /// Value list, as used by IN
    List(Vec<Value>),
}

impl Value {
    /// The logical type this literal is rendered as.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Value::Null | Value::List(_) => LogicalType::Object,
            Value::Bool(_) => LogicalType::Boolean,
            Value::Int(_) => LogicalType::Int64,
            Value::Float(_) => LogicalType::Double,
            Value::String(_) => LogicalType::String,
            Value::Date(_) => LogicalType::Date,
            Value::Time(_) => LogicalType::Time,
            Value::DateTime(_) => LogicalType::DateTime,
            Value::Guid(_) => LogicalType::Guid,
            Value::Binary(_) => LogicalType::Binary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Locale-invariant textual form, used for literals without a dialect-specific format.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Guid(u) => write!(f, "{}", u),
            Value::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
            Value::List(items) => {
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Guid(u)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_logical_type() {
        assert_eq!(Value::from(true).logical_type(), LogicalType::Boolean);
        assert_eq!(Value::from(3).logical_type(), LogicalType::Int64);
        assert_eq!(Value::from("a").logical_type(), LogicalType::String);
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_invariant_display() {
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Binary(vec![0xde, 0xad]).to_string(), "DEAD");
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "1, 2, 3");
    }

    #[test]
    fn test_logical_type_names_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            ty: LogicalType,
        }
        let h: Holder = toml::from_str("ty = \"datetime2\"").unwrap();
        assert_eq!(h.ty, LogicalType::DateTime2);
    }
}
