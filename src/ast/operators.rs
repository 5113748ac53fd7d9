use crate::ast::LogicalType;

/// Binary operators a predicate or projection can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    /// First non-null of the two operands
    Coalesce,
}

impl BinaryOp {
    pub fn tag(&self) -> OperatorTag {
        match self {
            BinaryOp::Equal => OperatorTag::Equal,
            BinaryOp::NotEqual => OperatorTag::NotEqual,
            BinaryOp::GreaterThan => OperatorTag::GreaterThan,
            BinaryOp::GreaterThanOrEqual => OperatorTag::GreaterThanOrEqual,
            BinaryOp::LessThan => OperatorTag::LessThan,
            BinaryOp::LessThanOrEqual => OperatorTag::LessThanOrEqual,
            BinaryOp::AndAlso => OperatorTag::AndAlso,
            BinaryOp::OrElse => OperatorTag::OrElse,
            BinaryOp::Add => OperatorTag::Add,
            BinaryOp::Subtract => OperatorTag::Subtract,
            BinaryOp::Multiply => OperatorTag::Multiply,
            BinaryOp::Divide => OperatorTag::Divide,
            BinaryOp::Modulo => OperatorTag::Modulo,
            BinaryOp::Coalesce => OperatorTag::Coalesce,
        }
    }

    /// AND / OR: their operands are predicates in their own right.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
        )
    }

    /// The operator a NOT collapses into. Only equality has one; ordering
    /// comparisons keep an explicit NOT.
    pub fn negated(&self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Equal => Some(BinaryOp::NotEqual),
            BinaryOp::NotEqual => Some(BinaryOp::Equal),
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
    /// CAST to the dialect's cast keyword for the type
    Convert(LogicalType),
}

impl UnaryOp {
    pub fn tag(&self) -> OperatorTag {
        match self {
            UnaryOp::Not => OperatorTag::Not,
            UnaryOp::Negate => OperatorTag::Negate,
            UnaryOp::Convert(_) => OperatorTag::Convert,
        }
    }
}

/// Method calls recognized as native SQL operations. These are rendered
/// through the dialect and never folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlMethod {
    Like,
    /// LIKE whose pattern escapes wildcards with [`SqlMethod::ESCAPE`].
    /// Built from constant contains / starts-with / ends-with needles.
    LikeEscaped,
    Contains,
    StartsWith,
    EndsWith,
    In,
    Between,
    IsNull,
    IsNotNull,
    Length,
}

impl SqlMethod {
    pub const ESCAPE: char = '\\';

    pub fn tag(&self) -> OperatorTag {
        match self {
            SqlMethod::Like => OperatorTag::Like,
            SqlMethod::LikeEscaped => OperatorTag::LikeEscaped,
            SqlMethod::Contains => OperatorTag::Contains,
            SqlMethod::StartsWith => OperatorTag::StartsWith,
            SqlMethod::EndsWith => OperatorTag::EndsWith,
            SqlMethod::In => OperatorTag::In,
            SqlMethod::Between => OperatorTag::Between,
            SqlMethod::IsNull => OperatorTag::IsNull,
            SqlMethod::IsNotNull => OperatorTag::IsNotNull,
            SqlMethod::Length => OperatorTag::Length,
        }
    }

    /// Whether `count` arguments (receiver excluded) fit this method.
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            SqlMethod::Like
            | SqlMethod::LikeEscaped
            | SqlMethod::Contains
            | SqlMethod::StartsWith
            | SqlMethod::EndsWith => count == 1,
            SqlMethod::In => count >= 1,
            SqlMethod::Between => count == 2,
            SqlMethod::IsNull | SqlMethod::IsNotNull | SqlMethod::Length => count == 0,
        }
    }

    /// Look up a method by the name used in predicate text.
    pub fn from_name(name: &str) -> Option<Self> {
        let method = match name.to_ascii_lowercase().as_str() {
            "like" => SqlMethod::Like,
            "contains" => SqlMethod::Contains,
            "starts_with" | "startswith" => SqlMethod::StartsWith,
            "ends_with" | "endswith" => SqlMethod::EndsWith,
            "in" => SqlMethod::In,
            "between" => SqlMethod::Between,
            "is_null" | "isnull" => SqlMethod::IsNull,
            "is_not_null" | "isnotnull" => SqlMethod::IsNotNull,
            "length" | "len" => SqlMethod::Length,
            _ => return None,
        };
        Some(method)
    }
}

/// Every operator the walker can ask a translator to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorTag {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    AndAlso,
    OrElse,
    Not,
    Negate,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Coalesce,
    Convert,
    Like,
    LikeEscaped,
    Contains,
    StartsWith,
    EndsWith,
    In,
    Between,
    IsNull,
    IsNotNull,
    Length,
}

impl OperatorTag {
    /// Number of `{n}` placeholders a template for this tag must carry.
    pub fn arity(&self) -> usize {
        match self {
            OperatorTag::Not
            | OperatorTag::Negate
            | OperatorTag::IsNull
            | OperatorTag::IsNotNull
            | OperatorTag::Length => 1,
            OperatorTag::Between => 3,
            _ => 2,
        }
    }
}

impl std::fmt::Display for OperatorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_equality_negates() {
        assert_eq!(BinaryOp::Equal.negated(), Some(BinaryOp::NotEqual));
        assert_eq!(BinaryOp::NotEqual.negated(), Some(BinaryOp::Equal));
        assert_eq!(BinaryOp::GreaterThan.negated(), None);
        assert_eq!(BinaryOp::LessThanOrEqual.negated(), None);
    }

    #[test]
    fn test_method_arity() {
        assert!(SqlMethod::Contains.accepts(1));
        assert!(!SqlMethod::Contains.accepts(2));
        assert!(SqlMethod::In.accepts(4));
        assert!(SqlMethod::IsNull.accepts(0));
        assert_eq!(SqlMethod::from_name("StartsWith"), Some(SqlMethod::StartsWith));
        assert_eq!(SqlMethod::from_name("frobnicate"), None);
    }
}
