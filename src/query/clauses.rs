//! Clause text accumulated by a [`Query`](super::Query).

/// Rendered clause fragments, in assembly order.
///
/// Translators write to `select_format` (row limits spliced around the
/// column list) and `tail` (LIMIT / OFFSET text).
#[derive(Debug, Clone, PartialEq)]
pub struct Clauses {
    /// Template with `{0}` standing for the column list
    pub select_format: String,
    pub columns: String,
    pub from: String,
    pub filter: String,
    pub group_by: String,
    pub having: String,
    pub order_by: String,
    pub tail: String,
}

impl Default for Clauses {
    fn default() -> Self {
        Self {
            select_format: "{0}".to_string(),
            columns: "*".to_string(),
            from: String::new(),
            filter: String::new(),
            group_by: String::new(),
            having: String::new(),
            order_by: String::new(),
            tail: String::new(),
        }
    }
}

/// Append a comma-separated list to existing clause text.
pub(crate) fn append_list(existing: &mut String, items: &[String]) {
    if items.is_empty() {
        return;
    }
    if !existing.is_empty() {
        existing.push_str(", ");
    }
    existing.push_str(&items.join(", "));
}

/// Combine a condition with the existing one: `(prev) AND (new)`.
pub(crate) fn combine(existing: &mut String, keyword: &str, condition: String) {
    if existing.is_empty() {
        *existing = condition;
    } else {
        *existing = format!("({}) {} ({})", existing, keyword, condition);
    }
}

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER JOIN"),
            JoinKind::Left => write!(f, "LEFT JOIN"),
            JoinKind::Right => write!(f, "RIGHT JOIN"),
        }
    }
}
