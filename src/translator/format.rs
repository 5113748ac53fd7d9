//! `{n}` template substitution shared by translators and the walker.

use crate::ast::{FieldDefinition, OperatorTag};

/// Replace `{0}`, `{1}`, ... with the matching argument. Placeholders
/// without an argument are left as written.
pub fn apply_format(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        let closed = digits > 0 && after[digits..].starts_with('}');
        let arg = if closed {
            after[..digits].parse::<usize>().ok().and_then(|i| args.get(i))
        } else {
            None
        };

        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Templates every dialect starts from. `escape` is the rendered literal
/// for the LIKE escape character.
pub fn standard_format(
    tag: OperatorTag,
    is_null_fn: &str,
    length_fn: &str,
    escape: &str,
) -> Option<String> {
    let template = match tag {
        OperatorTag::Equal => "({0} = {1})",
        OperatorTag::NotEqual => "({0} <> {1})",
        OperatorTag::GreaterThan => "({0} > {1})",
        OperatorTag::GreaterThanOrEqual => "({0} >= {1})",
        OperatorTag::LessThan => "({0} < {1})",
        OperatorTag::LessThanOrEqual => "({0} <= {1})",
        OperatorTag::AndAlso => "({0} AND {1})",
        OperatorTag::OrElse => "({0} OR {1})",
        // operands are already parenthesized
        OperatorTag::Not => "NOT {0}",
        OperatorTag::Negate => "(-{0})",
        OperatorTag::Add => "({0} + {1})",
        OperatorTag::Subtract => "({0} - {1})",
        OperatorTag::Multiply => "({0} * {1})",
        OperatorTag::Divide => "({0} / {1})",
        OperatorTag::Modulo => "({0} % {1})",
        OperatorTag::Coalesce => return Some(format!("{}({{0}}, {{1}})", is_null_fn)),
        OperatorTag::Length => return Some(format!("{}({{0}})", length_fn)),
        OperatorTag::LikeEscaped => return Some(format!("({{0}} LIKE {{1}} ESCAPE {})", escape)),
        OperatorTag::Convert => "CAST({0} AS {1})",
        OperatorTag::Like
        | OperatorTag::Contains
        | OperatorTag::StartsWith
        | OperatorTag::EndsWith => "({0} LIKE {1})",
        OperatorTag::In => "({0} IN ({1}))",
        OperatorTag::Between => "({0} BETWEEN {1} AND {2})",
        OperatorTag::IsNull => "({0} IS NULL)",
        OperatorTag::IsNotNull => "({0} IS NOT NULL)",
    };
    Some(template.to_string())
}

/// Column template: `{0}` name, `{1}` type, `{2}` size, `{3}` precision,
/// `{4}` nullability and key, `{5}` identity.
pub fn standard_column_format(field: &FieldDefinition) -> &'static str {
    let ty = field.logical_type();
    if field.field_size() > 0 && ty.is_character() {
        "{0} {1}({2}) {4} {5}"
    } else if field.field_size() > 0 && ty.is_exact_numeric() {
        "{0} {1}({2},{3}) {4} {5}"
    } else {
        "{0} {1} {4} {5}"
    }
}

/// Fill a column template and collapse the gaps left by empty slots.
pub fn render_column(
    format: &str,
    field: &FieldDefinition,
    type_name: &str,
    extra: &str,
    identity: &str,
) -> String {
    let size = field.field_size().to_string();
    let precision = field.field_precision().to_string();
    let text = apply_format(
        format,
        &[field.name(), type_name, &size, &precision, extra, identity],
    );
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
