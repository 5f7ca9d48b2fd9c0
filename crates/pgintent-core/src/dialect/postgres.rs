//! PostgreSQL dialect.

use super::Dialect;
use crate::predicate::Operator;
use crate::schema::NonStandardDbType;
use crate::value::ValueKind;

/// PostgreSQL with `@name` placeholders, as bound by drivers that accept
/// named parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn comparison_operator(&self, op: Operator, negate: bool) -> &'static str {
        match (op, negate) {
            (Operator::Eq, false) => "=",
            (Operator::Eq, true) => "!=",
            (Operator::Matches, false) => "LIKE",
            (Operator::Matches, true) => "NOT LIKE",
            (Operator::Gt, false) | (Operator::Lte, true) => ">",
            (Operator::Gte, false) | (Operator::Lt, true) => ">=",
            (Operator::Lt, false) | (Operator::Gte, true) => "<",
            (Operator::Lte, false) | (Operator::Gt, true) => "<=",
            (Operator::In, false) => "IN",
            (Operator::In, true) => "NOT IN",
        }
    }

    fn containment_operator(&self) -> &'static str {
        "@>"
    }

    fn json_path(&self, expr: &str, path: &[&str]) -> String {
        let elements: Vec<String> = path.iter().map(|s| array_element(s)).collect();
        let literal = format!("{{{}}}", elements.join(",")).replace('\'', "''");
        format!("{expr}#>>'{literal}'")
    }

    fn cast(&self, expr: &str, type_name: &str) -> String {
        if is_atomic(expr) {
            format!("{expr}::{type_name}")
        } else {
            format!("({expr})::{type_name}")
        }
    }

    fn cast_type(&self, kind: ValueKind) -> Option<&'static str> {
        match kind {
            ValueKind::Int => Some("bigint"),
            ValueKind::Float => Some("decimal"),
            ValueKind::Bool => Some("boolean"),
            ValueKind::Json => Some("jsonb"),
            _ => None,
        }
    }

    fn db_type_name(&self, db_type: NonStandardDbType) -> &'static str {
        match db_type {
            NonStandardDbType::JsonB => "jsonb",
        }
    }
}

/// Quotes a text-array element when it contains characters the array
/// literal syntax treats specially.
fn array_element(segment: &str) -> String {
    let plain = !segment.is_empty()
        && !segment.eq_ignore_ascii_case("null")
        && segment
            .chars()
            .all(|c| !matches!(c, '{' | '}' | ',' | '"' | '\\') && !c.is_whitespace());
    if plain {
        String::from(segment)
    } else {
        let escaped = segment.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    }
}

/// Identifiers, qualified identifiers and placeholders bind tighter than `::`.
fn is_atomic(expr: &str) -> bool {
    !expr.is_empty()
        && expr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '$'))
}
