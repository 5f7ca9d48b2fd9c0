//! SQL dialect support.
//!
//! The compiler and the statement builder never hard-code placeholder
//! syntax, operator spelling or cast rules: they ask a [`Dialect`]. Target
//! databases differ in exactly these details.

mod postgres;

pub use postgres::PostgresDialect;

use crate::predicate::{GroupOperator, Operator};
use crate::schema::NonStandardDbType;
use crate::value::ValueKind;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Renders a reference to a named parameter.
    fn parameter(&self, name: &str) -> String {
        format!("@{name}")
    }

    /// Quotes an identifier if necessary.
    ///
    /// Mapped names are valid unquoted identifiers, so the default leaves
    /// them alone.
    fn quote_identifier(&self, name: &str) -> String {
        String::from(name)
    }

    /// Returns the text of a comparison operator.
    fn comparison_operator(&self, op: Operator, negate: bool) -> &'static str;

    /// Returns the text joining the children of a group.
    fn logical_operator(&self, op: GroupOperator) -> &'static str {
        match op {
            GroupOperator::And => "AND",
            GroupOperator::Or => "OR",
        }
    }

    /// Returns the structured-containment operator.
    fn containment_operator(&self) -> &'static str;

    /// Renders extraction of the value at `path` inside a JSON expression.
    fn json_path(&self, expr: &str, path: &[&str]) -> String;

    /// Renders an explicit cast.
    fn cast(&self, expr: &str, type_name: &str) -> String;

    /// Returns the type a value of `kind` is cast to when it is compared
    /// against text extracted from a JSON document.
    fn cast_type(&self, kind: ValueKind) -> Option<&'static str>;

    /// Returns the type name for a non-standard column type.
    fn db_type_name(&self, db_type: NonStandardDbType) -> &'static str;
}
