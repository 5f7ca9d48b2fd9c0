#![allow(dead_code)]

use pgintent_core::predicate::{GroupOperator, Operator, Predicate, PredicateGroup};
use pgintent_core::schema::{Mapping, Schema};
use pgintent_core::{PostgresDialect, PredicateCompiler, QueryParameters, SqlValue};

/// Compiles `predicate` against `schema` with fresh parameters.
pub fn compile(schema: &Schema, predicate: &Predicate) -> (String, QueryParameters) {
    let dialect = PostgresDialect::new();
    let mut params = QueryParameters::new();
    let sql = PredicateCompiler::new(schema, &dialect)
        .compile(Some(predicate), &mut params)
        .unwrap_or_else(|e| panic!("Failed to compile {predicate:?}\nError: {e}"));
    (sql, params)
}

/// Replaces every `@name` placeholder with its value as a SQL literal.
///
/// Longer names go first so `@id` never clobbers `@id_2`.
pub fn inline_params(sql: &str, params: &QueryParameters) -> String {
    let mut entries: Vec<(&str, &SqlValue)> = params.iter().collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entries
        .into_iter()
        .fold(String::from(sql), |sql, (name, value)| {
            sql.replace(&format!("@{name}"), &value.to_sql_inline())
        })
}

/// Evaluates a compiled boolean expression against a single row in DuckDB.
///
/// `row` lists `(column, literal)` pairs; an unknown result counts as false,
/// the way a WHERE clause treats it.
pub fn evaluate(sql: &str, params: &QueryParameters, row: &[(&str, &str)]) -> bool {
    let columns: Vec<String> = row
        .iter()
        .map(|(column, literal)| format!("{literal} AS {column}"))
        .collect();
    let query = format!(
        "SELECT COALESCE(({}), false) FROM (SELECT {}) AS t",
        inline_params(sql, params),
        columns.join(", ")
    );

    let conn = duckdb::Connection::open_in_memory().expect("Failed to open DuckDB");
    conn.query_row(&query, duckdb::params![], |r| r.get::<_, bool>(0))
        .unwrap_or_else(|e| panic!("Failed to evaluate: {query}\nError: {e}"))
}

/// Schema with boolean properties `A`..`D` mapped to columns `a`..`d`.
pub fn flags_schema() -> Schema {
    let mut schema = Schema::builder("flags");
    for (property, column) in [("A", "a"), ("B", "b"), ("C", "c"), ("D", "d")] {
        schema.map(Mapping::new(property, column));
    }
    schema.set_key_property("A");
    schema.build().expect("Failed to build flags schema")
}

/// Evaluates a tree of boolean equality leaves in plain Rust.
pub fn eval_tree(predicate: &Predicate, row: &[(&str, bool)]) -> bool {
    match predicate {
        Predicate::Binary(binary) => {
            assert_eq!(binary.operator, Operator::Eq);
            let SqlValue::Bool(expected) = &binary.value else {
                panic!("Expected a boolean leaf, got {:?}", binary.value);
            };
            let actual = row
                .iter()
                .find(|(name, _)| *name == binary.property)
                .map(|(_, value)| *value)
                .unwrap_or_else(|| panic!("No value for {}", binary.property));
            (actual == *expected) != binary.negate
        }
        Predicate::Group(PredicateGroup { operator, children }) => match operator {
            GroupOperator::And => children.iter().all(|c| eval_tree(c, row)),
            GroupOperator::Or => children.iter().any(|c| eval_tree(c, row)),
        },
    }
}
