//! NULL-safe equality, checked by evaluating compiled predicates in DuckDB.
//!
//! For every pair drawn from {NULL, 'a', 'b'}, `Eq(TemplateKey, v1)` must
//! hold against a row with `template_key = v2` exactly when `v1 == v2`, and
//! the negated form must hold exactly when it does not.

mod common;

use common::{compile, evaluate};
use pgintent_core::predicate::Predicate;
use pgintent_core::schema::{Mapping, Schema};

const VALUES: [Option<&str>; 3] = [None, Some("a"), Some("b")];

fn schema() -> Schema {
    let mut schema = Schema::builder("foos");
    schema
        .map(Mapping::new("Id", "id"))
        .map(Mapping::new("TemplateKey", "template_key"))
        .set_key_property("Id");
    schema.build().unwrap()
}

fn row_literal(value: Option<&str>) -> String {
    value.map_or_else(
        || String::from("CAST(NULL AS VARCHAR)"),
        |v| format!("'{v}'"),
    )
}

#[test]
fn test_equality_matches_host_semantics() {
    let schema = schema();
    for v1 in VALUES {
        let (sql, params) = compile(&schema, &Predicate::eq("TemplateKey", v1));
        for v2 in VALUES {
            let literal = row_literal(v2);
            let actual = evaluate(&sql, &params, &[("template_key", literal.as_str())]);
            assert_eq!(actual, v1 == v2, "{sql} with template_key = {literal}");
        }
    }
}

#[test]
fn test_inequality_is_the_complement() {
    let schema = schema();
    for v1 in VALUES {
        let (sql, params) = compile(&schema, &Predicate::ne("TemplateKey", v1));
        for v2 in VALUES {
            let literal = row_literal(v2);
            let actual = evaluate(&sql, &params, &[("template_key", literal.as_str())]);
            assert_eq!(actual, v1 != v2, "{sql} with template_key = {literal}");
        }
    }
}

#[test]
fn test_null_literal_renders_is_null() {
    let schema = schema();
    let (sql, params) = compile(&schema, &Predicate::eq("TemplateKey", None::<String>));
    assert_eq!(sql, "template_key IS NULL");
    assert!(params.is_empty());

    let (sql, _) = compile(&schema, &Predicate::ne("TemplateKey", None::<String>));
    assert_eq!(sql, "template_key IS NOT NULL");
}

#[test]
fn test_null_safe_rewrite_text() {
    let schema = schema();
    let (sql, _) = compile(&schema, &Predicate::eq("TemplateKey", "a"));
    assert_eq!(
        sql,
        "(template_key = @template_key OR template_key IS NULL AND @template_key IS NULL)"
    );

    let (sql, _) = compile(&schema, &Predicate::ne("TemplateKey", "a"));
    assert_eq!(
        sql,
        "(template_key != @template_key \
         OR template_key IS NULL AND @template_key IS NOT NULL \
         OR template_key IS NOT NULL AND @template_key IS NULL)"
    );
}
