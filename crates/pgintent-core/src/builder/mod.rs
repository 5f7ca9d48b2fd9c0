//! Statement builder.
//!
//! [`QueryBuilder`] turns entity-level intents into full statement text.
//! Column resolution is delegated to the [`Schema`], WHERE clauses to the
//! [`PredicateCompiler`], and every dialect detail to a [`Dialect`].
//!
//! # Example
//!
//! ```rust
//! use pgintent_core::builder::QueryBuilder;
//! use pgintent_core::schema::{Entity, EntityValues, Mapping, PropertyInfo, Schema};
//! use pgintent_core::{QueryParameters, SqlValue, ValueKind};
//!
//! struct Foo {
//!     id: i64,
//!     template_key: String,
//! }
//!
//! impl Entity for Foo {
//!     fn type_name() -> &'static str {
//!         "Foo"
//!     }
//!
//!     fn properties() -> &'static [PropertyInfo] {
//!         const PROPERTIES: &[PropertyInfo] = &[
//!             PropertyInfo::new("Id", ValueKind::Int),
//!             PropertyInfo::new("TemplateKey", ValueKind::Text),
//!         ];
//!         PROPERTIES
//!     }
//!
//!     fn values(&self) -> EntityValues {
//!         EntityValues::new()
//!             .with("Id", self.id)
//!             .with("TemplateKey", self.template_key.clone())
//!     }
//! }
//!
//! let mut schema = Schema::builder("foos");
//! schema
//!     .map(Mapping::new("Id", "id"))
//!     .map(Mapping::new("TemplateKey", "template_key"))
//!     .set_key_property("Id");
//! let builder = QueryBuilder::<Foo>::new(schema.build().unwrap());
//!
//! let mut params = QueryParameters::new();
//! let sql = builder.get(42, &mut params).unwrap();
//! assert_eq!(sql, "SELECT id,template_key FROM foos WHERE id = @id");
//! assert_eq!(params.get("id"), Some(&SqlValue::Int(42)));
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use insert::OnConflict;

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::dialect::{Dialect, PostgresDialect};
use crate::error::{Error, Result};
use crate::naming::parameter_name;
use crate::params::QueryParameters;
use crate::predicate::{Predicate, PredicateCompiler};
use crate::schema::{Entity, EntityValues, Schema};
use crate::value::SqlValue;

/// Builds statements for entities of type `E`.
///
/// Holds no per-statement state: every method is a function of the schema,
/// its input and the caller's parameter set, so one builder can serve many
/// threads as long as each statement gets its own [`QueryParameters`].
pub struct QueryBuilder<E, D = PostgresDialect> {
    schema: Arc<Schema>,
    dialect: D,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> QueryBuilder<E> {
    /// Creates a builder targeting PostgreSQL.
    #[must_use]
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_dialect(schema, PostgresDialect::new())
    }
}

impl<E: Entity, D: Dialect> QueryBuilder<E, D> {
    /// Creates a builder targeting `dialect`.
    #[must_use]
    pub fn with_dialect(schema: impl Into<Arc<Schema>>, dialect: D) -> Self {
        Self {
            schema: schema.into(),
            dialect,
            _entity: PhantomData,
        }
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    fn compiler(&self) -> PredicateCompiler<'_> {
        PredicateCompiler::new(&self.schema, &self.dialect)
    }

    fn identifier(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn table(&self) -> String {
        self.identifier(self.schema.table_name())
    }

    /// Strict equality on the key property, never NULL-expanded.
    fn key_predicate(&self, key: SqlValue) -> Predicate {
        Predicate::strict_eq(self.schema.key_property(), key)
    }

    /// Binds the writable values of `entity` and returns one
    /// [`Assignment`] per column that takes part in the statement.
    ///
    /// Read-only mappings never take part. Insert-only mappings render their
    /// generator expression on insert and are left out otherwise.
    fn assignments(
        &self,
        values: &EntityValues,
        params: &mut QueryParameters,
        insert: bool,
    ) -> Result<Vec<Assignment>> {
        let key = self.schema.key_property();
        let mut assignments = Vec::with_capacity(values.len());

        for (property, value) in values.iter() {
            let mapping = self.schema.resolve(property)?;
            if mapping.read_only {
                continue;
            }

            let expr = match &mapping.on_insert {
                Some(generator) if insert => generator.render(values),
                Some(_) => continue,
                None => {
                    let value = if mapping.is_json() {
                        value.clone().into_json_document()?
                    } else {
                        value.clone()
                    };
                    let base = parameter_name(&mapping.column, &[]);
                    let name = params.insert_or_reuse(&base, value);
                    let reference = self.dialect.parameter(&name);
                    match mapping.db_type {
                        Some(db_type) => self
                            .dialect
                            .cast(&reference, self.dialect.db_type_name(db_type)),
                        None => reference,
                    }
                }
            };

            assignments.push(Assignment {
                column: self.identifier(&mapping.column),
                expr,
                is_key: property == key,
                insert_only: mapping.is_insert_only(),
            });
        }

        Ok(assignments)
    }

    /// Returns the entity's key value.
    fn key_value(&self, values: &EntityValues) -> Result<SqlValue> {
        let key = self.schema.key_property();
        values.get(key).cloned().ok_or_else(|| {
            Error::Configuration(format!(
                "entity '{}' provides no value for key property '{key}'",
                E::type_name()
            ))
        })
    }

    fn finish(&self, kind: &str, sql: &str) -> String {
        let sql = normalize_whitespace(sql);
        debug!("Built {kind} statement for {}: {sql}", self.schema.table_name());
        sql
    }
}

/// One column taking part in an INSERT or UPDATE.
#[derive(Debug, Clone)]
struct Assignment {
    column: String,
    expr: String,
    is_key: bool,
    insert_only: bool,
}

/// Collapses every run of whitespace to a single space and trims the ends.
///
/// Text inside single-quoted literals and double-quoted identifiers is copied
/// untouched. A doubled quote inside a literal closes and reopens it, which
/// leaves its content intact as well.
#[must_use]
pub fn normalize_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    for c in sql.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => pending_space = !out.is_empty(),
            None => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }

    out
}
