//! # pgintent-core
//!
//! Compiles entity-level data-access intents into parameterized PostgreSQL.
//!
//! This crate provides:
//! - A convention resolver that derives a table [`Schema`] from an entity
//!   description, with targeted overrides
//! - A predicate tree and a compiler that renders it into a correctly
//!   parenthesized, NULL-safe WHERE clause
//! - A statement builder for SELECT, INSERT, UPDATE, upsert and DELETE
//!
//! Nothing here touches a database: every operation returns SQL text plus a
//! [`QueryParameters`] set for whatever driver executes it.
//!
//! ## NULL-Safe Filtering
//!
//! Equality treats two NULLs as equal, so filtering on an optional value
//! behaves the way the host language compares it:
//!
//! ```rust
//! use pgintent_core::schema::{Mapping, Schema};
//! use pgintent_core::{PostgresDialect, Predicate, PredicateCompiler, QueryParameters};
//!
//! let mut schema = Schema::builder("foos");
//! schema
//!     .map(Mapping::new("Id", "id"))
//!     .map(Mapping::new("TemplateKey", "template_key"))
//!     .set_key_property("Id");
//! let schema = schema.build().unwrap();
//!
//! let dialect = PostgresDialect::new();
//! let mut params = QueryParameters::new();
//! let sql = PredicateCompiler::new(&schema, &dialect)
//!     .compile(Some(&Predicate::eq("TemplateKey", None::<String>)), &mut params)
//!     .unwrap();
//!
//! assert_eq!(sql, "template_key IS NULL");
//! assert!(params.is_empty());
//! ```
//!
//! ## Statement Building
//!
//! Entities describe their properties through the [`schema::Entity`] trait,
//! usually derived with `pgintent_derive::Entity`. The [`Convention`]
//! resolver turns that description into a schema:
//!
//! ```rust
//! use pgintent_core::schema::{Entity, EntityValues, PropertyInfo};
//! use pgintent_core::{Convention, QueryBuilder, QueryParameters, ValueKind};
//!
//! struct FooEntity {
//!     id: i64,
//!     template_key: String,
//! }
//!
//! impl Entity for FooEntity {
//!     fn type_name() -> &'static str {
//!         "FooEntity"
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
//! let schema = Convention::create_schema_default::<FooEntity>().unwrap();
//! let builder = QueryBuilder::<FooEntity>::new(schema);
//!
//! let foo = FooEntity { id: 1, template_key: String::from("nuts") };
//! let mut params = QueryParameters::new();
//! let sql = builder.create(&foo, &mut params).unwrap();
//!
//! assert_eq!(sql, "INSERT INTO foo (id,template_key) VALUES (@id,@template_key)");
//! ```

pub mod builder;
pub mod dialect;
pub mod error;
pub mod naming;
pub mod params;
pub mod predicate;
pub mod schema;
pub mod value;

pub use builder::{OnConflict, QueryBuilder};
pub use dialect::{Dialect, PostgresDialect};
pub use error::{Error, Result};
pub use params::QueryParameters;
pub use predicate::{Predicate, PredicateCompiler};
pub use schema::{Convention, ConventionOptions, Schema};
pub use value::{SqlType, SqlValue, ToSqlValue, ValueKind};
