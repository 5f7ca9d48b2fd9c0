//! Convention-based schema inference.

use serde::Deserialize;
use tracing::debug;

use super::entity::{Entity, PropertyInfo};
use super::mapping::{Mapping, NonStandardDbType};
use super::{Schema, SchemaBuilder};
use crate::error::Result;
use crate::naming::{to_snake_case, trim_suffix_ignore_case};
use crate::value::ValueKind;

/// Options steering convention-based inference.
///
/// Deserializable so hosts can keep it next to the rest of their
/// configuration; missing fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConventionOptions {
    /// Append `s` to derived table names.
    pub pluralize_table_names: bool,
    /// Property names (or suffixes) recognized as the key, in priority order.
    pub key_candidates: Vec<String>,
    /// Type name suffix stripped before deriving the table name.
    pub entity_suffix: String,
}

impl Default for ConventionOptions {
    fn default() -> Self {
        Self {
            pluralize_table_names: false,
            key_candidates: vec![String::from("id"), String::from("key")],
            entity_suffix: String::from("entity"),
        }
    }
}

/// Derives schemas from entity descriptions.
///
/// # Example
///
/// ```rust
/// use pgintent_core::schema::{Convention, ConventionOptions, Entity, EntityValues, PropertyInfo};
/// use pgintent_core::ValueKind;
///
/// struct FooEntity;
///
/// impl Entity for FooEntity {
///     fn type_name() -> &'static str {
///         "FooEntity"
///     }
///
///     fn properties() -> &'static [PropertyInfo] {
///         const PROPERTIES: &[PropertyInfo] = &[
///             PropertyInfo::new("Id", ValueKind::Uuid),
///             PropertyInfo::new("TemplateKey", ValueKind::Text),
///         ];
///         PROPERTIES
///     }
///
///     fn values(&self) -> EntityValues {
///         EntityValues::new()
///     }
/// }
///
/// let options = ConventionOptions {
///     pluralize_table_names: true,
///     ..ConventionOptions::default()
/// };
/// let schema = Convention::new(options).create_schema::<FooEntity>(|_| Ok(())).unwrap();
///
/// assert_eq!(schema.table_name(), "foos");
/// assert_eq!(schema.key_property(), "Id");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Convention {
    options: ConventionOptions,
}

impl Convention {
    /// Creates a resolver with the given options.
    #[must_use]
    pub const fn new(options: ConventionOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &ConventionOptions {
        &self.options
    }

    /// Builds a schema for `E` without overrides.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if no key property is found.
    pub fn create_schema_default<E: Entity>() -> Result<Schema> {
        Self::default().create_schema::<E>(|_| Ok(()))
    }

    /// Builds a schema for `E`, applying `post_configure` after inference.
    ///
    /// The hook runs to completion before the schema is validated and frozen,
    /// so a key property it sets counts, and a schema it leaves without one
    /// is rejected here rather than at query time.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if no mapped key property is
    /// left after the hook, or any error the hook itself returns.
    pub fn create_schema<E: Entity>(
        &self,
        post_configure: impl FnOnce(&mut SchemaBuilder) -> Result<()>,
    ) -> Result<Schema> {
        let mut builder = self.infer(E::type_name(), E::properties());
        post_configure(&mut builder)?;
        let schema = builder.build()?;

        debug!(
            "Resolved schema for {}: table={} alias={} key={}",
            E::type_name(),
            schema.table_name(),
            schema.table_alias(),
            schema.key_property()
        );
        Ok(schema)
    }

    fn infer(&self, type_name: &str, properties: &[PropertyInfo]) -> SchemaBuilder {
        let mut builder = SchemaBuilder::new(self.table_name(type_name));

        for property in properties {
            let mut mapping = Mapping::new(property.name, to_snake_case(property.name));
            mapping.db_type = guess_db_type(property.kind);
            builder.map(mapping);
        }

        if let Some(key) = self.key_property(properties) {
            builder.set_key_property(key);
        }

        builder
    }

    fn table_name(&self, type_name: &str) -> String {
        let table = to_snake_case(trim_suffix_ignore_case(type_name, &self.options.entity_suffix));
        if self.options.pluralize_table_names {
            table + "s"
        } else {
            table
        }
    }

    /// Exact candidate matches win; otherwise the first property whose name
    /// ends with a candidate.
    fn key_property<'p>(&self, properties: &'p [PropertyInfo]) -> Option<&'p str> {
        let candidates: Vec<String> = self
            .options
            .key_candidates
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let exact = properties.iter().find(|p| {
            candidates
                .iter()
                .any(|c| p.name.eq_ignore_ascii_case(c))
        });

        exact
            .or_else(|| {
                properties.iter().find(|p| {
                    let name = p.name.to_ascii_lowercase();
                    candidates.iter().any(|c| name.ends_with(c.as_str()))
                })
            })
            .map(|p| p.name)
    }
}

const fn guess_db_type(kind: ValueKind) -> Option<NonStandardDbType> {
    match kind {
        ValueKind::Json => Some(NonStandardDbType::JsonB),
        _ => None,
    }
}
