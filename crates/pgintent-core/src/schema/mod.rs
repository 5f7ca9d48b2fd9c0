//! Table schemas and the convention resolver that derives them.
//!
//! A [`Schema`] is built once per entity type, either through
//! [`Convention`] or by hand through [`SchemaBuilder`], and is read-only
//! afterwards. It is `Send + Sync`; share it behind an `Arc`.

mod convention;
mod entity;
mod mapping;

pub use convention::{Convention, ConventionOptions};
pub use entity::{Entity, EntityValues, PropertyInfo};
pub use mapping::{InsertGenerator, Mapper, Mapping, NonStandardDbType, PropertyColumnMap};

use crate::error::{Error, Result};
use crate::naming::table_alias;

/// The kind of a join clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
        }
    }
}

/// A join clause appended after the FROM table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    /// Join condition, rendered verbatim.
    pub on: String,
}

impl Join {
    /// Creates an inner join.
    pub fn inner(table: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
        }
    }

    /// Creates a left outer join.
    pub fn left(table: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            kind: JoinKind::Left,
            ..Self::inner(table, alias, on)
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Default ordering applied to SELECT statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub property: String,
    pub direction: OrderDirection,
}

/// An immutable table schema.
#[derive(Debug, Clone)]
pub struct Schema {
    table_name: String,
    table_alias: String,
    columns: PropertyColumnMap,
    key_property: String,
    joins: Vec<Join>,
    default_order_by: Option<OrderBy>,
}

impl Schema {
    /// Starts building a schema for `table_name` by hand.
    pub fn builder(table_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(table_name)
    }

    /// Returns the table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the table alias.
    #[must_use]
    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }

    /// Returns the property-column map.
    #[must_use]
    pub const fn columns(&self) -> &PropertyColumnMap {
        &self.columns
    }

    /// Returns the key property name.
    #[must_use]
    pub fn key_property(&self) -> &str {
        &self.key_property
    }

    /// Returns the key property's mapping.
    ///
    /// # Errors
    ///
    /// Never fails for a schema produced by [`SchemaBuilder::build`], which
    /// rejects unmapped keys.
    pub fn key_mapping(&self) -> Result<&Mapping> {
        self.resolve(&self.key_property)
    }

    /// Returns the join clauses, in order.
    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Returns the default ordering, if any.
    #[must_use]
    pub const fn default_order_by(&self) -> Option<&OrderBy> {
        self.default_order_by.as_ref()
    }

    /// Returns true if column references carry the table alias.
    ///
    /// Only schemas with joins need qualification.
    #[must_use]
    pub fn qualifies_columns(&self) -> bool {
        !self.joins.is_empty()
    }

    /// Resolves a property to its mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaResolution`] for unmapped properties.
    pub fn resolve(&self, property: &str) -> Result<&Mapping> {
        self.columns
            .get(property)
            .ok_or_else(|| Error::unresolved(property))
    }

    /// Returns the column reference for a mapping, qualified when needed.
    #[must_use]
    pub fn column_ref(&self, mapping: &Mapping) -> String {
        if self.qualifies_columns() {
            format!("{}.{}", self.table_alias, mapping.column)
        } else {
            mapping.column.clone()
        }
    }
}

/// Mutable schema under construction.
///
/// The convention resolver hands one of these to the post-configuration hook;
/// overrides applied there always win over convention.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    table_name: String,
    table_alias: Option<String>,
    columns: PropertyColumnMap,
    key_property: Option<String>,
    joins: Vec<Join>,
    default_order_by: Option<OrderBy>,
}

impl SchemaBuilder {
    /// Creates a builder with no columns.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            table_alias: None,
            columns: PropertyColumnMap::new(),
            key_property: None,
            joins: Vec::new(),
            default_order_by: None,
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the columns mapped so far.
    #[must_use]
    pub const fn columns(&self) -> &PropertyColumnMap {
        &self.columns
    }

    /// Returns the key property chosen so far.
    #[must_use]
    pub fn key_property(&self) -> Option<&str> {
        self.key_property.as_deref()
    }

    /// Overrides the table name.
    pub fn set_table_name(&mut self, table_name: impl Into<String>) -> &mut Self {
        self.table_name = table_name.into();
        self
    }

    /// Overrides the table alias.
    pub fn set_table_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.table_alias = Some(alias.into());
        self
    }

    /// Sets the key property.
    pub fn set_key_property(&mut self, property: impl Into<String>) -> &mut Self {
        self.key_property = Some(property.into());
        self
    }

    /// Adds or replaces a mapping.
    pub fn map(&mut self, mapping: Mapping) -> &mut Self {
        self.columns.insert(mapping);
        self
    }

    /// Patches an existing mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaResolution`] if the property is not mapped.
    pub fn configure(
        &mut self,
        property: &str,
        patch: impl FnOnce(&mut Mapping),
    ) -> Result<&mut Self> {
        let mapping = self
            .columns
            .get_mut(property)
            .ok_or_else(|| Error::unresolved(property))?;
        patch(mapping);
        Ok(self)
    }

    /// Appends a join clause.
    pub fn join(&mut self, join: Join) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Sets the default ordering.
    pub fn order_by(&mut self, property: impl Into<String>, direction: OrderDirection) -> &mut Self {
        self.default_order_by = Some(OrderBy {
            property: property.into(),
            direction,
        });
        self
    }

    /// Validates and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the table name is blank or no
    /// mapped key property is set, and [`Error::SchemaResolution`] when the
    /// default ordering names an unmapped property.
    pub fn build(self) -> Result<Schema> {
        if self.table_name.trim().is_empty() {
            return Err(Error::Configuration(String::from("table name is empty")));
        }

        let key_property = self.key_property.ok_or_else(|| {
            Error::Configuration(format!(
                "no key property found for table '{}'",
                self.table_name
            ))
        })?;
        if !self.columns.contains(&key_property) {
            return Err(Error::Configuration(format!(
                "key property '{key_property}' is not mapped in table '{}'",
                self.table_name
            )));
        }

        if let Some(order) = &self.default_order_by {
            if !self.columns.contains(&order.property) {
                return Err(Error::unresolved(order.property.clone()));
            }
        }

        let table_alias = self
            .table_alias
            .unwrap_or_else(|| table_alias(&self.table_name));

        Ok(Schema {
            table_name: self.table_name,
            table_alias,
            columns: self.columns,
            key_property,
            joins: self.joins,
            default_order_by: self.default_order_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foos() -> SchemaBuilder {
        let mut builder = Schema::builder("foos");
        builder
            .map(Mapping::new("Id", "id"))
            .map(Mapping::new("TemplateKey", "template_key"))
            .set_key_property("Id");
        builder
    }

    #[test]
    fn test_build_derives_alias() {
        let schema = foos().build().unwrap();
        assert_eq!(schema.table_name(), "foos");
        assert_eq!(schema.table_alias(), "f");
        assert_eq!(schema.key_mapping().unwrap().column, "id");
        assert!(!schema.qualifies_columns());
    }

    #[test]
    fn test_missing_key_is_a_configuration_error() {
        let mut builder = Schema::builder("foos");
        builder.map(Mapping::new("Name", "name"));
        assert!(matches!(builder.build(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_unmapped_key_is_a_configuration_error() {
        let mut builder = foos();
        builder.set_key_property("Missing");
        assert!(matches!(builder.build(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_order_by_must_resolve() {
        let mut builder = foos();
        builder.order_by("Nope", OrderDirection::Ascending);
        assert_eq!(
            builder.build().unwrap_err(),
            Error::SchemaResolution {
                property: String::from("Nope")
            }
        );
    }

    #[test]
    fn test_joins_qualify_columns() {
        let mut builder = foos();
        builder.join(Join::left("templates", "t", "t.key = f.template_key"));
        let schema = builder.build().unwrap();
        let mapping = schema.resolve("TemplateKey").unwrap();
        assert_eq!(schema.column_ref(mapping), "f.template_key");
    }

    #[test]
    fn test_configure_unknown_property() {
        let mut builder = foos();
        let err = builder.configure("Nope", |m| m.read_only = true).unwrap_err();
        assert!(matches!(err, Error::SchemaResolution { .. }));
    }
}
