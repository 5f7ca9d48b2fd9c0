//! Compile-time entity descriptions.
//!
//! An [`Entity`] declares its properties and their type tags up front and
//! hands out its current values on demand. `#[derive(Entity)]` from
//! `pgintent-derive` generates the implementation for plain structs; hosts
//! can also implement the trait by hand.

use crate::value::{SqlValue, ValueKind};

/// A declared entity property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Logical property name, case-sensitive.
    pub name: &'static str,
    /// Runtime type tag used for convention-based type guessing.
    pub kind: ValueKind,
}

impl PropertyInfo {
    /// Creates a property descriptor.
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

/// A persistable entity type.
///
/// # Example
///
/// ```rust
/// use pgintent_core::schema::{Entity, EntityValues, PropertyInfo};
/// use pgintent_core::ValueKind;
///
/// struct Foo {
///     id: i64,
///     template_key: String,
/// }
///
/// impl Entity for Foo {
///     fn type_name() -> &'static str {
///         "Foo"
///     }
///
///     fn properties() -> &'static [PropertyInfo] {
///         const PROPERTIES: &[PropertyInfo] = &[
///             PropertyInfo::new("Id", ValueKind::Int),
///             PropertyInfo::new("TemplateKey", ValueKind::Text),
///         ];
///         PROPERTIES
///     }
///
///     fn values(&self) -> EntityValues {
///         EntityValues::new()
///             .with("Id", self.id)
///             .with("TemplateKey", self.template_key.clone())
///     }
/// }
/// ```
pub trait Entity {
    /// The entity type name the table name is derived from.
    fn type_name() -> &'static str;

    /// Declared properties, in declaration order.
    fn properties() -> &'static [PropertyInfo];

    /// Current property values, in declaration order.
    fn values(&self) -> EntityValues;
}

/// Ordered property values extracted from an entity instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityValues {
    values: Vec<(String, SqlValue)>,
}

impl EntityValues {
    /// Creates an empty value list.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a property value.
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl crate::ToSqlValue) -> Self {
        self.push(property, value);
        self
    }

    /// Appends a property value in place.
    pub fn push(&mut self, property: impl Into<String>, value: impl crate::ToSqlValue) {
        self.values.push((property.into(), value.to_sql_value()));
    }

    /// Returns the value of a property.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Iterates over `(property, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
