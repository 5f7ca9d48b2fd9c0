//! Property to column mappings.

use std::fmt;
use std::sync::Arc;

use super::entity::EntityValues;
use crate::naming::to_snake_case;

/// Column types the execution layer cannot infer from the bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonStandardDbType {
    /// A binary JSON document column.
    JsonB,
}

/// Produces the SQL expression inserted in place of a bound parameter.
///
/// The generator sees every value of the entity being inserted, so it can
/// derive e.g. a sequence name from another property.
#[derive(Clone)]
pub struct InsertGenerator(Arc<dyn Fn(&EntityValues) -> String + Send + Sync>);

impl InsertGenerator {
    /// Wraps a generator closure.
    pub fn new(f: impl Fn(&EntityValues) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Renders the expression for one entity.
    #[must_use]
    pub fn render(&self, values: &EntityValues) -> String {
        (self.0)(values)
    }
}

impl fmt::Debug for InsertGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InsertGenerator(..)")
    }
}

/// How one logical property maps to a physical column.
#[derive(Debug, Clone)]
pub struct Mapping {
    /// Logical property name.
    pub property: String,
    /// Unquoted column name.
    pub column: String,
    /// Column type needing an explicit cast, if any.
    pub db_type: Option<NonStandardDbType>,
    /// Expression selected (and filtered on) instead of the column.
    pub select_expression: Option<String>,
    /// Expression inserted instead of a bound parameter.
    pub on_insert: Option<InsertGenerator>,
    /// Excluded from INSERT and UPDATE entirely.
    pub read_only: bool,
}

impl Mapping {
    /// Creates a plain mapping.
    pub fn new(property: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            column: column.into(),
            db_type: None,
            select_expression: None,
            on_insert: None,
            read_only: false,
        }
    }

    /// Returns true if the column holds JSON documents.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.db_type == Some(NonStandardDbType::JsonB)
    }

    /// Returns true if UPDATE and the upsert SET list must leave this column alone.
    #[must_use]
    pub const fn is_insert_only(&self) -> bool {
        self.on_insert.is_some()
    }
}

/// Fluent builder for a single [`Mapping`].
///
/// ```rust
/// use pgintent_core::schema::Mapper;
///
/// let mapping = Mapper::map("AttributeCount")
///     .to_column_name("attribute_count")
///     .on_select("(SELECT count(*) FROM jsonb_object_keys(attributes))")
///     .read_only()
///     .create_mapping();
///
/// assert_eq!(mapping.column, "attribute_count");
/// assert!(mapping.read_only);
/// ```
#[derive(Debug, Clone)]
pub struct Mapper {
    mapping: Mapping,
}

impl Mapper {
    /// Starts a mapping for `property`, with a snake-cased column name.
    #[must_use]
    pub fn map(property: &str) -> Self {
        Self {
            mapping: Mapping::new(property, to_snake_case(property)),
        }
    }

    /// Sets the column name.
    #[must_use]
    pub fn to_column_name(mut self, column: impl Into<String>) -> Self {
        self.mapping.column = column.into();
        self
    }

    /// Sets the non-standard column type.
    #[must_use]
    pub fn of_type(mut self, db_type: NonStandardDbType) -> Self {
        self.mapping.db_type = Some(db_type);
        self
    }

    /// Sets a custom select expression.
    #[must_use]
    pub fn on_select(mut self, expression: impl Into<String>) -> Self {
        self.mapping.select_expression = Some(expression.into());
        self
    }

    /// Sets an insert-time generator expression.
    #[must_use]
    pub fn on_insert(
        mut self,
        generator: impl Fn(&EntityValues) -> String + Send + Sync + 'static,
    ) -> Self {
        self.mapping.on_insert = Some(InsertGenerator::new(generator));
        self
    }

    /// Marks the mapping as select-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.mapping.read_only = true;
        self
    }

    /// Finishes the mapping.
    #[must_use]
    pub fn create_mapping(self) -> Mapping {
        self.mapping
    }
}

/// Ordered, case-sensitive map from property name to [`Mapping`].
#[derive(Debug, Clone, Default)]
pub struct PropertyColumnMap {
    mappings: Vec<Mapping>,
}

impl PropertyColumnMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Inserts a mapping, replacing any existing one for the same property
    /// while keeping its position.
    pub fn insert(&mut self, mapping: Mapping) {
        match self
            .mappings
            .iter_mut()
            .find(|m| m.property == mapping.property)
        {
            Some(existing) => *existing = mapping,
            None => self.mappings.push(mapping),
        }
    }

    /// Returns the mapping for a property.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.property == property)
    }

    /// Returns a mutable mapping for a property.
    pub fn get_mut(&mut self, property: &str) -> Option<&mut Mapping> {
        self.mappings.iter_mut().find(|m| m.property == property)
    }

    /// Returns true if the property is mapped.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Iterates over mappings in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.mappings.iter()
    }

    /// Returns the number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if nothing is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyColumnMap {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
