//! UPDATE statements keyed on the entity's key property.

use super::QueryBuilder;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::params::QueryParameters;
use crate::schema::Entity;

impl<E: Entity, D: Dialect> QueryBuilder<E, D> {
    /// Updates the row identified by `entity`'s key.
    ///
    /// The key and insert-only columns are left out of the SET list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaResolution`] for unmapped entity properties and
    /// [`Error::Configuration`] when the entity has no key value or nothing
    /// to update.
    pub fn update(&self, entity: &E, params: &mut QueryParameters) -> Result<String> {
        let values = entity.values();
        let key = self.key_value(&values)?;
        let assignments = self.assignments(&values, params, false)?;

        let set: Vec<String> = assignments
            .iter()
            .filter(|a| !a.is_key && !a.insert_only)
            .map(|a| format!("{} = {}", a.column, a.expr))
            .collect();
        if set.is_empty() {
            return Err(Error::Configuration(format!(
                "entity '{}' has no updatable column",
                E::type_name()
            )));
        }

        let filter = self
            .compiler()
            .unqualified()
            .compile(Some(&self.key_predicate(key)), params)?;

        let sql = format!(
            "UPDATE {} SET {} WHERE {filter}",
            self.table(),
            set.join(",")
        );
        Ok(self.finish("UPDATE", &sql))
    }
}
