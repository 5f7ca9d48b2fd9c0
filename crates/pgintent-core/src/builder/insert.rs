//! INSERT statements, with optional ON CONFLICT handling.

use super::{Assignment, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::schema::Entity;

/// What an upsert does when the key already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Overwrite every non-key, non-insert-only column from the new row.
    #[default]
    Update,
    /// Keep the existing row.
    DoNothing,
}

impl<E: Entity, D: Dialect> QueryBuilder<E, D> {
    /// Inserts `entity`.
    ///
    /// Every writable property is bound as a parameter named after its
    /// column. Insert generators replace the parameter with their expression.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SchemaResolution`] if the entity exposes a
    /// property the schema does not map.
    pub fn create(&self, entity: &E, params: &mut QueryParameters) -> Result<String> {
        let assignments = self.assignments(&entity.values(), params, true)?;
        let sql = self.insert_sql(&assignments);
        Ok(self.finish("INSERT", &sql))
    }

    /// Inserts `entity`, resolving key conflicts according to `on_conflict`.
    ///
    /// [`OnConflict::Update`] falls back to `DO NOTHING` when no column is
    /// left to update.
    ///
    /// # Errors
    ///
    /// Same as [`QueryBuilder::create`].
    pub fn upsert(
        &self,
        entity: &E,
        on_conflict: OnConflict,
        params: &mut QueryParameters,
    ) -> Result<String> {
        let assignments = self.assignments(&entity.values(), params, true)?;
        let key = self.schema.key_mapping()?;

        let mut sql = self.insert_sql(&assignments);
        sql.push_str(&format!(" ON CONFLICT({})", self.identifier(&key.column)));

        let updates: Vec<String> = match on_conflict {
            OnConflict::Update => assignments
                .iter()
                .filter(|a| !a.is_key && !a.insert_only)
                .map(|a| format!("{0} = EXCLUDED.{0}", a.column))
                .collect(),
            OnConflict::DoNothing => Vec::new(),
        };

        if updates.is_empty() {
            sql.push_str(" DO NOTHING");
        } else {
            sql.push_str(" DO UPDATE SET ");
            sql.push_str(&updates.join(","));
        }

        Ok(self.finish("UPSERT", &sql))
    }

    fn insert_sql(&self, assignments: &[Assignment]) -> String {
        let columns: Vec<&str> = assignments.iter().map(|a| a.column.as_str()).collect();
        let values: Vec<&str> = assignments.iter().map(|a| a.expr.as_str()).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(),
            columns.join(","),
            values.join(",")
        )
    }
}
