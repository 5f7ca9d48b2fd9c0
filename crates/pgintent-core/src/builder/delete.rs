//! DELETE statements keyed on the key property.

use super::QueryBuilder;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::schema::Entity;
use crate::value::ToSqlValue;

impl<E: Entity, D: Dialect> QueryBuilder<E, D> {
    /// Deletes the row whose key equals `key`.
    ///
    /// # Errors
    ///
    /// Propagates predicate compilation errors.
    pub fn delete(&self, key: impl ToSqlValue, params: &mut QueryParameters) -> Result<String> {
        let filter = self
            .compiler()
            .unqualified()
            .compile(Some(&self.key_predicate(key.to_sql_value())), params)?;
        let sql = format!("DELETE FROM {} WHERE {filter}", self.table());
        Ok(self.finish("DELETE", &sql))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::builder::QueryBuilder;
    use crate::params::QueryParameters;
    use crate::schema::{Entity, EntityValues, Mapping, PropertyInfo, Schema};
    use crate::value::{SqlValue, ValueKind};

    struct Session;

    impl Entity for Session {
        fn type_name() -> &'static str {
            "Session"
        }

        fn properties() -> &'static [PropertyInfo] {
            &[]
        }

        fn values(&self) -> EntityValues {
            EntityValues::new()
        }
    }

    #[test]
    fn test_delete_by_key() {
        let mut schema = Schema::builder("sessions");
        schema
            .map(Mapping::new("SessionKey", "session_key"))
            .set_key_property("SessionKey");
        let builder = QueryBuilder::<Session>::new(schema.build().unwrap());

        let key = Uuid::new_v4();
        let mut params = QueryParameters::new();
        let sql = builder.delete(key, &mut params).unwrap();
        assert_eq!(sql, "DELETE FROM sessions WHERE session_key = @session_key");
        assert_eq!(params.get("session_key"), Some(&SqlValue::Uuid(key)));
        assert_eq!(ValueKind::Uuid, params.get("session_key").unwrap().kind());
    }
}
