//! SELECT statements: find, get and get-all.

use super::QueryBuilder;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::predicate::Predicate;
use crate::schema::Entity;
use crate::value::ToSqlValue;

impl<E: Entity, D: Dialect> QueryBuilder<E, D> {
    /// Selects every row matching `predicate`, or every row when `None`.
    ///
    /// # Errors
    ///
    /// Propagates predicate compilation errors.
    pub fn find(&self, predicate: Option<&Predicate>, params: &mut QueryParameters) -> Result<String> {
        let mut sql = format!("SELECT {} FROM {}", self.select_list(), self.from_clause());

        let filter = self.compiler().compile(predicate, params)?;
        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }

        if let Some(order) = self.order_clause()? {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }

        Ok(self.finish("SELECT", &sql))
    }

    /// Selects the row whose key equals `key`.
    ///
    /// # Errors
    ///
    /// Propagates predicate compilation errors.
    pub fn get(&self, key: impl ToSqlValue, params: &mut QueryParameters) -> Result<String> {
        let predicate = self.key_predicate(key.to_sql_value());
        self.find(Some(&predicate), params)
    }

    /// Selects every row.
    ///
    /// # Errors
    ///
    /// Fails only if the default ordering cannot be resolved.
    pub fn get_all(&self, params: &mut QueryParameters) -> Result<String> {
        self.find(None, params)
    }

    fn select_list(&self) -> String {
        self.schema
            .columns()
            .iter()
            .map(|mapping| match &mapping.select_expression {
                Some(expr) => format!("{expr} AS {}", self.identifier(&mapping.column)),
                None => self.identifier(&self.schema.column_ref(mapping)),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn from_clause(&self) -> String {
        let mut from = self.table();
        if self.schema.qualifies_columns() {
            from.push(' ');
            from.push_str(self.schema.table_alias());
            for join in self.schema.joins() {
                from.push_str(&format!(
                    " {} {} {} ON {}",
                    join.kind.as_str(),
                    self.identifier(&join.table),
                    join.alias,
                    join.on
                ));
            }
        }
        from
    }

    fn order_clause(&self) -> Result<Option<String>> {
        let Some(order) = self.schema.default_order_by() else {
            return Ok(None);
        };
        let mapping = self.schema.resolve(&order.property)?;
        // Computed columns are ordered by their output name.
        let target = if mapping.select_expression.is_some() {
            self.identifier(&mapping.column)
        } else {
            self.identifier(&self.schema.column_ref(mapping))
        };
        Ok(Some(format!("{target} {}", order.direction.as_sql())))
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::QueryBuilder;
    use crate::params::QueryParameters;
    use crate::predicate::Predicate;
    use crate::schema::{Entity, EntityValues, Join, Mapping, OrderDirection, PropertyInfo, Schema};
    use crate::value::{SqlValue, ValueKind};

    struct Product;

    impl Entity for Product {
        fn type_name() -> &'static str {
            "Product"
        }

        fn properties() -> &'static [PropertyInfo] {
            const PROPERTIES: &[PropertyInfo] = &[
                PropertyInfo::new("Id", ValueKind::Int),
                PropertyInfo::new("TemplateKey", ValueKind::Text),
            ];
            PROPERTIES
        }

        fn values(&self) -> EntityValues {
            EntityValues::new()
        }
    }

    fn products() -> Schema {
        let mut schema = Schema::builder("products");
        schema
            .map(Mapping::new("Id", "id"))
            .map(Mapping::new("TemplateKey", "template_key"))
            .set_key_property("Id");
        schema.build().unwrap()
    }

    #[test]
    fn test_get_all_has_no_where() {
        let builder = QueryBuilder::<Product>::new(products());
        let mut params = QueryParameters::new();
        let sql = builder.get_all(&mut params).unwrap();
        assert_eq!(sql, "SELECT id,template_key FROM products");
        assert!(params.is_empty());
    }

    #[test]
    fn test_get_uses_plain_key_equality() {
        let builder = QueryBuilder::<Product>::new(products());
        let mut params = QueryParameters::new();
        let sql = builder.get(7, &mut params).unwrap();
        assert_eq!(sql, "SELECT id,template_key FROM products WHERE id = @id");
        assert_eq!(params.get("id"), Some(&SqlValue::Int(7)));
    }

    #[test]
    fn test_find_with_filter() {
        let builder = QueryBuilder::<Product>::new(products());
        let mut params = QueryParameters::new();
        let filter = Predicate::gt("Id", 10);
        let sql = builder.find(Some(&filter), &mut params).unwrap();
        assert_eq!(sql, "SELECT id,template_key FROM products WHERE id > @id");
    }

    #[test]
    fn test_computed_column_and_ordering() {
        let mut schema = Schema::builder("products");
        schema
            .map(Mapping::new("Id", "id"))
            .map(Mapping::new("TemplateKey", "template_key"))
            .map(Mapping {
                select_expression: Some(String::from("upper(template_key)")),
                read_only: true,
                ..Mapping::new("Label", "label")
            })
            .set_key_property("Id")
            .order_by("Label", OrderDirection::Descending);
        let builder = QueryBuilder::<Product>::new(schema.build().unwrap());

        let sql = builder.get_all(&mut QueryParameters::new()).unwrap();
        assert_eq!(
            sql,
            "SELECT id,template_key,upper(template_key) AS label FROM products ORDER BY label DESC"
        );
    }

    #[test]
    fn test_joins_qualify_columns() {
        let mut schema = Schema::builder("products");
        schema
            .map(Mapping::new("Id", "id"))
            .map(Mapping::new("TemplateKey", "template_key"))
            .set_key_property("Id")
            .join(Join::left("templates", "t", "t.key = p.template_key"))
            .order_by("Id", OrderDirection::Ascending);
        let builder = QueryBuilder::<Product>::new(schema.build().unwrap());

        let mut params = QueryParameters::new();
        let sql = builder.get(1, &mut params).unwrap();
        assert_eq!(
            sql,
            "SELECT p.id,p.template_key FROM products p \
             LEFT JOIN templates t ON t.key = p.template_key \
             WHERE p.id = @id ORDER BY p.id ASC"
        );
    }
}
