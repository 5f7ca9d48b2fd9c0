//! Loading convention options from configuration.

use pgintent_core::schema::{Entity, EntityValues, PropertyInfo};
use pgintent_core::{Convention, ConventionOptions, Error, ValueKind};

struct WidgetRecord;

impl Entity for WidgetRecord {
    fn type_name() -> &'static str {
        "WidgetRecord"
    }

    fn properties() -> &'static [PropertyInfo] {
        const PROPERTIES: &[PropertyInfo] = &[
            PropertyInfo::new("Name", ValueKind::Text),
            PropertyInfo::new("Serial", ValueKind::Text),
        ];
        PROPERTIES
    }

    fn values(&self) -> EntityValues {
        EntityValues::new()
    }
}

#[test]
fn test_missing_fields_use_defaults() {
    let options: ConventionOptions = serde_json::from_str("{}").unwrap();
    assert!(!options.pluralize_table_names);
    assert_eq!(options.key_candidates, ["id", "key"]);
    assert_eq!(options.entity_suffix, "entity");
}

#[test]
fn test_options_drive_inference() {
    let options: ConventionOptions = serde_json::from_str(
        r#"{
            "pluralize_table_names": true,
            "key_candidates": ["serial"],
            "entity_suffix": "record"
        }"#,
    )
    .unwrap();
    let schema = Convention::new(options)
        .create_schema::<WidgetRecord>(|_| Ok(()))
        .unwrap();
    assert_eq!(schema.table_name(), "widgets");
    assert_eq!(schema.key_property(), "Serial");
}

#[test]
fn test_default_options_find_no_key() {
    let err = Convention::create_schema_default::<WidgetRecord>().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
