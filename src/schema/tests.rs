use super::*;
use arrow::datatypes::{DataType, Field, Schema};

#[test]
fn test_psm_schema_creation() {
    let schema = create_psm_schema();
    assert_eq!(schema.fields().len(), 15);

    for column in columns::REQUIRED {
        let field = schema.field_with_name(column).unwrap();
        assert!(!field.is_nullable(), "{column} must not be nullable");
    }
    assert!(schema
        .field_with_name(columns::RETENTION_TIME)
        .unwrap()
        .is_nullable());
}

#[test]
fn test_schema_metadata() {
    let schema = create_psm_schema();
    assert_eq!(
        schema.metadata().get(KEY_FORMAT_VERSION).map(String::as_str),
        Some(FORMAT_VERSION)
    );
    assert_eq!(
        schema.metadata().get(KEY_TABLE_KIND).map(String::as_str),
        Some("psm")
    );

    let mass = schema.field_with_name(columns::MASS).unwrap();
    assert_eq!(mass.metadata().get("unit").unwrap(), "Da");
}

#[test]
fn test_schema_validation() {
    assert!(validate_psm_schema(&create_psm_schema()).is_ok());
    assert!(validate_crosslink_schema(&create_crosslink_schema()).is_ok());
    assert!(validate_psm_schema(&create_crosslink_schema()).is_err());
}

#[test]
fn test_schema_validation_type_mismatch() {
    let fields: Vec<Field> = create_psm_schema()
        .fields()
        .iter()
        .map(|f| {
            if f.name() == columns::PRECURSOR_CHARGE {
                Field::new(columns::PRECURSOR_CHARGE, DataType::Utf8, false)
            } else {
                f.as_ref().clone()
            }
        })
        .collect();
    let schema = Schema::new(fields);

    match validate_psm_schema(&schema) {
        Err(SchemaValidationError::TypeMismatch { column, .. }) => {
            assert_eq!(column, columns::PRECURSOR_CHARGE)
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
}

#[test]
fn test_crosslink_schema_creation() {
    let schema = create_crosslink_schema();
    assert_eq!(schema.fields().len(), 17);
    assert!(schema
        .field_with_name(crosslink_columns::MODIFIED_SEQUENCE_B)
        .is_ok());
    let rt = schema.field_with_name(columns::RETENTION_TIME).unwrap();
    assert_eq!(rt.metadata().get("unit").unwrap(), "min");
}
