use arrow::datatypes::{DataType, Schema};

use super::{columns, crosslink_columns};

fn validate_columns(
    schema: &Schema,
    required_columns: &[(&str, DataType)],
) -> Result<(), SchemaValidationError> {
    for (name, expected_type) in required_columns {
        match schema.field_with_name(name) {
            Ok(field) => {
                if field.data_type() != expected_type {
                    return Err(SchemaValidationError::TypeMismatch {
                        column: name.to_string(),
                        expected: format!("{:?}", expected_type),
                        found: format!("{:?}", field.data_type()),
                    });
                }
            }
            Err(_) => {
                return Err(SchemaValidationError::MissingColumn(name.to_string()));
            }
        }
    }
    Ok(())
}

/// Validates that a schema carries the required columns of the PSM table.
///
/// Only column presence and type are checked; extra columns are allowed.
pub fn validate_psm_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    validate_columns(
        schema,
        &[
            (columns::RAW_FILE, DataType::Utf8),
            (columns::SCAN_NUMBER, DataType::Int64),
            (columns::MODIFIED_SEQUENCE, DataType::Utf8),
            (columns::SEQUENCE, DataType::Utf8),
            (columns::PRECURSOR_CHARGE, DataType::Int32),
            (columns::MASS, DataType::Float64),
            (columns::SCORE, DataType::Float64),
            (columns::REVERSE, DataType::Boolean),
            (columns::PEPTIDE_LENGTH, DataType::Int32),
            (columns::PROTEINS, DataType::Utf8),
        ],
    )
}

/// Validates that a schema carries the required columns of the crosslink table.
pub fn validate_crosslink_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    validate_columns(
        schema,
        &[
            (columns::RAW_FILE, DataType::Utf8),
            (columns::SCAN_NUMBER, DataType::Int64),
            (columns::PRECURSOR_CHARGE, DataType::Int32),
            (columns::SCORE, DataType::Float64),
            (columns::REVERSE, DataType::Boolean),
            (crosslink_columns::MODIFIED_SEQUENCE_A, DataType::Utf8),
            (crosslink_columns::MODIFIED_SEQUENCE_B, DataType::Utf8),
            (crosslink_columns::CROSSLINKER_POSITION_A, DataType::Int32),
            (crosslink_columns::CROSSLINKER_POSITION_B, DataType::Int32),
        ],
    )
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}
