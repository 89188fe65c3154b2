use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::constants::{FORMAT_VERSION, KEY_FORMAT_VERSION, KEY_TABLE_KIND};
use super::{columns, crosslink_columns};

/// Creates a Field annotated with its unit
fn field_with_unit(name: &str, data_type: DataType, nullable: bool, unit: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("unit".to_string(), unit.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

fn schema_metadata(kind: &str, description: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
    metadata.insert(KEY_TABLE_KIND.to_string(), kind.to_string());
    metadata.insert(
        "spectrum_io:schema_description".to_string(),
        description.to_string(),
    );
    metadata
}

/// Creates the Arrow schema of the internal PSM table.
///
/// # Schema Columns
///
/// | Column | Type | Nullable |
/// |--------|------|----------|
/// | RAW_FILE | Utf8 | no |
/// | SCAN_NUMBER | Int64 | no |
/// | MODIFIED_SEQUENCE | Utf8 | no |
/// | SEQUENCE | Utf8 | no |
/// | PRECURSOR_CHARGE | Int32 | no |
/// | MASS | Float64 | no |
/// | SCORE | Float64 | no |
/// | REVERSE | Boolean | no |
/// | PEPTIDE_LENGTH | Int32 | no |
/// | PROTEINS | Utf8 | no |
/// | RETENTION_TIME | Float64 | yes |
/// | SCAN_EVENT_NUMBER | Int64 | yes |
/// | FRAGMENTATION | Utf8 | yes |
/// | MASS_ANALYZER | Utf8 | yes |
/// | CALCULATED_MASS | Float64 | yes |
///
/// # Example
///
/// ```
/// use spectrum_io::schema::create_psm_schema;
///
/// let schema = create_psm_schema();
/// assert_eq!(schema.fields().len(), 15);
/// ```
pub fn create_psm_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(Field::new(columns::RAW_FILE, DataType::Utf8, false));
    builder.push(Field::new(columns::SCAN_NUMBER, DataType::Int64, false));
    builder.push(Field::new(columns::MODIFIED_SEQUENCE, DataType::Utf8, false));
    builder.push(Field::new(columns::SEQUENCE, DataType::Utf8, false));
    builder.push(Field::new(columns::PRECURSOR_CHARGE, DataType::Int32, false));
    builder.push(field_with_unit(columns::MASS, DataType::Float64, false, "Da"));
    builder.push(Field::new(columns::SCORE, DataType::Float64, false));
    builder.push(Field::new(columns::REVERSE, DataType::Boolean, false));
    builder.push(Field::new(columns::PEPTIDE_LENGTH, DataType::Int32, false));
    builder.push(Field::new(columns::PROTEINS, DataType::Utf8, false));

    // Engine-specific, nullable
    builder.push(Field::new(columns::RETENTION_TIME, DataType::Float64, true));
    builder.push(Field::new(columns::SCAN_EVENT_NUMBER, DataType::Int64, true));
    builder.push(Field::new(columns::FRAGMENTATION, DataType::Utf8, true));
    builder.push(Field::new(columns::MASS_ANALYZER, DataType::Utf8, true));
    builder.push(field_with_unit(
        columns::CALCULATED_MASS,
        DataType::Float64,
        true,
        "Da",
    ));

    builder
        .finish()
        .with_metadata(schema_metadata("psm", "Peptide-spectrum matches with UNIMOD-annotated sequences"))
}

/// Returns an Arc-wrapped PSM schema for shared ownership
pub fn create_psm_schema_arc() -> Arc<Schema> {
    Arc::new(create_psm_schema())
}

/// Creates the Arrow schema of the internal crosslink table.
///
/// Shared columns come first, followed by the `_A` and `_B` columns of the
/// two linked peptides.
pub fn create_crosslink_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(Field::new(columns::RAW_FILE, DataType::Utf8, false));
    builder.push(Field::new(columns::SCAN_NUMBER, DataType::Int64, false));
    builder.push(Field::new(columns::PRECURSOR_CHARGE, DataType::Int32, false));
    builder.push(field_with_unit(columns::MASS, DataType::Float64, false, "Da"));
    builder.push(Field::new(columns::SCORE, DataType::Float64, false));
    builder.push(Field::new(columns::REVERSE, DataType::Boolean, false));
    builder.push(Field::new(
        crosslink_columns::CROSSLINKER_TYPE,
        DataType::Utf8,
        false,
    ));
    builder.push(Field::new(columns::PROTEINS, DataType::Utf8, false));
    builder.push(field_with_unit(
        columns::RETENTION_TIME,
        DataType::Float64,
        true,
        "min",
    ));

    for (sequence, modified, length, position) in [
        (
            crosslink_columns::SEQUENCE_A,
            crosslink_columns::MODIFIED_SEQUENCE_A,
            crosslink_columns::PEPTIDE_LENGTH_A,
            crosslink_columns::CROSSLINKER_POSITION_A,
        ),
        (
            crosslink_columns::SEQUENCE_B,
            crosslink_columns::MODIFIED_SEQUENCE_B,
            crosslink_columns::PEPTIDE_LENGTH_B,
            crosslink_columns::CROSSLINKER_POSITION_B,
        ),
    ] {
        builder.push(Field::new(sequence, DataType::Utf8, false));
        builder.push(Field::new(modified, DataType::Utf8, false));
        builder.push(Field::new(length, DataType::Int32, false));
        builder.push(Field::new(position, DataType::Int32, false));
    }

    builder
        .finish()
        .with_metadata(schema_metadata("crosslink", "Crosslinked peptide pairs with UNIMOD-annotated sequences"))
}

/// Returns an Arc-wrapped crosslink schema for shared ownership
pub fn create_crosslink_schema_arc() -> Arc<Schema> {
    Arc::new(create_crosslink_schema())
}
