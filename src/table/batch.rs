use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schema::{
    columns, create_crosslink_schema_arc, create_psm_schema_arc, crosslink_columns,
    validate_crosslink_schema, validate_psm_schema,
};
use crate::search_result::{CrosslinkPsm, Psm};

use super::TableError;

/// A row type that can be stored in an internal table
///
/// Implemented for [`Psm`] and [`CrosslinkPsm`]. Parquet goes through Arrow
/// record batches; CSV goes through serde.
pub trait TableRow: Sized + Serialize + DeserializeOwned {
    /// Table kind written to the footer (`psm` or `crosslink`)
    const KIND: &'static str;

    /// Arrow schema of the table
    fn schema() -> SchemaRef;

    /// Check that a foreign schema carries the required columns
    fn validate_schema(schema: &Schema) -> Result<(), TableError>;

    /// Convert rows into one record batch
    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch, TableError>;

    /// Convert a record batch back into rows
    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>, TableError>;
}

fn column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<&'a T, TableError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| TableError::ColumnType {
            column: name.to_string(),
            expected: expected.to_string(),
        })
}

/// Get a required column and reject nulls up front
fn required<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    expected: &str,
) -> Result<&'a T, TableError> {
    let array = column::<T>(batch, name, expected)?;
    if array.null_count() > 0 {
        let row = (0..array.len()).find(|&i| array.is_null(i)).unwrap_or(0);
        return Err(TableError::NullValue {
            column: name.to_string(),
            row,
        });
    }
    Ok(array)
}

/// Get an optional column; absent or mistyped columns read as all-null
fn optional<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Option<&'a T> {
    batch.column_by_name(name)?.as_any().downcast_ref::<T>()
}

fn optional_f64(array: Option<&Float64Array>, row: usize) -> Option<f64> {
    array.and_then(|a| a.is_valid(row).then(|| a.value(row)))
}

fn optional_i64(array: Option<&Int64Array>, row: usize) -> Option<i64> {
    array.and_then(|a| a.is_valid(row).then(|| a.value(row)))
}

fn optional_string(array: Option<&StringArray>, row: usize) -> Option<String> {
    array.and_then(|a| a.is_valid(row).then(|| a.value(row).to_string()))
}

fn length_value(array: &Int32Array, name: &str, row: usize) -> Result<usize, TableError> {
    usize::try_from(array.value(row)).map_err(|_| TableError::ColumnType {
        column: name.to_string(),
        expected: "a non-negative Int32".to_string(),
    })
}

fn length_array<I: Iterator<Item = usize>>(values: I) -> ArrayRef {
    Arc::new(Int32Array::from_iter_values(
        values.map(|v| i32::try_from(v).unwrap_or(i32::MAX)),
    ))
}

impl TableRow for Psm {
    const KIND: &'static str = "psm";

    fn schema() -> SchemaRef {
        create_psm_schema_arc()
    }

    fn validate_schema(schema: &Schema) -> Result<(), TableError> {
        Ok(validate_psm_schema(schema)?)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch, TableError> {
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.raw_file.as_str()),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.scan_number))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.modified_sequence.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.sequence.as_str()),
            )),
            Arc::new(Int32Array::from_iter_values(
                rows.iter().map(|r| r.precursor_charge),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.mass))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.score))),
            Arc::new(BooleanArray::from(
                rows.iter().map(|r| r.reverse).collect::<Vec<_>>(),
            )),
            length_array(rows.iter().map(|r| r.peptide_length)),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.proteins.as_str()),
            )),
            Arc::new(Float64Array::from_iter(
                rows.iter().map(|r| r.retention_time),
            )),
            Arc::new(Int64Array::from_iter(
                rows.iter().map(|r| r.scan_event_number),
            )),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.fragmentation.as_deref()),
            )),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| r.mass_analyzer.as_deref()),
            )),
            Arc::new(Float64Array::from_iter(
                rows.iter().map(|r| r.calculated_mass),
            )),
        ];
        Ok(RecordBatch::try_new(Self::schema(), arrays)?)
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>, TableError> {
        let raw_file = required::<StringArray>(batch, columns::RAW_FILE, "Utf8")?;
        let scan_number = required::<Int64Array>(batch, columns::SCAN_NUMBER, "Int64")?;
        let modified = required::<StringArray>(batch, columns::MODIFIED_SEQUENCE, "Utf8")?;
        let sequence = required::<StringArray>(batch, columns::SEQUENCE, "Utf8")?;
        let charge = required::<Int32Array>(batch, columns::PRECURSOR_CHARGE, "Int32")?;
        let mass = required::<Float64Array>(batch, columns::MASS, "Float64")?;
        let score = required::<Float64Array>(batch, columns::SCORE, "Float64")?;
        let reverse = required::<BooleanArray>(batch, columns::REVERSE, "Boolean")?;
        let length = required::<Int32Array>(batch, columns::PEPTIDE_LENGTH, "Int32")?;
        let proteins = required::<StringArray>(batch, columns::PROTEINS, "Utf8")?;

        let retention_time = optional::<Float64Array>(batch, columns::RETENTION_TIME);
        let scan_event_number = optional::<Int64Array>(batch, columns::SCAN_EVENT_NUMBER);
        let fragmentation = optional::<StringArray>(batch, columns::FRAGMENTATION);
        let mass_analyzer = optional::<StringArray>(batch, columns::MASS_ANALYZER);
        let calculated_mass = optional::<Float64Array>(batch, columns::CALCULATED_MASS);

        (0..batch.num_rows())
            .map(|i| {
                Ok(Psm {
                    raw_file: raw_file.value(i).to_string(),
                    scan_number: scan_number.value(i),
                    modified_sequence: modified.value(i).to_string(),
                    sequence: sequence.value(i).to_string(),
                    precursor_charge: charge.value(i),
                    mass: mass.value(i),
                    score: score.value(i),
                    reverse: reverse.value(i),
                    peptide_length: length_value(length, columns::PEPTIDE_LENGTH, i)?,
                    proteins: proteins.value(i).to_string(),
                    retention_time: optional_f64(retention_time, i),
                    scan_event_number: optional_i64(scan_event_number, i),
                    fragmentation: optional_string(fragmentation, i),
                    mass_analyzer: optional_string(mass_analyzer, i),
                    calculated_mass: optional_f64(calculated_mass, i),
                })
            })
            .collect()
    }
}

impl TableRow for CrosslinkPsm {
    const KIND: &'static str = "crosslink";

    fn schema() -> SchemaRef {
        create_crosslink_schema_arc()
    }

    fn validate_schema(schema: &Schema) -> Result<(), TableError> {
        Ok(validate_crosslink_schema(schema)?)
    }

    fn to_record_batch(rows: &[Self]) -> Result<RecordBatch, TableError> {
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.raw_file.as_str()),
            )),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.scan_number))),
            Arc::new(Int32Array::from_iter_values(
                rows.iter().map(|r| r.precursor_charge),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.mass))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.score))),
            Arc::new(BooleanArray::from(
                rows.iter().map(|r| r.reverse).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.crosslinker_type.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.proteins.as_str()),
            )),
            Arc::new(Float64Array::from_iter(
                rows.iter().map(|r| r.retention_time),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.sequence_a.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.modified_sequence_a.as_str()),
            )),
            length_array(rows.iter().map(|r| r.peptide_length_a)),
            length_array(rows.iter().map(|r| r.crosslinker_position_a)),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.sequence_b.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.modified_sequence_b.as_str()),
            )),
            length_array(rows.iter().map(|r| r.peptide_length_b)),
            length_array(rows.iter().map(|r| r.crosslinker_position_b)),
        ];
        Ok(RecordBatch::try_new(Self::schema(), arrays)?)
    }

    fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>, TableError> {
        use crosslink_columns as xl;

        let raw_file = required::<StringArray>(batch, columns::RAW_FILE, "Utf8")?;
        let scan_number = required::<Int64Array>(batch, columns::SCAN_NUMBER, "Int64")?;
        let charge = required::<Int32Array>(batch, columns::PRECURSOR_CHARGE, "Int32")?;
        let mass = required::<Float64Array>(batch, columns::MASS, "Float64")?;
        let score = required::<Float64Array>(batch, columns::SCORE, "Float64")?;
        let reverse = required::<BooleanArray>(batch, columns::REVERSE, "Boolean")?;
        let crosslinker = required::<StringArray>(batch, xl::CROSSLINKER_TYPE, "Utf8")?;
        let proteins = required::<StringArray>(batch, columns::PROTEINS, "Utf8")?;
        let retention_time = optional::<Float64Array>(batch, columns::RETENTION_TIME);

        let sequence_a = required::<StringArray>(batch, xl::SEQUENCE_A, "Utf8")?;
        let modified_a = required::<StringArray>(batch, xl::MODIFIED_SEQUENCE_A, "Utf8")?;
        let length_a = required::<Int32Array>(batch, xl::PEPTIDE_LENGTH_A, "Int32")?;
        let position_a = required::<Int32Array>(batch, xl::CROSSLINKER_POSITION_A, "Int32")?;
        let sequence_b = required::<StringArray>(batch, xl::SEQUENCE_B, "Utf8")?;
        let modified_b = required::<StringArray>(batch, xl::MODIFIED_SEQUENCE_B, "Utf8")?;
        let length_b = required::<Int32Array>(batch, xl::PEPTIDE_LENGTH_B, "Int32")?;
        let position_b = required::<Int32Array>(batch, xl::CROSSLINKER_POSITION_B, "Int32")?;

        (0..batch.num_rows())
            .map(|i| {
                Ok(CrosslinkPsm {
                    raw_file: raw_file.value(i).to_string(),
                    scan_number: scan_number.value(i),
                    precursor_charge: charge.value(i),
                    mass: mass.value(i),
                    score: score.value(i),
                    reverse: reverse.value(i),
                    crosslinker_type: crosslinker.value(i).to_string(),
                    proteins: proteins.value(i).to_string(),
                    retention_time: optional_f64(retention_time, i),
                    sequence_a: sequence_a.value(i).to_string(),
                    modified_sequence_a: modified_a.value(i).to_string(),
                    peptide_length_a: length_value(length_a, xl::PEPTIDE_LENGTH_A, i)?,
                    crosslinker_position_a: length_value(position_a, xl::CROSSLINKER_POSITION_A, i)?,
                    sequence_b: sequence_b.value(i).to_string(),
                    modified_sequence_b: modified_b.value(i).to_string(),
                    peptide_length_b: length_value(length_b, xl::PEPTIDE_LENGTH_B, i)?,
                    crosslinker_position_b: length_value(position_b, xl::CROSSLINKER_POSITION_B, i)?,
                })
            })
            .collect()
    }
}
