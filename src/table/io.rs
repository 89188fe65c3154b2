use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::reader::{FileReader, SerializedFileReader};

use crate::schema::{CSV_EXTENSION, FORMAT_VERSION, KEY_FORMAT_VERSION, KEY_TABLE_KIND, PARQUET_EXTENSION};
use crate::search_result::{CrosslinkPsm, Psm};

use super::batch::TableRow;
use super::config::WriterConfig;
use super::TableError;

/// On-disk format of an internal table, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Apache Parquet (`.parquet`)
    Parquet,
    /// Comma-separated text with a header (`.csv`)
    Csv,
}

impl TableFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some(PARQUET_EXTENSION) => Ok(TableFormat::Parquet),
            Some(CSV_EXTENSION) => Ok(TableFormat::Csv),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read every row of an internal table
pub fn read_table<R: TableRow, P: AsRef<Path>>(path: P) -> Result<Vec<R>, TableError> {
    let path = path.as_ref();
    let rows = match TableFormat::from_path(path)? {
        TableFormat::Parquet => {
            let file = File::open(path)?;
            let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
            R::validate_schema(builder.schema())?;
            let mut rows = Vec::new();
            for batch in builder.build()? {
                rows.extend(R::from_record_batch(&batch?)?);
            }
            rows
        }
        TableFormat::Csv => {
            let mut reader = csv::Reader::from_path(path)?;
            reader.deserialize().collect::<Result<Vec<R>, _>>()?
        }
    };
    debug!(
        target: "spectrum_io::table",
        "Read {} {} rows from {}",
        rows.len(),
        R::KIND,
        path.display()
    );
    Ok(rows)
}

/// Write rows as an internal table with default settings
pub fn write_table<R: TableRow, P: AsRef<Path>>(rows: &[R], path: P) -> Result<(), TableError> {
    write_table_with(rows, path, &WriterConfig::default(), &HashMap::new())
}

/// Write rows as an internal table
///
/// For parquet output `metadata` is stored in the file footer next to the
/// format version and table kind; CSV output ignores both `config` and
/// `metadata`.
pub fn write_table_with<R: TableRow, P: AsRef<Path>>(
    rows: &[R],
    path: P,
    config: &WriterConfig,
    metadata: &HashMap<String, String>,
) -> Result<(), TableError> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Parquet => {
            let mut footer = metadata.clone();
            footer.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
            footer.insert(KEY_TABLE_KIND.to_string(), R::KIND.to_string());
            let props = config.to_writer_properties(&footer);

            let batch = R::to_record_batch(rows)?;
            let file = File::create(path)?;
            let mut writer = ArrowWriter::try_new(file, R::schema(), Some(props))?;
            writer.write(&batch)?;
            writer.close()?;
        }
        TableFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
    }
    debug!(
        target: "spectrum_io::table",
        "Wrote {} {} rows to {}",
        rows.len(),
        R::KIND,
        path.display()
    );
    Ok(())
}

/// Key/value metadata from the footer of a parquet table
pub fn read_footer_metadata<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, TableError> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let mut metadata = HashMap::new();
    if let Some(kv_list) = reader.metadata().file_metadata().key_value_metadata() {
        for kv in kv_list {
            if let Some(value) = &kv.value {
                metadata.insert(kv.key.clone(), value.clone());
            }
        }
    }
    Ok(metadata)
}

/// Read an internal PSM table (parquet or CSV)
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<Psm>, TableError> {
    read_table(path)
}

/// Write an internal PSM table (parquet or CSV)
pub fn write_file<P: AsRef<Path>>(rows: &[Psm], path: P) -> Result<(), TableError> {
    write_table(rows, path)
}

/// Read an internal crosslink table (parquet or CSV)
pub fn read_crosslink_file<P: AsRef<Path>>(path: P) -> Result<Vec<CrosslinkPsm>, TableError> {
    read_table(path)
}

/// Write an internal crosslink table (parquet or CSV)
pub fn write_crosslink_file<P: AsRef<Path>>(
    rows: &[CrosslinkPsm],
    path: P,
) -> Result<(), TableError> {
    write_table(rows, path)
}
