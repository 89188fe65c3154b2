use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::schema::PARQUET_EXTENSION;

use super::batch::TableRow;
use super::io::{read_table, write_table};
use super::TableError;

/// Path of the partition `key` inside `directory`
pub fn partition_path<P: AsRef<Path>>(directory: P, key: &str) -> PathBuf {
    directory
        .as_ref()
        .join(format!("{}.{}", key, PARQUET_EXTENSION))
}

/// Write one parquet table per key into `directory`
///
/// Existing partitions with other keys are left untouched; partitions with
/// the same key are replaced.
pub fn write_partition<R, P, K>(tables: &[Vec<R>], directory: P, keys: &[K]) -> Result<(), TableError>
where
    R: TableRow,
    P: AsRef<Path>,
    K: AsRef<str>,
{
    if tables.len() != keys.len() {
        return Err(TableError::PartitionMismatch {
            tables: tables.len(),
            keys: keys.len(),
        });
    }
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;

    for (rows, key) in tables.iter().zip(keys) {
        write_table(rows, partition_path(directory, key.as_ref()))?;
    }
    info!(
        target: "spectrum_io::table",
        "Wrote {} partitions to {}",
        keys.len(),
        directory.display()
    );
    Ok(())
}

/// Read the partition `key` from `directory`
pub fn read_partition<R, P>(directory: P, key: &str) -> Result<Vec<R>, TableError>
where
    R: TableRow,
    P: AsRef<Path>,
{
    let directory = directory.as_ref();
    let path = partition_path(directory, key);
    if !path.is_file() {
        return Err(TableError::PartitionNotFound {
            directory: directory.to_path_buf(),
            key: key.to_string(),
        });
    }
    read_table(path)
}
