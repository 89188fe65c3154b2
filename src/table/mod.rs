//! # Internal Table Persistence
//!
//! Reading and writing of the internal PSM and crosslink tables. The format
//! follows the file extension: `.parquet` tables are written with the
//! configured compression and carry provenance in the footer key/value
//! metadata, `.csv` tables are plain comma-separated text with a header.
//!
//! Partitioned tables store one parquet file per key, `<dir>/<key>.parquet`.
//!
//! ```rust,no_run
//! use spectrum_io::table::{read_file, write_file};
//!
//! let rows = read_file("msms.parquet")?;
//! write_file(&rows, "msms.csv")?;
//! # Ok::<(), spectrum_io::table::TableError>(())
//! ```

mod batch;
mod config;
mod error;
mod io;
mod partition;

#[cfg(test)]
mod tests;

pub use batch::TableRow;
pub use config::{CompressionType, WriterConfig};
pub use error::TableError;
pub use io::{
    read_crosslink_file, read_file, read_footer_metadata, read_table, write_crosslink_file,
    write_file, write_table, write_table_with, TableFormat,
};
pub use partition::{partition_path, read_partition, write_partition};
