/// Internal table format version - follows semantic versioning
pub const FORMAT_VERSION: &str = "1.0.0";

/// File extension of parquet tables
pub const PARQUET_EXTENSION: &str = "parquet";

/// File extension of CSV tables
pub const CSV_EXTENSION: &str = "csv";

/// Metadata key for format version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "spectrum_io:format_version";

/// Metadata key for conversion timestamp
pub const KEY_CONVERSION_TIMESTAMP: &str = "spectrum_io:conversion_timestamp";

/// Metadata key for converter software info
pub const KEY_CONVERTER_INFO: &str = "spectrum_io:converter_info";

/// Metadata key for the conversion source (engine, label, input files) as JSON
pub const KEY_SOURCE: &str = "spectrum_io:source";

/// Metadata key for the table kind (`psm` or `crosslink`)
pub const KEY_TABLE_KIND: &str = "spectrum_io:table_kind";
