use std::path::PathBuf;

use crate::modification::ModificationError;
use crate::table::TableError;

/// Errors that can occur while converting search engine results
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Malformed modification mapping or option
    #[error("Configuration error for '{key}': {reason}")]
    Configuration {
        /// Offending key or option name
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Input path does not exist
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Directory input without a single matching file
    #[error("No files ending with '{pattern}' found in {}", .directory.display())]
    NoMatchingFiles {
        /// Searched directory
        directory: PathBuf,
        /// Expected file suffix
        pattern: String,
    },

    /// Requested feature is not implemented for this search engine
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Engine modification that cannot be translated to UNIMOD
    #[error("Unknown modification '{modification}' in sequence '{sequence}'")]
    UnknownModification {
        /// Modification annotation as written by the engine
        modification: String,
        /// Sequence it was attached to
        sequence: String,
    },

    /// Required column missing from an input file
    #[error("Column '{column}' not found in {}", .file.display())]
    MissingColumn {
        /// Input file
        file: PathBuf,
        /// Column name
        column: String,
    },

    /// Cell that cannot be parsed into the expected type
    #[error("Invalid value '{value}' for column '{column}' in {} line {line}", .file.display())]
    InvalidValue {
        /// Input file
        file: PathBuf,
        /// 1-based line (or record) number
        line: u64,
        /// Column name
        column: String,
        /// Cell content
        value: String,
    },

    /// I/O error while reading inputs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed pepXML
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error from the persistence layer
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl From<ModificationError> for ConversionError {
    fn from(err: ModificationError) -> Self {
        let key = match &err {
            ModificationError::InvalidPattern { key, .. }
            | ModificationError::InvalidUnimodId { key, .. } => key.clone(),
            ModificationError::InvalidRegex { pattern, .. } => pattern.clone(),
            ModificationError::UnknownLabel(label) => label.clone(),
        };
        ConversionError::Configuration {
            key,
            reason: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConversionError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConversionError::Xml(quick_xml::Error::from(err))
    }
}
