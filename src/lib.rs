//! # spectrum-io - Search Engine Results in a Common Format
//!
//! `spectrum_io` converts the native output of proteomics search engines into
//! one normalized table of peptide-spectrum matches (PSMs), ready for
//! spectral prediction tooling.
//!
//! ## Key Features
//!
//! - **Five engines**: MaxQuant, MSFragger (pepXML), Sage, MSAmanda and the
//!   XlinkX crosslink search, behind a single [`search_result::SearchEngine`]
//!   trait.
//!
//! - **Canonical modifications**: every engine notation (`M(ox)`, `M[147]`,
//!   `M[+15.9949]`, lowercase `m`, ...) is rewritten to bracketed UNIMOD
//!   tags in a single left-to-right scan, see [`modification`].
//!
//! - **Label chemistries**: TMT, TMTpro, iTRAQ 4/8-plex and SILAC are
//!   injected as fixed modifications where the engine supports them.
//!
//! - **Validity filtering**: rows outside the supported peptide envelope are
//!   dropped, see [`filter`].
//!
//! - **Parquet or CSV output**: internal tables are persisted with Apache
//!   Parquet (provenance in the footer metadata) or as plain CSV, see
//!   [`table`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spectrum_io::modification::LabelChemistry;
//! use spectrum_io::search_result::{generate_internal, MaxQuant, ReadOptions};
//!
//! let maxquant = MaxQuant::new("combined/txt/msms.txt");
//! let options = ReadOptions::new().with_label(LabelChemistry::Tmt);
//!
//! // Converts once; later calls return the existing table
//! let psms = generate_internal(&maxquant, &options, Some("msms.parquet".as_ref()))?;
//! println!("{} PSMs", psms.len());
//! # Ok::<(), spectrum_io::search_result::ConversionError>(())
//! ```
//!
//! ## Internal Table
//!
//! | Column | Type | Required | Description |
//! |--------|------|----------|-------------|
//! | RAW_FILE | Utf8 | Yes | Raw file name without extension |
//! | SCAN_NUMBER | Int64 | Yes | MS2 scan number |
//! | MODIFIED_SEQUENCE | Utf8 | Yes | Sequence with `[UNIMOD:n]` tags |
//! | SEQUENCE | Utf8 | Yes | Bare sequence |
//! | PRECURSOR_CHARGE | Int32 | Yes | Precursor charge |
//! | MASS | Float64 | Yes | Precursor mass in Da |
//! | SCORE | Float64 | Yes | Engine score |
//! | REVERSE | Boolean | Yes | Decoy flag |
//! | PEPTIDE_LENGTH | Int32 | Yes | Residue count |
//! | PROTEINS | Utf8 | Yes | `;`-separated accessions |
//! | RETENTION_TIME | Float64 | No | Retention time |
//! | SCAN_EVENT_NUMBER | Int64 | No | Scan event / spectrum index |
//! | FRAGMENTATION | Utf8 | No | Fragmentation method |
//! | MASS_ANALYZER | Utf8 | No | Mass analyzer |
//! | CALCULATED_MASS | Float64 | No | Theoretical peptide mass |
//!
//! ### File Footer Metadata
//!
//! - `spectrum_io:format_version`: Format version string
//! - `spectrum_io:table_kind`: `psm` or `crosslink`
//! - `spectrum_io:conversion_timestamp`: RFC 3339 conversion time
//! - `spectrum_io:converter_info`: Converter name and version
//! - `spectrum_io:source`: Engine, label and source files as JSON

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod constants;
pub mod filter;
pub mod modification;
pub mod schema;
pub mod search_result;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::filter::{
        filter_valid_crosslinks, filter_valid_prosit_sequences, filter_with_report, FilterReport,
    };
    pub use crate::modification::{
        normalize, CustomMods, LabelChemistry, ModificationPatterns, PatternCompiler,
        PtmPermutation,
    };
    pub use crate::schema::{columns, create_crosslink_schema, create_psm_schema, FORMAT_VERSION};
    pub use crate::search_result::{
        convert, generate_internal, ConversionError, CrosslinkPsm, MaxQuant, MsAmanda, MsFragger,
        Psm, ReadOptions, Sage, SearchEngine, SearchEngineKind, XlinkX,
    };
    pub use crate::table::{
        read_file, read_partition, write_file, write_partition, CompressionType, TableError,
        WriterConfig,
    };
}
