//! # Search Engine Result Conversion
//!
//! One adapter per search engine reads the engine's native export and
//! produces rows of the internal format:
//!
//! | Engine | Adapter | Input | Row type |
//! |--------|---------|-------|----------|
//! | MaxQuant | [`MaxQuant`] | `msms.txt` | [`Psm`] |
//! | MSFragger | [`MsFragger`] | `*.pepXML` | [`Psm`] |
//! | Sage | [`Sage`] | `results.sage.tsv` | [`Psm`] |
//! | MSAmanda | [`MsAmanda`] | `output.csv` | [`Psm`] |
//! | XlinkX | [`XlinkX`] | CSM table | [`CrosslinkPsm`] |
//!
//! Every adapter resolves its input path (a file, or every matching file in
//! a directory), rewrites modification annotations into canonical
//! `[UNIMOD:n]` notation, derives bare sequence and peptide length,
//! optionally expands ambiguous PTM sites and finally applies the validity
//! filter from [`crate::filter`].
//!
//! ```rust,no_run
//! use spectrum_io::modification::LabelChemistry;
//! use spectrum_io::search_result::{generate_internal, ReadOptions, Sage};
//!
//! let sage = Sage::new("results.sage.tsv");
//! let options = ReadOptions::new().with_label(LabelChemistry::Tmt);
//! let rows = generate_internal(&sage, &options, Some("internal.parquet".as_ref()))?;
//! println!("{} PSMs", rows.len());
//! # Ok::<(), spectrum_io::search_result::ConversionError>(())
//! ```

mod decoy;
mod delimited;
mod error;
mod maxquant;
mod msamanda;
mod msfragger;
mod sage;
mod types;
mod xlinkx;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::filter::filter_valid_prosit_sequences;
use crate::modification::{
    CustomMods, LabelChemistry, LabelForms, ModificationPatterns, PatternCompiler, PtmPermutation,
};
use crate::schema::{KEY_CONVERSION_TIMESTAMP, KEY_CONVERTER_INFO, KEY_SOURCE};
use crate::table::{read_table, write_table_with, TableRow, WriterConfig};

pub use decoy::DecoyRule;
pub use error::ConversionError;
pub use maxquant::MaxQuant;
pub use msamanda::MsAmanda;
pub use msfragger::MsFragger;
pub use sage::Sage;
pub use types::{CrosslinkPsm, Psm};
pub use xlinkx::XlinkX;

/// Caller options shared by every adapter
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Label chemistry applied to every PSM
    pub label: Option<LabelChemistry>,
    /// Extra modification patterns; `None` uses only the engine defaults
    pub custom_mods: Option<CustomMods>,
    /// Expansion of a localization-ambiguous modification
    pub permutation: Option<PtmPermutation>,
    /// File suffix used for directory inputs instead of the engine default
    pub suffix: Option<String>,
}

impl ReadOptions {
    /// Options with engine defaults only
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label chemistry
    pub fn with_label(mut self, label: LabelChemistry) -> Self {
        self.label = Some(label);
        self
    }

    /// Set custom modification patterns
    pub fn with_custom_mods(mut self, mods: CustomMods) -> Self {
        self.custom_mods = Some(mods);
        self
    }

    /// Set the PTM permutation policy
    pub fn with_permutation(mut self, permutation: PtmPermutation) -> Self {
        self.permutation = Some(permutation);
        self
    }

    /// Override the directory input suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// Common interface of all search engine adapters
pub trait SearchEngine {
    /// Row type produced by the adapter
    type Row: TableRow;

    /// Engine name used in logs and provenance
    fn name(&self) -> &'static str;

    /// Input file or directory
    fn path(&self) -> &Path;

    /// Suffix of result files inside a directory input
    fn default_suffix(&self) -> &'static str;

    /// Whether directory inputs are searched recursively
    fn recursive(&self) -> bool {
        false
    }

    /// Label chemistries this engine can apply
    fn supported_labels(&self) -> &'static [LabelChemistry] {
        &[]
    }

    /// Fail early if the requested label is not supported
    fn check_label(&self, options: &ReadOptions) -> Result<(), ConversionError> {
        match options.label {
            Some(label) if !self.supported_labels().contains(&label) => {
                Err(ConversionError::UnsupportedFeature(format!(
                    "{} labelling is not supported for {}",
                    label,
                    self.name()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Result files the adapter will read
    fn input_files(&self, options: &ReadOptions) -> Result<Vec<PathBuf>, ConversionError> {
        let suffix = options.suffix.as_deref().unwrap_or(self.default_suffix());
        resolve_input(self.path(), suffix, self.recursive())
    }

    /// Read, convert and filter the engine output
    fn read_result(&self, options: &ReadOptions) -> Result<Vec<Self::Row>, ConversionError>;
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name.len() >= suffix.len()
                && name.is_char_boundary(name.len() - suffix.len())
                && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
        })
}

fn collect_matching(
    directory: &Path,
    suffix: &str,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), ConversionError> {
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_matching(&path, suffix, recursive, files)?;
            }
        } else if has_suffix(&path, suffix) {
            files.push(path);
        }
    }
    Ok(())
}

/// Resolve a file or directory input into the list of files to read
///
/// A file is returned as is. A directory yields every file whose name ends
/// with `suffix` (ignoring case), sorted by path.
pub fn resolve_input(
    path: &Path,
    suffix: &str,
    recursive: bool,
) -> Result<Vec<PathBuf>, ConversionError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(ConversionError::NotFound(path.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_matching(path, suffix, recursive, &mut files)?;
    if files.is_empty() {
        return Err(ConversionError::NoMatchingFiles {
            directory: path.to_path_buf(),
            pattern: suffix.to_string(),
        });
    }
    files.sort();
    Ok(files)
}

/// Compile engine standard mods, caller mods and the label into one table
pub(crate) fn compile_patterns(
    compiler: PatternCompiler,
    mods: &CustomMods,
    label: Option<LabelChemistry>,
    label_forms: fn(LabelChemistry) -> LabelForms,
) -> Result<ModificationPatterns, ConversionError> {
    let mut patterns = compiler.compile(mods)?;
    if let Some(label) = label {
        if let Some(unimod_id) = label.unimod_id() {
            patterns.inject_label(unimod_id, &label_forms(label))?;
        }
    }
    Ok(patterns)
}

/// Expand every row into one row per placement of the ambiguous modification
pub fn permute_rows(rows: Vec<Psm>, permutation: &PtmPermutation) -> Vec<Psm> {
    rows.into_iter()
        .flat_map(|row| {
            let variants = permutation.permutations(&row.modified_sequence);
            variants.into_iter().map(move |modified_sequence| Psm {
                modified_sequence,
                ..row.clone()
            })
        })
        .collect()
}

/// Shared tail of every PSM adapter: optional permutation, then filtering
pub(crate) fn finish_psms(rows: Vec<Psm>, options: &ReadOptions) -> Vec<Psm> {
    let rows = match &options.permutation {
        Some(permutation) => permute_rows(rows, permutation),
        None => rows,
    };
    filter_valid_prosit_sequences(rows)
}

/// Provenance stored in the footer of converted parquet tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionSource {
    /// Search engine name
    pub engine: String,
    /// Label chemistry, if any
    pub label: Option<String>,
    /// Files the rows were read from
    pub source_files: Vec<String>,
}

fn footer_metadata(
    source: &ConversionSource,
) -> Result<HashMap<String, String>, ConversionError> {
    let mut metadata = HashMap::new();
    metadata.insert(
        KEY_CONVERSION_TIMESTAMP.to_string(),
        chrono::Utc::now().to_rfc3339(),
    );
    metadata.insert(
        KEY_CONVERTER_INFO.to_string(),
        format!("spectrum-io v{}", env!("CARGO_PKG_VERSION")),
    );
    let source_json = serde_json::to_string(source).map_err(crate::table::TableError::from)?;
    metadata.insert(KEY_SOURCE.to_string(), source_json);
    Ok(metadata)
}

/// Convert engine output and optionally persist it
///
/// Without `out_path` the converted rows are returned. If `out_path` already
/// holds a readable internal table, that table is returned and nothing is
/// converted. Otherwise the rows are converted and written (parquet or CSV
/// by extension). A failed conversion leaves no output file behind.
pub fn generate_internal<E: SearchEngine>(
    engine: &E,
    options: &ReadOptions,
    out_path: Option<&Path>,
) -> Result<Vec<E::Row>, ConversionError> {
    generate_internal_with(engine, options, out_path, &WriterConfig::default())
}

/// [`generate_internal`] with explicit parquet writer settings
pub fn generate_internal_with<E: SearchEngine>(
    engine: &E,
    options: &ReadOptions,
    out_path: Option<&Path>,
    config: &WriterConfig,
) -> Result<Vec<E::Row>, ConversionError> {
    let Some(out_path) = out_path else {
        return engine.read_result(options);
    };

    if out_path.is_file() {
        match read_table::<E::Row, _>(out_path) {
            Ok(rows) => {
                info!(
                    target: "spectrum_io::search_result",
                    "Found search results in internal format at {}, skipping conversion",
                    out_path.display()
                );
                return Ok(rows);
            }
            Err(err) => warn!(
                target: "spectrum_io::search_result",
                "Existing file {} is not a readable internal table ({}), converting again",
                out_path.display(),
                err
            ),
        }
    }

    engine.check_label(options)?;
    let source = ConversionSource {
        engine: engine.name().to_string(),
        label: options.label.map(|l| l.to_string()),
        source_files: engine
            .input_files(options)?
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    };
    let rows = engine.read_result(options)?;
    let metadata = footer_metadata(&source)?;

    if let Err(err) = write_table_with(&rows, out_path, config, &metadata) {
        // Never leave a truncated table behind
        let _ = fs::remove_file(out_path);
        return Err(err.into());
    }
    info!(
        target: "spectrum_io::search_result",
        "Wrote {} rows to {}",
        rows.len(),
        out_path.display()
    );
    Ok(rows)
}

/// Supported search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngineKind {
    /// MaxQuant `msms.txt`
    MaxQuant,
    /// MSFragger pepXML
    MsFragger,
    /// Sage `results.sage.tsv`
    Sage,
    /// MSAmanda `output.csv`
    MsAmanda,
    /// XlinkX crosslink table
    XlinkX,
}

impl SearchEngineKind {
    /// All engines
    pub const ALL: [SearchEngineKind; 5] = [
        SearchEngineKind::MaxQuant,
        SearchEngineKind::MsFragger,
        SearchEngineKind::Sage,
        SearchEngineKind::MsAmanda,
        SearchEngineKind::XlinkX,
    ];

    /// Lower-case engine name
    pub fn name(&self) -> &'static str {
        match self {
            SearchEngineKind::MaxQuant => "maxquant",
            SearchEngineKind::MsFragger => "msfragger",
            SearchEngineKind::Sage => "sage",
            SearchEngineKind::MsAmanda => "msamanda",
            SearchEngineKind::XlinkX => "xlinkx",
        }
    }
}

impl fmt::Display for SearchEngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchEngineKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SearchEngineKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| ConversionError::Configuration {
                key: "engine".to_string(),
                reason: format!(
                    "unknown search engine '{}', expected one of: maxquant, msfragger, sage, msamanda, xlinkx",
                    s
                ),
            })
    }
}

/// Outcome of [`convert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Engine that was converted
    pub engine: SearchEngineKind,
    /// Rows in the internal table
    pub rows: usize,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converted {} rows of {} results", self.rows, self.engine)
    }
}

/// Run [`generate_internal_with`] for an engine chosen at runtime
pub fn convert(
    kind: SearchEngineKind,
    path: &Path,
    options: &ReadOptions,
    out_path: Option<&Path>,
    config: &WriterConfig,
) -> Result<ConversionSummary, ConversionError> {
    let rows = match kind {
        SearchEngineKind::MaxQuant => {
            generate_internal_with(&MaxQuant::new(path), options, out_path, config)?.len()
        }
        SearchEngineKind::MsFragger => {
            generate_internal_with(&MsFragger::new(path), options, out_path, config)?.len()
        }
        SearchEngineKind::Sage => {
            generate_internal_with(&Sage::new(path), options, out_path, config)?.len()
        }
        SearchEngineKind::MsAmanda => {
            generate_internal_with(&MsAmanda::new(path), options, out_path, config)?.len()
        }
        SearchEngineKind::XlinkX => {
            generate_internal_with(&XlinkX::new(path), options, out_path, config)?.len()
        }
    };
    Ok(ConversionSummary { engine: kind, rows })
}
