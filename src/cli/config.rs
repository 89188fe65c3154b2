//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, conversions can be described in a file:
//!
//! ```toml
//! # spectrum-io.toml
//! [conversion]
//! engine = "sage"
//! label = "tmt"
//! suffix = "results.sage.tsv"
//! profile = "balanced"
//!
//! [modifications]
//! "M[+15.9949]" = 35
//!
//! [permutation]
//! unimod_id = 7
//! sites = ["N", "Q"]
//! allow_one_less = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use spectrum_io::modification::{CustomMods, PtmPermutation};

/// Root configuration structure for spectrum-io.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Engine modification patterns mapped to UNIMOD ids.
    pub modifications: Option<toml::Table>,

    /// Expansion of an ambiguous modification over its sites.
    pub permutation: Option<PtmPermutation>,
}

/// Configuration for the convert command.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionConfig {
    /// Search engine name.
    pub engine: Option<String>,

    /// Label chemistry name.
    pub label: Option<String>,

    /// Result file suffix for directory inputs.
    pub suffix: Option<String>,

    /// Writer profile name.
    pub profile: Option<String>,

    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Number of rows per Parquet row group.
    pub row_group_size: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Modification patterns of the `[modifications]` table, if present.
    pub fn custom_mods(&self) -> Result<Option<CustomMods>> {
        self.modifications
            .as_ref()
            .map(|table| CustomMods::from_toml(table).context("Invalid [modifications] table"))
            .transpose()
    }
}
