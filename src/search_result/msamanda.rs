use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{unimod, PROTON_MASS, UNKNOWN_PROTEIN};
use crate::modification::{peptide_length, CustomMods, PatternCompiler};

use super::decoy::DecoyRule;
use super::delimited::DelimitedFile;
use super::{finish_psms, ConversionError, Psm, ReadOptions, SearchEngine};

const TARGET: &str = "spectrum_io::search_result::msamanda";

/// MSAmanda writes its version on the first line, before the header
const VERSION_LINES: usize = 1;

/// Adapter for MSAmanda `output.csv` files
///
/// Despite the extension the file is tab-separated. Modified residues are
/// written in lowercase (`PEPTmIDE`).
#[derive(Debug, Clone)]
pub struct MsAmanda {
    path: PathBuf,
}

impl MsAmanda {
    /// Adapter reading `path` (a file or a directory of MSAmanda outputs)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Oxidised methionine and carbamidomethylated cysteine
    pub fn standard_mods() -> CustomMods {
        [("m", unimod::OXIDATION), ("c", unimod::CARBAMIDOMETHYL)]
            .into_iter()
            .collect()
    }
}

/// File name without its last extension
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext))
            if !ext.is_empty() && ext.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            stem
        }
        _ => filename,
    }
}

impl SearchEngine for MsAmanda {
    type Row = Psm;

    fn name(&self) -> &'static str {
        "MSAmanda"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn default_suffix(&self) -> &'static str {
        "output.csv"
    }

    fn read_result(&self, options: &ReadOptions) -> Result<Vec<Psm>, ConversionError> {
        self.check_label(options)?;
        let mods = CustomMods::merged(&Self::standard_mods(), options.custom_mods.as_ref());
        let patterns = PatternCompiler::new().lowercase_residues(true).compile(&mods)?;

        let decoy = DecoyRule::AccessionPrefix("REV_");
        let mut rows = Vec::new();

        for file in self.input_files(options)? {
            info!(target: TARGET, "Reading {}", file.display());
            let table = DelimitedFile::open(&file, VERSION_LINES)?;

            let scan_number = table.require("Scan Number")?;
            let sequence = table.require("Sequence")?;
            let accessions = table.require("Protein Accessions")?;
            let score = table.require("Amanda Score")?;
            let mz = table.require("m/z")?;
            let charge = table.require("Charge")?;
            let filename = table.require("Filename")?;
            let retention_time = table.optional("RT");

            table.for_each_record(|record| {
                let native = record.str(sequence);
                let proteins = record.opt_str(Some(accessions)).unwrap_or(UNKNOWN_PROTEIN);
                let precursor_charge: i32 = record.parse(charge)?;
                let precursor_mz: f64 = record.parse(mz)?;

                let mut psm = Psm::new(
                    strip_extension(record.str(filename)),
                    record.parse_integer(scan_number)?,
                    precursor_charge,
                    f64::from(precursor_charge) * (precursor_mz - PROTON_MASS),
                    record.parse(score)?,
                    decoy.is_decoy(proteins),
                    proteins,
                )
                .with_modified_sequence(patterns.canonicalize(native));
                psm.sequence = native.to_uppercase();
                psm.peptide_length = peptide_length(&psm.sequence);
                psm.retention_time = record.parse_opt(retention_time)?;

                rows.push(psm);
                Ok(())
            })?;
            info!(target: TARGET, "Finished reading {}", file.display());
        }

        Ok(finish_psms(rows, options))
    }
}
