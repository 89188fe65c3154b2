use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{unimod, UNKNOWN_PROTEIN};
use crate::modification::{CustomMods, LabelChemistry, LabelForms, PatternCompiler};

use super::decoy::DecoyRule;
use super::delimited::{parse_integer, DelimitedFile};
use super::{compile_patterns, finish_psms, ConversionError, Psm, ReadOptions, SearchEngine};

const TARGET: &str = "spectrum_io::search_result::sage";

const MZML_EXTENSION: &str = ".mzml";

/// Sage writes mass shifts as signed decimal brackets; a labelled n-terminus
/// is followed by a dash. Only the label's own mass shift is matched.
fn label_forms(label: LabelChemistry) -> LabelForms {
    match label {
        LabelChemistry::Tmt => LabelForms {
            n_term: r"\[\+229\.16\d*\]-?",
            lysine: r"K\[\+229\.16\d*\]",
        },
        LabelChemistry::TmtPro => LabelForms {
            n_term: r"\[\+304\.207\d*\]-?",
            lysine: r"K\[\+304\.207\d*\]",
        },
        LabelChemistry::Itraq4 => LabelForms {
            n_term: r"\[\+144\.102\d*\]-?",
            lysine: r"K\[\+144\.102\d*\]",
        },
        LabelChemistry::Itraq8 => LabelForms {
            n_term: r"\[\+304\.205\d*\]-?",
            lysine: r"K\[\+304\.205\d*\]",
        },
        LabelChemistry::Silac => LabelForms {
            n_term: "",
            lysine: "K",
        },
    }
}

const SUPPORTED_LABELS: [LabelChemistry; 4] = [
    LabelChemistry::Tmt,
    LabelChemistry::TmtPro,
    LabelChemistry::Itraq4,
    LabelChemistry::Itraq8,
];

/// Adapter for Sage `results.sage.tsv` files
#[derive(Debug, Clone)]
pub struct Sage {
    path: PathBuf,
}

impl Sage {
    /// Adapter reading `path` (a file or a directory of Sage results)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Carbamidomethylation and oxidation as Sage writes them
    ///
    /// Only used when the caller passes no custom modifications at all. Unlike
    /// the other adapters, custom modifications replace these instead of being
    /// merged with them, so an empty [`CustomMods`] disables them.
    pub fn standard_mods() -> CustomMods {
        [
            ("C[+57.0215]", unimod::CARBAMIDOMETHYL),
            ("M[+15.9949]", unimod::OXIDATION),
            ("M[+15.994]", unimod::OXIDATION),
        ]
        .into_iter()
        .collect()
    }
}

/// Spectrum file name without its `.mzML` extension
fn strip_mzml(filename: &str) -> &str {
    let cut = filename.len().saturating_sub(MZML_EXTENSION.len());
    match filename.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(MZML_EXTENSION) => &filename[..cut],
        _ => filename,
    }
}

/// Scan number from a native id such as `controllerType=0 controllerNumber=1 scan=42`
fn scan_from_native_id(scannr: &str) -> Option<i64> {
    let value = scannr.rsplit_once('=').map_or(scannr, |(_, scan)| scan);
    parse_integer(value.trim())
}

impl SearchEngine for Sage {
    type Row = Psm;

    fn name(&self) -> &'static str {
        "Sage"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn default_suffix(&self) -> &'static str {
        "results.sage.tsv"
    }

    fn supported_labels(&self) -> &'static [LabelChemistry] {
        &SUPPORTED_LABELS
    }

    fn read_result(&self, options: &ReadOptions) -> Result<Vec<Psm>, ConversionError> {
        self.check_label(options)?;
        let mods = match &options.custom_mods {
            Some(custom) => custom.clone(),
            None => Self::standard_mods(),
        };
        let compiler = PatternCompiler::new().c_terminal(true);
        let patterns = compile_patterns(compiler, &mods, options.label, label_forms)?;

        let decoy = DecoyRule::NegativeLabel;
        let mut rows = Vec::new();

        for file in self.input_files(options)? {
            info!(target: TARGET, "Reading {}", file.display());
            let table = DelimitedFile::open(&file, 0)?;

            let filename = table.require("filename")?;
            let scannr = table.require("scannr")?;
            let peptide = table.require("peptide")?;
            let charge = table.require("charge")?;
            let hyperscore = table.require("hyperscore")?;
            let calcmass = table.require("calcmass")?;
            let label = table.require("label")?;
            let proteins = table.require("proteins")?;
            let rt = table.optional("rt");

            table.for_each_record(|record| {
                let native_id = record.str(scannr);
                let scan_number =
                    scan_from_native_id(native_id).ok_or_else(|| record.invalid(scannr.name, native_id))?;
                let label_value = record.str(label);
                if label_value.parse::<f64>().is_err() {
                    return Err(record.invalid(label.name, label_value));
                }

                let mass: f64 = record.parse(calcmass)?;
                let mut psm = Psm::new(
                    strip_mzml(record.str(filename)),
                    scan_number,
                    record.parse(charge)?,
                    mass,
                    record.parse(hyperscore)?,
                    decoy.is_decoy(label_value),
                    record.opt_str(Some(proteins)).unwrap_or(UNKNOWN_PROTEIN),
                )
                .with_modified_sequence(patterns.canonicalize(record.str(peptide)));
                psm.retention_time = record.parse_opt(rt)?;
                psm.calculated_mass = Some(mass);

                rows.push(psm);
                Ok(())
            })?;
            info!(target: TARGET, "Finished reading {}", file.display());
        }

        Ok(finish_psms(rows, options))
    }
}
