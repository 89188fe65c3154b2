use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{unimod, UNKNOWN_PROTEIN};
use crate::modification::{CustomMods, LabelChemistry, LabelForms, PatternCompiler};

use super::decoy::DecoyRule;
use super::delimited::DelimitedFile;
use super::{compile_patterns, finish_psms, ConversionError, Psm, ReadOptions, SearchEngine};

const TARGET: &str = "spectrum_io::search_result::maxquant";

const DEFAULT_FRAGMENTATION: &str = "HCD";
const DEFAULT_MASS_ANALYZER: &str = "FTMS";
const HEAVY_LABELING_STATE: i64 = 1;

const LABEL_FORMS: LabelForms = LabelForms {
    n_term: "",
    lysine: "K",
};

const SUPPORTED_LABELS: [LabelChemistry; 5] = [
    LabelChemistry::Tmt,
    LabelChemistry::TmtPro,
    LabelChemistry::Itraq4,
    LabelChemistry::Itraq8,
    LabelChemistry::Silac,
];

/// Adapter for MaxQuant `msms.txt` files
#[derive(Debug, Clone)]
pub struct MaxQuant {
    path: PathBuf,
}

impl MaxQuant {
    /// Adapter reading `path` (a file or a directory of `msms.txt` files)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Modifications MaxQuant reports with its short and long annotations
    pub fn standard_mods() -> CustomMods {
        [
            ("C", unimod::CARBAMIDOMETHYL),
            ("M(ox)", unimod::OXIDATION),
            ("M(Oxidation (M))", unimod::OXIDATION),
            ("S(ph)", unimod::PHOSPHO),
            ("T(ph)", unimod::PHOSPHO),
            ("Y(ph)", unimod::PHOSPHO),
            ("S(Phospho (STY))", unimod::PHOSPHO),
            ("T(Phospho (STY))", unimod::PHOSPHO),
            ("Y(Phospho (STY))", unimod::PHOSPHO),
            ("^(ac)", unimod::ACETYL),
            ("^(Acetyl (Protein N-term))", unimod::ACETYL),
            ("N(de)", unimod::DEAMIDATED),
            ("Q(de)", unimod::DEAMIDATED),
            ("N(Deamidation (NQ))", unimod::DEAMIDATED),
            ("Q(Deamidation (NQ))", unimod::DEAMIDATED),
            ("K(gl)", unimod::GLY_GLY),
            ("K(GlyGly (K))", unimod::GLY_GLY),
        ]
        .into_iter()
        .collect()
    }
}

impl SearchEngine for MaxQuant {
    type Row = Psm;

    fn name(&self) -> &'static str {
        "MaxQuant"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn default_suffix(&self) -> &'static str {
        "msms.txt"
    }

    fn supported_labels(&self) -> &'static [LabelChemistry] {
        &SUPPORTED_LABELS
    }

    fn read_result(&self, options: &ReadOptions) -> Result<Vec<Psm>, ConversionError> {
        self.check_label(options)?;
        let mods = CustomMods::merged(&Self::standard_mods(), options.custom_mods.as_ref());
        let patterns = compile_patterns(PatternCompiler::new(), &mods, options.label, |_| LABEL_FORMS)?;

        let silac = options.label == Some(LabelChemistry::Silac);
        let heavy_patterns = if silac {
            let mut heavy = patterns.clone();
            heavy.inject_silac_heavy()?;
            Some(heavy)
        } else {
            None
        };

        let decoy = DecoyRule::Marker("+");
        let mut rows = Vec::new();

        for file in self.input_files(options)? {
            info!(target: TARGET, "Reading {}", file.display());
            let table = DelimitedFile::open(&file, 0)?.case_insensitive();

            let raw_file = table.require("Raw file")?;
            let scan_number = table.require("Scan number")?;
            let modified_sequence = table.require("Modified sequence")?;
            let charge = table.require("Charge")?;
            let mass = table.require("Mass")?;
            let score = table.require("Score")?;
            let reverse = table.require("Reverse")?;
            let retention_time = table.optional("Retention time");
            let fragmentation = table.optional("Fragmentation");
            let mass_analyzer = table.optional("Mass analyzer");
            let proteins = table.optional("Proteins");
            let scan_event_number = table.optional("Scan event number");
            let labeling_state = if silac {
                Some(table.require("Labeling state")?)
            } else {
                None
            };

            table.for_each_record(|record| {
                let sequence = record.str(modified_sequence).replace('_', "");
                let is_heavy = match labeling_state {
                    Some(column) => record.parse_integer(column)? == HEAVY_LABELING_STATE,
                    None => false,
                };
                let canonical = match (&heavy_patterns, is_heavy) {
                    (Some(heavy), true) => heavy.canonicalize(&sequence),
                    _ => patterns.canonicalize(&sequence),
                };

                let mass_value: f64 = record.parse(mass)?;
                let mut psm = Psm::new(
                    record.str(raw_file),
                    record.parse_integer(scan_number)?,
                    record.parse(charge)?,
                    mass_value,
                    record.parse(score)?,
                    decoy.is_decoy(record.str(reverse)),
                    record.opt_str(proteins).unwrap_or(UNKNOWN_PROTEIN),
                )
                .with_modified_sequence(canonical);

                psm.retention_time = match record.parse_opt::<f64>(retention_time)? {
                    Some(rt) => Some(rt),
                    None => Some(rows.len() as f64),
                };
                psm.fragmentation = Some(
                    record
                        .opt_str(fragmentation)
                        .unwrap_or(DEFAULT_FRAGMENTATION)
                        .to_string(),
                );
                psm.mass_analyzer = Some(
                    record
                        .opt_str(mass_analyzer)
                        .unwrap_or(DEFAULT_MASS_ANALYZER)
                        .to_string(),
                );
                psm.scan_event_number = record.parse_opt(scan_event_number)?;
                psm.calculated_mass = Some(mass_value);

                rows.push(psm);
                Ok(())
            })?;
            info!(target: TARGET, "Finished reading {}", file.display());
        }

        Ok(finish_psms(rows, options))
    }
}
