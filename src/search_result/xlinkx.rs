use std::path::{Path, PathBuf};

use log::info;

use crate::constants::{unimod, UNKNOWN_PROTEIN};
use crate::filter::filter_valid_crosslinks;
use crate::modification::{peptide_length, residue_tag};

use super::decoy::DecoyRule;
use super::delimited::{Column, DelimitedFile, Record};
use super::{ConversionError, CrosslinkPsm, ReadOptions, SearchEngine};

const TARGET: &str = "spectrum_io::search_result::xlinkx";

const RAW_EXTENSION: &str = ".raw";

/// Annotation values meaning "no modification"
const EMPTY_ANNOTATIONS: [&str; 2] = ["nan", "null"];

/// Adapter for XlinkX crosslink spectrum match tables
#[derive(Debug, Clone)]
pub struct XlinkX {
    path: PathBuf,
}

impl XlinkX {
    /// Adapter reading `path` (a file or a directory of CSM exports)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Why a modification annotation could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AnnotationError {
    /// Modification name without a UNIMOD mapping
    Unknown(String),
    /// Annotation whose position is missing, outside the peptide, or on a
    /// residue the modification does not target
    Position(String),
}

/// Target residue and UNIMOD id of a modification name, and whether it sits
/// on the crosslinked residue
fn resolve_name(name: &str) -> Option<(char, u32, bool)> {
    match name {
        "Oxidation" => Some(('M', unimod::OXIDATION, false)),
        "Carbamidomethyl" => Some(('C', unimod::CARBAMIDOMETHYL, false)),
        "DSSO" => Some(('K', unimod::DSSO, true)),
        "DSBU" => Some(('K', unimod::DSBU, true)),
        _ => None,
    }
}

/// Apply `;`-separated `<residue><pos>(<Name>)` annotations to a bare peptide
///
/// Crosslinker annotations are placed at `crosslinker_position`, all others
/// at their own 1-based position. The residue found there must be the one the
/// modification targets.
pub(crate) fn apply_annotations(
    sequence: &str,
    annotations: &str,
    crosslinker_position: usize,
) -> Result<String, AnnotationError> {
    let bare: Vec<char> = sequence.chars().collect();
    let mut residues: Vec<String> = bare.iter().map(|c| c.to_string()).collect();
    let annotations = annotations.trim();
    if annotations.is_empty() || EMPTY_ANNOTATIONS.contains(&annotations) {
        return Ok(residues.concat());
    }

    for annotation in annotations.split(';').map(str::trim).filter(|a| !a.is_empty()) {
        let name = annotation
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(name, _)| name.trim())
            .ok_or_else(|| AnnotationError::Unknown(annotation.to_string()))?;
        let (residue, unimod_id, on_crosslink) =
            resolve_name(name).ok_or_else(|| AnnotationError::Unknown(name.to_string()))?;

        let position = if on_crosslink {
            crosslinker_position
        } else {
            annotation
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .map_err(|_| AnnotationError::Position(annotation.to_string()))?
        };
        let index = position
            .checked_sub(1)
            .filter(|&index| bare.get(index) == Some(&residue))
            .ok_or_else(|| AnnotationError::Position(annotation.to_string()))?;
        residues[index] = residue_tag(residue, unimod_id);
    }

    Ok(residues.concat())
}

/// Spectrum file name without its `.raw` extension
fn strip_raw(filename: &str) -> &str {
    let cut = filename.len().saturating_sub(RAW_EXTENSION.len());
    match filename.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(RAW_EXTENSION) => &filename[..cut],
        _ => filename,
    }
}

struct PeptideColumns {
    sequence: Column,
    modifications: Column,
    crosslinker_position: Column,
}

struct Peptide {
    sequence: String,
    modified_sequence: String,
    length: usize,
    crosslinker_position: usize,
}

impl PeptideColumns {
    fn require(table: &DelimitedFile, side: char) -> Result<Self, ConversionError> {
        let (sequence, modifications, crosslinker_position) = match side {
            'A' => ("Sequence A", "Modifications A", "Crosslinker Position A"),
            _ => ("Sequence B", "Modifications B", "Crosslinker Position B"),
        };
        Ok(Self {
            sequence: table.require(sequence)?,
            modifications: table.require(modifications)?,
            crosslinker_position: table.require(crosslinker_position)?,
        })
    }

    fn read(&self, record: &Record<'_>) -> Result<Peptide, ConversionError> {
        let sequence = record.str(self.sequence).to_string();
        let position_value = record.str(self.crosslinker_position);
        let crosslinker_position = record
            .parse_integer(self.crosslinker_position)
            .ok()
            .and_then(|p| usize::try_from(p).ok())
            .ok_or_else(|| record.invalid(self.crosslinker_position.name, position_value))?;

        let annotations = record.str(self.modifications);
        let modified_sequence = apply_annotations(&sequence, annotations, crosslinker_position)
            .map_err(|err| match err {
                AnnotationError::Unknown(modification) => ConversionError::UnknownModification {
                    modification,
                    sequence: sequence.clone(),
                },
                AnnotationError::Position(annotation) => {
                    record.invalid(self.modifications.name, &annotation)
                }
            })?;

        Ok(Peptide {
            length: peptide_length(&sequence),
            sequence,
            modified_sequence,
            crosslinker_position,
        })
    }
}

impl SearchEngine for XlinkX {
    type Row = CrosslinkPsm;

    fn name(&self) -> &'static str {
        "XlinkX"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn default_suffix(&self) -> &'static str {
        "CSMs.txt"
    }

    fn read_result(&self, options: &ReadOptions) -> Result<Vec<CrosslinkPsm>, ConversionError> {
        self.check_label(options)?;
        if options.custom_mods.as_ref().is_some_and(|mods| !mods.is_empty()) {
            return Err(ConversionError::UnsupportedFeature(
                "custom modifications are not supported for XlinkX".to_string(),
            ));
        }
        if options.permutation.is_some() {
            return Err(ConversionError::UnsupportedFeature(
                "PTM site permutation is not supported for XlinkX".to_string(),
            ));
        }

        let decoy = DecoyRule::BooleanFlag;
        let mut rows = Vec::new();

        for file in self.input_files(options)? {
            info!(target: TARGET, "Reading {}", file.display());
            let table = DelimitedFile::open(&file, 0)?;

            let peptide_a = PeptideColumns::require(&table, 'A')?;
            let peptide_b = PeptideColumns::require(&table, 'B')?;
            let crosslinker = table.require("Crosslinker")?;
            let score = table.require("XlinkX Score")?;
            let charge = table.require("Charge")?;
            let mass = table.require("MH+ [Da]")?;
            let first_scan = table.require("First Scan")?;
            let spectrum_file = table.require("Spectrum File")?;
            let is_decoy = table.require("Is Decoy")?;
            let accessions = table.optional("Accessions");
            let accession_a = table.optional("Protein Accession A");
            let accession_b = table.optional("Protein Accession B");
            if accessions.is_none() && accession_a.is_none() {
                return Err(ConversionError::MissingColumn {
                    file: file.clone(),
                    column: "Protein Accession A".to_string(),
                });
            }
            let retention_time = table.optional("RT [min]");

            table.for_each_record(|record| {
                let a = peptide_a.read(record)?;
                let b = peptide_b.read(record)?;
                let proteins = match record.opt_str(accessions) {
                    Some(all) => all.to_string(),
                    None => [record.opt_str(accession_a), record.opt_str(accession_b)]
                        .into_iter()
                        .flatten()
                        .collect::<Vec<_>>()
                        .join(";"),
                };

                rows.push(CrosslinkPsm {
                    raw_file: strip_raw(record.str(spectrum_file)).to_string(),
                    scan_number: record.parse_integer(first_scan)?,
                    precursor_charge: record.parse(charge)?,
                    mass: record.parse(mass)?,
                    score: record.parse(score)?,
                    reverse: decoy.is_decoy(record.str(is_decoy)),
                    crosslinker_type: record.str(crosslinker).to_string(),
                    proteins: if proteins.is_empty() {
                        UNKNOWN_PROTEIN.to_string()
                    } else {
                        proteins
                    },
                    retention_time: record.parse_opt(retention_time)?,
                    sequence_a: a.sequence,
                    modified_sequence_a: a.modified_sequence,
                    peptide_length_a: a.length,
                    crosslinker_position_a: a.crosslinker_position,
                    sequence_b: b.sequence,
                    modified_sequence_b: b.modified_sequence,
                    peptide_length_b: b.length,
                    crosslinker_position_b: b.crosslinker_position,
                });
                Ok(())
            })?;
            info!(target: TARGET, "Finished reading {}", file.display());
        }

        Ok(filter_valid_crosslinks(rows))
    }
}
