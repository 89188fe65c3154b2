//! # Validity Filters
//!
//! Downstream prediction models only support a bounded peptide envelope.
//! [`filter_valid_prosit_sequences`] keeps a [`Psm`] iff
//!
//! - its peptide length is within `[7, 30]`,
//! - its modified sequence matches
//!   `^(?:\[UNIMOD:\d+\]-)?(?:[ACDEFGHIKLMNPQRSTVWY]+(?:\[UNIMOD:\d+\])?)*$`,
//! - its bare sequence contains neither `U` nor `O`,
//! - its precursor charge is at most 6.
//!
//! [`filter_valid_crosslinks`] applies the crosslink variant to both peptides
//! of a [`CrosslinkPsm`]. Both filters are stateless and idempotent.

use std::fmt;
use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;

use crate::constants::{
    CANONICAL_AMINO_ACIDS, MAX_PEPTIDE_LENGTH, MAX_PRECURSOR_CHARGE, MIN_CROSSLINK_PEPTIDE_LENGTH, MIN_PEPTIDE_LENGTH,
};
use crate::search_result::{CrosslinkPsm, Psm};


static SUPPORTED_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:\[UNIMOD:\d+\]-)?(?:[{CANONICAL_AMINO_ACIDS}]+(?:\[UNIMOD:\d+\])?)*$"
    ))
    .expect("supported sequence pattern is valid")
});

/// Why a row was rejected; the first failing check wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Peptide length outside the supported range
    Length,
    /// Modified sequence does not match the supported grammar
    Grammar,
    /// Bare sequence contains selenocysteine or pyrrolysine
    NonCanonicalResidue,
    /// Precursor charge too high
    Charge,
}

/// Row counts of one filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Rows before filtering
    pub rows_before: usize,
    /// Rows kept
    pub rows_after: usize,
    /// Rejected for length
    pub rejected_length: usize,
    /// Rejected for unsupported modification markup
    pub rejected_grammar: usize,
    /// Rejected for `U`/`O` residues
    pub rejected_residue: usize,
    /// Rejected for precursor charge
    pub rejected_charge: usize,
}

impl FilterReport {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::Length => self.rejected_length += 1,
            Rejection::Grammar => self.rejected_grammar += 1,
            Rejection::NonCanonicalResidue => self.rejected_residue += 1,
            Rejection::Charge => self.rejected_charge += 1,
        }
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kept {} of {} rows (length: {}, modifications: {}, residues: {}, charge: {})",
            self.rows_after,
            self.rows_before,
            self.rejected_length,
            self.rejected_grammar,
            self.rejected_residue,
            self.rejected_charge
        )
    }
}

/// True if `modified_sequence` only uses supported residues and tags
pub fn is_supported_sequence(modified_sequence: &str) -> bool {
    SUPPORTED_SEQUENCE.is_match(modified_sequence)
}

fn contains_non_canonical(sequence: &str, residues: &[char]) -> bool {
    sequence.contains(residues)
}

/// Check a single PSM against the validity envelope
pub fn check_psm(psm: &Psm) -> Result<(), Rejection> {
    if !(MIN_PEPTIDE_LENGTH..=MAX_PEPTIDE_LENGTH).contains(&psm.peptide_length) {
        return Err(Rejection::Length);
    }
    if !is_supported_sequence(&psm.modified_sequence) {
        return Err(Rejection::Grammar);
    }
    if contains_non_canonical(&psm.sequence, &['U', 'O']) {
        return Err(Rejection::NonCanonicalResidue);
    }
    if psm.precursor_charge > MAX_PRECURSOR_CHARGE {
        return Err(Rejection::Charge);
    }
    Ok(())
}

/// Keep only PSMs inside the validity envelope, with a report of what was dropped
pub fn filter_with_report(rows: Vec<Psm>) -> (Vec<Psm>, FilterReport) {
    let mut report = FilterReport {
        rows_before: rows.len(),
        ..Default::default()
    };
    let kept: Vec<Psm> = rows
        .into_iter()
        .filter(|psm| match check_psm(psm) {
            Ok(()) => true,
            Err(rejection) => {
                report.record(rejection);
                false
            }
        })
        .collect();
    report.rows_after = kept.len();
    (kept, report)
}

/// Keep only PSMs inside the validity envelope
pub fn filter_valid_prosit_sequences(rows: Vec<Psm>) -> Vec<Psm> {
    info!(
        target: "spectrum_io::filter",
        "#sequences before filtering for valid prosit sequences: {}",
        rows.len()
    );
    let (kept, report) = filter_with_report(rows);
    if report.rejected_grammar > 0 {
        warn!(
            target: "spectrum_io::filter",
            "{} rows carry modifications that could not be translated to UNIMOD",
            report.rejected_grammar
        );
    }
    info!(
        target: "spectrum_io::filter",
        "#sequences after filtering for valid prosit sequences: {}",
        report.rows_after
    );
    kept
}

fn crosslink_side_is_valid(sequence: &str, length: usize) -> bool {
    (MIN_CROSSLINK_PEPTIDE_LENGTH..=MAX_PEPTIDE_LENGTH).contains(&length)
        && !contains_non_canonical(sequence, &['U'])
}

/// Check both peptides of a crosslinked match
pub fn is_valid_crosslink(row: &CrosslinkPsm) -> bool {
    crosslink_side_is_valid(&row.sequence_a, row.peptide_length_a)
        && crosslink_side_is_valid(&row.sequence_b, row.peptide_length_b)
        && row.precursor_charge <= MAX_PRECURSOR_CHARGE
}

/// Keep only crosslinked matches where both peptides are supported
pub fn filter_valid_crosslinks(rows: Vec<CrosslinkPsm>) -> Vec<CrosslinkPsm> {
    info!(
        target: "spectrum_io::filter",
        "#sequences before filtering for valid prosit sequences: {}",
        rows.len()
    );
    let kept: Vec<CrosslinkPsm> = rows.into_iter().filter(is_valid_crosslink).collect();
    info!(
        target: "spectrum_io::filter",
        "#sequences after filtering for valid prosit sequences: {}",
        kept.len()
    );
    kept
}
