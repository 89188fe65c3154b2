use serde::{Deserialize, Serialize};

use crate::modification::normalize;

/// One peptide-spectrum match in the internal format
///
/// Field names follow the internal column names (see [`crate::schema::columns`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psm {
    /// Raw file name without extension
    #[serde(rename = "RAW_FILE")]
    pub raw_file: String,
    /// Scan number of the MS2 spectrum
    #[serde(rename = "SCAN_NUMBER")]
    pub scan_number: i64,
    /// Canonical modified sequence
    #[serde(rename = "MODIFIED_SEQUENCE")]
    pub modified_sequence: String,
    /// Bare amino acid sequence
    #[serde(rename = "SEQUENCE")]
    pub sequence: String,
    /// Precursor charge state
    #[serde(rename = "PRECURSOR_CHARGE")]
    pub precursor_charge: i32,
    /// Precursor mass in Da
    #[serde(rename = "MASS")]
    pub mass: f64,
    /// Engine score
    #[serde(rename = "SCORE")]
    pub score: f64,
    /// Decoy flag
    #[serde(rename = "REVERSE")]
    pub reverse: bool,
    /// Length of the bare sequence
    #[serde(rename = "PEPTIDE_LENGTH")]
    pub peptide_length: usize,
    /// Protein accessions separated by `;`
    #[serde(rename = "PROTEINS")]
    pub proteins: String,
    /// Retention time as reported by the engine
    #[serde(rename = "RETENTION_TIME", default)]
    pub retention_time: Option<f64>,
    /// Index of the PSM within the engine output
    #[serde(rename = "SCAN_EVENT_NUMBER", default)]
    pub scan_event_number: Option<i64>,
    /// Fragmentation method (e.g. HCD)
    #[serde(rename = "FRAGMENTATION", default)]
    pub fragmentation: Option<String>,
    /// Mass analyzer (e.g. FTMS)
    #[serde(rename = "MASS_ANALYZER", default)]
    pub mass_analyzer: Option<String>,
    /// Theoretical precursor mass in Da
    #[serde(rename = "CALCULATED_MASS", default)]
    pub calculated_mass: Option<f64>,
}

impl Psm {
    /// Create a PSM; sequence fields start empty until
    /// [`Psm::set_modified_sequence`] is called
    pub fn new(
        raw_file: impl Into<String>,
        scan_number: i64,
        precursor_charge: i32,
        mass: f64,
        score: f64,
        reverse: bool,
        proteins: impl Into<String>,
    ) -> Self {
        Self {
            raw_file: raw_file.into(),
            scan_number,
            modified_sequence: String::new(),
            sequence: String::new(),
            precursor_charge,
            mass,
            score,
            reverse,
            peptide_length: 0,
            proteins: proteins.into(),
            retention_time: None,
            scan_event_number: None,
            fragmentation: None,
            mass_analyzer: None,
            calculated_mass: None,
        }
    }

    /// Set the canonical sequence and derive bare sequence and length from it
    pub fn set_modified_sequence(&mut self, modified_sequence: String) {
        let (sequence, length) = normalize(&modified_sequence);
        self.modified_sequence = modified_sequence;
        self.sequence = sequence;
        self.peptide_length = length;
    }

    /// Builder-style variant of [`Psm::set_modified_sequence`]
    pub fn with_modified_sequence(mut self, modified_sequence: impl Into<String>) -> Self {
        self.set_modified_sequence(modified_sequence.into());
        self
    }
}

/// One crosslinked spectrum match in the internal format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosslinkPsm {
    /// Raw file name without extension
    #[serde(rename = "RAW_FILE")]
    pub raw_file: String,
    /// Scan number of the MS2 spectrum
    #[serde(rename = "SCAN_NUMBER")]
    pub scan_number: i64,
    /// Precursor charge state
    #[serde(rename = "PRECURSOR_CHARGE")]
    pub precursor_charge: i32,
    /// Experimental MH+ of the crosslinked pair in Da
    #[serde(rename = "MASS")]
    pub mass: f64,
    /// Engine score
    #[serde(rename = "SCORE")]
    pub score: f64,
    /// Decoy flag
    #[serde(rename = "REVERSE")]
    pub reverse: bool,
    /// Crosslinker name (e.g. DSSO)
    #[serde(rename = "CROSSLINKER_TYPE")]
    pub crosslinker_type: String,
    /// Protein accessions
    #[serde(rename = "PROTEINS")]
    pub proteins: String,
    /// Retention time in minutes
    #[serde(rename = "RETENTION_TIME", default)]
    pub retention_time: Option<f64>,
    /// Bare sequence of peptide A
    #[serde(rename = "SEQUENCE_A")]
    pub sequence_a: String,
    /// Canonical sequence of peptide A
    #[serde(rename = "MODIFIED_SEQUENCE_A")]
    pub modified_sequence_a: String,
    /// Length of peptide A
    #[serde(rename = "PEPTIDE_LENGTH_A")]
    pub peptide_length_a: usize,
    /// 1-based crosslinked residue of peptide A
    #[serde(rename = "CROSSLINKER_POSITION_A")]
    pub crosslinker_position_a: usize,
    /// Bare sequence of peptide B
    #[serde(rename = "SEQUENCE_B")]
    pub sequence_b: String,
    /// Canonical sequence of peptide B
    #[serde(rename = "MODIFIED_SEQUENCE_B")]
    pub modified_sequence_b: String,
    /// Length of peptide B
    #[serde(rename = "PEPTIDE_LENGTH_B")]
    pub peptide_length_b: usize,
    /// 1-based crosslinked residue of peptide B
    #[serde(rename = "CROSSLINKER_POSITION_B")]
    pub crosslinker_position_b: usize,
}
