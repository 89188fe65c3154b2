//! Column names of the internal crosslink table
//!
//! Shared columns (`RAW_FILE`, `SCAN_NUMBER`, ...) use the names in
//! [`super::columns`].
/// Crosslinker reagent name
pub const CROSSLINKER_TYPE: &str = "CROSSLINKER_TYPE";
/// Bare sequence of peptide A
pub const SEQUENCE_A: &str = "SEQUENCE_A";
/// Canonical sequence of peptide A
pub const MODIFIED_SEQUENCE_A: &str = "MODIFIED_SEQUENCE_A";
/// Length of peptide A
pub const PEPTIDE_LENGTH_A: &str = "PEPTIDE_LENGTH_A";
/// Crosslinked residue of peptide A (1-based)
pub const CROSSLINKER_POSITION_A: &str = "CROSSLINKER_POSITION_A";
/// Bare sequence of peptide B
pub const SEQUENCE_B: &str = "SEQUENCE_B";
/// Canonical sequence of peptide B
pub const MODIFIED_SEQUENCE_B: &str = "MODIFIED_SEQUENCE_B";
/// Length of peptide B
pub const PEPTIDE_LENGTH_B: &str = "PEPTIDE_LENGTH_B";
/// Crosslinked residue of peptide B (1-based)
pub const CROSSLINKER_POSITION_B: &str = "CROSSLINKER_POSITION_B";
