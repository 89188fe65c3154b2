//! Column names of the internal PSM table
/// Raw file name without extension
pub const RAW_FILE: &str = "RAW_FILE";
/// Scan number of the MS2 spectrum
pub const SCAN_NUMBER: &str = "SCAN_NUMBER";
/// Canonical modified sequence
pub const MODIFIED_SEQUENCE: &str = "MODIFIED_SEQUENCE";
/// Bare amino acid sequence
pub const SEQUENCE: &str = "SEQUENCE";
/// Precursor charge state
pub const PRECURSOR_CHARGE: &str = "PRECURSOR_CHARGE";
/// Precursor mass in Da
pub const MASS: &str = "MASS";
/// Engine score
pub const SCORE: &str = "SCORE";
/// Decoy flag
pub const REVERSE: &str = "REVERSE";
/// Number of residues
pub const PEPTIDE_LENGTH: &str = "PEPTIDE_LENGTH";
/// Protein accessions
pub const PROTEINS: &str = "PROTEINS";

// Optional engine-specific columns
/// Retention time
pub const RETENTION_TIME: &str = "RETENTION_TIME";
/// Index of the PSM in the engine output
pub const SCAN_EVENT_NUMBER: &str = "SCAN_EVENT_NUMBER";
/// Fragmentation method
pub const FRAGMENTATION: &str = "FRAGMENTATION";
/// Mass analyzer
pub const MASS_ANALYZER: &str = "MASS_ANALYZER";
/// Theoretical precursor mass in Da
pub const CALCULATED_MASS: &str = "CALCULATED_MASS";

/// Columns every internal table carries
pub const REQUIRED: [&str; 10] = [
    RAW_FILE,
    SCAN_NUMBER,
    MODIFIED_SEQUENCE,
    SEQUENCE,
    PRECURSOR_CHARGE,
    MASS,
    SCORE,
    REVERSE,
    PEPTIDE_LENGTH,
    PROTEINS,
];
