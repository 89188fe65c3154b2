//! Chemistry constants and the supported peptide envelope.

/// Mass of a proton in Da
pub const PROTON_MASS: f64 = 1.007_276_467;

/// Shortest peptide accepted by the validity filter
pub const MIN_PEPTIDE_LENGTH: usize = 7;

/// Longest peptide accepted by the validity filter
pub const MAX_PEPTIDE_LENGTH: usize = 30;

/// Shortest crosslinked peptide (per side) accepted by the crosslink filter
pub const MIN_CROSSLINK_PEPTIDE_LENGTH: usize = 6;

/// Highest precursor charge accepted by both filters
pub const MAX_PRECURSOR_CHARGE: i32 = 6;

/// Residues allowed in a canonical sequence
pub const CANONICAL_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Placeholder for rows without protein information
pub const UNKNOWN_PROTEIN: &str = "UNKNOWN";

/// Well-known UNIMOD accessions
pub mod unimod {
    /// Acetyl
    pub const ACETYL: u32 = 1;
    /// Carbamidomethyl
    pub const CARBAMIDOMETHYL: u32 = 4;
    /// Deamidated
    pub const DEAMIDATED: u32 = 7;
    /// Phospho
    pub const PHOSPHO: u32 = 21;
    /// Oxidation
    pub const OXIDATION: u32 = 35;
    /// GG (ubiquitinylation remnant)
    pub const GLY_GLY: u32 = 121;
    /// iTRAQ4plex
    pub const ITRAQ4: u32 = 214;
    /// Label:13C(6)15N(2)
    pub const SILAC_HEAVY_LYSINE: u32 = 259;
    /// Label:13C(6)15N(4)
    pub const SILAC_HEAVY_ARGININE: u32 = 267;
    /// iTRAQ8plex
    pub const ITRAQ8: u32 = 730;
    /// TMT6plex
    pub const TMT: u32 = 737;
    /// DSBU crosslinker
    pub const DSBU: u32 = 1884;
    /// DSSO crosslinker
    pub const DSSO: u32 = 1896;
    /// TMTpro
    pub const TMT_PRO: u32 = 2016;
}
