//! # Modification Handling
//!
//! Search engines annotate modified residues in incompatible ways
//! (`M(ox)`, `M[147]`, `M[+15.9949]`, lowercase `m`, ...). This module turns
//! a mapping of such engine patterns to UNIMOD ids into a compiled
//! substitution table and rewrites engine strings into the canonical
//! bracketed notation:
//!
//! ```text
//! [UNIMOD:737]-PEPTM[UNIMOD:35]K[UNIMOD:737]
//! ```
//!
//! A leading tag followed by a dash marks an n-terminal modification; every
//! other tag directly follows the residue it modifies.
//!
//! ## Example
//!
//! ```
//! use spectrum_io::modification::{CustomMods, PatternCompiler, strip_modifications};
//!
//! let mods: CustomMods = [("M[147]", 35), ("C", 4)].into_iter().collect();
//! let patterns = PatternCompiler::new().compile(&mods)?;
//!
//! let canonical = patterns.canonicalize("PEPM[147]CK");
//! assert_eq!(canonical, "PEPM[UNIMOD:35]C[UNIMOD:4]K");
//! assert_eq!(strip_modifications(&canonical), "PEPMCK");
//! # Ok::<(), spectrum_io::modification::ModificationError>(())
//! ```

mod compiler;
mod error;
mod label;
mod normalize;
mod permutation;


pub use compiler::{
    c_term_tag, n_term_tag, residue_tag, Anchor, CustomMods, ModificationPatterns,
    PatternCompiler,
};
pub use error::{ModificationError, KEY_GRAMMAR};
pub use label::{LabelChemistry, LabelForms};
pub use normalize::{normalize, peptide_length, strip_modifications};
pub use permutation::PtmPermutation;
