use std::fmt;
use std::str::FromStr;

use crate::constants::unimod;

use super::compiler::{n_term_tag, residue_tag, Anchor, ModificationPatterns};
use super::error::ModificationError;

/// Fixed label chemistries applied on top of the search engine output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelChemistry {
    /// TMT 6/10/11-plex
    Tmt,
    /// TMTpro 16/18-plex
    TmtPro,
    /// iTRAQ 4-plex
    Itraq4,
    /// iTRAQ 8-plex
    Itraq8,
    /// SILAC; heavy lysine/arginine depend on a per-row label state
    Silac,
}

impl LabelChemistry {
    /// UNIMOD id put on free lysines and the n-terminus (isobaric labels only)
    pub fn unimod_id(&self) -> Option<u32> {
        match self {
            LabelChemistry::Tmt => Some(unimod::TMT),
            LabelChemistry::TmtPro => Some(unimod::TMT_PRO),
            LabelChemistry::Itraq4 => Some(unimod::ITRAQ4),
            LabelChemistry::Itraq8 => Some(unimod::ITRAQ8),
            LabelChemistry::Silac => None,
        }
    }

    /// True for label chemistries applied uniformly to every row
    pub fn is_isobaric(&self) -> bool {
        self.unimod_id().is_some()
    }

    /// Lower-case name as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            LabelChemistry::Tmt => "tmt",
            LabelChemistry::TmtPro => "tmtpro",
            LabelChemistry::Itraq4 => "itraq4",
            LabelChemistry::Itraq8 => "itraq8",
            LabelChemistry::Silac => "silac",
        }
    }
}

impl fmt::Display for LabelChemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelChemistry {
    type Err = ModificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "tmt" => Ok(LabelChemistry::Tmt),
            "tmtpro" => Ok(LabelChemistry::TmtPro),
            "itraq4" => Ok(LabelChemistry::Itraq4),
            "itraq8" => Ok(LabelChemistry::Itraq8),
            "silac" => Ok(LabelChemistry::Silac),
            _ => Err(ModificationError::UnknownLabel(s.to_string())),
        }
    }
}

/// How an engine writes a labelled n-terminus and a labelled lysine
///
/// Both are regular expressions matched at the current scan position; the
/// lysine form must include the residue letter.
#[derive(Debug, Clone, Copy)]
pub struct LabelForms {
    /// N-terminal label as written by the engine (may be empty)
    pub n_term: &'static str,
    /// Labelled lysine as written by the engine
    pub lysine: &'static str,
}

impl ModificationPatterns {
    /// Inject the fixed n-terminus and free-lysine entries of an isobaric label
    ///
    /// Entries are added with the lowest precedence, so explicit engine
    /// modifications (e.g. an acetylated n-terminus) win over the label.
    pub fn inject_label(
        &mut self,
        unimod_id: u32,
        forms: &LabelForms,
    ) -> Result<(), ModificationError> {
        self.push_fallback_regex(Anchor::Residue, forms.lysine, residue_tag('K', unimod_id))?;
        self.push_fallback_regex(Anchor::NTerm, forms.n_term, n_term_tag(unimod_id))
    }

    /// Inject the heavy SILAC lysine and arginine
    pub fn inject_silac_heavy(&mut self) -> Result<(), ModificationError> {
        self.push_fallback_regex(
            Anchor::Residue,
            "K",
            residue_tag('K', unimod::SILAC_HEAVY_LYSINE),
        )?;
        self.push_fallback_regex(
            Anchor::Residue,
            "R",
            residue_tag('R', unimod::SILAC_HEAVY_ARGININE),
        )
    }
}
