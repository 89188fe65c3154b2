/// How a search engine marks decoy matches
///
/// Engines disagree on the convention, so every adapter picks its own rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoyRule {
    /// A marker cell equal to the given text, e.g. MaxQuant `Reverse == "+"`
    Marker(&'static str),
    /// A negative target/decoy label, e.g. Sage `label == -1`
    NegativeLabel,
    /// Accession starting with a prefix, e.g. MSAmanda `REV_`
    AccessionPrefix(&'static str),
    /// Every `;`-separated accession contains the text, e.g. MSFragger `rev`
    AllAccessionsContain(&'static str),
    /// A boolean cell, e.g. XlinkX `Is Decoy`
    BooleanFlag,
}

impl DecoyRule {
    /// Apply the rule to the cell value the engine reports
    pub fn is_decoy(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            DecoyRule::Marker(marker) => value == *marker,
            DecoyRule::NegativeLabel => value.parse::<f64>().is_ok_and(|v| v < 0.0),
            DecoyRule::AccessionPrefix(prefix) => value.starts_with(prefix),
            DecoyRule::AllAccessionsContain(marker) => {
                !value.is_empty() && value.split(';').all(|accession| accession.contains(marker))
            }
            DecoyRule::BooleanFlag => {
                value.eq_ignore_ascii_case("true") || value == "1"
            }
        }
    }
}
