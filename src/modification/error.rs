/// Grammar that custom modification pattern keys must follow
pub const KEY_GRAMMAR: &str = "'X' or 'X<mod_pattern>' where X is either the one-letter code of an \
aminoacid or '^' / '$' defining the n- or c-terminus, respectively, followed by an optional pattern \
identifying a specific modification";

/// Errors raised while building modification pattern tables
///
/// All of these are configuration errors: they describe a malformed mapping
/// supplied by the caller (or an adapter) and abort the conversion.
#[derive(Debug, thiserror::Error)]
pub enum ModificationError {
    /// Pattern key does not follow the required grammar
    #[error("Replacement '{key}' not understood: {reason}. Replacements must follow the pattern {KEY_GRAMMAR}")]
    InvalidPattern {
        /// Offending key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// UNIMOD id is not a non-negative integer
    #[error("UNIMOD id {value} for replacement '{key}' not understood. UNIMOD IDs must be non-negative integers")]
    InvalidUnimodId {
        /// Key the id belongs to
        key: String,
        /// Offending value as written by the caller
        value: String,
    },

    /// Adapter-provided regular expression failed to compile
    #[error("Invalid modification pattern '{pattern}': {source}")]
    InvalidRegex {
        /// Pattern source
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Label chemistry name not recognised
    #[error("Unknown label chemistry '{0}', expected one of: tmt, tmtpro, itraq4, itraq8, silac")]
    UnknownLabel(String),
}
