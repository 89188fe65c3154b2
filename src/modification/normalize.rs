const TAG_START: &str = "[UNIMOD:";

/// Strip every `[UNIMOD:n]` tag and terminus dash from a canonical sequence
///
/// Anything that is not canonical markup (including unconverted engine
/// annotations) is kept as is.
///
/// ```
/// use spectrum_io::modification::strip_modifications;
///
/// assert_eq!(strip_modifications("[UNIMOD:737]-PEPTK[UNIMOD:737]"), "PEPTK");
/// assert_eq!(strip_modifications("PEPTIDE"), "PEPTIDE");
/// ```
pub fn strip_modifications(modified_sequence: &str) -> String {
    let mut bare = String::with_capacity(modified_sequence.len());
    let mut rest = modified_sequence;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with(TAG_START) {
            if let Some(end) = rest.find(']') {
                let at_start = bare.is_empty();
                rest = &rest[end + 1..];
                if at_start {
                    rest = rest.strip_prefix('-').unwrap_or(rest);
                }
                continue;
            }
        }
        if ch == '-' && rest[1..].starts_with(TAG_START) {
            rest = &rest[1..];
            continue;
        }
        bare.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    bare
}

/// Number of residues in a bare sequence
pub fn peptide_length(sequence: &str) -> usize {
    sequence.chars().count()
}

/// Bare sequence and its length for a canonical sequence
pub fn normalize(modified_sequence: &str) -> (String, usize) {
    let bare = strip_modifications(modified_sequence);
    let length = peptide_length(&bare);
    (bare, length)
}
