use std::fmt;

use regex::Regex;

use super::error::ModificationError;

const CANONICAL_TAG_START: &str = "[UNIMOD:";

/// Canonical residue tag, e.g. `M[UNIMOD:35]`
pub fn residue_tag(residue: char, unimod_id: u32) -> String {
    format!("{}[UNIMOD:{}]", residue, unimod_id)
}

/// Canonical n-terminal tag, e.g. `[UNIMOD:737]-`
pub fn n_term_tag(unimod_id: u32) -> String {
    format!("[UNIMOD:{}]-", unimod_id)
}

/// Canonical c-terminal tag, e.g. `-[UNIMOD:2]`
pub fn c_term_tag(unimod_id: u32) -> String {
    format!("-[UNIMOD:{}]", unimod_id)
}

/// Ordered mapping of engine-specific modification patterns to UNIMOD ids
///
/// Insertion order is preserved. Inserting an existing key replaces its id
/// and moves it to the end, so later entries take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomMods {
    entries: Vec<(String, u32)>,
}

impl CustomMods {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a pattern
    pub fn insert<K: Into<String>>(&mut self, key: K, unimod_id: u32) {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, unimod_id));
    }

    /// Parse a TOML table such as `{ "M[147]" = 35 }`
    ///
    /// Every value must be a non-negative integer that fits a UNIMOD id.
    pub fn from_toml(table: &toml::Table) -> Result<Self, ModificationError> {
        let mut mods = Self::new();
        for (key, value) in table {
            let unimod_id = value
                .as_integer()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| ModificationError::InvalidUnimodId {
                    key: key.clone(),
                    value: value.to_string(),
                })?;
            mods.insert(key.as_str(), unimod_id);
        }
        Ok(mods)
    }

    /// Parse a `KEY=ID` assignment as given on the command line
    pub fn parse_assignment(assignment: &str) -> Result<(String, u32), ModificationError> {
        let (key, value) =
            assignment
                .rsplit_once('=')
                .ok_or_else(|| ModificationError::InvalidPattern {
                    key: assignment.to_string(),
                    reason: "expected KEY=UNIMOD_ID".to_string(),
                })?;
        let unimod_id = value
            .trim()
            .parse::<u32>()
            .map_err(|_| ModificationError::InvalidUnimodId {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        Ok((key.to_string(), unimod_id))
    }

    /// Engine standard mods overridden by caller entries
    pub fn merged(standard: &CustomMods, custom: Option<&CustomMods>) -> CustomMods {
        let mut merged = standard.clone();
        if let Some(custom) = custom {
            merged.extend(custom.iter().map(|(k, v)| (k.to_string(), v)));
        }
        merged
    }

    /// Iterate over `(pattern, unimod_id)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no pattern is defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for CustomMods {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut mods = Self::new();
        mods.extend(iter);
        mods
    }
}

impl<K: Into<String>> Extend<(K, u32)> for CustomMods {
    fn extend<I: IntoIterator<Item = (K, u32)>>(&mut self, iter: I) {
        for (key, id) in iter {
            self.insert(key, id);
        }
    }
}

/// Where a pattern is anchored in the engine string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Start of the sequence
    NTerm,
    /// A residue anywhere in the sequence
    Residue,
    /// End of the sequence
    CTerm,
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    fn regex(pattern: &str, whole: bool) -> Result<Self, ModificationError> {
        let anchored = if whole {
            format!("^(?:{})$", pattern)
        } else {
            format!("^(?:{})", pattern)
        };
        Regex::new(&anchored)
            .map(Matcher::Regex)
            .map_err(|source| ModificationError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Length of the match at the start of `haystack`
    fn match_len(&self, haystack: &str) -> Option<usize> {
        match self {
            Matcher::Literal(lit) => haystack.starts_with(lit.as_str()).then_some(lit.len()),
            Matcher::Regex(re) => re.find(haystack).map(|m| m.end()),
        }
    }
}

#[derive(Debug, Clone)]
struct PatternEntry {
    anchor: Anchor,
    source: String,
    matcher: Matcher,
    replacement: String,
}

/// Compiled table of engine patterns and their canonical replacements
///
/// Substitution runs as a single scan over the engine string. At each
/// position the longest matching pattern wins; among equally long matches
/// the entry added last wins. Canonical `[UNIMOD:n]` tags already present in
/// the input are copied through and never matched.
#[derive(Debug, Clone, Default)]
pub struct ModificationPatterns {
    entries: Vec<PatternEntry>,
}

impl ModificationPatterns {
    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is compiled
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compiled `(pattern, replacement)` pairs in precedence order (lowest first)
    pub fn replacements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.source.as_str(), e.replacement.as_str()))
    }

    /// Replacement for a pattern source, if compiled
    pub fn replacement_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.source == source)
            .map(|e| e.replacement.as_str())
    }

    /// Add a regular-expression pattern with the highest precedence so far
    pub fn push_regex(
        &mut self,
        anchor: Anchor,
        pattern: &str,
        replacement: String,
    ) -> Result<(), ModificationError> {
        let entry = Self::regex_entry(anchor, pattern, replacement)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Add a regular-expression pattern with the lowest precedence so far
    ///
    /// Used for label chemistry forms, which any explicit mapping overrides.
    pub fn push_fallback_regex(
        &mut self,
        anchor: Anchor,
        pattern: &str,
        replacement: String,
    ) -> Result<(), ModificationError> {
        let entry = Self::regex_entry(anchor, pattern, replacement)?;
        self.entries.insert(0, entry);
        Ok(())
    }

    fn regex_entry(
        anchor: Anchor,
        pattern: &str,
        replacement: String,
    ) -> Result<PatternEntry, ModificationError> {
        let source = match anchor {
            Anchor::NTerm => format!("^{}", pattern),
            Anchor::Residue => pattern.to_string(),
            Anchor::CTerm => format!("{}$", pattern),
        };
        Ok(PatternEntry {
            anchor,
            source,
            matcher: Matcher::regex(pattern, anchor == Anchor::CTerm)?,
            replacement,
        })
    }

    fn push_literal(&mut self, anchor: Anchor, source: String, literal: &str, replacement: String) {
        self.entries.push(PatternEntry {
            anchor,
            source,
            matcher: Matcher::Literal(literal.to_string()),
            replacement,
        });
    }

    fn best_match(&self, anchor: Anchor, haystack: &str) -> Option<(usize, &str)> {
        let mut best: Option<(usize, &str)> = None;
        for entry in self.entries.iter().filter(|e| e.anchor == anchor) {
            let Some(len) = entry.matcher.match_len(haystack) else {
                continue;
            };
            if anchor == Anchor::CTerm && len != haystack.len() {
                continue;
            }
            // A residue that already carries a canonical tag is left alone.
            if anchor == Anchor::Residue && haystack[len..].starts_with(CANONICAL_TAG_START) {
                continue;
            }
            if best.map_or(true, |(best_len, _)| len >= best_len) {
                best = Some((len, entry.replacement.as_str()));
            }
        }
        best
    }

    /// Rewrite an engine modification string into canonical notation
    pub fn canonicalize(&self, sequence: &str) -> String {
        let mut out = String::with_capacity(sequence.len() + 16);
        let mut pos = 0;
        let mut c_term_tagged = false;

        if !sequence.starts_with(CANONICAL_TAG_START) {
            if let Some((len, replacement)) = self.best_match(Anchor::NTerm, sequence) {
                out.push_str(replacement);
                pos = len;
            }
        }

        while pos < sequence.len() {
            let rest = &sequence[pos..];

            if rest.starts_with(CANONICAL_TAG_START) {
                if let Some(end) = rest.find(']') {
                    out.push_str(&rest[..=end]);
                    pos += end + 1;
                    continue;
                }
            }

            if let Some((len, replacement)) = self.best_match(Anchor::CTerm, rest) {
                if len > 0 {
                    out.push_str(replacement);
                    pos += len;
                    c_term_tagged = true;
                    continue;
                }
            }

            if let Some((len, replacement)) = self.best_match(Anchor::Residue, rest) {
                if len > 0 {
                    out.push_str(replacement);
                    pos += len;
                    continue;
                }
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            out.push(ch);
            pos += ch.len_utf8();
        }

        // Empty-suffix c-terminal patterns match once at the very end.
        if !c_term_tagged && !has_c_term_tag(&out) {
            if let Some((_, replacement)) = self.best_match(Anchor::CTerm, "") {
                out.push_str(replacement);
            }
        }

        out
    }
}

fn has_c_term_tag(sequence: &str) -> bool {
    sequence
        .rfind("-[UNIMOD:")
        .is_some_and(|start| sequence[start..].find(']') == Some(sequence.len() - start - 1))
}

impl fmt::Display for ModificationPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .replacements()
            .map(|(p, r)| format!("{} -> {}", p, r))
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// Compiles [`CustomMods`] into [`ModificationPatterns`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternCompiler {
    lowercase_residues: bool,
    c_terminal: bool,
}

impl PatternCompiler {
    /// Compiler accepting uppercase residue and `^` keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept keys led by a lowercase residue (engines that mark
    /// modified residues by case)
    pub fn lowercase_residues(mut self, enabled: bool) -> Self {
        self.lowercase_residues = enabled;
        self
    }

    /// Also accept `$` (c-terminal) keys
    pub fn c_terminal(mut self, enabled: bool) -> Self {
        self.c_terminal = enabled;
        self
    }

    /// Validate and compile every key of `mods`, in order
    pub fn compile(&self, mods: &CustomMods) -> Result<ModificationPatterns, ModificationError> {
        let mut patterns = ModificationPatterns::default();
        self.compile_into(&mut patterns, mods)?;
        Ok(patterns)
    }

    /// Compile `mods` on top of an existing table; new keys take precedence
    pub fn compile_into(
        &self,
        patterns: &mut ModificationPatterns,
        mods: &CustomMods,
    ) -> Result<(), ModificationError> {
        for (key, unimod_id) in mods.iter() {
            let Some(first) = key.chars().next() else {
                return Err(ModificationError::InvalidPattern {
                    key: key.to_string(),
                    reason: "empty pattern".to_string(),
                });
            };
            let suffix = &key[first.len_utf8()..];

            match first {
                c if c.is_ascii_uppercase() => patterns.push_literal(
                    Anchor::Residue,
                    key.to_string(),
                    key,
                    residue_tag(c, unimod_id),
                ),
                c if c.is_ascii_lowercase() && self.lowercase_residues => patterns.push_literal(
                    Anchor::Residue,
                    key.to_string(),
                    key,
                    residue_tag(c.to_ascii_uppercase(), unimod_id),
                ),
                '^' => patterns.push_literal(
                    Anchor::NTerm,
                    key.to_string(),
                    suffix,
                    n_term_tag(unimod_id),
                ),
                '$' if self.c_terminal => patterns.push_literal(
                    Anchor::CTerm,
                    key.to_string(),
                    suffix,
                    c_term_tag(unimod_id),
                ),
                '$' => {
                    return Err(ModificationError::InvalidPattern {
                        key: key.to_string(),
                        reason: "c-terminal patterns are not supported by this search engine"
                            .to_string(),
                    })
                }
                other => {
                    return Err(ModificationError::InvalidPattern {
                        key: key.to_string(),
                        reason: format!("'{}' is not a valid aminoacid", other),
                    })
                }
            }
        }
        Ok(())
    }
}
