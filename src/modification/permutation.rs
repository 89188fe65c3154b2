use itertools::Itertools;
use serde::Deserialize;

use crate::constants::unimod;

/// Expansion of a localization-ambiguous modification over its candidate sites
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PtmPermutation {
    /// UNIMOD id of the ambiguous modification
    pub unimod_id: u32,
    /// Residues that may carry it
    pub sites: Vec<char>,
    /// Also emit placements with one modification fewer
    #[serde(default)]
    pub allow_one_less: bool,
}

/// One residue of a canonical sequence with its optional tag
#[derive(Debug, Clone)]
struct Position<'a> {
    residue: char,
    tag: Option<&'a str>,
}

/// Canonical sequence split into terminal markup and residues
#[derive(Debug)]
struct Tokens<'a> {
    n_term: &'a str,
    residues: Vec<Position<'a>>,
    c_term: &'a str,
}

impl<'a> Tokens<'a> {
    fn parse(sequence: &'a str) -> Option<Self> {
        let mut rest = sequence;

        let mut n_term = "";
        if rest.starts_with("[UNIMOD:") {
            let end = rest.find("]-")?;
            n_term = &rest[..end + 2];
            rest = &rest[end + 2..];
        }

        let mut c_term = "";
        if let Some(start) = rest.rfind("-[UNIMOD:") {
            if rest.ends_with(']') {
                c_term = &rest[start..];
                rest = &rest[..start];
            }
        }

        let mut residues = Vec::with_capacity(rest.len());
        while let Some(residue) = rest.chars().next() {
            if !residue.is_ascii_alphabetic() {
                return None;
            }
            rest = &rest[1..];
            let mut tag = None;
            if rest.starts_with("[UNIMOD:") {
                let end = rest.find(']')?;
                tag = Some(&rest[..=end]);
                rest = &rest[end + 1..];
            }
            residues.push(Position { residue, tag });
        }

        Some(Self {
            n_term,
            residues,
            c_term,
        })
    }
}

impl PtmPermutation {
    /// Permute `unimod_id` over `sites`
    pub fn new<I: IntoIterator<Item = char>>(unimod_id: u32, sites: I) -> Self {
        Self {
            unimod_id,
            sites: sites.into_iter().collect(),
            allow_one_less: false,
        }
    }

    /// Set whether one modification may go undetected
    pub fn allow_one_less(mut self, allow: bool) -> Self {
        self.allow_one_less = allow;
        self
    }

    /// Deamidation of N/Q, which is sometimes missed at one site
    pub fn deamidation() -> Self {
        Self::new(unimod::DEAMIDATED, ['N', 'Q']).allow_one_less(true)
    }

    /// Every placement of the ambiguous modification over the site residues
    ///
    /// Sequences without the modification, or that cannot be tokenised, are
    /// returned unchanged as the only candidate.
    pub fn permutations(&self, modified_sequence: &str) -> Vec<String> {
        let Some(tokens) = Tokens::parse(modified_sequence) else {
            return vec![modified_sequence.to_string()];
        };
        let target = format!("[UNIMOD:{}]", self.unimod_id);
        let is_site = |p: &Position| self.sites.contains(&p.residue);

        let count = tokens
            .residues
            .iter()
            .filter(|p| is_site(p) && p.tag == Some(target.as_str()))
            .count();
        if count == 0 {
            return vec![modified_sequence.to_string()];
        }

        let candidates: Vec<usize> = tokens
            .residues
            .iter()
            .enumerate()
            .filter(|(_, p)| is_site(p) && (p.tag.is_none() || p.tag == Some(target.as_str())))
            .map(|(i, _)| i)
            .collect();

        let mut sizes = vec![count];
        if self.allow_one_less {
            sizes.push(count - 1);
        }

        let mut result = Vec::new();
        for size in sizes {
            for chosen in candidates.iter().copied().combinations(size) {
                result.push(Self::render(&tokens, &candidates, &chosen, &target));
            }
        }
        result
    }

    fn render(tokens: &Tokens, candidates: &[usize], chosen: &[usize], target: &str) -> String {
        let mut out = String::from(tokens.n_term);
        for (i, position) in tokens.residues.iter().enumerate() {
            out.push(position.residue);
            if chosen.contains(&i) {
                out.push_str(target);
            } else if !candidates.contains(&i) {
                if let Some(tag) = position.tag {
                    out.push_str(tag);
                }
            }
        }
        out.push_str(tokens.c_term);
        out
    }
}
