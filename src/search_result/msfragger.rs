use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::constants::{unimod, UNKNOWN_PROTEIN};
use crate::modification::{CustomMods, LabelChemistry, LabelForms, ModificationPatterns, PatternCompiler};

use super::decoy::DecoyRule;
use super::{compile_patterns, finish_psms, ConversionError, Psm, ReadOptions, SearchEngine};

const TARGET: &str = "spectrum_io::search_result::msfragger";

/// Labelled n-terminus and lysine as MSFragger writes them: rounded masses of
/// the modified terminus and residue. Other lysine masses are left untouched.
fn label_forms(label: LabelChemistry) -> LabelForms {
    match label {
        LabelChemistry::Tmt => LabelForms {
            n_term: r"n\[230\]",
            lysine: r"K(?:\[357\])?",
        },
        LabelChemistry::TmtPro | LabelChemistry::Itraq8 => LabelForms {
            n_term: r"n\[305\]",
            lysine: r"K(?:\[432\])?",
        },
        LabelChemistry::Itraq4 => LabelForms {
            n_term: r"n\[145\]",
            lysine: r"K(?:\[272\])?",
        },
        LabelChemistry::Silac => LabelForms {
            n_term: "",
            lysine: "K",
        },
    }
}

const SUPPORTED_LABELS: [LabelChemistry; 4] = [
    LabelChemistry::Tmt,
    LabelChemistry::TmtPro,
    LabelChemistry::Itraq4,
    LabelChemistry::Itraq8,
];

/// Adapter for MSFragger pepXML files
#[derive(Debug, Clone)]
pub struct MsFragger {
    path: PathBuf,
}

impl MsFragger {
    /// Adapter reading `path` (a pepXML file or a directory tree of them)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Fixed carbamidomethylation and variable oxidation
    pub fn standard_mods() -> CustomMods {
        [
            ("C", unimod::CARBAMIDOMETHYL),
            ("C[160]", unimod::CARBAMIDOMETHYL),
            ("M[147]", unimod::OXIDATION),
        ]
        .into_iter()
        .collect()
    }
}

impl SearchEngine for MsFragger {
    type Row = Psm;

    fn name(&self) -> &'static str {
        "MSFragger"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn default_suffix(&self) -> &'static str {
        ".pepXML"
    }

    fn recursive(&self) -> bool {
        true
    }

    fn supported_labels(&self) -> &'static [LabelChemistry] {
        &SUPPORTED_LABELS
    }

    fn read_result(&self, options: &ReadOptions) -> Result<Vec<Psm>, ConversionError> {
        self.check_label(options)?;
        let mods = CustomMods::merged(&Self::standard_mods(), options.custom_mods.as_ref());
        let patterns = compile_patterns(PatternCompiler::new(), &mods, options.label, label_forms)?;

        let mut rows = Vec::new();
        for file in self.input_files(options)? {
            info!(target: TARGET, "Reading {}", file.display());
            let before = rows.len();
            read_pepxml(&file, &patterns, &mut rows)?;
            debug!(
                target: TARGET,
                "{} search hits in {}",
                rows.len() - before,
                file.display()
            );
        }

        Ok(finish_psms(rows, options))
    }
}

#[derive(Debug, Default)]
struct SpectrumQuery {
    raw_file: String,
    scan_number: i64,
    charge: i32,
    neutral_mass: f64,
    index: Option<i64>,
    retention_time: Option<f64>,
}

#[derive(Debug, Default)]
struct SearchHit {
    peptide: String,
    modified_peptide: Option<String>,
    proteins: Vec<String>,
    hyperscore: Option<f64>,
    calc_neutral_mass: Option<f64>,
}

/// Attribute parsing with file and record context for errors
struct AttributeReader<'a> {
    file: &'a Path,
    record: u64,
    decoder: Decoder,
}

impl AttributeReader<'_> {
    fn get(&self, e: &BytesStart, name: &str) -> Result<Option<String>, ConversionError> {
        for attr in e.attributes() {
            let attr = attr?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                return Ok(Some(attr.decode_and_unescape_value(self.decoder)?.into_owned()));
            }
        }
        Ok(None)
    }

    fn require(&self, e: &BytesStart, name: &str) -> Result<String, ConversionError> {
        self.get(e, name)?.ok_or_else(|| ConversionError::MissingColumn {
            file: self.file.to_path_buf(),
            column: name.to_string(),
        })
    }

    fn convert<T: FromStr>(&self, name: &str, value: String) -> Result<T, ConversionError> {
        value.trim().parse().map_err(|_| ConversionError::InvalidValue {
            file: self.file.to_path_buf(),
            line: self.record,
            column: name.to_string(),
            value,
        })
    }

    fn parse<T: FromStr>(&self, e: &BytesStart, name: &str) -> Result<T, ConversionError> {
        let value = self.require(e, name)?;
        self.convert(name, value)
    }

    fn parse_opt<T: FromStr>(&self, e: &BytesStart, name: &str) -> Result<Option<T>, ConversionError> {
        match self.get(e, name)? {
            Some(value) => self.convert(name, value).map(Some),
            None => Ok(None),
        }
    }
}

fn read_spectrum_query(
    attrs: &AttributeReader<'_>,
    e: &BytesStart,
) -> Result<SpectrumQuery, ConversionError> {
    let spectrum = attrs.require(e, "spectrum")?;
    let raw_file = spectrum
        .split_once('.')
        .map_or(spectrum.as_str(), |(name, _)| name)
        .to_string();
    Ok(SpectrumQuery {
        raw_file,
        scan_number: attrs.parse(e, "start_scan")?,
        charge: attrs.parse(e, "assumed_charge")?,
        neutral_mass: attrs.parse(e, "precursor_neutral_mass")?,
        index: attrs.parse_opt(e, "index")?,
        retention_time: attrs.parse_opt(e, "retention_time_sec")?,
    })
}

fn read_search_hit(
    attrs: &AttributeReader<'_>,
    e: &BytesStart,
) -> Result<SearchHit, ConversionError> {
    let mut hit = SearchHit {
        peptide: attrs.require(e, "peptide")?,
        calc_neutral_mass: attrs.parse_opt(e, "calc_neutral_pep_mass")?,
        ..Default::default()
    };
    if let Some(protein) = attrs.get(e, "protein")? {
        hit.proteins.push(protein);
    }
    Ok(hit)
}

fn finish_hit(
    query: &SpectrumQuery,
    hit: SearchHit,
    attrs: &AttributeReader<'_>,
    patterns: &ModificationPatterns,
    decoy: DecoyRule,
) -> Result<Psm, ConversionError> {
    let score = hit.hyperscore.ok_or_else(|| ConversionError::MissingColumn {
        file: attrs.file.to_path_buf(),
        column: "hyperscore".to_string(),
    })?;
    let proteins = if hit.proteins.is_empty() {
        UNKNOWN_PROTEIN.to_string()
    } else {
        hit.proteins.join(";")
    };
    let engine_sequence = hit.modified_peptide.as_deref().unwrap_or(&hit.peptide);

    let mut psm = Psm::new(
        query.raw_file.as_str(),
        query.scan_number,
        query.charge,
        query.neutral_mass,
        score,
        decoy.is_decoy(&proteins),
        proteins,
    )
    .with_modified_sequence(patterns.canonicalize(engine_sequence));
    psm.retention_time = query.retention_time;
    psm.scan_event_number = query.index;
    psm.calculated_mass = hit.calc_neutral_mass;
    Ok(psm)
}

/// Append one row per `search_hit` of a pepXML file
fn read_pepxml(
    path: &Path,
    patterns: &ModificationPatterns,
    rows: &mut Vec<Psm>,
) -> Result<(), ConversionError> {
    let mut reader = Reader::from_reader(BufReader::new(File::open(path)?));
    reader.config_mut().trim_text(true);

    let decoy = DecoyRule::AllAccessionsContain("rev");
    let mut attrs = AttributeReader {
        file: path,
        record: 0,
        decoder: reader.decoder(),
    };
    let mut query: Option<SpectrumQuery> = None;
    let mut hit: Option<SearchHit> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) if e.local_name().as_ref() == b"search_hit" => {
                // A self-closing hit carries no children and ends right here
                let current = read_search_hit(&attrs, &e)?;
                if let Some(q) = query.as_ref() {
                    rows.push(finish_hit(q, current, &attrs, patterns, decoy)?);
                }
            }
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"spectrum_query" => {
                    attrs.record += 1;
                    query = Some(read_spectrum_query(&attrs, &e)?);
                }
                b"search_hit" => hit = Some(read_search_hit(&attrs, &e)?),
                b"alternative_protein" => {
                    if let (Some(current), Some(protein)) = (hit.as_mut(), attrs.get(&e, "protein")?) {
                        current.proteins.push(protein);
                    }
                }
                b"modification_info" => {
                    if let Some(current) = hit.as_mut() {
                        current.modified_peptide = attrs.get(&e, "modified_peptide")?;
                    }
                }
                b"search_score" => {
                    if attrs.get(&e, "name")?.as_deref() == Some("hyperscore") {
                        let value: f64 = attrs.parse(&e, "value")?;
                        if let Some(current) = hit.as_mut() {
                            current.hyperscore = Some(value);
                        }
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"search_hit" => {
                    if let (Some(q), Some(h)) = (query.as_ref(), hit.take()) {
                        rows.push(finish_hit(q, h, &attrs, patterns, decoy)?);
                    }
                }
                b"spectrum_query" => query = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
