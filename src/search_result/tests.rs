use super::xlinkx::{apply_annotations, AnnotationError};
use super::*;
use crate::table::read_file;
use std::fs;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

fn tsv(cells: &[&str]) -> String {
    cells.join("\t")
}

const MSMS_HEADER: &[&str] = &[
    "Raw file",
    "Scan number",
    "Modified sequence",
    "Charge",
    "Mass",
    "Score",
    "Reverse",
    "Proteins",
    "Labeling state",
];

fn maxquant_file(dir: &Path) -> PathBuf {
    write(
        dir,
        "msms.txt",
        &[
            &tsv(MSMS_HEADER),
            &tsv(&["run01", "100", "_DS(ph)DS(ph)WDADAFSVEDPVRK_", "2", "2000.5", "120.0", "", "P1", "1"]),
            &tsv(&["run01", "101", "_DS(ph)DS(ph)WDADAFSVEDPVRK_", "2", "1990.5", "110.0", "", "P1", "0"]),
            &tsv(&["run01", "102", "_(ac)M(ox)PEPTIDEK_", "3", "1500.0", "80.0", "+", "REV__P2", "0"]),
            &tsv(&["run01", "103", "_PEPK_", "2", "500.0", "10.0", "", "P3", "0"]),
        ],
    )
}

// ---------------------------------------------------------------------------
// Input resolution
// ---------------------------------------------------------------------------

#[test]
fn test_resolve_missing_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = resolve_input(&missing, "msms.txt", false).unwrap_err();
    assert!(matches!(err, ConversionError::NotFound(p) if p == missing));
}

#[test]
fn test_resolve_empty_directory() {
    let dir = tempdir().unwrap();
    write(dir.path(), "notes.txt", &["nothing"]);
    let err = resolve_input(dir.path(), "msms.txt", false).unwrap_err();
    assert!(matches!(err, ConversionError::NoMatchingFiles { pattern, .. } if pattern == "msms.txt"));
}

#[test]
fn test_resolve_directory_sorted_and_case_insensitive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b_msms.txt", &["x"]);
    write(dir.path(), "a_MSMS.TXT", &["x"]);
    write(dir.path(), "other.tsv", &["x"]);
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    write(&nested, "c_msms.txt", &["x"]);

    let files = resolve_input(dir.path(), "msms.txt", false).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_MSMS.TXT", "b_msms.txt"]);

    let files = resolve_input(dir.path(), "msms.txt", true).unwrap();
    assert_eq!(files.len(), 3);
}

#[test]
fn test_empty_directory_fails_before_reading() {
    let dir = tempdir().unwrap();
    let err = MaxQuant::new(dir.path())
        .read_result(&ReadOptions::new())
        .unwrap_err();
    assert!(matches!(err, ConversionError::NoMatchingFiles { .. }));
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

#[test]
fn test_decoy_rules() {
    assert!(DecoyRule::Marker("+").is_decoy("+"));
    assert!(!DecoyRule::Marker("+").is_decoy(""));

    assert!(DecoyRule::NegativeLabel.is_decoy("-1"));
    assert!(!DecoyRule::NegativeLabel.is_decoy("1"));

    assert!(DecoyRule::AccessionPrefix("REV_").is_decoy("REV_sp|P1"));
    assert!(!DecoyRule::AccessionPrefix("REV_").is_decoy("sp|P1;REV_sp|P2"));

    let rule = DecoyRule::AllAccessionsContain("rev");
    assert!(rule.is_decoy("rev_P1;rev_P2"));
    assert!(!rule.is_decoy("rev_P1;P2"));
    assert!(!rule.is_decoy(""));

    assert!(DecoyRule::BooleanFlag.is_decoy("True"));
    assert!(DecoyRule::BooleanFlag.is_decoy("1"));
    assert!(!DecoyRule::BooleanFlag.is_decoy("False"));
}

#[test]
fn test_permute_rows() {
    let row = Psm::new("run", 1, 2, 1000.0, 10.0, false, "P1")
        .with_modified_sequence("PEPS[UNIMOD:21]TIDEK");

    let strict = PtmPermutation::new(21, ['S', 'T']);
    let rows = permute_rows(vec![row.clone()], &strict);
    let sequences: Vec<_> = rows.iter().map(|r| r.modified_sequence.as_str()).collect();
    assert_eq!(sequences, vec!["PEPS[UNIMOD:21]TIDEK", "PEPST[UNIMOD:21]IDEK"]);
    assert!(rows.iter().all(|r| r.scan_number == 1 && r.sequence == "PEPSTIDEK"));

    let lenient = strict.allow_one_less(true);
    let rows = permute_rows(vec![row], &lenient);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].modified_sequence, "PEPSTIDEK");
}

#[test]
fn test_engine_kind_parse() {
    assert_eq!("MaxQuant".parse::<SearchEngineKind>().unwrap(), SearchEngineKind::MaxQuant);
    assert_eq!(" sage ".parse::<SearchEngineKind>().unwrap(), SearchEngineKind::Sage);
    for kind in SearchEngineKind::ALL {
        assert_eq!(kind.to_string().parse::<SearchEngineKind>().unwrap(), kind);
    }
    let err = "mascot".parse::<SearchEngineKind>().unwrap_err();
    assert!(matches!(err, ConversionError::Configuration { key, .. } if key == "engine"));
}

#[test]
fn test_unsupported_labels() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "output.csv", &["#version", "Scan Number"]);

    let err = MsAmanda::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap_err();
    match err {
        ConversionError::UnsupportedFeature(msg) => {
            assert_eq!(msg, "tmt labelling is not supported for MSAmanda")
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = Sage::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Silac))
        .unwrap_err();
    assert!(matches!(err, ConversionError::UnsupportedFeature(_)));
}

#[test]
fn test_invalid_custom_mod_is_configuration_error() {
    let dir = tempdir().unwrap();
    let file = maxquant_file(dir.path());
    let mods: CustomMods = [("[ox]", 35)].into_iter().collect();
    let err = MaxQuant::new(&file)
        .read_result(&ReadOptions::new().with_custom_mods(mods))
        .unwrap_err();
    assert!(matches!(err, ConversionError::Configuration { key, .. } if key == "[ox]"));
}

// ---------------------------------------------------------------------------
// MaxQuant
// ---------------------------------------------------------------------------

#[test]
fn test_maxquant_read() {
    let dir = tempdir().unwrap();
    let file = maxquant_file(dir.path());
    let rows = MaxQuant::new(&file).read_result(&ReadOptions::new()).unwrap();

    // _PEPK_ is too short
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].modified_sequence, "DS[UNIMOD:21]DS[UNIMOD:21]WDADAFSVEDPVRK");
    assert_eq!(rows[0].sequence, "DSDSWDADAFSVEDPVRK");
    assert_eq!(rows[0].peptide_length, 18);
    assert_eq!(rows[0].fragmentation.as_deref(), Some("HCD"));
    assert_eq!(rows[0].mass_analyzer.as_deref(), Some("FTMS"));
    assert_eq!(rows[0].calculated_mass, Some(2000.5));
    assert_eq!(rows[0].retention_time, Some(0.0));

    assert_eq!(rows[2].modified_sequence, "[UNIMOD:1]-M[UNIMOD:35]PEPTIDEK");
    assert!(rows[2].reverse);
    assert!(!rows[0].reverse);
}

#[test]
fn test_maxquant_silac() {
    let dir = tempdir().unwrap();
    let file = maxquant_file(dir.path());
    let rows = MaxQuant::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Silac))
        .unwrap();

    assert_eq!(
        rows[0].modified_sequence,
        "DS[UNIMOD:21]DS[UNIMOD:21]WDADAFSVEDPVR[UNIMOD:267]K[UNIMOD:259]"
    );
    assert_eq!(rows[1].modified_sequence, "DS[UNIMOD:21]DS[UNIMOD:21]WDADAFSVEDPVRK");
}

#[test]
fn test_maxquant_tmt() {
    let dir = tempdir().unwrap();
    let file = maxquant_file(dir.path());
    let rows = MaxQuant::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap();

    assert_eq!(
        rows[0].modified_sequence,
        "[UNIMOD:737]-DS[UNIMOD:21]DS[UNIMOD:21]WDADAFSVEDPVRK[UNIMOD:737]"
    );
    // an acetylated n-terminus keeps its acetyl tag
    assert_eq!(rows[2].modified_sequence, "[UNIMOD:1]-M[UNIMOD:35]PEPTIDEK[UNIMOD:737]");
}

#[test]
fn test_maxquant_missing_column() {
    let dir = tempdir().unwrap();
    let file = write(
        dir.path(),
        "msms.txt",
        &["Raw file\tScan number\tCharge", "run\t1\t2"],
    );
    let err = MaxQuant::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    assert!(matches!(err, ConversionError::MissingColumn { column, .. } if column == "Modified sequence"));
}

#[test]
fn test_maxquant_invalid_value() {
    let dir = tempdir().unwrap();
    let file = write(
        dir.path(),
        "msms.txt",
        &[
            &tsv(MSMS_HEADER),
            &tsv(&["run01", "100", "_PEPTIDEK_", "two", "1000.0", "1.0", "", "P1", "0"]),
        ],
    );
    let err = MaxQuant::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    match err {
        ConversionError::InvalidValue { column, value, line, .. } => {
            assert_eq!(column, "Charge");
            assert_eq!(value, "two");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// MSFragger
// ---------------------------------------------------------------------------

const PEPXML: &[&str] = &[
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<msms_pipeline_analysis xmlns="http://regis-web.systemsbiology.net/pepXML">"#,
    r#"<msms_run_summary base_name="run01">"#,
    r#"<spectrum_query spectrum="run01.01234.01234.2" start_scan="1234" end_scan="1234" precursor_neutral_mass="1024.5" assumed_charge="2" index="7" retention_time_sec="1800.5">"#,
    r#"<search_result>"#,
    r#"<search_hit hit_rank="1" peptide="PEPTMIDEK" protein="sp|P12345|PROT" calc_neutral_pep_mass="1024.49">"#,
    r#"<alternative_protein protein="sp|P67890|OTHER"/>"#,
    r#"<modification_info modified_peptide="PEPTM[147]IDEK">"#,
    r#"<mod_aminoacid_mass position="5" mass="147.0354"/>"#,
    r#"</modification_info>"#,
    r#"<search_score name="hyperscore" value="31.2"/>"#,
    r#"<search_score name="nextscore" value="20.0"/>"#,
    r#"</search_hit>"#,
    r#"</search_result>"#,
    r#"</spectrum_query>"#,
    r#"<spectrum_query spectrum="run01.02000.02000.3" start_scan="2000" precursor_neutral_mass="1500.0" assumed_charge="3" index="8">"#,
    r#"<search_result>"#,
    r#"<search_hit hit_rank="1" peptide="ACDEFGHIK" protein="rev_sp|P1|X" calc_neutral_pep_mass="1500.1">"#,
    r#"<alternative_protein protein="rev_sp|P2|Y"/>"#,
    r#"<search_score name="hyperscore" value="12.0"/>"#,
    r#"</search_hit>"#,
    r#"</search_result>"#,
    r#"</spectrum_query>"#,
    r#"</msms_run_summary>"#,
    r#"</msms_pipeline_analysis>"#,
];

#[test]
fn test_msfragger_read() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "run01.pepXML", PEPXML);
    let rows = MsFragger::new(&file).read_result(&ReadOptions::new()).unwrap();

    assert_eq!(rows.len(), 2);
    let first = &rows[0];
    assert_eq!(first.raw_file, "run01");
    assert_eq!(first.scan_number, 1234);
    assert_eq!(first.precursor_charge, 2);
    assert_eq!(first.mass, 1024.5);
    assert_eq!(first.score, 31.2);
    assert_eq!(first.modified_sequence, "PEPTM[UNIMOD:35]IDEK");
    assert_eq!(first.proteins, "sp|P12345|PROT;sp|P67890|OTHER");
    assert_eq!(first.retention_time, Some(1800.5));
    assert_eq!(first.scan_event_number, Some(7));
    assert_eq!(first.calculated_mass, Some(1024.49));
    assert!(!first.reverse);

    assert_eq!(rows[1].modified_sequence, "AC[UNIMOD:4]DEFGHIK");
    assert!(rows[1].reverse);
    assert_eq!(rows[1].retention_time, None);
}

#[test]
fn test_msfragger_walks_subdirectories() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("fraction1");
    fs::create_dir(&nested).unwrap();
    write(&nested, "run01.pepxml", PEPXML);

    let rows = MsFragger::new(dir.path()).read_result(&ReadOptions::new()).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_msfragger_tmt() {
    let dir = tempdir().unwrap();
    let lines: Vec<String> = PEPXML
        .iter()
        .map(|line| {
            line.replace(
                r#"modified_peptide="PEPTM[147]IDEK""#,
                r#"modified_peptide="n[230]PEPTM[147]IDEK[357]""#,
            )
        })
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write(dir.path(), "tmt.pepXML", &lines);

    let rows = MsFragger::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap();
    assert_eq!(rows[0].modified_sequence, "[UNIMOD:737]-PEPTM[UNIMOD:35]IDEK[UNIMOD:737]");
    // a bare lysine is labelled as well, the n-terminus only when annotated
    assert_eq!(rows[1].modified_sequence, "AC[UNIMOD:4]DEFGHIK[UNIMOD:737]");
}

#[test]
fn test_msfragger_tmt_leaves_other_lysine_masses() {
    let dir = tempdir().unwrap();
    let lines: Vec<String> = PEPXML
        .iter()
        .map(|line| {
            line.replace(
                r#"modified_peptide="PEPTM[147]IDEK""#,
                r#"modified_peptide="n[230]PEPTM[147]IDEK[170]""#,
            )
        })
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write(dir.path(), "tmt.pepXML", &lines);

    // an acetylated lysine is not a label and fails the sequence grammar
    let rows = MsFragger::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].modified_sequence, "AC[UNIMOD:4]DEFGHIK[UNIMOD:737]");
}

#[test]
fn test_msfragger_decodes_escaped_attributes() {
    let dir = tempdir().unwrap();
    let lines: Vec<String> = PEPXML
        .iter()
        .map(|line| line.replace("sp|P67890|OTHER", "sp|P67890|A&amp;B"))
        .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let file = write(dir.path(), "run01.pepXML", &lines);

    let rows = MsFragger::new(&file).read_result(&ReadOptions::new()).unwrap();
    assert_eq!(rows[0].proteins, "sp|P12345|PROT;sp|P67890|A&B");
}

#[test]
fn test_msfragger_self_closing_hit_is_not_dropped() {
    let dir = tempdir().unwrap();
    let mut lines: Vec<&str> = PEPXML.to_vec();
    let hit = r#"<search_hit hit_rank="1" peptide="ACDEFGHIK" protein="rev_sp|P1|X" calc_neutral_pep_mass="1500.1"/>"#;
    let start = lines.iter().position(|line| line.contains(r#"peptide="ACDEFGHIK""#)).unwrap();
    let end = start + lines[start..].iter().position(|line| *line == "</search_hit>").unwrap();
    lines.splice(start..=end, [hit]);
    let file = write(dir.path(), "run01.pepXML", &lines);

    // a hit without scores surfaces as an error instead of vanishing
    let err = MsFragger::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    assert!(matches!(err, ConversionError::MissingColumn { column, .. } if column == "hyperscore"));
}

#[test]
fn test_msfragger_missing_hyperscore() {
    let dir = tempdir().unwrap();
    let lines: Vec<&str> = PEPXML
        .iter()
        .copied()
        .filter(|line| !line.contains("hyperscore"))
        .collect();
    let file = write(dir.path(), "run01.pepXML", &lines);
    let err = MsFragger::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    assert!(matches!(err, ConversionError::MissingColumn { column, .. } if column == "hyperscore"));
}

// ---------------------------------------------------------------------------
// Sage
// ---------------------------------------------------------------------------

const SAGE_HEADER: &[&str] = &[
    "psm_id", "peptide", "proteins", "filename", "scannr", "label", "expmass", "calcmass", "charge",
    "rt", "hyperscore",
];

fn sage_file(dir: &Path, peptides: &[&str]) -> PathBuf {
    let mut lines = vec![tsv(SAGE_HEADER)];
    lines.push(tsv(&[
        "1",
        peptides[0],
        "sp|P1",
        "run01.mzML",
        "controllerType=0 controllerNumber=1 scan=42",
        "1",
        "1000.2",
        "1000.5",
        "2",
        "12.5",
        "40.2",
    ]));
    lines.push(tsv(&[
        "2",
        peptides[1],
        "",
        "run02.MZML",
        "scan=7",
        "-1",
        "900.0",
        "900.1",
        "3",
        "13.0",
        "20.0",
    ]));
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    write(dir, "results.sage.tsv", &lines)
}

#[test]
fn test_sage_read() {
    let dir = tempdir().unwrap();
    let file = sage_file(dir.path(), &["PEPTC[+57.0215]M[+15.9949]K", "LESLIEKR"]);
    let rows = Sage::new(&file).read_result(&ReadOptions::new()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].raw_file, "run01");
    assert_eq!(rows[0].scan_number, 42);
    assert_eq!(rows[0].modified_sequence, "PEPTC[UNIMOD:4]M[UNIMOD:35]K");
    assert_eq!(rows[0].mass, 1000.5);
    assert_eq!(rows[0].retention_time, Some(12.5));
    assert!(!rows[0].reverse);

    assert_eq!(rows[1].raw_file, "run02");
    assert_eq!(rows[1].scan_number, 7);
    assert_eq!(rows[1].proteins, "UNKNOWN");
    assert!(rows[1].reverse);
}

#[test]
fn test_sage_empty_custom_mods_disable_defaults() {
    let dir = tempdir().unwrap();
    let file = sage_file(dir.path(), &["PEPTC[+57.0215]M[+15.9949]K", "LESLIEKR"]);
    let rows = Sage::new(&file)
        .read_result(&ReadOptions::new().with_custom_mods(CustomMods::new()))
        .unwrap();

    // the untranslated row no longer passes the filter
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].modified_sequence, "LESLIEKR");
}

#[test]
fn test_sage_tmt() {
    let dir = tempdir().unwrap();
    let file = sage_file(
        dir.path(),
        &["[+229.1629]-PEPTIDEK[+229.1629]", "[+229.1629]-LESLIEK[+229.1629]R"],
    );
    let rows = Sage::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap();

    assert_eq!(rows[0].modified_sequence, "[UNIMOD:737]-PEPTIDEK[UNIMOD:737]");
    assert_eq!(rows[1].modified_sequence, "[UNIMOD:737]-LESLIEK[UNIMOD:737]R");
}

#[test]
fn test_sage_tmt_leaves_other_lysine_shifts() {
    let dir = tempdir().unwrap();
    let file = sage_file(
        dir.path(),
        &["[+229.1629]-PEPTIDEK[+42.0106]R", "[+229.1629]-LESLIEK[+229.1629]R"],
    );
    let rows = Sage::new(&file)
        .read_result(&ReadOptions::new().with_label(LabelChemistry::Tmt))
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].modified_sequence, "[UNIMOD:737]-LESLIEK[UNIMOD:737]R");
}

#[test]
fn test_sage_c_terminal_mod_is_filtered() {
    let dir = tempdir().unwrap();
    let file = sage_file(dir.path(), &["PEPTIDEK[-0.98]", "LESLIEKR"]);
    let mods: CustomMods = [("$[-0.98]", 2)].into_iter().collect();
    let rows = Sage::new(&file)
        .read_result(&ReadOptions::new().with_custom_mods(mods))
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].modified_sequence, "LESLIEKR");
}

// ---------------------------------------------------------------------------
// MSAmanda
// ---------------------------------------------------------------------------

#[test]
fn test_msamanda_read() {
    let dir = tempdir().unwrap();
    let header = tsv(&[
        "Scan Number",
        "Title",
        "Sequence",
        "Modifications",
        "Protein Accessions",
        "Amanda Score",
        "m/z",
        "Charge",
        "RT",
        "Filename",
    ]);
    let target = tsv(&[
        "1234", "t1", "PEPTmIDEcK", "M5(Oxidation|15.99)", "sp|P1", "250.5", "500.5", "2", "30.2",
        "run01.raw",
    ]);
    let decoy = tsv(&[
        "1300", "t2", "ACDEFGHIKR", "", "REV_sp|P2", "20.0", "400.0", "3", "31.0", "run01.raw",
    ]);
    let file = write(dir.path(), "output.csv", &["#version: 2.0.0", &header, &target, &decoy]);

    let rows = MsAmanda::new(&file).read_result(&ReadOptions::new()).unwrap();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first.raw_file, "run01");
    assert_eq!(first.scan_number, 1234);
    assert_eq!(first.modified_sequence, "PEPTM[UNIMOD:35]IDEC[UNIMOD:4]K");
    assert_eq!(first.sequence, "PEPTMIDECK");
    assert_eq!(first.peptide_length, 10);
    assert!((first.mass - 2.0 * (500.5 - crate::constants::PROTON_MASS)).abs() < 1e-9);
    assert_eq!(first.retention_time, Some(30.2));
    assert!(!first.reverse);

    assert!(rows[1].reverse);
}

// ---------------------------------------------------------------------------
// XlinkX
// ---------------------------------------------------------------------------

#[test]
fn test_apply_annotations() {
    assert_eq!(
        apply_annotations("PEPKMIDER", "K4(DSSO);M5(Oxidation)", 4).unwrap(),
        "PEPK[UNIMOD:1896]M[UNIMOD:35]IDER"
    );
    assert_eq!(
        apply_annotations("LKCNPQR", "K2(DSBU); C3(Carbamidomethyl)", 2).unwrap(),
        "LK[UNIMOD:1884]C[UNIMOD:4]NPQR"
    );
    assert_eq!(apply_annotations("PEPKIR", "nan", 4).unwrap(), "PEPKIR");
    assert_eq!(apply_annotations("PEPKIR", "", 4).unwrap(), "PEPKIR");
    assert_eq!(
        apply_annotations("PEPKIR", "K4(BS3)", 4),
        Err(AnnotationError::Unknown("BS3".to_string()))
    );
    assert_eq!(
        apply_annotations("PEPKIR", "M9(Oxidation)", 4),
        Err(AnnotationError::Position("M9(Oxidation)".to_string()))
    );
    // the annotated residue must match the modification's target
    assert_eq!(
        apply_annotations("PEPCIDEK", "C4(Oxidation)", 8),
        Err(AnnotationError::Position("C4(Oxidation)".to_string()))
    );
    assert_eq!(
        apply_annotations("PEPKIR", "K4(DSSO)", 2),
        Err(AnnotationError::Position("K4(DSSO)".to_string()))
    );
}

const XLINKX_HEADER: &[&str] = &[
    "Sequence",
    "Crosslinker",
    "Crosslink Type",
    "XlinkX Score",
    "Charge",
    "MH+ [Da]",
    "First Scan",
    "RT [min]",
    "Is Decoy",
    "Sequence A",
    "Modifications A",
    "Crosslinker Position A",
    "Protein Accession A",
    "Sequence B",
    "Modifications B",
    "Crosslinker Position B",
    "Protein Accession B",
    "Spectrum File",
];

fn xlinkx_row(mods_a: &str, sequence_b: &str, decoy: &str) -> String {
    tsv(&[
        "x", "DSSO", "Inter", "120.5", "4", "2500.1", "5678", "42.0", decoy, "PEPKMIDER", mods_a,
        "4", "P1", sequence_b, "K2(DSSO)", "2", "P2", "cl_run.raw",
    ])
}

#[test]
fn test_xlinkx_read() {
    let dir = tempdir().unwrap();
    let header = tsv(XLINKX_HEADER);
    let kept = xlinkx_row("K4(DSSO);M5(Oxidation)", "LKCNPQR", "False");
    let decoy = xlinkx_row("nan", "LKMNPQRS", "True");
    let short = xlinkx_row("nan", "LKR", "False");
    let file = write(dir.path(), "run_CSMs.txt", &[&header, &kept, &decoy, &short]);

    let rows = XlinkX::new(&file).read_result(&ReadOptions::new()).unwrap();
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first.raw_file, "cl_run");
    assert_eq!(first.scan_number, 5678);
    assert_eq!(first.crosslinker_type, "DSSO");
    assert_eq!(first.proteins, "P1;P2");
    assert_eq!(first.modified_sequence_a, "PEPK[UNIMOD:1896]M[UNIMOD:35]IDER");
    assert_eq!(first.modified_sequence_b, "LK[UNIMOD:1896]CNPQR");
    assert_eq!(first.peptide_length_a, 9);
    assert_eq!(first.crosslinker_position_b, 2);
    assert_eq!(first.retention_time, Some(42.0));
    assert!(!first.reverse);

    assert_eq!(rows[1].modified_sequence_a, "PEPKMIDER");
    assert!(rows[1].reverse);
}

#[test]
fn test_xlinkx_unknown_modification() {
    let dir = tempdir().unwrap();
    let header = tsv(XLINKX_HEADER);
    let row = xlinkx_row("K4(BS3)", "LKCNPQR", "False");
    let file = write(dir.path(), "run_CSMs.txt", &[&header, &row]);

    let err = XlinkX::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::UnknownModification { modification, sequence }
            if modification == "BS3" && sequence == "PEPKMIDER"
    ));
}

#[test]
fn test_xlinkx_mismatched_residue() {
    let dir = tempdir().unwrap();
    let header = tsv(XLINKX_HEADER);
    let row = xlinkx_row("K4(DSSO);C5(Carbamidomethyl)", "LKCNPQR", "False");
    let file = write(dir.path(), "run_CSMs.txt", &[&header, &row]);

    let err = XlinkX::new(&file).read_result(&ReadOptions::new()).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::InvalidValue { column, value, .. }
            if column == "Modifications A" && value == "C5(Carbamidomethyl)"
    ));
}

// ---------------------------------------------------------------------------
// Internal format generation
// ---------------------------------------------------------------------------

#[test]
fn test_generate_internal_writes_and_short_circuits() {
    let dir = tempdir().unwrap();
    let input = maxquant_file(dir.path());
    let out = dir.path().join("internal.parquet");

    let rows = generate_internal(&MaxQuant::new(&input), &ReadOptions::new(), Some(&out)).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(read_file(&out).unwrap(), rows);

    // the existing table is returned without touching the input
    fs::remove_file(&input).unwrap();
    let cached = generate_internal(&MaxQuant::new(&input), &ReadOptions::new(), Some(&out)).unwrap();
    assert_eq!(cached, rows);
}

#[test]
fn test_generate_internal_without_output() {
    let dir = tempdir().unwrap();
    let input = maxquant_file(dir.path());
    let rows = generate_internal(&MaxQuant::new(&input), &ReadOptions::new(), None).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_failed_conversion_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = maxquant_file(dir.path());
    let out = dir.path().join("internal.csv");

    let err = generate_internal(
        &MsAmanda::new(&input),
        &ReadOptions::new().with_label(LabelChemistry::Tmt),
        Some(&out),
    )
    .unwrap_err();
    assert!(matches!(err, ConversionError::UnsupportedFeature(_)));
    assert!(!out.exists());
}

#[test]
fn test_convert_dispatch() {
    let dir = tempdir().unwrap();
    let input = maxquant_file(dir.path());
    let out = dir.path().join("internal.csv");

    let summary = convert(
        SearchEngineKind::MaxQuant,
        &input,
        &ReadOptions::new(),
        Some(&out),
        &WriterConfig::default(),
    )
    .unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.to_string(), "Converted 3 rows of maxquant results");
    assert!(out.exists());
}
