use super::*;
use crate::search_result::{CrosslinkPsm, Psm};
use std::collections::HashMap;

fn sample_psms() -> Vec<Psm> {
    let mut first = Psm::new("run01", 1234, 2, 1024.5, 88.0, false, "P12345")
        .with_modified_sequence("[UNIMOD:737]-PEPTIDEK[UNIMOD:737]");
    first.retention_time = Some(31.5);
    first.fragmentation = Some("HCD".to_string());
    first.calculated_mass = Some(1024.49);

    let second = Psm::new("run02", 17, 3, 2048.0, 12.5, true, "REV_P1;REV_P2")
        .with_modified_sequence("ACDM[UNIMOD:35]EFGHIK");

    vec![first, second]
}

fn sample_crosslink() -> CrosslinkPsm {
    CrosslinkPsm {
        raw_file: "xl_run".to_string(),
        scan_number: 5,
        precursor_charge: 4,
        mass: 3001.5,
        score: 140.0,
        reverse: false,
        crosslinker_type: "DSSO".to_string(),
        proteins: "P1;P2".to_string(),
        retention_time: Some(42.0),
        sequence_a: "PEPKTIDE".to_string(),
        modified_sequence_a: "PEPK[UNIMOD:1896]TIDE".to_string(),
        peptide_length_a: 8,
        crosslinker_position_a: 4,
        sequence_b: "LKMNPQR".to_string(),
        modified_sequence_b: "LK[UNIMOD:1896]M[UNIMOD:35]NPQR".to_string(),
        peptide_length_b: 7,
        crosslinker_position_b: 2,
    }
}

#[test]
fn test_parquet_round_trip() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("msms.parquet");
    let rows = sample_psms();

    write_file(&rows, &path)?;
    assert_eq!(read_file(&path)?, rows);
    Ok(())
}

#[test]
fn test_csv_round_trip() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("msms.csv");
    let rows = sample_psms();

    write_file(&rows, &path)?;
    let header = std::fs::read_to_string(&path)?;
    assert!(header.starts_with("RAW_FILE,SCAN_NUMBER,MODIFIED_SEQUENCE"));
    assert_eq!(read_file(&path)?, rows);
    Ok(())
}

#[test]
fn test_crosslink_round_trip() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("xl.parquet");
    let rows = vec![sample_crosslink()];

    write_crosslink_file(&rows, &path)?;
    assert_eq!(read_crosslink_file(&path)?, rows);
    Ok(())
}

#[test]
fn test_unsupported_extension() {
    let rows = sample_psms();
    assert!(matches!(
        write_file(&rows, "table.xlsx"),
        Err(TableError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        TableFormat::from_path(std::path::Path::new("table")),
        Err(TableError::UnsupportedFormat(_))
    ));
    assert_eq!(
        TableFormat::from_path(std::path::Path::new("TABLE.Parquet")).unwrap(),
        TableFormat::Parquet
    );
}

#[test]
fn test_footer_metadata() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("msms.parquet");
    let mut metadata = HashMap::new();
    metadata.insert("spectrum_io:source".to_string(), "{}".to_string());

    write_table_with(&sample_psms(), &path, &WriterConfig::fast_write(), &metadata)?;

    let footer = read_footer_metadata(&path)?;
    assert_eq!(footer.get("spectrum_io:source").unwrap(), "{}");
    assert_eq!(
        footer.get(crate::schema::KEY_FORMAT_VERSION).unwrap(),
        crate::schema::FORMAT_VERSION
    );
    assert_eq!(footer.get(crate::schema::KEY_TABLE_KIND).unwrap(), "psm");
    Ok(())
}

#[test]
fn test_psm_table_rejected_as_crosslink_table() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("msms.parquet");
    write_file(&sample_psms(), &path)?;

    assert!(matches!(
        read_crosslink_file(&path),
        Err(TableError::SchemaError(_))
    ));
    Ok(())
}

#[test]
fn test_partitions() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let rows = sample_psms();
    let tables = vec![rows[..1].to_vec(), rows[1..].to_vec()];

    write_partition(&tables, dir.path(), &["1", "2"])?;
    assert!(dir.path().join("1.parquet").is_file());

    let first: Vec<Psm> = read_partition(dir.path(), "1")?;
    assert_eq!(first, tables[0]);

    // Rewriting one key leaves the other partition alone
    write_partition(&[rows.clone()], dir.path(), &["1"])?;
    let first: Vec<Psm> = read_partition(dir.path(), "1")?;
    let second: Vec<Psm> = read_partition(dir.path(), "2")?;
    assert_eq!(first.len(), 2);
    assert_eq!(second, tables[1]);
    Ok(())
}

#[test]
fn test_partition_errors() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let rows = sample_psms();

    assert!(matches!(
        write_partition(&[rows], dir.path(), &["a", "b"]),
        Err(TableError::PartitionMismatch { tables: 1, keys: 2 })
    ));
    assert!(matches!(
        read_partition::<Psm, _>(dir.path(), "missing"),
        Err(TableError::PartitionNotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_empty_table() -> Result<(), TableError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.parquet");
    write_file(&[], &path)?;
    assert!(read_file(&path)?.is_empty());
    Ok(())
}
