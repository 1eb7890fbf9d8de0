//! Tests for output module

use super::*;
use crate::record::ProjectedRecord;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn sample() -> Vec<ProjectedRecord> {
    vec![
        ProjectedRecord::new(
            "Rick Sanchez",
            "Citadel of Ricks",
            "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
        ),
        ProjectedRecord::new(
            "Beth Smith",
            "Earth (Replacement Dimension)",
            "https://rickandmortyapi.com/api/character/avatar/4.jpeg",
        ),
    ]
}

// ============================================================================
// CSV Tests
// ============================================================================

#[test]
fn test_write_csv_header_and_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("characters.csv");

    let written = write_csv(&path, &sample()).unwrap();

    assert_eq!(written, path);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "name,location,image\r\n\
         Rick Sanchez,Citadel of Ricks,https://rickandmortyapi.com/api/character/avatar/1.jpeg\r\n\
         Beth Smith,Earth (Replacement Dimension),https://rickandmortyapi.com/api/character/avatar/4.jpeg\r\n"
    );
}

#[test]
fn test_write_csv_header_only_when_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");

    write_csv(&path, &[]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "name,location,image\r\n");
}

#[test]
fn test_csv_quoting() {
    let records = vec![ProjectedRecord::new(
        "Rick \"Tiny\" Sanchez",
        "Earth, C-137",
        "tiny.png",
    )];

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quoted.csv");

    write_csv(&path, &records).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "name,location,image\r\n\"Rick \"\"Tiny\"\" Sanchez\",\"Earth, C-137\",tiny.png\r\n"
    );
}

#[test]
fn test_csv_utf8() {
    let records = vec![ProjectedRecord::new("Señor Ñ", "Gazorpazorp 🪐", "n.png")];
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("utf8.csv");

    write_csv(&path, &records).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("Señor Ñ,Gazorpazorp 🪐,n.png"));
}

#[test]
fn test_atomic_writer_drop_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("characters.csv");

    {
        let mut writer = AtomicCsvWriter::create(&path).unwrap();
        writer.write(&sample()[0]).unwrap();
        // dropped without finish()
    }

    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_atomic_writer_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("characters.csv");
    fs::write(&path, "OLD_CONTENT").unwrap();

    write_csv(&path, &sample()[..1]).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("OLD_CONTENT"));
    assert!(content.starts_with("name,location,image\r\nRick Sanchez,"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_csv_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no/such/dir/characters.csv");

    let err = write_csv(&path, &sample()).unwrap_err();

    assert_eq!(err.kind(), "sink");
    assert!(!path.exists());
}

#[test]
fn test_rows_end_with_crlf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("characters.csv");

    write_csv(&path, &sample()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("\r\n").count(), 3);
    assert_eq!(content.matches('\n').count(), 3);
}

#[test]
fn test_default_csv_path() {
    assert_eq!(DEFAULT_CSV_PATH, "characters.csv");
}

// ============================================================================
// JSON Tests
// ============================================================================

#[test]
fn test_to_json_string_compact() {
    let json = to_json_string(&sample()[..1], false).unwrap();
    assert_eq!(
        json,
        r#"[{"name":"Rick Sanchez","location":"Citadel of Ricks","image":"https://rickandmortyapi.com/api/character/avatar/1.jpeg"}]"#
    );
}

#[test]
fn test_to_json_string_empty() {
    assert_eq!(to_json_string(&[], false).unwrap(), "[]");
}

#[test]
fn test_write_json_pretty_round_trips() {
    let mut out = Vec::new();
    write_json(&mut out, &sample(), true).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("]\n"));
    let parsed: Vec<ProjectedRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, sample());
}
