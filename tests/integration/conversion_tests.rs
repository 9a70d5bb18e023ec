/*!
 * Tests for conversion between the text and SQLite mapping formats
 */

use std::fs;

use sqlid_translator::convert::{ConversionMode, convert_file, target_path};
use sqlid_translator::errors::StoreError;
use sqlid_translator::store::yaml::parse_mapping;

use crate::common::{SAMPLE_MAPPING, create_sample_mapping, create_temp_dir, create_test_file};

#[test]
fn test_roundTrip_textToSqliteToText_shouldPreserveEntries() {
    let dir = create_temp_dir().unwrap();
    let source = create_sample_mapping(dir.path()).unwrap();

    let (db_path, written) = convert_file(&source, ConversionMode::YamlToSqlite).unwrap();
    assert_eq!(written, 3);
    assert_eq!(db_path, dir.path().join("mapping.db"));

    // The original text file occupies mapping.yaml, so dump from a copy
    let copy = dir.path().join("copy.db");
    fs::copy(&db_path, &copy).unwrap();
    let (yaml_path, dumped) = convert_file(&copy, ConversionMode::SqliteToYaml).unwrap();
    assert_eq!(dumped, 3);
    assert_eq!(yaml_path, dir.path().join("copy.yaml"));

    let original = parse_mapping(SAMPLE_MAPPING).unwrap();
    let restored = parse_mapping(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_roundTrip_withIndentedAndEmptyLines_shouldPreserveEntries() {
    let dir = create_temp_dir().unwrap();
    let content = "a2dk8bdn0ujx7: |-\n  select *\n  \n    from emp\n520mkxqpf15q8: \n";
    let source = create_test_file(dir.path(), "odd.yaml", content).unwrap();

    let (db_path, _) = convert_file(&source, ConversionMode::YamlToSqlite).unwrap();
    let copy = dir.path().join("odd-copy.db");
    fs::copy(&db_path, &copy).unwrap();
    let (yaml_path, _) = convert_file(&copy, ConversionMode::SqliteToYaml).unwrap();

    let restored = parse_mapping(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(restored["a2dk8bdn0ujx7"], "select *\n\n  from emp\n");
    assert_eq!(restored["520mkxqpf15q8"], "");
    assert_eq!(restored, parse_mapping(content).unwrap());
}

#[test]
fn test_roundTrip_withBlockEndingInIndentedBlankLine_shouldPreserveEntries() {
    let dir = create_temp_dir().unwrap();
    let content = "a2dk8bdn0ujx7: |-\n  select 1\n  \n520mkxqpf15q8: x\n";
    let source = create_test_file(dir.path(), "trailing.yaml", content).unwrap();
    let original = parse_mapping(content).unwrap();
    assert_eq!(original["a2dk8bdn0ujx7"], "select 1\n\n");

    let (db_path, _) = convert_file(&source, ConversionMode::YamlToSqlite).unwrap();
    let copy = dir.path().join("trailing-copy.db");
    fs::copy(&db_path, &copy).unwrap();
    let (yaml_path, _) = convert_file(&copy, ConversionMode::SqliteToYaml).unwrap();

    let restored = parse_mapping(&fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(restored["a2dk8bdn0ujx7"], "select 1\n\n");
    assert_eq!(restored, original);
}

#[test]
fn test_convertFile_withExistingTarget_shouldRefuseToOverwrite() {
    let dir = create_temp_dir().unwrap();
    let source = create_sample_mapping(dir.path()).unwrap();
    let existing = create_test_file(dir.path(), "mapping.db", "keep me").unwrap();

    let result = convert_file(&source, ConversionMode::YamlToSqlite);
    assert!(matches!(result, Err(StoreError::TargetExists(_))));
    assert_eq!(fs::read_to_string(existing).unwrap(), "keep me");
}

#[test]
fn test_convertFile_withMalformedSource_shouldFailWithoutTarget() {
    let dir = create_temp_dir().unwrap();
    let source = create_test_file(dir.path(), "bad.yaml", "not a valid mapping line\n").unwrap();

    let result = convert_file(&source, ConversionMode::YamlToSqlite);
    assert!(matches!(result, Err(StoreError::Format { .. })));
    assert!(!target_path(&source, ConversionMode::YamlToSqlite).exists());
}

#[test]
fn test_convertFile_withRejectedKey_shouldLeaveNoTargetAndAllowRetry() {
    let dir = create_temp_dir().unwrap();
    // 13 bytes but only 7 characters, so the store rejects the key
    let source = create_test_file(dir.path(), "accents.yaml", "ééééééa: select 1\n").unwrap();
    let target = target_path(&source, ConversionMode::YamlToSqlite);

    let first = convert_file(&source, ConversionMode::YamlToSqlite);
    assert!(matches!(first, Err(StoreError::Database(_))));
    assert!(!target.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);

    let second = convert_file(&source, ConversionMode::YamlToSqlite);
    assert!(matches!(second, Err(StoreError::Database(_))));

    fs::write(&source, "520mkxqpf15q8: select 2 from dual\n").unwrap();
    let (db_path, written) = convert_file(&source, ConversionMode::YamlToSqlite).unwrap();
    assert_eq!(db_path, target);
    assert_eq!(written, 1);
}

#[test]
fn test_convertFile_sqliteToYaml_shouldLeaveOnlyTheTarget() {
    let dir = create_temp_dir().unwrap();
    let source = create_sample_mapping(dir.path()).unwrap();
    let (db_path, _) = convert_file(&source, ConversionMode::YamlToSqlite).unwrap();
    fs::remove_file(&source).unwrap();

    let (yaml_path, dumped) = convert_file(&db_path, ConversionMode::SqliteToYaml).unwrap();
    assert_eq!(dumped, 3);
    assert_eq!(yaml_path, source);

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["mapping.db".to_string(), "mapping.yaml".to_string()]);
}

#[test]
fn test_convertFile_sqliteToYaml_withTextSource_shouldBeIncompatible() {
    let dir = create_temp_dir().unwrap();
    let source = create_test_file(dir.path(), "mapping.db", SAMPLE_MAPPING).unwrap();

    let result = convert_file(&source, ConversionMode::SqliteToYaml);
    assert!(matches!(result, Err(StoreError::IncompatibleFormat(_))));
}
