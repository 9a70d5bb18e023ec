/*!
 * Tests for the structured-text mapping format
 */

use std::collections::HashMap;

use sqlid_translator::errors::StoreError;
use sqlid_translator::store::yaml::{parse_mapping, read_mapping, write_entry, write_mapping};

use crate::common::SAMPLE_MAPPING;

#[test]
fn test_parseMapping_withSampleFile_shouldReadAllEntries() {
    let mapping = parse_mapping(SAMPLE_MAPPING).unwrap();

    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping["520mkxqpf15q8"], "select 2 from dual");
    assert_eq!(
        mapping["a2dk8bdn0ujx7"],
        "SELECT empno, ename\nFROM emp\nWHERE deptno = 10\n"
    );
}

#[test]
fn test_parseMapping_withEmptySource_shouldBeEmpty() {
    assert!(parse_mapping("").unwrap().is_empty());
    assert!(parse_mapping("\n   \n\t\n").unwrap().is_empty());
}

#[test]
fn test_parseMapping_withCrlfLineEndings_shouldStripThem() {
    let mapping = parse_mapping("a2dk8bdn0ujx7: |-\r\n  select *\r\n  from emp\r\n").unwrap();
    assert_eq!(mapping["a2dk8bdn0ujx7"], "select *\nfrom emp\n");
}

#[test]
fn test_parseMapping_withTabAfterColon_shouldSkipIt() {
    let mapping = parse_mapping("520mkxqpf15q8:\t select 2 from dual\n").unwrap();
    assert_eq!(mapping["520mkxqpf15q8"], "select 2 from dual");
}

#[test]
fn test_parseMapping_withSingleSpaceIndent_shouldEndBlockAndFail() {
    let source = "a2dk8bdn0ujx7: |-\n  select *\n from emp where deptno = 10\n";
    let err = parse_mapping(source).unwrap_err();
    assert!(matches!(err, StoreError::Format { line: 3, .. }));
}

#[test]
fn test_parseMapping_withEmptyBlock_shouldStoreEmptyText() {
    let mapping = parse_mapping("a2dk8bdn0ujx7: |-\n520mkxqpf15q8: x\n").unwrap();
    assert_eq!(mapping["a2dk8bdn0ujx7"], "");
    assert_eq!(mapping["520mkxqpf15q8"], "x");
}

#[test]
fn test_parseMapping_withKeyOnlyLine_shouldFail() {
    let err = parse_mapping("520mkxqpf15q8:\n").unwrap_err();
    assert!(matches!(err, StoreError::Format { line: 1, .. }));
}

#[test]
fn test_readMapping_fromReader_shouldMatchParse() {
    let from_reader = read_mapping(SAMPLE_MAPPING.as_bytes()).unwrap();
    assert_eq!(from_reader, parse_mapping(SAMPLE_MAPPING).unwrap());
}

#[test]
fn test_writeEntry_withSingleLine_shouldWriteInline() {
    let mut out = Vec::new();
    write_entry(&mut out, "520mkxqpf15q8", "select 2 from dual").unwrap();
    assert_eq!(out, b"520mkxqpf15q8: select 2 from dual\n");
}

#[test]
fn test_writeMapping_thenParse_shouldPreserveEntries() {
    let parsed = parse_mapping(SAMPLE_MAPPING).unwrap();

    let mut out = Vec::new();
    write_mapping(&mut out, parsed.clone()).unwrap();
    let reparsed: HashMap<String, String> =
        parse_mapping(std::str::from_utf8(&out).unwrap()).unwrap();

    assert_eq!(reparsed, parsed);
}
