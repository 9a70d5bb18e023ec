/*!
 * Tests for the mapping store backends behind the lookup capability
 */

use sqlid_translator::convert::{ConversionMode, convert_file};
use sqlid_translator::errors::StoreError;
use sqlid_translator::sql_id::sql_id;
use sqlid_translator::store::{MappingStore, MemoryStore, SqliteStore, StoreKind, open_store};

use crate::common::{create_sample_mapping, create_temp_dir, create_test_file, init_logging};

/// Lookups every backend must agree on
fn assert_sample_lookups(store: &dyn MappingStore) {
    assert_eq!(store.len().unwrap(), 3);
    assert_eq!(
        store.lookup(&sql_id("select 1 from dual")).unwrap(),
        Some("select 2 from dual".to_string())
    );
    assert_eq!(
        store.lookup(&sql_id("select * from emp")).unwrap(),
        Some("SELECT empno, ename\nFROM emp\nWHERE deptno = 10\n".to_string())
    );
    assert_eq!(store.lookup(&sql_id("select 3 from dual")).unwrap(), None);
}

#[test]
fn test_memoryStore_withSampleMapping_shouldServeLookups() {
    init_logging();
    let dir = create_temp_dir().unwrap();
    let path = create_sample_mapping(dir.path()).unwrap();

    let store = MemoryStore::open(&path).unwrap();
    assert_sample_lookups(&store);
}

#[test]
fn test_sqliteStore_convertedFromSample_shouldServeSameLookups() {
    init_logging();
    let dir = create_temp_dir().unwrap();
    let path = create_sample_mapping(dir.path()).unwrap();
    let (db_path, _) = convert_file(&path, ConversionMode::YamlToSqlite).unwrap();

    let store = SqliteStore::open(&db_path).unwrap();
    assert_eq!(store.path(), db_path.as_path());
    assert_sample_lookups(&store);
}

#[test]
fn test_openStore_shouldDispatchOnKind() {
    let dir = create_temp_dir().unwrap();
    let path = create_sample_mapping(dir.path()).unwrap();
    let (db_path, _) = convert_file(&path, ConversionMode::YamlToSqlite).unwrap();

    let memory = open_store(StoreKind::Yaml, &path).unwrap();
    assert_eq!(memory.kind(), StoreKind::Yaml);
    assert_sample_lookups(memory.as_ref());

    let persistent = open_store(StoreKind::Sqlite, &db_path).unwrap();
    assert_eq!(persistent.kind(), StoreKind::Sqlite);
    assert_sample_lookups(persistent.as_ref());
}

#[test]
fn test_openStore_withWrongKindForFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_sample_mapping(dir.path()).unwrap();

    let result = open_store(StoreKind::Sqlite, &path);
    assert!(matches!(result, Err(StoreError::IncompatibleFormat(_))));
}

#[test]
fn test_memoryStore_withMalformedFile_shouldNotExposePartialMap() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "broken.yaml",
        "520mkxqpf15q8: select 2 from dual\nthis line is not a mapping\n",
    )
    .unwrap();

    let result = MemoryStore::open(&path);
    assert!(matches!(result, Err(StoreError::Format { line: 2, .. })));
}

#[test]
fn test_sqliteStore_concurrentLookups_shouldAllSucceed() {
    use std::sync::Arc;
    use std::thread;

    let dir = create_temp_dir().unwrap();
    let path = create_sample_mapping(dir.path()).unwrap();
    let (db_path, _) = convert_file(&path, ConversionMode::YamlToSqlite).unwrap();
    let store = Arc::new(SqliteStore::open(&db_path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_sample_lookups(store.as_ref());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
