/*!
 * In-memory mapping store.
 *
 * The structured-text source is parsed completely before the store is handed
 * out, so a malformed file never yields a partial map. After construction the
 * map is never mutated and lookups need no locking.
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use super::{MappingStore, StoreKind, yaml};
use crate::errors::{StoreError, StoreResult};

/// Mapping loaded from a structured-text file
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Load a structured-text mapping file
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::Io(e),
        })?;

        let store = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} SQL mapping(s) from {:?} into memory",
            store.entries.len(),
            path
        );
        Ok(store)
    }

    /// Load a mapping from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> StoreResult<Self> {
        Ok(Self {
            entries: yaml::read_mapping(reader)?,
        })
    }

    /// Build a store from ready-made entries
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Borrow the loaded entries
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

impl MappingStore for MemoryStore {
    fn lookup(&self, sql_id: &str) -> StoreResult<Option<String>> {
        let found = self.entries.get(sql_id).cloned();
        debug!(
            "Memory lookup {}: {}",
            sql_id,
            if found.is_some() { "hit" } else { "miss" }
        );
        Ok(found)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.entries.len())
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Yaml
    }
}
