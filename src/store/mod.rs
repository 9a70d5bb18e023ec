/*!
 * Mapping stores: sql_id -> replacement statement.
 *
 * Two backends implement the `MappingStore` lookup capability:
 * - `memory`: a structured-text (YAML subset) file parsed eagerly into a map
 * - `sqlite`: a pre-built SQLite file queried per key, never loaded whole
 *
 * Both are read-only once constructed.
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{StoreResult, TranslatorError};

pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod staging;
pub mod yaml;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Read-only lookup of replacement statements by sql_id
pub trait MappingStore: Send + Sync {
    /// Look up the replacement for a sql_id; `Ok(None)` when there is none
    fn lookup(&self, sql_id: &str) -> StoreResult<Option<String>>;

    /// Number of mappings held by the store
    fn len(&self) -> StoreResult<usize>;

    /// Check if the store holds no mappings
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Short backend name for logs
    fn kind(&self) -> StoreKind;
}

/// Backend selector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Structured-text file loaded into memory
    #[default]
    #[serde(alias = "memory")]
    Yaml,
    /// Disk-resident SQLite store
    #[serde(alias = "persistent")]
    Sqlite,
}

impl StoreKind {
    /// Whether the backend loads the whole mapping into memory
    pub fn is_in_memory(&self) -> bool {
        matches!(self, Self::Yaml)
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yaml" | "memory" => Ok(Self::Yaml),
            "sqlite" | "persistent" => Ok(Self::Sqlite),
            _ => Err(TranslatorError::Configuration(format!(
                "Unrecognized mapping store type '{}', only yaml and sqlite are allowed",
                s
            ))),
        }
    }
}

/// Open the backend of the given kind over a local file
pub fn open_store(kind: StoreKind, path: &Path) -> StoreResult<Box<dyn MappingStore>> {
    let store: Box<dyn MappingStore> = match kind {
        StoreKind::Yaml => Box::new(MemoryStore::open(path)?),
        StoreKind::Sqlite => Box::new(SqliteStore::open(path)?),
    };
    Ok(store)
}
