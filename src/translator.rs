/*!
 * SQL translation facade.
 *
 * `SqlTranslator` computes the sql_id of a statement and looks it up in the
 * configured mapping store, returning the replacement when there is one and
 * the statement itself otherwise.
 *
 * One translator is shared per process. `get_or_create_instance` builds it on
 * first use behind a one-time initialization barrier: concurrent first callers
 * construct exactly one store and all receive the same instance. A failed
 * construction leaves the barrier open so a later call can try again.
 */

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use once_cell::sync::OnceCell;

use crate::errors::{StoreError, TranslatorError, TranslatorResult};
use crate::location::resolve_mapping_location;
use crate::sql_id::{StatementDigest, sql_id};
use crate::store::{self, MappingStore, StoreKind};

/// Process-wide translator
static INSTANCE: TranslatorCell = TranslatorCell::new();

/// Lookup counters of a translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationStats {
    /// Statements translated
    pub lookups: u64,
    /// Statements that had a mapping
    pub hits: u64,
    /// Statements returned unchanged
    pub misses: u64,
}

impl TranslationStats {
    /// Share of lookups that found a mapping
    pub fn hit_rate(&self) -> f64 {
        if self.lookups > 0 {
            self.hits as f64 / self.lookups as f64
        } else {
            0.0
        }
    }
}

/// Translates statements through a mapping store
pub struct SqlTranslator {
    store: Box<dyn MappingStore>,
    kind: StoreKind,
    location: String,
    lookups: AtomicU64,
    hits: AtomicU64,
}

impl SqlTranslator {
    /// Open the mapping store at `location` and build a translator over it.
    ///
    /// A mapping file that is missing or cannot be read is a configuration
    /// error. Content errors keep their store error.
    pub fn new(kind: StoreKind, location: &str) -> TranslatorResult<Self> {
        let path = resolve_mapping_location(location)?;
        let store = store::open_store(kind, &path).map_err(|e| match e {
            StoreError::NotFound(_) | StoreError::Io(_) => TranslatorError::Configuration(format!(
                "Unable to read mapping file for '{}': {}",
                location, e
            )),
            other => TranslatorError::Store(other),
        })?;

        // Counting a persistent store would scan it, so only in-memory sizes are logged
        if kind.is_in_memory() {
            info!(
                "SQL translator ready: {} store with {} mapping(s) from {}",
                kind,
                store.len()?,
                location
            );
        } else {
            info!("SQL translator ready: {} store at {}", kind, location);
        }
        Ok(Self::with_store(store, location))
    }

    /// Build a translator over an already opened store
    pub fn with_store(store: Box<dyn MappingStore>, location: &str) -> Self {
        Self {
            kind: store.kind(),
            store,
            location: location.to_string(),
            lookups: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    /// Get the process-wide translator, creating it on first use.
    ///
    /// Later calls return the existing instance whatever arguments they pass.
    pub fn get_instance(kind: StoreKind, location: &str) -> TranslatorResult<Arc<SqlTranslator>> {
        get_or_create_instance(kind, location)
    }

    /// Translate a statement, falling back to the statement itself
    pub fn translate(&self, sql_text: &str) -> TranslatorResult<String> {
        self.translate_digest(sql_text, StatementDigest::of(sql_text))
    }

    /// Translate statement bytes, which must be UTF-8
    pub fn translate_bytes(&self, bytes: &[u8]) -> TranslatorResult<String> {
        let digest = StatementDigest::from_utf8(bytes)?;
        let sql_text = String::from_utf8_lossy(bytes);
        self.translate_digest(&sql_text, digest)
    }

    fn translate_digest(&self, sql_text: &str, digest: StatementDigest) -> TranslatorResult<String> {
        let id = digest.sql_id();
        self.lookups.fetch_add(1, Ordering::Relaxed);

        match self.store.lookup(&id)? {
            Some(replacement) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Translated statement {}", id);
                Ok(replacement)
            }
            None => Ok(sql_text.to_string()),
        }
    }

    /// Look up the replacement registered for a statement, if any
    pub fn replacement_for(&self, sql_text: &str) -> TranslatorResult<Option<String>> {
        Ok(self.store.lookup(&sql_id(sql_text))?)
    }

    /// Backend serving this translator
    pub fn store_kind(&self) -> StoreKind {
        self.kind
    }

    /// Location the mappings were loaded from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of mappings available
    pub fn mapping_count(&self) -> TranslatorResult<usize> {
        Ok(self.store.len()?)
    }

    /// Lookup statistics since construction
    pub fn stats(&self) -> TranslationStats {
        let lookups = self.lookups.load(Ordering::Relaxed);
        let hits = self.hits.load(Ordering::Relaxed);
        TranslationStats {
            lookups,
            hits,
            misses: lookups.saturating_sub(hits),
        }
    }
}

impl fmt::Debug for SqlTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlTranslator")
            .field("kind", &self.kind)
            .field("location", &self.location)
            .field("stats", &self.stats())
            .finish()
    }
}

/// One-time initialization barrier holding a shared translator
pub struct TranslatorCell {
    cell: OnceCell<Arc<SqlTranslator>>,
}

impl TranslatorCell {
    /// Create an empty cell
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Get the translator if it was already built
    pub fn get(&self) -> Option<Arc<SqlTranslator>> {
        self.cell.get().cloned()
    }

    /// Get the translator, building it with `init` if the cell is empty.
    ///
    /// Only one caller runs `init`; the others block until it finishes. If
    /// `init` fails the cell stays empty and the error goes to that caller.
    pub fn get_or_try_init<F>(&self, init: F) -> TranslatorResult<Arc<SqlTranslator>>
    where
        F: FnOnce() -> TranslatorResult<SqlTranslator>,
    {
        if let Some(translator) = self.cell.get() {
            return Ok(Arc::clone(translator));
        }
        self.cell
            .get_or_try_init(|| init().map(Arc::new))
            .map(Arc::clone)
    }

    /// Get the translator, opening the given store if the cell is empty
    pub fn get_or_create(&self, kind: StoreKind, location: &str) -> TranslatorResult<Arc<SqlTranslator>> {
        let translator = self.get_or_try_init(|| SqlTranslator::new(kind, location))?;
        if translator.store_kind() != kind || translator.location() != location {
            warn!(
                "SQL translator already initialized with {} store from {}, ignoring {} store from {}",
                translator.store_kind(),
                translator.location(),
                kind,
                location
            );
        }
        Ok(translator)
    }
}

impl Default for TranslatorCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the process-wide translator, creating it on first use
pub fn get_or_create_instance(kind: StoreKind, location: &str) -> TranslatorResult<Arc<SqlTranslator>> {
    INSTANCE.get_or_create(kind, location)
}
