/*!
 * SQLite-backed mapping store.
 *
 * The store file is opened read-only and every lookup is a point query on
 * the primary key, so mapping sets far larger than memory can be served.
 * Stores are written only by `SqliteStore::create`, used by the converter.
 */

use std::path::{Path, PathBuf};

use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::{MappingStore, StoreKind, schema, staging};
use crate::errors::{StoreError, StoreResult};

/// Mapping served from a SQLite file
pub struct SqliteStore {
    /// Path to the store file
    path: PathBuf,
    /// Connection shared by all lookup threads
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open an existing store read-only
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }

        info!("Opening SQL mapping store at: {:?}", path);

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        schema::verify_schema(&conn).map_err(|e| match e {
            // Files that are not SQLite databases fail on the first query
            StoreError::Database(inner) => StoreError::IncompatibleFormat(format!(
                "{:?} is not a mapping store: {}",
                path, inner
            )),
            other => other,
        })?;

        Ok(Self {
            path,
            connection: Mutex::new(conn),
        })
    }

    /// Create a new store file holding the given entries.
    ///
    /// All entries are written in one transaction into a staging file, which
    /// takes the target path only after commit. The target must not exist.
    pub fn create<P, I, K, V>(path: P, entries: I) -> StoreResult<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::TargetExists(path.to_path_buf()));
        }

        info!("Creating SQL mapping store at: {:?}", path);

        let staged = staging::stage(path)?;
        let mut conn = Connection::open(staged.path())?;
        schema::initialize_schema(&conn)?;

        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR REPLACE INTO sql_mapping (sql_id, sql_text) VALUES (?1, ?2)")?;
            for (sql_id, sql_text) in entries {
                stmt.execute(params![sql_id.as_ref(), sql_text.as_ref()])?;
                written += 1;
            }
        }
        tx.commit()?;
        conn.close().map_err(|(_, e)| e)?;

        staging::publish(staged, path)?;

        debug!("Wrote {} mapping(s) to {:?}", written, path);
        Ok(written)
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry, ordered by sql_id
    pub fn entries(&self) -> StoreResult<Vec<(String, String)>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT sql_id, sql_text FROM sql_mapping ORDER BY sql_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

impl MappingStore for SqliteStore {
    fn lookup(&self, sql_id: &str) -> StoreResult<Option<String>> {
        let conn = self.connection.lock();
        let found = conn
            .prepare_cached("SELECT sql_text FROM sql_mapping WHERE sql_id = ?1")?
            .query_row([sql_id], |row| row.get(0))
            .optional()?;

        debug!(
            "SQLite lookup {}: {}",
            sql_id,
            if found.is_some() { "hit" } else { "miss" }
        );
        Ok(found)
    }

    fn len(&self) -> StoreResult<usize> {
        let conn = self.connection.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sql_mapping", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Sqlite
    }
}
