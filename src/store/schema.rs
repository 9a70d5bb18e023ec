/*!
 * Persistent store schema.
 *
 * This module contains the SQL schema of the SQLite mapping store, creates
 * it for new stores and checks it when an existing store is opened.
 */

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{StoreError, StoreResult};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Table holding the mappings
pub const MAPPING_TABLE: &str = "sql_mapping";

/// Create the schema in a fresh database
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    info!("Initializing mapping store schema v{}", SCHEMA_VERSION);

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sql_mapping (
            sql_id TEXT PRIMARY KEY CHECK (length(sql_id) = 13),
            sql_text TEXT NOT NULL
        ) WITHOUT ROWID;
        "#,
    )?;

    set_schema_version(conn, SCHEMA_VERSION)
}

/// Check that an existing database is a mapping store of the current version
pub fn verify_schema(conn: &Connection) -> StoreResult<()> {
    let version = get_schema_version(conn)?;
    if version != SCHEMA_VERSION {
        return Err(StoreError::IncompatibleFormat(format!(
            "schema version {} found, v{} expected",
            version, SCHEMA_VERSION
        )));
    }

    if !table_exists(conn, MAPPING_TABLE)? {
        return Err(StoreError::IncompatibleFormat(format!(
            "table '{}' is missing",
            MAPPING_TABLE
        )));
    }

    debug!("Mapping store schema is v{}", version);
    Ok(())
}

/// Get the schema version, 0 when the database has none
fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    if !table_exists(conn, "schema_version")? {
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
