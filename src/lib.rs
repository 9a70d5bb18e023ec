/*!
 * # sqlid-translator - SQL statement substitution by Oracle SQL_ID
 *
 * A Rust library that replaces SQL statements on their way to the database
 * with pre-registered alternatives, keyed by the statement's Oracle SQL_ID.
 *
 * ## Features
 *
 * - Compute Oracle SQL_ID and HASH_VALUE exactly as the database does
 * - Mapping stores:
 *   - structured-text (YAML subset) files loaded into memory
 *   - SQLite stores queried on disk for very large mapping sets
 * - Process-wide translator, built once on first use
 * - Lossless conversion between the two store formats
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `sql_id`: SQL_ID / HASH_VALUE computation
 * - `store`: Mapping store capability and its backends:
 *   - `store::yaml`: Structured-text format reader and writer
 *   - `store::memory`: In-memory backend
 *   - `store::sqlite`: SQLite backend
 * - `translator`: Translation facade and process-wide instance
 * - `convert`: Store format conversion
 * - `location`: Mapping location parsing
 * - `config`: Configuration management
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the Apache License, Version 2.0
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod convert;
pub mod errors;
pub mod location;
pub mod sql_id;
pub mod store;
pub mod translator;

// Re-export main types for easier usage
pub use config::{LogLevel, TranslatorConfig};
pub use errors::{AppError, SqlIdError, StoreError, TranslatorError};
pub use sql_id::{hash_value, sql_id};
pub use store::{MappingStore, MemoryStore, SqliteStore, StoreKind};
pub use translator::{SqlTranslator, TranslationStats, TranslatorCell, get_or_create_instance};
