/*!
 * Conversion between the structured-text and SQLite mapping formats.
 *
 * The target file is derived from the source by swapping its extension and
 * is never overwritten. It appears only once the conversion has succeeded.
 */

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use crate::errors::{StoreError, StoreResult};
use crate::store::{SqliteStore, staging, yaml};

/// Direction of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Structured text to SQLite store
    #[default]
    YamlToSqlite,
    /// SQLite store to structured text
    SqliteToYaml,
}

impl ConversionMode {
    /// Extension given to the converted file
    pub fn target_extension(&self) -> &'static str {
        match self {
            Self::YamlToSqlite => "db",
            Self::SqliteToYaml => "yaml",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YamlToSqlite => write!(f, "yaml2sqlite"),
            Self::SqliteToYaml => write!(f, "sqlite2yaml"),
        }
    }
}

impl FromStr for ConversionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml2sqlite" => Ok(Self::YamlToSqlite),
            "sqlite2yaml" => Ok(Self::SqliteToYaml),
            _ => Err(anyhow::anyhow!("Invalid conversion mode: {}", s)),
        }
    }
}

/// Path of the file a conversion writes to
pub fn target_path(source: &Path, mode: ConversionMode) -> PathBuf {
    source.with_extension(mode.target_extension())
}

/// Convert `source` in the given direction, returning the target path and entry count
pub fn convert_file(source: &Path, mode: ConversionMode) -> StoreResult<(PathBuf, usize)> {
    if !source.is_file() {
        return Err(StoreError::NotFound(source.to_path_buf()));
    }

    let target = target_path(source, mode);
    if target.exists() {
        return Err(StoreError::TargetExists(target));
    }

    info!("Converting {:?} to {:?} ({})", source, target, mode);
    let count = match mode {
        ConversionMode::YamlToSqlite => yaml_to_sqlite(source, &target)?,
        ConversionMode::SqliteToYaml => sqlite_to_yaml(source, &target)?,
    };

    Ok((target, count))
}

/// Build a SQLite store from a structured-text file
pub fn yaml_to_sqlite(source: &Path, target: &Path) -> StoreResult<usize> {
    let mapping = yaml::read_mapping(BufReader::new(File::open(source)?))?;
    SqliteStore::create(target, mapping)
}

/// Dump a SQLite store as a structured-text file
pub fn sqlite_to_yaml(source: &Path, target: &Path) -> StoreResult<usize> {
    let store = SqliteStore::open(source)?;
    let entries = store.entries()?;

    let mut staged = staging::stage(target)?;
    let count = {
        let mut writer = BufWriter::new(staged.as_file_mut());
        yaml::write_mapping(&mut writer, entries)?
    };
    staging::publish(staged, target)?;

    Ok(count)
}
