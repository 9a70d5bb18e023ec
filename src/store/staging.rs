/*!
 * Staging of new store files.
 *
 * A store file is built under a temporary name in the target directory and
 * moved to the target path only once it is complete. A failed build leaves
 * nothing at the target path, so the conversion can simply be rerun.
 */

use std::io;
use std::path::Path;

use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::errors::{StoreError, StoreResult};

const STAGING_PREFIX: &str = ".sqlid-";
const STAGING_SUFFIX: &str = ".partial";

/// Create an empty staging file in the directory of `target`.
///
/// The staging file is removed when dropped without being published.
pub fn stage(target: &Path) -> StoreResult<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staged = Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(dir)?;
    debug!("Staging {:?} as {:?}", target, staged.path());
    Ok(staged)
}

/// Move a complete staging file to `target`. An existing target is never replaced.
pub fn publish(staged: NamedTempFile, target: &Path) -> StoreResult<()> {
    staged.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            StoreError::TargetExists(target.to_path_buf())
        } else {
            StoreError::Io(e.error)
        }
    })?;
    Ok(())
}
