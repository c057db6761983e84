//! Atomic report persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `contents` to `path` with write-to-temp + rename.
///
/// The temp file lives in the destination directory so the rename never
/// crosses filesystems. Readers see either the previous artifact or the new
/// one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    write_atomic_all(&[(path, contents)])
}

/// Write several artifacts so that either all of them are replaced or none.
///
/// Every artifact is written and synced to a temp file next to its
/// destination first; renames start only once all writes succeeded. A failed
/// write drops the staged temp files and leaves every destination untouched.
pub fn write_atomic_all(artifacts: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(artifacts.len());
    for &(path, contents) in artifacts {
        staged.push((stage(path, contents)?, path));
    }
    for (temp, path) in staged {
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
    }
    Ok(())
}

fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
