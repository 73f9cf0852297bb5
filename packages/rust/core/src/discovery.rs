//! Locating skill directories on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use disclose_shared::{DiscloseError, Result};

/// Find every directory under `path` that holds a `document_name` file.
///
/// - `path` is the document itself: its parent directory.
/// - `path` is a directory holding the document: `path` alone.
/// - Otherwise `path` is walked recursively. Symlinked directories are not
///   followed.
///
/// The result is sorted. A nonexistent `path` is an I/O error.
#[instrument(skip_all, fields(path = %path.display(), document_name = %document_name))]
pub fn discover_documents(path: &Path, document_name: &str) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(path).map_err(|e| DiscloseError::io(path, e))?;

    if meta.is_file() {
        if path.file_name().is_some_and(|n| n == document_name) {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(vec![parent]);
        }
        debug!("path is a file but not a skill document");
        return Ok(Vec::new());
    }

    if path.join(document_name).is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut found = Vec::new();
    walk(path, document_name, &mut found)?;
    found.sort();

    debug!(count = found.len(), "skill directories found");
    Ok(found)
}

fn walk(dir: &Path, document_name: &str, found: &mut Vec<PathBuf>) -> Result<()> {
    if dir.join(document_name).is_file() {
        found.push(dir.to_path_buf());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| DiscloseError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DiscloseError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| DiscloseError::io(entry.path(), e))?;
        if file_type.is_dir() {
            walk(&entry.path(), document_name, found)?;
        }
    }
    Ok(())
}
