//! Reference materializer.
//!
//! Writes planned reference files (and, for a full refactor, the new primary
//! document) as one staged unit: every file is first written to a hidden
//! `.<name>.tmp` sibling, and only when all of them are staged are they
//! renamed into place, references first and the primary document last.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use disclose_markdown::{ReferenceFile, SectionMap, plan_references};
use disclose_shared::{DiscloseError, Result, WrittenFile};

/// Plan and write the reference files for `sections` into `refs_dir`.
///
/// Creates `refs_dir` if needed (even when nothing is externalized) and
/// overwrites existing files. Returns the files written, in plan order.
#[instrument(skip_all, fields(refs_dir = %refs_dir.display()))]
pub fn materialize_references(sections: &SectionMap, refs_dir: &Path) -> Result<Vec<WrittenFile>> {
    let files = plan_references(sections);
    commit(refs_dir, &files, None)
}

/// Commit a full refactor: reference files, then the rewritten primary document.
///
/// If staging any file fails, all staged temp files are removed and nothing
/// on disk changes apart from `refs_dir` being created.
#[instrument(skip_all, fields(doc = %doc_path.display(), refs = references.len()))]
pub fn commit_refactor(
    doc_path: &Path,
    primary: &str,
    refs_dir: &Path,
    references: &[ReferenceFile],
) -> Result<Vec<WrittenFile>> {
    commit(refs_dir, references, Some((doc_path, primary)))
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

/// A file written to its temp path but not yet renamed into place.
struct StagedFile {
    temp: PathBuf,
    target: PathBuf,
}

fn commit(
    refs_dir: &Path,
    references: &[ReferenceFile],
    primary: Option<(&Path, &str)>,
) -> Result<Vec<WrittenFile>> {
    std::fs::create_dir_all(refs_dir).map_err(|e| DiscloseError::io(refs_dir, e))?;

    let mut staged: Vec<StagedFile> = Vec::with_capacity(references.len() + 1);
    let mut written: Vec<WrittenFile> = Vec::with_capacity(references.len());

    for file in references {
        let target = refs_dir.join(&file.filename);
        match stage(&target, &file.content) {
            Ok(s) => staged.push(s),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
        written.push(WrittenFile {
            filename: file.filename.clone(),
            sha256: sha256_hex(&file.content),
            size_bytes: file.content.len(),
        });
    }

    // The primary document goes last so it is only replaced once every
    // reference it points to is in place.
    if let Some((doc_path, content)) = primary {
        match stage(doc_path, content) {
            Ok(s) => staged.push(s),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, s) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(&s.temp, &s.target) {
            warn!(path = %s.target.display(), error = %e, "rename failed mid-commit");
            discard(&staged[i..]);
            return Err(DiscloseError::io(&s.target, e));
        }
        debug!(path = %s.target.display(), "committed");
    }

    info!(count = written.len(), "reference files written");
    Ok(written)
}

/// Write `content` to the hidden temp sibling of `target`.
fn stage(target: &Path, content: &str) -> Result<StagedFile> {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DiscloseError::validation(format!("no file name in {}", target.display()))
        })?;
    let temp = target.with_file_name(format!(".{name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| DiscloseError::io(&temp, e))?;

    Ok(StagedFile {
        temp,
        target: target.to_path_buf(),
    })
}

/// Best-effort removal of staged temp files.
fn discard(staged: &[StagedFile]) {
    for s in staged {
        if let Err(e) = std::fs::remove_file(&s.temp) {
            debug!(path = %s.temp.display(), error = %e, "could not remove temp file");
        }
    }
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
