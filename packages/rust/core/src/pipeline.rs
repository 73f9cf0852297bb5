//! Per-document refactor pipeline and the sequential driver over many documents.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument};

use disclose_markdown::{
    build_summary, extract_sections, line_count, normalize_line_endings, plan_references,
};
use disclose_shared::{
    DiscloseError, DocumentOutcome, DocumentReport, RefactorConfig, Result, RunReport, SkipReason,
};

use crate::eligibility::check_eligibility;
use crate::materializer::commit_refactor;

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called once before the first document.
    fn started(&self, total: usize);
    /// Called when a document is picked up.
    fn document_started(&self, path: &Path, current: usize, total: usize);
    /// Called when a document is done, whatever the outcome.
    fn document_finished(&self, report: &DocumentReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn started(&self, _total: usize) {}
    fn document_started(&self, _path: &Path, _current: usize, _total: usize) {}
    fn document_finished(&self, _report: &DocumentReport) {}
}

/// Refactor the skill document in `doc_dir`.
///
/// 1. Missing document: skipped
/// 2. Eligibility filter
/// 3. Extract sections (strict mode: skip on colliding headings)
/// 4. Build the primary document
/// 5. Dry run: report and stop; otherwise commit references and primary
#[instrument(skip_all, fields(dir = %doc_dir.display(), dry_run = config.dry_run))]
pub fn refactor_document(doc_dir: &Path, config: &RefactorConfig) -> Result<DocumentOutcome> {
    let doc_path = doc_dir.join(&config.document_name);
    if !doc_path.is_file() {
        debug!("no primary document");
        return Ok(skipped(SkipReason::NoDocument));
    }

    let raw = std::fs::read_to_string(&doc_path).map_err(|e| DiscloseError::io(&doc_path, e))?;
    let content = normalize_line_endings(&raw);
    let original_lines = line_count(&content);

    let refs_dir = doc_dir.join(&config.references_dir);
    if let Some(reason) = check_eligibility(original_lines, refs_dir.is_dir(), &config.eligibility) {
        debug!(lines = original_lines, %reason, "not eligible");
        return Ok(skipped(reason));
    }

    let sections = extract_sections(&content);
    if config.strict && !sections.collisions().is_empty() {
        return Ok(skipped(SkipReason::SectionCollision {
            sections: sections.collisions().to_vec(),
        }));
    }

    let document_id = document_id(doc_dir)?;
    let summary = build_summary(&sections, &document_id);
    let new_lines = line_count(&summary);

    if config.dry_run {
        info!(original_lines, new_lines, "would refactor");
        return Ok(DocumentOutcome::WouldRefactor {
            original_lines,
            new_lines,
            sections: sections.names().map(String::from).collect(),
        });
    }

    let references = plan_references(&sections);
    let written = commit_refactor(&doc_path, &summary, &refs_dir, &references)?;

    info!(original_lines, new_lines, references = written.len(), "refactored");
    Ok(DocumentOutcome::Refactored {
        original_lines,
        new_lines,
        references: written,
    })
}

/// Run [`refactor_document`] over `dirs` in order.
///
/// A failure in one document is logged and recorded in its report; the run
/// carries on with the next one.
#[instrument(skip_all, fields(documents = dirs.len(), dry_run = config.dry_run))]
pub fn run(dirs: &[PathBuf], config: &RefactorConfig, progress: &dyn ProgressReporter) -> RunReport {
    let mut report = RunReport {
        dry_run: config.dry_run,
        ..RunReport::default()
    };
    progress.started(dirs.len());

    for (i, dir) in dirs.iter().enumerate() {
        progress.document_started(dir, i + 1, dirs.len());

        let entry = match refactor_document(dir, config) {
            Ok(outcome) => DocumentReport {
                path: dir.clone(),
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "refactor failed");
                DocumentReport {
                    path: dir.clone(),
                    outcome: None,
                    error: Some(e.to_string()),
                }
            }
        };

        progress.document_finished(&entry);
        report.stats.record(&entry);
        report.documents.push(entry);
    }

    info!(
        refactored = report.stats.refactored,
        skipped = report.stats.skipped,
        errors = report.stats.errors,
        "run complete"
    );
    report
}

fn skipped(reason: SkipReason) -> DocumentOutcome {
    DocumentOutcome::Skipped { reason }
}

/// Identifier used for the primary document's title: the directory name.
fn document_id(doc_dir: &Path) -> Result<String> {
    if let Some(name) = doc_dir.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    // `.` and similar have no file name of their own.
    let canonical = doc_dir
        .canonicalize()
        .map_err(|e| DiscloseError::io(doc_dir, e))?;
    canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            DiscloseError::validation(format!("cannot derive a name from {}", doc_dir.display()))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
