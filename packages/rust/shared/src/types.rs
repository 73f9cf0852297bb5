//! Outcome types shared between the pipeline and its front ends.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SkipReason
// ---------------------------------------------------------------------------

/// Why the eligibility filter (or strict mode) left a document untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The directory has no primary document.
    NoDocument,
    /// Short enough and a references directory already exists.
    AlreadyOptimized,
    /// Short enough to need no refactoring.
    AlreadyConcise,
    /// Strict mode: two or more headings normalize to the same section name.
    SectionCollision { sections: Vec<String> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDocument => write!(f, "no document"),
            Self::AlreadyOptimized => write!(f, "already optimized"),
            Self::AlreadyConcise => write!(f, "already concise"),
            Self::SectionCollision { sections } => {
                write!(f, "colliding sections: {}", sections.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// WrittenFile
// ---------------------------------------------------------------------------

/// A reference file committed to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenFile {
    /// File name within the references directory (e.g. `errors.md`).
    pub filename: String,
    /// Hex SHA-256 of the written content.
    pub sha256: String,
    /// Size of the written content in bytes.
    pub size_bytes: usize,
}

// ---------------------------------------------------------------------------
// DocumentOutcome
// ---------------------------------------------------------------------------

/// Result of running the pipeline on one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Left untouched.
    Skipped { reason: SkipReason },
    /// Dry run: what a real run would produce.
    WouldRefactor {
        original_lines: usize,
        new_lines: usize,
        /// Section names found in the document, in source order.
        sections: Vec<String>,
    },
    /// Primary document rewritten and references committed.
    Refactored {
        original_lines: usize,
        new_lines: usize,
        references: Vec<WrittenFile>,
    },
}

impl DocumentOutcome {
    /// Whether this outcome counts towards the "refactored" tally.
    pub fn is_refactor(&self) -> bool {
        matches!(self, Self::WouldRefactor { .. } | Self::Refactored { .. })
    }
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Per-document entry in a [`RunReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Directory containing the primary document.
    pub path: PathBuf,
    /// Set when the pipeline completed for this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DocumentOutcome>,
    /// Set when the pipeline failed for this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub refactored: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl RunStats {
    /// Count one document report.
    pub fn record(&mut self, report: &DocumentReport) {
        match (&report.outcome, &report.error) {
            (_, Some(_)) => self.errors += 1,
            (Some(outcome), None) if outcome.is_refactor() => self.refactored += 1,
            _ => self.skipped += 1,
        }
    }
}

/// Everything a run produced, in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub documents: Vec<DocumentReport>,
    pub stats: RunStats,
}
