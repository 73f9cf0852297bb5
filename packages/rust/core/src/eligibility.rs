//! Eligibility filter: which documents are worth refactoring.

use disclose_shared::{EligibilityConfig, SkipReason};

/// Decide whether a document of `line_count` lines should be skipped.
///
/// `has_references` is whether the references directory already exists next
/// to the document. Returns `None` when the document is eligible.
pub fn check_eligibility(
    line_count: usize,
    has_references: bool,
    thresholds: &EligibilityConfig,
) -> Option<SkipReason> {
    if has_references && line_count <= thresholds.optimized_max_lines {
        return Some(SkipReason::AlreadyOptimized);
    }
    if line_count <= thresholds.concise_max_lines {
        return Some(SkipReason::AlreadyConcise);
    }
    None
}
