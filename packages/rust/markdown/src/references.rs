//! Reference file planning.
//!
//! Decides which sections leave the primary document and renders the detail
//! files they move to. Writing them is the caller's job.

use tracing::{debug, instrument, warn};

use crate::policy::{FALLBACK_MAX_INLINE_LINES, SECTION_POLICIES, is_known_section};
use crate::sections::{NAME_SEPARATOR, SectionMap, line_count};
use crate::summary::title_case;

/// A detail file to be written into the references directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    /// File name inside the references directory.
    pub filename: String,
    /// Full file content: title line, blank line, section body.
    pub content: String,
}

impl ReferenceFile {
    fn new(filename: impl Into<String>, title: &str, section: &str) -> Self {
        Self {
            filename: filename.into(),
            content: format!("# {title}\n\n{}\n", strip_heading(section)),
        }
    }
}

/// Plan the reference files for a document.
///
/// Well-known sections follow the policy table (fixed file names, e.g.
/// `error_handling` always becomes `errors.md`). Any other section longer
/// than [`FALLBACK_MAX_INLINE_LINES`] gets a file named after the section.
/// Table entries come first, in canonical order, then fallbacks in source
/// order. A fallback whose file name is already taken is skipped.
#[instrument(skip_all, fields(sections = sections.len()))]
pub fn plan_references(sections: &SectionMap) -> Vec<ReferenceFile> {
    let mut files: Vec<ReferenceFile> = Vec::new();

    for policy in SECTION_POLICIES {
        let Some(content) = sections.get(policy.name) else {
            continue;
        };
        if let Some(target) = policy.externalized_to(content) {
            files.push(ReferenceFile::new(target.filename, target.title, content));
        }
    }

    for (name, content) in sections.iter() {
        if is_known_section(name) || line_count(content) <= FALLBACK_MAX_INLINE_LINES {
            continue;
        }

        let slug = fallback_slug(name);
        if slug.is_empty() {
            warn!(section = name, "section name has no usable characters, not externalized");
            continue;
        }

        let filename = format!("{slug}.md");
        if files.iter().any(|f| f.filename == filename) {
            warn!(section = name, %filename, "reference file name already taken, not externalized");
            continue;
        }

        let title = title_case(&name.replace(NAME_SEPARATOR, " "));
        files.push(ReferenceFile::new(filename, &title, content));
    }

    debug!(count = files.len(), "reference files planned");
    files
}

/// File stem for a section outside the policy table: separators become
/// hyphens, anything that is not ASCII alphanumeric, `-` or `.` is dropped.
fn fallback_slug(name: &str) -> String {
    name.replace(NAME_SEPARATOR, "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '.')
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

/// Section body without its `## ` heading line.
fn strip_heading(section: &str) -> &str {
    if section.starts_with("## ") {
        section.split_once('\n').map_or("", |(_, rest)| rest).trim()
    } else {
        section.trim()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::extract_sections;

    fn section(heading: &str, body_lines: usize) -> String {
        let mut out = vec![format!("## {heading}")];
        out.extend((1..=body_lines).map(|i| format!("{i}. {heading} line {i}")));
        out.join("\n")
    }

    fn filenames(files: &[ReferenceFile]) -> Vec<&str> {
        files.iter().map(|f| f.filename.as_str()).collect()
    }

    #[test]
    fn short_error_handling_is_still_externalized() {
        let sections = extract_sections("## Error Handling\n- a\n- b");
        let files = plan_references(&sections);

        assert_eq!(filenames(&files), vec!["errors.md"]);
        assert_eq!(files[0].content, "# Error Handling Reference\n\n- a\n- b\n");
    }

    #[test]
    fn instructions_boundary() {
        let at = extract_sections(&section("Instructions", 19));
        assert!(plan_references(&at).is_empty());

        let over = extract_sections(&section("Instructions", 20));
        let files = plan_references(&over);
        assert_eq!(filenames(&files), vec!["implementation.md"]);
        assert!(files[0].content.starts_with("# Implementation Guide\n\n1. Instructions line 1"));
        assert!(!files[0].content.contains("## Instructions"));
    }

    #[test]
    fn prerequisites_boundary() {
        assert!(plan_references(&extract_sections(&section("Prerequisites", 14))).is_empty());
        let files = plan_references(&extract_sections(&section("Prerequisites", 15)));
        assert_eq!(filenames(&files), vec!["prerequisites.md"]);
        assert!(files[0].content.starts_with("# Prerequisites\n\n"));
    }

    #[test]
    fn output_and_resources_are_never_externalized() {
        let doc = format!("{}\n{}", section("Output", 40), section("Resources", 40));
        assert!(plan_references(&extract_sections(&doc)).is_empty());
    }

    #[test]
    fn unknown_long_section_uses_derived_name() {
        let doc = format!("{}\n{}", section("Advanced Usage", 30), section("Tiny Notes", 3));
        let files = plan_references(&extract_sections(&doc));

        assert_eq!(filenames(&files), vec!["advanced-usage.md"]);
        assert!(files[0].content.starts_with("# Advanced Usage\n\n1. Advanced Usage line 1"));
    }

    #[test]
    fn unknown_section_at_threshold_stays() {
        let files = plan_references(&extract_sections(&section("Advanced Usage", 29)));
        assert!(files.is_empty());
    }

    #[test]
    fn fallback_names_are_sanitized() {
        assert_eq!(fallback_slug("ci/cd_setup"), "cicd-setup");
        assert_eq!(fallback_slug("v2.0_notes"), "v2.0-notes");
        assert_eq!(fallback_slug(".."), "");
        assert_eq!(fallback_slug("日本語"), "");
    }

    #[test]
    fn fallback_cannot_clobber_fixed_reference() {
        // `examples!` is not a table entry but slugs to the same file name.
        let filler = (0..40).map(|i| format!("x{i}")).collect::<Vec<_>>().join("\n");
        let doc = format!("## Examples\nshort\n## Examples!\n{filler}");
        let files = plan_references(&extract_sections(&doc));

        assert_eq!(filenames(&files), vec!["examples.md"]);
        assert_eq!(files[0].content, "# Examples\n\nshort\n");
    }

    #[test]
    fn table_order_then_source_order() {
        let doc = format!(
            "{}\n## Examples\nex\n{}\n## Error Handling\nerr",
            section("Zeta", 31),
            section("Alpha", 31)
        );
        let files = plan_references(&extract_sections(&doc));
        assert_eq!(
            filenames(&files),
            vec!["errors.md", "examples.md", "zeta.md", "alpha.md"]
        );
    }

    #[test]
    fn strip_heading_variants() {
        assert_eq!(strip_heading("## Examples\n\nbody\n"), "body");
        assert_eq!(strip_heading("## Examples"), "");
        assert_eq!(strip_heading("  no heading "), "no heading");
    }
}
