//! Primary document builder.
//!
//! Reassembles a concise document from a [`SectionMap`]: frontmatter, a title
//! derived from the document identifier, then the well-known sections in
//! canonical order, each either verbatim or condensed per its policy.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::policy::{Condense, Disposition, SECTION_POLICIES, SectionPolicy};
use crate::sections::SectionMap;

/// Matches a numbered list item such as `3. Run the converter`.
static NUMBERED_STEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("valid regex"));

/// Build the concise primary document.
///
/// Sections absent from the policy table are not emitted. The output depends
/// only on `sections` and `document_id`.
#[instrument(skip_all, fields(sections = sections.len(), document_id = %document_id))]
pub fn build_summary(sections: &SectionMap, document_id: &str) -> String {
    let mut blocks: Vec<String> = vec![sections.frontmatter().to_string()];
    blocks.push(format!("\n# {}\n", title_from_id(document_id)));

    for policy in SECTION_POLICIES {
        let Some(content) = sections.get(policy.name) else {
            continue;
        };

        match policy.disposition(content) {
            Disposition::Inline => blocks.push(format!("{content}\n")),
            Disposition::Condensed => render_condensed(policy, content, &mut blocks),
        }
        debug!(section = policy.name, "section emitted");
    }

    blocks.join("\n")
}

/// Title for a document identifier: `pdf-to-text` → `Pdf To Text`.
pub fn title_from_id(document_id: &str) -> String {
    title_case(&document_id.replace('-', " "))
}

/// Uppercase every cased character that follows an uncased one, lowercase
/// the rest. Separators are kept as they are: `a--b` → `A--B`, `pdf2text` →
/// `Pdf2Text`.
pub(crate) fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;

    for c in text.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

// ---------------------------------------------------------------------------
// Condensed renderings
// ---------------------------------------------------------------------------

fn render_condensed(policy: &SectionPolicy, content: &str, blocks: &mut Vec<String>) {
    let heading = format!("## {}\n", policy.heading);

    match policy.condense {
        Condense::LeadParagraph { max_chars } => {
            let paragraphs: Vec<&str> = content.split("\n\n").collect();
            let lead = paragraphs.get(1).unwrap_or(&paragraphs[0]);
            // A lone heading paragraph carries no prose worth keeping.
            if !lead.starts_with("## ") {
                blocks.push(heading);
                blocks.push(format!("{}\n", truncate_chars(lead, max_chars)));
            }
        }
        Condense::Pointer => {
            blocks.push(heading);
            if let Some(target) = &policy.reference {
                blocks.push(format!("{}\n", target.pointer_sentence()));
            }
        }
        Condense::NumberedSteps { max } => {
            let steps: Vec<&str> = content
                .split('\n')
                .filter(|l| NUMBERED_STEP_RE.is_match(l.trim_start()))
                .take(max)
                .collect();

            // Without any numbered lines only the pointer is kept.
            if !steps.is_empty() {
                blocks.push(format!("{heading}\n{}\n", steps.join("\n")));
            }
            if let Some(target) = &policy.reference {
                blocks.push(format!("\n{}\n", target.pointer_sentence()));
            }
        }
        Condense::Bullets { max } => {
            let bullets = pick_lines(content, max, |l| l.trim_start().starts_with('-'));
            blocks.push(heading);
            blocks.push(format!("{bullets}\n"));
        }
        Condense::Links { max } => {
            let links = pick_lines(content, max, |l| {
                l.contains("](http") || l.trim_start().starts_with('-')
            });
            blocks.push(heading);
            blocks.push(format!("{links}\n"));
        }
    }
}

/// First `max` lines of `content` matching `keep`, joined with newlines.
fn pick_lines(content: &str, max: usize, keep: impl Fn(&str) -> bool) -> String {
    content
        .split('\n')
        .filter(|&l| keep(l))
        .take(max)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::extract_sections;

    fn section(heading: &str, body_lines: usize, line: impl Fn(usize) -> String) -> String {
        let mut out = vec![format!("## {heading}")];
        out.extend((1..=body_lines).map(line));
        out.join("\n")
    }

    #[test]
    fn title_from_id_title_cases_words() {
        assert_eq!(title_from_id("pdf-to-text"), "Pdf To Text");
        assert_eq!(title_from_id("API-client"), "Api Client");
        assert_eq!(title_from_id("single"), "Single");
    }

    #[test]
    fn title_case_keeps_separators_and_capitalizes_after_digits() {
        assert_eq!(title_from_id("a--b"), "A  B");
        assert_eq!(title_from_id("pdf2text"), "Pdf2Text");
        assert_eq!(title_case("ci/cd setup"), "Ci/Cd Setup");
        assert_eq!(title_case("it's"), "It'S");
    }

    #[test]
    fn document_without_headings_gets_only_title() {
        let sections = extract_sections("---\nname: x\n---\nSome prose without headings.");
        let summary = build_summary(&sections, "my-skill");

        assert_eq!(summary, "---\nname: x\n---\n\n# My Skill\n");
        assert!(!summary.contains("## "));
    }

    #[test]
    fn short_sections_are_kept_verbatim() {
        let doc = "## Prerequisites\n- Python 3\n\n## Output\n- a.txt\n- b.txt\n\n## Resources\n- [Docs](https://example.com)";
        let summary = build_summary(&extract_sections(doc), "tool");

        assert!(summary.contains("## Prerequisites\n- Python 3\n"));
        assert!(summary.contains("## Output\n- a.txt\n- b.txt\n"));
        assert!(summary.contains("## Resources\n- [Docs](https://example.com)\n"));
        assert!(!summary.contains("{baseDir}"));
    }

    #[test]
    fn instructions_at_threshold_stay_inline() {
        let instr = section("Instructions", 19, |i| format!("{i}. step {i}"));
        let summary = build_summary(&extract_sections(&instr), "tool");
        assert!(summary.contains(&instr));
        assert!(!summary.contains("implementation.md"));
    }

    #[test]
    fn long_instructions_condense_to_twelve_steps() {
        let instr = section("Instructions", 24, |i| {
            if i % 2 == 0 {
                format!("{}. step {}", i / 2, i / 2)
            } else {
                "   details".to_string()
            }
        });
        let summary = build_summary(&extract_sections(&instr), "tool");

        assert!(summary.contains("## Instructions\n\n1. step 1\n"));
        assert!(summary.contains("12. step 12"));
        assert!(!summary.contains("details"));
        assert!(summary.ends_with(
            "\nSee `{baseDir}/references/implementation.md` for detailed implementation guide.\n"
        ));
    }

    #[test]
    fn numbered_steps_cap_at_twelve() {
        let instr = section("Instructions", 25, |i| format!("{i}. step"));
        let summary = build_summary(&extract_sections(&instr), "tool");
        assert!(summary.contains("12. step"));
        assert!(!summary.contains("13. step"));
    }

    #[test]
    fn instructions_without_numbered_lines_keep_only_pointer() {
        let instr = section("Instructions", 25, |i| format!("prose line {i}"));
        let summary = build_summary(&extract_sections(&instr), "tool");

        assert!(!summary.contains("## Instructions"));
        assert!(!summary.contains("prose line"));
        assert!(summary.ends_with(
            "\nSee `{baseDir}/references/implementation.md` for detailed implementation guide.\n"
        ));
    }

    #[test]
    fn crlf_overview_is_kept() {
        let doc = "## Overview\r\n\r\nFirst para.\r\n\r\nSecond para.\r\n## Examples\r\nx";
        let summary = build_summary(&extract_sections(doc), "tool");

        assert!(summary.contains("## Overview\n\nFirst para.\n"));
        assert!(!summary.contains('\r'));
    }

    #[test]
    fn numbered_step_needs_space_after_dot() {
        assert!(NUMBERED_STEP_RE.is_match("10. Deploy"));
        assert!(!NUMBERED_STEP_RE.is_match("1.5 is a version"));
        assert!(!NUMBERED_STEP_RE.is_match("Step 1. first"));
    }

    #[test]
    fn error_handling_and_examples_always_point_to_references() {
        let doc = "## Error Handling\n- retry once\n- then fail\n\n## Examples\nSee below.";
        let summary = build_summary(&extract_sections(doc), "tool");

        assert!(summary.contains(
            "## Error Handling\n\nSee `{baseDir}/references/errors.md` for comprehensive error handling.\n"
        ));
        assert!(summary.contains(
            "## Examples\n\nSee `{baseDir}/references/examples.md` for detailed examples.\n"
        ));
        assert!(!summary.contains("retry once"));
    }

    #[test]
    fn long_prerequisites_become_a_pointer() {
        let prereq = section("Prerequisites", 15, |i| format!("- dependency {i}"));
        let summary = build_summary(&extract_sections(&prereq), "tool");
        assert!(summary.contains("See `{baseDir}/references/prerequisites.md`"));
        assert!(!summary.contains("dependency 1"));
    }

    #[test]
    fn long_output_keeps_six_bullets() {
        let output = section("Output", 20, |i| {
            if i % 2 == 0 {
                format!("- file {i}")
            } else {
                format!("prose {i}")
            }
        });
        let summary = build_summary(&extract_sections(&output), "tool");

        assert!(summary.contains("## Output\n\n- file 2\n"));
        assert!(summary.contains("- file 12"));
        assert!(!summary.contains("- file 14"));
        assert!(!summary.contains("prose"));
    }

    #[test]
    fn long_resources_keep_five_links() {
        let resources = section("Resources", 12, |i| {
            if i <= 3 {
                format!("Read [guide {i}](https://example.com/{i})")
            } else {
                format!("- item {i}")
            }
        });
        let summary = build_summary(&extract_sections(&resources), "tool");

        assert!(summary.contains("Read [guide 1](https://example.com/1)"));
        assert!(summary.contains("- item 5"));
        assert!(!summary.contains("- item 6"));
    }

    #[test]
    fn overview_keeps_second_paragraph_truncated() {
        // Paragraph one is the heading itself, so the prose is paragraph two.
        let long = "x".repeat(600);
        let doc = format!("## Overview\n\n{long}\n\nThird.");
        let summary = build_summary(&extract_sections(&doc), "tool");

        assert!(summary.contains(&format!("## Overview\n\n{}\n", "x".repeat(500))));
        assert!(!summary.contains(&"x".repeat(501)));
        assert!(!summary.contains("Third."));
    }

    #[test]
    fn overview_without_prose_is_omitted() {
        let summary = build_summary(&extract_sections("## Overview\nInline text."), "tool");
        assert!(!summary.contains("Overview"));
    }

    #[test]
    fn sections_follow_canonical_order_and_unknown_are_dropped() {
        let doc = "## Examples\nex\n## Troubleshooting\nhelp\n## Prerequisites\n- git";
        let summary = build_summary(&extract_sections(doc), "tool");

        let prereq = summary.find("## Prerequisites").unwrap();
        let examples = summary.find("## Examples").unwrap();
        assert!(prereq < examples);
        assert!(!summary.contains("Troubleshooting"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn output_is_deterministic() {
        let doc = "## Output\n- a\n## Examples\nb";
        let sections = extract_sections(doc);
        assert_eq!(build_summary(&sections, "x"), build_summary(&sections, "x"));
    }
}
