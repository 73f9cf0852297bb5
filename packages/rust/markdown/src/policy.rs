//! Per-section disclosure policy.
//!
//! One table drives both the summary builder and the reference planner: a
//! section's [`Disposition`] is computed here once, so a pointer sentence in
//! the primary document is emitted exactly when the file it names is written.

use crate::sections::{FRONTMATTER, HEADER, line_count};

/// Path prefix used in pointer sentences. `{baseDir}` is resolved by the
/// skill runtime, not by us.
pub const REFERENCE_BASE: &str = "{baseDir}/references";

/// Sections outside the table are externalized above this many lines.
pub const FALLBACK_MAX_INLINE_LINES: usize = 30;

/// How long a section may be and still stay inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineLimit {
    /// Always condensed, whatever the length.
    Never,
    /// Kept verbatim up to and including this many lines.
    UpTo(usize),
}

/// What the primary document keeps of a section that is not inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condense {
    /// One paragraph of prose, truncated to `max_chars` characters.
    LeadParagraph { max_chars: usize },
    /// Heading and pointer sentence only.
    Pointer,
    /// Numbered list items (`1. `), then the pointer sentence.
    NumberedSteps { max: usize },
    /// Bullet lines (`- `).
    Bullets { max: usize },
    /// Lines with an `http` link, or bullet lines.
    Links { max: usize },
}

/// The reference file a condensed section is moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceTarget {
    /// File name inside the references directory.
    pub filename: &'static str,
    /// Text of the `# ` title line at the top of the file.
    pub title: &'static str,
    /// Tail of the pointer sentence after the file path.
    pub pointer: &'static str,
}

impl ReferenceTarget {
    /// Sentence linking the primary document to this file.
    pub fn pointer_sentence(&self) -> String {
        format!("See `{REFERENCE_BASE}/{}` {}", self.filename, self.pointer)
    }
}

/// Decision for one section of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Condensed,
}

/// Disclosure rules for one well-known section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPolicy {
    /// Normalized section name (see [`crate::normalize_section_name`]).
    pub name: &'static str,
    /// Heading text used when the section is re-emitted condensed.
    pub heading: &'static str,
    pub inline: InlineLimit,
    pub condense: Condense,
    pub reference: Option<ReferenceTarget>,
}

impl SectionPolicy {
    /// Decide whether `content` stays inline.
    pub fn disposition(&self, content: &str) -> Disposition {
        match self.inline {
            InlineLimit::UpTo(max) if line_count(content) <= max => Disposition::Inline,
            _ => Disposition::Condensed,
        }
    }

    /// Reference file for `content`, if this section moves out of the
    /// primary document.
    pub fn externalized_to(&self, content: &str) -> Option<&ReferenceTarget> {
        match self.disposition(content) {
            Disposition::Condensed => self.reference.as_ref(),
            Disposition::Inline => None,
        }
    }
}

/// Well-known sections, in the order they appear in the primary document.
pub const SECTION_POLICIES: &[SectionPolicy] = &[
    SectionPolicy {
        name: "overview",
        heading: "Overview",
        inline: InlineLimit::Never,
        condense: Condense::LeadParagraph { max_chars: 500 },
        reference: None,
    },
    SectionPolicy {
        name: "prerequisites",
        heading: "Prerequisites",
        inline: InlineLimit::UpTo(15),
        condense: Condense::Pointer,
        reference: Some(ReferenceTarget {
            filename: "prerequisites.md",
            title: "Prerequisites",
            pointer: "for detailed requirements.",
        }),
    },
    SectionPolicy {
        name: "instructions",
        heading: "Instructions",
        inline: InlineLimit::UpTo(20),
        condense: Condense::NumberedSteps { max: 12 },
        reference: Some(ReferenceTarget {
            filename: "implementation.md",
            title: "Implementation Guide",
            pointer: "for detailed implementation guide.",
        }),
    },
    SectionPolicy {
        name: "output",
        heading: "Output",
        inline: InlineLimit::UpTo(15),
        condense: Condense::Bullets { max: 6 },
        reference: None,
    },
    SectionPolicy {
        name: "error_handling",
        heading: "Error Handling",
        inline: InlineLimit::Never,
        condense: Condense::Pointer,
        reference: Some(ReferenceTarget {
            filename: "errors.md",
            title: "Error Handling Reference",
            pointer: "for comprehensive error handling.",
        }),
    },
    SectionPolicy {
        name: "examples",
        heading: "Examples",
        inline: InlineLimit::Never,
        condense: Condense::Pointer,
        reference: Some(ReferenceTarget {
            filename: "examples.md",
            title: "Examples",
            pointer: "for detailed examples.",
        }),
    },
    SectionPolicy {
        name: "resources",
        heading: "Resources",
        inline: InlineLimit::UpTo(10),
        condense: Condense::Links { max: 5 },
        reference: None,
    },
];

/// Look up the policy for a section name.
pub fn policy_for(name: &str) -> Option<&'static SectionPolicy> {
    SECTION_POLICIES.iter().find(|p| p.name == name)
}

/// Whether a section is handled by name (synthetic entries or the table)
/// rather than by the size-based fallback.
pub fn is_known_section(name: &str) -> bool {
    name == FRONTMATTER || name == HEADER || policy_for(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn instructions_threshold_boundary() {
        let policy = policy_for("instructions").unwrap();
        assert_eq!(policy.disposition(&lines(20)), Disposition::Inline);
        assert_eq!(policy.disposition(&lines(21)), Disposition::Condensed);
        assert!(policy.externalized_to(&lines(20)).is_none());
        assert_eq!(
            policy.externalized_to(&lines(21)).map(|t| t.filename),
            Some("implementation.md")
        );
    }

    #[test]
    fn error_handling_is_never_inline() {
        let policy = policy_for("error_handling").unwrap();
        let short = "## Error Handling\n- retry\n- give up";
        assert_eq!(policy.disposition(short), Disposition::Condensed);
        assert_eq!(policy.externalized_to(short).unwrap().filename, "errors.md");
    }

    #[test]
    fn condensed_output_has_no_reference() {
        let policy = policy_for("output").unwrap();
        assert_eq!(policy.disposition(&lines(16)), Disposition::Condensed);
        assert!(policy.externalized_to(&lines(16)).is_none());
    }

    #[test]
    fn pointer_sentence_format() {
        let target = policy_for("examples").unwrap().reference.unwrap();
        assert_eq!(
            target.pointer_sentence(),
            "See `{baseDir}/references/examples.md` for detailed examples."
        );
    }

    #[test]
    fn canonical_order() {
        let names: Vec<_> = SECTION_POLICIES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "overview",
                "prerequisites",
                "instructions",
                "output",
                "error_handling",
                "examples",
                "resources"
            ]
        );
    }

    #[test]
    fn known_sections() {
        assert!(is_known_section("frontmatter"));
        assert!(is_known_section("header"));
        assert!(is_known_section("resources"));
        assert!(!is_known_section("troubleshooting"));
    }
}
