//! Section extraction and progressive-disclosure rendering for skill documents.
//!
//! A document is split on `## ` headings into a [`SectionMap`]. From that map,
//! [`build_summary`] renders the concise primary document and
//! [`plan_references`] renders the detail files it points to. Both consult the
//! same [`SECTION_POLICIES`] table, so every pointer sentence names a file
//! that is actually planned.
//!
//! Nothing in this crate touches the filesystem.

mod policy;
mod references;
mod sections;
mod summary;

pub use policy::{
    Condense, Disposition, FALLBACK_MAX_INLINE_LINES, InlineLimit, REFERENCE_BASE,
    ReferenceTarget, SECTION_POLICIES, SectionPolicy, is_known_section, policy_for,
};
pub use references::{ReferenceFile, plan_references};
pub use sections::{
    FRONTMATTER, HEADER, NAME_SEPARATOR, SectionMap, extract_sections, line_count,
    normalize_line_endings, normalize_section_name,
};
pub use summary::{build_summary, title_from_id};
