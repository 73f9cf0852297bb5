//! Section extraction.
//!
//! Splits a skill document into its frontmatter block and the regions between
//! `## ` headings. Only second-level headings delimit sections; everything
//! else (deeper headings, code fences, lists) is opaque content.

use std::borrow::Cow;

use tracing::{debug, instrument, warn};

/// Name of the synthetic entry holding the metadata block.
pub const FRONTMATTER: &str = "frontmatter";

/// Name of the synthetic entry holding body text before the first heading.
pub const HEADER: &str = "header";

/// Line that opens and closes the metadata block.
const FRONTMATTER_DELIMITER: &str = "---";

/// Prefix of a section heading line.
const HEADING_PREFIX: &str = "## ";

/// Separator that replaces whitespace runs in section names.
pub const NAME_SEPARATOR: &str = "_";

// ---------------------------------------------------------------------------
// SectionMap
// ---------------------------------------------------------------------------

/// Section name → section content.
///
/// Iteration follows first-insertion order. Inserting an existing name
/// replaces its content in place and records the name in
/// [`SectionMap::collisions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
    collisions: Vec<String>,
}

impl SectionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a section.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();

        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => {
                if !self.collisions.contains(&name) {
                    self.collisions.push(name);
                }
                entry.1 = content;
            }
            None => self.entries.push((name, content)),
        }
    }

    /// Content of a section, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The metadata block, or `""` when the document has none.
    pub fn frontmatter(&self) -> &str {
        self.get(FRONTMATTER).unwrap_or_default()
    }

    /// Section names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, content)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names that were inserted more than once (later content won).
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Parse a document into a [`SectionMap`].
///
/// The result always holds [`FRONTMATTER`] and [`HEADER`], even when empty.
/// Each heading section's content starts with its own heading line and is
/// trimmed of leading and trailing blank lines.
#[instrument(skip_all, fields(len = content.len()))]
pub fn extract_sections(content: &str) -> SectionMap {
    let content = normalize_line_endings(content);
    let lines: Vec<&str> = content.split('\n').collect();
    let mut sections = SectionMap::new();

    let (frontmatter, body_start) = split_frontmatter(&lines);
    sections.insert(FRONTMATTER, frontmatter);

    let mut current = HEADER.to_string();
    let mut buffer: Vec<&str> = Vec::new();

    for &line in &lines[body_start..] {
        if let Some(heading) = line.strip_prefix(HEADING_PREFIX) {
            sections.insert(current, trim_blank_lines(&buffer));
            current = normalize_section_name(heading);
            buffer = vec![line];
        } else {
            buffer.push(line);
        }
    }
    sections.insert(current, trim_blank_lines(&buffer));

    if !sections.collisions().is_empty() {
        warn!(
            collisions = ?sections.collisions(),
            "duplicate section names, later sections overwrite earlier ones"
        );
    }

    debug!(sections = sections.len(), "sections extracted");
    sections
}

/// Derive a section name from heading text: lowercase, whitespace runs
/// collapsed into [`NAME_SEPARATOR`].
pub fn normalize_section_name(heading: &str) -> String {
    heading
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
        .to_lowercase()
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Number of lines in `text`, counting newline separators (`"a\n"` is two
/// lines, `""` is one).
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Return the verbatim frontmatter block and the index of the first body line.
///
/// An opening delimiter without a closing one captures the whole document as
/// frontmatter, and the body is still read from the first line.
fn split_frontmatter(lines: &[&str]) -> (String, usize) {
    let opens = lines
        .first()
        .is_some_and(|l| l.trim() == FRONTMATTER_DELIMITER);
    if !opens {
        return (String::new(), 0);
    }

    match lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == FRONTMATTER_DELIMITER)
    {
        Some(offset) => {
            let close = offset + 1;
            (lines[..=close].join("\n"), close + 1)
        }
        None => {
            warn!("frontmatter delimiter is never closed, capturing to end of document");
            (lines.join("\n"), 0)
        }
    }
}

/// Join lines, dropping blank lines at both ends.
fn trim_blank_lines(lines: &[&str]) -> String {
    let is_blank = |l: &&str| l.trim().is_empty();
    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return String::new();
    };
    let end = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(start);
    lines[start..=end].join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
