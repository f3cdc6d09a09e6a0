//! Folder-name parsing for the `NNN-slug` convention.
//!
//! Article and standalone folders are named with an optional numeric prefix
//! that keeps them sorted on disk, followed by the slug used in the page URL:
//!
//! - `100650-agentic-frameworks/` → `/agentic-frameworks.html`
//! - `about-me/` → `/about-me.html`
//!
//! A `relative_url` in `content.json` takes precedence over the derived one.

use std::path::{Component, Path};

/// Result of parsing a folder name like `100650-agentic-frameworks`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (`100650` above).
    pub number: Option<u64>,
    /// Name after the prefix, dashes preserved. For unnumbered folders this
    /// is the full input.
    pub slug: String,
    /// Slug with dashes converted to spaces.
    pub display_title: String,
}

impl ParsedName {
    /// Site-relative page URL, or `None` for a number-only folder name.
    pub fn page_url(&self) -> Option<String> {
        if self.slug.is_empty() {
            None
        } else {
            Some(format!("/{}.html", self.slug))
        }
    }
}

/// Parse a folder name following the `NNN-slug` convention.
///
/// - `"100650-agentic-frameworks"` → number=Some(100650), slug="agentic-frameworks"
/// - `"007"` → number=Some(7), slug=""
/// - `"about-me"` → number=None, slug="about-me"
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u64>()
    {
        return ParsedName {
            number: Some(num),
            slug: rest.to_string(),
            display_title: rest.replace('-', " "),
        };
    }
    if let Ok(num) = name.parse::<u64>() {
        return ParsedName {
            number: Some(num),
            slug: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        slug: name.to_string(),
        display_title: name.replace('-', " "),
    }
}

/// Normalize a configured URL to the site-relative form `/path`.
///
/// Returns `None` for an empty URL or one with `.` or `..` segments, since
/// the page would be written outside the output folder or over it.
pub fn normalize_relative_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_start_matches('/');
    let mut components = Path::new(trimmed).components().peekable();
    components.peek()?;
    components
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| format!("/{trimmed}"))
}
