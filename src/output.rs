//! CLI output formatting for scan, build and check.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Articles
//! 001 Agentic frameworks → /agentic-frameworks.html
//!     Source: 100650-agentic-frameworks/
//!
//! Standalones
//! 001 About → /about.html
//!     Source: about/
//!
//! Cards
//! 001 search at 0 (sticky)
//!     Source: 010-search/
//! 002 calendar_events at 4, 3 events
//!     Source: 050-upcoming/
//! ```
//!
//! ## Build
//!
//! ```text
//! Copied 2 files from justcopyme/
//! Card 010-search: search at 0 (sticky)
//! Article Agentic frameworks → /agentic-frameworks.html
//! Media 100650-agentic-frameworks
//!     3 files, 1 resized
//! Index index.html: 9 cards
//!
//! 12 articles, 1 standalone, 2 cards (1 sticky)
//! 14 cards on 2 index pages, 15 sitemap URLs
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::content::CardTemplate;
use crate::pipeline::{BuildEvent, BuildSummary, PageKind};
use crate::scan::{CardFolder, Inventory, PageSource};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn template_name(template: CardTemplate) -> &'static str {
    match template {
        CardTemplate::Search => "search",
        CardTemplate::Image => "image",
        CardTemplate::CalendarEvents => "calendar_events",
        CardTemplate::Article => "article",
    }
}

/// `search at 0 (sticky)`
fn card_line(template: CardTemplate, position: usize, sticky: bool) -> String {
    let sticky = if sticky { " (sticky)" } else { "" };
    format!("{} at {}{}", template_name(template), position, sticky)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Scan output
// ============================================================================

fn page_section(lines: &mut Vec<String>, title: &str, pages: &[PageSource]) {
    if pages.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(title.to_string());
    for (i, page) in pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.meta.title,
            page.url
        ));
        lines.push(format!("{}Source: {}/", indent(1), page.folder));
    }
}

fn card_section(lines: &mut Vec<String>, cards: &[CardFolder]) {
    if cards.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push("Cards".to_string());
    for (i, folder) in cards.iter().enumerate() {
        let card = &folder.card;
        let mut line = format!(
            "{} {}",
            format_index(i + 1),
            card_line(card.template, card.position, card.sticky)
        );
        if card.template == CardTemplate::CalendarEvents {
            line.push_str(&format!(", {}", plural(folder.events.len(), "event", "events")));
        }
        lines.push(line);
        lines.push(format!("{}Source: {}/", indent(1), folder.folder));
    }
}

/// Format the scanned working folder: articles, standalones, cards.
pub fn format_scan_output(inventory: &Inventory) -> Vec<String> {
    let mut lines = Vec::new();
    page_section(&mut lines, "Articles", &inventory.articles);
    page_section(&mut lines, "Standalones", &inventory.standalones);
    card_section(&mut lines, &inventory.cards);
    if lines.is_empty() {
        lines.push("No content found".to_string());
    }
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(inventory: &Inventory) {
    for line in format_scan_output(inventory) {
        println!("{}", line);
    }
}

// ============================================================================
// Build progress
// ============================================================================

/// Format one build progress event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::StaticCopied { files } => {
            vec![format!("Copied {} from justcopyme/", plural(*files, "file", "files"))]
        }
        BuildEvent::CardRegistered {
            folder,
            template,
            position,
            sticky,
        } => vec![format!(
            "Card {}: {}",
            folder,
            card_line(*template, *position, *sticky)
        )],
        BuildEvent::CardSkipped { folder } => {
            vec![format!("Card {}: skipped, no events", folder)]
        }
        BuildEvent::PageWritten { kind, title, url } => {
            let kind = match kind {
                PageKind::Article => "Article",
                PageKind::Standalone => "Page",
            };
            vec![format!("{} {} \u{2192} {}", kind, title, url)]
        }
        BuildEvent::MediaCopied {
            folder,
            files,
            resized,
        } => vec![
            format!("Media {}", folder),
            format!(
                "{}{}, {} resized",
                indent(1),
                plural(*files, "file", "files"),
                resized
            ),
        ],
        BuildEvent::IndexPageWritten { file, cards } => {
            vec![format!("Index {}: {}", file, plural(*cards, "card", "cards"))]
        }
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Format the totals reported after a build.
pub fn format_build_summary(summary: &BuildSummary) -> Vec<String> {
    let mut lines = format_counts(summary);
    lines.push(format!(
        "{} on {}, {}",
        plural(summary.displayed_cards, "card", "cards"),
        plural(summary.index_pages, "index page", "index pages"),
        plural(summary.sitemap_urls, "sitemap URL", "sitemap URLs")
    ));
    lines
}

/// Format the totals reported after a check.
pub fn format_check_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = format_counts(summary);
    lines.push(format!(
        "Index would show {} on {}",
        plural(summary.displayed_cards, "card", "cards"),
        plural(summary.index_pages, "page", "pages")
    ));
    lines
}

fn format_counts(summary: &BuildSummary) -> Vec<String> {
    vec![format!(
        "{}, {}, {} ({} sticky)",
        plural(summary.articles, "article", "articles"),
        plural(summary.standalones, "standalone", "standalones"),
        plural(summary.other_cards, "card", "cards"),
        summary.sticky_cards
    )]
}

/// Print build summary to stdout.
pub fn print_build_summary(summary: &BuildSummary) {
    for line in format_build_summary(summary) {
        println!("{}", line);
    }
}

/// Print check summary to stdout.
pub fn print_check_output(summary: &BuildSummary) {
    for line in format_check_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
