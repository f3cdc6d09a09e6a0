//! Working-folder scanning.
//!
//! Reads every content source up front so that parse errors abort the build
//! before anything is written. The result is an [`Inventory`] the pipeline
//! renders from.
//!
//! ## Directory Structure
//!
//! ```text
//! site/                                  # Working folder
//! ├── config.toml                        # Site configuration (optional)
//! ├── justcopyme/                        # Copied verbatim to the output root
//! ├── articles/
//! │   ├── 100650-agentic-frameworks/
//! │   │   ├── content.json               # Title, dates, tags, ...
//! │   │   ├── content.html               # or content.md
//! │   │   └── media/                     # Copied to output media/
//! │   └── 100700-vector-search/
//! ├── standalones/
//! │   └── about/
//! │       ├── content.json
//! │       └── content.md
//! └── cards/
//!     ├── 010-search/
//!     │   └── card.json
//!     └── 050-upcoming/
//!         ├── card.json
//!         └── events/<id>/event.json
//! ```
//!
//! Folders are visited in name order. Missing `articles/`, `standalones/` or
//! `cards/` folders are treated as empty. Hidden folders are ignored.
//!
//! ## Validation
//!
//! - Every page folder must have metadata and a body
//! - Every page must resolve to a URL, and no two pages may share one
//! - Card folders must not use the `article` template

use crate::config::{self, SiteConfig};
use crate::content::{self, CardSource, CardTemplate, ContentError, PageMeta};
use crate::events::{CalendarEvent, EventError, EventSource, FileEventSource};
use crate::naming::{normalize_relative_url, parse_entry_name};
use crate::render;
use crate::sitemap::SITEMAP_FILE;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Event error: {0}")]
    Events(#[from] EventError),
    #[error("Working folder not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Cannot derive a page URL from folder {0}; set relative_url in content.json")]
    NoPageUrl(PathBuf),
    #[error("Duplicate page URL {0}")]
    DuplicateUrl(String),
    #[error("relative_url {url:?} in {path} must stay inside the site")]
    InvalidUrl { path: PathBuf, url: String },
}

pub const ARTICLES_DIR: &str = "articles";
pub const STANDALONES_DIR: &str = "standalones";
pub const CARDS_DIR: &str = "cards";
pub const JUSTCOPYME_DIR: &str = "justcopyme";
pub const MEDIA_DIR: &str = "media";

/// Everything found in the working folder.
#[derive(Debug)]
pub struct Inventory {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub articles: Vec<PageSource>,
    pub standalones: Vec<PageSource>,
    pub cards: Vec<CardFolder>,
}

impl Inventory {
    /// `justcopyme/`, if present.
    pub fn justcopyme_dir(&self) -> Option<PathBuf> {
        let dir = self.root.join(JUSTCOPYME_DIR);
        dir.is_dir().then_some(dir)
    }
}

/// An article or standalone page folder.
#[derive(Debug, Clone)]
pub struct PageSource {
    /// Folder name, e.g. `100650-agentic-frameworks`.
    pub folder: String,
    pub dir: PathBuf,
    /// Site-relative URL, e.g. `/agentic-frameworks.html`.
    pub url: String,
    pub meta: PageMeta,
    /// Body HTML.
    pub body: String,
}

/// A configured card folder.
#[derive(Debug, Clone)]
pub struct CardFolder {
    pub folder: String,
    pub dir: PathBuf,
    pub card: CardSource,
    /// Loaded for `calendar_events` cards, empty otherwise.
    pub events: Vec<CalendarEvent>,
}

/// `media/` inside a content folder, if present.
pub fn media_dir(dir: &Path) -> Option<PathBuf> {
    let media = dir.join(MEDIA_DIR);
    media.is_dir().then_some(media)
}

pub fn scan(root: &Path) -> Result<Inventory, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let config = config::load_config(root)?;
    let articles = scan_pages(&root.join(ARTICLES_DIR))?;
    let standalones = scan_pages(&root.join(STANDALONES_DIR))?;
    check_unique_urls(articles.iter().chain(&standalones))?;
    let cards = scan_cards(&root.join(CARDS_DIR))?;

    Ok(Inventory {
        root: root.to_path_buf(),
        config,
        articles,
        standalones,
        cards,
    })
}

fn scan_pages(dir: &Path) -> Result<Vec<PageSource>, ScanError> {
    collect_subdirs(dir)?
        .into_iter()
        .map(|path| read_page(&path))
        .collect()
}

fn read_page(dir: &Path) -> Result<PageSource, ScanError> {
    let folder = folder_name(dir);
    let meta = content::read_page_meta(dir)?;
    let body = content::load_body(dir)?;

    let url = match &meta.relative_url {
        Some(url) => normalize_relative_url(url).ok_or_else(|| ScanError::InvalidUrl {
            path: dir.to_path_buf(),
            url: url.clone(),
        })?,
        None => parse_entry_name(&folder)
            .page_url()
            .ok_or_else(|| ScanError::NoPageUrl(dir.to_path_buf()))?,
    };

    Ok(PageSource {
        folder,
        dir: dir.to_path_buf(),
        url,
        meta,
        body,
    })
}

fn scan_cards(dir: &Path) -> Result<Vec<CardFolder>, ScanError> {
    let mut cards = Vec::new();
    for path in collect_subdirs(dir)? {
        let card = content::read_card_source(&path)?;
        let events = if card.template == CardTemplate::CalendarEvents {
            FileEventSource::new(path.join("events")).events()?
        } else {
            Vec::new()
        };
        cards.push(CardFolder {
            folder: folder_name(&path),
            dir: path,
            card,
            events,
        });
    }
    Ok(cards)
}

/// Page URLs must differ from each other and from the files the build
/// writes itself: index pages and the sitemap.
fn check_unique_urls<'a>(pages: impl Iterator<Item = &'a PageSource>) -> Result<(), ScanError> {
    let mut seen = HashSet::new();
    for page in pages {
        let file = page.url.trim_start_matches('/');
        let reserved = file == SITEMAP_FILE || render::is_page_file_name(file);
        if reserved || !seen.insert(page.url.as_str()) {
            return Err(ScanError::DuplicateUrl(page.url.clone()));
        }
    }
    Ok(())
}

/// Visible subdirectories of `dir`, sorted by name. A missing `dir` is empty.
fn collect_subdirs(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && !folder_name(p).starts_with('.'))
        .collect();
    entries.sort();
    Ok(entries)
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn scan_finds_all_sources() {
        let site = SiteBuilder::new()
            .article("100650-agentic-frameworks", "Agentic frameworks", "2024-05-02T10:00:00Z")
            .article("100700-vector-search", "Vector search", "2024-06-01T10:00:00Z")
            .standalone("about", "About")
            .card("010-search", r#"{"template": "search", "position": 0, "sticky": true}"#)
            .build();

        let inventory = scan(site.path()).unwrap();
        assert_eq!(inventory.articles.len(), 2);
        assert_eq!(inventory.standalones.len(), 1);
        assert_eq!(inventory.cards.len(), 1);
        assert_eq!(inventory.config.cards_per_page, 9);
    }

    #[test]
    fn pages_visited_in_folder_order() {
        let site = SiteBuilder::new()
            .article("200-second", "Second", "2024-01-01T00:00:00Z")
            .article("100-first", "First", "2024-02-01T00:00:00Z")
            .build();

        let inventory = scan(site.path()).unwrap();
        let folders: Vec<&str> = inventory.articles.iter().map(|p| p.folder.as_str()).collect();
        assert_eq!(folders, vec!["100-first", "200-second"]);
    }

    #[test]
    fn url_derived_from_folder_name() {
        let site = SiteBuilder::new()
            .article("100650-agentic-frameworks", "Agentic", "2024-05-02T10:00:00Z")
            .build();

        let inventory = scan(site.path()).unwrap();
        assert_eq!(inventory.articles[0].url, "/agentic-frameworks.html");
    }

    #[test]
    fn relative_url_overrides_folder_name() {
        let site = SiteBuilder::new()
            .page_json(
                "standalones/about",
                r#"{"title": "About", "description": "Who", "date_published": "2024-01-01T00:00:00Z", "relative_url": "who-am-i.html"}"#,
            )
            .file("standalones/about/content.md", "Hello.")
            .build();

        let inventory = scan(site.path()).unwrap();
        assert_eq!(inventory.standalones[0].url, "/who-am-i.html");
    }

    #[test]
    fn duplicate_urls_are_rejected() {
        let site = SiteBuilder::new()
            .article("100-notes", "Notes", "2024-01-01T00:00:00Z")
            .standalone("notes", "Notes again")
            .build();

        assert!(matches!(
            scan(site.path()),
            Err(ScanError::DuplicateUrl(url)) if url == "/notes.html"
        ));
    }

    #[test]
    fn relative_url_outside_site_is_rejected() {
        let site = SiteBuilder::new()
            .page_json(
                "standalones/about",
                r#"{"title": "About", "description": "Who", "date_published": "2024-01-01T00:00:00Z", "relative_url": "../escaped.html"}"#,
            )
            .file("standalones/about/content.md", "Hello.")
            .build();

        assert!(matches!(
            scan(site.path()),
            Err(ScanError::InvalidUrl { url, .. }) if url == "../escaped.html"
        ));
    }

    #[test]
    fn urls_of_generated_files_are_reserved() {
        for reserved in ["index.html", "/index-page-3.html", "sitemap.xml"] {
            let site = SiteBuilder::new()
                .page_json(
                    "standalones/home",
                    &format!(
                        r#"{{"title": "Home", "description": "Start", "date_published": "2024-01-01T00:00:00Z", "relative_url": "{reserved}"}}"#
                    ),
                )
                .file("standalones/home/content.md", "Hello.")
                .build();

            let expected = format!("/{}", reserved.trim_start_matches('/'));
            assert!(
                matches!(scan(site.path()), Err(ScanError::DuplicateUrl(url)) if url == expected),
                "{reserved} accepted"
            );
        }
    }

    #[test]
    fn folder_named_like_index_page_is_rejected() {
        let site = SiteBuilder::new().standalone("index-page-2", "Second").build();
        assert!(matches!(scan(site.path()), Err(ScanError::DuplicateUrl(_))));
    }

    #[test]
    fn missing_sections_are_empty() {
        let site = SiteBuilder::new().build();
        let inventory = scan(site.path()).unwrap();
        assert!(inventory.articles.is_empty());
        assert!(inventory.standalones.is_empty());
        assert!(inventory.cards.is_empty());
        assert_eq!(inventory.justcopyme_dir(), None);
    }

    #[test]
    fn missing_root_is_error() {
        let site = SiteBuilder::new().build();
        let missing = site.path().join("nope");
        assert!(matches!(scan(&missing), Err(ScanError::RootNotFound(_))));
    }

    #[test]
    fn calendar_card_loads_events() {
        let site = SiteBuilder::new()
            .card(
                "050-upcoming",
                r#"{"template": "calendar_events", "position": 1, "title": "Upcoming"}"#,
            )
            .event(
                "050-upcoming",
                "meetup",
                r#"{"title": "Meetup", "date": "2024-05-02T18:30:00Z"}"#,
            )
            .build();

        let inventory = scan(site.path()).unwrap();
        assert_eq!(inventory.cards[0].events.len(), 1);
        assert_eq!(inventory.cards[0].events[0].title, "Meetup");
    }

    #[test]
    fn article_template_in_cards_is_rejected() {
        let site = SiteBuilder::new()
            .card("010-bad", r#"{"template": "article", "position": 0}"#)
            .build();

        assert!(matches!(
            scan(site.path()),
            Err(ScanError::Content(ContentError::ArticleTemplateInCards(_)))
        ));
    }

    #[test]
    fn page_without_body_is_rejected() {
        let site = SiteBuilder::new()
            .page_json(
                "articles/100-empty",
                r#"{"title": "Empty", "description": "d", "date_published": "2024-01-01T00:00:00Z"}"#,
            )
            .build();

        assert!(matches!(
            scan(site.path()),
            Err(ScanError::Content(ContentError::MissingBody(_)))
        ));
    }

    #[test]
    fn hidden_folders_are_ignored() {
        let site = SiteBuilder::new()
            .article("100-visible", "Visible", "2024-01-01T00:00:00Z")
            .dir("articles/.git")
            .build();

        let inventory = scan(site.path()).unwrap();
        assert_eq!(inventory.articles.len(), 1);
    }

    #[test]
    fn justcopyme_detected() {
        let site = SiteBuilder::new()
            .file("justcopyme/robots.txt", "User-agent: *")
            .build();
        let inventory = scan(site.path()).unwrap();
        assert!(inventory.justcopyme_dir().is_some());
    }
}
