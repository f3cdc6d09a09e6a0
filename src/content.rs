//! Source models read from the working folder.
//!
//! Every article and standalone folder holds a `content.json` with the page
//! metadata and a body, either `content.html` (used verbatim) or `content.md`
//! (rendered with pulldown-cmark). Every card folder holds a `card.json`.
//!
//! ```json
//! {
//!   "title": "Agentic frameworks",
//!   "description": "Semantic Kernel and AutoGen side by side",
//!   "tags": ["ai", "dotnet"],
//!   "sections": ["AI"],
//!   "date_published": "2024-05-02T10:00:00Z",
//!   "date_modified": "2024-05-09T10:00:00Z",
//!   "image": "media/cover.png"
//! }
//! ```
//!
//! Parsing is strict: unknown keys, unknown card templates and negative card
//! positions are errors that name the offending file.

use chrono::{DateTime, Utc};
use pulldown_cmark::{Parser, html as md_html};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: `{field}` is missing or blank")]
    MissingField { path: PathBuf, field: &'static str },
    #[error("{0}: article cards are generated from articles/ and cannot be configured as cards")]
    ArticleTemplateInCards(PathBuf),
    #[error("No content.html or content.md in {0}")]
    MissingBody(PathBuf),
}

/// Page metadata from `content.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    pub date_published: DateTime<Utc>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
    /// Overrides the URL derived from the folder name.
    #[serde(default)]
    pub relative_url: Option<String>,
    /// Cover image, relative to the page folder (`media/cover.png`).
    #[serde(default)]
    pub image: Option<String>,
}

impl PageMeta {
    /// Modification date, falling back to the publication date.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.date_modified.unwrap_or(self.date_published)
    }

    fn validate(&self, path: &Path) -> Result<(), ContentError> {
        require(path, "title", Some(&self.title))?;
        require(path, "description", Some(&self.description))?;
        Ok(())
    }
}

/// Card kinds that can be configured in `card.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTemplate {
    Search,
    Image,
    CalendarEvents,
    Article,
}

/// A manually configured card from `card.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardSource {
    pub template: CardTemplate,
    /// Slot among the index cards.
    pub position: usize,
    #[serde(default)]
    pub sticky: bool,
    /// Also show the card in the right column of every page.
    #[serde(default)]
    pub right_column_position: Option<usize>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Image relative to the card folder (`media/banner.jpg`).
    #[serde(default)]
    pub image: Option<String>,
}

impl CardSource {
    fn validate(&self, path: &Path) -> Result<(), ContentError> {
        match self.template {
            CardTemplate::Article => Err(ContentError::ArticleTemplateInCards(path.to_path_buf())),
            CardTemplate::Image => {
                require(path, "title", self.title.as_deref())?;
                require(path, "link", self.link.as_deref())?;
                require(path, "image", self.image.as_deref())?;
                Ok(())
            }
            CardTemplate::Search | CardTemplate::CalendarEvents => Ok(()),
        }
    }
}

fn require(path: &Path, field: &'static str, value: Option<&str>) -> Result<(), ContentError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        }),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate `<dir>/content.json`.
pub fn read_page_meta(dir: &Path) -> Result<PageMeta, ContentError> {
    let path = dir.join("content.json");
    let meta: PageMeta = read_json(&path)?;
    meta.validate(&path)?;
    Ok(meta)
}

/// Read and validate `<dir>/card.json`.
pub fn read_card_source(dir: &Path) -> Result<CardSource, ContentError> {
    let path = dir.join("card.json");
    let card: CardSource = read_json(&path)?;
    card.validate(&path)?;
    Ok(card)
}

/// Load the page body as HTML.
///
/// `content.html` wins over `content.md`. A blank body counts as missing.
pub fn load_body(dir: &Path) -> Result<String, ContentError> {
    let html_path = dir.join("content.html");
    let md_path = dir.join("content.md");

    let body = if html_path.is_file() {
        fs::read_to_string(&html_path)?
    } else if md_path.is_file() {
        render_markdown(&fs::read_to_string(&md_path)?)
    } else {
        String::new()
    };

    if body.trim().is_empty() {
        return Err(ContentError::MissingBody(dir.to_path_buf()));
    }
    Ok(body)
}

fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}
