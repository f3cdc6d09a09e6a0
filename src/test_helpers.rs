//! Shared test utilities: a builder for throwaway working folders.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteBuilder::new()
//!     .config("cards_per_page = 3\n")
//!     .article("100-hello", "Hello", "2024-05-02T10:00:00Z")
//!     .card("010-search", r#"{"template": "search", "position": 0, "sticky": true}"#)
//!     .build();
//!
//! let inventory = scan(site.path()).unwrap();
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Builds a working folder inside a fresh temp directory.
///
/// Every method panics with the failing path on I/O errors.
pub struct SiteBuilder {
    tmp: TempDir,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `config.toml`.
    pub fn config(self, toml: &str) -> Self {
        self.file("config.toml", toml)
    }

    /// An article folder with metadata and an HTML body.
    pub fn article(self, folder: &str, title: &str, published: &str) -> Self {
        self.page("articles", folder, title, published)
    }

    /// A standalone folder with metadata and an HTML body.
    pub fn standalone(self, folder: &str, title: &str) -> Self {
        self.page("standalones", folder, title, "2024-01-01T00:00:00Z")
    }

    fn page(self, section: &str, folder: &str, title: &str, published: &str) -> Self {
        let json = format!(
            r#"{{"title": "{title}", "description": "About {title}", "tags": ["test"], "date_published": "{published}"}}"#
        );
        self.page_json(&format!("{section}/{folder}"), &json).file(
            &format!("{section}/{folder}/content.html"),
            &format!("<p>Body of {title}</p>"),
        )
    }

    /// Write only `content.json` into `dir`.
    pub fn page_json(self, dir: &str, json: &str) -> Self {
        self.file(&format!("{dir}/content.json"), json)
    }

    /// A card folder with the given `card.json`.
    pub fn card(self, folder: &str, json: &str) -> Self {
        self.file(&format!("cards/{folder}/card.json"), json)
    }

    /// An `event.json` under a card's `events/` folder.
    pub fn event(self, card_folder: &str, id: &str, json: &str) -> Self {
        self.file(&format!("cards/{card_folder}/events/{id}/event.json"), json)
    }

    /// An arbitrary file, creating parent folders.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("create {}: {e}", parent.display()));
        }
        fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
        self
    }

    /// An empty folder.
    pub fn dir(self, rel: &str) -> Self {
        let path = self.tmp.path().join(rel);
        fs::create_dir_all(&path).unwrap_or_else(|e| panic!("create {}: {e}", path.display()));
        self
    }

    /// A real JPEG of the given size.
    pub fn jpeg(self, rel: &str, width: u32, height: u32) -> Self {
        let path = self.tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        write_jpeg(&path, width, height);
        self
    }

    pub fn build(self) -> TempDir {
        self.tmp
    }
}

/// Write a small synthetic JPEG.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path)
        .unwrap_or_else(|e| panic!("write jpeg {}: {e}", path.display()));
}

// =========================================================================
// Output lookups
// =========================================================================

/// Read an output file. Panics listing the output folder on a miss.
pub fn read_output(output: &Path, rel: &str) -> String {
    let path = output.join(rel);
    fs::read_to_string(&path).unwrap_or_else(|_| {
        let names: Vec<String> = fs::read_dir(output)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        panic!("output '{rel}' not found. Available: {names:?}")
    })
}
