//! Sitemap generation.
//!
//! Pages are added from worker threads as they are written; the XML is
//! produced once at the end of the build.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/agentic-frameworks.html</loc>
//!     <lastmod>2024-05-09</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::config::SiteInfo;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};

/// Output file name, at the root of the site.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlEntry {
    relative_url: String,
    lastmod: DateTime<Utc>,
}

/// Thread-safe collector of sitemap entries.
#[derive(Debug, Default)]
pub struct SitemapBuilder {
    urls: Mutex<Vec<UrlEntry>>,
}

impl SitemapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, relative_url: &str, lastmod: DateTime<Utc>) {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(UrlEntry {
                relative_url: relative_url.to_string(),
                lastmod,
            });
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sitemap XML with absolute locations, sorted by URL.
    pub fn into_xml(self, site: &SiteInfo) -> String {
        let mut urls = self
            .urls
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        urls.sort_by(|a, b| a.relative_url.cmp(&b.relative_url));

        let mut xml = String::with_capacity(256 + urls.len() * 128);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in urls {
            let loc = site.absolute_url(&entry.relative_url);
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.lastmod.format("%Y-%m-%d")
            ));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
