//! # Cardpress
//!
//! A static blog builder whose index pages are grids of cards. Every article
//! contributes a card; hand-configured cards (a search box, an image tile, a
//! list of upcoming events) are mixed in at fixed positions, and sticky cards
//! repeat on every index page.
//!
//! # Architecture
//!
//! ```text
//! 1. Scan     site/      →  Inventory        (parse every JSON file and body)
//! 2. Build    Inventory  →  dist/            (pages, media, cards registered)
//! 3. Index    sealed registry → index*.html  (count, paginate, compose)
//! ```
//!
//! Scanning reads everything before anything is written, so a malformed
//! `content.json` or `card.json` aborts the build with the offending path and
//! an untouched output folder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`cards`] | Card registry, displayed-card count, page composition |
//! | [`scan`] | Walks the working folder into an [`scan::Inventory`] |
//! | [`content`] | `content.json`, `card.json` and page bodies (HTML or Markdown) |
//! | [`events`] | Calendar events behind the [`events::EventSource`] seam |
//! | [`pipeline`] | Build and check drivers, progress events, summary |
//! | [`render`] | Maud templates for cards and pages |
//! | [`media`] | `media/` copying with `-small` variants via the `image` crate |
//! | [`sitemap`] | Thread-safe `sitemap.xml` collection |
//! | [`minify`] | HTML and XML minification |
//! | [`config`] | `config.toml` loading, stock defaults, validation |
//! | [`naming`] | `NNN-slug` folder-name convention |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Seal Before Paging
//!
//! Cards are registered from rayon workers while pages are rendered, so
//! their arrival order is not deterministic. [`cards::CardRegistry::seal`]
//! consumes the registry and sorts it once; counting and composition only
//! exist on the sealed [`cards::FrozenCardRegistry`]. Paging a registry that
//! is still being filled is a type error rather than a race.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system. Templates are Rust expressions, interpolation is
//! escaped by default, and there is no template directory to ship.
//!
//! ## Cards Are Opaque HTML
//!
//! The card engine never looks inside a card. Rendering happens before
//! registration and the engine only orders strings, which keeps paging
//! testable without any templates.

pub mod cards;
pub mod config;
pub mod content;
pub mod events;
pub mod media;
pub mod minify;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_helpers;
