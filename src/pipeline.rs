//! Site build: from a scanned [`Inventory`] to a finished output folder.
//!
//! ## Phases
//!
//! ```text
//! 1. Prepare    wipe <output>, copy justcopyme/ to the output root
//! 2. Cards      render every card folder, register it, copy its media
//!               (parallel; builds the right column)
//! 3. Pages      render and write standalones and articles, register one
//!               card per article, copy their media (parallel)
//! 4. Index      seal the registry, compose and write every index page
//! 5. Sitemap    write sitemap.xml
//! ```
//!
//! Phases 2 and 3 both register cards from rayon workers. The registry is
//! sealed only after both have joined, so the index always sees every card.
//!
//! `check` runs phases 2 to 4 in memory: every card is rendered and every
//! index page composed, but nothing is written.
//!
//! ## Progress
//!
//! Each step reports a [`BuildEvent`] on an optional channel. The CLI prints
//! them from a separate thread; tests usually pass `None`.

use crate::cards::{self, CardError, CardRegistry, FrozenCardRegistry};
use crate::config::SiteConfig;
use crate::content::CardTemplate;
use crate::media::{
    CopiedMedia, ImageBackend, MediaError, RustBackend, SmallVariant, check_media_collisions,
    copy_media,
};
use crate::minify::{MinifyType, minify};
use crate::render::{self, Paging};
use crate::scan::{self, CardFolder, Inventory, MEDIA_DIR, PageSource};
use crate::sitemap::{SITEMAP_FILE, SitemapBuilder};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Card error: {0}")]
    Cards(#[from] CardError),
    #[error("Media error: {0}")]
    Media(#[from] MediaError),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Output folder {0} would replace the working folder")]
    OutputIsSource(PathBuf),
}

/// Which kind of content folder a page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Article,
    Standalone,
}

/// Progress reported while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// `justcopyme/` copied to the output root.
    StaticCopied { files: usize },
    CardRegistered {
        folder: String,
        template: CardTemplate,
        position: usize,
        sticky: bool,
    },
    /// A calendar card with no events.
    CardSkipped { folder: String },
    PageWritten {
        kind: PageKind,
        title: String,
        url: String,
    },
    MediaCopied {
        folder: String,
        files: usize,
        resized: usize,
    },
    IndexPageWritten {
        file: String,
        cards: usize,
    },
}

/// Counts reported at the end of a build or check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub articles: usize,
    pub standalones: usize,
    /// Sticky and non-sticky cards registered from card folders.
    pub other_cards: usize,
    pub sticky_cards: usize,
    /// Card slots across all index pages, sticky repeats included.
    pub displayed_cards: usize,
    pub index_pages: usize,
    /// Zero for a check.
    pub sitemap_urls: usize,
}

/// Build the site into `output` using the `image` crate for resizing.
pub fn build(
    inventory: &Inventory,
    output: &Path,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    build_with_backend(&RustBackend::new(), inventory, output, Utc::now(), events)
}

/// Build with a specific backend and clock (allows testing with mock).
pub fn build_with_backend(
    backend: &impl ImageBackend,
    inventory: &Inventory,
    output: &Path,
    now: DateTime<Utc>,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    check_media(inventory)?;
    prepare_output(&inventory.root, output)?;
    if let Some(dir) = inventory.justcopyme_dir() {
        let files = copy_tree(&dir, output)?;
        emit(&events, BuildEvent::StaticCopied { files });
    }

    let site = OutputSite {
        backend,
        root: output,
        config: &inventory.config,
        sitemap: SitemapBuilder::new(),
    };
    let ctx = BuildContext {
        inventory,
        now,
        events: &events,
        output: Some(&site),
    };

    let registry = CardRegistry::new();
    let right_column = ctx.cards_phase(&registry)?;
    ctx.pages_phase(&registry, &right_column)?;
    let frozen = registry.seal();
    let mut summary = ctx.index_phase(&frozen, &right_column)?;

    summary.sitemap_urls = site.sitemap.len();
    let xml = site.sitemap.into_xml(&inventory.config.site);
    fs::write(
        output.join(SITEMAP_FILE),
        minify(MinifyType::Xml(xml.as_bytes()), &inventory.config.output),
    )?;

    Ok(summary)
}

/// Render, register and compose everything without writing output.
///
/// Catches every error a build would hit except I/O on the output folder.
pub fn check(inventory: &Inventory, now: DateTime<Utc>) -> Result<BuildSummary, BuildError> {
    check_media(inventory)?;
    let events = None;
    let ctx: BuildContext<'_, RustBackend> = BuildContext {
        inventory,
        now,
        events: &events,
        output: None,
    };

    let registry = CardRegistry::new();
    let right_column = ctx.cards_phase(&registry)?;
    ctx.pages_phase(&registry, &right_column)?;
    let frozen = registry.seal();
    ctx.index_phase(&frozen, &right_column)
}

// ============================================================================
// Build context
// ============================================================================

/// Where a real build writes to.
struct OutputSite<'a, B: ImageBackend> {
    backend: &'a B,
    root: &'a Path,
    config: &'a SiteConfig,
    sitemap: SitemapBuilder,
}

struct BuildContext<'a, B: ImageBackend> {
    inventory: &'a Inventory,
    now: DateTime<Utc>,
    events: &'a Option<Sender<BuildEvent>>,
    /// `None` when checking.
    output: Option<&'a OutputSite<'a, B>>,
}

impl<B: ImageBackend> BuildContext<'_, B> {
    /// Register every card folder. Returns the right column in display order.
    fn cards_phase(&self, registry: &CardRegistry) -> Result<Vec<String>, BuildError> {
        let mut column: Vec<(usize, String)> = self
            .inventory
            .cards
            .par_iter()
            .map(|folder| self.process_card(folder, registry))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        // Stable: equal positions keep folder order.
        column.sort_by_key(|(position, _)| *position);
        Ok(column.into_iter().map(|(_, html)| html).collect())
    }

    fn process_card(
        &self,
        folder: &CardFolder,
        registry: &CardRegistry,
    ) -> Result<Option<(usize, String)>, BuildError> {
        let Some(markup) = render::render_card(folder) else {
            emit(
                self.events,
                BuildEvent::CardSkipped {
                    folder: folder.folder.clone(),
                },
            );
            return Ok(None);
        };
        let html = markup.into_string();
        let card = &folder.card;
        registry.register_other_card(html.clone(), card.position, card.sticky)?;
        emit(
            self.events,
            BuildEvent::CardRegistered {
                folder: folder.folder.clone(),
                template: card.template,
                position: card.position,
                sticky: card.sticky,
            },
        );

        if let Some(site) = self.output {
            self.copy_folder_media(site, &folder.folder, &folder.dir, site.config.media.card_small_width)?;
        }
        Ok(card.right_column_position.map(|position| (position, html)))
    }

    /// Write every standalone and article page, registering article cards.
    fn pages_phase(
        &self,
        registry: &CardRegistry,
        right_column: &[String],
    ) -> Result<(), BuildError> {
        let standalones = self
            .inventory
            .standalones
            .iter()
            .map(|page| (PageKind::Standalone, page));
        let articles = self
            .inventory
            .articles
            .iter()
            .map(|page| (PageKind::Article, page));
        let pages: Vec<(PageKind, &PageSource)> = standalones.chain(articles).collect();

        pages
            .par_iter()
            .try_for_each(|&(kind, page)| self.process_page(kind, page, registry, right_column))
    }

    fn process_page(
        &self,
        kind: PageKind,
        page: &PageSource,
        registry: &CardRegistry,
        right_column: &[String],
    ) -> Result<(), BuildError> {
        if kind == PageKind::Article {
            let card = render::render_article_card(page, self.now).into_string();
            registry.register_article_card(card, page.meta.date_published)?;
        }

        let Some(site) = self.output else {
            return Ok(());
        };

        let site_info = &site.config.site;
        let markup = match kind {
            PageKind::Article => render::render_article_page(site_info, page, right_column, self.now),
            PageKind::Standalone => render::render_standalone_page(site_info, page, right_column),
        };
        write_html(site, &page.url, &markup.into_string())?;
        site.sitemap.add(&page.url, page.meta.last_modified());
        emit(
            self.events,
            BuildEvent::PageWritten {
                kind,
                title: page.meta.title.clone(),
                url: page.url.clone(),
            },
        );

        self.copy_folder_media(site, &page.folder, &page.dir, site.config.media.page_small_width)
    }

    /// Seal-time counting and one composed page per index file.
    fn index_phase(
        &self,
        frozen: &FrozenCardRegistry,
        right_column: &[String],
    ) -> Result<BuildSummary, BuildError> {
        let cards_per_page = self.inventory.config.cards_per_page;
        let total = frozen.total_displayed_count(cards_per_page)?;
        let pages = cards::page_count(total, cards_per_page);

        for index in 0..pages {
            let composed = frozen.compose_page(index, cards_per_page)?;
            let Some(site) = self.output else {
                continue;
            };

            let paging = Paging {
                current: index,
                count: pages,
            };
            let markup = render::render_index_page(&site.config.site, &composed, paging, right_column);
            let file = render::page_file_name(index);
            write_html(site, &file, &markup.into_string())?;
            site.sitemap.add(&file, self.now);
            emit(
                self.events,
                BuildEvent::IndexPageWritten {
                    file,
                    cards: composed.len(),
                },
            );
        }

        Ok(BuildSummary {
            articles: frozen.article_count(),
            standalones: self.inventory.standalones.len(),
            other_cards: frozen.sticky_count() + frozen.non_sticky_count(),
            sticky_cards: frozen.sticky_count(),
            displayed_cards: total,
            index_pages: pages,
            sitemap_urls: 0,
        })
    }

    fn copy_folder_media(
        &self,
        site: &OutputSite<'_, B>,
        folder: &str,
        dir: &Path,
        small_width: u32,
    ) -> Result<(), BuildError> {
        let Some(source) = scan::media_dir(dir) else {
            return Ok(());
        };
        let copied = copy_media(site.backend, &source, &site.root.join(MEDIA_DIR), small_width)?;
        emit(
            self.events,
            BuildEvent::MediaCopied {
                folder: folder.to_string(),
                files: copied.len(),
                resized: count_resized(&copied),
            },
        );
        Ok(())
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // The printer going away only loses progress lines.
        tx.send(event).ok();
    }
}

fn count_resized(copied: &[CopiedMedia]) -> usize {
    copied
        .iter()
        .filter(|c| matches!(c.small, Some(SmallVariant::Resized { .. })))
        .count()
}

/// Every `media/` folder lands in the shared `<output>/media/`, so file
/// names must not clash across folders.
fn check_media(inventory: &Inventory) -> Result<(), BuildError> {
    let cards = inventory.cards.iter().map(|card| card.dir.as_path());
    let pages = inventory
        .standalones
        .iter()
        .chain(&inventory.articles)
        .map(|page| page.dir.as_path());
    let sources: Vec<PathBuf> = cards.chain(pages).filter_map(scan::media_dir).collect();
    check_media_collisions(sources.iter().map(PathBuf::as_path))?;
    Ok(())
}

/// Wipe and recreate the output folder.
///
/// Paths are resolved first, so `.`, `..` and symlinks cannot hide that the
/// output is the working folder or one of its ancestors.
fn prepare_output(source: &Path, output: &Path) -> Result<(), BuildError> {
    if output.exists() {
        if source.canonicalize()?.starts_with(output.canonicalize()?) {
            return Err(BuildError::OutputIsSource(output.to_path_buf()));
        }
        fs::remove_dir_all(output)?;
    }
    fs::create_dir_all(output.join(MEDIA_DIR))?;
    Ok(())
}

/// Copy every file under `source` into `target`, keeping relative paths.
fn copy_tree(source: &Path, target: &Path) -> Result<usize, BuildError> {
    let mut files = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildError::Walk {
            path: source.to_path_buf(),
            source: e,
        })?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest)?;
            files += 1;
        }
    }
    Ok(files)
}

/// Write a page at its site-relative URL, minified when enabled.
fn write_html<B: ImageBackend>(
    site: &OutputSite<'_, B>,
    relative_url: &str,
    html: &str,
) -> Result<(), BuildError> {
    let path = site.root.join(relative_url.trim_start_matches('/'));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, minify(MinifyType::Html(html.as_bytes()), &site.config.output))?;
    Ok(())
}
