//! HTML rendering with maud.
//!
//! Two kinds of output are produced here:
//!
//! - **Card fragments**: one `<article class="card">` per article and per
//!   configured card. They are rendered before registration, so the card
//!   engine only ever sees finished HTML strings.
//! - **Pages**: article, standalone and index layouts sharing one document
//!   shell and a right column.
//!
//! ## Page Layout
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ header: blog title / description         │
//! ├──────────────────────────────┬───────────┤
//! │ main                         │ aside     │
//! │  article body, or            │ right     │
//! │  card grid + paging          │ column    │
//! ├──────────────────────────────┴───────────┤
//! │ footer                                   │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Styles come from `static/style.css`, embedded at compile time.

use crate::config::SiteInfo;
use crate::content::{CardSource, CardTemplate, PageMeta};
use crate::events::CalendarEvent;
use crate::media::{media_url, small_variant_url};
use crate::scan::{CardFolder, PageSource};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

// ============================================================================
// Paging
// ============================================================================

/// Position of one index page among all index pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Zero-based page index.
    pub current: usize,
    pub count: usize,
}

impl Paging {
    pub fn previous(&self) -> Option<usize> {
        self.current.checked_sub(1)
    }

    pub fn next(&self) -> Option<usize> {
        (self.current + 1 < self.count).then_some(self.current + 1)
    }
}

/// Output file of index page `index`: `index.html`, `index-page-2.html`, ...
pub fn page_file_name(index: usize) -> String {
    if index == 0 {
        "index.html".to_string()
    } else {
        format!("index-page-{}.html", index + 1)
    }
}

/// Whether `name` is a file [`page_file_name`] can produce.
pub fn is_page_file_name(name: &str) -> bool {
    if name == "index.html" {
        return true;
    }
    name.strip_prefix("index-page-")
        .and_then(|rest| rest.strip_suffix(".html"))
        .and_then(|number| number.parse::<usize>().ok())
        .is_some_and(|number| number >= 2 && page_file_name(number - 1) == name)
}

// ============================================================================
// Dates
// ============================================================================

/// Human age of `then` as seen at `now`: "3 days ago", "1.5 years ago".
pub fn relative_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let span = now - then;
    let days = span.num_days();

    if days > 365 {
        let years = (days as f64 / 365.0 * 10.0).round() / 10.0;
        return format!("{years} years ago");
    }
    if days > 30 {
        let months = (days as f64 / 30.0).round() as i64;
        return format!("{months} month{} ago", plural(months));
    }
    if days > 0 {
        return format!("{days} day{} ago", plural(days));
    }
    let hours = span.num_hours();
    if hours > 0 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    let minutes = span.num_minutes();
    if minutes > 0 {
        return format!("{minutes} minute{} ago", plural(minutes));
    }
    "a few seconds ago".to_string()
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// "Published 3 days ago", or "Modified ..." once the two ages differ.
pub fn published_or_modified(meta: &PageMeta, now: DateTime<Utc>) -> String {
    let published = relative_age(now, meta.date_published);
    let modified = relative_age(now, meta.last_modified());
    if published == modified {
        format!("Published {published}")
    } else {
        format!("Modified {modified}")
    }
}

// ============================================================================
// Cards
// ============================================================================

/// Card for an article, linking to its page.
pub fn render_article_card(page: &PageSource, now: DateTime<Utc>) -> Markup {
    let meta = &page.meta;
    html! {
        article.card.card-article {
            a.card-link href=(page.url) {
                @if let Some(image) = &meta.image {
                    img.card-image src=(small_variant_url(image)) alt=(meta.title) loading="lazy";
                }
                h2.card-title { (meta.title) }
                p.card-description { (meta.description) }
            }
            footer.card-footer { (published_or_modified(meta, now)) }
        }
    }
}

/// Card for a configured card folder.
///
/// Returns `None` for a calendar card with no events: it is not shown.
pub fn render_card(folder: &CardFolder) -> Option<Markup> {
    let card = &folder.card;
    match card.template {
        CardTemplate::Search => Some(render_search_card(card)),
        CardTemplate::Image => Some(render_image_card(card)),
        CardTemplate::CalendarEvents if folder.events.is_empty() => None,
        CardTemplate::CalendarEvents => Some(render_calendar_card(card, &folder.events)),
        // Rejected when card.json is read.
        CardTemplate::Article => None,
    }
}

fn render_search_card(card: &CardSource) -> Markup {
    html! {
        article.card.card-search {
            h2.card-title { (card.title.as_deref().unwrap_or("Search")) }
            form.search-form action="https://duckduckgo.com/" method="get" role="search" {
                input type="search" name="q" placeholder="Search articles" aria-label="Search";
                button type="submit" { "Search" }
            }
            @if let Some(footer) = &card.footer {
                footer.card-footer { (footer) }
            }
        }
    }
}

fn render_image_card(card: &CardSource) -> Markup {
    let title = card.title.as_deref().unwrap_or_default();
    html! {
        article.card.card-image {
            a.card-link href=[card.link.as_deref()] {
                @if let Some(image) = &card.image {
                    img.card-image src=(small_variant_url(image)) alt=(title) loading="lazy";
                }
                h2.card-title { (title) }
                @if let Some(description) = &card.description {
                    p.card-description { (description) }
                }
            }
            @if let Some(footer) = &card.footer {
                footer.card-footer { (footer) }
            }
        }
    }
}

fn render_calendar_card(card: &CardSource, events: &[CalendarEvent]) -> Markup {
    html! {
        article.card.card-calendar {
            h2.card-title { (card.title.as_deref().unwrap_or("Upcoming events")) }
            ul.event-list {
                @for event in events {
                    li.event {
                        time datetime=(event.date.to_rfc3339()) {
                            (event.date.format("%d %b %Y"))
                        }
                        " "
                        @match &event.url {
                            Some(url) => { a href=(url) { (event.title) } }
                            None => { span { (event.title) } }
                        }
                        @if let Some(organizer) = &event.organizer {
                            " by "
                            @match &event.organizer_url {
                                Some(url) => { a href=(url) { (organizer) } }
                                None => { span { (organizer) } }
                            }
                        }
                        @if let Some(place) = &event.place {
                            span.event-place { " · " (place) }
                        }
                    }
                }
            }
            @if let Some(footer) = &card.footer {
                footer.card-footer { (footer) }
            }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// Head metadata of one page.
struct PageHead<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    image: Option<String>,
    canonical: String,
}

fn base_document(site: &SiteInfo, head: PageHead<'_>, right_column: &[String], main: Markup) -> Markup {
    let keywords = head.tags.join(", ");
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) }
                meta name="description" content=(head.description);
                @if !keywords.is_empty() {
                    meta name="keywords" content=(keywords);
                }
                link rel="canonical" href=(head.canonical);
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.description);
                @if let Some(image) = head.image.as_deref().or(site.image.as_deref()) {
                    meta property="og:image" content=(site.absolute_url(image));
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.site-header {
                    a.site-title href="/" { (site.title) }
                    p.site-description { (site.description) }
                }
                div.layout {
                    main { (main) }
                    @if !right_column.is_empty() {
                        aside.right-column {
                            @for card in right_column {
                                (PreEscaped(card))
                            }
                        }
                    }
                }
                footer.site-footer {
                    a href="/sitemap.xml" { "Sitemap" }
                }
            }
        }
    }
}

fn page_head<'a>(site: &SiteInfo, page: &'a PageSource) -> PageHead<'a> {
    PageHead {
        title: &page.meta.title,
        description: &page.meta.description,
        tags: &page.meta.tags,
        image: page.meta.image.as_deref().map(media_url),
        canonical: site.absolute_url(&page.url),
    }
}

/// Full article page.
pub fn render_article_page(
    site: &SiteInfo,
    page: &PageSource,
    right_column: &[String],
    now: DateTime<Utc>,
) -> Markup {
    let meta = &page.meta;
    let main = html! {
        article.article-page {
            header {
                h1 { (meta.title) }
                p.article-dates { (published_or_modified(meta, now)) }
                @if !meta.sections.is_empty() || !meta.tags.is_empty() {
                    ul.tags {
                        @for section in &meta.sections {
                            li.section { (section) }
                        }
                        @for tag in &meta.tags {
                            li { (tag) }
                        }
                    }
                }
            }
            div.article-body { (PreEscaped(&page.body)) }
        }
    };
    base_document(site, page_head(site, page), right_column, main)
}

/// Standalone page: no dates, no tags.
pub fn render_standalone_page(site: &SiteInfo, page: &PageSource, right_column: &[String]) -> Markup {
    let main = html! {
        article.standalone-page {
            h1 { (page.meta.title) }
            div.article-body { (PreEscaped(&page.body)) }
        }
    };
    base_document(site, page_head(site, page), right_column, main)
}

/// One index page: its composed cards and paging links.
pub fn render_index_page(
    site: &SiteInfo,
    cards: &[&str],
    paging: Paging,
    right_column: &[String],
) -> Markup {
    let file_name = page_file_name(paging.current);
    let title = if paging.current == 0 {
        site.title.clone()
    } else {
        format!("{} - page {}", site.title, paging.current + 1)
    };
    let head = PageHead {
        title: &title,
        description: &site.description,
        tags: &site.tags,
        image: None,
        canonical: site.absolute_url(&file_name),
    };

    let main = html! {
        section.cards {
            @for card in cards {
                (PreEscaped(*card))
            }
        }
        @if paging.count > 1 {
            (render_paging(paging))
        }
    };
    base_document(site, head, right_column, main)
}

fn render_paging(paging: Paging) -> Markup {
    html! {
        nav.paging aria-label="Pages" {
            @if let Some(prev) = paging.previous() {
                a.paging-prev href={ "/" (page_file_name(prev)) } rel="prev" { "Newer" }
            }
            @for index in 0..paging.count {
                @if index == paging.current {
                    span.paging-current aria-current="page" { (index + 1) }
                } @else {
                    a href={ "/" (page_file_name(index)) } { (index + 1) }
                }
            }
            @if let Some(next) = paging.next() {
                a.paging-next href={ "/" (page_file_name(next)) } rel="next" { "Older" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::path::PathBuf;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn meta(published: DateTime<Utc>, modified: Option<DateTime<Utc>>) -> PageMeta {
        PageMeta {
            title: "Vector <search>".to_string(),
            description: "Embeddings & indexes".to_string(),
            tags: vec!["ai".to_string()],
            sections: vec!["Data".to_string()],
            date_published: published,
            date_modified: modified,
            relative_url: None,
            image: Some("media/cover.png".to_string()),
        }
    }

    fn page(meta: PageMeta) -> PageSource {
        PageSource {
            folder: "100-vector-search".to_string(),
            dir: PathBuf::from("/site/articles/100-vector-search"),
            url: "/vector-search.html".to_string(),
            meta,
            body: "<p>Body <b>html</b></p>".to_string(),
        }
    }

    fn card_source(template: CardTemplate) -> CardSource {
        CardSource {
            template,
            position: 0,
            sticky: false,
            right_column_position: None,
            title: Some("Talks".to_string()),
            description: None,
            footer: None,
            link: Some("https://example.com/talks".to_string()),
            image: Some("media/talk.jpg".to_string()),
        }
    }

    // =========================================================================
    // Relative dates
    // =========================================================================

    #[test]
    fn relative_age_units() {
        let n = now();
        assert_eq!(relative_age(n, n - Duration::seconds(20)), "a few seconds ago");
        assert_eq!(relative_age(n, n - Duration::minutes(1)), "1 minute ago");
        assert_eq!(relative_age(n, n - Duration::minutes(45)), "45 minutes ago");
        assert_eq!(relative_age(n, n - Duration::hours(5)), "5 hours ago");
        assert_eq!(relative_age(n, n - Duration::days(1)), "1 day ago");
        assert_eq!(relative_age(n, n - Duration::days(30)), "30 days ago");
        assert_eq!(relative_age(n, n - Duration::days(31)), "1 month ago");
        assert_eq!(relative_age(n, n - Duration::days(100)), "3 months ago");
        assert_eq!(relative_age(n, n - Duration::days(365)), "12 months ago");
        assert_eq!(relative_age(n, n - Duration::days(548)), "1.5 years ago");
        assert_eq!(relative_age(n, n - Duration::days(730)), "2 years ago");
    }

    #[test]
    fn future_dates_read_as_just_now() {
        let n = now();
        assert_eq!(relative_age(n, n + Duration::days(3)), "a few seconds ago");
    }

    #[test]
    fn footer_prefers_published_when_ages_match() {
        let published = now() - Duration::days(3);
        assert_eq!(
            published_or_modified(&meta(published, None), now()),
            "Published 3 days ago"
        );
        assert_eq!(
            published_or_modified(&meta(published, Some(now() - Duration::hours(2))), now()),
            "Modified 2 hours ago"
        );
    }

    // =========================================================================
    // Paging
    // =========================================================================

    #[test]
    fn page_file_names() {
        assert_eq!(page_file_name(0), "index.html");
        assert_eq!(page_file_name(1), "index-page-2.html");
        assert_eq!(page_file_name(9), "index-page-10.html");
    }

    #[test]
    fn index_file_names_recognized() {
        assert!(is_page_file_name("index.html"));
        assert!(is_page_file_name("index-page-2.html"));
        assert!(is_page_file_name("index-page-10.html"));
        assert!(!is_page_file_name("index-page-1.html"));
        assert!(!is_page_file_name("index-page-02.html"));
        assert!(!is_page_file_name("index-page-x.html"));
        assert!(!is_page_file_name("notes/index.html"));
    }

    #[test]
    fn paging_neighbours() {
        let first = Paging { current: 0, count: 3 };
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), Some(1));

        let last = Paging { current: 2, count: 3 };
        assert_eq!(last.previous(), Some(1));
        assert_eq!(last.next(), None);
    }

    // =========================================================================
    // Cards
    // =========================================================================

    #[test]
    fn article_card_links_and_escapes() {
        let html = render_article_card(&page(meta(now() - Duration::days(2), None)), now())
            .into_string();
        assert!(html.contains(r#"href="/vector-search.html""#));
        assert!(html.contains("Vector &lt;search&gt;"));
        assert!(html.contains(r#"src="/media/cover-small.png""#));
        assert!(html.contains("Published 2 days ago"));
    }

    #[test]
    fn image_card_uses_small_variant() {
        let folder = CardFolder {
            folder: "020-talks".to_string(),
            dir: PathBuf::from("/site/cards/020-talks"),
            card: card_source(CardTemplate::Image),
            events: Vec::new(),
        };
        let html = render_card(&folder).unwrap().into_string();
        assert!(html.contains("card-image"));
        assert!(html.contains(r#"src="/media/talk-small.jpg""#));
        assert!(html.contains(r#"href="https://example.com/talks""#));
    }

    #[test]
    fn calendar_card_without_events_is_hidden() {
        let folder = CardFolder {
            folder: "050-upcoming".to_string(),
            dir: PathBuf::from("/site/cards/050-upcoming"),
            card: card_source(CardTemplate::CalendarEvents),
            events: Vec::new(),
        };
        assert!(render_card(&folder).is_none());
    }

    #[test]
    fn calendar_card_lists_events() {
        let folder = CardFolder {
            folder: "050-upcoming".to_string(),
            dir: PathBuf::from("/site/cards/050-upcoming"),
            card: card_source(CardTemplate::CalendarEvents),
            events: vec![CalendarEvent {
                title: "Global Azure".to_string(),
                date: Utc.with_ymd_and_hms(2024, 4, 20, 9, 0, 0).unwrap(),
                organizer: Some("Azure Athens".to_string()),
                organizer_url: None,
                place: Some("Athens".to_string()),
                url: Some("https://example.com/ga".to_string()),
            }],
        };
        let html = render_card(&folder).unwrap().into_string();
        assert!(html.contains("Global Azure"));
        assert!(html.contains("20 Apr 2024"));
        assert!(html.contains("Azure Athens"));
        assert!(html.contains("Athens"));
    }

    #[test]
    fn search_card_renders_form() {
        let folder = CardFolder {
            folder: "010-search".to_string(),
            dir: PathBuf::from("/site/cards/010-search"),
            card: card_source(CardTemplate::Search),
            events: Vec::new(),
        };
        let html = render_card(&folder).unwrap().into_string();
        assert!(html.contains("<form"));
        assert!(html.contains(r#"type="search""#));
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn article_page_keeps_body_html() {
        let site = SiteInfo::default();
        let html = render_article_page(
            &site,
            &page(meta(now() - Duration::days(2), None)),
            &[],
            now(),
        )
        .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Body <b>html</b></p>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/vector-search.html">"#));
        assert!(html.contains(r#"content="https://example.com/media/cover.png""#));
        assert!(!html.contains("<aside"));
    }

    #[test]
    fn right_column_rendered_when_present() {
        let site = SiteInfo::default();
        let column = vec!["<article class=\"card\">Side</article>".to_string()];
        let html = render_standalone_page(&site, &page(meta(now(), None)), &column).into_string();
        assert!(html.contains(r#"<aside class="right-column"><article class="card">Side</article>"#));
    }

    #[test]
    fn index_page_renders_cards_in_order_with_paging() {
        let site = SiteInfo::default();
        let html = render_index_page(
            &site,
            &["<div>one</div>", "<div>two</div>"],
            Paging { current: 1, count: 3 },
            &[],
        )
        .into_string();

        let one = html.find("<div>one</div>").unwrap();
        let two = html.find("<div>two</div>").unwrap();
        assert!(one < two);
        assert!(html.contains(r#"href="/index.html""#));
        assert!(html.contains(r#"href="/index-page-3.html""#));
        assert!(html.contains(r#"aria-current="page">2</span>"#));
        assert!(html.contains("My Blog - page 2"));
    }

    #[test]
    fn single_index_page_has_no_paging() {
        let html = render_index_page(
            &SiteInfo::default(),
            &["<div>only</div>"],
            Paging { current: 0, count: 1 },
            &[],
        )
        .into_string();
        assert!(!html.contains("<nav"));
    }
}
