//! Card composition and pagination for index pages.
//!
//! Index pages are grids of cards: one card per article plus a few manually
//! configured cards (search box, image tile, calendar of events). This module
//! decides how many cards the index shows in total, how many pages that takes,
//! and which cards land on each page.
//!
//! ## Lifecycle
//!
//! ```text
//! CardRegistry            (shared across worker threads, append-only)
//!     │  register_article_card / register_other_card
//!     ▼
//!   seal()
//!     │
//!     ▼
//! FrozenCardRegistry      (read-only, sorted and partitioned)
//!     │  total_displayed_count / page_count / compose_page
//!     ▼
//! Vec<&str> per page      (card fragments in display order)
//! ```
//!
//! Sealing consumes the mutable registry, so pagination can never observe a
//! registry that is still being filled.
//!
//! ## Card Kinds
//!
//! - **Article cards** carry a date and are ordered newest first.
//! - **Other cards** carry an explicit position. Non-sticky ones are placed
//!   once into the running article sequence. Sticky ones are placed into every
//!   page after the page's slice of the sequence has been cut.
//!
//! ## Page Layout
//!
//! With `cards_per_page = 9` and one sticky card at position 0, each page has
//! room for 8 flowing cards (articles and non-sticky cards):
//!
//! ```text
//! flowing:  a1 a2 a3 a4 a5 a6 a7 a8 | a9 a10
//! page 0:   S  a1 a2 a3 a4 a5 a6 a7 a8
//! page 1:   S  a9 a10
//! ```

mod compose;
mod pagination;
mod registry;

pub use pagination::{displayed_count, page_capacity, page_count};
pub use registry::{ArticleCard, CardRegistry, FrozenCardRegistry, OtherCard};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Every sticky card takes a slot on every page, so they must leave room
    /// for at least one flowing card.
    #[error(
        "{sticky} sticky cards leave no room on pages of {cards_per_page} cards \
         (cards_per_page must be greater than the sticky card count)"
    )]
    StickyOverflow {
        sticky: usize,
        cards_per_page: usize,
    },
    #[error(
        "Page index {page_index} is past the last page for {cards_per_page} cards per page"
    )]
    PageOutOfRange {
        page_index: usize,
        cards_per_page: usize,
    },
    #[error("Card HTML is empty")]
    EmptyHtml,
}
