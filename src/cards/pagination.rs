//! Counting: how many cards the index displays and how many pages that takes.
//!
//! All functions are pure over card counts so they can be checked without a
//! registry.

use super::{CardError, FrozenCardRegistry};

/// Slots per page left for flowing cards once every sticky card has one.
///
/// Fails unless `sticky < cards_per_page`.
pub fn page_capacity(sticky: usize, cards_per_page: usize) -> Result<usize, CardError> {
    if sticky >= cards_per_page {
        return Err(CardError::StickyOverflow {
            sticky,
            cards_per_page,
        });
    }
    Ok(cards_per_page - sticky)
}

/// Total number of card slots shown across all index pages.
///
/// Flowing cards (articles and non-sticky cards) fill the capacity left on
/// each page. Sticky cards count once per page because they are repeated on
/// every page.
///
/// ```text
/// capacity = cards_per_page - sticky
/// pages    = ceil((articles + non_sticky) / capacity)
/// raw      = articles + non_sticky + sticky * pages
/// ```
///
/// When `raw % cards_per_page <= sticky` the remainder is dropped, so the
/// reported total never ends on a page that could hold only sticky cards.
pub fn displayed_count(
    articles: usize,
    non_sticky: usize,
    sticky: usize,
    cards_per_page: usize,
) -> Result<usize, CardError> {
    let capacity = page_capacity(sticky, cards_per_page)?;
    let flowing = articles + non_sticky;
    let pages = flowing.div_ceil(capacity);
    let raw = flowing + sticky * pages;

    let remainder = raw % cards_per_page;
    if remainder <= sticky {
        Ok(raw - remainder)
    } else {
        Ok(raw)
    }
}

/// Number of index pages needed to show `total` cards.
pub fn page_count(total: usize, cards_per_page: usize) -> usize {
    if cards_per_page == 0 {
        return 0;
    }
    total.div_ceil(cards_per_page)
}

impl FrozenCardRegistry {
    pub fn total_displayed_count(&self, cards_per_page: usize) -> Result<usize, CardError> {
        displayed_count(
            self.article_count(),
            self.non_sticky_count(),
            self.sticky_count(),
            cards_per_page,
        )
    }

    /// Page indices `0..page_count` are the valid arguments to
    /// [`compose_page`](Self::compose_page).
    pub fn page_count(&self, cards_per_page: usize) -> Result<usize, CardError> {
        let total = self.total_displayed_count(cards_per_page)?;
        Ok(page_count(total, cards_per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_subtracts_sticky_cards() {
        assert_eq!(page_capacity(0, 9), Ok(9));
        assert_eq!(page_capacity(3, 9), Ok(6));
        assert_eq!(page_capacity(8, 9), Ok(1));
    }

    #[test]
    fn capacity_rejects_sticky_filling_the_page() {
        assert_eq!(
            page_capacity(9, 9),
            Err(CardError::StickyOverflow {
                sticky: 9,
                cards_per_page: 9
            })
        );
        assert!(page_capacity(12, 9).is_err());
        assert!(page_capacity(0, 0).is_err());
    }

    #[test]
    fn overflow_message_names_both_numbers() {
        let err = displayed_count(5, 0, 9, 9).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("9 sticky cards"), "{msg}");
        assert!(msg.contains("pages of 9 cards"), "{msg}");
    }

    #[test]
    fn articles_only() {
        assert_eq!(displayed_count(10, 0, 0, 9), Ok(10));
        assert_eq!(page_count(10, 9), 2);
    }

    #[test]
    fn one_sticky_card_repeats_per_page() {
        // capacity 8, ceil(10 / 8) = 2 pages, 10 + 1 * 2 = 12, 12 % 9 = 3 > 1
        assert_eq!(displayed_count(10, 0, 1, 9), Ok(12));
        assert_eq!(page_count(12, 9), 2);
    }

    #[test]
    fn nothing_registered() {
        assert_eq!(displayed_count(0, 0, 0, 9), Ok(0));
        assert_eq!(page_count(0, 9), 0);
    }

    #[test]
    fn sticky_cards_without_flowing_cards_yield_no_pages() {
        assert_eq!(displayed_count(0, 0, 2, 9), Ok(0));
    }

    #[test]
    fn full_last_page_lands_on_boundary() {
        // 16 articles, capacity 8 -> 2 full pages of 9
        assert_eq!(displayed_count(16, 0, 1, 9), Ok(18));
        assert_eq!(page_count(18, 9), 2);
    }

    #[test]
    fn non_sticky_cards_flow_with_articles() {
        // 8 articles + 1 non-sticky with 1 sticky: capacity 8, 2 pages
        assert_eq!(displayed_count(8, 1, 1, 9), Ok(11));
        assert_eq!(page_count(11, 9), 2);
    }

    #[test]
    fn page_count_with_zero_capacity_is_zero() {
        assert_eq!(page_count(5, 0), 0);
    }
}
