//! Page composition: the ordered card fragments for one index page.

use super::pagination::page_capacity;
use super::{CardError, FrozenCardRegistry, OtherCard};

impl FrozenCardRegistry {
    /// Card fragments for page `page_index`, in display order.
    ///
    /// 1. Articles, newest first, form the flowing sequence.
    /// 2. Non-sticky cards are inserted into it by ascending position.
    /// 3. The page takes `cards_per_page - sticky` cards of that sequence.
    /// 4. Sticky cards are inserted into the page by ascending position.
    ///
    /// Positions past the end of a sequence append. Asking for a page with
    /// no flowing cards is an error: a page is never made of sticky cards
    /// alone.
    pub fn compose_page(
        &self,
        page_index: usize,
        cards_per_page: usize,
    ) -> Result<Vec<&str>, CardError> {
        let capacity = page_capacity(self.sticky_count(), cards_per_page)?;
        let flowing = self.flowing_sequence();

        let start = page_index
            .checked_mul(capacity)
            .filter(|&start| start < flowing.len())
            .ok_or(CardError::PageOutOfRange {
                page_index,
                cards_per_page,
            })?;
        let end = flowing.len().min(start + capacity);

        let mut page = flowing[start..end].to_vec();
        for card in by_position(&self.sticky) {
            insert_clamped(&mut page, card.position, &card.html);
        }
        Ok(page)
    }

    /// Articles with the non-sticky cards placed among them.
    fn flowing_sequence(&self) -> Vec<&str> {
        let mut sequence: Vec<&str> = self.articles.iter().map(|a| a.html.as_str()).collect();
        for card in by_position(&self.non_sticky) {
            insert_clamped(&mut sequence, card.position, &card.html);
        }
        sequence
    }
}

/// Stable sort by position; equal positions keep registration order.
fn by_position(cards: &[OtherCard]) -> Vec<&OtherCard> {
    let mut sorted: Vec<&OtherCard> = cards.iter().collect();
    sorted.sort_by_key(|card| card.position);
    sorted
}

fn insert_clamped<'a>(sequence: &mut Vec<&'a str>, position: usize, html: &'a str) {
    let at = position.min(sequence.len());
    sequence.insert(at, html);
}
