//! Card storage: the mutable registry filled during a build and the frozen
//! snapshot consulted by pagination.

use super::CardError;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Summary card for one article, ordered by its date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    pub html: String,
    pub ordering_date: DateTime<Utc>,
}

/// A manually configured card with an explicit slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherCard {
    pub html: String,
    pub position: usize,
    pub sticky: bool,
}

#[derive(Debug, Default)]
struct Cards {
    articles: Vec<ArticleCard>,
    others: Vec<OtherCard>,
}

/// Append-only card store shared by the content workers of one build.
///
/// Both lists sit behind one mutex. Registration is a push under the lock,
/// so contention stays negligible even with every rayon worker registering.
#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: Mutex<Cards>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_article_card(
        &self,
        html: impl Into<String>,
        ordering_date: DateTime<Utc>,
    ) -> Result<(), CardError> {
        let html = non_empty(html.into())?;
        self.lock().articles.push(ArticleCard {
            html,
            ordering_date,
        });
        Ok(())
    }

    pub fn register_other_card(
        &self,
        html: impl Into<String>,
        position: usize,
        sticky: bool,
    ) -> Result<(), CardError> {
        let html = non_empty(html.into())?;
        self.lock().others.push(OtherCard {
            html,
            position,
            sticky,
        });
        Ok(())
    }

    /// Stop accepting cards and produce the read-only view used for paging.
    ///
    /// Articles are sorted newest first. The sort is stable, so articles
    /// sharing a date keep their registration order.
    pub fn seal(self) -> FrozenCardRegistry {
        let Cards {
            mut articles,
            others,
        } = self
            .cards
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        articles.sort_by(|a, b| b.ordering_date.cmp(&a.ordering_date));
        let (sticky, non_sticky) = others.into_iter().partition(|card| card.sticky);

        FrozenCardRegistry {
            articles,
            sticky,
            non_sticky,
        }
    }

    // A panic in another worker cannot leave a half-pushed card behind,
    // so a poisoned lock still guards consistent lists.
    fn lock(&self) -> MutexGuard<'_, Cards> {
        self.cards.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn non_empty(html: String) -> Result<String, CardError> {
    if html.trim().is_empty() {
        Err(CardError::EmptyHtml)
    } else {
        Ok(html)
    }
}

/// Sealed snapshot of a [`CardRegistry`].
#[derive(Debug, Clone, Default)]
pub struct FrozenCardRegistry {
    pub(super) articles: Vec<ArticleCard>,
    pub(super) sticky: Vec<OtherCard>,
    pub(super) non_sticky: Vec<OtherCard>,
}

impl FrozenCardRegistry {
    /// Article cards, newest first.
    pub fn articles(&self) -> &[ArticleCard] {
        &self.articles
    }

    /// Sticky cards in registration order.
    pub fn sticky_cards(&self) -> &[OtherCard] {
        &self.sticky
    }

    /// Non-sticky cards in registration order.
    pub fn non_sticky_cards(&self) -> &[OtherCard] {
        &self.non_sticky
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    pub fn sticky_count(&self) -> usize {
        self.sticky.len()
    }

    pub fn non_sticky_count(&self) -> usize {
        self.non_sticky.len()
    }
}
