//! Priority ranking for the article feed.
//!
//! Articles are ordered by three keys, the first discriminating key winning:
//!
//! 1. `is_new`: new articles first
//! 2. `featured`: featured articles next
//! 3. publication date: most recent first, unreadable dates last
//!
//! Ties keep their input order: every ranking function here is a stable sort over
//! a copy of its input. The same rule ranks the full feed, the featured carousel
//! and any category subset, each sorted on its own.

use std::cmp::{Ordering, Reverse};

use crate::domain::date::{parse_article_date, ArticleTimestamp};
use crate::domain::Article;

/// An Article-shaped record that can be ranked.
///
/// Implemented for the domain [`Article`] and for the storage
/// [`ArticleRecord`](crate::storage::ArticleRecord), so records can be ranked
/// before or after mapping.
pub trait Rankable {
    fn is_new(&self) -> bool;
    fn is_featured(&self) -> bool;
    fn raw_date(&self) -> &str;
    fn category(&self) -> &str;
}

impl Rankable for Article {
    fn is_new(&self) -> bool {
        self.is_new
    }

    fn is_featured(&self) -> bool {
        self.featured
    }

    fn raw_date(&self) -> &str {
        &self.date
    }

    fn category(&self) -> &str {
        &self.category
    }
}

/// Sort key of one record. Ascending key order is feed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey(Reverse<(bool, bool, ArticleTimestamp)>);

impl PriorityKey {
    fn of<T: Rankable + ?Sized>(item: &T) -> Self {
        Self(Reverse((
            item.is_new(),
            item.is_featured(),
            parse_article_date(item.raw_date()),
        )))
    }
}

/// Compares two records by feed priority.
///
/// Returns `Less` when `a` should be shown before `b`. Never fails; malformed
/// dates compare as the oldest possible date.
///
/// ```
/// use std::cmp::Ordering;
/// use ecocampus::domain::{Article, ArticleId};
/// use ecocampus::feed::ranking::compare_by_priority;
///
/// let mut fresh = Article::new(ArticleId::Number(1), "A", "Reciclaje");
/// fresh.is_new = true;
/// let old = Article::new(ArticleId::Number(2), "B", "Reciclaje");
///
/// assert_eq!(compare_by_priority(&fresh, &old), Ordering::Less);
/// ```
#[must_use]
pub fn compare_by_priority<T: Rankable + ?Sized>(a: &T, b: &T) -> Ordering {
    PriorityKey::of(a).cmp(&PriorityKey::of(b))
}

/// Returns a ranked copy of `items`. The input is not modified.
///
/// Each date is parsed once per call.
#[must_use]
pub fn rank<T: Rankable + Clone>(items: &[T]) -> Vec<T> {
    let _span = tracing::debug_span!("rank_articles", count = items.len()).entered();

    let mut keyed: Vec<(PriorityKey, &T)> = items
        .iter()
        .map(|item| (PriorityKey::of(item), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    keyed.into_iter().map(|(_, item)| item.clone()).collect()
}

/// Ranked copy of the featured records only.
#[must_use]
pub fn rank_featured<T: Rankable + Clone>(items: &[T]) -> Vec<T> {
    let featured: Vec<T> = items
        .iter()
        .filter(|item| item.is_featured())
        .cloned()
        .collect();
    rank(&featured)
}

/// Ranked copy of the records in `category` (exact match).
#[must_use]
pub fn rank_category<T: Rankable + Clone>(items: &[T], category: &str) -> Vec<T> {
    let subset: Vec<T> = items
        .iter()
        .filter(|item| item.category() == category)
        .cloned()
        .collect();
    rank(&subset)
}
