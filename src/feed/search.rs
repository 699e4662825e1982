//! Article search and the recent-search history.

use std::collections::VecDeque;

use crate::domain::Article;

/// How many recent searches are remembered unless configured otherwise.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Returns the articles whose title, description or category contains `query`,
/// ignoring case. Input order is preserved.
///
/// A blank query matches nothing.
///
/// ```
/// use ecocampus::domain::{Article, ArticleId};
/// use ecocampus::feed::search::search_articles;
///
/// let feed = vec![
///     Article::new(ArticleId::Number(1), "Punto limpio", "Reciclaje"),
///     Article::new(ArticleId::Number(2), "Huerto", "Composta"),
/// ];
/// assert_eq!(search_articles(&feed, "RECIC").len(), 1);
/// assert!(search_articles(&feed, "   ").is_empty());
/// ```
#[must_use]
pub fn search_articles(articles: &[Article], query: &str) -> Vec<Article> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let results: Vec<Article> = articles
        .iter()
        .filter(|article| matches(article, &needle))
        .cloned()
        .collect();

    tracing::debug!(query = %needle, matches = results.len(), "Searched articles");
    results
}

fn matches(article: &Article, needle: &str) -> bool {
    article.title.to_lowercase().contains(needle)
        || article
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || article.category.to_lowercase().contains(needle)
}

/// Most-recent-first history of submitted searches.
///
/// Re-submitting a query moves it to the front instead of duplicating it, and
/// the oldest entry falls off once the limit is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    entries: VecDeque<String>,
    limit: usize,
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::with_limit(DEFAULT_RECENT_LIMIT)
    }
}

impl RecentSearches {
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Records a submitted query. Blank queries are ignored.
    ///
    /// ```
    /// use ecocampus::feed::search::RecentSearches;
    ///
    /// let mut recent = RecentSearches::with_limit(2);
    /// recent.record("vidrio");
    /// recent.record("papel");
    /// recent.record("vidrio");
    /// recent.record("pet");
    /// assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["pet", "vidrio"]);
    /// ```
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return;
        }

        self.entries.retain(|entry| entry != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArticleId;

    fn feed() -> Vec<Article> {
        let mut a = Article::new(ArticleId::Number(1), "Punto limpio", "Reciclaje");
        a.description = Some("Dónde dejar tus BATERÍAS".to_string());
        let b = Article::new(ArticleId::Number(2), "Huerto urbano", "Composta");
        let c = Article::new(ArticleId::Number(3), "Reciclar vidrio", "Vidrio");
        vec![a, b, c]
    }

    #[test]
    fn matches_title_description_or_category() {
        let ids = |q: &str| -> Vec<String> {
            search_articles(&feed(), q)
                .iter()
                .map(|a| a.id.to_string())
                .collect()
        };
        assert_eq!(ids("recicla"), vec!["1", "3"]);
        assert_eq!(ids("baterías"), vec!["1"]);
        assert_eq!(ids("compost"), vec!["2"]);
        assert!(ids("plástico").is_empty());
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(search_articles(&feed(), "  huerto ").len(), 1);
    }

    #[test]
    fn recent_searches_are_capped_and_deduped() {
        let mut recent = RecentSearches::default();
        for q in ["a", "b", "c", "d", "e", "f"] {
            recent.record(q);
        }
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
        assert_eq!(recent.iter().next(), Some("f"));
        assert!(!recent.iter().any(|q| q == "a"));

        recent.record("c");
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["c", "f", "e", "d", "b"]);

        recent.record("   ");
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut recent = RecentSearches::with_limit(0);
        recent.record("pet");
        assert!(recent.is_empty());
    }
}
