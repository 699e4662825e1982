//! Category chips for the feed.

use super::ranking::{rank, rank_category};
use crate::domain::Article;

/// Pseudo-category that selects every article.
pub const ALL_CATEGORIES: &str = "Todos";

/// Category chips for a feed: [`ALL_CATEGORIES`] first, then every distinct
/// category in the order it first appears.
///
/// ```
/// use ecocampus::domain::{Article, ArticleId};
/// use ecocampus::feed::category::categories;
///
/// let feed = vec![
///     Article::new(ArticleId::Number(1), "a", "Reciclaje"),
///     Article::new(ArticleId::Number(2), "b", "Composta"),
///     Article::new(ArticleId::Number(3), "c", "Reciclaje"),
/// ];
/// assert_eq!(categories(&feed), vec!["Todos", "Reciclaje", "Composta"]);
/// ```
#[must_use]
pub fn categories(articles: &[Article]) -> Vec<String> {
    let mut chips = vec![ALL_CATEGORIES.to_string()];
    for article in articles {
        if !chips.iter().any(|chip| *chip == article.category) {
            chips.push(article.category.clone());
        }
    }
    chips
}

/// Articles visible under `category`.
///
/// [`ALL_CATEGORIES`] returns the list as given (callers pass the already ranked
/// feed); any other name returns the matching subset ranked on its own.
#[must_use]
pub fn filter_by_category(articles: &[Article], category: &str) -> Vec<Article> {
    if category == ALL_CATEGORIES {
        return articles.to_vec();
    }
    rank_category(articles, category)
}

/// Ranks `articles` and derives the category chips in one pass over the ranked
/// feed.
#[must_use]
pub fn ranked_with_categories(articles: &[Article]) -> (Vec<Article>, Vec<String>) {
    let ranked = rank(articles);
    let chips = categories(&ranked);
    (ranked, chips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArticleId;

    fn article(id: i64, category: &str, is_new: bool) -> Article {
        let mut article = Article::new(ArticleId::Number(id), format!("t{id}"), category);
        article.is_new = is_new;
        article
    }

    #[test]
    fn empty_feed_has_only_all() {
        assert_eq!(categories(&[]), vec![ALL_CATEGORIES.to_string()]);
    }

    #[test]
    fn all_returns_input_order() {
        let feed = vec![article(1, "A", false), article(2, "B", true)];
        assert_eq!(filter_by_category(&feed, ALL_CATEGORIES), feed);
    }

    #[test]
    fn named_category_is_filtered_and_ranked() {
        let feed = vec![
            article(1, "A", false),
            article(2, "B", true),
            article(3, "A", true),
        ];
        let visible = filter_by_category(&feed, "A");
        let ids: Vec<String> = visible.iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn category_match_is_exact() {
        let feed = vec![article(1, "Reciclaje", false)];
        assert!(filter_by_category(&feed, "reciclaje").is_empty());
    }
}
