//! Article domain model.
//!
//! An [`Article`] is one entry of the campus recycling news feed. Editors flag
//! entries as new or featured from the admin panel; the feed ranks on those flags
//! first and on the publication date second (see [`crate::feed::ranking`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::{parse_article_date, ArticleTimestamp};

/// Opaque article identifier.
///
/// Hosted databases hand out either integer or UUID-like string keys, so both are
/// accepted. Serialized untagged: `42` and `"a1b2"` are both valid ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleId {
    Number(i64),
    Text(String),
}

impl ArticleId {
    /// Returns `true` for an empty textual id, which no store will accept.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Parses user input into an id, preferring the numeric form.
    ///
    /// ```
    /// use ecocampus::domain::ArticleId;
    ///
    /// assert_eq!(ArticleId::parse("7"), ArticleId::Number(7));
    /// assert_eq!(ArticleId::parse("abc"), ArticleId::Text("abc".to_string()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A feed article as the client sees it.
///
/// # Fields
///
/// - `date`: raw editor-entered date, ISO or `DD MON YYYY`; may be empty
/// - `featured` / `is_new`: editor flags driving feed priority
/// - `views`: informational counter, never used for ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub date: String,
    pub views: u64,
    pub featured: bool,
    pub is_new: bool,
}

impl Article {
    /// Creates an article with the given id, title and category.
    ///
    /// All other fields start empty, unflagged and with zero views.
    ///
    /// ```
    /// use ecocampus::domain::{Article, ArticleId};
    ///
    /// let article = Article::new(ArticleId::Number(1), "Compostaje", "Residuos");
    /// assert!(!article.is_new);
    /// assert_eq!(article.views, 0);
    /// ```
    #[must_use]
    pub fn new(id: ArticleId, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            content: String::new(),
            category: category.into(),
            image_url: String::new(),
            date: String::new(),
            views: 0,
            featured: false,
            is_new: false,
        }
    }

    /// Parsed publication date; unreadable dates count as the oldest possible.
    #[must_use]
    pub fn published_at(&self) -> ArticleTimestamp {
        parse_article_date(&self.date)
    }
}
