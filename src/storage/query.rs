//! Article queries: filters, ordering and limit.
//!
//! Mirrors the hosted table API the client was written against: equality
//! filters, one `order by` column and an optional limit. Backends that hold
//! records in memory evaluate queries with [`ArticleQuery::apply`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::ArticleRecord;
use crate::domain::error::{EcoCampusError, Result};
use crate::domain::{parse_article_date, Article, ArticleId};

/// Column an [`ArticleQuery`] orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    /// Parsed publication date; unreadable dates are the oldest.
    #[default]
    Date,
    Title,
    Views,
    Id,
}

impl OrderField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Views => "views",
            Self::Id => "id",
        }
    }

    fn compare(self, a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
        match self {
            Self::Date => parse_article_date(&a.date).cmp(&parse_article_date(&b.date)),
            Self::Title => a.title.cmp(&b.title),
            Self::Views => a.views.cmp(&b.views),
            Self::Id => a.id.cmp(&b.id),
        }
    }
}

impl FromStr for OrderField {
    type Err = EcoCampusError;

    /// Parses a column name.
    ///
    /// ```
    /// use ecocampus::storage::OrderField;
    ///
    /// assert_eq!("views".parse::<OrderField>().unwrap(), OrderField::Views);
    /// assert!("popularity".parse::<OrderField>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "title" => Ok(Self::Title),
            "views" => Ok(Self::Views),
            "id" => Ok(Self::Id),
            other => Err(EcoCampusError::Config(format!(
                "unknown order field '{other}'"
            ))),
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters, ordering and limit for fetching articles.
///
/// The default query returns every article, most recent date first.
///
/// ```
/// use ecocampus::storage::{ArticleQuery, OrderField};
///
/// let query = ArticleQuery::default().category("Reciclaje").limit(3);
/// assert_eq!(query.order_by, OrderField::Date);
/// assert!(!query.ascending);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub exclude_id: Option<ArticleId>,
    #[serde(default)]
    pub featured_only: bool,
    #[serde(default)]
    pub order_by: OrderField,
    #[serde(default)]
    pub ascending: bool,
    /// Maximum number of records. `Some(0)` means no limit, as `None` does.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ArticleQuery {
    /// Query for the articles shown under an open article: same category, the
    /// article itself excluded, most recent first.
    #[must_use]
    pub fn related(article: &Article, limit: usize) -> Self {
        Self::default()
            .category(article.category.clone())
            .exclude(article.id.clone())
            .limit(limit)
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, id: ArticleId) -> Self {
        self.exclude_id = Some(id);
        self
    }

    #[must_use]
    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: OrderField, ascending: bool) -> Self {
        self.order_by = field;
        self.ascending = ascending;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` if `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &ArticleRecord) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| record.category == category)
            && self.exclude_id.as_ref().map_or(true, |id| record.id != *id)
            && (!self.featured_only || record.featured)
    }

    /// Evaluates the query over in-memory records.
    ///
    /// Filters, then stable-sorts on the order column, then truncates to a
    /// non-zero limit.
    #[must_use]
    pub fn apply<'a, I>(&self, records: I) -> Vec<ArticleRecord>
    where
        I: IntoIterator<Item = &'a ArticleRecord>,
    {
        let mut selected: Vec<ArticleRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();

        let field = self.order_by;
        if self.ascending {
            selected.sort_by(|a, b| field.compare(a, b));
        } else {
            selected.sort_by(|a, b| field.compare(b, a));
        }

        if let Some(limit) = self.limit.filter(|&limit| limit > 0) {
            selected.truncate(limit);
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, category: &str, date: &str, views: u64, featured: bool) -> ArticleRecord {
        ArticleRecord {
            id: ArticleId::Number(id),
            title: format!("t{id}"),
            description: None,
            image_url: String::new(),
            date: date.to_string(),
            views,
            featured,
            is_new: false,
            content: String::new(),
            category: category.to_string(),
        }
    }

    fn ids(records: &[ArticleRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    fn sample() -> Vec<ArticleRecord> {
        vec![
            record(1, "Reciclaje", "01 ENE 2023", 10, false),
            record(2, "Composta", "2024-05-01", 3, true),
            record(3, "Reciclaje", "15 MAR 2024", 7, true),
            record(4, "Reciclaje", "", 99, false),
        ]
    }

    #[test]
    fn default_is_date_descending_by_parsed_date() {
        let out = ArticleQuery::default().apply(&sample());
        assert_eq!(ids(&out), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn filters_combine() {
        let out = ArticleQuery::default()
            .category("Reciclaje")
            .exclude(ArticleId::Number(3))
            .apply(&sample());
        assert_eq!(ids(&out), vec!["1", "4"]);

        let out = ArticleQuery::default().featured_only().apply(&sample());
        assert_eq!(ids(&out), vec!["2", "3"]);
    }

    #[test]
    fn order_and_limit() {
        let out = ArticleQuery::default()
            .order_by(OrderField::Views, true)
            .limit(2)
            .apply(&sample());
        assert_eq!(ids(&out), vec!["2", "3"]);

        assert_eq!(ArticleQuery::default().limit(0).apply(&sample()).len(), 4);
    }

    #[test]
    fn zero_related_limit_returns_every_related_article() {
        let article = sample()[0].clone().into_article();
        let out = ArticleQuery::related(&article, 0).apply(&sample());
        assert_eq!(ids(&out), vec!["3", "4"]);
    }

    #[test]
    fn related_query_uses_category_and_excludes_self() {
        let article = sample()[2].clone().into_article();
        let query = ArticleQuery::related(&article, 3);
        let out = query.apply(&sample());
        assert_eq!(ids(&out), vec!["1", "4"]);
        assert_eq!(query.limit, Some(3));
    }
}
