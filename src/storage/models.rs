//! Storage record models for the persistence layer.
//!
//! Records keep the store's snake_case field names (`image_url`, `is_new`) and
//! tolerate missing or `null` fields, which hosted tables routinely return. They
//! are mapped to the domain [`Article`] at the boundary.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Article, ArticleId};
use crate::feed::ranking::Rankable;

/// Deserializes `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An article row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: ArticleId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,

    /// Raw date as entered in the editor.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_new: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
}

impl ArticleRecord {
    /// Builds the record a store inserts for `payload` under `id`, with zero views.
    #[must_use]
    pub fn from_payload(id: ArticleId, payload: &ArticlePayload) -> Self {
        Self {
            id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            image_url: payload.image_url.clone(),
            date: payload.date.clone(),
            views: 0,
            featured: payload.featured,
            is_new: payload.is_new,
            content: payload.content.clone(),
            category: payload.category.clone(),
        }
    }

    /// Applies every field present in `patch`.
    pub fn apply_patch(&mut self, patch: &ArticlePatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(image_url) = &patch.image_url {
            self.image_url.clone_from(image_url);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        if let Some(is_new) = patch.is_new {
            self.is_new = is_new;
        }
        if let Some(date) = &patch.date {
            self.date.clone_from(date);
        }
    }

    /// Maps the stored row to the domain model.
    #[must_use]
    pub fn into_article(self) -> Article {
        Article {
            id: self.id,
            title: self.title,
            description: self.description,
            content: self.content,
            category: self.category,
            image_url: self.image_url,
            date: self.date,
            views: self.views,
            featured: self.featured,
            is_new: self.is_new,
        }
    }
}

impl From<Article> for ArticleRecord {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            description: article.description,
            image_url: article.image_url,
            date: article.date,
            views: article.views,
            featured: article.featured,
            is_new: article.is_new,
            content: article.content,
            category: article.category,
        }
    }
}

impl Rankable for ArticleRecord {
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

/// Fields of a new article. The store assigns `id` and starts `views` at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticlePayload {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub content: String,
    pub category: String,
    pub featured: bool,
    pub is_new: bool,
    pub date: String,
}

impl From<ArticlePayload> for ArticlePatch {
    /// A full payload used as an update: every field is overwritten.
    fn from(payload: ArticlePayload) -> Self {
        Self {
            title: Some(payload.title),
            description: Some(payload.description),
            image_url: Some(payload.image_url),
            content: Some(payload.content),
            category: Some(payload.category),
            featured: Some(payload.featured),
            is_new: Some(payload.is_new),
            date: Some(payload.date),
        }
    }
}

/// Partial update; `None` leaves the stored field untouched.
///
/// `description` is doubly optional so an update can clear it
/// (`Some(None)`) as well as leave it alone (`None`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticlePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl ArticlePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_default() {
        let json = r#"{"id": 4, "title": "Pilas", "featured": null, "views": null}"#;
        let record: ArticleRecord = serde_json::from_str(json).unwrap();
        assert!(!record.featured);
        assert!(!record.is_new);
        assert_eq!(record.views, 0);
        assert_eq!(record.date, "");

        let article = record.into_article();
        assert_eq!(article.id, ArticleId::Number(4));
        assert_eq!(article.title, "Pilas");
    }

    #[test]
    fn string_ids_are_accepted() {
        let json = r#"{"id": "9f1c", "title": "Vidrio", "is_new": true}"#;
        let record: ArticleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, ArticleId::Text("9f1c".to_string()));
        assert!(record.is_new);
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let payload = ArticlePayload {
            title: "Original".to_string(),
            description: Some("desc".to_string()),
            category: "Reciclaje".to_string(),
            ..ArticlePayload::default()
        };
        let mut record = ArticleRecord::from_payload(ArticleId::Number(1), &payload);

        record.apply_patch(&ArticlePatch {
            featured: Some(true),
            description: Some(None),
            ..ArticlePatch::default()
        });

        assert_eq!(record.title, "Original");
        assert_eq!(record.description, None);
        assert!(record.featured);
        assert!(ArticlePatch::default().is_empty());
    }
}
