//! In-memory storage backend.
//!
//! Holds the same [`Dataset`] the JSON backend persists, without touching disk.
//! Used by tests and by the CLI when no data file is wanted.

use serde::{Deserialize, Serialize};

use crate::domain::error::{EcoCampusError, Result};
use crate::domain::{ArticleId, UserRecord, UserSession};
use crate::storage::backend::{ArticleStore, SessionStore, UserStore, MISSING_ID_MESSAGE};
use crate::storage::models::{ArticlePatch, ArticlePayload, ArticleRecord};
use crate::storage::query::ArticleQuery;

/// Current on-disk format version.
pub(crate) const DATASET_VERSION: u32 = 1;

fn default_version() -> u32 {
    DATASET_VERSION
}

fn default_next_id() -> i64 {
    1
}

/// Articles, id counter, session and user directory, as one serializable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Dataset {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub articles: Vec<ArticleRecord>,

    /// Next numeric id handed out by `create_article`.
    #[serde(default = "default_next_id")]
    pub next_id: i64,

    #[serde(default)]
    pub session: Option<UserSession>,

    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            version: DATASET_VERSION,
            articles: Vec::new(),
            next_id: default_next_id(),
            session: None,
            users: Vec::new(),
        }
    }
}

impl Dataset {
    /// Builds a dataset from existing records.
    pub fn with_articles(articles: Vec<ArticleRecord>) -> Self {
        let mut data = Self {
            articles,
            ..Self::default()
        };
        data.normalize();
        data
    }

    /// Moves `next_id` past every numeric id already present, so hand-edited
    /// files never hand out a duplicate.
    pub fn normalize(&mut self) {
        let max_numeric = self
            .articles
            .iter()
            .filter_map(|record| match record.id {
                ArticleId::Number(n) => Some(n),
                ArticleId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_numeric.saturating_add(1));
    }

    fn position(&self, id: &ArticleId) -> Result<usize> {
        if id.is_blank() {
            return Err(EcoCampusError::Validation(MISSING_ID_MESSAGE.to_string()));
        }
        self.articles
            .iter()
            .position(|record| record.id == *id)
            .ok_or_else(|| EcoCampusError::Storage(format!("article not found: {id}")))
    }

    pub fn query(&self, query: &ArticleQuery) -> Vec<ArticleRecord> {
        query.apply(&self.articles)
    }

    pub fn get(&self, id: &ArticleId) -> Option<ArticleRecord> {
        self.articles.iter().find(|record| record.id == *id).cloned()
    }

    pub fn create(&mut self, payload: &ArticlePayload) -> ArticleId {
        let id = ArticleId::Number(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.articles
            .push(ArticleRecord::from_payload(id.clone(), payload));
        id
    }

    pub fn update(&mut self, id: &ArticleId, patch: &ArticlePatch) -> Result<()> {
        let index = self.position(id)?;
        self.articles[index].apply_patch(patch);
        Ok(())
    }

    pub fn delete(&mut self, id: &ArticleId) -> Result<()> {
        let index = self.position(id)?;
        self.articles.remove(index);
        Ok(())
    }

    pub fn increment_views(&mut self, id: &ArticleId) -> Result<u64> {
        let index = self.position(id)?;
        let record = &mut self.articles[index];
        record.views = record.views.saturating_add(1);
        Ok(record.views)
    }

    pub fn update_profile(&mut self, name: &str, avatar: Option<&str>) -> Result<UserSession> {
        let session = self.session.as_mut().ok_or_else(|| {
            EcoCampusError::Storage("no user information stored locally".to_string())
        })?;

        if session.id.trim().is_empty() {
            return Err(EcoCampusError::Storage(
                "stored user id is invalid, sign in again".to_string(),
            ));
        }

        session.name = name.to_string();
        session.avatar = avatar.map(str::to_string);
        Ok(session.clone())
    }
}

/// Volatile storage backend.
///
/// # Examples
///
/// ```
/// use ecocampus::storage::{ArticlePayload, ArticleQuery, ArticleStore, MemoryStorage};
///
/// let mut store = MemoryStorage::new();
/// let id = store.create_article(&ArticlePayload {
///     title: "Composta en casa".to_string(),
///     category: "Composta".to_string(),
///     ..ArticlePayload::default()
/// })?;
/// let all = store.query_articles(&ArticleQuery::default())?;
/// assert_eq!(all[0].id, id);
/// # Ok::<(), ecocampus::EcoCampusError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Dataset,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `articles`.
    #[must_use]
    pub fn with_articles(articles: Vec<ArticleRecord>) -> Self {
        Self {
            data: Dataset::with_articles(articles),
        }
    }

    /// Creates a store with a signed-in session.
    #[must_use]
    pub fn with_session(mut self, session: UserSession) -> Self {
        self.data.session = Some(session);
        self
    }

    /// Creates a store with a user directory.
    #[must_use]
    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.data.users = users;
        self
    }
}

impl ArticleStore for MemoryStorage {
    fn query_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        let _span = tracing::debug_span!("memory_query_articles", order_by = %query.order_by).entered();
        Ok(self.data.query(query))
    }

    fn get_article(&self, id: &ArticleId) -> Result<Option<ArticleRecord>> {
        Ok(self.data.get(id))
    }

    fn create_article(&mut self, payload: &ArticlePayload) -> Result<ArticleId> {
        let _span = tracing::debug_span!("memory_create_article", title = %payload.title).entered();
        Ok(self.data.create(payload))
    }

    fn update_article(&mut self, id: &ArticleId, patch: &ArticlePatch) -> Result<()> {
        let _span = tracing::debug_span!("memory_update_article", id = %id).entered();
        self.data.update(id, patch)
    }

    fn delete_article(&mut self, id: &ArticleId) -> Result<()> {
        let _span = tracing::debug_span!("memory_delete_article", id = %id).entered();
        self.data.delete(id)
    }

    fn increment_views(&mut self, id: &ArticleId) -> Result<u64> {
        self.data.increment_views(id)
    }
}

impl SessionStore for MemoryStorage {
    fn load_session(&self) -> Result<Option<UserSession>> {
        Ok(self.data.session.clone())
    }

    fn save_session(&mut self, session: &UserSession) -> Result<()> {
        self.data.session = Some(session.clone());
        Ok(())
    }

    fn clear_session(&mut self) -> Result<()> {
        self.data.session = None;
        Ok(())
    }

    fn update_profile(&mut self, name: &str, avatar: Option<&str>) -> Result<UserSession> {
        self.data.update_profile(name, avatar)
    }
}

impl UserStore for MemoryStorage {
    fn list_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.data.users.clone())
    }
}
