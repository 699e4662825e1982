//! Storage backend abstraction.
//!
//! Three collaborators sit behind the worker: the article store the admin panel
//! and the feed talk to, the local session store holding the signed-in user,
//! and the user directory the admin panel lists. They are separate traits so a
//! backend can provide one without the others; [`Storage`] is the set the
//! worker owns.
//!
//! # Design Philosophy
//!
//! Methods map one-to-one to worker messages rather than forming a generic ORM.

use crate::domain::error::Result;
use crate::domain::{ArticleId, UserRecord, UserSession};
use crate::storage::models::{ArticlePatch, ArticlePayload, ArticleRecord};
use crate::storage::query::ArticleQuery;

/// Message returned when an operation receives a blank article id.
pub const MISSING_ID_MESSAGE: &str = "Article ID is required.";

/// Remote content store holding feed articles.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process, for tests
pub trait ArticleStore {
    /// Returns the records matching `query`, ordered and limited as it asks.
    ///
    /// The store's order is only a pre-order; the feed ranks on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn query_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>>;

    /// Looks up one article. `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get_article(&self, id: &ArticleId) -> Result<Option<ArticleRecord>>;

    /// Inserts a new article and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn create_article(&mut self, payload: &ArticlePayload) -> Result<ArticleId>;

    /// Applies `patch` to an existing article.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank id, a missing article, or a failed write.
    fn update_article(&mut self, id: &ArticleId, patch: &ArticlePatch) -> Result<()>;

    /// Deletes an article.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank id, a missing article, or a failed write.
    fn delete_article(&mut self, id: &ArticleId) -> Result<()>;

    /// Increments the view counter and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank id, a missing article, or a failed write.
    fn increment_views(&mut self, id: &ArticleId) -> Result<u64>;
}

/// Local store for the signed-in user's session.
///
/// Loaded once at start-up, rewritten on profile edits and cleared on logout.
pub trait SessionStore {
    /// Returns the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn load_session(&self) -> Result<Option<UserSession>>;

    /// Replaces the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_session(&mut self, session: &UserSession) -> Result<()>;

    /// Removes the stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear_session(&mut self) -> Result<()>;

    /// Updates the display name and avatar of the stored session and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is stored, the stored session has a blank
    /// id, or the write fails.
    fn update_profile(&mut self, name: &str, avatar: Option<&str>) -> Result<UserSession>;
}

/// Directory of registered users, read by the admin panel.
pub trait UserStore {
    /// Returns every user in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list_users(&self) -> Result<Vec<UserRecord>>;
}

/// Everything the storage worker needs, as one object it can own.
pub trait Storage: ArticleStore + SessionStore + UserStore + Send {}

impl<T: ArticleStore + SessionStore + UserStore + Send> Storage for T {}
