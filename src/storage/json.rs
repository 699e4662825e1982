//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: a campus-sized feed (hundreds of articles), infrequent writes

use crate::domain::error::{EcoCampusError, Result};
use crate::domain::{ArticleId, UserRecord, UserSession};
use crate::storage::backend::{ArticleStore, SessionStore, UserStore};
use crate::storage::memory::{Dataset, DATASET_VERSION};
use crate::storage::models::{ArticlePatch, ArticlePayload, ArticleRecord};
use crate::storage::query::ArticleQuery;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// Stores articles, the local session and the user directory in one JSON file
/// with atomic writes. The entire dataset is kept in memory and persisted on
/// every modification. A modification whose write fails is rolled back, so the
/// in-memory view never gets ahead of the file.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It's designed to be owned by the single
/// storage worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "articles": [
///     {
///       "id": 1,
///       "title": "Punto limpio en CUCEI",
///       "description": null,
///       "image_url": "https://...",
///       "date": "23 ABR 2025",
///       "views": 12,
///       "featured": true,
///       "is_new": false,
///       "content": "...",
///       "category": "Reciclaje"
///     }
///   ],
///   "next_id": 2,
///   "session": {
///     "id": "a0c1",
///     "email": "ana@alumnos.udg.mx",
///     "name": "Ana",
///     "role": "admin"
///   },
///   "users": [
///     { "id": "a0c1", "name": "Ana", "email": "ana@alumnos.udg.mx", "role": "admin" }
///   ]
/// }
/// ```
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: Dataset,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// If the file exists, loads existing data. Otherwise creates a new empty storage.
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or a newer format version
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ecocampus::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/ecocampus.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating parent directory");
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            tracing::debug!("loading existing data");
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            Dataset::default()
        };

        tracing::debug!(
            article_count = data.articles.len(),
            has_session = data.session.is_some(),
            users = data.users.len(),
            "storage initialized"
        );

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Loads storage data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid JSON, or was
    /// written by a newer format version.
    fn load_from_file(path: &Path) -> Result<Dataset> {
        let contents = std::fs::read_to_string(path)?;
        let mut data: Dataset = serde_json::from_str(&contents)
            .map_err(|e| EcoCampusError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > DATASET_VERSION {
            return Err(EcoCampusError::Storage(format!(
                "unsupported storage version {} (expected {DATASET_VERSION})",
                data.version
            )));
        }
        data.normalize();

        tracing::debug!(
            version = data.version,
            articles = data.articles.len(),
            next_id = data.next_id,
            "loaded storage data"
        );

        Ok(data)
    }

    /// Applies `change` to a copy of the data and swaps it in once it is on disk.
    ///
    /// If `change` fails nothing is written. If the write fails the previous
    /// data stays in place and nothing is left dirty.
    fn transact<T, F>(&mut self, change: F) -> Result<T>
    where
        F: FnOnce(&mut Dataset) -> Result<T>,
    {
        let mut next = self.data.clone();
        let value = change(&mut next)?;

        let previous = std::mem::replace(&mut self.data, next);
        self.dirty = true;
        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "write failed, rolling back");
            self.data = previous;
            self.dirty = false;
            return Err(e);
        }
        Ok(value)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then atomically renames it to the target path.
    /// This ensures the file is never left in a corrupt state, even if the process crashes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - JSON serialization fails (should never happen with valid data)
    /// - Temporary file cannot be written
    /// - Rename operation fails (rare on POSIX systems)
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        tracing::debug!(path = ?self.file_path, "saving storage data");

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| EcoCampusError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!("storage saved successfully");
        Ok(())
    }
}

impl ArticleStore for JsonStorage {
    fn query_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleRecord>> {
        let _span = tracing::debug_span!("json_query_articles",
            category = ?query.category,
            featured_only = query.featured_only,
            order_by = %query.order_by,
            ascending = query.ascending,
            limit = ?query.limit
        ).entered();

        let records = self.data.query(query);

        tracing::debug!(count = records.len(), "retrieved articles");
        Ok(records)
    }

    fn get_article(&self, id: &ArticleId) -> Result<Option<ArticleRecord>> {
        let _span = tracing::debug_span!("json_get_article", id = %id).entered();

        let record = self.data.get(id);

        tracing::debug!(found = record.is_some(), "article lookup complete");
        Ok(record)
    }

    fn create_article(&mut self, payload: &ArticlePayload) -> Result<ArticleId> {
        let _span = tracing::debug_span!("json_create_article",
            title = %payload.title,
            category = %payload.category
        ).entered();

        let id = self.transact(|data| Ok(data.create(payload)))?;

        tracing::debug!(article_id = %id, "article created");
        Ok(id)
    }

    fn update_article(&mut self, id: &ArticleId, patch: &ArticlePatch) -> Result<()> {
        let _span = tracing::debug_span!("json_update_article", id = %id).entered();

        self.transact(|data| data.update(id, patch))?;

        tracing::debug!("article updated");
        Ok(())
    }

    fn delete_article(&mut self, id: &ArticleId) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_article", id = %id).entered();

        self.transact(|data| data.delete(id))?;

        tracing::debug!(remaining = self.data.articles.len(), "article deleted");
        Ok(())
    }

    fn increment_views(&mut self, id: &ArticleId) -> Result<u64> {
        let _span = tracing::debug_span!("json_increment_views", id = %id).entered();

        let views = self.transact(|data| data.increment_views(id))?;

        tracing::debug!(views = views, "view recorded");
        Ok(views)
    }
}

impl SessionStore for JsonStorage {
    fn load_session(&self) -> Result<Option<UserSession>> {
        let _span = tracing::debug_span!("json_load_session").entered();

        let session = self.data.session.clone();

        tracing::debug!(found = session.is_some(), "session lookup complete");
        Ok(session)
    }

    fn save_session(&mut self, session: &UserSession) -> Result<()> {
        let _span = tracing::debug_span!("json_save_session", user_id = %session.id).entered();

        self.transact(|data| {
            data.session = Some(session.clone());
            Ok(())
        })
    }

    fn clear_session(&mut self) -> Result<()> {
        let _span = tracing::debug_span!("json_clear_session").entered();

        if self.data.session.is_none() {
            tracing::trace!("no session stored");
            return Ok(());
        }
        self.transact(|data| {
            data.session = None;
            Ok(())
        })
    }

    fn update_profile(&mut self, name: &str, avatar: Option<&str>) -> Result<UserSession> {
        let _span = tracing::debug_span!("json_update_profile", name = %name).entered();

        let session = self.transact(|data| data.update_profile(name, avatar))?;

        tracing::debug!(user_id = %session.id, "profile updated");
        Ok(session)
    }
}

impl UserStore for JsonStorage {
    fn list_users(&self) -> Result<Vec<UserRecord>> {
        let _span = tracing::debug_span!("json_list_users").entered();

        let users = self.data.users.clone();

        tracing::debug!(count = users.len(), "users retrieved");
        Ok(users)
    }
}

impl Drop for JsonStorage {
    /// Ensures data is saved on drop, even if the user forgot to call save explicitly.
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
