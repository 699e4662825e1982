//! Application state management.
//!
//! This module defines [`AppState`], the central state container for the client,
//! along with the derived-state computations the handler runs after each change.
//! It is the single source of truth for everything a renderer shows.
//!
//! # Architecture
//!
//! `AppState` separates core data (ranked articles, session) from derived state
//! (featured carousel, category chips, visible articles, search results) to keep
//! state transitions consistent: derived lists are only ever recomputed from the
//! core data, never edited in place.
//!
//! # State Components
//!
//! - **Articles**: full feed, ranked
//! - **Featured / Categories / Visible**: derived from the ranked feed
//! - **Search**: panel mode, query, results and recent searches
//! - **Detail**: open article and its related articles
//! - **Map**: the pinch-zoom controller of the campus map
//! - **Session**: the signed-in user, if any, and client-side form errors
//! - **Editor**: in-flight admin operations
//! - **Users**: the user directory shown to administrators
//!
//! # Example
//!
//! ```rust
//! use ecocampus::app::AppState;
//! use ecocampus::domain::{Article, ArticleId};
//! use ecocampus::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! state.apply_articles(vec![Article::new(ArticleId::Number(1), "Pilas", "Reciclaje")]);
//! assert_eq!(state.categories, vec!["Todos", "Reciclaje"]);
//! ```

use super::modes::{FeedStatus, SearchMode};
use crate::domain::user::display_name;
use crate::domain::validation::FieldErrors;
use crate::domain::{Article, ArticleId, UserRecord, UserSession};
use crate::feed::{self, RecentSearches, ALL_CATEGORIES};
use crate::gesture::PinchZoomController;
use crate::Config;

/// Search panel state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub query: String,
    pub results: Vec<Article>,
    pub recent: RecentSearches,
}

impl SearchState {
    fn new(recent_limit: usize) -> Self {
        Self {
            mode: SearchMode::Closed,
            query: String::new(),
            results: Vec::new(),
            recent: RecentSearches::with_limit(recent_limit),
        }
    }

    /// Clears query and results, keeping the recent searches.
    pub fn reset(&mut self) {
        self.query.clear();
        self.results.clear();
    }
}

/// In-flight admin operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    /// A create or update was posted and has not been answered yet.
    pub saving: bool,

    /// Article whose deletion is in flight.
    pub deleting: Option<ArticleId>,
}

/// User directory of the admin panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    /// Every user, in store order.
    pub all: Vec<UserRecord>,
    pub query: String,
    /// Users matching `query`.
    pub visible: Vec<UserRecord>,
    pub loading: bool,
}

impl UserDirectory {
    /// Replaces the directory and re-applies the current query.
    pub fn apply_users(&mut self, users: Vec<UserRecord>) {
        self.all = users;
        self.loading = false;
        self.apply_filter();
    }

    pub fn apply_filter(&mut self) {
        self.visible = self
            .all
            .iter()
            .filter(|user| user.matches(&self.query))
            .cloned()
            .collect();
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every article, ranked new > featured > date.
    pub articles: Vec<Article>,

    /// Featured subset, ranked on its own.
    pub featured: Vec<Article>,

    /// Category chips, `"Todos"` first.
    pub categories: Vec<String>,

    pub selected_category: String,

    /// Articles under the selected category.
    pub visible: Vec<Article>,

    pub status: FeedStatus,

    /// Message of the last failed operation, cleared on the next success.
    pub last_error: Option<String>,

    pub search: SearchState,

    /// Article whose detail view is open.
    pub selected_article: Option<Article>,

    /// Related articles of `selected_article`, in store order.
    pub related: Vec<Article>,

    /// Zoom state of the campus map.
    pub map: PinchZoomController,

    pub session: Option<UserSession>,

    /// Messages of the last checked sign-in or registration form.
    pub form_errors: FieldErrors,

    /// Email domain required at registration.
    pub institutional_domain: String,

    pub editor: EditorState,

    pub users: UserDirectory,

    /// How many related articles to request.
    pub related_limit: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    /// Creates an empty state using the limits from `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            articles: Vec::new(),
            featured: Vec::new(),
            categories: vec![ALL_CATEGORIES.to_string()],
            selected_category: ALL_CATEGORIES.to_string(),
            visible: Vec::new(),
            status: FeedStatus::Idle,
            last_error: None,
            search: SearchState::new(config.recent_search_limit),
            selected_article: None,
            related: Vec::new(),
            map: PinchZoomController::new(),
            session: None,
            form_errors: FieldErrors::default(),
            institutional_domain: config.institutional_domain.clone(),
            editor: EditorState::default(),
            users: UserDirectory::default(),
            related_limit: config.related_limit,
        }
    }

    /// Replaces the feed with freshly loaded articles.
    ///
    /// Ranks them, derives the featured carousel and category chips, and keeps
    /// the selected category when it still exists.
    pub fn apply_articles(&mut self, articles: Vec<Article>) {
        let (ranked, chips) = feed::category::ranked_with_categories(&articles);
        self.featured = feed::rank_featured(&ranked);
        self.articles = ranked;
        self.categories = chips;

        if !self.categories.contains(&self.selected_category) {
            tracing::debug!(
                category = %self.selected_category,
                "selected category disappeared, falling back to all"
            );
            self.selected_category = ALL_CATEGORIES.to_string();
        }

        self.status = FeedStatus::Ready;
        self.last_error = None;
        self.apply_category_filter();
        self.apply_search_filter();

        tracing::debug!(
            articles = self.articles.len(),
            featured = self.featured.len(),
            categories = self.categories.len(),
            "feed updated"
        );
    }

    /// Empties every list after a failed load.
    pub fn clear_articles(&mut self) {
        self.articles.clear();
        self.featured.clear();
        self.visible.clear();
        self.categories = vec![ALL_CATEGORIES.to_string()];
        self.selected_category = ALL_CATEGORIES.to_string();
        self.search.results.clear();
    }

    /// Recomputes the articles visible under the selected category.
    pub fn apply_category_filter(&mut self) {
        self.visible = feed::filter_by_category(&self.articles, &self.selected_category);
    }

    /// Recomputes search results for the current query.
    pub fn apply_search_filter(&mut self) {
        self.search.results = feed::search_articles(&self.articles, &self.search.query);
    }

    /// Finds a loaded article by id, in the feed or the related list.
    #[must_use]
    pub fn find_article(&self, id: &ArticleId) -> Option<&Article> {
        self.articles
            .iter()
            .chain(self.related.iter())
            .find(|article| article.id == *id)
    }

    /// Updates the view counter of every loaded copy of an article.
    pub fn set_views(&mut self, id: &ArticleId, views: u64) {
        let copies = self
            .articles
            .iter_mut()
            .chain(self.featured.iter_mut())
            .chain(self.visible.iter_mut())
            .chain(self.search.results.iter_mut())
            .chain(self.related.iter_mut())
            .chain(self.selected_article.iter_mut());
        for article in copies.filter(|article| article.id == *id) {
            article.views = views;
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(UserSession::is_admin)
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(self.session.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, category: &str, featured: bool) -> Article {
        let mut article = Article::new(ArticleId::Number(id), format!("t{id}"), category);
        article.featured = featured;
        article
    }

    #[test]
    fn starts_with_only_all_category() {
        let state = AppState::default();
        assert_eq!(state.categories, vec![ALL_CATEGORIES]);
        assert_eq!(state.status, FeedStatus::Idle);
        assert_eq!(state.display_name(), "Usuario");
    }

    #[test]
    fn selected_category_survives_reload_if_present() {
        let mut state = AppState::default();
        state.apply_articles(vec![article(1, "A", false), article(2, "B", true)]);
        state.selected_category = "B".to_string();
        state.apply_category_filter();
        assert_eq!(state.visible.len(), 1);

        state.apply_articles(vec![article(3, "B", false)]);
        assert_eq!(state.selected_category, "B");

        state.apply_articles(vec![article(4, "C", false)]);
        assert_eq!(state.selected_category, ALL_CATEGORIES);
        assert_eq!(state.visible.len(), 1);
    }

    #[test]
    fn views_update_every_copy() {
        let mut state = AppState::default();
        state.apply_articles(vec![article(1, "A", true)]);
        state.selected_article = state.articles.first().cloned();
        state.set_views(&ArticleId::Number(1), 9);

        assert_eq!(state.articles[0].views, 9);
        assert_eq!(state.featured[0].views, 9);
        assert_eq!(state.visible[0].views, 9);
        assert_eq!(state.selected_article.as_ref().map(|a| a.views), Some(9));
    }

    #[test]
    fn user_filter_survives_reload() {
        use crate::domain::Role;

        let mut users = UserDirectory {
            query: "luis".to_string(),
            loading: true,
            ..UserDirectory::default()
        };
        users.apply_users(vec![
            UserRecord::new("u1", "Ana", "ana@alumnos.udg.mx", Role::Admin),
            UserRecord::new("u2", "Luis", "luis@alumnos.udg.mx", Role::User),
        ]);
        assert!(!users.loading);
        assert_eq!(users.all.len(), 2);
        assert_eq!(users.visible.len(), 1);
        assert_eq!(users.visible[0].id, "u2");
    }
}
