//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! gesture input and worker responses, translating them into state changes and
//! action sequences. It serves as the primary control flow coordinator for the
//! application.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the runtime or the worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! Events fall into several categories:
//! - **Feed**: `Refresh`, `SelectCategory`
//! - **Search**: `OpenSearch`, `CloseSearch`, `SearchInput`, `SubmitSearch`,
//!   `SelectRecentSearch`
//! - **Detail**: `OpenArticle`, `CloseArticle`
//! - **Map**: `Gesture`
//! - **Forms**: `CheckLogin`, `CheckRegistration`
//! - **Admin / profile**: `SaveArticle`, `DeleteArticle`, `OpenUserManagement`,
//!   `SearchUsers`, `UpdateProfile`, `Logout`
//! - **Worker**: `WorkerResponse` with typed message variants
//!
//! # Example
//!
//! ```rust
//! use ecocampus::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (render, actions) = handle_event(&mut state, &Event::Refresh)?;
//! assert!(render);
//! assert!(matches!(actions[0], Action::PostToWorker(_)));
//! # Ok::<(), ecocampus::EcoCampusError>(())
//! ```

use crate::app::modes::{FeedStatus, SearchMode};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::validation::{
    validate_article_form, validate_login, validate_profile_name, validate_registration, ArticleForm,
    RegistrationForm,
};
use crate::domain::{ArticleId, EcoCampusError};
use crate::gesture::{GestureEvent, GestureOutcome};
use crate::storage::MISSING_ID_MESSAGE;
use crate::worker::{Operation, WorkerMessage, WorkerResponse};

const ERROR_TITLE: &str = "Error";
const SUCCESS_TITLE: &str = "Success";
const ACCESS_DENIED_TITLE: &str = "Access denied";
const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to use the admin panel.";
const LOAD_FAILED_MESSAGE: &str = "Could not load articles.";
const USERS_FAILED_MESSAGE: &str = "Could not load users.";

/// Events triggered by user input, gestures, or worker responses.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and action emissions. The event handler processes these sequentially,
/// ensuring deterministic state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Loads the feed (first load or pull-to-refresh).
    Refresh,

    /// Selects a category chip; `"Todos"` shows everything.
    SelectCategory(String),

    /// Opens the search panel with an empty query.
    OpenSearch,
    /// Closes the search panel and clears the query.
    CloseSearch,
    /// Replaces the search query as the user types.
    SearchInput(String),
    /// Submits the current query, recording it in the recent searches.
    SubmitSearch,
    /// Re-runs a recent search.
    SelectRecentSearch(String),

    /// Opens the detail view of an article.
    OpenArticle(ArticleId),
    /// Leaves the detail view.
    CloseArticle,

    /// Pinch input on the campus map.
    Gesture(GestureEvent),

    /// Validates the sign-in form before it is sent anywhere.
    CheckLogin { email: String, password: String },

    /// Validates the registration form against the institutional domain.
    CheckRegistration(RegistrationForm),

    /// Creates (`id: None`) or updates an article from the admin editor.
    SaveArticle {
        id: Option<ArticleId>,
        form: ArticleForm,
    },

    /// Deletes an article from the admin panel.
    DeleteArticle(ArticleId),

    /// Opens the user directory of the admin panel.
    OpenUserManagement,

    /// Filters the loaded user directory by name or email.
    SearchUsers(String),

    /// Changes the signed-in user's display name and avatar.
    UpdateProfile {
        name: String,
        avatar: Option<String>,
    },

    /// Signs out, clearing the stored session.
    Logout,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// This is the primary event handler that coordinates all state transitions and
/// side effects.
///
/// # Returns
///
/// Whether the state changed in a way that needs a re-render, and the actions to
/// execute in sequence.
///
/// # Errors
///
/// Validation and access failures are reported to the user as alerts, not as
/// errors. An error is returned only when the event cannot be interpreted at all.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event type.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::Refresh => {
            state.status = if state.articles.is_empty() {
                FeedStatus::Loading
            } else {
                FeedStatus::Refreshing
            };
            tracing::debug!(status = ?state.status, "requesting feed");
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_feed())]))
        }
        Event::SelectCategory(category) => {
            if *category == state.selected_category {
                return Ok((false, vec![]));
            }
            tracing::debug!(category = %category, "category selected");
            state.selected_category.clone_from(category);
            state.apply_category_filter();
            Ok((true, vec![]))
        }
        Event::OpenSearch => {
            state.search.mode = SearchMode::Typing;
            state.search.reset();
            Ok((true, vec![]))
        }
        Event::CloseSearch => {
            if !state.search.mode.is_open() {
                return Ok((false, vec![]));
            }
            state.search.mode = SearchMode::Closed;
            state.search.reset();
            Ok((true, vec![]))
        }
        Event::SearchInput(query) => {
            if !state.search.mode.is_open() {
                return Ok((false, vec![]));
            }
            state.search.mode = SearchMode::Typing;
            state.search.query.clone_from(query);
            state.apply_search_filter();
            tracing::trace!(query = %query, results = state.search.results.len(), "search query updated");
            Ok((true, vec![]))
        }
        Event::SubmitSearch => {
            if !state.search.mode.is_open() || state.search.query.trim().is_empty() {
                return Ok((false, vec![]));
            }
            let query = state.search.query.clone();
            state.search.recent.record(&query);
            state.search.mode = SearchMode::Submitted;
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::SelectRecentSearch(query) => {
            state.search.mode = SearchMode::Typing;
            state.search.query.clone_from(query);
            state.apply_search_filter();
            Ok((true, vec![]))
        }
        Event::OpenArticle(id) => {
            let Some(article) = state.find_article(id).cloned() else {
                tracing::debug!(id = %id, "article not loaded, ignoring");
                return Ok((false, vec![]));
            };

            if state.search.mode.is_open() {
                state.search.mode = SearchMode::Closed;
                state.search.reset();
            }

            let actions = vec![
                Action::NavigateToArticle(article.id.clone()),
                Action::PostToWorker(WorkerMessage::record_view(article.id.clone())),
                Action::PostToWorker(WorkerMessage::load_related(&article, state.related_limit)),
            ];
            state.related.clear();
            state.selected_article = Some(article);
            Ok((true, actions))
        }
        Event::CloseArticle => {
            let had_article = state.selected_article.take().is_some();
            state.related.clear();
            Ok((had_article, vec![]))
        }
        Event::Gesture(gesture) => {
            let outcome = state.map.handle(*gesture);
            Ok((!matches!(outcome, GestureOutcome::Ignored), vec![]))
        }
        Event::CheckLogin { email, password } => {
            state.form_errors = validate_login(email, password);
            Ok((true, vec![]))
        }
        Event::CheckRegistration(form) => {
            state.form_errors = validate_registration(form, &state.institutional_domain);
            tracing::debug!(valid = state.form_errors.is_empty(), "registration form checked");
            Ok((true, vec![]))
        }
        Event::SaveArticle { id, form } => {
            if !state.is_admin() {
                return Ok((false, vec![access_denied()]));
            }
            if id.as_ref().is_some_and(ArticleId::is_blank) {
                return Ok((false, vec![Action::alert(ERROR_TITLE, MISSING_ID_MESSAGE)]));
            }

            let payload = match validate_article_form(form) {
                Ok(payload) => payload,
                Err(e) => return Ok((false, vec![Action::alert(ERROR_TITLE, e.to_string())])),
            };

            let message = match id {
                Some(id) => WorkerMessage::update_article(id.clone(), payload.into()),
                None => WorkerMessage::create_article(payload),
            };
            state.editor.saving = true;
            Ok((true, vec![Action::PostToWorker(message)]))
        }
        Event::DeleteArticle(id) => {
            if !state.is_admin() {
                return Ok((false, vec![access_denied()]));
            }
            if id.is_blank() {
                return Ok((false, vec![Action::alert(ERROR_TITLE, MISSING_ID_MESSAGE)]));
            }
            state.editor.deleting = Some(id.clone());
            Ok((true, vec![Action::PostToWorker(WorkerMessage::delete_article(id.clone()))]))
        }
        Event::OpenUserManagement => {
            if !state.is_admin() {
                return Ok((false, vec![access_denied()]));
            }
            state.users.loading = true;
            Ok((true, vec![Action::PostToWorker(WorkerMessage::load_users())]))
        }
        Event::SearchUsers(query) => {
            state.users.query.clone_from(query);
            state.users.apply_filter();
            tracing::trace!(query = %query, visible = state.users.visible.len(), "user filter updated");
            Ok((true, vec![]))
        }
        Event::UpdateProfile { name, avatar } => match validate_profile_name(name) {
            Ok(name) => Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::update_profile(name, avatar.clone()))],
            )),
            Err(e) => Ok((false, vec![Action::alert(ERROR_TITLE, e.to_string())])),
        },
        Event::Logout => Ok((false, vec![Action::PostToWorker(WorkerMessage::clear_session())])),
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::ArticlesLoaded { articles } => {
            state.apply_articles(articles.clone());
            Ok((true, vec![]))
        }
        WorkerResponse::RelatedLoaded {
            article_id,
            articles,
        } => {
            let is_current = state
                .selected_article
                .as_ref()
                .is_some_and(|article| article.id == *article_id);
            if !is_current {
                tracing::debug!(id = %article_id, "related articles for a closed article, dropping");
                return Ok((false, vec![]));
            }
            state.related.clone_from(articles);
            Ok((true, vec![]))
        }
        WorkerResponse::ArticleSaved { id, created } => {
            state.editor.saving = false;
            tracing::debug!(id = %id, created = created, "article saved");
            let verb = if *created { "created" } else { "updated" };
            Ok((
                true,
                vec![
                    Action::alert(SUCCESS_TITLE, format!("Article {verb} successfully")),
                    Action::PostToWorker(WorkerMessage::load_feed()),
                ],
            ))
        }
        WorkerResponse::ArticleDeleted { id } => {
            state.editor.deleting = None;
            if state.selected_article.as_ref().is_some_and(|a| a.id == *id) {
                state.selected_article = None;
                state.related.clear();
            }
            Ok((
                true,
                vec![
                    Action::alert(SUCCESS_TITLE, "Article deleted successfully"),
                    Action::PostToWorker(WorkerMessage::load_feed()),
                ],
            ))
        }
        WorkerResponse::ViewRecorded { id, views } => {
            state.set_views(id, *views);
            Ok((true, vec![]))
        }
        WorkerResponse::SessionLoaded { session } => {
            tracing::debug!(signed_in = session.is_some(), "session loaded");
            state.session.clone_from(session);
            Ok((true, vec![]))
        }
        WorkerResponse::ProfileUpdated { session } => {
            state.session = Some(session.clone());
            Ok((true, vec![Action::alert(SUCCESS_TITLE, "Profile updated successfully")]))
        }
        WorkerResponse::SessionCleared => {
            state.session = None;
            state.editor = Default::default();
            state.users = Default::default();
            Ok((true, vec![Action::NavigateToLogin]))
        }
        WorkerResponse::UsersLoaded { users } => {
            tracing::debug!(count = users.len(), "user directory loaded");
            state.users.apply_users(users.clone());
            Ok((true, vec![]))
        }
        WorkerResponse::Error { operation, message } => {
            Ok(handle_worker_error(state, *operation, message))
        }
    }
}

fn handle_worker_error(state: &mut AppState, operation: Operation, message: &str) -> (bool, Vec<Action>) {
    tracing::error!(operation = %operation, error = %message, "worker operation failed");
    state.last_error = Some(message.to_string());

    match operation {
        Operation::LoadArticles => {
            state.clear_articles();
            state.status = FeedStatus::Failed;
            (true, vec![Action::alert(ERROR_TITLE, LOAD_FAILED_MESSAGE)])
        }
        Operation::LoadRelated => {
            state.related.clear();
            (true, vec![])
        }
        Operation::RecordView => (false, vec![]),
        Operation::LoadUsers => {
            state.users.apply_users(Vec::new());
            (true, vec![Action::alert(ERROR_TITLE, USERS_FAILED_MESSAGE)])
        }
        Operation::CreateArticle
        | Operation::UpdateArticle
        | Operation::DeleteArticle
        | Operation::LoadSession
        | Operation::UpdateProfile
        | Operation::ClearSession => {
            state.editor = Default::default();
            (true, vec![Action::alert(ERROR_TITLE, message)])
        }
    }
}

fn access_denied() -> Action {
    let e = EcoCampusError::AccessDenied(ACCESS_DENIED_MESSAGE.to_string());
    tracing::warn!(error = %e, "admin action rejected");
    Action::alert(ACCESS_DENIED_TITLE, ACCESS_DENIED_MESSAGE)
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Refresh => "refresh",
        Event::SelectCategory(_) => "select_category",
        Event::OpenSearch => "open_search",
        Event::CloseSearch => "close_search",
        Event::SearchInput(_) => "search_input",
        Event::SubmitSearch => "submit_search",
        Event::SelectRecentSearch(_) => "select_recent_search",
        Event::OpenArticle(_) => "open_article",
        Event::CloseArticle => "close_article",
        Event::Gesture(_) => "gesture",
        Event::CheckLogin { .. } => "check_login",
        Event::CheckRegistration(_) => "check_registration",
        Event::SaveArticle { .. } => "save_article",
        Event::DeleteArticle(_) => "delete_article",
        Event::OpenUserManagement => "open_user_management",
        Event::SearchUsers(_) => "search_users",
        Event::UpdateProfile { .. } => "update_profile",
        Event::Logout => "logout",
        Event::WorkerResponse(_) => "worker_response",
    }
}
