//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, which represents imperative commands
//! produced by the event handler after processing user input or worker
//! responses. Actions bridge pure state transformations and effectful operations
//! like showing alerts, navigating, or communicating with the background worker.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, allowing
//! multiple side effects to be queued atomically. The runtime executes them in
//! sequence.
//!
//! # Example
//!
//! ```rust
//! use ecocampus::app::Action;
//! use ecocampus::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::load_feed()),
//!     Action::alert("Error", "Could not load articles."),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::domain::ArticleId;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Shows a modal alert to the user.
    ShowAlert {
        title: String,
        message: String,
    },

    /// Opens the detail view of an article.
    NavigateToArticle(ArticleId),

    /// Returns to the sign-in screen, after logout.
    NavigateToLogin,
}

impl Action {
    /// Shorthand for [`Action::ShowAlert`].
    #[must_use]
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShowAlert {
            title: title.into(),
            message: message.into(),
        }
    }
}
