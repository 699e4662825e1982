//! Mode state types for the application.
//!
//! These enums are the small state machines the handler moves between:
//!
//! - [`FeedStatus`]: whether a feed load is in flight and how it ended
//! - [`SearchMode`]: whether the search panel is closed, being typed in, or
//!   showing the results of a submitted query
//!
//! # Example
//!
//! ```rust
//! use ecocampus::app::modes::{FeedStatus, SearchMode};
//!
//! assert!(FeedStatus::Refreshing.is_loading());
//! assert!(!SearchMode::Closed.is_open());
//! ```

/// Lifecycle of the feed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// First load in flight; the feed shows a spinner.
    Loading,

    /// Pull-to-refresh in flight; current articles stay visible.
    Refreshing,

    /// Articles are loaded.
    Ready,

    /// The last load failed; lists were cleared.
    Failed,
}

impl FeedStatus {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing)
    }
}

/// State of the search panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Panel hidden.
    #[default]
    Closed,

    /// Panel open, results follow the query as it is typed.
    Typing,

    /// The query was submitted and recorded in the recent searches.
    Submitted,
}

impl SearchMode {
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}
