//! Worker thread message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the event loop
//! and the background worker thread that owns the stores. It also implements
//! tracing context propagation across the thread boundary.

use crate::domain::{Article, ArticleId, UserRecord, UserSession};
use crate::storage::{ArticlePatch, ArticlePayload, ArticleQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when passing messages to the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Extracts the OpenTelemetry trace ID and span ID from the active span.
    /// Returns `None` if the current span context is invalid, which is always
    /// the case when no OpenTelemetry layer is installed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ecocampus::worker::TraceContext;
    ///
    /// // Without a subscriber there is no span to capture.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id_str = format!("{:032x}", span_context.trace_id());
            let parent_span_id_str = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id_str,
                parent_span_id = %parent_span_id_str,
                "capturing trace context"
            );

            Some(Self {
                trace_id: trace_id_str,
                parent_span_id: parent_span_id_str,
            })
        } else {
            None
        }
    }
}

/// Why a batch of articles is being loaded; decides which response carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPurpose {
    /// The main feed (initial load or pull-to-refresh).
    Feed,
    /// The "related articles" strip under an open article.
    Related { article_id: ArticleId },
}

/// Store operation a message asks for.
///
/// Carried back in [`WorkerResponse::Error`] so the event loop can react to a
/// failure according to what failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadArticles,
    LoadRelated,
    CreateArticle,
    UpdateArticle,
    DeleteArticle,
    RecordView,
    LoadSession,
    UpdateProfile,
    ClearSession,
    LoadUsers,
}

impl Operation {
    /// Short name used in spans and log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadArticles => "load articles",
            Self::LoadRelated => "load related articles",
            Self::CreateArticle => "create article",
            Self::UpdateArticle => "update article",
            Self::DeleteArticle => "delete article",
            Self::RecordView => "record view",
            Self::LoadSession => "load session",
            Self::UpdateProfile => "update profile",
            Self::ClearSession => "clear session",
            Self::LoadUsers => "load users",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Macro to generate builder methods for `WorkerMessage` variants.
///
/// Generates convenience constructors that automatically attach the current
/// trace context to each message variant.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_articles(LoadArticles { query: ArticleQuery, purpose: LoadPurpose }),
    create_article(CreateArticle { payload: ArticlePayload }),
    update_article(UpdateArticle { id: ArticleId, patch: ArticlePatch }),
    delete_article(DeleteArticle { id: ArticleId }),
    record_view(RecordView { id: ArticleId }),
    load_session(LoadSession {}),
    update_profile(UpdateProfile { name: String, avatar: Option<String> }),
    clear_session(ClearSession {}),
    load_users(LoadUsers {}),
}

impl WorkerMessage {
    /// Load of the main feed with the default query (all articles, date descending).
    #[must_use]
    pub fn load_feed() -> Self {
        Self::load_articles(ArticleQuery::default(), LoadPurpose::Feed)
    }

    /// Load of the articles related to `article`.
    #[must_use]
    pub fn load_related(article: &Article, limit: usize) -> Self {
        Self::load_articles(
            ArticleQuery::related(article, limit),
            LoadPurpose::Related {
                article_id: article.id.clone(),
            },
        )
    }

    /// Store operation this message asks for.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::LoadArticles {
                purpose: LoadPurpose::Related { .. },
                ..
            } => Operation::LoadRelated,
            Self::LoadArticles { .. } => Operation::LoadArticles,
            Self::CreateArticle { .. } => Operation::CreateArticle,
            Self::UpdateArticle { .. } => Operation::UpdateArticle,
            Self::DeleteArticle { .. } => Operation::DeleteArticle,
            Self::RecordView { .. } => Operation::RecordView,
            Self::LoadSession { .. } => Operation::LoadSession,
            Self::UpdateProfile { .. } => Operation::UpdateProfile,
            Self::ClearSession { .. } => Operation::ClearSession,
            Self::LoadUsers { .. } => Operation::LoadUsers,
        }
    }

    /// Trace context carried by the message, if any.
    #[must_use]
    pub fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadArticles { trace_context, .. }
            | Self::CreateArticle { trace_context, .. }
            | Self::UpdateArticle { trace_context, .. }
            | Self::DeleteArticle { trace_context, .. }
            | Self::RecordView { trace_context, .. }
            | Self::LoadSession { trace_context }
            | Self::UpdateProfile { trace_context, .. }
            | Self::ClearSession { trace_context }
            | Self::LoadUsers { trace_context } => trace_context.as_ref(),
        }
    }
}

/// Messages sent from the event loop to the worker thread.
///
/// Each variant corresponds to one store operation. All variants include an
/// optional trace context for distributed tracing support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch articles matching a query.
    LoadArticles {
        query: ArticleQuery,
        purpose: LoadPurpose,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Insert a new article (admin panel).
    CreateArticle {
        payload: ArticlePayload,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Change fields of an existing article (admin panel).
    UpdateArticle {
        id: ArticleId,
        patch: ArticlePatch,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Remove an article (admin panel).
    DeleteArticle {
        id: ArticleId,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Count one view of an opened article.
    RecordView {
        id: ArticleId,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Read the stored user session.
    LoadSession {
        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Change the display name and avatar of the stored session.
    UpdateProfile {
        name: String,
        avatar: Option<String>,

        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Forget the stored session (logout).
    ClearSession {
        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// List the user directory (admin panel).
    LoadUsers {
        /// Trace context for linking spans across threads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

/// Responses sent from the worker thread back to the event loop.
///
/// Each variant corresponds to the completion of a worker operation, either
/// successfully with result data or with an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Feed articles in store order; the app ranks them.
    ArticlesLoaded { articles: Vec<Article> },

    /// Articles related to `article_id`.
    RelatedLoaded {
        article_id: ArticleId,
        articles: Vec<Article>,
    },

    /// An article was created (`created`) or updated.
    ArticleSaved { id: ArticleId, created: bool },

    ArticleDeleted { id: ArticleId },

    ViewRecorded { id: ArticleId, views: u64 },

    /// The stored session, `None` when signed out.
    SessionLoaded { session: Option<UserSession> },

    ProfileUpdated { session: UserSession },

    SessionCleared,

    /// Every user in the directory, in store order.
    UsersLoaded { users: Vec<UserRecord> },

    /// An error occurred during the worker operation.
    Error {
        /// Operation that failed, as reported by [`WorkerMessage::operation`].
        operation: Operation,

        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_serialize_without_empty_trace_context() {
        let message = WorkerMessage::delete_article(ArticleId::Number(3));
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));

        let back: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
        assert_eq!(back.operation(), Operation::DeleteArticle);
    }

    #[test]
    fn article_loads_report_their_purpose() {
        let article = Article::new(ArticleId::Number(1), "t", "Composta");
        assert_eq!(WorkerMessage::load_feed().operation(), Operation::LoadArticles);
        assert_eq!(
            WorkerMessage::load_related(&article, 3).operation(),
            Operation::LoadRelated
        );
        assert_eq!(WorkerMessage::load_users().operation().as_str(), "load users");
    }

    #[test]
    fn error_responses_serialize_the_operation_tag() {
        let response = WorkerResponse::Error {
            operation: Operation::LoadRelated,
            message: "boom".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"load_related\""));
        assert_eq!(serde_json::from_str::<WorkerResponse>(&json).unwrap(), response);
    }

    #[test]
    fn related_load_carries_the_article_id() {
        let article = Article::new(ArticleId::Text("a1".to_string()), "t", "Composta");
        match WorkerMessage::load_related(&article, 3) {
            WorkerMessage::LoadArticles { query, purpose, .. } => {
                assert_eq!(query.category.as_deref(), Some("Composta"));
                assert_eq!(query.exclude_id, Some(article.id.clone()));
                assert_eq!(query.limit, Some(3));
                assert_eq!(purpose, LoadPurpose::Related { article_id: article.id });
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
