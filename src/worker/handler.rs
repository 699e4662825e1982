//! Worker thread implementation for store operations.
//!
//! The worker owns the [`Storage`] and executes one [`WorkerMessage`] at a time,
//! strictly in arrival order, replying with one [`WorkerResponse`] each. Store
//! failures become `WorkerResponse::Error`; nothing is retried.

use crate::domain::error::{EcoCampusError, Result};
use crate::domain::{Article, ArticleId};
use crate::storage::backend::Storage;
use crate::storage::models::{ArticlePatch, ArticlePayload, ArticleRecord};
use crate::storage::query::ArticleQuery;
use crate::storage::JsonStorage;
use crate::worker::messages::{LoadPurpose, Operation};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::Config;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

/// Store-owning side of the worker protocol.
pub struct StoreWorker {
    storage: Box<dyn Storage>,
}

impl StoreWorker {
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Creates a worker over the JSON store configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn open(config: &Config) -> Result<Self> {
        let storage: Box<dyn Storage> = Box::new(JsonStorage::new(config.storage_path())?);
        Ok(Self::new(storage))
    }

    /// Helper for handling storage operation results with consistent logging.
    ///
    /// This function standardizes error handling and success logging across all
    /// storage operations in the worker.
    fn handle_db_result<T, F>(operation: Operation, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = %operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = %operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    operation,
                    message: e.to_string(),
                }
            }
        }
    }

    fn to_articles(records: Vec<ArticleRecord>) -> Vec<Article> {
        records.into_iter().map(ArticleRecord::into_article).collect()
    }

    fn handle_load_articles(
        &mut self,
        operation: Operation,
        query: &ArticleQuery,
        purpose: LoadPurpose,
    ) -> WorkerResponse {
        Self::handle_db_result(
            operation,
            self.storage.query_articles(query),
            |records| {
                tracing::debug!(article_count = records.len(), "articles loaded from storage");
                let articles = Self::to_articles(records);
                match purpose {
                    LoadPurpose::Feed => WorkerResponse::ArticlesLoaded { articles },
                    LoadPurpose::Related { article_id } => WorkerResponse::RelatedLoaded {
                        article_id,
                        articles,
                    },
                }
            },
        )
    }

    fn handle_create_article(&mut self, payload: &ArticlePayload) -> WorkerResponse {
        Self::handle_db_result(
            Operation::CreateArticle,
            self.storage.create_article(payload),
            |id| WorkerResponse::ArticleSaved { id, created: true },
        )
    }

    fn handle_update_article(&mut self, id: ArticleId, patch: &ArticlePatch) -> WorkerResponse {
        Self::handle_db_result(
            Operation::UpdateArticle,
            self.storage.update_article(&id, patch),
            |()| WorkerResponse::ArticleSaved { id, created: false },
        )
    }

    fn handle_delete_article(&mut self, id: ArticleId) -> WorkerResponse {
        Self::handle_db_result(
            Operation::DeleteArticle,
            self.storage.delete_article(&id),
            |()| WorkerResponse::ArticleDeleted { id },
        )
    }

    fn handle_record_view(&mut self, id: ArticleId) -> WorkerResponse {
        Self::handle_db_result(
            Operation::RecordView,
            self.storage.increment_views(&id),
            |views| WorkerResponse::ViewRecorded { id, views },
        )
    }

    fn handle_load_session(&mut self) -> WorkerResponse {
        Self::handle_db_result(Operation::LoadSession, self.storage.load_session(), |session| {
            WorkerResponse::SessionLoaded { session }
        })
    }

    fn handle_update_profile(&mut self, name: &str, avatar: Option<&str>) -> WorkerResponse {
        Self::handle_db_result(
            Operation::UpdateProfile,
            self.storage.update_profile(name, avatar),
            |session| WorkerResponse::ProfileUpdated { session },
        )
    }

    fn handle_clear_session(&mut self) -> WorkerResponse {
        Self::handle_db_result(Operation::ClearSession, self.storage.clear_session(), |()| {
            WorkerResponse::SessionCleared
        })
    }

    fn handle_load_users(&mut self) -> WorkerResponse {
        Self::handle_db_result(Operation::LoadUsers, self.storage.list_users(), |users| {
            tracing::debug!(user_count = users.len(), "users loaded from storage");
            WorkerResponse::UsersLoaded { users }
        })
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// This function reconstructs the OpenTelemetry context from the serialized
    /// trace information in the message, allowing spans created in the worker
    /// thread to be linked to their parent spans on the event loop.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the appropriate response.
    ///
    /// This is the main message handling entry point, dispatching to specific
    /// handlers based on the message variant. Automatically attaches trace context
    /// and creates a tracing span for the operation.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let operation = message.operation();
        let span = tracing::debug_span!("worker_handle_message", operation = operation.as_str());
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadArticles { query, purpose, .. } => {
                self.handle_load_articles(operation, &query, purpose)
            }
            WorkerMessage::CreateArticle { payload, .. } => self.handle_create_article(&payload),
            WorkerMessage::UpdateArticle { id, patch, .. } => self.handle_update_article(id, &patch),
            WorkerMessage::DeleteArticle { id, .. } => self.handle_delete_article(id),
            WorkerMessage::RecordView { id, .. } => self.handle_record_view(id),
            WorkerMessage::LoadSession { .. } => self.handle_load_session(),
            WorkerMessage::UpdateProfile { name, avatar, .. } => {
                self.handle_update_profile(&name, avatar.as_deref())
            }
            WorkerMessage::ClearSession { .. } => self.handle_clear_session(),
            WorkerMessage::LoadUsers { .. } => self.handle_load_users(),
        }
    }
}

/// Event-loop side of a running worker thread.
pub struct WorkerHandle {
    sender: Option<Sender<WorkerMessage>>,
    responses: Receiver<WorkerResponse>,
    thread: Option<JoinHandle<()>>,
}

/// Runs `worker` on its own thread.
///
/// Messages are processed one at a time in the order they were posted. The
/// thread exits once the handle is shut down or dropped.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_worker(mut worker: StoreWorker) -> Result<WorkerHandle> {
    let (message_tx, message_rx) = mpsc::channel::<WorkerMessage>();
    let (response_tx, response_rx) = mpsc::channel::<WorkerResponse>();

    let thread = std::thread::Builder::new()
        .name("ecocampus-store".to_string())
        .spawn(move || {
            tracing::debug!("store worker started");
            for message in message_rx {
                let response = worker.handle_message(message);
                if response_tx.send(response).is_err() {
                    tracing::debug!("response receiver dropped, stopping worker");
                    break;
                }
            }
            tracing::debug!("store worker stopped");
        })?;

    Ok(WorkerHandle {
        sender: Some(message_tx),
        responses: response_rx,
        thread: Some(thread),
    })
}

impl WorkerHandle {
    /// Queues a message for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`EcoCampusError::Worker`] if the worker thread has stopped.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| EcoCampusError::Worker("worker already shut down".to_string()))?;
        tracing::trace!(operation = message.operation().as_str(), "posting message to worker");
        sender
            .send(message)
            .map_err(|_| EcoCampusError::Worker("worker thread is not running".to_string()))
    }

    /// Blocks until the next response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`EcoCampusError::Worker`] if the worker thread has stopped.
    pub fn recv(&self) -> Result<WorkerResponse> {
        self.responses
            .recv()
            .map_err(|_| EcoCampusError::Worker("worker thread is not running".to_string()))
    }

    /// Stops accepting messages and waits for queued ones to finish.
    ///
    /// # Errors
    ///
    /// Returns [`EcoCampusError::Worker`] if the worker thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        self.sender.take();
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| EcoCampusError::Worker("worker thread panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!(error = %e, "failed to stop worker");
        }
    }
}
