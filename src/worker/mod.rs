//! Background worker thread for store operations.
//!
//! This module implements the worker thread that owns the stores so the event
//! loop never blocks on disk I/O. Messages and responses travel over
//! `std::sync::mpsc` channels and carry tracing context across the boundary.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation, message processing and thread spawning

pub mod handler;
pub mod messages;

pub use handler::{spawn_worker, StoreWorker, WorkerHandle};
pub use messages::{LoadPurpose, Operation, TraceContext, WorkerMessage, WorkerResponse};
