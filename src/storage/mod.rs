//! Storage layer for articles and the local user session.
//!
//! This module provides the store abstractions the worker thread drives: the
//! article store behind the feed and the admin panel, the session store
//! holding the signed-in user, and the user directory.
//!
//! # Modules
//!
//! - `backend`: `ArticleStore` / `SessionStore` / `UserStore` traits and the `Storage` set
//! - `json`: JSON file-based storage implementation
//! - `memory`: in-memory implementation for tests
//! - `models`: storage record types separate from domain models
//! - `query`: filter/order/limit evaluation

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod query;

pub use backend::{ArticleStore, SessionStore, Storage, UserStore, MISSING_ID_MESSAGE};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::{ArticlePatch, ArticlePayload, ArticleRecord};
pub use query::{ArticleQuery, OrderField};
