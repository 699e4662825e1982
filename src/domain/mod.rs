//! Domain layer for the ecocampus core.
//!
//! Core types and rules that do not depend on storage, threads or the runtime:
//! articles, their dates, user sessions, form validation and the error type.
//!
//! # Organization
//!
//! - [`article`]: Article model and identifiers
//! - [`date`]: Spanish/ISO article date parsing
//! - [`error`]: Error types and result aliases
//! - [`user`]: Signed-in user session, roles and the user directory
//! - [`validation`]: Form validation rules
//!
//! # Examples
//!
//! ```
//! use ecocampus::domain::{Article, ArticleId};
//!
//! let mut article = Article::new(ArticleId::Number(3), "Punto limpio", "Reciclaje");
//! article.date = "05 MAY 2025".to_string();
//! assert!(article.published_at() > ecocampus::domain::ArticleTimestamp::oldest());
//! ```

pub mod article;
pub mod date;
pub mod error;
pub mod user;
pub mod validation;

pub use article::{Article, ArticleId};
pub use date::{parse_article_date, ArticleTimestamp};
pub use error::{EcoCampusError, Result};
pub use user::{Role, UserRecord, UserSession};
