//! Error types for the ecocampus core.
//!
//! This module defines the centralized error type [`EcoCampusError`] and a type alias
//! [`Result`] used throughout the crate. The ranking, date parsing and gesture code
//! never produce errors; everything here comes from stores, configuration, form
//! validation or the worker channel.

use thiserror::Error;

/// The main error type for ecocampus operations.
///
/// Most variants carry a human-readable message that ends up, unchanged, in a
/// `WorkerResponse::Error` and from there in a user-facing alert.
///
/// # Examples
///
/// ```
/// use ecocampus::EcoCampusError;
///
/// fn require_id(id: &str) -> Result<(), EcoCampusError> {
///     if id.is_empty() {
///         return Err(EcoCampusError::Validation("Article ID is required.".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(require_id("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum EcoCampusError {
    /// Storage operation failed.
    ///
    /// Raised by article and session stores when a record is missing or the
    /// backing file cannot be parsed or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input failed a form validation rule.
    ///
    /// The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    /// The current user lacks the role required for the operation.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for ecocampus operations.
pub type Result<T> = std::result::Result<T, EcoCampusError>;
