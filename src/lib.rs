//! EcoCampus: headless core of a campus recycling and food-sustainability news client.
//!
//! The crate provides:
//! - Article feed ranking (new first, then featured, then newest date)
//! - Parsing of Spanish display dates such as `"23 ABR 2025"` or ISO 8601
//! - Category chips, search and recent searches over the loaded feed
//! - Pinch-zoom state for the campus map, with snap-back animation
//! - Local article and session stores (in-memory and JSON file) behind a
//!   background worker thread

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI runtime (main.rs)                              │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - Derived feed / search / detail state             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Feed / Gesture│   │ Storage Layer │   │ Worker Layer  │
//! │ (feed/,       │   │ (storage/)    │   │ (worker/)     │
//! │  gesture/)    │   │ - JSON I/O    │   │ - Store thread│
//! │ - Ranking     │   │ - Queries     │   │ - Messages    │
//! │ - Pinch zoom  │   │ - Sessions    │   │ - Trace ctx   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory (infrastructure/)                 │
//! │  - Errors, dates, articles, users (domain/)         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing + stderr logs                            │
//! │  - OpenTelemetry spans to a JSON-lines file         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Core domain types (articles, dates, sessions, validation, errors)
//! - [`feed`]: Ranking, categories and search
//! - [`gesture`]: Pinch-zoom controller for the campus map
//! - [`infrastructure`]: Data directory resolution
//! - [`storage`]: Article and session stores
//! - [`worker`]: Background store thread and its message protocol
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! [`Config`] is read from a TOML file:
//!
//! ```toml
//! data_dir = "~/.local/share/ecocampus"
//! trace_level = "debug"
//! institutional_domain = "alumnos.udg.mx"
//! recent_search_limit = 5
//! related_limit = 3
//! storage_file = "ecocampus.json"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use ecocampus::domain::{Article, ArticleId};
//! use ecocampus::feed::rank;
//!
//! let mut older = Article::new(ArticleId::Number(1), "Composta", "Composta");
//! older.date = "01 ENE 2024".to_string();
//! let mut fresh = Article::new(ArticleId::Number(2), "Pilas", "Reciclaje");
//! fresh.is_new = true;
//!
//! let ranked = rank(&[older, fresh]);
//! assert_eq!(ranked[0].id, ArticleId::Number(2));
//! ```

pub mod app;
pub mod domain;
pub mod feed;
pub mod gesture;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::error::{EcoCampusError, Result};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use domain::validation::DEFAULT_INSTITUTIONAL_DOMAIN;
use feed::search::DEFAULT_RECENT_LIMIT;

/// Related articles requested for the detail view.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Store file name inside the data directory.
pub const DEFAULT_STORAGE_FILE: &str = "ecocampus.json";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the store and trace files.
    ///
    /// Default: see [`infrastructure::get_data_dir`].
    pub data_dir: PathBuf,

    /// Tracing filter used when `RUST_LOG` is not set.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any env-filter
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Email domain accepted at registration. Default: `"alumnos.udg.mx"`
    pub institutional_domain: String,

    /// Recent searches remembered by the search panel. Default: 5
    pub recent_search_limit: usize,

    /// Related articles shown under an article, `0` for all of them. Default: 3
    pub related_limit: usize,

    /// Store file name, relative to `data_dir`. Default: `"ecocampus.json"`
    pub storage_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::get_data_dir(),
            trace_level: None,
            institutional_domain: DEFAULT_INSTITUTIONAL_DOMAIN.to_string(),
            recent_search_limit: DEFAULT_RECENT_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
            storage_file: DEFAULT_STORAGE_FILE.to_string(),
        }
    }
}

impl Config {
    /// Full path of the JSON store.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage_file)
    }

    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - `data_dir`: `~` is expanded; blank keeps the default
    /// - `recent_search_limit`, `related_limit`: non-negative integers, falling
    ///   back to the defaults when missing or invalid
    /// - `trace_level`, `institutional_domain`, `storage_file`: trimmed, blank
    ///   keeps the default
    /// - unknown keys are ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use ecocampus::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("related_limit".to_string(), "4".to_string());
    /// map.insert("recent_search_limit".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.related_limit, 4);
    /// assert_eq!(config.recent_search_limit, 5);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        let number = |key: &str, default: usize| {
            map.get(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };

        Self {
            data_dir: text("data_dir")
                .map(|dir| PathBuf::from(infrastructure::expand_tilde(&dir)))
                .unwrap_or(defaults.data_dir),
            trace_level: text("trace_level"),
            institutional_domain: text("institutional_domain")
                .unwrap_or(defaults.institutional_domain),
            recent_search_limit: number("recent_search_limit", defaults.recent_search_limit),
            related_limit: number("related_limit", defaults.related_limit),
            storage_file: text("storage_file").unwrap_or(defaults.storage_file),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// Top-level keys follow the same rules as [`Config::from_map`]; numbers
    /// may be written as TOML integers or strings.
    ///
    /// # Errors
    ///
    /// Returns [`EcoCampusError::Io`] if the file cannot be read and
    /// [`EcoCampusError::Config`] if it is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let _span = tracing::debug_span!("load_config", path = ?path).entered();

        let raw = std::fs::read_to_string(path)?;
        let table: toml::Table = toml::from_str(&raw)
            .map_err(|e| EcoCampusError::Config(format!("{}: {e}", path.display())))?;

        let map = table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        let config = Self::from_map(&map);
        tracing::debug!(config = ?config, "configuration loaded");
        Ok(config)
    }
}

/// Creates the initial application state for `config`.
///
/// # Example
///
/// ```rust
/// use ecocampus::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.articles.is_empty());
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        data_dir = ?config.data_dir,
        related_limit = config.related_limit,
        recent_search_limit = config.recent_search_limit,
        "initializing ecocampus"
    );
    AppState::new(config)
}
