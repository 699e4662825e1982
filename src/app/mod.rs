//! Application layer coordinating state, events, and actions.
//!
//! This module defines the core application logic layer, sitting between the
//! runtime (main.rs) and the domain/feed/storage/worker layers. It implements
//! the event-driven architecture behind the feed, search panel, article detail,
//! campus map, profile and admin panel.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Feed and search mode state machine types
//! - [`state`]: Central application state container
//!
//! # Example
//!
//! ```rust
//! use ecocampus::app::{handle_event, AppState, Event};
//!
//! let mut state = AppState::default();
//! let (render, actions) = handle_event(&mut state, &Event::OpenSearch)?;
//! assert!(render && actions.is_empty());
//! # Ok::<(), ecocampus::EcoCampusError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{FeedStatus, SearchMode};
pub use state::{AppState, EditorState, SearchState, UserDirectory};
