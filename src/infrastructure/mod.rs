//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the client keeps its files on the host.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, DATA_DIR_ENV};
