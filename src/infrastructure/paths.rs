//! Data directory resolution and `~` expansion.
//!
//! The data directory holds the article/session store and the trace file. It is
//! `$ECOCAMPUS_DATA_DIR` when set, otherwise `$HOME/.local/share/ecocampus`.
//! The environment-reading functions are thin wrappers over pure `*_from`
//! variants so the rules can be tested without touching process state.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ECOCAMPUS_DATA_DIR";

/// Returns the data directory for the store and trace files.
///
/// # Examples
///
/// ```
/// use ecocampus::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert!(!data_dir.as_os_str().is_empty());
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    let override_dir = std::env::var(DATA_DIR_ENV).ok();
    let home = std::env::var("HOME").ok();
    data_dir_from(override_dir.as_deref(), home.as_deref())
}

/// Resolves the data directory from an explicit override and home directory.
///
/// A blank override is ignored. Without a home directory the store lives in
/// `./.ecocampus`.
#[must_use]
pub fn data_dir_from(override_dir: Option<&str>, home: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_tilde_from(dir, home));
    }

    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join("ecocampus"),
        None => PathBuf::from(".ecocampus"),
    }
}

/// Expands a leading `~` to `$HOME`.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let home = std::env::var("HOME").ok();
    expand_tilde_from(path, home.as_deref())
}

/// Expands a leading `~` to `home`; other paths, `~user` forms, and any path
/// when `home` is unknown are returned unchanged.
///
/// # Examples
///
/// ```
/// use ecocampus::infrastructure::paths::expand_tilde_from;
///
/// assert_eq!(expand_tilde_from("~/data", Some("/home/ana")), "/home/ana/data");
/// assert_eq!(expand_tilde_from("~", Some("/home/ana")), "/home/ana");
/// assert_eq!(expand_tilde_from("/srv/data", Some("/home/ana")), "/srv/data");
/// ```
#[must_use]
pub fn expand_tilde_from(path: &str, home: Option<&str>) -> String {
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return path.to_string();
    };

    if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}
