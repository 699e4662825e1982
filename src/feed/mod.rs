//! Feed presentation logic.
//!
//! - [`ranking`]: priority ordering (new, featured, date)
//! - [`category`]: category chips and filtering
//! - [`search`]: substring search and recent-search history

pub mod category;
pub mod ranking;
pub mod search;

pub use category::{categories, filter_by_category, ALL_CATEGORIES};
pub use ranking::{compare_by_priority, rank, rank_category, rank_featured, Rankable};
pub use search::{search_articles, RecentSearches};
