//! Storage abstraction for Journal.
//!
//! This module defines the `JournalStore` trait and the data model for
//! entries and tags.
//!
//! ## Layout
//!
//! - `journal_entries`: one row per calendar day (`entry_date` is UNIQUE)
//! - `tags`: tag names (`name` is UNIQUE)
//! - `journal_entry_tags`: join table, cascades when an entry is deleted

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::JournalStore;
pub use types::{JournalEntry, NewEntry, Tag, DEFAULT_MOOD};
