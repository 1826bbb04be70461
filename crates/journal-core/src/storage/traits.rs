//! Storage engine trait definition.
//!
//! The `JournalStore` trait is the repository interface the rest of the
//! crate talks to. The SQLite backend is the only implementation; the export
//! renderer and the application context are generic over it.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::types::{JournalEntry, NewEntry, Tag};
use crate::error::Result;

/// Repository interface for journal entries and tags.
///
/// All implementations must ensure:
/// - At most one entry exists per calendar date
/// - Every mutating call is independently atomic
/// - Tag names are unique
pub trait JournalStore: Send + Sync {
    /// Fetch the entry (with tags) for `date`.
    ///
    /// Returns `Ok(None)` when no entry exists for that day.
    fn get_by_date(&self, date: NaiveDate) -> Result<Option<JournalEntry>>;

    /// Entries ordered by date descending, paginated.
    ///
    /// `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidInput` if `page` or `page_size` is zero.
    fn get_recent(&self, page: u32, page_size: u32) -> Result<Vec<JournalEntry>>;

    /// Create the entry for `entry.entry_date`, or overwrite its fields if
    /// one already exists.
    ///
    /// An overwrite keeps the stored id, tags and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Validation` if a field is missing or too long.
    fn upsert(&self, entry: &NewEntry) -> Result<JournalEntry>;

    /// Delete the entry for `date` and its tag associations.
    ///
    /// Returns `Ok(false)` when there was nothing to delete.
    fn delete_by_date(&self, date: NaiveDate) -> Result<bool>;

    /// Replace the tags of `entry` with the distinct names in `tag_names`.
    ///
    /// Does nothing if `entry.id` no longer resolves to a stored entry,
    /// whatever `tag_names` holds.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Validation` if the entry exists and a tag name
    /// is empty or too long.
    fn update_tags(&self, entry: &JournalEntry, tag_names: &[String]) -> Result<()>;

    /// Occurrence count of every mood across primary and secondary slots.
    fn get_mood_distribution(&self) -> Result<BTreeMap<String, usize>>;

    /// Number of entries carrying each tag.
    fn get_tag_usage(&self) -> Result<BTreeMap<String, usize>>;

    /// Word count of each entry's content, keyed by entry date.
    fn get_word_count_trends(&self) -> Result<BTreeMap<NaiveDate, usize>>;

    // --- Maintenance operations ---

    /// Total number of stored entries.
    fn count_entries(&self) -> Result<usize>;

    /// All known tags, sorted by name.
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Delete tags no entry references. Returns how many were removed.
    fn prune_unused_tags(&self) -> Result<usize>;

    /// Verify database integrity and foreign key consistency.
    fn check_integrity(&self) -> Result<()>;
}
