//! Core data types for the storage layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Mood assigned when the caller does not pick one.
pub const DEFAULT_MOOD: &str = "Neutral";

/// A stored journal entry. At most one exists per `entry_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Store-assigned identity
    pub id: i64,

    /// Calendar day this entry belongs to
    pub entry_date: NaiveDate,

    pub title: String,

    /// Markdown body
    pub content: String,

    pub primary_mood: String,
    pub secondary_mood1: Option<String>,
    pub secondary_mood2: Option<String>,
    pub category: Option<String>,

    /// Set once, on first insert
    pub created_at: DateTime<Utc>,

    /// Set on every insert or update
    pub updated_at: DateTime<Utc>,

    /// Associated tags, sorted by name
    pub tags: Vec<Tag>,
}

impl JournalEntry {
    /// Primary mood followed by any secondary moods that are set.
    pub fn moods(&self) -> Vec<&str> {
        std::iter::once(self.primary_mood.as_str())
            .chain(self.secondary_mood1.as_deref())
            .chain(self.secondary_mood2.as_deref())
            .filter(|mood| !mood.is_empty())
            .collect()
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

/// A free-form label shared between entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Draft used to create or overwrite the entry for a day.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub entry_date: NaiveDate,
    pub title: String,
    pub content: String,
    pub primary_mood: String,
    pub secondary_mood1: Option<String>,
    pub secondary_mood2: Option<String>,
    pub category: Option<String>,
}

impl NewEntry {
    pub fn new(entry_date: NaiveDate, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            entry_date,
            title: title.into(),
            content: content.into(),
            primary_mood: DEFAULT_MOOD.to_string(),
            secondary_mood1: None,
            secondary_mood2: None,
            category: None,
        }
    }

    pub fn with_primary_mood(mut self, mood: impl Into<String>) -> Self {
        self.primary_mood = mood.into();
        self
    }

    pub fn with_secondary_moods(
        mut self,
        first: Option<impl Into<String>>,
        second: Option<impl Into<String>>,
    ) -> Self {
        self.secondary_mood1 = first.map(Into::into);
        self.secondary_mood2 = second.map(Into::into);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl From<&JournalEntry> for NewEntry {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            entry_date: entry.entry_date,
            title: entry.title.clone(),
            content: entry.content.clone(),
            primary_mood: entry.primary_mood.clone(),
            secondary_mood1: entry.secondary_mood1.clone(),
            secondary_mood2: entry.secondary_mood2.clone(),
            category: entry.category.clone(),
        }
    }
}
