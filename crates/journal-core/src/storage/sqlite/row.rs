//! Entry row type for database queries.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{JournalError, Result};
use crate::storage::types::JournalEntry;

/// Column list matching `EntryRow::from_row`.
pub const ENTRY_COLUMNS: &str = "e.id, e.entry_date, e.title, e.content, e.primary_mood, \
     e.secondary_mood1, e.secondary_mood2, e.category, e.created_at, e.updated_at";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw row data from the journal_entries table, before parsing into domain types.
#[derive(Debug)]
pub struct EntryRow {
    pub id: i64,
    pub entry_date: String,
    pub title: String,
    pub content: String,
    pub primary_mood: String,
    pub secondary_mood1: Option<String>,
    pub secondary_mood2: Option<String>,
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl EntryRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            entry_date: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            primary_mood: row.get(4)?,
            secondary_mood1: row.get(5)?,
            secondary_mood2: row.get(6)?,
            category: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| JournalError::Storage(format!("Invalid entry date {:?}: {}", value, e)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| JournalError::Storage(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

impl TryFrom<EntryRow> for JournalEntry {
    type Error = JournalError;

    /// Tags are loaded separately and start out empty.
    fn try_from(row: EntryRow) -> Result<Self> {
        Ok(JournalEntry {
            id: row.id,
            entry_date: parse_date(&row.entry_date)?,
            title: row.title,
            content: row.content,
            primary_mood: row.primary_mood,
            secondary_mood1: row.secondary_mood1,
            secondary_mood2: row.secondary_mood2,
            category: row.category,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            tags: Vec::new(),
        })
    }
}
