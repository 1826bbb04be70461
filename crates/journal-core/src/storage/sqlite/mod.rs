//! SQLite storage backend.
//!
//! The database lives in a single file. Every repository call opens its own
//! connection, does its work (inside a transaction when it writes) and drops
//! the connection on return.

mod row;
mod validation;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::analytics;
use crate::error::{JournalError, Result};
use crate::storage::traits::JournalStore;
use crate::storage::types::{JournalEntry, NewEntry, Tag};

use row::{format_date, parse_date, EntryRow, ENTRY_COLUMNS};
pub use validation::{
    normalize_tag_names, validate_new_entry, MAX_CATEGORY_CHARS, MAX_MOOD_CHARS, MAX_TAG_CHARS,
    MAX_TITLE_CHARS,
};

/// Schema version stored in `PRAGMA user_version`.
const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS journal_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        entry_date TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        primary_mood TEXT NOT NULL DEFAULT 'Neutral',
        secondary_mood1 TEXT,
        secondary_mood2 TEXT,
        category TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS journal_entry_tags (
        entry_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL,

        PRIMARY KEY(entry_id, tag_id),
        FOREIGN KEY(entry_id) REFERENCES journal_entries(id) ON DELETE CASCADE,
        FOREIGN KEY(tag_id) REFERENCES tags(id)
    );

    CREATE INDEX IF NOT EXISTS idx_journal_entry_tags_tag ON journal_entry_tags(tag_id);
"#;

/// SQLite-backed journal store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open the database at `path`, creating the file and schema on first use.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Storage` if the file cannot be opened or was
    /// written by a newer schema version.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path: path.to_path_buf(),
        };
        let conn = store.connect()?;
        Self::migrate(&conn)?;
        debug!(path = %path.display(), "opened journal database");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn migrate(conn: &Connection) -> Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(JournalError::Storage(format!(
                "Database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        if version < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
            info!(from = version, to = SCHEMA_VERSION, "migrated journal schema");
        }
        Ok(())
    }

    fn load_tags(conn: &Connection, entry_id: i64) -> Result<Vec<Tag>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name
            FROM journal_entry_tags et
            JOIN tags t ON t.id = et.tag_id
            WHERE et.entry_id = ?
            ORDER BY t.name
            "#,
        )?;
        let tags = stmt
            .query_map([entry_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn with_tags(conn: &Connection, row: EntryRow) -> Result<JournalEntry> {
        let mut entry: JournalEntry = row.try_into()?;
        entry.tags = Self::load_tags(conn, entry.id)?;
        Ok(entry)
    }

    fn fetch_entry_by_id(conn: &Connection, id: i64) -> Result<Option<JournalEntry>> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM journal_entries e WHERE e.id = ?", ENTRY_COLUMNS),
                [id],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(|row| Self::with_tags(conn, row)).transpose()
    }

    /// Insert the tag if it is new, then read back its id.
    ///
    /// The UNIQUE constraint on `tags.name` turns a concurrent insert of the
    /// same name into a no-op; the re-fetch picks up whichever row won.
    fn find_or_create_tag(conn: &Connection, name: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
            [name],
        )?;
        let id = conn.query_row("SELECT id FROM tags WHERE name = ?", [name], |row| {
            row.get(0)
        })?;
        Ok(id)
    }
}

impl JournalStore for SqliteStore {
    fn get_by_date(&self, date: NaiveDate) -> Result<Option<JournalEntry>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM journal_entries e WHERE e.entry_date = ?",
                    ENTRY_COLUMNS
                ),
                [format_date(date)],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(|row| Self::with_tags(&conn, row)).transpose()
    }

    fn get_recent(&self, page: u32, page_size: u32) -> Result<Vec<JournalEntry>> {
        if page == 0 {
            return Err(JournalError::InvalidInput(
                "Page numbers start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(JournalError::InvalidInput(
                "Page size must be positive".to_string(),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM journal_entries e ORDER BY e.entry_date DESC LIMIT ? OFFSET ?",
            ENTRY_COLUMNS
        ))?;
        let rows = stmt
            .query_map((i64::from(page_size), offset), EntryRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(Self::with_tags(&conn, row)?);
        }
        debug!(page, page_size, count = entries.len(), "loaded recent entries");
        Ok(entries)
    }

    fn upsert(&self, entry: &NewEntry) -> Result<JournalEntry> {
        let entry = validate_new_entry(entry)?;
        let entry_date = format_date(entry.entry_date);

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM journal_entries WHERE entry_date = ?",
                [&entry_date],
                |row| row.get(0),
            )
            .optional()?;

        let now = Utc::now().to_rfc3339();
        let id = match existing {
            Some(id) => {
                tx.execute(
                    r#"
                    UPDATE journal_entries
                    SET title = ?, content = ?, primary_mood = ?, secondary_mood1 = ?,
                        secondary_mood2 = ?, category = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                    (
                        &entry.title,
                        &entry.content,
                        &entry.primary_mood,
                        &entry.secondary_mood1,
                        &entry.secondary_mood2,
                        &entry.category,
                        &now,
                        id,
                    ),
                )?;
                id
            }
            None => {
                tx.execute(
                    r#"
                    INSERT INTO journal_entries (
                        entry_date,
                        title,
                        content,
                        primary_mood,
                        secondary_mood1,
                        secondary_mood2,
                        category,
                        created_at,
                        updated_at
                    )
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                    (
                        &entry_date,
                        &entry.title,
                        &entry.content,
                        &entry.primary_mood,
                        &entry.secondary_mood1,
                        &entry.secondary_mood2,
                        &entry.category,
                        &now,
                        &now,
                    ),
                )?;
                tx.last_insert_rowid()
            }
        };

        let stored = Self::fetch_entry_by_id(&tx, id)?.ok_or_else(|| {
            JournalError::Storage(format!("Entry {} vanished during upsert", id))
        })?;
        tx.commit()?;

        info!(
            id,
            date = %entry_date,
            created = existing.is_none(),
            "upserted journal entry"
        );
        Ok(stored)
    }

    fn delete_by_date(&self, date: NaiveDate) -> Result<bool> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM journal_entries WHERE entry_date = ?",
            [format_date(date)],
        )?;
        tx.commit()?;

        if removed > 0 {
            info!(date = %date, "deleted journal entry");
        } else {
            debug!(date = %date, "no journal entry to delete");
        }
        Ok(removed > 0)
    }

    fn update_tags(&self, entry: &JournalEntry, tag_names: &[String]) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM journal_entries WHERE id = ?",
                [entry.id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            debug!(id = entry.id, "skipping tag update for missing entry");
            return Ok(());
        }

        let desired = normalize_tag_names(tag_names)?;

        let current = Self::load_tags(&tx, entry.id)?;

        let mut removed = 0;
        for tag in current.iter().filter(|tag| !desired.contains(&tag.name)) {
            tx.execute(
                "DELETE FROM journal_entry_tags WHERE entry_id = ? AND tag_id = ?",
                (entry.id, tag.id),
            )?;
            removed += 1;
        }

        let mut added = 0;
        for name in &desired {
            if current.iter().any(|tag| &tag.name == name) {
                continue;
            }
            let tag_id = Self::find_or_create_tag(&tx, name)?;
            tx.execute(
                "INSERT OR IGNORE INTO journal_entry_tags (entry_id, tag_id) VALUES (?, ?)",
                (entry.id, tag_id),
            )?;
            added += 1;
        }

        tx.commit()?;
        debug!(id = entry.id, added, removed, "reconciled entry tags");
        Ok(())
    }

    fn get_mood_distribution(&self) -> Result<BTreeMap<String, usize>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT primary_mood, secondary_mood1, secondary_mood2 FROM journal_entries")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(analytics::mood_distribution(rows.iter().flat_map(
            |(primary, first, second)| {
                [Some(primary.as_str()), first.as_deref(), second.as_deref()]
            },
        )))
    }

    fn get_tag_usage(&self) -> Result<BTreeMap<String, usize>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.name
            FROM journal_entry_tags et
            JOIN tags t ON t.id = et.tag_id
            "#,
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(analytics::tag_usage(names.iter().map(String::as_str)))
    }

    fn get_word_count_trends(&self) -> Result<BTreeMap<NaiveDate, usize>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT entry_date, content FROM journal_entries")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut parsed = Vec::with_capacity(rows.len());
        for (date, content) in &rows {
            parsed.push((parse_date(date)?, content.as_str()));
        }
        Ok(analytics::word_count_trends(parsed))
    }

    fn count_entries(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM journal_entries", [], |row| {
            row.get(0)
        })?;
        usize::try_from(count)
            .map_err(|_| JournalError::Storage(format!("Invalid entry count: {}", count)))
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, name FROM tags ORDER BY name")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn prune_unused_tags(&self) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM tags WHERE id NOT IN (SELECT tag_id FROM journal_entry_tags)",
            [],
        )?;
        tx.commit()?;
        info!(removed, "pruned unused tags");
        Ok(removed)
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.connect()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(JournalError::Storage(format!(
                "Integrity check failed: {}",
                status
            )));
        }

        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_some() {
            return Err(JournalError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        let duplicate_dates: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (SELECT entry_date FROM journal_entries GROUP BY entry_date HAVING COUNT(*) > 1)",
            [],
            |row| row.get(0),
        )?;
        if duplicate_dates > 0 {
            return Err(JournalError::Storage(
                "Multiple entries share a date".to_string(),
            ));
        }

        Ok(())
    }
}
