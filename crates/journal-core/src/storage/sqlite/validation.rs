//! Field validation applied before anything is written.
//!
//! Limits count characters, not bytes. Over-long values are rejected, never
//! truncated.

use crate::error::{JournalError, Result};
use crate::storage::types::NewEntry;

pub const MAX_TITLE_CHARS: usize = 150;
pub const MAX_MOOD_CHARS: usize = 30;
pub const MAX_CATEGORY_CHARS: usize = 50;
pub const MAX_TAG_CHARS: usize = 50;

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(JournalError::Validation(format!(
            "{} too long (max {} characters, got {})",
            field, max, len
        )));
    }
    Ok(())
}

fn check_required(field: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(JournalError::Validation(format!("{} is required", field)));
    }
    check_length(field, value, max)
}

/// Surrounding whitespace is dropped before the length check and on write.
fn normalize_required(field: &str, value: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    check_required(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Blank optional values are stored as absent; others are stored trimmed.
fn normalize_optional(field: &str, value: &Option<String>, max: usize) -> Result<Option<String>> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => {
            check_length(field, v, max)?;
            Ok(Some(v.to_string()))
        }
        _ => Ok(None),
    }
}

/// Validate a draft and return the copy that will be written.
///
/// Moods and category are trimmed so they group with their untrimmed
/// spellings. Title and content are kept as typed.
pub fn validate_new_entry(entry: &NewEntry) -> Result<NewEntry> {
    check_required("Title", &entry.title, MAX_TITLE_CHARS)?;

    Ok(NewEntry {
        entry_date: entry.entry_date,
        title: entry.title.clone(),
        content: entry.content.clone(),
        primary_mood: normalize_required("Primary mood", &entry.primary_mood, MAX_MOOD_CHARS)?,
        secondary_mood1: normalize_optional("Secondary mood", &entry.secondary_mood1, MAX_MOOD_CHARS)?,
        secondary_mood2: normalize_optional("Secondary mood", &entry.secondary_mood2, MAX_MOOD_CHARS)?,
        category: normalize_optional("Category", &entry.category, MAX_CATEGORY_CHARS)?,
    })
}

/// Trim, validate and de-duplicate tag names, keeping first-seen order.
///
/// Matching stays case-sensitive: "Work" and "work" are different tags.
pub fn normalize_tag_names(names: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(JournalError::Validation(
                "Empty tag is not allowed".to_string(),
            ));
        }
        check_length("Tag", trimmed, MAX_TAG_CHARS)?;
        if !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_string());
        }
    }
    Ok(normalized)
}
