use std::collections::BTreeMap;

use chrono::NaiveDate;
use tempfile::TempDir;

use journal_core::storage::{JournalStore, NewEntry, SqliteStore};
use journal_core::JournalError;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = SqliteStore::open(&dir.path().join("journal.db")).expect("open should succeed");
    (dir, store)
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).expect("valid date")
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_upsert_then_get_by_date() {
    let (_dir, store) = open_store();
    let new = NewEntry::new(date(4, 1), "Spring", "The first warm day.")
        .with_primary_mood("Happy")
        .with_secondary_moods(Some("Calm"), None::<String>)
        .with_category("Outdoors");

    let stored = store.upsert(&new).expect("upsert should succeed");
    let loaded = store
        .get_by_date(date(4, 1))
        .expect("get should succeed")
        .expect("entry should exist");

    assert_eq!(loaded.id, stored.id);
    assert_eq!(loaded.title, "Spring");
    assert_eq!(loaded.content, "The first warm day.");
    assert_eq!(loaded.moods(), vec!["Happy", "Calm"]);
    assert_eq!(loaded.category.as_deref(), Some("Outdoors"));
    assert_eq!(loaded.created_at, loaded.updated_at);
    assert!(store.get_by_date(date(4, 2)).expect("get should succeed").is_none());
}

#[test]
fn test_second_upsert_updates_same_entry() {
    let (_dir, store) = open_store();
    let first = store
        .upsert(&NewEntry::new(date(4, 3), "Draft", "v1"))
        .expect("upsert should succeed");
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = store
        .upsert(&NewEntry::new(date(4, 3), "Final", "v2"))
        .expect("upsert should succeed");

    assert_eq!(first.id, second.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.title, "Final");
    assert_eq!(store.count_entries().expect("count should succeed"), 1);
}

#[test]
fn test_second_upsert_keeps_existing_tags() {
    let (_dir, store) = open_store();
    let first = store
        .upsert(&NewEntry::new(date(4, 11), "Tagged", "v1"))
        .expect("upsert should succeed");
    store
        .update_tags(&first, &tags(&["x"]))
        .expect("tag update should succeed");

    let second = store
        .upsert(&NewEntry::new(date(4, 11), "Retitled", "v2"))
        .expect("upsert should succeed");

    assert_eq!(second.id, first.id);
    assert_eq!(second.tag_names(), vec!["x"]);
    let loaded = store
        .get_by_date(date(4, 11))
        .expect("get should succeed")
        .expect("entry should exist");
    assert_eq!(loaded.title, "Retitled");
    assert_eq!(loaded.tag_names(), vec!["x"]);
}

#[test]
fn test_upsert_rejects_invalid_fields() {
    let (_dir, store) = open_store();

    let blank_title = NewEntry::new(date(4, 4), "   ", "body");
    assert!(matches!(store.upsert(&blank_title), Err(JournalError::Validation(_))));

    let long_title = NewEntry::new(date(4, 4), "t".repeat(151), "body");
    assert!(matches!(store.upsert(&long_title), Err(JournalError::Validation(_))));

    let long_mood = NewEntry::new(date(4, 4), "ok", "body").with_primary_mood("m".repeat(31));
    assert!(matches!(store.upsert(&long_mood), Err(JournalError::Validation(_))));

    let long_category = NewEntry::new(date(4, 4), "ok", "body").with_category("c".repeat(51));
    assert!(matches!(store.upsert(&long_category), Err(JournalError::Validation(_))));

    assert_eq!(store.count_entries().expect("count should succeed"), 0);
}

#[test]
fn test_delete_by_date() {
    let (_dir, store) = open_store();
    let entry = store
        .upsert(&NewEntry::new(date(4, 5), "Gone soon", ""))
        .expect("upsert should succeed");
    store
        .update_tags(&entry, &tags(&["temp"]))
        .expect("tag update should succeed");

    assert!(store.delete_by_date(date(4, 5)).expect("delete should succeed"));
    assert!(store.get_by_date(date(4, 5)).expect("get should succeed").is_none());
    assert!(!store.delete_by_date(date(4, 5)).expect("second delete is a no-op"));

    // The tag row survives until pruned.
    assert_eq!(store.list_tags().expect("list should succeed").len(), 1);
    assert!(store.get_tag_usage().expect("usage should succeed").is_empty());
    assert_eq!(store.prune_unused_tags().expect("prune should succeed"), 1);
    store.check_integrity().expect("integrity should hold");
}

#[test]
fn test_update_tags_dedupes_and_reconciles() {
    let (_dir, store) = open_store();
    let entry = store
        .upsert(&NewEntry::new(date(4, 6), "Tagged", ""))
        .expect("upsert should succeed");

    store
        .update_tags(&entry, &tags(&["a", "a", " b "]))
        .expect("tag update should succeed");
    let loaded = store.get_by_date(date(4, 6)).unwrap().unwrap();
    assert_eq!(loaded.tag_names(), vec!["a", "b"]);

    store
        .update_tags(&loaded, &tags(&["b", "c"]))
        .expect("tag update should succeed");
    let loaded = store.get_by_date(date(4, 6)).unwrap().unwrap();
    assert_eq!(loaded.tag_names(), vec!["b", "c"]);

    store.update_tags(&loaded, &[]).expect("clearing tags should succeed");
    assert!(store.get_by_date(date(4, 6)).unwrap().unwrap().tags.is_empty());
}

#[test]
fn test_update_tags_shares_tag_rows_between_entries() {
    let (_dir, store) = open_store();
    let first = store.upsert(&NewEntry::new(date(4, 7), "One", "")).unwrap();
    let second = store.upsert(&NewEntry::new(date(4, 8), "Two", "")).unwrap();

    store.update_tags(&first, &tags(&["work"])).unwrap();
    store.update_tags(&second, &tags(&["work", "Work"])).unwrap();

    let names: Vec<_> = store
        .list_tags()
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["Work", "work"]);

    let usage = store.get_tag_usage().unwrap();
    assert_eq!(usage.get("work"), Some(&2));
    assert_eq!(usage.get("Work"), Some(&1));
}

#[test]
fn test_update_tags_on_missing_entry_is_noop() {
    let (_dir, store) = open_store();
    let entry = store.upsert(&NewEntry::new(date(4, 9), "Short-lived", "")).unwrap();
    store.delete_by_date(date(4, 9)).unwrap();

    store
        .update_tags(&entry, &tags(&["orphan"]))
        .expect("missing entry should be ignored");
    assert!(store.list_tags().unwrap().is_empty());
}

#[test]
fn test_update_tags_on_missing_entry_ignores_invalid_names() {
    let (_dir, store) = open_store();
    let entry = store.upsert(&NewEntry::new(date(4, 12), "Short-lived", "")).unwrap();
    store.delete_by_date(date(4, 12)).unwrap();

    store
        .update_tags(&entry, &["".to_string(), "y".repeat(51)])
        .expect("missing entry should be ignored before validation");
    assert!(store.list_tags().unwrap().is_empty());
}

#[test]
fn test_update_tags_rejects_oversized_name() {
    let (_dir, store) = open_store();
    let entry = store.upsert(&NewEntry::new(date(4, 10), "Tags", "")).unwrap();

    let result = store.update_tags(&entry, &["x".repeat(51)]);
    assert!(matches!(result, Err(JournalError::Validation(_))));
}

#[test]
fn test_get_recent_pages_newest_first() {
    let (_dir, store) = open_store();
    for day in 1..=5 {
        store
            .upsert(&NewEntry::new(date(5, day), format!("Day {}", day), ""))
            .unwrap();
    }

    let first: Vec<_> = store
        .get_recent(1, 2)
        .unwrap()
        .into_iter()
        .map(|entry| entry.entry_date)
        .collect();
    assert_eq!(first, vec![date(5, 5), date(5, 4)]);

    let last: Vec<_> = store
        .get_recent(3, 2)
        .unwrap()
        .into_iter()
        .map(|entry| entry.entry_date)
        .collect();
    assert_eq!(last, vec![date(5, 1)]);

    assert!(store.get_recent(4, 2).unwrap().is_empty());
}

#[test]
fn test_mood_distribution_counts_all_slots() {
    let (_dir, store) = open_store();
    store
        .upsert(&NewEntry::new(date(6, 1), "a", "").with_primary_mood("Happy"))
        .unwrap();
    store
        .upsert(
            &NewEntry::new(date(6, 2), "b", "")
                .with_primary_mood("Sad")
                .with_secondary_moods(Some("Happy"), Some("")),
        )
        .unwrap();

    let expected: BTreeMap<String, usize> =
        [("Happy".to_string(), 2), ("Sad".to_string(), 1)].into_iter().collect();
    assert_eq!(store.get_mood_distribution().unwrap(), expected);
}

#[test]
fn test_padded_mood_and_category_group_with_plain_spelling() {
    let (_dir, store) = open_store();
    store
        .upsert(
            &NewEntry::new(date(6, 5), "a", "")
                .with_primary_mood(" Happy")
                .with_category("Work "),
        )
        .unwrap();
    store
        .upsert(
            &NewEntry::new(date(6, 6), "b", "")
                .with_primary_mood("Calm")
                .with_secondary_moods(Some("Happy  "), None::<String>)
                .with_category("Work"),
        )
        .unwrap();

    let expected: BTreeMap<String, usize> =
        [("Calm".to_string(), 1), ("Happy".to_string(), 2)].into_iter().collect();
    assert_eq!(store.get_mood_distribution().unwrap(), expected);

    let first = store.get_by_date(date(6, 5)).unwrap().expect("entry should exist");
    assert_eq!(first.primary_mood, "Happy");
    assert_eq!(first.category.as_deref(), Some("Work"));
}

#[test]
fn test_word_count_trends_by_date() {
    let (_dir, store) = open_store();
    store
        .upsert(&NewEntry::new(date(6, 3), "a", "one two  three\nfour"))
        .unwrap();
    store.upsert(&NewEntry::new(date(6, 4), "b", "")).unwrap();

    let trends = store.get_word_count_trends().unwrap();
    assert_eq!(trends.get(&date(6, 3)), Some(&4));
    assert_eq!(trends.get(&date(6, 4)), Some(&0));
}

#[test]
fn test_analytics_on_empty_store() {
    let (_dir, store) = open_store();
    assert!(store.get_mood_distribution().unwrap().is_empty());
    assert!(store.get_tag_usage().unwrap().is_empty());
    assert!(store.get_word_count_trends().unwrap().is_empty());
    assert_eq!(store.count_entries().unwrap(), 0);
}
