//! Client-side aggregation behind the analytics queries.
//!
//! The store loads rows; counting happens here so it can be tested without
//! a database.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Count each non-empty mood. Absent and empty slots are skipped.
pub fn mood_distribution<'a, I>(moods: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts = BTreeMap::new();
    for mood in moods.into_iter().flatten() {
        if mood.is_empty() {
            continue;
        }
        *counts.entry(mood.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Count how many times each tag name occurs.
pub fn tag_usage<'a, I>(tag_names: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for name in tag_names {
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Number of whitespace-delimited tokens; 0 for blank text.
pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Word count per date.
pub fn word_count_trends<'a, I>(entries: I) -> BTreeMap<NaiveDate, usize>
where
    I: IntoIterator<Item = (NaiveDate, &'a str)>,
{
    entries
        .into_iter()
        .map(|(date, content)| (date, word_count(content)))
        .collect()
}
