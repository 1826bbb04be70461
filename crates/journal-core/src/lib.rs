//! # Journal Core
//!
//! Core library for Journal - a PIN-gated personal diary with one entry per
//! calendar day.
//!
//! This crate provides the storage layer, analytics, authentication, theme
//! selection and PDF export, independent of any user interface.
//!
//! ## Architecture
//!
//! - **storage**: `JournalStore` trait and the SQLite implementation
//! - **analytics**: mood, tag and word-count aggregation
//! - **preferences**: key-value storage for the PIN hash and theme id
//! - **auth**: PIN gate with an explicit `Session`
//! - **theme**: fixed catalog of color themes
//! - **export**: PDF rendering of date ranges
//! - **app**: opens everything from a `JournalConfig`

pub mod analytics;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod fs;
pub mod logging;
pub mod preferences;
pub mod storage;
pub mod theme;

pub use app::JournalApp;
pub use auth::{AuthGate, Session};
pub use config::JournalConfig;
pub use error::{JournalError, Result};
pub use export::{ExportOutcome, PdfExporter};
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use storage::{JournalEntry, JournalStore, NewEntry, SqliteStore, Tag};
pub use theme::{ThemeInfo, ThemeMode, ThemeRegistry};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
