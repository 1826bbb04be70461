//! PDF export of a date range.
//!
//! Entries are gathered one calendar day at a time, laid out and rendered on
//! a blocking worker, then written atomically into the output directory.
//! Export never returns an error: every failure is reported as an
//! [`ExportOutcome::Failure`] carrying a user-facing message.
//!
//! Text is set in the embedded DejaVu Sans family. An entry containing a
//! character the font has no glyph for fails the export rather than being
//! written with that character missing.

pub mod fonts;
pub mod layout;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::error::{JournalError, Result};
use crate::fs::write_atomic;
use crate::storage::{JournalEntry, JournalStore};

use fonts::FontMetrics;

pub const NO_ENTRIES_MESSAGE: &str = "No entries found in the selected date range.";
pub const INVALID_RANGE_MESSAGE: &str = "Start date must not be after end date.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Success { path: PathBuf, entry_count: usize },
    Failure { message: String },
}

impl ExportOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Path of the written file, if the export succeeded.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Success { path, .. } => Some(path),
            Self::Failure { .. } => None,
        }
    }
}

/// `Journal_<start>-<end>_<generated>.pdf`
pub fn export_file_name(start: NaiveDate, end: NaiveDate, generated_at: NaiveDateTime) -> String {
    format!(
        "Journal_{}-{}_{}.pdf",
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub struct PdfExporter<S: JournalStore> {
    store: Arc<S>,
    output_dir: PathBuf,
}

impl<S: JournalStore + 'static> PdfExporter<S> {
    pub fn new(store: Arc<S>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export every entry dated within `start..=end`.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn export_to_pdf(&self, start: NaiveDate, end: NaiveDate) -> ExportOutcome {
        if start > end {
            warn!(%start, %end, "export range is inverted");
            return ExportOutcome::failure(INVALID_RANGE_MESSAGE);
        }

        let store = Arc::clone(&self.store);
        let output_dir = self.output_dir.clone();
        let job = tokio::task::spawn_blocking(move || {
            run_export(store.as_ref(), &output_dir, start, end)
        });

        let result = match job.await {
            Ok(result) => result,
            Err(e) => Err(JournalError::Export(format!("export worker failed: {}", e))),
        };

        match result {
            Ok(Some((path, entry_count))) => {
                info!(path = %path.display(), entry_count, "exported journal to PDF");
                ExportOutcome::Success { path, entry_count }
            }
            Ok(None) => {
                info!(%start, %end, "no entries to export");
                ExportOutcome::failure(NO_ENTRIES_MESSAGE)
            }
            Err(e) => {
                warn!(error = %e, "PDF export failed");
                ExportOutcome::failure(format!("Error exporting PDF: {}", e))
            }
        }
    }
}

fn collect_entries<S: JournalStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<JournalEntry>> {
    let mut entries = Vec::new();
    for date in start.iter_days().take_while(|date| *date <= end) {
        if let Some(entry) = store.get_by_date(date)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Fail on the first entry holding text the embedded font cannot draw.
fn ensure_drawable(metrics: &FontMetrics, entries: &[JournalEntry]) -> Result<()> {
    for entry in entries {
        let mut text = vec![entry.title.as_str(), entry.content.as_str()];
        text.extend(entry.moods());
        text.extend(entry.category.as_deref());
        text.extend(entry.tag_names());

        let missing: String = metrics.unsupported_chars(&text.join(" ")).into_iter().collect();
        if !missing.is_empty() {
            return Err(JournalError::Export(format!(
                "Entry for {} contains characters the PDF font cannot display: {}",
                entry.entry_date, missing
            )));
        }
    }
    Ok(())
}

fn run_export<S: JournalStore + ?Sized>(
    store: &S,
    output_dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<(PathBuf, usize)>> {
    let entries = collect_entries(store, start, end)?;
    if entries.is_empty() {
        return Ok(None);
    }

    let metrics = FontMetrics::load()?;
    ensure_drawable(&metrics, &entries)?;

    let generated_at = Local::now();
    let pages = layout::layout_document(&entries, start, end, generated_at, &metrics);
    let title = format!(
        "Journal {} - {}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    );
    let bytes = render::render(&title, &pages)?;

    let path = output_dir.join(export_file_name(start, end, generated_at.naive_local()));
    write_atomic(&path, &bytes)?;
    Ok(Some((path, entries.len())))
}
