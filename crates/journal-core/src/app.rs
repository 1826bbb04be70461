//! Application context.
//!
//! Bundles the store, preferences, PIN gate, theme registry and exporter
//! opened from one [`JournalConfig`], together with the session of the
//! running process.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::auth::{AuthGate, Session};
use crate::config::JournalConfig;
use crate::error::Result;
use crate::export::{ExportOutcome, PdfExporter};
use crate::preferences::FilePreferences;
use crate::storage::SqliteStore;
use crate::theme::ThemeRegistry;

pub struct JournalApp {
    config: JournalConfig,
    store: Arc<SqliteStore>,
    preferences: Arc<FilePreferences>,
    auth: AuthGate<FilePreferences>,
    themes: ThemeRegistry<FilePreferences>,
    exporter: PdfExporter<SqliteStore>,
    session: Session,
}

impl JournalApp {
    /// Open the database and preference file named by `config` and load the
    /// persisted theme. The returned app starts locked.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the data directory or database cannot be
    /// opened, or a config error if the preference file is malformed.
    pub fn open(config: JournalConfig) -> Result<Self> {
        std::fs::create_dir_all(config.data_dir())?;

        let store = Arc::new(SqliteStore::open(&config.database_path())?);
        let preferences = Arc::new(FilePreferences::new(config.preferences_path()));
        let auth = AuthGate::new(Arc::clone(&preferences));
        let themes = ThemeRegistry::new(Arc::clone(&preferences));
        themes.initialize()?;
        let exporter = PdfExporter::new(Arc::clone(&store), config.export_dir());

        info!(data_dir = %config.data_dir().display(), "journal opened");

        Ok(Self {
            config,
            store,
            preferences,
            auth,
            themes,
            exporter,
            session: Session::new(),
        })
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<SqliteStore> {
        &self.store
    }

    pub fn preferences(&self) -> &Arc<FilePreferences> {
        &self.preferences
    }

    pub fn themes(&self) -> &ThemeRegistry<FilePreferences> {
        &self.themes
    }

    pub fn exporter(&self) -> &PdfExporter<SqliteStore> {
        &self.exporter
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_pin_setup(&self) -> Result<bool> {
        self.auth.is_pin_setup()
    }

    pub fn setup_pin(&mut self, pin: &str) -> Result<()> {
        self.auth.setup_pin(&mut self.session, pin)
    }

    /// Unlock with `pin`. Returns whether it matched.
    pub fn unlock(&mut self, pin: &str) -> Result<bool> {
        self.auth.verify_pin(&mut self.session, pin)
    }

    pub fn change_pin(&mut self, old_pin: &str, new_pin: &str) -> Result<bool> {
        self.auth.change_pin(&mut self.session, old_pin, new_pin)
    }

    pub fn lock(&mut self) {
        self.auth.lock(&mut self.session);
    }

    pub async fn export_to_pdf(&self, start: NaiveDate, end: NaiveDate) -> ExportOutcome {
        self.exporter.export_to_pdf(start, end).await
    }
}
