//! Color theme catalog and the persisted theme selection.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::Result;
use crate::preferences::PreferenceStore;

/// Preference key holding the selected theme id.
pub const THEME_KEY: &str = "app_theme";

/// Theme used when nothing valid has been persisted.
pub const DEFAULT_THEME_ID: &str = "light-default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// A named color palette. Colors are `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub mode: ThemeMode,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub background_color: &'static str,
}

impl ThemeInfo {
    const fn new(
        id: &'static str,
        name: &'static str,
        mode: ThemeMode,
        primary_color: &'static str,
        secondary_color: &'static str,
        background_color: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            mode,
            primary_color,
            secondary_color,
            background_color,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }
}

pub static THEMES: [ThemeInfo; 9] = [
    ThemeInfo::new("light-default", "Light Default", ThemeMode::Light, "#1b6ec2", "#2196f3", "#ffffff"),
    ThemeInfo::new("light-blue", "Light Blue", ThemeMode::Light, "#1976d2", "#42a5f5", "#f8fbfd"),
    ThemeInfo::new("light-purple", "Light Purple", ThemeMode::Light, "#7b1fa2", "#9c27b0", "#faf8fc"),
    ThemeInfo::new("dark-default", "Dark Default", ThemeMode::Dark, "#2196f3", "#42a5f5", "#1e1e1e"),
    ThemeInfo::new("dark-blue", "Dark Blue", ThemeMode::Dark, "#42a5f5", "#64b5f6", "#0d1b2a"),
    ThemeInfo::new("dark-purple", "Dark Purple", ThemeMode::Dark, "#ce93d8", "#e1bee7", "#1a0d2e"),
    ThemeInfo::new("dark-ocean", "Ocean", ThemeMode::Dark, "#00bcd4", "#4dd0e1", "#0a1628"),
    ThemeInfo::new("dark-forest", "Forest", ThemeMode::Dark, "#4caf50", "#81c784", "#0f1f15"),
    ThemeInfo::new("dark-sunset", "Sunset", ThemeMode::Dark, "#ff6f00", "#ffa040", "#2a1810"),
];

/// Look up a catalog theme by id.
pub fn find_theme(id: &str) -> Option<&'static ThemeInfo> {
    THEMES.iter().find(|theme| theme.id == id)
}

fn default_theme() -> &'static ThemeInfo {
    &THEMES[0]
}

/// The active theme, backed by preference storage.
///
/// Subscribers receive the new theme through a watch channel whenever
/// [`ThemeRegistry::set_theme`] applies a change.
pub struct ThemeRegistry<P: PreferenceStore> {
    preferences: Arc<P>,
    current: watch::Sender<&'static ThemeInfo>,
}

impl<P: PreferenceStore> ThemeRegistry<P> {
    /// A registry showing the default theme until [`initialize`](Self::initialize) runs.
    pub fn new(preferences: Arc<P>) -> Self {
        let (current, _) = watch::channel(default_theme());
        Self {
            preferences,
            current,
        }
    }

    /// Load the persisted theme, falling back to the default when the stored
    /// value is missing, empty or no longer in the catalog.
    pub fn initialize(&self) -> Result<&'static ThemeInfo> {
        let stored = self.preferences.get(THEME_KEY)?;
        let theme = stored
            .as_deref()
            .filter(|id| !id.is_empty())
            .and_then(find_theme)
            .unwrap_or_else(default_theme);
        debug!(theme = theme.id, stored = ?stored, "initialized theme");
        self.current.send_replace(theme);
        Ok(theme)
    }

    /// Select the theme with `id`.
    ///
    /// Returns `Ok(false)` without touching anything when `id` is not in the
    /// catalog.
    pub fn set_theme(&self, id: &str) -> Result<bool> {
        let theme = match find_theme(id) {
            Some(theme) => theme,
            None => return Ok(false),
        };
        self.preferences.set(THEME_KEY, theme.id)?;
        self.current.send_replace(theme);
        info!(theme = theme.id, "theme changed");
        Ok(true)
    }

    pub fn current(&self) -> &'static ThemeInfo {
        *self.current.borrow()
    }

    pub fn available(&self) -> &'static [ThemeInfo] {
        &THEMES
    }

    /// Receive the current theme and every later change.
    pub fn subscribe(&self) -> watch::Receiver<&'static ThemeInfo> {
        self.current.subscribe()
    }
}
