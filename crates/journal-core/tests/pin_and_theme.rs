use std::sync::Arc;

use journal_core::auth::{hash_pin, PIN_KEY};
use journal_core::theme::{DEFAULT_THEME_ID, THEME_KEY};
use journal_core::{AuthGate, FilePreferences, PreferenceStore, Session, ThemeRegistry};

fn file_preferences(dir: &tempfile::TempDir) -> Arc<FilePreferences> {
    Arc::new(FilePreferences::new(dir.path().join("preferences.toml")))
}

#[test]
fn test_pin_survives_restart_but_session_does_not() {
    let dir = tempfile::tempdir().expect("tempdir should be created");

    {
        let gate = AuthGate::new(file_preferences(&dir));
        let mut session = Session::new();
        assert!(!gate.verify_pin(&mut session, "2468").expect("verify should succeed"));
        gate.setup_pin(&mut session, "2468").expect("setup should succeed");
        assert!(session.is_authenticated());
    }

    let prefs = file_preferences(&dir);
    assert_eq!(
        prefs.get(PIN_KEY).expect("read should succeed"),
        Some(hash_pin("2468"))
    );

    let gate = AuthGate::new(prefs);
    let mut session = Session::new();
    assert!(!session.is_authenticated());
    assert!(gate.is_pin_setup().expect("check should succeed"));
    assert!(!gate.verify_pin(&mut session, "1357").expect("verify should succeed"));
    assert!(!session.is_authenticated());
    assert!(gate.verify_pin(&mut session, "2468").expect("verify should succeed"));
    assert!(session.is_authenticated());
}

#[test]
fn test_pin_file_never_holds_plain_pin() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let gate = AuthGate::new(file_preferences(&dir));
    gate.setup_pin(&mut Session::new(), "98765").expect("setup should succeed");

    let raw = std::fs::read_to_string(dir.path().join("preferences.toml"))
        .expect("preferences file should exist");
    assert!(!raw.contains("98765"));
    assert!(raw.contains(PIN_KEY));
}

#[test]
fn test_theme_selection_persists_across_registries() {
    let dir = tempfile::tempdir().expect("tempdir should be created");

    let registry = ThemeRegistry::new(file_preferences(&dir));
    assert_eq!(registry.initialize().expect("init should succeed").id, DEFAULT_THEME_ID);
    assert!(registry.set_theme("light-purple").expect("set should succeed"));
    assert!(!registry.set_theme("not-a-theme").expect("set should succeed"));

    let reopened = ThemeRegistry::new(file_preferences(&dir));
    assert_eq!(reopened.initialize().expect("init should succeed").id, "light-purple");
    assert_eq!(reopened.available().len(), 9);
}

#[test]
fn test_unknown_persisted_theme_falls_back() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let prefs = file_preferences(&dir);
    prefs.set(THEME_KEY, "retired-theme").expect("set should succeed");

    let registry = ThemeRegistry::new(prefs);
    assert_eq!(registry.initialize().expect("init should succeed").id, DEFAULT_THEME_ID);
}

#[tokio::test]
async fn test_theme_subscribers_see_changes() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let registry = ThemeRegistry::new(file_preferences(&dir));
    let mut receiver = registry.subscribe();

    let waiter = tokio::spawn(async move {
        receiver.changed().await.expect("sender should stay alive");
        let id = receiver.borrow().id;
        id
    });

    assert!(registry.set_theme("dark-default").expect("set should succeed"));
    let seen = waiter.await.expect("waiter should finish");
    assert_eq!(seen, "dark-default");
}
