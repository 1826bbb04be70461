//! PIN gate for the journal.
//!
//! The stored PIN hash lives in preference storage. Whether the current
//! user has unlocked the journal is tracked by a [`Session`] that the caller
//! owns and passes to every gate operation; a new `Session` is always
//! locked, so each process start (or simulated restart) begins locked.

pub mod pin;

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::preferences::PreferenceStore;

pub use pin::{hash_pin, validate_pin};

/// Preference key holding the PIN hash.
pub const PIN_KEY: &str = "journal_pin_hash";

/// Authentication state for one running application.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
}

impl Session {
    /// A locked session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn lock(&mut self) {
        self.authenticated = false;
    }

    fn unlock(&mut self) {
        self.authenticated = true;
    }
}

/// Compares PINs against the stored hash and flips sessions accordingly.
pub struct AuthGate<P: PreferenceStore> {
    preferences: Arc<P>,
}

impl<P: PreferenceStore> AuthGate<P> {
    pub fn new(preferences: Arc<P>) -> Self {
        Self { preferences }
    }

    /// Whether a PIN hash has been stored.
    pub fn is_pin_setup(&self) -> Result<bool> {
        self.preferences.contains(PIN_KEY)
    }

    /// Store the hash of `pin` and unlock `session`.
    ///
    /// Replaces any existing PIN.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidInput` for an empty PIN, or a storage
    /// error if the hash cannot be persisted.
    pub fn setup_pin(&self, session: &mut Session, pin: &str) -> Result<()> {
        validate_pin(pin)?;
        self.preferences.set(PIN_KEY, &hash_pin(pin))?;
        session.unlock();
        info!("PIN configured");
        Ok(())
    }

    /// Check `pin` against the stored hash.
    ///
    /// Returns `Ok(false)` when no PIN is set up or the PIN does not match;
    /// the session is left unchanged in both cases.
    pub fn verify_pin(&self, session: &mut Session, pin: &str) -> Result<bool> {
        let stored = match self.preferences.get(PIN_KEY)? {
            Some(stored) => stored,
            None => return Ok(false),
        };

        if stored == hash_pin(pin) {
            session.unlock();
            Ok(true)
        } else {
            warn!("PIN verification failed");
            Ok(false)
        }
    }

    /// Replace the PIN after verifying the old one.
    ///
    /// Returns whether `old_pin` was accepted; nothing changes otherwise.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::InvalidInput` for an empty `new_pin` before
    /// `old_pin` is checked, leaving the session and stored PIN untouched.
    pub fn change_pin(&self, session: &mut Session, old_pin: &str, new_pin: &str) -> Result<bool> {
        validate_pin(new_pin)?;
        if !self.verify_pin(session, old_pin)? {
            return Ok(false);
        }
        self.setup_pin(session, new_pin)?;
        info!("PIN changed");
        Ok(true)
    }

    pub fn lock(&self, session: &mut Session) {
        session.lock();
    }
}
