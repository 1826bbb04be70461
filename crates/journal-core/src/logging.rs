//! Tracing subscriber setup for binaries and tests embedding the library.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{JournalError, Result};

/// Install a fmt subscriber filtered by `RUST_LOG`, or by `default_filter`
/// when the variable is unset.
///
/// # Errors
///
/// Returns `JournalError::Config` if `default_filter` does not parse or a
/// global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = build_filter(default_filter)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| JournalError::Config(format!("Failed to install logger: {}", e)))
}

fn build_filter(default_filter: &str) -> Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(value)),
        _ => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse(default_filter)
            .map_err(|e| {
                JournalError::Config(format!("Invalid log filter {:?}: {}", default_filter, e))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_directives() {
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        assert!(build_filter("journal_core=debug,info").is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
            return;
        }
        assert!(build_filter("journal_core=loud").is_err());
    }
}
