//! Observability utilities.
//!
//! An embedding host usually installs its own tracing subscriber before
//! handing the coordinator an event feed; in that case nothing here is
//! needed. [`init_tracing`] is for standalone use (tests, demos) and backs
//! off silently when a global subscriber is already registered.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Default directive set: quiet dependencies, info-level coordinator logs.
const DEFAULT_FILTER: &str = "warn,update_translator=info";

/// Initialize tracing subscriber once for the process.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]; `UPDATE_TRANSLATOR_LOG_FORMAT=json`
/// switches from compact text to JSON lines.
pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let json = std::env::var("UPDATE_TRANSLATOR_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let registry = tracing_subscriber::registry().with(filter);
        let result = if json {
            registry.with(fmt::layer().json()).try_init()
        } else {
            registry.with(fmt::layer().compact()).try_init()
        };

        // Err means the host already owns the global subscriber; theirs wins.
        drop(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn default_filter_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
