//! Tracing subscriber initialisation.
//!
//! Only the binary installs a subscriber; `scaffold_core` only emits events.
//! Diagnostics go to stderr so they never mix with the scaffolding output.
//!
//! | Flag(s)     | Filter level |
//! |-------------|--------------|
//! | (none)      | WARN         |
//! | `--verbose` | INFO         |
//!
//! `RUST_LOG` overrides both if set.

use std::io::IsTerminal as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise the global tracing subscriber. Call once, before any event fires.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = level(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("db_create_svelte={level},scaffold_core={level}"))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

fn level(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_default() {
        assert_eq!(level(false), "warn");
    }

    #[test]
    fn level_verbose() {
        assert_eq!(level(true), "info");
    }
}
