//! Opt-in tracing to a file
//!
//! Writing log lines to the terminal would fight the alternate screen, so
//! tracing stays disabled unless `NEWSSEARCH_LOG` names a file to append to.
//! `RUST_LOG` filters as usual once enabled.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber if `NEWSSEARCH_LOG` is set.
pub fn init() -> Result<()> {
    let Some(path) = std::env::var_os("NEWSSEARCH_LOG") else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.to_string_lossy()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newssearch_tui=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}
