//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cm_core::{Config, RawConfig};
use cm_migrate::{MigrateError, Migrator};
use serde::Serialize;

use crate::cli::GlobalArgs;

/// Resolve the run configuration from the config file and flags.
///
/// The config file is only read when `--config` is given.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let file_layer = match &global.config {
        Some(path) => RawConfig::load(path).context("Failed to load config file")?,
        None => RawConfig::default(),
    };
    let raw = file_layer.overlay(global.to_raw());
    Config::resolve(raw).context("Invalid configuration")
}

/// How a command needs to reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    ReadWrite,
    ReadOnly,
}

/// Connect to the configured database and hand the session to a [`Migrator`].
pub(crate) async fn open_migrator(config: Config, access: Access) -> Result<Migrator> {
    log::debug!(
        "Connecting to {} backend for keyspace {} ({access:?})",
        config.database.backend,
        config.keyspace
    );
    let session = match access {
        Access::ReadWrite => cm_db::connect(&config.database).await,
        Access::ReadOnly => cm_db::connect_read_only(&config.database).await,
    }
    .map_err(MigrateError::Connection)
    .context("Unable to open database session")?;
    Ok(Migrator::new(session, config))
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header, dashes, then one line per row.
/// Columns are separated by two spaces.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.to_vec()));
    out.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
