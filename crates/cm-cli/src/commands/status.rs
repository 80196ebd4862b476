//! Status command implementation

use anyhow::{Context, Result};
use cm_migrate::MigrationStatus;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{load_config, open_migrator, print_json, render_table, Access};
use crate::commands::migrate::migration_rows;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let migrator = open_migrator(config, Access::ReadOnly).await?;

    let status = migrator
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => println!("{}", render_status(&status)),
    }
    Ok(())
}

fn render_status(status: &MigrationStatus) -> String {
    let mut out = if status.keyspace_present {
        format!(
            "Keyspace {}: present, last applied {}\n",
            status.keyspace, status.last_applied
        )
    } else {
        format!("Keyspace {}: absent\n", status.keyspace)
    };

    if !status.applied.is_empty() {
        out.push_str("\nApplied:\n");
        out.push_str(&render_table(
            &["VERSION", "NAME"],
            &migration_rows(&status.applied),
        ));
        out.push('\n');
    }

    if !status.modified.is_empty() {
        out.push_str(&format!(
            "\nModified since applied: {}\n",
            status.modified.join(", ")
        ));
    }

    if status.pending.is_empty() {
        out.push_str("\nNo pending cql files");
    } else {
        let rows: Vec<Vec<String>> = status
            .pending
            .iter()
            .map(|s| vec![s.version().to_string(), s.name().to_string()])
            .collect();
        out.push_str("\nPending:\n");
        out.push_str(&render_table(&["VERSION", "NAME"], &rows));
    }
    out
}
