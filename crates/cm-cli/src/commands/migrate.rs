//! Migrate command implementation

use anyhow::{Context, Result};
use cm_migrate::{AppliedMigration, MigrationReport};

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::{load_config, open_migrator, print_json, render_table, Access};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let keyspace = config.keyspace.to_string();
    let migrator = open_migrator(config, Access::ReadWrite).await?;

    let report = migrator
        .run()
        .await
        .with_context(|| format!("Migration of keyspace {keyspace} failed"))?;

    match args.output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => println!("{}", render_report(&keyspace, &report)),
    }
    Ok(())
}

fn render_report(keyspace: &str, report: &MigrationReport) -> String {
    if report.discovered == 0 {
        return "No cql files found, nothing to migrate".to_string();
    }

    let mut out = String::new();
    if let Some(action) = report.keyspace {
        out.push_str(&format!("Keyspace {keyspace}: {action}\n"));
    }
    if report.is_up_to_date() {
        out.push_str(&format!(
            "Already up to date at {}",
            report.current_version()
        ));
        return out;
    }

    out.push_str(&format!(
        "Applied {} cql file{} ({} -> {})\n\n",
        report.applied.len(),
        if report.applied.len() == 1 { "" } else { "s" },
        report.previous_version,
        report.current_version()
    ));
    out.push_str(&render_table(&["VERSION", "NAME"], &migration_rows(&report.applied)));
    out
}

pub(crate) fn migration_rows(migrations: &[AppliedMigration]) -> Vec<Vec<String>> {
    migrations
        .iter()
        .map(|m| vec![m.version.to_string(), m.name.clone()])
        .collect()
}
