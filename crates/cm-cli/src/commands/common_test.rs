use super::*;
use crate::cli::Cli;
use clap::Parser;
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn parse(args: &[&str]) -> GlobalArgs {
    for var in [
        "CQLMIGRATE_BACKEND",
        "CQLMIGRATE_DATABASE_PATH",
        "CQLMIGRATE_HOST",
        "CQLMIGRATE_PORT",
        "CQLMIGRATE_CQL_DIR",
        "CQLMIGRATE_KEYSPACE",
        "CQLMIGRATE_TABLE",
        "CQLMIGRATE_REFRESH",
        "CQLMIGRATE_VERIFY_CHECKSUMS",
        "CQLMIGRATE_TIMEOUT_SECS",
    ] {
        std::env::remove_var(var);
    }
    let mut argv = vec!["cqlmigrate"];
    argv.extend_from_slice(args);
    argv.push("status");
    Cli::try_parse_from(argv).unwrap().global
}

#[test]
fn test_column_widths() {
    let widths = calculate_column_widths(
        &["VERSION", "NAME"],
        &[vec!["v001".into(), "V001__create_orders.cql".into()]],
    );
    assert_eq!(widths, vec![7, 23]);
}

#[test]
fn test_render_table() {
    let table = render_table(
        &["VERSION", "NAME"],
        &[
            vec!["v001".into(), "V001__a.cql".into()],
            vec!["v002".into(), "V002__b.cql".into()],
        ],
    );
    assert_eq!(
        table,
        "VERSION  NAME\n-------  -----------\nv001     V001__a.cql\nv002     V002__b.cql"
    );
}

#[test]
#[serial]
fn test_load_config_from_flags_only() {
    let global = parse(&["--cql-dir", "cql", "--keyspace", "Orders"]);

    let config = load_config(&global).unwrap();

    assert_eq!(config.keyspace.as_str(), "orders");
    assert_eq!(config.table.as_str(), "migrated_cql");
    assert_eq!(config.statement_timeout, Duration::from_secs(10));
    assert!(!config.refresh);
}

#[test]
#[serial]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cqlmigrate.yml");
    fs::write(
        &path,
        "cql_dir: from_file\nkeyspace: file_ks\ntable: file_ledger\nrefresh: true\n",
    )
    .unwrap();
    let path_arg = path.to_string_lossy().to_string();

    let global = parse(&["--config", &path_arg, "--keyspace", "flag_ks"]);
    let config = load_config(&global).unwrap();

    assert_eq!(config.keyspace.as_str(), "flag_ks");
    assert_eq!(config.table.as_str(), "file_ledger");
    assert_eq!(config.cql_dir, std::path::PathBuf::from("from_file"));
    assert!(config.refresh);
}

#[test]
#[serial]
fn test_no_refresh_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cqlmigrate.yml");
    fs::write(
        &path,
        "cql_dir: cql\nkeyspace: ks\nrefresh: true\nverify_checksums: true\n",
    )
    .unwrap();
    let path_arg = path.to_string_lossy().to_string();

    let from_file = load_config(&parse(&["--config", &path_arg])).unwrap();
    assert!(from_file.refresh);
    assert!(from_file.verify_checksums);

    let global = parse(&[
        "--config",
        &path_arg,
        "--no-refresh",
        "--verify-checksums=false",
    ]);
    let config = load_config(&global).unwrap();
    assert!(!config.refresh);
    assert!(!config.verify_checksums);
}

#[test]
#[serial]
fn test_missing_keyspace_names_env_var() {
    let global = parse(&["--cql-dir", "cql"]);

    let err = load_config(&global).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("keyspace"), "{message}");
    assert!(message.contains("CQLMIGRATE_KEYSPACE"), "{message}");
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    let global = parse(&["--config", "/nonexistent/cqlmigrate.yml"]);

    assert!(load_config(&global).is_err());
}
