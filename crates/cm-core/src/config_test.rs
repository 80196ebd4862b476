use super::*;

fn required() -> RawConfig {
    RawConfig {
        cql_dir: Some(PathBuf::from("./cql")),
        keyspace: Some("app".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_resolve_applies_defaults() {
    let config = Config::resolve(required()).unwrap();
    assert_eq!(config.database.backend, Backend::DuckDb);
    assert_eq!(config.database.path, "cqlmigrate.duckdb");
    assert_eq!(config.database.host, "localhost");
    assert_eq!(config.database.port, 9042);
    assert_eq!(config.cql_dir, PathBuf::from("./cql"));
    assert_eq!(config.keyspace, "app");
    assert_eq!(config.table, "migrated_cql");
    assert!(!config.refresh);
    assert!(!config.verify_checksums);
    assert_eq!(config.statement_timeout, Duration::from_secs(10));
    assert_eq!(
        config.replication,
        Replication::SimpleStrategy {
            replication_factor: 1
        }
    );
}

#[test]
fn test_missing_keyspace_names_key_and_env_var() {
    let raw = RawConfig {
        keyspace: None,
        ..required()
    };
    let err = Config::resolve(raw).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("[C001]"), "{msg}");
    assert!(msg.contains("keyspace"), "{msg}");
    assert!(msg.contains("CQLMIGRATE_KEYSPACE"), "{msg}");
}

#[test]
fn test_missing_cql_dir() {
    let raw = RawConfig {
        cql_dir: None,
        ..required()
    };
    match Config::resolve(raw).unwrap_err() {
        CoreError::ConfigMissing { key, env } => {
            assert_eq!(key, "cql_dir");
            assert_eq!(env, "CQLMIGRATE_CQL_DIR");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_keyspace_name_rejected() {
    let raw = RawConfig {
        keyspace: Some("app; drop keyspace prod".to_string()),
        ..required()
    };
    assert!(matches!(
        Config::resolve(raw).unwrap_err(),
        CoreError::InvalidIdentifier { kind: "keyspace", .. }
    ));
}

#[test]
fn test_zero_timeout_rejected() {
    let raw = RawConfig {
        statement_timeout_secs: Some(0),
        ..required()
    };
    let err = Config::resolve(raw).unwrap_err();
    assert!(err.to_string().contains("statement_timeout_secs"));
}

#[test]
fn test_unknown_backend_rejected() {
    let raw = RawConfig {
        database: Some(RawDatabaseConfig {
            backend: Some("postgres".to_string()),
            ..Default::default()
        }),
        ..required()
    };
    let err = Config::resolve(raw).unwrap_err();
    assert!(err.to_string().contains("unknown backend 'postgres'"));
}

#[test]
fn test_backend_from_str() {
    assert_eq!("DuckDB".parse::<Backend>().unwrap(), Backend::DuckDb);
    assert_eq!("cassandra".parse::<Backend>().unwrap(), Backend::Cassandra);
    assert_eq!("scylla".parse::<Backend>().unwrap(), Backend::Cassandra);
    assert_eq!(Backend::Cassandra.to_string(), "cassandra");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
database:
  backend: cassandra
  host: cassandra.internal
  port: 19042
cql_dir: ./migrations
keyspace: Orders
table: schema_history
refresh: true
verify_checksums: true
statement_timeout_secs: 30
replication:
  class: NetworkTopologyStrategy
  datacenters:
    dc1: 3
    dc2: 2
"#;
    let config = Config::resolve(RawConfig::from_yaml(yaml).unwrap()).unwrap();
    assert_eq!(config.database.backend, Backend::Cassandra);
    assert_eq!(config.database.host, "cassandra.internal");
    assert_eq!(config.database.port, 19042);
    assert_eq!(config.keyspace, "orders");
    assert_eq!(config.table, "schema_history");
    assert!(config.refresh);
    assert!(config.verify_checksums);
    assert_eq!(config.statement_timeout, Duration::from_secs(30));
    match config.replication {
        Replication::NetworkTopologyStrategy { datacenters } => {
            assert_eq!(datacenters.get("dc1"), Some(&3));
            assert_eq!(datacenters.get("dc2"), Some(&2));
        }
        other => panic!("unexpected replication: {other:?}"),
    }
}

#[test]
fn test_yaml_rejects_unknown_keys() {
    assert!(RawConfig::from_yaml("keyspace: app\nkeyspaces: typo\n").is_err());
    assert!(RawConfig::from_yaml("database:\n  hostname: x\n").is_err());
}

#[test]
fn test_empty_yaml_is_empty_layer() {
    assert_eq!(RawConfig::from_yaml("  \n").unwrap(), RawConfig::default());
}

#[test]
fn test_replication_validation() {
    let zero = RawConfig {
        replication: Some(Replication::SimpleStrategy {
            replication_factor: 0,
        }),
        ..required()
    };
    assert!(Config::resolve(zero).is_err());

    let empty = RawConfig {
        replication: Some(Replication::NetworkTopologyStrategy {
            datacenters: BTreeMap::new(),
        }),
        ..required()
    };
    assert!(Config::resolve(empty).is_err());

    let quoted = RawConfig {
        replication: Some(Replication::NetworkTopologyStrategy {
            datacenters: BTreeMap::from([("dc1'".to_string(), 1)]),
        }),
        ..required()
    };
    let err = Config::resolve(quoted).unwrap_err();
    assert!(err.to_string().contains("invalid datacenter name"));
}

#[test]
fn test_overlay_prefers_higher_layer() {
    let file = RawConfig::from_yaml(
        "database:\n  host: file-host\n  port: 9000\n\
         keyspace: from_file\ncql_dir: ./file\ntable: file_table\n",
    )
    .unwrap();
    let cli = RawConfig {
        database: Some(RawDatabaseConfig {
            host: Some("cli-host".to_string()),
            ..Default::default()
        }),
        keyspace: Some("from_cli".to_string()),
        ..Default::default()
    };
    let config = Config::resolve(file.overlay(cli)).unwrap();
    assert_eq!(config.database.host, "cli-host");
    assert_eq!(config.database.port, 9000);
    assert_eq!(config.keyspace, "from_cli");
    assert_eq!(config.table, "file_table");
    assert_eq!(config.cql_dir, PathBuf::from("./file"));
}

#[test]
fn test_load_missing_file() {
    let err = RawConfig::load(Path::new("/definitely/not/here/cqlmigrate.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_reports_parse_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cqlmigrate.yml");
    std::fs::write(&path, "refresh: [not, a, bool]\n").unwrap();
    let err = RawConfig::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParse { .. }));
    assert!(err.to_string().contains("cqlmigrate.yml"));
}

#[test]
fn test_config_key_env_vars() {
    assert_eq!(ConfigKey::Host.env_var(), "CQLMIGRATE_HOST");
    assert_eq!(ConfigKey::Port.env_var(), "CQLMIGRATE_PORT");
    assert_eq!(ConfigKey::Refresh.env_var(), "CQLMIGRATE_REFRESH");
    assert_eq!(
        ConfigKey::VerifyChecksums.env_var(),
        "CQLMIGRATE_VERIFY_CHECKSUMS"
    );
    assert_eq!(ConfigKey::Table.name(), "table");
}

#[test]
fn test_overlay_lets_higher_layer_turn_flags_off() {
    let file = RawConfig::from_yaml("refresh: true\nverify_checksums: true\n").unwrap();
    let cli = RawConfig {
        refresh: Some(false),
        verify_checksums: Some(false),
        ..Default::default()
    };
    let config = Config::resolve(required().overlay(file).overlay(cli)).unwrap();
    assert!(!config.refresh);
    assert!(!config.verify_checksums);
}
