use super::*;

#[test]
fn test_keyspace_name_accepts_plain_identifier() {
    let name = KeyspaceName::parse("app_data_2").unwrap();
    assert_eq!(name.as_str(), "app_data_2");
    assert_eq!(name.to_string(), "app_data_2");
}

#[test]
fn test_identifier_folds_to_lowercase() {
    let name = KeyspaceName::parse("AppData").unwrap();
    assert_eq!(name, "appdata");
}

#[test]
fn test_identifier_rejects_empty() {
    let err = TableName::parse("").unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
    assert!(err.to_string().contains("[C005]"));
}

#[test]
fn test_identifier_rejects_leading_digit() {
    assert!(KeyspaceName::parse("1app").is_err());
}

#[test]
fn test_identifier_rejects_injection_characters() {
    for bad in ["app; drop keyspace x", "app.data", "app-data", "app'", "\"app\""] {
        assert!(KeyspaceName::parse(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn test_identifier_length_limit() {
    let ok = "a".repeat(MAX_IDENTIFIER_LEN);
    let too_long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
    assert!(TableName::parse(&ok).is_ok());
    let err = TableName::parse(&too_long).unwrap_err();
    assert!(matches!(err, CoreError::InvalidIdentifier { kind: "table", .. }));
}

#[test]
fn test_identifier_deserialize_validates() {
    let name: TableName = serde_yaml::from_str("Migrated_Cql").unwrap();
    assert_eq!(name, "migrated_cql");
    assert!(serde_yaml::from_str::<TableName>("'bad name'").is_err());
}
