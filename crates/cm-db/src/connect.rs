//! Session factory

use crate::duckdb::DuckDbSession;
use crate::error::DbResult;
use crate::traits::Session;
use cm_core::{Backend, DatabaseConfig};
use std::path::Path;

/// Open a session for the configured backend.
pub async fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Session>> {
    match config.backend {
        Backend::DuckDb => {
            log::debug!("Opening DuckDB database {}", config.path);
            Ok(Box::new(DuckDbSession::new(&config.path)?))
        }
        Backend::Cassandra => connect_cassandra(config).await,
    }
}

/// Open a session that only needs to read.
///
/// A DuckDB file is opened read-only and is never created: when it does not
/// exist yet an empty in-memory database stands in, which reads as a
/// keyspace that was never migrated. Cassandra sessions are opened as usual.
pub async fn connect_read_only(config: &DatabaseConfig) -> DbResult<Box<dyn Session>> {
    match config.backend {
        Backend::DuckDb if config.path == ":memory:" => {
            Ok(Box::new(DuckDbSession::in_memory()?))
        }
        Backend::DuckDb => {
            let path = Path::new(&config.path);
            if !path.exists() {
                log::info!(
                    "DuckDB database {} does not exist yet, nothing has been migrated",
                    config.path
                );
                return Ok(Box::new(DuckDbSession::in_memory()?));
            }
            log::debug!("Opening DuckDB database {} read-only", config.path);
            Ok(Box::new(DuckDbSession::read_only(path)?))
        }
        Backend::Cassandra => connect_cassandra(config).await,
    }
}

#[cfg(feature = "cassandra")]
async fn connect_cassandra(config: &DatabaseConfig) -> DbResult<Box<dyn Session>> {
    log::debug!("Connecting to Cassandra at {}:{}", config.host, config.port);
    let session = crate::cassandra::CassandraSession::connect(&config.host, config.port).await?;
    Ok(Box::new(session))
}

#[cfg(not(feature = "cassandra"))]
async fn connect_cassandra(_config: &DatabaseConfig) -> DbResult<Box<dyn Session>> {
    Err(crate::error::DbError::NotImplemented {
        backend: "cassandra".to_string(),
        feature: "this build does not include the `cassandra` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[tokio::test]
    async fn test_connect_duckdb_memory() {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            ..Default::default()
        };
        let session = connect(&config).await.unwrap();
        assert_eq!(session.backend_name(), "duckdb");
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_duckdb_bad_path_is_connection_error() {
        let config = DatabaseConfig {
            path: "/definitely/not/a/dir/target.duckdb".to_string(),
            ..Default::default()
        };
        let err = connect(&config).await.err().unwrap();
        assert!(matches!(err, DbError::ConnectionError(_)));
    }

    #[tokio::test]
    async fn test_read_only_leaves_missing_file_uncreated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.duckdb");
        let config = DatabaseConfig {
            path: path.to_string_lossy().to_string(),
            ..Default::default()
        };

        let session = connect_read_only(&config).await.unwrap();
        let rows = session
            .execute(&crate::statement::Statement::query("SELECT 1"))
            .await
            .unwrap();
        assert_eq!(rows.rows().len(), 1);
        session.close().await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_read_only_opens_existing_file_without_write_access() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target.duckdb");
        let config = DatabaseConfig {
            path: path.to_string_lossy().to_string(),
            ..Default::default()
        };
        let writer = connect(&config).await.unwrap();
        writer.close().await.unwrap();

        let session = connect_read_only(&config).await.unwrap();
        let err = session
            .execute(&crate::statement::Statement::execute("CREATE SCHEMA app"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionError { .. }));
    }

    #[cfg(not(feature = "cassandra"))]
    #[tokio::test]
    async fn test_cassandra_without_feature() {
        let config = DatabaseConfig {
            backend: Backend::Cassandra,
            ..Default::default()
        };
        let err = connect(&config).await.err().unwrap();
        assert!(err.to_string().contains("[D005]"));
    }
}
