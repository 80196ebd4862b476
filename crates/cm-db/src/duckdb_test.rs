use super::*;
use crate::statement::Cell;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbSession::in_memory().unwrap();
    assert_eq!(db.backend_name(), "duckdb");
    assert_eq!(db.dialect(), Dialect::DuckDb);
}

#[tokio::test]
async fn test_execute_and_query_with_bound_values() {
    let db = DuckDbSession::in_memory().unwrap();
    db.execute(&Statement::execute("CREATE SCHEMA app")).await.unwrap();
    db.execute(&Statement::execute(
        "CREATE TABLE app.ledger (id UUID PRIMARY KEY, ver INTEGER, name VARCHAR)",
    ))
    .await
    .unwrap();

    let insert =
        Statement::execute("INSERT INTO app.ledger (id, ver, name) VALUES (CAST(? AS UUID), ?, ?)")
            .bind(uuid::Uuid::now_v7())
            .bind(7)
            .bind("V007__seven.cql");
    let result = db.execute(&insert).await.unwrap();
    assert!(result.was_applied());
    assert!(result.rows().is_empty());

    let rows = db
        .execute(&Statement::query("SELECT ver, name FROM app.ledger"))
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_int(0), Some(7));
    assert_eq!(rows[0].get_text(1), Some("V007__seven.cql"));
}

#[tokio::test]
async fn test_query_reads_nulls_and_mixed_types() {
    let db = DuckDbSession::in_memory().unwrap();
    let rows = db
        .execute(&Statement::query("SELECT 1 AS a, 'x' AS b, NULL AS c, 2.5 AS d, true AS e"))
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get(0), Some(&Cell::Int(1)));
    assert_eq!(row.get(1), Some(&Cell::Text("x".to_string())));
    assert_eq!(row.get(2), Some(&Cell::Null));
    assert_eq!(row.len(), 5);
}

#[tokio::test]
async fn test_information_schema_lookup_by_bound_schema() {
    let db = DuckDbSession::in_memory().unwrap();
    let lookup = || {
        Statement::query("SELECT table_name FROM information_schema.tables WHERE table_schema = ?")
            .bind("app")
    };
    assert!(db.execute(&lookup()).await.unwrap().rows().is_empty());

    db.execute(&Statement::execute("CREATE SCHEMA app")).await.unwrap();
    db.execute(&Statement::execute("CREATE TABLE app.t (id INTEGER)"))
        .await
        .unwrap();
    let rows = db.execute(&lookup()).await.unwrap().into_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_text(0), Some("t"));
}

#[tokio::test]
async fn test_execution_error_carries_statement() {
    let db = DuckDbSession::in_memory().unwrap();
    let err = db
        .execute(&Statement::execute("CREATE TABLE missing_schema.t (id INTEGER)"))
        .await
        .unwrap_err();
    match err {
        DbError::ExecutionError { statement, .. } => {
            assert_eq!(statement, "CREATE TABLE missing_schema.t (id INTEGER)");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_close_then_execute_fails() {
    let db = DuckDbSession::in_memory().unwrap();
    db.close().await.unwrap();
    let err = db.execute(&Statement::query("SELECT 1")).await.unwrap_err();
    assert!(matches!(err, DbError::SessionClosed));
    // closing twice is harmless
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_file_database_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target.duckdb");
    {
        let db = DuckDbSession::from_path(&path).unwrap();
        db.execute(&Statement::execute("CREATE SCHEMA app")).await.unwrap();
        db.execute(&Statement::execute("CREATE TABLE app.t AS SELECT 42 AS n"))
            .await
            .unwrap();
        db.close().await.unwrap();
    }
    let db = DuckDbSession::new(path.to_str().unwrap()).unwrap();
    let rows = db
        .execute(&Statement::query("SELECT n FROM app.t"))
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows[0].get_int(0), Some(42));
}

#[tokio::test]
async fn test_read_only_session_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target.duckdb");
    {
        let db = DuckDbSession::from_path(&path).unwrap();
        db.execute(&Statement::execute("CREATE SCHEMA app")).await.unwrap();
        db.close().await.unwrap();
    }

    let db = DuckDbSession::read_only(&path).unwrap();
    let rows = db
        .execute(&Statement::query(
            "SELECT schema_name FROM information_schema.schemata WHERE schema_name = 'app'",
        ))
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 1);
    let err = db
        .execute(&Statement::execute("CREATE TABLE app.t (n INTEGER)"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ExecutionError { .. }));
}

#[test]
fn test_read_only_does_not_create_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.duckdb");
    let err = DuckDbSession::read_only(&path).err().unwrap();
    assert!(matches!(err, DbError::ConnectionError(_)));
    assert!(!path.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_interrupts_running_statement() {
    let db = std::sync::Arc::new(DuckDbSession::in_memory().unwrap());
    let running = {
        let db = std::sync::Arc::clone(&db);
        tokio::spawn(async move {
            db.execute(&Statement::query(
                "SELECT sum(a.range * b.range) FROM range(1000000) a, range(1000000) b",
            ))
            .await
        })
    };

    // keep interrupting until the statement gives up, in case the first
    // call lands before DuckDB has started executing
    let started = std::time::Instant::now();
    while !running.is_finished() {
        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "statement was not interrupted"
        );
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        db.cancel();
    }

    let result = running.await.unwrap();
    assert!(matches!(result, Err(DbError::ExecutionError { .. })));

    // the connection is usable again afterwards
    let rows = db
        .execute(&Statement::query("SELECT 1"))
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows[0].get_int(0), Some(1));
}
