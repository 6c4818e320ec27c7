//! Tests for database initialization

use sqlx::SqlitePool;
use wordrill_common::db::init::{create_schema, init_database, init_memory_database, SCHEMA_VERSION};

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("wordrill.db");

    let result = init_database(&db_path, 1000).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("wordrill.db");

    let pool1 = init_database(&db_path, 1000).await.expect("first open");
    pool1.close().await;

    let pool2 = init_database(&db_path, 1000).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_all_tables_created() {
    let pool = init_memory_database().await.unwrap();

    let tables = table_names(&pool).await;
    for expected in ["meanings", "schema_version", "word_accuracy", "word_meanings", "words"] {
        assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
    }
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let pool = init_memory_database().await.unwrap();
    create_schema(&pool).await.expect("second schema pass should succeed");

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_version")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(versions, vec![SCHEMA_VERSION]);
}

#[tokio::test]
async fn test_meaning_text_unique_constraint() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO meanings (guid, text) VALUES ('a', 'to run')")
        .execute(&pool)
        .await
        .unwrap();
    let duplicate = sqlx::query("INSERT INTO meanings (guid, text) VALUES ('b', 'to run')")
        .execute(&pool)
        .await;

    assert!(duplicate.is_err(), "duplicate meaning text must be rejected");
}

#[tokio::test]
async fn test_active_word_unique_but_archived_duplicates_allowed() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO words (guid, text, part_of_speech, status) VALUES ('w1', 'run', 'Noun', 'archived')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO words (guid, text, part_of_speech) VALUES ('w2', 'run', 'Noun')")
        .execute(&pool)
        .await
        .expect("archived row must not block an active duplicate");

    let duplicate = sqlx::query("INSERT INTO words (guid, text, part_of_speech) VALUES ('w3', 'run', 'Noun')")
        .execute(&pool)
        .await;
    assert!(duplicate.is_err(), "two active (text, part_of_speech) rows must be rejected");

    sqlx::query("INSERT INTO words (guid, text, part_of_speech) VALUES ('w4', 'run', 'Verb-1')")
        .execute(&pool)
        .await
        .expect("same text with another part of speech is allowed");
}
