//! Engine behavior against a file-backed database with a real pool
//!
//! Covers concurrent requests, which the in-memory unit tests cannot.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use wordrill_common::db::init_database;
use wordrill_engine::services::{OutcomeRequest, SubmitOutcome, WordRequest};
use wordrill_engine::WordService;

async fn setup() -> (TempDir, SqlitePool, Arc<WordService>) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("wordrill.db"), 5000)
        .await
        .expect("Should initialize database");
    let service = WordService::with_sqlite(pool.clone(), StdRng::seed_from_u64(5), 3);
    (dir, pool, Arc::new(service))
}

fn request(text: &str, pos: &str, meanings: &[&str]) -> WordRequest {
    WordRequest {
        text: text.to_string(),
        meanings: meanings.iter().map(|m| m.to_string()).collect(),
        category: String::new(),
        part_of_speech: pos.to_string(),
    }
}

async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submits_share_one_new_meaning() {
    let (_dir, pool, service) = setup().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .submit_word(request(&format!("word{}", i), "Noun", &["brand new meaning"]))
                .await
        }));
    }
    for handle in handles {
        let outcome = handle.await.unwrap().expect("submit should succeed");
        assert!(matches!(outcome, SubmitOutcome::Created { .. }));
    }

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM meanings").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM words").await, 8);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM word_meanings").await, 8);
}

#[tokio::test]
async fn test_selection_rounds_with_small_batches() {
    let (_dir, _pool, service) = setup().await;
    // Batch size 3 splits seven words into three chunks
    for i in 0..7 {
        service
            .submit_word(request(&format!("w{}", i), "Noun", &["m"]))
            .await
            .unwrap();
    }

    let picked = service.pick_next().await.unwrap().expect("word chosen");

    let words = service.list_words().await.unwrap();
    for word in &words {
        let expected = if word.id == picked.id { 1.0 } else { 2.0 };
        assert_eq!(word.score, expected, "unexpected score for {}", word.text);
    }
}

#[tokio::test]
async fn test_missed_word_is_presented_next() {
    let (_dir, _pool, service) = setup().await;
    for text in ["alpha", "beta", "gamma"] {
        service
            .submit_word(request(text, "Noun", &["letter"]))
            .await
            .unwrap();
    }

    let first = service.pick_next().await.unwrap().unwrap();
    service
        .apply_outcome(OutcomeRequest {
            word_id: first.id.to_string(),
            correct: false,
        })
        .await
        .unwrap();

    // Missed word: 1 + 2 = 3; the others waited one round: 2
    let second = service.pick_next().await.unwrap().unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.score, 3.0);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("wordrill.db");

    {
        let pool = init_database(&db_path, 5000).await.unwrap();
        let service = WordService::with_sqlite(pool.clone(), StdRng::seed_from_u64(1), 1000);
        service
            .submit_word(request("persist", "Verb-1", &["to last"]))
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path, 5000).await.unwrap();
    let service = WordService::with_sqlite(pool, StdRng::seed_from_u64(1), 1000);
    let words = service.list_words().await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].meanings, vec!["to last"]);
}
