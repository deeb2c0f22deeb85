//! Database and schema tests
//!
//! Tests SQLite migrations, entity storage, and schema constraints

use chrono::{NaiveDate, Utc};
use notecards_api::infrastructure::entities::{PaymentMethod, Profile};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

async fn insert_profile(pool: &SqlitePool, email: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(email)
        .bind("not-a-real-hash")
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
    user_id
}

#[tokio::test]
async fn test_database_migrations_work() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap();
    let tables: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();

    for table in [
        "auth_sessions",
        "chat_sessions",
        "flashcard_sets",
        "flashcards",
        "profiles",
    ] {
        assert!(tables.contains(&table), "missing table {table}");
    }
}

#[tokio::test]
async fn test_new_profile_defaults() {
    let pool = setup_test_db().await;
    let user_id = insert_profile(&pool, "student@example.com").await;

    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE id = ?")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(profile.id, user_id);
    assert!(!profile.is_pro);
    assert_eq!(profile.daily_queries, 5);
    assert_eq!(profile.last_query_date, None);
    assert_eq!(profile.preferred_payment, None);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = setup_test_db().await;
    insert_profile(&pool, "student@example.com").await;

    let result =
        sqlx::query("INSERT INTO profiles (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4())
            .bind("student@example.com")
            .bind("not-a-real-hash")
            .bind(Utc::now())
            .execute(&pool)
            .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_negative_quota_rejected() {
    let pool = setup_test_db().await;
    let user_id = insert_profile(&pool, "student@example.com").await;

    let result = sqlx::query("UPDATE profiles SET daily_queries = -1 WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_payment_method_and_date_storage() {
    let pool = setup_test_db().await;
    let user_id = insert_profile(&pool, "student@example.com").await;
    let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

    sqlx::query("UPDATE profiles SET preferred_payment = ?, last_query_date = ? WHERE id = ?")
        .bind(PaymentMethod::Mpesa)
        .bind(day)
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let raw: (String, String) =
        sqlx::query_as("SELECT preferred_payment, last_query_date FROM profiles WHERE id = ?")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(raw, ("mpesa".to_string(), "2025-03-14".to_string()));

    let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE id = ?")
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(profile.preferred_payment, Some(PaymentMethod::Mpesa));
    assert_eq!(profile.last_query_date, Some(day));
}

#[tokio::test]
async fn test_chat_session_requires_profile() {
    let pool = setup_test_db().await;

    let result = sqlx::query(
        "INSERT INTO chat_sessions (id, user_id, user_input, title, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind("notes")
    .bind("notes")
    .bind(Utc::now())
    .execute(&pool)
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_chat_session_cascade_delete() {
    let pool = setup_test_db().await;
    let user_id = insert_profile(&pool, "student@example.com").await;

    let chat_session_id = Uuid::new_v4();
    let set_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO chat_sessions (id, user_id, user_input, title, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(chat_session_id)
    .bind(user_id)
    .bind("notes")
    .bind("notes")
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO flashcard_sets (id, chat_session_id, title, created_at) VALUES (?, ?, ?, ?)")
        .bind(set_id)
        .bind(chat_session_id)
        .bind("Flashcards: notes...")
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO flashcards (id, set_id, position, question, answer, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(set_id)
    .bind(0)
    .bind("What?")
    .bind("That.")
    .bind(Utc::now())
    .execute(&pool)
    .await
    .unwrap();

    // Delete the chat session, the set and its cards should follow
    sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
        .bind(chat_session_id)
        .execute(&pool)
        .await
        .unwrap();

    let sets: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flashcard_sets")
        .fetch_one(&pool)
        .await
        .unwrap();
    let cards: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flashcards")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(sets.0, 0);
    assert_eq!(cards.0, 0);
}
