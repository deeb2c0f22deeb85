//! Pooled SQLite connection

use crate::config::AppConfig;
use di::{Ref, inject, injectable};
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::ops::Deref;
use std::sync::Mutex;

/// Pool handed to every `DatabaseConnection` created while set, so tests can share one
/// in-memory database with the DI container.
static TEST_POOL: Mutex<Option<SqlitePool>> = Mutex::new(None);

pub struct DatabaseConnection {
    connection: SqlitePool,
}

#[injectable]
impl DatabaseConnection {
    #[inject]
    pub fn create(config: Ref<AppConfig>) -> DatabaseConnection {
        if let Some(pool) = Self::test_pool() {
            return DatabaseConnection { connection: pool };
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy(&config.database_url)
            .expect("Cannot connect to database");

        DatabaseConnection { connection: pool }
    }
}

impl DatabaseConnection {
    /// Connects eagerly and applies the embedded migrations.
    pub async fn migrate(database_url: &str) -> Result<(), sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        sqlx::migrate!().run(&pool).await?;
        info!("database migrations applied");

        pool.close().await;
        Ok(())
    }

    pub fn set_test_pool(pool: SqlitePool) {
        *TEST_POOL.lock().expect("test pool lock poisoned") = Some(pool);
    }

    pub fn clear_test_pool() {
        *TEST_POOL.lock().expect("test pool lock poisoned") = None;
    }

    fn test_pool() -> Option<SqlitePool> {
        TEST_POOL.lock().expect("test pool lock poisoned").clone()
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}
