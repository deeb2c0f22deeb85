//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create_profile(&self, profile: entities::Profile) -> RepositoryResult<entities::Profile>;

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<entities::Profile>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<entities::Profile>>;

    /// All profiles, newest first.
    async fn list_profiles(&self) -> RepositoryResult<Vec<entities::Profile>>;

    /// Writes the quota counters and returns the stored row.
    async fn update_quota(
        &self,
        user_id: Uuid,
        daily_queries: i64,
        last_query_date: NaiveDate,
    ) -> RepositoryResult<entities::Profile>;

    async fn set_preferred_payment(
        &self,
        user_id: Uuid,
        method: entities::PaymentMethod,
    ) -> RepositoryResult<entities::Profile>;

    /// Returns `None` when no profile has the given id.
    async fn set_pro(&self, user_id: Uuid, is_pro: bool) -> RepositoryResult<Option<entities::Profile>>;

    async fn touch_last_login(&self, user_id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AuthSessionRepository: Send + Sync {
    async fn create_session(
        &self,
        session: entities::AuthSession,
    ) -> RepositoryResult<entities::AuthSession>;

    async fn find_session(&self, token_hash: &str) -> RepositoryResult<Option<entities::AuthSession>>;

    async fn delete_session(&self, token_hash: &str) -> RepositoryResult<()>;
}

#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    async fn create_chat_session(
        &self,
        chat_session: entities::ChatSession,
    ) -> RepositoryResult<entities::ChatSession>;

    /// The user's chat sessions, newest first.
    async fn list_chat_sessions(&self, user_id: Uuid) -> RepositoryResult<Vec<entities::ChatSession>>;

    async fn find_chat_session(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
    ) -> RepositoryResult<Option<entities::ChatSession>>;

    /// Returns `false` when the chat session does not exist or belongs to someone else.
    async fn set_raw_response(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
        raw_response: &str,
    ) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    async fn create_set(&self, set: entities::FlashcardSet) -> RepositoryResult<entities::FlashcardSet>;

    /// Inserts all cards in a single statement. Returns the number of rows written.
    async fn insert_flashcards(&self, flashcards: Vec<entities::Flashcard>) -> RepositoryResult<u64>;

    async fn find_set(
        &self,
        user_id: Uuid,
        set_id: Uuid,
    ) -> RepositoryResult<Option<entities::FlashcardSet>>;

    async fn find_set_by_chat_session(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
    ) -> RepositoryResult<Option<entities::FlashcardSet>>;

    /// Cards of a set in creation order.
    async fn list_flashcards(&self, set_id: Uuid) -> RepositoryResult<Vec<entities::Flashcard>>;
}
