//! DB Repository abstractions

use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    AuthSession, ChatSession, Flashcard, FlashcardSet, PaymentMethod, Profile,
};
use crate::infrastructure::traits::{
    AuthSessionRepository, ChatSessionRepository, FlashcardRepository, ProfileRepository,
    RepositoryResult,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use di::{Ref, injectable};
use log::debug;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[injectable(ProfileRepository)]
pub struct DbProfileRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl ProfileRepository for DbProfileRepository {
    async fn create_profile(&self, profile: Profile) -> RepositoryResult<Profile> {
        let profile = sqlx::query_as(
            "INSERT INTO profiles (id, email, password_hash, created_at, last_login, is_pro, daily_queries, last_query_date, preferred_payment) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(profile.id)
        .bind(profile.email)
        .bind(profile.password_hash)
        .bind(profile.created_at)
        .bind(profile.last_login)
        .bind(profile.is_pro)
        .bind(profile.daily_queries)
        .bind(profile.last_query_date)
        .bind(profile.preferred_payment)
        .fetch_one(&**self.connection)
        .await?;

        Ok(profile)
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<Profile>> {
        let profile = sqlx::query_as("SELECT * FROM profiles WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await?;

        Ok(profile)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Profile>> {
        let profile = sqlx::query_as("SELECT * FROM profiles WHERE email = ?")
            .bind(email)
            .fetch_optional(&**self.connection)
            .await?;

        Ok(profile)
    }

    async fn list_profiles(&self) -> RepositoryResult<Vec<Profile>> {
        let profiles = sqlx::query_as("SELECT * FROM profiles ORDER BY datetime(created_at) DESC, created_at DESC")
            .fetch_all(&**self.connection)
            .await?;

        Ok(profiles)
    }

    async fn update_quota(
        &self,
        user_id: Uuid,
        daily_queries: i64,
        last_query_date: NaiveDate,
    ) -> RepositoryResult<Profile> {
        debug!("quota for {user_id}: {daily_queries} left on {last_query_date}");

        let profile = sqlx::query_as(
            "UPDATE profiles SET daily_queries = ?, last_query_date = ? WHERE id = ? RETURNING *",
        )
        .bind(daily_queries)
        .bind(last_query_date)
        .bind(user_id)
        .fetch_one(&**self.connection)
        .await?;

        Ok(profile)
    }

    async fn set_preferred_payment(
        &self,
        user_id: Uuid,
        method: PaymentMethod,
    ) -> RepositoryResult<Profile> {
        let profile =
            sqlx::query_as("UPDATE profiles SET preferred_payment = ? WHERE id = ? RETURNING *")
                .bind(method)
                .bind(user_id)
                .fetch_one(&**self.connection)
                .await?;

        Ok(profile)
    }

    async fn set_pro(&self, user_id: Uuid, is_pro: bool) -> RepositoryResult<Option<Profile>> {
        let profile = sqlx::query_as("UPDATE profiles SET is_pro = ? WHERE id = ? RETURNING *")
            .bind(is_pro)
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await?;

        Ok(profile)
    }

    async fn touch_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        sqlx::query("UPDATE profiles SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&**self.connection)
            .await?;

        Ok(())
    }
}

#[injectable(AuthSessionRepository)]
pub struct DbAuthSessionRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl AuthSessionRepository for DbAuthSessionRepository {
    async fn create_session(&self, session: AuthSession) -> RepositoryResult<AuthSession> {
        let session = sqlx::query_as(
            "INSERT INTO auth_sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .fetch_one(&**self.connection)
        .await?;

        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> RepositoryResult<Option<AuthSession>> {
        let session = sqlx::query_as("SELECT * FROM auth_sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&**self.connection)
            .await?;

        Ok(session)
    }

    async fn delete_session(&self, token_hash: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&**self.connection)
            .await?;

        Ok(())
    }
}

#[injectable(ChatSessionRepository)]
pub struct DbChatSessionRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl ChatSessionRepository for DbChatSessionRepository {
    async fn create_chat_session(&self, chat_session: ChatSession) -> RepositoryResult<ChatSession> {
        let chat_session = sqlx::query_as(
            "INSERT INTO chat_sessions (id, user_id, user_input, ai_raw_response, title, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(chat_session.id)
        .bind(chat_session.user_id)
        .bind(chat_session.user_input)
        .bind(chat_session.ai_raw_response)
        .bind(chat_session.title)
        .bind(chat_session.created_at)
        .fetch_one(&**self.connection)
        .await?;

        Ok(chat_session)
    }

    async fn list_chat_sessions(&self, user_id: Uuid) -> RepositoryResult<Vec<ChatSession>> {
        let chat_sessions = sqlx::query_as(
            "SELECT * FROM chat_sessions WHERE user_id = ? ORDER BY datetime(created_at) DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&**self.connection)
        .await?;

        Ok(chat_sessions)
    }

    async fn find_chat_session(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
    ) -> RepositoryResult<Option<ChatSession>> {
        let chat_session = sqlx::query_as("SELECT * FROM chat_sessions WHERE id = ? AND user_id = ?")
            .bind(chat_session_id)
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await?;

        Ok(chat_session)
    }

    async fn set_raw_response(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
        raw_response: &str,
    ) -> RepositoryResult<bool> {
        let result =
            sqlx::query("UPDATE chat_sessions SET ai_raw_response = ? WHERE id = ? AND user_id = ?")
                .bind(raw_response)
                .bind(chat_session_id)
                .bind(user_id)
                .execute(&**self.connection)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[injectable(FlashcardRepository)]
pub struct DbFlashcardRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl FlashcardRepository for DbFlashcardRepository {
    async fn create_set(&self, set: FlashcardSet) -> RepositoryResult<FlashcardSet> {
        let set = sqlx::query_as(
            "INSERT INTO flashcard_sets (id, chat_session_id, title, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(set.id)
        .bind(set.chat_session_id)
        .bind(set.title)
        .bind(set.created_at)
        .fetch_one(&**self.connection)
        .await?;

        Ok(set)
    }

    async fn insert_flashcards(&self, flashcards: Vec<Flashcard>) -> RepositoryResult<u64> {
        if flashcards.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO flashcards (id, set_id, position, question, answer, created_at) ",
        );
        builder.push_values(flashcards, |mut row, card| {
            row.push_bind(card.id)
                .push_bind(card.set_id)
                .push_bind(card.position)
                .push_bind(card.question)
                .push_bind(card.answer)
                .push_bind(card.created_at);
        });

        let result = builder.build().execute(&**self.connection).await?;

        Ok(result.rows_affected())
    }

    async fn find_set(&self, user_id: Uuid, set_id: Uuid) -> RepositoryResult<Option<FlashcardSet>> {
        let set = sqlx::query_as(
            "SELECT flashcard_sets.id, flashcard_sets.chat_session_id, flashcard_sets.title, flashcard_sets.created_at FROM flashcard_sets INNER JOIN chat_sessions ON chat_sessions.id = flashcard_sets.chat_session_id WHERE flashcard_sets.id = ? AND chat_sessions.user_id = ?",
        )
        .bind(set_id)
        .bind(user_id)
        .fetch_optional(&**self.connection)
        .await?;

        Ok(set)
    }

    async fn find_set_by_chat_session(
        &self,
        user_id: Uuid,
        chat_session_id: Uuid,
    ) -> RepositoryResult<Option<FlashcardSet>> {
        let set = sqlx::query_as(
            "SELECT flashcard_sets.id, flashcard_sets.chat_session_id, flashcard_sets.title, flashcard_sets.created_at FROM flashcard_sets INNER JOIN chat_sessions ON chat_sessions.id = flashcard_sets.chat_session_id WHERE flashcard_sets.chat_session_id = ? AND chat_sessions.user_id = ?",
        )
        .bind(chat_session_id)
        .bind(user_id)
        .fetch_optional(&**self.connection)
        .await?;

        Ok(set)
    }

    async fn list_flashcards(&self, set_id: Uuid) -> RepositoryResult<Vec<Flashcard>> {
        let flashcards = sqlx::query_as(
            "SELECT * FROM flashcards WHERE set_id = ? ORDER BY datetime(created_at) ASC, position ASC",
        )
        .bind(set_id)
        .fetch_all(&**self.connection)
        .await?;

        Ok(flashcards)
    }
}
