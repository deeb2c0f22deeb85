//! DI "Interfaces"

use crate::core::error::ServiceResult;
use crate::core::session::{IssuedSession, SessionContext};
use crate::infrastructure::entities;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and signs it in.
    ///
    /// Returns `Err` if the email is malformed or taken, or the password is too short.
    async fn sign_up(&self, email: &str, password: &str) -> ServiceResult<IssuedSession>;

    /// Checks the credentials and opens a new session.
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<IssuedSession>;

    /// Resolves a bearer token into the caller's session.
    ///
    /// Returns `Err(Unauthorized)` for unknown, signed-out or expired tokens.
    async fn resolve(&self, token: &str) -> ServiceResult<SessionContext>;

    /// Ends the session. The token stops resolving immediately.
    async fn sign_out(&self, session: &SessionContext) -> ServiceResult<()>;
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn current(&self, session: &SessionContext) -> ServiceResult<entities::Profile>;

    /// Runs the daily quota gate, persisting a reset on the first request of the day.
    ///
    /// Returns the stored profile, or `Err(QuotaExceeded)` when a free account has no
    /// generations left today.
    async fn check_quota(
        &self,
        session: &SessionContext,
        today: NaiveDate,
    ) -> ServiceResult<entities::Profile>;

    /// Consumes one generation for free accounts. Pro accounts are returned untouched.
    async fn record_generation(
        &self,
        profile: entities::Profile,
        today: NaiveDate,
    ) -> ServiceResult<entities::Profile>;

    /// Stores the payment method the user wants to be contacted about.
    async fn request_upgrade(
        &self,
        session: &SessionContext,
        preferred_payment: Option<&str>,
    ) -> ServiceResult<entities::Profile>;
}

#[async_trait]
pub trait ChatSessionService: Send + Sync {
    /// Records the notes of one generation request.
    async fn record(
        &self,
        session: &SessionContext,
        user_input: &str,
    ) -> ServiceResult<entities::ChatSession>;

    /// The caller's chat sessions, newest first.
    async fn list(&self, session: &SessionContext) -> ServiceResult<Vec<entities::ChatSession>>;

    /// The flashcard set generated for one of the caller's chat sessions.
    async fn flashcard_set_for(
        &self,
        session: &SessionContext,
        chat_session_id: Uuid,
    ) -> ServiceResult<entities::FlashcardSet>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedSet {
    pub set_id: Uuid,
    pub flashcard_count: usize,
}

#[derive(Debug, Clone)]
pub struct FlashcardSetDetails {
    pub set: entities::FlashcardSet,
    pub chat_session: Option<entities::ChatSession>,
    pub flashcards: Vec<entities::Flashcard>,
}

#[async_trait]
pub trait FlashcardService: Send + Sync {
    /// Generates, parses and stores the flashcards for a recorded chat session.
    ///
    /// Steps are not transactional: a failure leaves the writes of earlier steps behind.
    async fn generate(
        &self,
        session: &SessionContext,
        chat_session_id: Uuid,
        user_input: &str,
    ) -> ServiceResult<GeneratedSet>;

    async fn get_set(
        &self,
        session: &SessionContext,
        set_id: Uuid,
    ) -> ServiceResult<FlashcardSetDetails>;
}

#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub generated: GeneratedSet,
    pub chat_session: entities::ChatSession,
    pub profile: entities::Profile,
}

#[async_trait]
pub trait GenerationWorkflow: Send + Sync {
    /// Quota gate, chat session, generation and quota consumption in one call.
    async fn run(
        &self,
        session: &SessionContext,
        user_input: &str,
        today: NaiveDate,
    ) -> ServiceResult<WorkflowOutcome>;
}

#[async_trait]
pub trait AdminService: Send + Sync {
    /// All profiles, newest first.
    async fn list_profiles(&self, session: &SessionContext) -> ServiceResult<Vec<entities::Profile>>;

    async fn grant_pro(&self, session: &SessionContext, user_id: Uuid) -> ServiceResult<entities::Profile>;
}
