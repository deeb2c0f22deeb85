//! Implementations for the service the app needs.
//!

use crate::config::AppConfig;
use crate::core::assistant::ResponseGenerator;
use crate::core::error::{ServiceError, ServiceResult};
use crate::core::parser::parse_flashcards;
use crate::core::quota::{self, DAILY_QUERY_ALLOWANCE, QuotaDecision};
use crate::core::session::{IssuedSession, SessionContext, generate_token, hash_token};
use crate::core::traits::{
    AdminService, AuthService, ChatSessionService, FlashcardService, FlashcardSetDetails,
    GeneratedSet, GenerationWorkflow, ProfileService, WorkflowOutcome,
};
use crate::infrastructure::entities::{
    AuthSession, ChatSession, Flashcard, FlashcardSet, PaymentMethod, Profile,
};
use crate::infrastructure::traits::{
    AuthSessionRepository, ChatSessionRepository, FlashcardRepository, ProfileRepository,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use di::{Ref, injectable};
use log::{info, warn};
use uuid::Uuid;

const CHAT_TITLE_CHARS: usize = 50;
const SET_TITLE_CHARS: usize = 30;
const MIN_PASSWORD_CHARS: usize = 6;

/// Title of a chat session: the start of the notes, with `...` when cut.
pub fn chat_title(user_input: &str) -> String {
    let mut title: String = user_input.chars().take(CHAT_TITLE_CHARS).collect();
    if user_input.chars().count() > CHAT_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

/// Title of a flashcard set. The ellipsis is always appended.
pub fn set_title(user_input: &str) -> String {
    let start: String = user_input.chars().take(SET_TITLE_CHARS).collect();
    format!("Flashcards: {start}...")
}

fn ensure_notes(user_input: &str) -> ServiceResult<()> {
    if user_input.trim().is_empty() {
        return Err(ServiceError::validation(
            "Please enter some text to generate flashcards",
        ));
    }
    Ok(())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[injectable(AuthService)]
pub struct MyAuthService {
    profiles: Ref<dyn ProfileRepository>,
    sessions: Ref<dyn AuthSessionRepository>,
    config: Ref<AppConfig>,
}

impl MyAuthService {
    async fn open_session(&self, profile: Profile) -> ServiceResult<IssuedSession> {
        let token = generate_token();
        let now = Utc::now();

        let session = self
            .sessions
            .create_session(AuthSession {
                token_hash: hash_token(&token),
                user_id: profile.id,
                created_at: now,
                expires_at: now + self.config.session_ttl(),
            })
            .await?;

        info!("session opened for {}", profile.email);

        Ok(IssuedSession {
            token,
            expires_at: session.expires_at,
            profile,
        })
    }
}

#[async_trait]
impl AuthService for MyAuthService {
    async fn sign_up(&self, email: &str, password: &str) -> ServiceResult<IssuedSession> {
        let email = normalize_email(email);

        if !email.contains('@') || email.len() < 3 {
            return Err(ServiceError::validation("Please enter a valid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(ServiceError::validation(format!(
                "Password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        if self.profiles.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "An account for {email} already exists"
            )));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        let profile = self
            .profiles
            .create_profile(Profile {
                id: Uuid::new_v4(),
                email,
                password_hash,
                created_at: Utc::now(),
                last_login: None,
                is_pro: false,
                daily_queries: DAILY_QUERY_ALLOWANCE,
                last_query_date: None,
                preferred_payment: None,
            })
            .await?;

        info!("new account {}", profile.email);

        self.sign_in(&profile.email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<IssuedSession> {
        let email = normalize_email(email);

        let Some(profile) = self.profiles.find_by_email(&email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };

        if !bcrypt::verify(password, &profile.password_hash)? {
            warn!("failed sign in for {email}");
            return Err(ServiceError::InvalidCredentials);
        }

        self.profiles.touch_last_login(profile.id).await?;
        let profile = self
            .profiles
            .find_by_id(profile.id)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        self.open_session(profile).await
    }

    async fn resolve(&self, token: &str) -> ServiceResult<SessionContext> {
        let token_hash = hash_token(token);

        let Some(session) = self.sessions.find_session(&token_hash).await? else {
            return Err(ServiceError::Unauthorized);
        };

        if session.expires_at <= Utc::now() {
            self.sessions.delete_session(&token_hash).await?;
            return Err(ServiceError::Unauthorized);
        }

        let profile = self
            .profiles
            .find_by_id(session.user_id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        Ok(SessionContext::new(&session, &profile))
    }

    async fn sign_out(&self, session: &SessionContext) -> ServiceResult<()> {
        self.sessions.delete_session(&session.token_hash).await?;
        info!("session closed for {}", session.email);
        Ok(())
    }
}

#[injectable(ProfileService)]
pub struct MyProfileService {
    profiles: Ref<dyn ProfileRepository>,
}

#[async_trait]
impl ProfileService for MyProfileService {
    async fn current(&self, session: &SessionContext) -> ServiceResult<Profile> {
        self.profiles
            .find_by_id(session.user_id)
            .await?
            .ok_or(ServiceError::NotFound("profile"))
    }

    async fn check_quota(&self, session: &SessionContext, today: NaiveDate) -> ServiceResult<Profile> {
        let profile = self.current(session).await?;

        match quota::evaluate(&profile, today) {
            QuotaDecision::ResetAndAllow => {
                info!("daily allowance restored for {}", profile.email);
                let profile = self
                    .profiles
                    .update_quota(profile.id, DAILY_QUERY_ALLOWANCE, today)
                    .await?;
                Ok(profile)
            }
            QuotaDecision::Allow => Ok(profile),
            QuotaDecision::Exhausted => Err(ServiceError::QuotaExceeded),
        }
    }

    async fn record_generation(&self, profile: Profile, today: NaiveDate) -> ServiceResult<Profile> {
        if profile.is_pro {
            return Ok(profile);
        }

        let profile = self
            .profiles
            .update_quota(profile.id, quota::consume(profile.daily_queries), today)
            .await?;

        Ok(profile)
    }

    async fn request_upgrade(
        &self,
        session: &SessionContext,
        preferred_payment: Option<&str>,
    ) -> ServiceResult<Profile> {
        let method = match preferred_payment.map(str::trim).filter(|m| !m.is_empty()) {
            None => return Err(ServiceError::validation("Please select a payment method")),
            Some(method) => method.parse::<PaymentMethod>().map_err(ServiceError::Validation)?,
        };

        let profile = self
            .profiles
            .set_preferred_payment(session.user_id, method)
            .await?;

        info!("{} asked to upgrade via {method}", profile.email);

        Ok(profile)
    }
}

#[injectable(ChatSessionService)]
pub struct MyChatSessionService {
    chat_sessions: Ref<dyn ChatSessionRepository>,
    flashcards: Ref<dyn FlashcardRepository>,
}

#[async_trait]
impl ChatSessionService for MyChatSessionService {
    async fn record(&self, session: &SessionContext, user_input: &str) -> ServiceResult<ChatSession> {
        ensure_notes(user_input)?;

        let chat_session = self
            .chat_sessions
            .create_chat_session(ChatSession {
                id: Uuid::new_v4(),
                user_id: session.user_id,
                user_input: user_input.to_owned(),
                ai_raw_response: None,
                title: chat_title(user_input),
                created_at: Utc::now(),
            })
            .await?;

        Ok(chat_session)
    }

    async fn list(&self, session: &SessionContext) -> ServiceResult<Vec<ChatSession>> {
        Ok(self.chat_sessions.list_chat_sessions(session.user_id).await?)
    }

    async fn flashcard_set_for(
        &self,
        session: &SessionContext,
        chat_session_id: Uuid,
    ) -> ServiceResult<FlashcardSet> {
        self.flashcards
            .find_set_by_chat_session(session.user_id, chat_session_id)
            .await?
            .ok_or(ServiceError::NotFound("flashcard set"))
    }
}

#[injectable(FlashcardService)]
pub struct MyFlashcardService {
    chat_sessions: Ref<dyn ChatSessionRepository>,
    flashcards: Ref<dyn FlashcardRepository>,
    generator: Ref<dyn ResponseGenerator>,
}

#[async_trait]
impl FlashcardService for MyFlashcardService {
    async fn generate(
        &self,
        session: &SessionContext,
        chat_session_id: Uuid,
        user_input: &str,
    ) -> ServiceResult<GeneratedSet> {
        let response = self.generator.generate(user_input).await?;
        let pairs = parse_flashcards(&response);

        if !self
            .chat_sessions
            .set_raw_response(session.user_id, chat_session_id, &response)
            .await?
        {
            return Err(ServiceError::NotFound("chat session"));
        }

        let set = self
            .flashcards
            .create_set(FlashcardSet {
                id: Uuid::new_v4(),
                chat_session_id,
                title: set_title(user_input),
                created_at: Utc::now(),
            })
            .await?;

        let created_at = Utc::now();
        let cards: Vec<Flashcard> = pairs
            .into_iter()
            .enumerate()
            .map(|(position, pair)| Flashcard {
                id: Uuid::new_v4(),
                set_id: set.id,
                position: position as i64,
                question: pair.question,
                answer: pair.answer,
                created_at,
            })
            .collect();
        let flashcard_count = cards.len();

        self.flashcards.insert_flashcards(cards).await?;

        info!("flashcard set {} created with {flashcard_count} cards", set.id);

        Ok(GeneratedSet {
            set_id: set.id,
            flashcard_count,
        })
    }

    async fn get_set(&self, session: &SessionContext, set_id: Uuid) -> ServiceResult<FlashcardSetDetails> {
        let set = self
            .flashcards
            .find_set(session.user_id, set_id)
            .await?
            .ok_or(ServiceError::NotFound("flashcard set"))?;

        let chat_session = self
            .chat_sessions
            .find_chat_session(session.user_id, set.chat_session_id)
            .await?;
        let flashcards = self.flashcards.list_flashcards(set.id).await?;

        Ok(FlashcardSetDetails {
            set,
            chat_session,
            flashcards,
        })
    }
}

#[injectable(GenerationWorkflow)]
pub struct MyGenerationWorkflow {
    profiles: Ref<dyn ProfileService>,
    chat_sessions: Ref<dyn ChatSessionService>,
    flashcards: Ref<dyn FlashcardService>,
}

#[async_trait]
impl GenerationWorkflow for MyGenerationWorkflow {
    async fn run(
        &self,
        session: &SessionContext,
        user_input: &str,
        today: NaiveDate,
    ) -> ServiceResult<WorkflowOutcome> {
        ensure_notes(user_input)?;

        self.profiles.check_quota(session, today).await?;

        let chat_session = self.chat_sessions.record(session, user_input).await?;
        let generated = self
            .flashcards
            .generate(session, chat_session.id, user_input)
            .await?;

        // Consume from the stored counters, not from the copy read before generating.
        let profile = self.profiles.current(session).await?;
        let profile = self.profiles.record_generation(profile, today).await?;

        Ok(WorkflowOutcome {
            generated,
            chat_session,
            profile,
        })
    }
}

#[injectable(AdminService)]
pub struct MyAdminService {
    profiles: Ref<dyn ProfileRepository>,
    config: Ref<AppConfig>,
}

impl MyAdminService {
    fn ensure_admin(&self, session: &SessionContext) -> ServiceResult<()> {
        if self.config.is_admin(&session.email) {
            Ok(())
        } else {
            warn!("{} tried to use the admin endpoints", session.email);
            Err(ServiceError::Forbidden)
        }
    }
}

#[async_trait]
impl AdminService for MyAdminService {
    async fn list_profiles(&self, session: &SessionContext) -> ServiceResult<Vec<Profile>> {
        self.ensure_admin(session)?;
        Ok(self.profiles.list_profiles().await?)
    }

    async fn grant_pro(&self, session: &SessionContext, user_id: Uuid) -> ServiceResult<Profile> {
        self.ensure_admin(session)?;

        let profile = self
            .profiles
            .set_pro(user_id, true)
            .await?
            .ok_or(ServiceError::NotFound("profile"))?;

        info!("{} upgraded {} to pro", session.email, profile.email);

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_title_short_input_is_kept() {
        assert_eq!(chat_title("Cell biology notes"), "Cell biology notes");
    }

    #[test]
    fn test_chat_title_truncates_at_fifty_chars() {
        let input = "a".repeat(50);
        assert_eq!(chat_title(&input), input);

        let input = "b".repeat(51);
        assert_eq!(chat_title(&input), format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn test_chat_title_counts_characters_not_bytes() {
        let input = "é".repeat(60);
        let title = chat_title(&input);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_set_title_always_has_ellipsis() {
        assert_eq!(set_title("Short"), "Flashcards: Short...");
        assert_eq!(
            set_title("The French Revolution began in 1789 and ended in 1799"),
            "Flashcards: The French Revolution began in...",
        );
    }

    #[test]
    fn test_blank_notes_are_rejected() {
        assert!(matches!(ensure_notes("   \n\t"), Err(ServiceError::Validation(_))));
        assert!(ensure_notes(" notes ").is_ok());
    }

    #[test]
    fn test_email_is_normalized() {
        assert_eq!(normalize_email("  Student@Example.COM "), "student@example.com");
    }
}
