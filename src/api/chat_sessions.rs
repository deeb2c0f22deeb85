//! Chat session endpoints

use crate::api::{BearerToken, JsonBody, PathParams};
use crate::api::chat_sessions::schemas::{
    ChatSession, ChatSessionList, CreateChatSession, CreatedChatSession, FlashcardSetRef,
};
use crate::api::error::ApiError;
use crate::core::traits::{AuthService, ChatSessionService};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;
use uuid::Uuid;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_chat_sessions).post(new_chat_session))
        .route("/:id/flashcard-set", get(chat_session_flashcard_set))
}

async fn list_chat_sessions(
    Inject(auth): Inject<dyn AuthService>,
    Inject(chat_session_service): Inject<dyn ChatSessionService>,
    bearer: BearerToken,
) -> Result<Json<ChatSessionList>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let chat_sessions = chat_session_service.list(&session).await?;

    Ok(Json(ChatSessionList {
        chat_sessions: chat_sessions.into_iter().map(ChatSession::from).collect(),
    }))
}

async fn new_chat_session(
    Inject(auth): Inject<dyn AuthService>,
    Inject(chat_session_service): Inject<dyn ChatSessionService>,
    bearer: BearerToken,
    JsonBody(create): JsonBody<CreateChatSession>,
) -> Result<(StatusCode, Json<CreatedChatSession>), ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let chat_session = chat_session_service
        .record(&session, &create.user_input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedChatSession {
            id: chat_session.id,
            title: chat_session.title,
        }),
    ))
}

async fn chat_session_flashcard_set(
    Inject(auth): Inject<dyn AuthService>,
    Inject(chat_session_service): Inject<dyn ChatSessionService>,
    bearer: BearerToken,
    PathParams(chat_session_id): PathParams<Uuid>,
) -> Result<Json<FlashcardSetRef>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let set = chat_session_service
        .flashcard_set_for(&session, chat_session_id)
        .await?;

    Ok(Json(FlashcardSetRef {
        flashcard_set_id: set.id,
    }))
}

pub mod schemas {
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Deserialize, Debug)]
    pub struct CreateChatSession {
        pub user_input: String,
    }

    #[derive(Serialize, Debug)]
    pub struct CreatedChatSession {
        pub id: Uuid,
        pub title: String,
    }

    #[derive(Serialize, Debug)]
    pub struct ChatSession {
        pub id: Uuid,
        pub title: String,
        pub user_input: String,
        pub ai_raw_response: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    impl From<entities::ChatSession> for ChatSession {
        fn from(chat_session: entities::ChatSession) -> Self {
            ChatSession {
                id: chat_session.id,
                title: chat_session.title,
                user_input: chat_session.user_input,
                ai_raw_response: chat_session.ai_raw_response,
                created_at: chat_session.created_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct ChatSessionList {
        pub chat_sessions: Vec<ChatSession>,
    }

    #[derive(Serialize, Debug)]
    pub struct FlashcardSetRef {
        pub flashcard_set_id: Uuid,
    }
}
