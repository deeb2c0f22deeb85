//! The composed generation flow used by the web client

use crate::api::{BearerToken, JsonBody};
use crate::api::error::ApiError;
use crate::api::flashcards::schemas::{GenerateRequest, GenerateResponse};
use crate::core::quota;
use crate::core::traits::{AuthService, GenerationWorkflow};
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;
use log::info;

pub fn router() -> Router {
    Router::new().route("/generate", post(generate))
}

async fn generate(
    Inject(auth): Inject<dyn AuthService>,
    Inject(workflow): Inject<dyn GenerationWorkflow>,
    bearer: BearerToken,
    JsonBody(request): JsonBody<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let outcome = workflow
        .run(&session, &request.user_input, quota::today())
        .await?;

    info!(
        "Generated {} flashcards for {}, {} generations left today",
        outcome.generated.flashcard_count, session.email, outcome.profile.daily_queries
    );

    Ok(Json(GenerateResponse {
        success: true,
        flashcard_set_id: outcome.generated.set_id,
        flashcards_count: outcome.generated.flashcard_count,
        chat_session_id: outcome.chat_session.id,
        daily_queries: outcome.profile.daily_queries,
        is_pro: outcome.profile.is_pro,
    }))
}

pub mod schemas {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Deserialize, Debug)]
    pub struct GenerateRequest {
        pub user_input: String,
    }

    #[derive(Serialize, Debug)]
    pub struct GenerateResponse {
        pub success: bool,
        pub flashcard_set_id: Uuid,
        pub flashcards_count: usize,
        pub chat_session_id: Uuid,
        pub daily_queries: i64,
        pub is_pro: bool,
    }
}
