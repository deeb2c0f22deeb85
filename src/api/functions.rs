//! The standalone generation function.
//!
//! Called by clients that already recorded a chat session. Every response carries the
//! permissive CORS headers and bare `OPTIONS` requests are answered with them alone.

use crate::api::error::ApiError;
use crate::api::functions::schemas::{GenerateFlashcards, GeneratedFlashcards};
use crate::api::{BearerToken, JsonBody};
use crate::core::traits::{AuthService, FlashcardService};
use axum::http::StatusCode;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue,
};
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;
use log::warn;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

const FAILURE_HEADLINE: &str = "Failed to generate flashcards";

pub fn router() -> Router {
    let cors_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("authorization, content-type"),
        ));

    Router::new()
        .route(
            "/functions/generate-flashcards",
            post(generate_flashcards).options(preflight),
        )
        .layer(cors_headers)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Extraction failures are taken as values so that every failure, including a malformed
/// body or a missing token, is reported under the function's headline.
async fn generate_flashcards(
    Inject(auth): Inject<dyn AuthService>,
    Inject(flashcard_service): Inject<dyn FlashcardService>,
    bearer: Result<BearerToken, ApiError>,
    request: Result<JsonBody<GenerateFlashcards>, ApiError>,
) -> Result<Json<GeneratedFlashcards>, ApiError> {
    generate(&*auth, &*flashcard_service, bearer, request)
        .await
        .map(Json)
        .map_err(|err| err.headline(FAILURE_HEADLINE))
}

async fn generate(
    auth: &dyn AuthService,
    flashcard_service: &dyn FlashcardService,
    bearer: Result<BearerToken, ApiError>,
    request: Result<JsonBody<GenerateFlashcards>, ApiError>,
) -> Result<GeneratedFlashcards, ApiError> {
    let session = bearer?.resolve(auth).await?;
    let JsonBody(request) = request?;

    let generated = flashcard_service
        .generate(&session, request.chat_session_id, &request.user_input)
        .await
        .inspect_err(|err| {
            warn!("Flashcard generation for {} failed: {err}", request.chat_session_id)
        })?;

    Ok(GeneratedFlashcards {
        success: true,
        flashcard_set_id: generated.set_id,
        flashcards_count: generated.flashcard_count,
    })
}

pub mod schemas {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Deserialize, Debug)]
    pub struct GenerateFlashcards {
        pub chat_session_id: Uuid,
        pub user_input: String,
    }

    #[derive(Serialize, Debug)]
    pub struct GeneratedFlashcards {
        pub success: bool,
        pub flashcard_set_id: Uuid,
        pub flashcards_count: usize,
    }
}
