//! Flashcard set retrieval and the card viewer

use crate::api::{BearerToken, PathParams, QueryParams};
use crate::api::error::ApiError;
use crate::api::flashcard_sets::schemas::{FlashcardSet, ViewQuery, ViewerAction, ViewerState};
use crate::core::traits::{AuthService, FlashcardService};
use crate::core::viewer::{FlashcardViewer, ViewerError};
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;
use uuid::Uuid;

pub fn router() -> Router {
    Router::new()
        .route("/:id", get(get_flashcard_set))
        .route("/:id/view", get(view_flashcard_set))
}

impl From<ViewerError> for ApiError {
    fn from(err: ViewerError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

async fn get_flashcard_set(
    Inject(auth): Inject<dyn AuthService>,
    Inject(flashcard_service): Inject<dyn FlashcardService>,
    bearer: BearerToken,
    PathParams(set_id): PathParams<Uuid>,
) -> Result<Json<FlashcardSet>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let details = flashcard_service.get_set(&session, set_id).await?;

    Ok(Json(details.into()))
}

/// Applies one viewer action to the state carried in the query string and returns the
/// resulting view. The client keeps `index` and `flipped` between requests.
async fn view_flashcard_set(
    Inject(auth): Inject<dyn AuthService>,
    Inject(flashcard_service): Inject<dyn FlashcardService>,
    bearer: BearerToken,
    PathParams(set_id): PathParams<Uuid>,
    QueryParams(query): QueryParams<ViewQuery>,
) -> Result<Json<ViewerState>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let details = flashcard_service.get_set(&session, set_id).await?;

    if details.flashcards.is_empty() {
        return Ok(Json(ViewerState::Empty));
    }

    let mut viewer = FlashcardViewer::at(details.flashcards, query.index, query.flipped)?;
    match query.action {
        None => {}
        Some(ViewerAction::Next) => viewer.next()?,
        Some(ViewerAction::Previous) => viewer.previous()?,
        Some(ViewerAction::Flip) => viewer.flip()?,
        Some(ViewerAction::Jump) => {
            let target = query
                .target
                .ok_or_else(|| ApiError::bad_request("`target` is required to jump"))?;
            viewer.jump_to(target)?;
        }
    }

    Ok(Json(ViewerState::from_viewer(&viewer)))
}

pub mod schemas {
    use crate::api::chat_sessions::schemas::ChatSession;
    use crate::core::traits::FlashcardSetDetails;
    use crate::core::viewer::{FlashcardViewer, ViewerView};
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Serialize, Debug)]
    pub struct Flashcard {
        pub id: Uuid,
        pub position: i64,
        pub question: String,
        pub answer: String,
        pub created_at: DateTime<Utc>,
    }

    impl From<entities::Flashcard> for Flashcard {
        fn from(card: entities::Flashcard) -> Self {
            Flashcard {
                id: card.id,
                position: card.position,
                question: card.question,
                answer: card.answer,
                created_at: card.created_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct FlashcardSet {
        pub id: Uuid,
        pub title: String,
        pub created_at: DateTime<Utc>,
        pub chat_session: Option<ChatSession>,
        pub flashcards: Vec<Flashcard>,
    }

    impl From<FlashcardSetDetails> for FlashcardSet {
        fn from(details: FlashcardSetDetails) -> Self {
            FlashcardSet {
                id: details.set.id,
                title: details.set.title,
                created_at: details.set.created_at,
                chat_session: details.chat_session.map(ChatSession::from),
                flashcards: details.flashcards.into_iter().map(Flashcard::from).collect(),
            }
        }
    }

    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum ViewerAction {
        Next,
        Previous,
        Flip,
        Jump,
    }

    #[derive(Deserialize, Debug)]
    pub struct ViewQuery {
        #[serde(default)]
        pub index: usize,
        #[serde(default)]
        pub flipped: bool,
        pub action: Option<ViewerAction>,
        pub target: Option<usize>,
    }

    #[derive(Serialize, Debug)]
    #[serde(tag = "state", rename_all = "lowercase")]
    pub enum ViewerState {
        Empty,
        Card {
            /// 0-based, to send back as `index` on the next request.
            index: usize,
            position: usize,
            total: usize,
            flipped: bool,
            face: String,
            question: String,
            answer: String,
            progress_percent: u32,
        },
    }

    impl ViewerState {
        pub fn from_viewer(viewer: &FlashcardViewer<entities::Flashcard>) -> Self {
            match (viewer.view(), viewer.current()) {
                (
                    ViewerView::Card {
                        position,
                        total,
                        flipped,
                        face,
                        progress_percent,
                    },
                    Some(card),
                ) => ViewerState::Card {
                    index: viewer.index(),
                    position,
                    total,
                    flipped,
                    face: face.to_owned(),
                    question: card.question.clone(),
                    answer: card.answer.clone(),
                    progress_percent,
                },
                _ => ViewerState::Empty,
            }
        }
    }
}
