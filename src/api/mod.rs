use crate::api::error::ApiError;
use crate::core::session::SessionContext;
use crate::core::traits::AuthService;
use async_trait::async_trait;
use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

pub mod admin;
pub mod auth;
pub mod chat_sessions;
pub mod error;
pub mod flashcard_sets;
pub mod flashcards;
pub mod functions;
pub mod profile;

const BEARER_PREFIX: &str = "Bearer ";

/// The raw token from an `Authorization: Bearer <token>` header.
#[derive(Debug)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Resolves the token into the caller's session.
    pub async fn resolve(&self, auth: &dyn AuthService) -> Result<SessionContext, ApiError> {
        Ok(auth.resolve(&self.0).await?)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, ApiError> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Err(ApiError::unauthorized("`Authorization` header is missing"));
        };

        let header = header
            .to_str()
            .map_err(|_| ApiError::unauthorized("invalid authorization header"))?;

        match header.strip_prefix(BEARER_PREFIX).map(str::trim) {
            Some(token) if !token.is_empty() => Ok(BearerToken(token.to_owned())),
            _ => Err(ApiError::unauthorized("invalid authorization header")),
        }
    }
}

/// `axum::Json` body that rejects with an [`ApiError`] JSON body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// `Path` parameters that reject with an [`ApiError`] JSON body.
#[derive(Debug)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParams(value))
    }
}

/// Query string that rejects with an [`ApiError`] JSON body.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, ApiError> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}

/// Every route of the service except the generation function, which carries its own
/// permissive CORS policy and is merged separately.
pub fn router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/chat-sessions", chat_sessions::router())
        .nest("/flashcards", flashcards::router())
        .nest("/flashcard-sets", flashcard_sets::router())
        .nest("/admin", admin::router())
}
