//! Sign-up, sign-in and sign-out endpoints

use crate::api::{BearerToken, JsonBody};
use crate::api::auth::schemas::{Credentials, SessionResponse};
use crate::api::error::ApiError;
use crate::core::traits::AuthService;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(sign_in))
        .route("/logout", post(sign_out))
}

async fn sign_up(
    Inject(auth): Inject<dyn AuthService>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let issued = auth
        .sign_up(&credentials.email, &credentials.password)
        .await?;

    Ok((StatusCode::CREATED, Json(issued.into())))
}

async fn sign_in(
    Inject(auth): Inject<dyn AuthService>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<SessionResponse>, ApiError> {
    let issued = auth
        .sign_in(&credentials.email, &credentials.password)
        .await?;

    Ok(Json(issued.into()))
}

async fn sign_out(
    Inject(auth): Inject<dyn AuthService>,
    bearer: BearerToken,
) -> Result<StatusCode, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    auth.sign_out(&session).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub mod schemas {
    use crate::api::profile::schemas::Profile;
    use crate::core::session::IssuedSession;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug)]
    pub struct Credentials {
        pub email: String,
        pub password: String,
    }

    #[derive(Serialize, Debug)]
    pub struct SessionResponse {
        pub token: String,
        pub expires_at: DateTime<Utc>,
        pub profile: Profile,
    }

    impl From<IssuedSession> for SessionResponse {
        fn from(issued: IssuedSession) -> Self {
            SessionResponse {
                token: issued.token,
                expires_at: issued.expires_at,
                profile: issued.profile.into(),
            }
        }
    }
}
