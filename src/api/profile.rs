//! Profile and upgrade endpoints

use crate::api::{BearerToken, JsonBody};
use crate::api::error::ApiError;
use crate::api::profile::schemas::{Profile, UpgradeRequest};
use crate::core::traits::{AuthService, ProfileService};
use axum::routing::{get, post};
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/", get(current_profile))
        .route("/upgrade", post(request_upgrade))
}

async fn current_profile(
    Inject(auth): Inject<dyn AuthService>,
    Inject(profile_service): Inject<dyn ProfileService>,
    bearer: BearerToken,
) -> Result<Json<Profile>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let profile = profile_service.current(&session).await?;

    Ok(Json(profile.into()))
}

async fn request_upgrade(
    Inject(auth): Inject<dyn AuthService>,
    Inject(profile_service): Inject<dyn ProfileService>,
    bearer: BearerToken,
    JsonBody(request): JsonBody<UpgradeRequest>,
) -> Result<Json<Profile>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let profile = profile_service
        .request_upgrade(&session, request.preferred_payment.as_deref())
        .await?;

    Ok(Json(profile.into()))
}

pub mod schemas {
    use crate::infrastructure::entities;
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Serialize, Debug)]
    pub struct Profile {
        pub id: Uuid,
        pub email: String,
        pub created_at: DateTime<Utc>,
        pub last_login: Option<DateTime<Utc>>,
        pub is_pro: bool,
        pub daily_queries: i64,
        pub last_query_date: Option<NaiveDate>,
        pub preferred_payment: Option<entities::PaymentMethod>,
        pub preferred_payment_name: Option<&'static str>,
    }

    impl From<entities::Profile> for Profile {
        fn from(profile: entities::Profile) -> Self {
            Profile {
                id: profile.id,
                email: profile.email,
                created_at: profile.created_at,
                last_login: profile.last_login,
                is_pro: profile.is_pro,
                daily_queries: profile.daily_queries,
                last_query_date: profile.last_query_date,
                preferred_payment: profile.preferred_payment,
                preferred_payment_name: profile.preferred_payment.map(|m| m.display_name()),
            }
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct UpgradeRequest {
        /// Kept as a string so an unknown method is a validation error, not a decode error.
        pub preferred_payment: Option<String>,
    }
}
