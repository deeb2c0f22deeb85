//! Admin endpoints for listing accounts and granting Pro

use crate::api::{BearerToken, PathParams};
use crate::api::error::ApiError;
use crate::api::admin::schemas::ProfileList;
use crate::api::profile::schemas::Profile;
use crate::core::traits::{AdminService, AuthService};
use axum::routing::{get, post};
use axum::{Json, Router};
use di_axum::Inject;
use uuid::Uuid;

pub fn router() -> Router {
    Router::new()
        .route("/profiles", get(list_profiles))
        .route("/profiles/:id/pro", post(grant_pro))
}

async fn list_profiles(
    Inject(auth): Inject<dyn AuthService>,
    Inject(admin): Inject<dyn AdminService>,
    bearer: BearerToken,
) -> Result<Json<ProfileList>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let profiles = admin.list_profiles(&session).await?;

    Ok(Json(ProfileList {
        profiles: profiles.into_iter().map(Profile::from).collect(),
    }))
}

async fn grant_pro(
    Inject(auth): Inject<dyn AuthService>,
    Inject(admin): Inject<dyn AdminService>,
    bearer: BearerToken,
    PathParams(user_id): PathParams<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let session = bearer.resolve(&*auth).await?;
    let profile = admin.grant_pro(&session, user_id).await?;

    Ok(Json(profile.into()))
}

pub mod schemas {
    use crate::api::profile::schemas::Profile;
    use serde::Serialize;

    #[derive(Serialize, Debug)]
    pub struct ProfileList {
        pub profiles: Vec<Profile>,
    }
}
