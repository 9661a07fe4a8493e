//! Profile REST endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use offramp_users::{ProfilePreferencesUpdate, ProfileUpdate, User};
use serde::Serialize;
use utoipa::ToSchema;

use super::{parse_json, INVALID_JSON_BODY};
use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub budget_level: Option<String>,
    pub transition_from_diet: Option<String>,
    pub transition_to_diet: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            phone: user.phone,
            city: user.city,
            region: user.region,
            budget_level: user.budget_level.map(|level| level.as_str().to_string()),
            transition_from_diet: user.transition_from_diet,
            transition_to_diet: user.transition_to_diet,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileEnvelope {
    pub profile: ProfileResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreferencesResponse {
    pub region: Option<String>,
    /// 1 (low) to 3 (high).
    pub budget_level: Option<u8>,
    pub cuisines: Vec<String>,
    pub allergies: Vec<String>,
    pub transition_from_diet: Option<String>,
    pub transition_to_diet: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Create profile routes
pub fn create_profile_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/profile", get(get_profile).post(update_profile))
        .route(
            "/api/profile/preferences",
            get(get_profile_preferences).put(update_profile_preferences),
        )
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    responses(
        (status = 200, description = "The signed-in user's profile", body = ProfileEnvelope),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<ProfileEnvelope>> {
    let profile = state.profile_service.profile(&user.id).await?;
    Ok(Json(ProfileEnvelope {
        profile: profile.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/profile",
    tag = "profile",
    responses(
        (status = 200, description = "Profile updated", body = SuccessResponse),
        (status = 400, description = "Invalid JSON body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Bytes,
) -> GatewayResult<Json<SuccessResponse>> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let update = ProfileUpdate::from_json(&body)?;

    state.profile_service.update_profile(&user.id, update).await?;
    Ok(SuccessResponse::ok())
}

#[utoipa::path(
    get,
    path = "/api/profile/preferences",
    tag = "profile",
    responses(
        (status = 200, description = "Region, budget, cuisines, allergies and diet transition", body = ProfilePreferencesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_profile_preferences(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<ProfilePreferencesResponse>> {
    let preferences = state.profile_service.preferences(&user.id).await?;

    Ok(Json(ProfilePreferencesResponse {
        region: preferences.region,
        budget_level: preferences.budget_level,
        cuisines: preferences.cuisines,
        allergies: preferences.allergies,
        transition_from_diet: preferences.transition_from_diet,
        transition_to_diet: preferences.transition_to_diet,
    }))
}

#[utoipa::path(
    put,
    path = "/api/profile/preferences",
    tag = "profile",
    responses(
        (status = 200, description = "Preferences updated", body = SuccessResponse),
        (status = 400, description = "Invalid JSON body or field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn update_profile_preferences(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Bytes,
) -> GatewayResult<Json<SuccessResponse>> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let update = ProfilePreferencesUpdate::from_json(&body)?;

    state
        .profile_service
        .update_preferences(&user.id, update)
        .await?;
    Ok(SuccessResponse::ok())
}
