//! Onboarding preference endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use offramp_database::UserPreference;
use offramp_transition::{SavePreferencesInput, SavedPreferences};
use serde::Serialize;
use utoipa::ToSchema;

use super::{parse_json, INVALID_JSON_BODY};
use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct LatestPreferenceResponse {
    #[schema(value_type = Option<Object>)]
    pub preferences: Option<UserPreference>,
}

/// Create onboarding preference routes
pub fn create_preference_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/preferences/save", post(save_preferences))
        .route("/api/preferences/get", get(get_preferences))
}

#[utoipa::path(
    post,
    path = "/api/preferences/save",
    tag = "transition",
    responses(
        (status = 200, description = "Preference stored and weekly plan rebuilt"),
        (status = 400, description = "Missing preference name", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn save_preferences(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Bytes,
) -> GatewayResult<Json<SavedPreferences>> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let input: SavePreferencesInput = serde_json::from_value(body)
        .map_err(|_| GatewayError::BadRequest(INVALID_JSON_BODY.to_string()))?;

    let saved = state.preference_service.save(&user.id, &input).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    get,
    path = "/api/preferences/get",
    tag = "transition",
    responses(
        (status = 200, description = "Most recently updated preference, or null", body = LatestPreferenceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_preferences(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<LatestPreferenceResponse>> {
    let preferences = state.preference_service.latest(&user.id).await?;
    Ok(Json(LatestPreferenceResponse { preferences }))
}
