//! Dashboard progress and impact

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use offramp_transition::{DashboardProgress, ImpactMetrics};

use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

/// Create dashboard routes
pub fn create_dashboard_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/dashboard/progress", get(get_progress))
        .route("/api/dashboard/impact", get(get_impact))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/progress",
    tag = "dashboard",
    responses(
        (status = 200, description = "Meals replaced, current week and completion"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Onboarding not completed", body = ErrorResponse)
    )
)]
pub async fn get_progress(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<DashboardProgress>> {
    Ok(Json(state.progress_service.dashboard(&user.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/impact",
    tag = "dashboard",
    responses(
        (status = 200, description = "CO2, water and money saved so far"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_impact(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<ImpactMetrics>> {
    Ok(Json(state.progress_service.impact(&user.id).await?))
}
