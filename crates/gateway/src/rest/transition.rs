//! Weekly plan and the scheduled reminder trigger

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use offramp_transition::{PlannedWeek, ReminderSweep};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    #[schema(value_type = Vec<Object>)]
    pub plan: Vec<PlannedWeek>,
}

/// Routes that need a signed-in user
pub fn create_plan_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/transition/plan", get(get_plan))
}

/// The reminder trigger, guarded by the cron secret instead of a session
pub fn create_reminder_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/api/transition/reminder", get(run_reminders))
}

#[utoipa::path(
    get,
    path = "/api/transition/plan",
    tag = "transition",
    responses(
        (status = 200, description = "Weekly plan ordered by week number", body = PlanResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn get_plan(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> GatewayResult<Json<PlanResponse>> {
    let plan = state.plan_service.weekly_plan(&user.id).await?;
    Ok(Json(PlanResponse { plan }))
}

#[utoipa::path(
    get,
    path = "/api/transition/reminder",
    tag = "transition",
    params(
        ("x-cron-secret" = Option<String>, Header, description = "Shared secret of the scheduler")
    ),
    responses(
        (status = 200, description = "Users whose swap reminder fired this minute"),
        (status = 403, description = "Cron secret mismatch", body = ErrorResponse)
    )
)]
pub async fn run_reminders(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Json<ReminderSweep>> {
    if let Some(expected) = state.cron_secret.as_deref() {
        let provided = headers
            .get(CRON_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected) {
            warn!("reminder trigger rejected, cron secret mismatch");
            return Err(GatewayError::Forbidden("Forbidden".to_string()));
        }
    }

    let sweep = state.reminder_service.sweep(Utc::now()).await?;
    Ok(Json(sweep))
}
