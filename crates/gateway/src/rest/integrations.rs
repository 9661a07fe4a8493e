//! Proxies to the VeganSwap engine and OpenRouter, and the dish assistant chat

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use offramp_integrations::{
    veganswap, ChatReply, ChatRequest, CostSavingsInput, IntegrationError, SuggestOutcome,
    VeganSwapRequest, VeganSwapResponse, FALLBACK_REPLY,
};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::parse_json;
use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SavingsResponse {
    /// Estimated rupees saved per plate, null when the model gave no number
    pub savings: Option<i64>,
}

/// Create integration proxy routes
pub fn create_integration_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/veganswap/swap", post(veganswap_swap))
        .route("/api/suggest", post(suggest))
        .route("/api/cost-savings", post(cost_savings))
        .route("/api/chat", post(chat))
}

#[utoipa::path(
    post,
    path = "/api/veganswap/swap",
    tag = "integrations",
    responses(
        (status = 200, description = "Vegan dishes for the requested dish, with request meta"),
        (status = 400, description = "Invalid JSON payload or missing dishName", body = ErrorResponse),
        (status = 500, description = "VeganSwap is not configured", body = ErrorResponse),
        (status = 502, description = "VeganSwap backend unreachable", body = ErrorResponse)
    )
)]
pub async fn veganswap_swap(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> GatewayResult<Json<VeganSwapResponse>> {
    if !state.veganswap.is_configured() {
        return Err(IntegrationError::NotConfigured(veganswap::NOT_CONFIGURED.to_string()).into());
    }

    let body = parse_json(&body, "Invalid JSON payload")?;
    let request = VeganSwapRequest::from_json(&body);

    Ok(Json(state.veganswap.swap(&request).await?))
}

#[utoipa::path(
    post,
    path = "/api/suggest",
    tag = "integrations",
    responses(
        (status = 200, description = "Suggestions from OpenRouter or the built-in fallback list"),
        (status = 400, description = "Query is required", body = ErrorResponse)
    )
)]
pub async fn suggest(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> GatewayResult<Json<SuggestOutcome>> {
    // An unreadable body is treated as an empty query.
    let body = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
    let query = body.get("query").and_then(Value::as_str).unwrap_or_default();
    let preferences = body.get("preferences").cloned().unwrap_or_else(|| json!({}));

    Ok(Json(state.openrouter.suggest(query, &preferences).await?))
}

#[utoipa::path(
    post,
    path = "/api/cost-savings",
    tag = "integrations",
    responses(
        (status = 200, description = "Estimated savings in rupees", body = SavingsResponse),
        (status = 400, description = "Invalid payload or missing fields", body = ErrorResponse),
        (status = 500, description = "OpenRouter key missing or unreachable", body = ErrorResponse),
        (status = 502, description = "OpenRouter returned an error", body = ErrorResponse)
    )
)]
pub async fn cost_savings(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> GatewayResult<Json<SavingsResponse>> {
    let invalid = || GatewayError::BadRequest("Invalid request payload".to_string());
    let body = parse_json(&body, "Invalid request payload")?;
    let input: CostSavingsInput = serde_json::from_value(body).map_err(|_| invalid())?;

    let savings = state.openrouter.cost_savings(&input).await?;
    Ok(Json(SavingsResponse { savings }))
}

#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "integrations",
    responses(
        (status = 200, description = "OpenRouter completion relayed as text/event-stream, or a plain-text fallback reply")
    )
)]
pub async fn chat(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    // Any unusable body gets the fallback reply rather than an error.
    let Ok(body) = serde_json::from_slice::<Value>(&body) else {
        return fallback_reply();
    };
    let request = ChatRequest::from_json(&body);

    match state.chat.reply(&request).await {
        ChatReply::Stream(stream) => (
            [
                (header::CONTENT_TYPE, "text/event-stream"),
                (header::CACHE_CONTROL, "no-cache, no-transform"),
            ],
            Body::from_stream(stream),
        )
            .into_response(),
        ChatReply::Fallback => fallback_reply(),
    }
}

fn fallback_reply() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        FALLBACK_REPLY,
    )
        .into_response()
}
