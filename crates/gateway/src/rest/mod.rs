//! REST API endpoints for the gateway

pub mod auth;
pub mod dashboard;
pub mod dishes;
pub mod health;
pub mod integrations;
pub mod preferences;
pub mod profile;
pub mod swaps;
pub mod transition;

use std::sync::Arc;

use axum::{body::Bytes, middleware, Router};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::middleware::auth_middleware;
use crate::state::GatewayState;

/// Create all REST API routes
pub fn create_rest_routes(state: Arc<GatewayState>) -> Router<Arc<GatewayState>> {
    let protected = Router::new()
        .merge(profile::create_profile_routes())
        .merge(preferences::create_preference_routes())
        .merge(transition::create_plan_routes())
        .merge(swaps::create_swap_routes(&state.storage))
        .merge(dashboard::create_dashboard_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::create_health_routes())
        .merge(auth::create_auth_routes())
        .merge(dishes::create_dish_routes())
        .merge(integrations::create_integration_routes())
        .merge(transition::create_reminder_routes())
        .merge(protected)
}

/// Parse a request body as JSON, answering 400 with `message` when it is not.
pub(crate) fn parse_json(body: &Bytes, message: &str) -> GatewayResult<Value> {
    serde_json::from_slice(body).map_err(|_| GatewayError::BadRequest(message.to_string()))
}

pub(crate) const INVALID_JSON_BODY: &str = "Invalid JSON body";
