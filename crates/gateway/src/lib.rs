//! # OffRamp Gateway Crate
//!
//! The HTTP surface of the OffRamp backend. Requests are routed to the domain
//! crates (users, transition, dishes, integrations) and their errors are
//! rendered as `{"error": message}` bodies.
//!
//! ## Architecture
//!
//! - **REST**: HTTP API endpoints with OpenAPI documentation
//! - **State**: Shared services, the dish catalog and upload storage settings
//! - **Middleware**: Session authentication, CORS and request logging
//!
//! ## Usage
//!
//! ```rust,ignore
//! use offramp_gateway::{create_router, GatewayState};
//!
//! let state = GatewayState::from_config(&config).await?;
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use middleware::{auth_middleware, CurrentUser, SESSION_COOKIE};
pub use state::GatewayState;

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware as axum_middleware, Router,
};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let media = create_media_routes(&state.storage.root);
    let arc_state = Arc::new(state);

    let mut router = Router::new()
        .merge(rest::create_rest_routes(arc_state.clone()).with_state(arc_state))
        .merge(media)
        .fallback(route_not_found);

    // Add Swagger UI if in debug mode
    #[cfg(debug_assertions)]
    {
        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::auth::register,
                rest::auth::login,
                rest::auth::logout,
                rest::auth::session,
                rest::profile::get_profile,
                rest::profile::update_profile,
                rest::profile::get_profile_preferences,
                rest::profile::update_profile_preferences,
                rest::preferences::save_preferences,
                rest::preferences::get_preferences,
                rest::transition::get_plan,
                rest::transition::run_reminders,
                rest::swaps::record_swap,
                rest::swaps::recent_swaps,
                rest::swaps::upload_image,
                rest::dashboard::get_progress,
                rest::dashboard::get_impact,
                rest::dishes::search_dishes,
                rest::dishes::list_categories,
                rest::dishes::get_dish,
                rest::integrations::veganswap_swap,
                rest::integrations::suggest,
                rest::integrations::cost_savings,
                rest::integrations::chat,
            ),
            components(
                schemas(
                    error::ErrorResponse,
                    rest::health::HealthResponse,
                    rest::auth::AccountResponse,
                    rest::auth::RegisterResponse,
                    rest::auth::SessionUserResponse,
                    rest::auth::LoginResponse,
                    rest::auth::SessionResponse,
                    rest::auth::MessageResponse,
                    rest::profile::ProfileResponse,
                    rest::profile::ProfileEnvelope,
                    rest::profile::ProfilePreferencesResponse,
                    rest::profile::SuccessResponse,
                    rest::preferences::LatestPreferenceResponse,
                    rest::transition::PlanResponse,
                    rest::swaps::RecentSwapsResponse,
                    rest::swaps::UploadImageResponse,
                    rest::dishes::SearchResponse,
                    rest::dishes::CategoriesResponse,
                    rest::integrations::SavingsResponse,
                )
            ),
            tags(
                (name = "health", description = "Liveness"),
                (name = "auth", description = "Registration, login and sessions"),
                (name = "profile", description = "Profile and account preferences"),
                (name = "transition", description = "Onboarding, weekly plan and reminders"),
                (name = "swaps", description = "Swap logging and photos"),
                (name = "dashboard", description = "Progress and impact"),
                (name = "dishes", description = "Plant-based dish catalog"),
                (name = "integrations", description = "VeganSwap and OpenRouter proxies, dish assistant chat"),
            )
        )]
        struct ApiDoc;

        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(middleware::create_cors_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}

/// Uploaded swap photos, served read-only and never sniffed or run as active content.
fn create_media_routes(root: &Path) -> Router {
    Router::new()
        .nest_service("/media", ServeDir::new(root))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; sandbox"),
        ))
}

async fn route_not_found() -> GatewayError {
    GatewayError::NotFound("Route not found".to_string())
}
