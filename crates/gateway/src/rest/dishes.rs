//! Dish catalog REST endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use offramp_dishes::{DishDetail, ReplacementCategory, ReplacementGroup};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Dish to find plant-based swaps for, e.g. "butter chicken"
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    #[schema(value_type = Vec<Object>)]
    pub groups: Vec<ReplacementGroup>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    #[schema(value_type = Vec<Object>)]
    pub categories: Vec<ReplacementCategory>,
}

/// Create dish catalog routes
pub fn create_dish_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/dishes/search", get(search_dishes))
        .route("/api/dishes/categories", get(list_categories))
        .route("/api/dishes/:slug", get(get_dish))
}

#[utoipa::path(
    get,
    path = "/api/dishes/search",
    tag = "dishes",
    params(SearchQuery),
    responses(
        (status = 200, description = "Replacement groups for the query", body = SearchResponse)
    )
)]
pub async fn search_dishes(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let query = params.q.unwrap_or_default().trim().to_string();
    let groups = state.catalog.find_replacement_groups(&query);

    Json(SearchResponse { query, groups })
}

#[utoipa::path(
    get,
    path = "/api/dishes/categories",
    tag = "dishes",
    responses(
        (status = 200, description = "Replacement categories in match order", body = CategoriesResponse)
    )
)]
pub async fn list_categories(State(state): State<Arc<GatewayState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.catalog.categories().to_vec(),
    })
}

#[utoipa::path(
    get,
    path = "/api/dishes/{slug}",
    tag = "dishes",
    params(
        ("slug" = String, Path, description = "Dish slug")
    ),
    responses(
        (status = 200, description = "Full recipe"),
        (status = 404, description = "Dish not found", body = ErrorResponse)
    )
)]
pub async fn get_dish(
    State(state): State<Arc<GatewayState>>,
    Path(slug): Path<String>,
) -> GatewayResult<Json<DishDetail>> {
    state
        .catalog
        .dish_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| GatewayError::NotFound("Dish not found".to_string()))
}
