//! Swap logging and swap photo uploads

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Extension, Multipart, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use offramp_config::StorageConfig;
use offramp_transition::{input::parse_limit, RecentSwap, RecordSwapInput, RecordSwapOutcome};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{parse_json, INVALID_JSON_BODY};
use crate::error::{ErrorResponse, GatewayError, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

/// Room for multipart boundaries and headers around the image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Accepted photo formats and the extension each is stored under.
const IMAGE_TYPES: [(&str, &str); 5] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
    ("image/heif", "heif"),
];

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentSwapsQuery {
    /// 1 to 50, default 10
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentSwapsResponse {
    #[schema(value_type = Vec<Object>)]
    pub swaps: Vec<RecentSwap>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub ok: bool,
    pub image_url: String,
}

/// Create swap routes; uploads are capped by `storage.max_upload_bytes`
pub fn create_swap_routes(storage: &StorageConfig) -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/swaps/record", post(record_swap))
        .route("/api/swaps/recent", get(recent_swaps))
        .route(
            "/api/swaps/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(
                storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
}

#[utoipa::path(
    post,
    path = "/api/swaps/record",
    tag = "swaps",
    responses(
        (status = 200, description = "Swap logged, or ignored as a repeat within ten seconds"),
        (status = 400, description = "fromDish and toDish are required", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn record_swap(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    body: Bytes,
) -> GatewayResult<Json<RecordSwapOutcome>> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let input: RecordSwapInput = serde_json::from_value(body)
        .map_err(|_| GatewayError::BadRequest(INVALID_JSON_BODY.to_string()))?;

    let outcome = state.swap_service.record(&user.id, &input).await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/swaps/recent",
    tag = "swaps",
    params(RecentSwapsQuery),
    responses(
        (status = 200, description = "Newest swaps first", body = RecentSwapsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    )
)]
pub async fn recent_swaps(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<RecentSwapsQuery>,
) -> GatewayResult<Json<RecentSwapsResponse>> {
    let limit = parse_limit(params.limit.as_deref());
    let swaps = state.swap_service.recent(&user.id, limit).await?;
    Ok(Json(RecentSwapsResponse { swaps }))
}

#[utoipa::path(
    post,
    path = "/api/swaps/upload-image",
    tag = "swaps",
    responses(
        (status = 200, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Missing, non-image or oversized file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<Arc<GatewayState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> GatewayResult<Json<UploadImageResponse>> {
    let max_upload_bytes = state.storage.max_upload_bytes;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes, "Invalid multipart body"))?
    {
        if field.name() != Some("image") {
            continue;
        }
        if field.file_name().is_none() {
            break;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_bytes, "Failed to read upload"))?;
        image = Some((content_type, bytes));
        break;
    }

    let Some((content_type, bytes)) = image else {
        return Err(GatewayError::BadRequest("image file is required".to_string()));
    };
    let Some(extension) = image_extension(&content_type) else {
        return Err(GatewayError::BadRequest(
            "Only image uploads are supported".to_string(),
        ));
    };
    if bytes.len() > max_upload_bytes {
        return Err(too_large(max_upload_bytes));
    }

    let stored_name = format!(
        "{}-{}.{extension}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4()
    );

    let user_dir = state.storage.root.join(&user.id);
    tokio::fs::create_dir_all(&user_dir).await.map_err(|e| {
        error!(error = %e, dir = %user_dir.display(), "failed to create upload directory");
        GatewayError::Internal("Failed to upload image".to_string())
    })?;
    tokio::fs::write(user_dir.join(&stored_name), &bytes)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to write uploaded image");
            GatewayError::Internal("Failed to upload image".to_string())
        })?;

    info!(user_id = %user.id, file = %stored_name, size = bytes.len(), "swap image stored");

    Ok(Json(UploadImageResponse {
        ok: true,
        image_url: format!(
            "{}/{}/{stored_name}",
            state.storage.public_base_url.trim_end_matches('/'),
            user.id
        ),
    }))
}

/// Stored extension for an accepted image type. The client's file name is never used.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, extension)| *extension)
}

fn too_large(max_upload_bytes: usize) -> GatewayError {
    GatewayError::BadRequest(format!("Image must be at most {max_upload_bytes} bytes"))
}

/// A body cut off by the upload limit reads as the same size error as an oversized image.
fn multipart_error(error: MultipartError, max_upload_bytes: usize, context: &str) -> GatewayError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_upload_bytes);
    }
    GatewayError::BadRequest(format!("{context}: {}", error.body_text()))
}
