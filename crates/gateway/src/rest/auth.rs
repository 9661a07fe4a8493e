//! Authentication REST endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use offramp_users::{AccountSummary, LoginInput, RegisterInput, SessionUser};
use serde::Serialize;
use time::Duration;
use utoipa::ToSchema;

use super::{parse_json, INVALID_JSON_BODY};
use crate::error::{ErrorResponse, GatewayResult};
use crate::middleware::{session_token, SESSION_COOKIE};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl From<AccountSummary> for AccountResponse {
    fn from(account: AccountSummary) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub session_ready: bool,
    pub user: AccountResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUserResponse {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub budget_level: Option<String>,
}

impl From<SessionUser> for SessionUserResponse {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            city: user.city,
            region: user.region,
            budget_level: user.budget_level,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub redirect: String,
    pub user: SessionUserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionUserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create authentication routes
pub fn create_auth_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
}

/// Session cookie carrying a fresh token.
pub fn session_cookie(token: String, max_age_seconds: u64, secure: bool) -> Cookie<'static> {
    let max_age = Duration::seconds(i64::try_from(max_age_seconds).unwrap_or(i64::MAX));
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .secure(secure)
        .build()
}

/// Session cookie that makes the browser drop the stored one, sent whether or not
/// the request carried a session.
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}

fn with_session(jar: CookieJar, state: &GatewayState, token: String) -> CookieJar {
    jar.add(session_cookie(
        token,
        state.auth_service.session_ttl_seconds(),
        state.auth_service.secure_cookies(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    responses(
        (status = 201, description = "Account created and session cookie set", body = RegisterResponse),
        (status = 400, description = "Invalid registration payload", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Authentication is not configured", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    body: Bytes,
) -> GatewayResult<impl IntoResponse> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let input = RegisterInput::from_json(&body)?;

    let account = state.auth_service.register(input).await?;
    let jar = with_session(jar, &state, account.token);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse {
            message: "Account created".to_string(),
            session_ready: true,
            user: account.user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    responses(
        (status = 200, description = "Signed in and session cookie set", body = LoginResponse),
        (status = 400, description = "Email and password required", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    body: Bytes,
) -> GatewayResult<impl IntoResponse> {
    let body = parse_json(&body, INVALID_JSON_BODY)?;
    let input = LoginInput::from_json(&body)?;

    let outcome = state.auth_service.login(input).await?;
    let jar = with_session(jar, &state, outcome.token);

    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            redirect: "/profile".to_string(),
            user: outcome.user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = jar.add(expired_session_cookie(state.auth_service.secure_cookies()));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "The signed-in user", body = SessionResponse),
        (status = 401, description = "No session, invalid session or unknown user", body = ErrorResponse)
    )
)]
pub async fn session(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
) -> GatewayResult<Json<SessionResponse>> {
    let token = session_token(&headers);
    let user = state.auth_service.authenticate(token.as_deref()).await?;

    Ok(Json(SessionResponse {
        user: SessionUser::from(&user).into(),
    }))
}
