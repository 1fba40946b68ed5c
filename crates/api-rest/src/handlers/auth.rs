//! Signup, login, and session endpoints.
//!
//! The session token travels as a query parameter because that is what the
//! existing dashboard sends; there is no Authorization header handling.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use coursebook_core::auth::AuthService;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupRes {
    pub message: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub message: String,
    pub session_token: String,
    pub username: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionTokenQuery {
    pub session_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifySessionRes {
    pub valid: bool,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutRes {
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupReq,
    responses(
        (status = 201, description = "User created", body = SignupRes),
        (status = 400, description = "Username or email already exists")
    )
)]
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupReq>,
) -> ApiResult<(StatusCode, Json<SignupRes>)> {
    AuthService::new(state.store.clone()).signup(
        &req.username,
        &req.email,
        &req.password,
        &req.domain,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(SignupRes {
            message: "User created successfully".to_string(),
            username: req.username,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginRes),
        (status = 401, description = "Invalid username or password")
    )
)]
/// Checks credentials and issues a 24-hour session token.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> ApiResult<Json<LoginRes>> {
    let outcome = AuthService::new(state.store.clone()).login(&req.username, &req.password)?;
    Ok(Json(LoginRes {
        message: "Login successful".to_string(),
        session_token: outcome.session_token,
        username: outcome.username,
    }))
}

#[utoipa::path(
    get,
    path = "/verify-session",
    params(SessionTokenQuery),
    responses(
        (status = 200, description = "Session is valid", body = VerifySessionRes),
        (status = 401, description = "Invalid or expired session")
    )
)]
#[axum::debug_handler]
pub async fn verify_session(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
) -> ApiResult<Json<VerifySessionRes>> {
    let username = AuthService::new(state.store.clone()).verify(&query.session_token)?;
    Ok(Json(VerifySessionRes {
        valid: true,
        username,
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    params(SessionTokenQuery),
    responses(
        (status = 200, description = "Logout successful", body = LogoutRes)
    )
)]
/// Revokes the session. Logging out an unknown token still succeeds.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Query(query): Query<SessionTokenQuery>,
) -> ApiResult<Json<LogoutRes>> {
    AuthService::new(state.store.clone()).revoke(&query.session_token)?;
    Ok(Json(LogoutRes {
        message: "Logout successful".to_string(),
    }))
}
