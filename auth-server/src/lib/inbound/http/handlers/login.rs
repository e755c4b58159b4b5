use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Exchange a username and password for a bearer token.
///
/// Every rejection, including a malformed body, is a plain 401 so callers
/// cannot tell which part of the login was wrong.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected login body");
        ApiError::Unauthorized
    })?;

    if body.user.is_empty() || body.pass.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    let principal = state
        .account_service
        .validate_pass(&body.user, &body.pass)
        .await?;

    let token = state.account_service.issue_token(&principal).await?;

    Ok(ApiSuccess::new(StatusCode::OK, LoginResponseData { token }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    user: String,
    #[serde(default)]
    pass: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
