use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use super::REQUEST_BODY_MALFORMED;
use crate::domain::account::models::CreateAccountCommand;
use crate::inbound::http::router::AppState;

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    let Json(body) = payload
        .map_err(|rejection| ApiError::UnprocessableEntity(REQUEST_BODY_MALFORMED, rejection.body_text()))?;

    if let Some(requested) = body.active {
        // The configured default always wins.
        tracing::debug!(username = %body.user, requested, "Ignoring requested active flag");
    }

    state
        .account_service
        .create_account(body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::CREATED, record.into()))
}

/// HTTP request body for creating an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    user: String,
    #[serde(default)]
    pass: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    admin: bool,
}

impl CreateAccountRequest {
    fn into_command(self) -> CreateAccountCommand {
        CreateAccountCommand::new(self.user, self.pass, self.name, self.admin)
    }
}
