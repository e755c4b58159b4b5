use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::Extensions;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::CredentialRecord;
use crate::inbound::http::router::AppState;

/// Request extension key for the resolved account. Only this module can set it.
#[derive(Debug, Clone)]
struct AuthenticatedAccount(CredentialRecord);

#[derive(Debug, Clone, Error)]
#[error("No authenticated account in request context")]
pub struct MissingAccount;

/// Account resolved by [`authenticate`] for the current request.
///
/// # Errors
/// * `MissingAccount` - The route is not behind the authentication layer
pub fn current_account(extensions: &Extensions) -> Result<&CredentialRecord, MissingAccount> {
    extensions
        .get::<AuthenticatedAccount>()
        .map(|account| &account.0)
        .ok_or(MissingAccount)
}

/// Extractor for handlers on protected routes.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub CredentialRecord);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_account(&parts.extensions)
            .map(|record| CurrentAccount(record.clone()))
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    }
}

/// Middleware that validates the bearer token and resolves its account.
///
/// Stages: extract the `Bearer` token, verify it, then look the username up
/// again so deleted accounts stop working immediately. Any failure is a 403.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req).ok_or_else(|| {
        tracing::warn!("Missing or malformed Authorization header");
        ApiError::Forbidden
    })?;

    let principal = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = e.code(), "Token validation failed: {}", e);
        ApiError::Forbidden
    })?;

    let record = state
        .account_service
        .find_account(&principal.username)
        .await
        .map_err(|e| match e {
            AccountError::NotFound(_) => {
                tracing::warn!(username = %principal.username, "Token names an unknown account");
                ApiError::Forbidden
            }
            other => ApiError::from(other),
        })?;

    req.extensions_mut().insert(AuthenticatedAccount(record));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
