use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::CredentialRecord;

pub mod create_account;
pub mod current_account;
pub mod login;

// Reason codes carried in error bodies
pub const USERNAME_ALREADY_EXISTS: &str = "credentials.username.already.exists";
pub const USERNAME_NOT_FOUND: &str = "credentials.username.not.found";
pub const CREDENTIALS_INVALID: &str = "auth.credentials.invalid";
pub const TOKEN_REJECTED: &str = "auth.token.rejected";
pub const REQUEST_BODY_MALFORMED: &str = "request.body.malformed";
pub const INTERNAL_ERROR: &str = "internal.error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// HTTP-facing error. Variants carrying a `&'static str` hold the reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Detail is logged, never sent to the client.
    InternalServerError(String),
    UnprocessableEntity(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    Unauthorized,
    Forbidden,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnprocessableEntity(..) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(..) => StatusCode::NOT_FOUND,
            ApiError::Conflict(..) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (INTERNAL_ERROR, "Internal server error".to_string())
            }
            ApiError::UnprocessableEntity(code, msg)
            | ApiError::NotFound(code, msg)
            | ApiError::Conflict(code, msg) => (code, msg),
            ApiError::Unauthorized => (CREDENTIALS_INVALID, "Invalid credentials".to_string()),
            ApiError::Forbidden => (TOKEN_REJECTED, "Invalid or missing bearer token".to_string()),
        };

        (status, Json(ApiResponseBody::new_error(status, code, message))).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(ref validation) => {
                ApiError::UnprocessableEntity(validation.code(), err.to_string())
            }
            AccountError::AuthenticationFailed => ApiError::Unauthorized,
            AccountError::Conflict(_) => ApiError::Conflict(USERNAME_ALREADY_EXISTS, err.to_string()),
            AccountError::NotFound(_) => ApiError::NotFound(USERNAME_NOT_FOUND, err.to_string()),
            AccountError::Store(_) | AccountError::Hashing(_) | AccountError::Token(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, code: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                code: code.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub message: String,
}

/// Public view of an account. Password material is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub user: String,
    pub name: String,
    pub active: bool,
    pub admin: bool,
}

impl From<&CredentialRecord> for AccountData {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            user: record.username.clone(),
            name: record.name.clone(),
            active: record.active,
            admin: record.admin,
        }
    }
}
