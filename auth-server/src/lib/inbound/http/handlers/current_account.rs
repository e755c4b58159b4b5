use axum::http::StatusCode;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentAccount;

pub async fn current_account(
    CurrentAccount(record): CurrentAccount,
) -> Result<ApiSuccess<AccountData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&record).into()))
}
