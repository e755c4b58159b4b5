use credentials::PasswordError;
use credentials::TokenError;
use thiserror::Error;

/// Error for account input validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Username does not match the configured pattern")]
    UsernamePatternMismatch,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password does not match the configured pattern")]
    PasswordPatternMismatch,
}

impl ValidationError {
    /// Name of the request field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyUsername | ValidationError::UsernamePatternMismatch => "user",
            ValidationError::EmptyPassword | ValidationError::PasswordPatternMismatch => "pass",
        }
    }

    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyUsername => "credentials.username.must.not.be.empty",
            ValidationError::UsernamePatternMismatch => "credentials.username.must.match.pattern",
            ValidationError::EmptyPassword => "credentials.password.must.not.be.empty",
            ValidationError::PasswordPatternMismatch => "credentials.password.must.match.pattern",
        }
    }
}

/// Error reported by a user store implementation
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Account already stored: {0}")]
    Duplicate(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid account data: {0}")]
    Validation(#[from] ValidationError),

    /// Covers unknown usernames and wrong passwords alike.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Username already exists: {0}")]
    Conflict(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(username) => AccountError::Conflict(username),
            other => AccountError::Store(other),
        }
    }
}
