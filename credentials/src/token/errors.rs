use thiserror::Error;

/// Error type for token operations.
///
/// Decoding fails with exactly one of the validation variants, in pipeline
/// order: format, then signature, then payload decoding, then expiry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token format is invalid: {0}")]
    FormatInvalid(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

impl TokenError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::FormatInvalid(_) => "auth.jwt.validation.format.invalid",
            TokenError::SignatureInvalid => "auth.jwt.validation.sign.invalid",
            TokenError::Expired => "auth.jwt.validation.expired",
            TokenError::EncodingFailed(_) => "auth.jwt.encoding.failed",
        }
    }
}
