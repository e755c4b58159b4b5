use thiserror::Error;

/// Error type for password operations.
///
/// Neither variant is worth retrying: the request that hit it should fail.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Password hash derivation failed: {0}")]
    DerivationFailed(String),
}
