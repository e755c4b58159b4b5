use chrono::Duration;

use crate::password::HashedPassword;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Principal;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Authentication coordinator combining password hashing and token handling.
///
/// Holds the signing secret and token lifetime fixed at construction; safe to
/// share between concurrent callers behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `token_ttl` - Lifetime of issued tokens; zero disables expiry
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(token_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(token_secret, token_ttl),
        }
    }

    /// Hash a new password under a fresh salt.
    ///
    /// # Errors
    /// * `PasswordError` - Salt generation or derivation failed
    pub fn hash_password(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a candidate password against a stored salt and hash.
    ///
    /// # Returns
    /// True if the password matches
    ///
    /// # Errors
    /// * `PasswordError` - Derivation failed
    pub fn verify_password(
        &self,
        password: &str,
        salt: &[u8],
        stored_hash: &[u8],
    ) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, salt, stored_hash)
    }

    /// Issue a signed token for an authenticated principal.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.token_codec.encode(principal)
    }

    /// Verify a token and recover its principal.
    ///
    /// # Errors
    /// * `TokenError` - Format, signature, or expiry validation failed
    pub fn validate_token(&self, token: &str) -> Result<Principal, TokenError> {
        self.token_codec.decode(token)
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_codec.ttl()
    }
}
