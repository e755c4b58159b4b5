use async_trait::async_trait;
use credentials::Principal;

use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::StoreError;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::CredentialRecord;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Check login credentials.
    ///
    /// # Arguments
    /// * `username` - Username to authenticate
    /// * `password` - Candidate plaintext password
    ///
    /// # Returns
    /// Principal of the authenticated account
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown username, missing hash, or wrong password
    /// * `Store` - Store lookup failed
    /// * `Hashing` - Key derivation failed
    async fn validate_pass(&self, username: &str, password: &str)
        -> Result<Principal, AccountError>;

    /// Issue a signed bearer token for a principal.
    ///
    /// # Errors
    /// * `Token` - Token encoding failed
    async fn issue_token(&self, principal: &Principal) -> Result<String, AccountError>;

    /// Create a new account with a freshly salted password hash.
    ///
    /// # Arguments
    /// * `command` - Raw account data to validate
    ///
    /// # Returns
    /// Stored credential record
    ///
    /// # Errors
    /// * `Conflict` - Username is already taken
    /// * `Validation` - Username or password is empty or does not match its pattern
    /// * `Hashing` - Salt generation or key derivation failed
    /// * `Store` - Store operation failed
    async fn create_account(
        &self,
        command: CreateAccountCommand,
    ) -> Result<CredentialRecord, AccountError>;

    /// Retrieve the current credential record for a username.
    ///
    /// # Errors
    /// * `NotFound` - No account with this username
    /// * `Store` - Store lookup failed
    async fn find_account(&self, username: &str) -> Result<CredentialRecord, AccountError>;
}

/// Persistence operations for credential records.
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve a record by username.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    async fn find_by_username(&self, username: &str)
        -> Result<Option<CredentialRecord>, StoreError>;

    /// Persist a new record.
    ///
    /// # Errors
    /// * `Duplicate` - A record with the same username is already stored
    /// * `Backend` - Store operation failed
    async fn save(&self, record: CredentialRecord) -> Result<(), StoreError>;
}
