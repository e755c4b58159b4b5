use std::sync::Arc;

use async_trait::async_trait;
use credentials::Authenticator;
use credentials::HashedPassword;
use credentials::PasswordError;
use credentials::Principal;
use credentials::SALT_LENGTH;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::CreateAccountCommand;
use crate::domain::account::models::CredentialRecord;
use crate::domain::account::policy::AccountPolicy;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::account::ports::UserStore;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
/// Key derivation runs on the blocking thread pool; no timeout is applied
/// beyond the caller's own request deadline.
pub struct AccountService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    policy: AccountPolicy,
}

impl<S> AccountService<S>
where
    S: UserStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token issuing
    /// * `policy` - Account creation rules
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>, policy: AccountPolicy) -> Self {
        Self {
            store,
            authenticator,
            policy,
        }
    }

    async fn hash_password(&self, password: String) -> Result<HashedPassword, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| PasswordError::DerivationFailed(format!("hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    async fn verify_password(
        &self,
        password: String,
        salt: Vec<u8>,
        stored_hash: Vec<u8>,
    ) -> Result<bool, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, &salt, &stored_hash)
        })
        .await
        .map_err(|e| PasswordError::DerivationFailed(format!("hashing task failed: {}", e)))?
        .map_err(AccountError::from)
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: UserStore,
{
    async fn validate_pass(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, AccountError> {
        let record = self.store.find_by_username(username).await?;

        // Unknown users still pay for one derivation against a throwaway salt.
        let (salt, stored_hash) = match &record {
            Some(record) if record.has_password() => {
                (record.salt.clone(), record.password_hash.clone())
            }
            _ => (vec![0u8; SALT_LENGTH], Vec::new()),
        };

        let matched = self
            .verify_password(password.to_string(), salt, stored_hash)
            .await?;

        match record {
            Some(record) if matched => {
                tracing::debug!(username = %record.username, "Password validated");
                Ok(record.principal())
            }
            _ => {
                tracing::info!(username = %username, "Authentication failed");
                Err(AccountError::AuthenticationFailed)
            }
        }
    }

    async fn issue_token(&self, principal: &Principal) -> Result<String, AccountError> {
        Ok(self.authenticator.issue_token(principal)?)
    }

    async fn create_account(
        &self,
        command: CreateAccountCommand,
    ) -> Result<CredentialRecord, AccountError> {
        if self
            .store
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AccountError::Conflict(command.username));
        }

        self.policy.validate_username(&command.username)?;
        self.policy.validate_password(&command.password)?;

        let hashed = self.hash_password(command.password).await?;

        let record = CredentialRecord {
            username: command.username,
            password_hash: hashed.hash,
            salt: hashed.salt,
            name: command.name,
            active: self.policy.default_active(),
            admin: command.admin,
        };

        self.store.save(record.clone()).await?;

        tracing::info!(
            username = %record.username,
            active = record.active,
            admin = record.admin,
            "Account created"
        );

        Ok(record)
    }

    async fn find_account(&self, username: &str) -> Result<CredentialRecord, AccountError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }
}
