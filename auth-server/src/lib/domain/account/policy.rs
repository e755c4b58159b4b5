use regex::Regex;

use crate::config::AccountsConfig;
use crate::domain::account::errors::ValidationError;

/// Account creation rules.
///
/// Username and password patterns are configured independently even though
/// they ship with the same default.
#[derive(Debug, Clone)]
pub struct AccountPolicy {
    username_pattern: Regex,
    password_pattern: Regex,
    default_active: bool,
}

impl AccountPolicy {
    /// Compile a policy from raw patterns.
    ///
    /// # Errors
    /// * `regex::Error` - Either pattern is not a valid regular expression
    pub fn new(
        username_pattern: &str,
        password_pattern: &str,
        default_active: bool,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            username_pattern: Regex::new(username_pattern)?,
            password_pattern: Regex::new(password_pattern)?,
            default_active,
        })
    }

    pub fn from_config(config: &AccountsConfig) -> Result<Self, regex::Error> {
        Self::new(
            &config.username_pattern,
            &config.password_pattern,
            config.default_active,
        )
    }

    pub fn validate_username(&self, username: &str) -> Result<(), ValidationError> {
        if username.is_empty() {
            Err(ValidationError::EmptyUsername)
        } else if !self.username_pattern.is_match(username) {
            Err(ValidationError::UsernamePatternMismatch)
        } else {
            Ok(())
        }
    }

    pub fn validate_password(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            Err(ValidationError::EmptyPassword)
        } else if !self.password_pattern.is_match(password) {
            Err(ValidationError::PasswordPatternMismatch)
        } else {
            Ok(())
        }
    }

    /// `active` flag given to every newly created account.
    pub fn default_active(&self) -> bool {
        self.default_active
    }
}
