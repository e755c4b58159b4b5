use credentials::Principal;

/// Stored credential of one account.
///
/// Identified by its unique username. The salt is generated for this record
/// alone and `password_hash` is fully determined by the password and salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: Vec<u8>,
    pub salt: Vec<u8>,
    pub name: String,
    pub active: bool,
    pub admin: bool,
}

impl CredentialRecord {
    /// Whether the record carries a password hash that could ever verify.
    pub fn has_password(&self) -> bool {
        !self.password_hash.is_empty()
    }

    /// Principal representing this account after a successful login.
    pub fn principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.name.clone())
    }
}

/// Command to create a new account from raw, unvalidated input.
#[derive(Debug)]
pub struct CreateAccountCommand {
    pub username: String,
    pub password: String,
    pub name: String,
    pub admin: bool,
}

impl CreateAccountCommand {
    /// Construct a new create account command.
    ///
    /// # Arguments
    /// * `username` - Requested username (validated by the service)
    /// * `password` - Plain text password (validated, then hashed by the service)
    /// * `name` - Display name
    /// * `admin` - Whether the account is an administrator
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        admin: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            name: name.into(),
            admin,
        }
    }
}
