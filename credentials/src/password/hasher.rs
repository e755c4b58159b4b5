use rand::rngs::OsRng;
use rand::RngCore;
use scrypt::Params;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;

/// Length in bytes of every generated salt.
pub const SALT_LENGTH: usize = 32;

/// Length in bytes of every derived password hash.
pub const HASH_LENGTH: usize = 64;

/// scrypt cost parameters: N = 2^14, r = 8, p = 1.
const LOG_N: u8 = 14;
const BLOCK_SIZE: u32 = 8;
const PARALLELISM: u32 = 1;

/// Salt and derived hash produced for a new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

/// Password hashing implementation.
///
/// Derives salted hashes with scrypt. Every call to [`derive_hash`] costs
/// roughly 16 MiB of memory and tens of milliseconds of CPU, so async callers
/// should move it off the executor.
///
/// [`derive_hash`]: PasswordHasher::derive_hash
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher configured with the fixed scrypt parameters
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh random salt from the operating system CSPRNG.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The OS entropy source could not be read
    pub fn generate_salt(&self) -> Result<[u8; SALT_LENGTH], PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::EntropyUnavailable(e.to_string()))?;
        Ok(salt)
    }

    /// Derive the hash of `password` under `salt`.
    ///
    /// Deterministic for fixed inputs.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Salt stored alongside the credential
    ///
    /// # Returns
    /// `HASH_LENGTH` bytes of derived key material
    ///
    /// # Errors
    /// * `DerivationFailed` - The key derivation function rejected its parameters
    pub fn derive_hash(&self, password: &str, salt: &[u8]) -> Result<Vec<u8>, PasswordError> {
        let params = Params::new(LOG_N, BLOCK_SIZE, PARALLELISM, HASH_LENGTH)
            .map_err(|e| PasswordError::DerivationFailed(e.to_string()))?;

        let mut hash = vec![0u8; HASH_LENGTH];
        scrypt::scrypt(password.as_bytes(), salt, &params, &mut hash)
            .map_err(|e| PasswordError::DerivationFailed(e.to_string()))?;
        Ok(hash)
    }

    /// Hash a new password under a freshly generated salt.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - Salt generation failed
    /// * `DerivationFailed` - Hash derivation failed
    pub fn hash(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        let salt = self.generate_salt()?;
        let hash = self.derive_hash(password, &salt)?;
        Ok(HashedPassword {
            salt: salt.to_vec(),
            hash,
        })
    }

    /// Verify a candidate password against a stored salt and hash.
    ///
    /// The comparison runs in constant time with respect to the hash content.
    /// An empty stored hash never matches.
    ///
    /// # Returns
    /// True if the candidate derives to the stored hash
    ///
    /// # Errors
    /// * `DerivationFailed` - Hash derivation failed
    pub fn verify(
        &self,
        candidate: &str,
        salt: &[u8],
        stored_hash: &[u8],
    ) -> Result<bool, PasswordError> {
        let derived = self.derive_hash(candidate, salt)?;
        Ok(!stored_hash.is_empty() && bool::from(derived.as_slice().ct_eq(stored_hash)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
