//! Credential and token primitives
//!
//! Provides the stateless building blocks of bearer authentication:
//! - Salted password hashing (scrypt, N=2^14, r=8, p=1)
//! - A compact HMAC-SHA256 signed token codec
//! - An `Authenticator` that pairs both behind one shared value
//!
//! Nothing here performs I/O; account storage belongs to the calling service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hashed = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hashed.salt, &hashed.hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use chrono::Duration;
//! use credentials::{Principal, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key", Duration::hours(24));
//! let token = codec.encode(&Principal::new("alice", "Alice")).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use chrono::Duration;
//! use credentials::{Authenticator, Principal};
//!
//! let auth = Authenticator::new(b"secret_key", Duration::zero());
//!
//! // Register: hash password under a fresh salt
//! let hashed = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! assert!(auth.verify_password("password123", &hashed.salt, &hashed.hash).unwrap());
//! let token = auth.issue_token(&Principal::new("alice", "Alice")).unwrap();
//!
//! // Validate token
//! let principal = auth.validate_token(&token).unwrap();
//! assert_eq!(principal.expires, None);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use password::HashedPassword;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::HASH_LENGTH;
pub use password::SALT_LENGTH;
pub use token::Principal;
pub use token::TokenCodec;
pub use token::TokenError;
