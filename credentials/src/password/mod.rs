pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::HashedPassword;
pub use hasher::PasswordHasher;
pub use hasher::HASH_LENGTH;
pub use hasher::SALT_LENGTH;
