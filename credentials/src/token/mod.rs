pub mod codec;
pub mod errors;
pub mod principal;

pub use codec::TokenCodec;
pub use errors::TokenError;
pub use principal::Principal;
