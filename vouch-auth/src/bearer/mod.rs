//! Bearer-credential validation.
//!
//! A bearer credential is an opaque signed token presented once per request
//! in the `Authorization: Bearer <token>` header. Validation is a pure
//! function over the credential, the process-wide [`SigningKeySource`] and a
//! [`ValidationConstraints`] record; it never touches shared mutable state
//! and is safe to call from any number of concurrent request handlers.

mod constraints;
mod error;
mod key;
mod validator;

pub use constraints::ValidationConstraints;
pub use error::TokenRejection;
pub use key::SigningKeySource;
pub use validator::{BearerValidator, MAX_TOKEN_SIZE_BYTES, token_from_header};
