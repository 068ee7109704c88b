//! Identity substrate: signing keys, password hashing and identity tokens.

pub mod keys;
pub mod password;
pub mod token;

pub use keys::{ConfigurationError, GeneratedKeys, KeyStore};
pub use password::{CredentialHasher, HashError};
pub use token::{AuthContext, Claims, TokenError, TokenService};
