//! Password hashing, access tokens and secret generation

pub mod jwt;
pub mod password;
pub mod secret;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
pub use secret::generate_secret_key;
